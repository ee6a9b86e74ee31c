fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()?;

    log::info!("Starting AgriSync {}", env!("CARGO_PKG_VERSION"));

    let channels = agrisync_bridge::BridgeChannels::default();
    agrisync_backend::run(channels.backend_rx, channels.backend_tx);
    agrisync_frontend::run(channels.frontend_rx, channels.frontend_tx)
}
