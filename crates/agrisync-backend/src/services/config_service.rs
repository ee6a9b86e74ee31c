/// Handles an incoming configuration request (see
/// [`agrisync_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    let config = {
        let state = context.state.read().await;
        state.config.clone()
    };
    context
        .send(agrisync_bridge::MessageFromBackend::ConfigurationResponse(
            config,
        ))
        .await;
}
