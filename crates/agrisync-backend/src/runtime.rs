//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, shared state, and the message
//! dispatch loop that listens to frontend bridge requests.

use std::{collections::HashMap, sync::Arc, thread};

use agrisync_bridge::{MessageFromBackend, MessageToBackend, config::Config};
use agrisync_health::GeminiClient;
use chrono::{Local, Utc};
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::catalog::seed_catalog;
use crate::state::State;
use crate::store::NotificationStore;

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let config = match crate::config::load_config().await {
        Ok(config) => config,
        Err(error) => {
            log::error!("Failed to load configuration, using defaults: {error}");
            Config::default()
        }
    };

    let notifications =
        match NotificationStore::from_seed(config.seed_notifications.clone(), Utc::now()) {
            Ok(store) => store,
            Err(error) => {
                log::error!("Invalid notification seed, starting with an empty log: {error}");
                NotificationStore::default()
            }
        };
    let catalog = seed_catalog(Local::now().naive_local());
    log::info!(
        "Loaded {} notifications and {} crops",
        notifications.list().len(),
        catalog.crops.len()
    );

    let inference_client = GeminiClient::new(reqwest::Client::new(), &config.inference);
    if !inference_client.has_api_key() {
        log::warn!(
            "Environment variable {} is not set, plant health analysis will fail",
            config.inference.api_key_env
        );
    }

    let state = Arc::new(RwLock::new(State {
        config,
        inference_client,
        notifications,
        catalog,
        analyzers: HashMap::new(),
    }));

    let context = Arc::new(AppContext { state, tx });
    context.consume_bridge_messages(rx).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
pub fn run(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(error) => {
                log::error!("Failed to build tokio runtime: {error}");
                return;
            }
        };
        runtime.block_on(async { setup_backend(rx, tx).await });
    });
}
