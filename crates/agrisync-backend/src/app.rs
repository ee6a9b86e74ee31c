//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and toasts back to the frontend bridge.

use std::sync::Arc;

use agrisync_bridge::{
    MessageFromBackend, MessageToBackend,
    notification::{ToastMessage, ToastType},
};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::info!("Frontend bridge closed, stopping backend");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToBackend::NotificationsRequest => {
                services::notification_service::handle_notifications_request(self.clone()).await;
            }
            MessageToBackend::MarkNotificationRead(id) => {
                services::notification_service::handle_mark_read(self.clone(), id).await;
            }
            MessageToBackend::CatalogRequest => {
                services::catalog_service::handle_catalog_request(self.clone()).await;
            }
            MessageToBackend::CheckInWorker(worker_id) => {
                services::catalog_service::handle_check_in(self.clone(), worker_id).await;
            }
            MessageToBackend::CheckOutWorker(worker_id) => {
                services::catalog_service::handle_check_out(self.clone(), worker_id).await;
            }
            MessageToBackend::AnalyzePlantImage { crop_id, image } => {
                services::analysis_service::handle_analyze_request(self.clone(), crop_id, image)
                    .await;
            }
            MessageToBackend::ResetAnalysis { crop_id } => {
                services::analysis_service::handle_reset_request(self.clone(), crop_id).await;
            }
        }
    }

    /// Send a message to the frontend bridge. A closed bridge means the
    /// frontend is shutting down, so the message is dropped.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(error) = self.tx.send(message).await {
            log::warn!("Failed to send message to frontend: {error}");
        }
    }

    /// Send a toast message to the frontend bridge.
    pub async fn send_toast(&self, toast_type: ToastType, content: impl Into<String>) {
        self.send(MessageFromBackend::Toast(ToastMessage {
            toast_type,
            message: content.into(),
        }))
        .await;
    }
}
