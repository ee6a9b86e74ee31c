use std::path::PathBuf;

use agrisync_bridge::{
    MessageFromBackend, MessageToBackend,
    notification::{NotificationId, ToastMessage, ToastType},
};
use gpui::{AnyWindowHandle, AppContext, Application, AsyncApp, Global, WindowOptions};
use gpui_component::{
    Root, WindowExt,
    notification::{Notification, NotificationType},
};
use tokio::sync::mpsc;

use crate::entities::{
    DataEntities, analysis_entity::AnalysisEntity, catalog_entity::CatalogEntity,
    notifications_entity::NotificationsEntity, session_entity::SessionEntity,
    settings_entity::SettingsEntity,
};

pub mod components;
pub mod entities;
pub mod formatting;
mod views;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    async fn send(&self, message: MessageToBackend) {
        if let Err(error) = self.to_backend.send(message).await {
            log::error!("Failed to send message to backend: {error}");
        }
    }

    pub async fn request_config(&self) {
        self.send(MessageToBackend::ConfigurationRequest).await;
    }

    pub async fn request_notifications(&self) {
        self.send(MessageToBackend::NotificationsRequest).await;
    }

    pub async fn mark_notification_read(&self, id: NotificationId) {
        self.send(MessageToBackend::MarkNotificationRead(id)).await;
    }

    pub async fn request_catalog(&self) {
        self.send(MessageToBackend::CatalogRequest).await;
    }

    pub async fn check_in_worker(&self, worker_id: String) {
        self.send(MessageToBackend::CheckInWorker(worker_id)).await;
    }

    pub async fn check_out_worker(&self, worker_id: String) {
        self.send(MessageToBackend::CheckOutWorker(worker_id)).await;
    }

    pub async fn analyze_plant_image(&self, crop_id: String, image: Option<PathBuf>) {
        self.send(MessageToBackend::AnalyzePlantImage { crop_id, image })
            .await;
    }

    pub async fn reset_analysis(&self, crop_id: String) {
        self.send(MessageToBackend::ResetAnalysis { crop_id }).await;
    }
}

impl Global for BackendBridge {}

fn push_toast(window_handle: AnyWindowHandle, toast: ToastMessage, cx: &mut AsyncApp) {
    let notification_type = match toast.toast_type {
        ToastType::Info => NotificationType::Info,
        ToastType::Success => NotificationType::Success,
        ToastType::Warning => NotificationType::Warning,
        ToastType::Error => NotificationType::Error,
    };

    let result = window_handle.update(cx, |_, window, cx| {
        let notification = Notification::new()
            .message(toast.message)
            .with_type(notification_type);
        window.push_notification(notification, cx);
    });
    if let Err(error) = result {
        log::warn!("Failed to push a toast: {error}");
    }
}

/// Applies one backend event to the frontend entities.
fn handle_backend_message(
    message: MessageFromBackend,
    data: &DataEntities,
    window_handle: AnyWindowHandle,
    cx: &mut AsyncApp,
) {
    match message {
        MessageFromBackend::ConfigurationResponse(config) => {
            let default_role = config.default_role;
            let first_load = data
                .settings
                .read_with(cx, |settings, _| !settings.loaded)
                .unwrap_or(false);
            SettingsEntity::update(&data.settings, config, cx);
            if first_load {
                let _ = data.session.update(cx, |session, cx| {
                    *session = SessionEntity::new(default_role);
                    cx.notify();
                });
            }
        }
        MessageFromBackend::Toast(toast) => push_toast(window_handle, toast, cx),
        MessageFromBackend::NotificationsUpdate {
            notifications,
            unread_count,
        } => NotificationsEntity::update(&data.notifications, notifications, unread_count, cx),
        MessageFromBackend::CatalogResponse(catalog) => {
            CatalogEntity::update(&data.catalog, catalog, cx)
        }
        MessageFromBackend::AnalysisStateUpdate {
            crop_id,
            attempt,
            state,
        } => {
            let _ = data.analyses.update(cx, |analyses, cx| {
                if analyses.apply(&crop_id, attempt, state) {
                    cx.notify();
                }
            });
        }
        MessageFromBackend::AnalysisRejected { crop_id } => {
            let _ = data.analyses.update(cx, |analyses, cx| {
                analyses.mark_rejected(&crop_id);
                cx.notify();
            });
            push_toast(
                window_handle,
                ToastMessage {
                    toast_type: ToastType::Warning,
                    message: "Please wait for the running analysis to finish.".to_owned(),
                },
                cx,
            );
        }
    }
}

pub fn run(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let app = Application::new().with_assets(gpui_component_assets::Assets);

    app.run(move |cx| {
        gpui_component::init(cx);

        let data = DataEntities {
            settings: cx.new(|_| SettingsEntity::default()),
            session: cx.new(|_| SessionEntity::default()),
            notifications: cx.new(|_| NotificationsEntity::default()),
            catalog: cx.new(|_| CatalogEntity::default()),
            analyses: cx.new(|_| AnalysisEntity::default()),
        };
        let listener_data = data.clone();

        let bridge = BackendBridge {
            to_backend: tx.clone(),
        };
        cx.set_global(bridge.clone());

        cx.spawn(async move |cx| {
            cx.open_window(WindowOptions::default(), |window, cx| {
                let window_handle = window.window_handle();
                cx.spawn(async move |cx| {
                    while let Some(message) = rx.recv().await {
                        log::debug!("Got a message from backend: {message:?}");
                        handle_backend_message(message, &listener_data, window_handle, cx);
                    }
                })
                .detach();

                cx.spawn(async move |_| {
                    bridge.request_config().await;
                    bridge.request_notifications().await;
                    bridge.request_catalog().await;
                })
                .detach();

                let view = cx.new(|cx| crate::views::FrontendUi::new(&data, window, cx));
                cx.new(|cx| Root::new(view, window, cx))
            })?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
