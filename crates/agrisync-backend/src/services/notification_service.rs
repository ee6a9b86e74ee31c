use agrisync_bridge::{
    MessageFromBackend,
    notification::{NotificationId, ToastType},
};

use super::AppContextHandle;

/// Sends the current notification log to the frontend.
async fn broadcast(context: &AppContextHandle) {
    let (notifications, unread_count) = {
        let state = context.state.read().await;
        (
            state.notifications.list().to_vec(),
            state.notifications.unread_count(),
        )
    };
    context
        .send(MessageFromBackend::NotificationsUpdate {
            notifications,
            unread_count,
        })
        .await;
}

/// Handles [`agrisync_bridge::MessageToBackend::NotificationsRequest`].
pub async fn handle_notifications_request(context: AppContextHandle) {
    broadcast(&context).await;
}

/// Handles [`agrisync_bridge::MessageToBackend::MarkNotificationRead`].
pub async fn handle_mark_read(context: AppContextHandle, id: NotificationId) {
    let result = {
        let mut state = context.state.write().await;
        state.notifications.mark_read(&id)
    };

    match result {
        Ok(()) => broadcast(&context).await,
        Err(error) => {
            log::warn!("Failed to mark notification as read: {error}");
            context.send_toast(ToastType::Warning, error.to_string()).await;
        }
    }
}
