use agrisync_bridge::notification::Notification;
use gpui::{AppContext, Entity};

#[derive(Debug, Clone, Default)]
pub struct NotificationsEntity {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

impl NotificationsEntity {
    pub fn update<C: AppContext>(
        entity: &Entity<Self>,
        notifications: Vec<Notification>,
        unread_count: usize,
        cx: &mut C,
    ) {
        let _ = entity.update(cx, |this, cx| {
            this.notifications = notifications;
            this.unread_count = unread_count;
            cx.notify();
        });
    }
}
