use agrisync_bridge::notification::{NotificationCategory, NotificationId};
use gpui::{
    Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, IconName, Sizable, StyledExt,
    button::{Button, ButtonVariants},
};

use crate::{
    BackendBridge,
    entities::{DataEntities, notifications_entity::NotificationsEntity},
    formatting::format_timestamp,
};

/// Alert toggle with the unread badge and the expandable notification list.
pub struct NotificationPanel {
    notifications: Entity<NotificationsEntity>,
    open: bool,
}

impl NotificationPanel {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.notifications, |_, _, cx| cx.notify())
            .detach();
        Self {
            notifications: data.notifications.clone(),
            open: false,
        }
    }
}

fn mark_read(id: NotificationId) -> impl Fn(&gpui::ClickEvent, &mut Window, &mut gpui::App) {
    move |_, _, cx| {
        let bridge = cx.global::<BackendBridge>().clone();
        let id = id.clone();
        cx.spawn(async move |_| bridge.mark_notification_read(id).await)
            .detach();
    }
}

impl Render for NotificationPanel {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = self.notifications.read(cx).clone();
        let label = match state.unread_count {
            0 => "Alerts".to_owned(),
            count => format!("Alerts ({count})"),
        };

        let rows = state
            .notifications
            .iter()
            .enumerate()
            .map(|(index, notification)| {
                let accent = match notification.category {
                    NotificationCategory::Alert => cx.theme().danger,
                    NotificationCategory::Info => cx.theme().info,
                    NotificationCategory::Success => cx.theme().success,
                };

                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .gap_3()
                    .p_2()
                    .rounded_md()
                    .when(!notification.read, |this| this.bg(cx.theme().muted))
                    .child(div().size_2().rounded_full().bg(accent))
                    .child(
                        div()
                            .flex_1()
                            .flex()
                            .flex_col()
                            .child(notification.message.clone())
                            .child(
                                div()
                                    .text_xs()
                                    .text_color(cx.theme().muted_foreground)
                                    .child(format_timestamp(notification.created_at)),
                            ),
                    )
                    .when(!notification.read, |this| {
                        this.child(
                            Button::new(("mark-read", index))
                                .ghost()
                                .small()
                                .label("Mark as read")
                                .on_click(mark_read(notification.id.clone())),
                        )
                    })
            })
            .collect::<Vec<_>>();

        div()
            .flex()
            .flex_col()
            .items_end()
            .gap_2()
            .child(
                Button::new("toggle-alerts")
                    .icon(IconName::Bell)
                    .when(state.unread_count > 0, |this| this.primary())
                    .label(label)
                    .on_click(cx.listener(|this, _, _, cx| {
                        this.open = !this.open;
                        cx.notify();
                    })),
            )
            .when(self.open, |this| {
                this.child(
                    div()
                        .w_96()
                        .p_2()
                        .flex()
                        .flex_col()
                        .gap_1()
                        .border_1()
                        .border_color(cx.theme().border)
                        .rounded_md()
                        .child(div().px_2().child("Notifications").font_semibold())
                        .when(rows.is_empty(), |this| {
                            this.child(
                                div()
                                    .p_2()
                                    .text_color(cx.theme().muted_foreground)
                                    .child("No notifications."),
                            )
                        })
                        .children(rows),
                )
            })
    }
}
