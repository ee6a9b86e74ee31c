use agrisync_bridge::access::{RouteId, descriptor, landing};
use gpui::{Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div};
use gpui_component::{
    ActiveTheme, StyledExt,
    button::{Button, ButtonVariants},
};

use crate::entities::{DataEntities, session_entity::SessionEntity};

/// Placeholder shown instead of a page the role may not see, or for an
/// unknown path.
pub struct StatusPage {
    session: Entity<SessionEntity>,
    title: &'static str,
    message: String,
}

impl StatusPage {
    pub fn forbidden(data: &DataEntities, route: RouteId, _: &mut Context<Self>) -> Self {
        Self {
            session: data.session.clone(),
            title: "Access denied",
            message: format!(
                "Your role does not have access to {}.",
                descriptor(route).label
            ),
        }
    }

    pub fn not_found(data: &DataEntities, _: &mut Context<Self>) -> Self {
        Self {
            session: data.session.clone(),
            title: "Page not found",
            message: "The page you are looking for does not exist.".to_owned(),
        }
    }
}

impl Render for StatusPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let session = self.session.clone();

        div()
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap_3()
            .child(div().child(self.title).text_2xl().font_bold())
            .child(
                div()
                    .text_color(cx.theme().muted_foreground)
                    .child(self.message.clone()),
            )
            .child(
                Button::new("go-home")
                    .primary()
                    .label("Back to start")
                    .on_click(move |_, _, cx| {
                        session.update(cx, |session, cx| {
                            if let Some(location) = landing(session.role()) {
                                session.navigate_to(&location);
                                cx.notify();
                            }
                        });
                    }),
            )
    }
}
