use gpui::{IntoElement, ParentElement, SharedString, Styled, div, prelude::FluentBuilder};
use gpui_component::StyledExt;

/// Label on the left, arbitrary content on the right.
#[derive(Default, IntoElement)]
pub struct InfoRow {
    label: SharedString,
    child: Option<gpui::AnyElement>,
}

impl InfoRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<SharedString>) -> Self {
        self.label = label.into();
        self
    }

    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.child = Some(child.into_any_element());
        self
    }
}

impl gpui::RenderOnce for InfoRow {
    fn render(self, _: &mut gpui::Window, _: &mut gpui::App) -> impl IntoElement {
        div()
            .w_full()
            .flex()
            .items_center()
            .justify_between()
            .gap_4()
            .child(div().child(self.label).font_semibold())
            .when_some(self.child, |this, child| this.child(child))
    }
}
