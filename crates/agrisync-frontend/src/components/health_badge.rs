use agrisync_bridge::farm::HealthStatus;
use gpui::{IntoElement, ParentElement, Styled, div};
use gpui_component::ActiveTheme;

#[derive(IntoElement)]
pub struct HealthBadge(pub HealthStatus);

impl gpui::RenderOnce for HealthBadge {
    fn render(self, _: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let color = match self.0 {
            HealthStatus::Healthy => cx.theme().success,
            HealthStatus::Monitor => cx.theme().warning,
            HealthStatus::AtRisk => cx.theme().danger,
        };

        div()
            .px_2()
            .rounded_md()
            .border_1()
            .border_color(color)
            .text_color(color)
            .text_sm()
            .child(self.0.label())
    }
}
