use agrisync_bridge::analysis::AnalysisState;
use gpui::{AnyElement, IntoElement, ParentElement, Styled, div, prelude::FluentBuilder};
use gpui_component::{ActiveTheme, StyledExt};

use crate::{entities::analysis_entity::CropAnalysis, formatting::format_confidence};

/// Renders the state of one crop's analysis session.
#[derive(IntoElement)]
pub struct AnalysisCard {
    analysis: CropAnalysis,
}

impl AnalysisCard {
    pub fn new(analysis: CropAnalysis) -> Self {
        Self { analysis }
    }
}

impl gpui::RenderOnce for AnalysisCard {
    fn render(self, _: &mut gpui::Window, cx: &mut gpui::App) -> impl IntoElement {
        let muted = cx.theme().muted_foreground;
        let body: AnyElement = match &self.analysis.state {
            AnalysisState::Idle => div()
                .text_color(muted)
                .child("Upload a photo of an affected leaf to detect diseases.")
                .into_any_element(),
            AnalysisState::Encoding => div()
                .text_color(muted)
                .child("Preparing image...")
                .into_any_element(),
            AnalysisState::Requesting => div()
                .text_color(muted)
                .child("Analyzing image...")
                .into_any_element(),
            AnalysisState::Succeeded(result) => div()
                .flex()
                .flex_col()
                .gap_2()
                .child(
                    div()
                        .flex()
                        .justify_between()
                        .child(div().child(result.disease_name.clone()).text_lg().font_bold())
                        .child(format!("Confidence: {}", format_confidence(result.confidence))),
                )
                .child(result.description.clone())
                .child(div().child("Recommendations").font_semibold())
                .when(result.recommendations.is_empty(), |this| {
                    this.child(div().text_color(muted).child("None."))
                })
                .children(
                    result
                        .recommendations
                        .iter()
                        .map(|recommendation| format!("• {recommendation}")),
                )
                .into_any_element(),
            AnalysisState::Failed(error) => div()
                .text_color(cx.theme().danger)
                .child(error.user_message())
                .into_any_element(),
        };

        div()
            .flex()
            .flex_col()
            .gap_2()
            .p_3()
            .border_1()
            .border_color(cx.theme().border)
            .rounded_md()
            .child(body)
            .when(self.analysis.rejected, |this| {
                this.child(
                    div()
                        .text_sm()
                        .text_color(cx.theme().warning)
                        .child("An analysis is already running for this crop."),
                )
            })
    }
}
