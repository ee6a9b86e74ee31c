use gpui::{
    Context, Entity, Hsla, IntoElement, ParentElement, Render, Styled, Window, div, relative,
};
use gpui_component::{
    ActiveTheme, StyledExt,
    group_box::{GroupBox, GroupBoxVariants},
};

use crate::{
    entities::{DataEntities, catalog_entity::CatalogEntity},
    formatting::ratio,
};

pub struct AnalyticsPage {
    catalog: Entity<CatalogEntity>,
}

impl AnalyticsPage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        Self {
            catalog: data.catalog.clone(),
        }
    }
}

/// One horizontal bar: label, filled track and value.
fn bar(label: String, value: f64, max: f64, color: Hsla, track: Hsla) -> gpui::Div {
    let value_label = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    };

    div()
        .flex()
        .items_center()
        .gap_3()
        .child(div().w_16().child(label))
        .child(
            div()
                .flex_1()
                .h_3()
                .rounded_md()
                .bg(track)
                .child(div().h_full().rounded_md().bg(color).w(relative(ratio(value, max)))),
        )
        .child(div().w_16().child(value_label))
}

impl Render for AnalyticsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).catalog.clone();
        let theme = cx.theme();
        let (primary, success, track) = (theme.primary, theme.success, theme.muted);

        let max_yield = catalog
            .yields
            .iter()
            .map(|point| point.yield_tonnes)
            .fold(0.0, f64::max);
        let yields = catalog.yields.iter().map(|point| {
            bar(point.season.clone(), point.yield_tonnes, max_yield, primary, track)
        });

        let max_cost = catalog
            .costs
            .iter()
            .map(|point| point.cost.max(point.output))
            .fold(0.0, f64::max);
        let costs = catalog.costs.iter().map(|point| {
            div()
                .flex()
                .flex_col()
                .gap_1()
                .child(bar(format!("{} cost", point.month), point.cost, max_cost, primary, track))
                .child(bar(
                    format!("{} output", point.month),
                    point.output,
                    max_cost,
                    success,
                    track,
                ))
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Analytics").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Yield by season (t)").text_xl().font_bold())
                    .children(yields),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Cost vs output").text_xl().font_bold())
                    .children(costs),
            )
    }
}
