use agrisync_bridge::farm::PesticideEntry;
use chrono::Local;
use gpui::{
    Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, StyledExt,
    group_box::{GroupBox, GroupBoxVariants},
};

use crate::{
    entities::{DataEntities, catalog_entity::CatalogEntity},
    formatting::format_date,
};

pub struct SchedulePage {
    catalog: Entity<CatalogEntity>,
}

impl SchedulePage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        Self {
            catalog: data.catalog.clone(),
        }
    }
}

fn spray_row(entry: &PesticideEntry, cx: &Context<SchedulePage>) -> gpui::Div {
    div()
        .p_2()
        .flex()
        .flex_col()
        .gap_1()
        .child(
            div()
                .flex()
                .justify_between()
                .child(
                    div()
                        .child(format!("{} for {}", entry.name, entry.target))
                        .font_semibold(),
                )
                .child(format_date(entry.date)),
        )
        .child(format!("Dosage: {}", entry.dosage))
        .child(
            div()
                .text_sm()
                .text_color(cx.theme().warning)
                .child(entry.safety_guidelines.clone()),
        )
}

impl Render for SchedulePage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).catalog.clone();
        let today = Local::now().date_naive();
        let upcoming: Vec<_> = catalog
            .upcoming_sprays(today)
            .map(|entry| spray_row(entry, cx))
            .collect();
        let past: Vec<_> = catalog
            .past_sprays(today)
            .map(|entry| spray_row(entry, cx).opacity(0.6))
            .collect();

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Spray schedule").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Upcoming").text_xl().font_bold())
                    .when(upcoming.is_empty(), |this| this.child("Nothing scheduled."))
                    .children(upcoming),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Completed").text_xl().font_bold())
                    .when(past.is_empty(), |this| this.child("No past applications."))
                    .children(past),
            )
    }
}
