use agrisync_bridge::farm::{FarmCatalog, WeatherCondition, WeatherDay};
use chrono::Local;
use gpui::{
    AnyElement, Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, StyledExt,
    group_box::{GroupBox, GroupBoxVariants},
};

use crate::{
    components::info_row::InfoRow,
    entities::{DataEntities, catalog_entity::CatalogEntity},
    formatting::format_weekday,
};

pub struct DashboardPage {
    catalog: Entity<CatalogEntity>,
}

impl DashboardPage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        Self {
            catalog: data.catalog.clone(),
        }
    }
}

fn condition_label(condition: WeatherCondition) -> &'static str {
    match condition {
        WeatherCondition::Sunny => "Sunny",
        WeatherCondition::Cloudy => "Cloudy",
        WeatherCondition::Rain => "Rain",
        WeatherCondition::Storm => "Storm",
    }
}

fn field_map(catalog: &FarmCatalog, cx: &Context<DashboardPage>) -> AnyElement {
    let cards = catalog.fields.iter().map(|field| {
        let crop = field
            .crop_id
            .as_deref()
            .and_then(|id| catalog.crop(id))
            .map(|crop| crop.name.clone())
            .unwrap_or_else(|| "Fallow".to_owned());
        let worker = field
            .worker_id
            .as_deref()
            .and_then(|id| catalog.worker(id))
            .map(|worker| worker.name.clone())
            .unwrap_or_else(|| "Unassigned".to_owned());

        div()
            .flex_1()
            .p_3()
            .flex()
            .flex_col()
            .gap_1()
            .border_1()
            .border_color(cx.theme().border)
            .rounded_md()
            .child(div().child(field.name.clone()).font_semibold())
            .child(crop)
            .child(
                div()
                    .text_sm()
                    .text_color(cx.theme().muted_foreground)
                    .child(worker),
            )
    });

    div().flex().gap_3().children(cards).into_any_element()
}

fn weather_strip(forecast: &[WeatherDay], cx: &Context<DashboardPage>) -> AnyElement {
    let days = forecast.iter().map(|day| {
        div()
            .flex_1()
            .p_2()
            .flex()
            .flex_col()
            .items_center()
            .rounded_md()
            .when(day.is_severe(), |this| this.bg(cx.theme().muted))
            .child(div().child(format_weekday(day.date)).font_semibold())
            .child(condition_label(day.condition))
            .child(format!("{:.0}°C", day.temp))
            .child(
                div()
                    .text_xs()
                    .text_color(cx.theme().muted_foreground)
                    .child(format!("{:.0} mm · {:.0} km/h", day.rainfall, day.wind)),
            )
    });

    let warning = forecast
        .iter()
        .find(|day| day.is_severe())
        .map(|day| format!("Severe weather expected on {}.", format_weekday(day.date)));

    div()
        .flex()
        .flex_col()
        .gap_2()
        .child(div().flex().gap_2().children(days))
        .when_some(warning, |this, warning| {
            this.child(div().text_color(cx.theme().warning).child(warning))
        })
        .into_any_element()
}

impl Render for DashboardPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).catalog.clone();
        let today = Local::now().date_naive();
        let present = catalog
            .attendance_on(today)
            .filter(|record| record.check_out.is_none())
            .count();
        let recorded = catalog.attendance_on(today).count();
        let at_risk = catalog
            .crops
            .iter()
            .filter(|crop| crop.health_status != agrisync_bridge::farm::HealthStatus::Healthy)
            .count();

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Dashboard").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Field map").text_xl().font_bold())
                    .child(field_map(&catalog, cx)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Weather").text_xl().font_bold())
                    .child(weather_strip(&catalog.forecast, cx)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Today").text_xl().font_bold())
                    .child(InfoRow::new().label("Workers on site").child(format!(
                        "{present} of {}",
                        catalog.workers.len()
                    )))
                    .child(InfoRow::new().label("Attendance records").child(recorded.to_string()))
                    .child(InfoRow::new().label("Crops needing attention").child(at_risk.to_string())),
            )
    }
}
