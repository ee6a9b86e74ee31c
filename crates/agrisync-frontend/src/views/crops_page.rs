use agrisync_bridge::access::Location;
use gpui::{Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div};
use gpui_component::{
    ActiveTheme, Sizable, StyledExt,
    button::{Button, ButtonVariants},
};

use crate::{
    components::health_badge::HealthBadge,
    entities::{DataEntities, catalog_entity::CatalogEntity, session_entity::SessionEntity},
    formatting::format_date,
};

pub struct CropsPage {
    catalog: Entity<CatalogEntity>,
    session: Entity<SessionEntity>,
}

impl CropsPage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        Self {
            catalog: data.catalog.clone(),
            session: data.session.clone(),
        }
    }
}

impl Render for CropsPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).catalog.clone();

        let rows = catalog.crops.iter().enumerate().map(|(index, crop)| {
            let field = catalog
                .field(&crop.field_id)
                .map(|field| field.name.clone())
                .unwrap_or_else(|| crop.field_id.clone());
            let session = self.session.clone();
            let location = Location::CropDetail(crop.id.clone());

            div()
                .p_3()
                .flex()
                .items_center()
                .justify_between()
                .gap_4()
                .border_1()
                .border_color(cx.theme().border)
                .rounded_md()
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .child(
                            div()
                                .flex()
                                .gap_2()
                                .child(div().child(crop.name.clone()).font_semibold())
                                .child(HealthBadge(crop.health_status)),
                        )
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child(format!(
                                    "{} · {field} · sown {} · harvest {}",
                                    crop.crop_type,
                                    format_date(crop.sow_date),
                                    format_date(crop.harvest_date)
                                )),
                        ),
                )
                .child(
                    Button::new(("open-crop", index))
                        .ghost()
                        .small()
                        .label("Details")
                        .on_click(move |_, _, cx| {
                            session.update(cx, |session, cx| {
                                session.navigate_to(&location);
                                cx.notify();
                            });
                        }),
                )
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_3()
            .child(div().child("Crops").text_2xl().font_bold())
            .children(rows)
    }
}
