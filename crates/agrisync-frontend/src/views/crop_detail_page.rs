use std::path::PathBuf;

use agrisync_bridge::{
    access::Location,
    farm::{Crop, Severity},
};
use gpui::{
    AnyElement, Context, Entity, IntoElement, ParentElement, PathPromptOptions, Render, Styled,
    Window, div, prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Disableable, IconName, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
};

use crate::{
    BackendBridge,
    components::{analysis_card::AnalysisCard, health_badge::HealthBadge, info_row::InfoRow},
    entities::{
        DataEntities, analysis_entity::AnalysisEntity, catalog_entity::CatalogEntity,
        session_entity::SessionEntity,
    },
    formatting::format_date,
};

pub struct CropDetailPage {
    crop_id: String,
    catalog: Entity<CatalogEntity>,
    analyses: Entity<AnalysisEntity>,
    session: Entity<SessionEntity>,
}

impl CropDetailPage {
    pub fn new(
        data: &DataEntities,
        crop_id: String,
        _: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        cx.observe(&data.analyses, |_, _, cx| cx.notify()).detach();
        Self {
            crop_id,
            catalog: data.catalog.clone(),
            analyses: data.analyses.clone(),
            session: data.session.clone(),
        }
    }

    fn pick_image(&mut self, cx: &mut Context<Self>) {
        let paths = cx.prompt_for_paths(PathPromptOptions {
            files: true,
            directories: false,
            multiple: false,
            prompt: Some("Select a leaf photo".into()),
        });

        cx.spawn(async move |this, cx| {
            let path = match paths.await {
                Ok(Ok(Some(paths))) => paths.into_iter().next(),
                Ok(Ok(None)) => None,
                Ok(Err(error)) => {
                    log::warn!("File picker failed: {error}");
                    None
                }
                Err(_) => None,
            };
            let Some(path) = path else {
                return;
            };

            let _ = this.update(cx, |this, cx| this.select_image(path, cx));
        })
        .detach();
    }

    fn select_image(&mut self, path: PathBuf, cx: &mut Context<Self>) {
        log::debug!("Selected image {path:?} for crop {}", self.crop_id);
        let crop_id = self.crop_id.clone();
        self.analyses.update(cx, |analyses, cx| {
            analyses.select_image(&crop_id, path);
            cx.notify();
        });

        let bridge = cx.global::<BackendBridge>().clone();
        cx.spawn(async move |_, _| bridge.reset_analysis(crop_id).await)
            .detach();
    }

    fn analyze(&mut self, cx: &mut Context<Self>) {
        let image = self.analyses.read(cx).get(&self.crop_id).selected_image;
        let crop_id = self.crop_id.clone();
        let bridge = cx.global::<BackendBridge>().clone();
        cx.spawn(async move |_, _| bridge.analyze_plant_image(crop_id, image).await)
            .detach();
    }
}

fn log_section(title: &'static str, empty: &'static str, rows: Vec<String>) -> GroupBox {
    let is_empty = rows.is_empty();
    GroupBox::new()
        .outline()
        .child(div().child(title).text_xl().font_bold())
        .when(is_empty, |this| this.child(empty))
        .children(rows)
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
    }
}

fn crop_logs(crop: &Crop) -> Vec<AnyElement> {
    vec![
        log_section(
            "Photos",
            "No photos yet.",
            crop.photos
                .iter()
                .map(|photo| format!("{} · {}", format_date(photo.date), photo.url))
                .collect(),
        )
        .into_any_element(),
        log_section(
            "Disease log",
            "No diseases recorded.",
            crop.disease_log
                .iter()
                .map(|entry| {
                    format!(
                        "{} · {} ({} severity) · {}",
                        format_date(entry.date),
                        entry.symptoms,
                        severity_label(entry.severity),
                        entry.treatment
                    )
                })
                .collect(),
        )
        .into_any_element(),
        log_section(
            "Fertilizer log",
            "No fertilizer applied.",
            crop.fertilizer_log
                .iter()
                .map(|entry| {
                    format!(
                        "{} · {} · {} kg",
                        format_date(entry.date),
                        entry.fertilizer,
                        entry.amount_kg
                    )
                })
                .collect(),
        )
        .into_any_element(),
        log_section(
            "Water log",
            "No irrigation recorded.",
            crop.water_log
                .iter()
                .map(|entry| {
                    format!(
                        "{} · {} L over {} min",
                        format_date(entry.date),
                        entry.amount_liters,
                        entry.duration_minutes
                    )
                })
                .collect(),
        )
        .into_any_element(),
    ]
}

impl Render for CropDetailPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog_state = self.catalog.read(cx);
        let loaded = catalog_state.loaded;
        let crop = catalog_state.catalog.crop(&self.crop_id).cloned();
        let field = crop
            .as_ref()
            .and_then(|crop| catalog_state.catalog.field(&crop.field_id))
            .map(|field| field.name.clone());

        let session = self.session.clone();
        let back = Button::new("back-to-crops")
            .ghost()
            .icon(IconName::ArrowLeft)
            .label("All crops")
            .on_click(move |_, _, cx| {
                session.update(cx, |session, cx| {
                    session.navigate_to(&Location::Crops);
                    cx.notify();
                });
            });

        let Some(crop) = crop else {
            let message = if loaded {
                format!("Crop {} does not exist.", self.crop_id)
            } else {
                "Loading crop...".to_owned()
            };
            return div()
                .flex()
                .flex_col()
                .gap_3()
                .child(back)
                .child(message);
        };

        let analysis = self.analyses.read(cx).get(&self.crop_id);
        let selected = analysis
            .selected_image
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No image selected".to_owned());
        let busy = analysis.state.is_busy();

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(back)
            .child(
                div()
                    .flex()
                    .items_center()
                    .gap_3()
                    .child(div().child(crop.name.clone()).text_2xl().font_bold())
                    .child(HealthBadge(crop.health_status)),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(InfoRow::new().label("Type").child(crop.crop_type.clone()))
                    .child(
                        InfoRow::new()
                            .label("Field")
                            .child(field.unwrap_or_else(|| crop.field_id.clone())),
                    )
                    .child(InfoRow::new().label("Sown").child(format_date(crop.sow_date)))
                    .child(
                        InfoRow::new()
                            .label("Expected harvest")
                            .child(format_date(crop.harvest_date)),
                    ),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("AI disease detection").text_xl().font_bold())
                    .child(
                        div()
                            .flex()
                            .items_center()
                            .gap_3()
                            .child(
                                Button::new("pick-image")
                                    .icon(IconName::FolderOpen)
                                    .label("Choose photo")
                                    .disabled(busy)
                                    .on_click(cx.listener(|this, _, _, cx| this.pick_image(cx))),
                            )
                            .child(
                                div()
                                    .flex_1()
                                    .text_color(cx.theme().muted_foreground)
                                    .child(selected),
                            )
                            .child(
                                Button::new("analyze-image")
                                    .primary()
                                    .icon(IconName::Search)
                                    .label("Analyze")
                                    .loading(busy)
                                    .disabled(busy)
                                    .on_click(cx.listener(|this, _, _, cx| this.analyze(cx))),
                            ),
                    )
                    .child(AnalysisCard::new(analysis)),
            )
            .children(crop_logs(&crop))
    }
}
