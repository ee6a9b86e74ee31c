use agrisync_bridge::access::Role;
use chrono::Local;
use gpui::{
    Context, Entity, IntoElement, ParentElement, Render, Styled, Window, div,
    prelude::FluentBuilder,
};
use gpui_component::{
    ActiveTheme, Sizable, StyledExt,
    button::{Button, ButtonVariants},
    group_box::{GroupBox, GroupBoxVariants},
};

use crate::{
    BackendBridge,
    entities::{DataEntities, catalog_entity::CatalogEntity, session_entity::SessionEntity},
    formatting::{format_shift, format_time},
};

pub struct WorkersPage {
    catalog: Entity<CatalogEntity>,
    session: Entity<SessionEntity>,
}

impl WorkersPage {
    pub fn new(data: &DataEntities, cx: &mut Context<Self>) -> Self {
        cx.observe(&data.catalog, |_, _, cx| cx.notify()).detach();
        cx.observe(&data.session, |_, _, cx| cx.notify()).detach();
        Self {
            catalog: data.catalog.clone(),
            session: data.session.clone(),
        }
    }
}

fn attendance_button(index: usize, worker_id: String, checked_in: bool) -> Button {
    let button = Button::new(("attendance", index)).small();
    let button = if checked_in {
        button.label("Check out")
    } else {
        button.primary().label("Check in")
    };

    button.on_click(move |_, _, cx| {
        let bridge = cx.global::<BackendBridge>().clone();
        let worker_id = worker_id.clone();
        cx.spawn(async move |_| {
            if checked_in {
                bridge.check_out_worker(worker_id).await;
            } else {
                bridge.check_in_worker(worker_id).await;
            }
        })
        .detach();
    })
}

impl Render for WorkersPage {
    fn render(&mut self, _: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let catalog = self.catalog.read(cx).catalog.clone();
        let can_manage = self.session.read(cx).role() != Role::Worker;
        let today = Local::now().date_naive();

        let roster = catalog.workers.iter().enumerate().map(|(index, worker)| {
            let field = worker
                .assigned_field_id
                .as_deref()
                .and_then(|id| catalog.field(id))
                .map(|field| field.name.clone())
                .unwrap_or_else(|| "No field".to_owned());
            let open = catalog.open_attendance(&worker.id);
            let status = match open {
                Some(record) => format!("On site since {}", format_time(record.check_in)),
                None => "Off site".to_owned(),
            };

            div()
                .p_2()
                .flex()
                .items_center()
                .justify_between()
                .gap_4()
                .child(
                    div()
                        .flex()
                        .flex_col()
                        .child(div().child(worker.name.clone()).font_semibold())
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().muted_foreground)
                                .child(format!("{} · {field}", worker.role.label())),
                        ),
                )
                .child(div().flex_1().child(status))
                .when(can_manage, |this| {
                    this.child(attendance_button(index, worker.id.clone(), open.is_some()))
                })
        });

        let attendance = catalog.attendance_on(today).map(|record| {
            let name = catalog
                .worker(&record.worker_id)
                .map(|worker| worker.name.clone())
                .unwrap_or_else(|| record.worker_id.clone());
            let shift = match record.check_out {
                Some(check_out) => format!(
                    "{} – {} ({})",
                    format_time(record.check_in),
                    format_time(check_out),
                    format_shift(record.check_in, check_out)
                ),
                None => format!("{} – still on site", format_time(record.check_in)),
            };

            div()
                .flex()
                .justify_between()
                .child(div().child(name).font_semibold())
                .child(record.task.clone())
                .child(shift)
        });

        div()
            .size_full()
            .flex()
            .flex_col()
            .gap_6()
            .child(div().child("Workers").text_2xl().font_bold())
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Roster").text_xl().font_bold())
                    .children(roster),
            )
            .child(
                GroupBox::new()
                    .outline()
                    .child(div().child("Today's attendance").text_xl().font_bold())
                    .children(attendance),
            )
    }
}
