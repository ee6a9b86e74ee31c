mod analytics_page;
mod crop_detail_page;
mod crops_page;
mod dashboard_page;
mod schedule_page;
mod status_page;
mod workers_page;

use agrisync_bridge::access::{Location, Resolution, Role, RouteId, navigation};
use gpui::{
    AnyView, AppContext, Context, Entity, IntoElement, ParentElement, Render, SharedString,
    Styled, Window, div,
};
use gpui_component::{
    ActiveTheme, IconName, IndexPath, Root, Side, StyledExt,
    select::{Select, SelectEvent, SelectItem, SelectState},
    sidebar::{Sidebar, SidebarGroup, SidebarHeader, SidebarMenu, SidebarMenuItem},
};

use crate::{
    BackendBridge,
    components::notification_panel::NotificationPanel,
    entities::DataEntities,
    views::{
        analytics_page::AnalyticsPage, crop_detail_page::CropDetailPage, crops_page::CropsPage,
        dashboard_page::DashboardPage, schedule_page::SchedulePage, status_page::StatusPage,
        workers_page::WorkersPage,
    },
};

#[derive(Debug, Clone)]
struct RoleItem {
    role: Role,
    title: SharedString,
}

impl RoleItem {
    fn new(role: Role) -> Self {
        Self {
            role,
            title: role.as_str().into(),
        }
    }
}

impl SelectItem for RoleItem {
    type Value = Role;

    fn title(&self) -> SharedString {
        self.title.clone()
    }

    fn value(&self) -> &Self::Value {
        &self.role
    }
}

fn role_index(role: Role) -> Option<IndexPath> {
    Role::ALL
        .iter()
        .position(|candidate| *candidate == role)
        .map(IndexPath::new)
}

fn route_icon(route: RouteId) -> IconName {
    match route {
        RouteId::Dashboard => IconName::LayoutDashboard,
        RouteId::Crops | RouteId::CropDetail => IconName::Inbox,
        RouteId::Workers => IconName::User,
        RouteId::Schedule => IconName::Calendar,
        RouteId::Analytics => IconName::ChartPie,
    }
}

/// Composition root: role selector, role-filtered navigation and the page the
/// session currently resolves to.
pub struct FrontendUi {
    data: DataEntities,
    role_selector: Entity<SelectState<Vec<RoleItem>>>,
    notification_panel: Entity<NotificationPanel>,
    active_resolution: Resolution,
    active_page_view: AnyView,
}

impl FrontendUi {
    pub fn new(data: &DataEntities, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let role = data.session.read(cx).role();
        let role_selector = cx.new(|cx| {
            let roles: Vec<RoleItem> = Role::ALL.into_iter().map(RoleItem::new).collect();
            SelectState::new(roles, role_index(role), window, cx)
        });

        let session = data.session.clone();
        cx.subscribe_in(&role_selector, window, move |_, _, event, _, cx| match event {
            SelectEvent::Confirm(value) => {
                if let Some(role) = value {
                    let role = *role;
                    session.update(cx, |session, cx| {
                        session.set_role(role);
                        cx.notify();
                    });
                }
            }
        })
        .detach();

        cx.observe_in(&data.session, window, |this, _, window, cx| {
            this.sync_role_selector(window, cx);
            this.sync_page(window, cx);
        })
        .detach();

        let resolution = data.session.read(cx).resolution();
        let active_page_view = Self::build_page(data, &resolution, window, cx);
        let notification_panel = cx.new(|cx| NotificationPanel::new(data, cx));

        Self {
            data: data.clone(),
            role_selector,
            notification_panel,
            active_resolution: resolution,
            active_page_view,
        }
    }

    fn build_page(
        data: &DataEntities,
        resolution: &Resolution,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> AnyView {
        match resolution {
            Resolution::Permitted(Location::Dashboard) => {
                cx.new(|cx| DashboardPage::new(data, cx)).into()
            }
            Resolution::Permitted(Location::Crops) => cx.new(|cx| CropsPage::new(data, cx)).into(),
            Resolution::Permitted(Location::CropDetail(crop_id)) => cx
                .new(|cx| CropDetailPage::new(data, crop_id.clone(), window, cx))
                .into(),
            Resolution::Permitted(Location::Workers) => {
                cx.new(|cx| WorkersPage::new(data, cx)).into()
            }
            Resolution::Permitted(Location::Schedule) => {
                cx.new(|cx| SchedulePage::new(data, cx)).into()
            }
            Resolution::Permitted(Location::Analytics) => {
                cx.new(|cx| AnalyticsPage::new(data, cx)).into()
            }
            Resolution::Forbidden(route) => cx
                .new(|cx| StatusPage::forbidden(data, *route, cx))
                .into(),
            Resolution::NotFound => cx.new(|cx| StatusPage::not_found(data, cx)).into(),
        }
    }

    fn sync_role_selector(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let role = self.data.session.read(cx).role();
        let shown = self.role_selector.read(cx).selected_value().copied();
        if shown != Some(role) {
            self.role_selector.update(cx, |state, cx| {
                state.set_selected_index(role_index(role), window, cx);
            });
        }
    }

    /// Rebuilds the page when the session resolves to a different location.
    fn sync_page(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let resolution = self.data.session.read(cx).resolution();
        if resolution == self.active_resolution {
            return;
        }

        if let Resolution::Permitted(Location::CropDetail(crop_id)) = &self.active_resolution {
            self.leave_crop_detail(crop_id.clone(), cx);
        }

        log::debug!("Switching page to {resolution:?}");
        self.active_page_view = Self::build_page(&self.data, &resolution, window, cx);
        self.active_resolution = resolution;
        cx.notify();
    }

    fn leave_crop_detail(&self, crop_id: String, cx: &mut Context<Self>) {
        self.data.analyses.update(cx, |analyses, cx| {
            analyses.clear(&crop_id);
            cx.notify();
        });
        let bridge = cx.global::<BackendBridge>().clone();
        cx.spawn(async move |_, _| bridge.reset_analysis(crop_id).await)
            .detach();
    }

    fn active_route(&self) -> Option<RouteId> {
        match &self.active_resolution {
            Resolution::Permitted(location) => Some(location.route()),
            _ => None,
        }
    }
}

impl Render for FrontendUi {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let notification_layer = Root::render_notification_layer(window, cx);
        let role = self.data.session.read(cx).role();
        let active_route = self.active_route();
        let session = self.data.session.clone();
        let on_navigate = |location: Location| {
            let session = session.clone();
            move |_: &gpui::ClickEvent, _: &mut Window, cx: &mut gpui::App| {
                session.update(cx, |session, cx| {
                    session.navigate_to(&location);
                    cx.notify();
                });
            }
        };

        let menu = navigation(role).fold(SidebarMenu::new(), |menu, route| {
            let Some(location) = Location::of(route.id) else {
                return menu;
            };
            menu.child(
                SidebarMenuItem::new(route.label)
                    .active(active_route == Some(route.id))
                    .icon(route_icon(route.id))
                    .on_click(on_navigate(location)),
            )
        });

        div()
            .flex()
            .size_full()
            .child(
                Sidebar::new(Side::Left)
                    .header(SidebarHeader::new().child("AgriSync"))
                    .child(SidebarGroup::new("Navigation").child(menu)),
            )
            .child(
                div()
                    .p_5()
                    .size_full()
                    .flex()
                    .flex_col()
                    .gap_4()
                    .child(
                        div()
                            .flex()
                            .justify_between()
                            .items_start()
                            .child(
                                div()
                                    .flex()
                                    .items_center()
                                    .gap_2()
                                    .child(
                                        div()
                                            .text_sm()
                                            .text_color(cx.theme().muted_foreground)
                                            .font_semibold()
                                            .child("Role"),
                                    )
                                    .child(div().w_48().child(Select::new(&self.role_selector))),
                            )
                            .child(self.notification_panel.clone()),
                    )
                    .child(div().flex_1().child(self.active_page_view.clone())),
            )
            .children(notification_layer)
    }
}
