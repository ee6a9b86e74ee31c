//! Role-based access to the application's views.
//!
//! The table in [`ROUTES`] is the single source of truth for which role may
//! reach which page. Both the navigation bar and the page router consult it,
//! so a route hidden from the navigation can never be rendered either.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Access level of the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    #[default]
    Admin,
    Supervisor,
    Worker,
}

impl Role {
    /// All roles in the order they are offered by the role selector.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Supervisor, Role::Worker];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Supervisor => "Supervisor",
            Role::Worker => "Worker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name does not match any known [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}

/// Identifier of a page the router knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Dashboard,
    Crops,
    CropDetail,
    Workers,
    Schedule,
    Analytics,
}

/// Static description of one routable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub id: RouteId,
    /// Navigation label.
    pub label: &'static str,
    /// Path pattern; `:id` marks a parameter segment.
    pub path: &'static str,
    /// Whether the route is listed in the navigation bar. Parameterized pages
    /// are reached from other pages only.
    pub in_navigation: bool,
    allowed: &'static [Role],
}

impl RouteDescriptor {
    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }
}

const ALL_ROLES: &[Role] = &[Role::Admin, Role::Supervisor, Role::Worker];
const STAFF: &[Role] = &[Role::Admin, Role::Supervisor];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Every route of the application, in navigation order.
pub static ROUTES: [RouteDescriptor; 6] = [
    RouteDescriptor {
        id: RouteId::Dashboard,
        label: "Dashboard",
        path: "/",
        in_navigation: true,
        allowed: STAFF,
    },
    RouteDescriptor {
        id: RouteId::Crops,
        label: "Crops",
        path: "/crops",
        in_navigation: true,
        allowed: ALL_ROLES,
    },
    RouteDescriptor {
        id: RouteId::CropDetail,
        label: "Crop details",
        path: "/crop/:id",
        in_navigation: false,
        allowed: ALL_ROLES,
    },
    RouteDescriptor {
        id: RouteId::Workers,
        label: "Workers",
        path: "/workers",
        in_navigation: true,
        allowed: STAFF,
    },
    RouteDescriptor {
        id: RouteId::Schedule,
        label: "Schedule",
        path: "/schedule",
        in_navigation: true,
        allowed: STAFF,
    },
    RouteDescriptor {
        id: RouteId::Analytics,
        label: "Analytics",
        path: "/analytics",
        in_navigation: true,
        allowed: ADMIN_ONLY,
    },
];

/// Returns the routes the given role may reach, in navigation order.
pub fn visible_routes(role: Role) -> Vec<&'static RouteDescriptor> {
    ROUTES.iter().filter(|route| route.allows(role)).collect()
}

/// Same as [`visible_routes`] for a role given by name. Unknown names see
/// nothing.
pub fn visible_routes_by_name(role: &str) -> Vec<&'static RouteDescriptor> {
    match role.parse::<Role>() {
        Ok(role) => visible_routes(role),
        Err(_) => Vec::new(),
    }
}

/// Routes shown in the navigation bar for the given role.
pub fn navigation(role: Role) -> impl Iterator<Item = &'static RouteDescriptor> {
    visible_routes(role)
        .into_iter()
        .filter(|route| route.in_navigation)
}

pub fn descriptor(id: RouteId) -> &'static RouteDescriptor {
    match id {
        RouteId::Dashboard => &ROUTES[0],
        RouteId::Crops => &ROUTES[1],
        RouteId::CropDetail => &ROUTES[2],
        RouteId::Workers => &ROUTES[3],
        RouteId::Schedule => &ROUTES[4],
        RouteId::Analytics => &ROUTES[5],
    }
}

pub fn is_route_visible(role: Role, id: RouteId) -> bool {
    descriptor(id).allows(role)
}

/// Concrete location inside the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Dashboard,
    Crops,
    CropDetail(String),
    Workers,
    Schedule,
    Analytics,
}

impl Location {
    pub fn route(&self) -> RouteId {
        match self {
            Location::Dashboard => RouteId::Dashboard,
            Location::Crops => RouteId::Crops,
            Location::CropDetail(_) => RouteId::CropDetail,
            Location::Workers => RouteId::Workers,
            Location::Schedule => RouteId::Schedule,
            Location::Analytics => RouteId::Analytics,
        }
    }

    /// Location of a parameterless route. `CropDetail` has no default
    /// location and yields `None`.
    pub fn of(id: RouteId) -> Option<Self> {
        match id {
            RouteId::Dashboard => Some(Location::Dashboard),
            RouteId::Crops => Some(Location::Crops),
            RouteId::CropDetail => None,
            RouteId::Workers => Some(Location::Workers),
            RouteId::Schedule => Some(Location::Schedule),
            RouteId::Analytics => Some(Location::Analytics),
        }
    }

    /// Parses an application path such as `/crop/C1`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Location::Dashboard),
            ["crops"] => Some(Location::Crops),
            ["crop", id] => Some(Location::CropDetail((*id).to_owned())),
            ["workers"] => Some(Location::Workers),
            ["schedule"] => Some(Location::Schedule),
            ["analytics"] => Some(Location::Analytics),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Location::CropDetail(id) => format!("/crop/{id}"),
            other => descriptor(other.route()).path.to_owned(),
        }
    }
}

/// Outcome of routing a path for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Permitted(Location),
    Forbidden(RouteId),
    NotFound,
}

/// Resolves `path` for `role`, denying routes outside [`visible_routes`].
pub fn resolve(role: Role, path: &str) -> Resolution {
    match Location::parse(path) {
        Some(location) if is_route_visible(role, location.route()) => {
            Resolution::Permitted(location)
        }
        Some(location) => Resolution::Forbidden(location.route()),
        None => Resolution::NotFound,
    }
}

/// Where to send a session whose role can no longer see its current page.
pub fn landing(role: Role) -> Option<Location> {
    navigation(role).find_map(|route| Location::of(route.id))
}
