//! Role and location of the current session.

use agrisync_bridge::access::{Location, Resolution, Role, landing, resolve};

#[derive(Debug, Clone)]
pub struct SessionEntity {
    role: Role,
    path: String,
}

impl Default for SessionEntity {
    fn default() -> Self {
        Self::new(Role::default())
    }
}

impl SessionEntity {
    pub fn new(role: Role) -> Self {
        let path = landing(role)
            .map(|location| location.path())
            .unwrap_or_else(|| Location::Dashboard.path());
        Self { role, path }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// What the current path resolves to for the current role.
    pub fn resolution(&self) -> Resolution {
        resolve(self.role, &self.path)
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn navigate_to(&mut self, location: &Location) {
        self.path = location.path();
    }

    /// Switches the role. A page the new role may not see is replaced by the
    /// role's landing page.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        if let Resolution::Forbidden(_) = self.resolution() {
            if let Some(location) = landing(role) {
                log::debug!("Page {} is hidden from {role}, redirecting", self.path);
                self.path = location.path();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use agrisync_bridge::access::RouteId;

    use super::*;

    #[test]
    fn starts_on_the_landing_page_of_the_role() {
        assert_eq!(SessionEntity::new(Role::Admin).path(), "/");
        assert_eq!(SessionEntity::new(Role::Worker).path(), "/crops");
    }

    #[test]
    fn losing_access_redirects_to_landing() {
        let mut session = SessionEntity::new(Role::Admin);
        session.navigate("/analytics");
        assert_eq!(session.resolution(), Resolution::Permitted(Location::Analytics));

        session.set_role(Role::Supervisor);
        assert_eq!(session.path(), "/");
        session.set_role(Role::Worker);
        assert_eq!(session.resolution(), Resolution::Permitted(Location::Crops));
    }

    #[test]
    fn visible_page_survives_a_role_change() {
        let mut session = SessionEntity::new(Role::Admin);
        session.navigate_to(&Location::CropDetail("C3".into()));

        session.set_role(Role::Worker);
        assert_eq!(
            session.resolution(),
            Resolution::Permitted(Location::CropDetail("C3".into()))
        );
    }

    #[test]
    fn direct_navigation_is_still_guarded() {
        let mut session = SessionEntity::new(Role::Worker);
        session.navigate("/workers");
        assert_eq!(session.resolution(), Resolution::Forbidden(RouteId::Workers));

        session.navigate("/weather");
        assert_eq!(session.resolution(), Resolution::NotFound);
    }
}
