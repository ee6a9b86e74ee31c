use gpui::Entity;

pub mod analysis_entity;
pub mod catalog_entity;
pub mod notifications_entity;
pub mod session_entity;
pub mod settings_entity;

/// Application state shared by every page, created once at the composition
/// root.
#[derive(Debug, Clone)]
pub struct DataEntities {
    pub settings: Entity<settings_entity::SettingsEntity>,
    pub session: Entity<session_entity::SessionEntity>,
    pub notifications: Entity<notifications_entity::NotificationsEntity>,
    pub catalog: Entity<catalog_entity::CatalogEntity>,
    pub analyses: Entity<analysis_entity::AnalysisEntity>,
}
