use agrisync_bridge::config::Config;
use gpui::{AppContext, Entity};

#[derive(Debug, Clone, Default)]
pub struct SettingsEntity {
    pub config: Config,
    /// Set once the backend answered the configuration request.
    pub loaded: bool,
}

impl SettingsEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, config: Config, cx: &mut C) {
        let _ = entity.update(cx, |this, cx| {
            this.config = config;
            this.loaded = true;
            cx.notify();
        });
    }
}
