use agrisync_bridge::farm::FarmCatalog;
use gpui::{AppContext, Entity};

#[derive(Debug, Clone, Default)]
pub struct CatalogEntity {
    pub catalog: FarmCatalog,
    pub loaded: bool,
}

impl CatalogEntity {
    pub fn update<C: AppContext>(entity: &Entity<Self>, catalog: FarmCatalog, cx: &mut C) {
        let _ = entity.update(cx, |this, cx| {
            this.catalog = catalog;
            this.loaded = true;
            cx.notify();
        });
    }
}
