use std::{collections::HashMap, sync::Arc};

use agrisync_bridge::{config::Config, farm::FarmCatalog};
use agrisync_health::{GeminiClient, PlantHealthAnalyzer};

use crate::store::NotificationStore;

/// Analyzer bound to the production inference service.
pub type Analyzer = PlantHealthAnalyzer<GeminiClient>;

/// The core application state that holds configuration, the notification log,
/// the farm catalog and other shared resources.
///
/// It is designed to be wrapped in thread-safe, async-friendly concurrency
/// primitives (see [`SharedState`]) to allow safe concurrent reads and
/// occasional writes from multiple tasks.
pub struct State {
    /// The loaded application configuration.
    pub config: Config,
    /// Inference client built once at startup and cloned into every analyzer.
    pub inference_client: GeminiClient,
    pub notifications: NotificationStore,
    pub catalog: FarmCatalog,
    /// One analyzer per crop-detail session, keyed by crop id. Created on the
    /// first analysis request for that crop.
    pub analyzers: HashMap<String, Arc<Analyzer>>,
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
pub type SharedState = Arc<tokio::sync::RwLock<State>>;
