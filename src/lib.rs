pub mod analytics;
pub mod config;
pub mod extract;
pub mod intelligence;
pub mod rest;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use config::ServerConfig;
use extract::Extractor;
use storage::TaskStore;

/// Shared application state passed to every REST handler.
///
/// Built once at startup — there is no global mutable state anywhere in
/// the crate; every component receives what it needs from here.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub store: Arc<TaskStore>,
    /// The model collaborator. Behind a trait so tests can swap in a
    /// canned extractor.
    pub extractor: Arc<dyn Extractor>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(
        config: Arc<ServerConfig>,
        store: Arc<TaskStore>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            config,
            store,
            extractor,
            started_at: std::time::Instant::now(),
        }
    }
}
