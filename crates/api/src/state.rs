use std::sync::Arc;

use pagesmith_ai::RewriteEngine;
use pagesmith_db::ProjectStore;
use pagesmith_pipeline::{JobSubmitter, PipelineConfig};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: every field is behind an `Arc` or is itself an
/// `Arc`-backed handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    /// Hands freshly created projects to the pipeline.
    pub submitter: Arc<dyn JobSubmitter>,
    pub rewrite: RewriteEngine,
    pub config: Arc<ServerConfig>,
    pub pipeline: Arc<PipelineConfig>,
}
