use pagesmith_core::error::CoreError;
use pagesmith_db::StoreError;

/// Errors returned by pipeline entry points.
///
/// Failures inside the pipeline steps never show up here: they are
/// recorded on the project as `status = error`.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// Failure to hand a project to the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Could not queue pipeline job: {0}")]
    Store(#[from] StoreError),

    #[error("Pipeline is shutting down")]
    ShuttingDown,
}

/// Content synthesis failed.
#[derive(Debug, thiserror::Error)]
#[error("Content synthesis failed: {0}")]
pub struct SynthesisError(pub String);
