//! The pipeline state machine.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use pagesmith_brand::{BrandExtractor, ExtractError};
use pagesmith_core::error::CoreError;
use pagesmith_core::project::{Project, ProjectStatus};
use pagesmith_core::templates::select_template;
use pagesmith_core::types::DbId;
use pagesmith_db::{ProjectStore, StoreError};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, SynthesisError};
use crate::synthesizer::ContentSynthesizer;

/// Result of one `run_pipeline` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The project moved to `ready` with the resolved template.
    Ready { template_key: String },
    /// A step failed and the project moved to `error`.
    Failed { message: String },
    /// The project was not `pending`; nothing was done.
    Skipped { status: ProjectStatus },
}

/// A failure inside steps 2-5, recorded on the project.
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error("Brand extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("Synthesized content is incomplete: {}", .0.join(", "))]
    Incomplete(Vec<String>),

    #[error("Could not persist pipeline output: {0}")]
    Persist(#[from] StoreError),
}

/// Runs the generation pipeline for one project at a time.
///
/// The orchestrator holds no per-project state; concurrent runs for
/// different projects are independent.
pub struct Orchestrator {
    store: Arc<dyn ProjectStore>,
    extractor: Arc<dyn BrandExtractor>,
    synthesizer: Arc<dyn ContentSynthesizer>,
    config: PipelineConfig,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        extractor: Arc<dyn BrandExtractor>,
        synthesizer: Arc<dyn ContentSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            extractor,
            synthesizer,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Drive a `pending` project to `ready` or `error`.
    ///
    /// Returns `NotFound` if the project does not exist. A project that is
    /// no longer pending is left alone, so repeated delivery of the same
    /// job is harmless. Step failures are recorded on the project and
    /// reported as [`PipelineOutcome::Failed`]; only store failures while
    /// recording that status surface as `Err`.
    pub async fn run_pipeline(&self, project_id: DbId) -> Result<PipelineOutcome, PipelineError> {
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;

        if project.status != ProjectStatus::Pending {
            tracing::info!(project_id, status = %project.status, "Project not pending, skipping pipeline");
            return Ok(PipelineOutcome::Skipped {
                status: project.status,
            });
        }

        tracing::info!(project_id, slug = %project.slug, "Pipeline started");
        match self.run_steps(&project).await {
            Ok(Some(template_key)) => {
                tracing::info!(project_id, template_key = %template_key, "Pipeline finished, project ready");
                Ok(PipelineOutcome::Ready { template_key })
            }
            Ok(None) => {
                let status = self.current_status(project_id).await?;
                tracing::warn!(project_id, status = %status, "Project left pending during the run");
                Ok(PipelineOutcome::Skipped { status })
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(project_id, error = %message, "Pipeline failed");
                self.store.mark_error(project_id, &message).await?;
                Ok(PipelineOutcome::Failed { message })
            }
        }
    }

    /// [`run_pipeline`](Self::run_pipeline) with panic isolation.
    ///
    /// A panic inside the run is caught, recorded on the project as an
    /// error and reported as [`PipelineOutcome::Failed`]. The calling task
    /// keeps running.
    pub async fn run_isolated(&self, project_id: DbId) -> Result<PipelineOutcome, PipelineError> {
        match AssertUnwindSafe(self.run_pipeline(project_id)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => {
                let message = format!("Pipeline panicked: {}", panic_message(payload.as_ref()));
                tracing::error!(project_id, error = %message, "Pipeline task panicked");
                self.store.mark_error(project_id, &message).await?;
                Ok(PipelineOutcome::Failed { message })
            }
        }
    }

    /// Steps 2-5. `Ok(None)` means the final transition was refused.
    async fn run_steps(&self, project: &Project) -> Result<Option<String>, StepError> {
        let id = project.id;

        // 2. Brand extraction.
        let extracted = self.extractor.extract(&project.source_url).await?;
        let brand = self.store.save_brand_style(id, &extracted.style).await?;
        tracing::info!(project_id = id, "Brand style saved");

        // 3. Template selection.
        let template_key = select_template(&brand, &project.template_key);
        tracing::info!(project_id = id, template_key = %template_key, "Template selected");

        // 4. Content synthesis.
        let language = project
            .locale
            .resolve(extracted.detected_language, self.config.default_language);
        let sections = self
            .synthesizer
            .synthesize(&project.client_name, project.tone, language)
            .await?;
        sections.check_complete().map_err(StepError::Incomplete)?;
        self.store.save_page(id, &sections).await?;
        tracing::info!(project_id = id, language = %language, "Page content saved");

        // 5. Status update.
        let promoted = self.store.mark_ready(id, &template_key).await?;
        Ok(promoted.then_some(template_key))
    }

    async fn current_status(&self, project_id: DbId) -> Result<ProjectStatus, PipelineError> {
        let project = self
            .store
            .find_project(project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        Ok(project.status)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
