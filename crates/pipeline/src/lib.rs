//! The project generation pipeline.
//!
//! [`Orchestrator::run_pipeline`] drives one project from `pending` to a
//! terminal status: brand extraction, template selection, content
//! synthesis, then the status update. How a run is triggered is hidden
//! behind [`JobSubmitter`]: in-process tasks or a durable queue consumed
//! by the worker binary.

pub mod config;
pub mod error;
pub mod intake;
pub mod orchestrator;
pub mod poller;
pub mod submitter;
pub mod synthesizer;

pub use config::{PipelineConfig, SynthesisMode};
pub use error::{PipelineError, SubmitError, SynthesisError};
pub use intake::{create_project, CreatedProject};
pub use orchestrator::{Orchestrator, PipelineOutcome};
pub use poller::{PollOutcome, StatusPoller};
pub use submitter::{InlineSubmitter, JobSubmitter, QueueSubmitter};
pub use synthesizer::{synthesizer_for, ContentSynthesizer, StaticSynthesizer};
