//! Durable-queue consumer for the generation pipeline.
//!
//! The API enqueues one `pipeline_jobs` row per created project; this crate
//! claims those rows, runs the orchestrator on each and records the result.
//! Jobs left `running` by a crashed worker are requeued once their claim is
//! older than the stale threshold.

pub mod config;
pub mod worker;

pub use config::WorkerConfig;
pub use worker::JobWorker;
