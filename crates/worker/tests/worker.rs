//! Queue consumption against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use pagesmith_brand::{BrandExtractor, ExtractError, ExtractedBrand};
use pagesmith_core::project::{BrandStyle, CreateProjectInput, Language, Locale, ProjectStatus, Tone};
use pagesmith_core::sections::SectionsDocument;
use pagesmith_core::types::DbId;
use pagesmith_db::models::status::JobStatus;
use pagesmith_db::{MemoryStore, ProjectStore};
use pagesmith_pipeline::{
    create_project, ContentSynthesizer, Orchestrator, PipelineConfig, QueueSubmitter,
    StaticSynthesizer, SynthesisError,
};
use pagesmith_worker::{JobWorker, WorkerConfig};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct FixedExtractor;

#[async_trait]
impl BrandExtractor for FixedExtractor {
    async fn extract(&self, _source_url: &str) -> Result<ExtractedBrand, ExtractError> {
        Ok(ExtractedBrand {
            style: BrandStyle {
                primary_color: Some("#0b5fff".into()),
                ..Default::default()
            },
            detected_language: None,
        })
    }
}

struct FailingExtractor;

#[async_trait]
impl BrandExtractor for FailingExtractor {
    async fn extract(&self, _source_url: &str) -> Result<ExtractedBrand, ExtractError> {
        Err(ExtractError::EmptyBody)
    }
}

/// Panics for one client name, synthesizes normally for the rest.
struct PanicsFor(&'static str);

#[async_trait]
impl ContentSynthesizer for PanicsFor {
    async fn synthesize(
        &self,
        client_name: &str,
        tone: Tone,
        language: Language,
    ) -> Result<SectionsDocument, SynthesisError> {
        if client_name == self.0 {
            panic!("template engine blew up");
        }
        StaticSynthesizer.synthesize(client_name, tone, language).await
    }
}

fn config(concurrency: usize) -> WorkerConfig {
    WorkerConfig {
        worker_id: "test-worker".into(),
        poll_interval_ms: 5,
        concurrency,
        stale_after_secs: 600,
    }
}

fn worker(
    store: &Arc<MemoryStore>,
    extractor: Arc<dyn BrandExtractor>,
    synthesizer: Arc<dyn ContentSynthesizer>,
    config: WorkerConfig,
) -> JobWorker {
    let orchestrator = Orchestrator::new(
        Arc::clone(store) as Arc<dyn ProjectStore>,
        extractor,
        synthesizer,
        PipelineConfig::default(),
    );
    JobWorker::new(Arc::new(orchestrator), config)
}

async fn queue(store: &Arc<MemoryStore>, client_name: &str) -> DbId {
    let submitter = QueueSubmitter::new(Arc::clone(store) as Arc<dyn ProjectStore>);
    let input = CreateProjectInput {
        source_url: "https://example-bank.com".into(),
        client_name: client_name.into(),
        template_key: "auto".into(),
        tone: Tone::Friendly,
        locale: Locale::Auto,
    };
    create_project(store.as_ref(), &submitter, &PipelineConfig::default(), input)
        .await
        .unwrap()
        .project_id
}

async fn job_status(store: &MemoryStore, project_id: DbId) -> JobStatus {
    store.find_job(project_id).await.unwrap().unwrap().status().unwrap()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn queued_job_runs_to_done() {
    let store = Arc::new(MemoryStore::new());
    let project_id = queue(&store, "Acme Bank").await;
    let worker = worker(&store, Arc::new(FixedExtractor), Arc::new(StaticSynthesizer), config(4));

    assert_eq!(worker.dispatch().await.unwrap(), 1);
    assert!(worker.drain(Duration::from_secs(1)).await);

    assert_eq!(job_status(&store, project_id).await, JobStatus::Done);
    let project = store.find_project(project_id).await.unwrap().unwrap();
    assert_eq!(project.status, ProjectStatus::Ready);
    let job = store.find_job(project_id).await.unwrap().unwrap();
    assert_eq!(job.worker_id.as_deref(), Some("test-worker"));
    assert_eq!(job.attempts, 1);
}

#[tokio::test]
async fn empty_queue_claims_nothing() {
    let store = Arc::new(MemoryStore::new());
    let worker = worker(&store, Arc::new(FixedExtractor), Arc::new(StaticSynthesizer), config(4));
    assert_eq!(worker.dispatch().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_pipeline_fails_the_job() {
    let store = Arc::new(MemoryStore::new());
    let project_id = queue(&store, "Acme Bank").await;
    let worker = worker(&store, Arc::new(FailingExtractor), Arc::new(StaticSynthesizer), config(4));

    worker.dispatch().await.unwrap();
    assert!(worker.drain(Duration::from_secs(1)).await);

    let job = store.find_job(project_id).await.unwrap().unwrap();
    assert_eq!(job.status(), Some(JobStatus::Failed));
    assert!(job.last_error.unwrap().contains("empty page"));
    let project = store.find_project(project_id).await.unwrap().unwrap();
    assert_eq!(project.status, ProjectStatus::Error);
}

#[tokio::test]
async fn panic_in_one_job_does_not_affect_others() {
    let store = Arc::new(MemoryStore::new());
    let doomed = queue(&store, "Doomed Bank").await;
    let healthy = queue(&store, "Acme Bank").await;
    let worker = worker(
        &store,
        Arc::new(FixedExtractor),
        Arc::new(PanicsFor("Doomed Bank")),
        config(4),
    );

    assert_eq!(worker.dispatch().await.unwrap(), 2);
    assert!(worker.drain(Duration::from_secs(1)).await);

    assert_eq!(job_status(&store, doomed).await, JobStatus::Failed);
    let doomed_project = store.find_project(doomed).await.unwrap().unwrap();
    assert_eq!(doomed_project.status, ProjectStatus::Error);
    assert!(doomed_project.error_message.unwrap().contains("template engine blew up"));

    assert_eq!(job_status(&store, healthy).await, JobStatus::Done);
    let healthy_project = store.find_project(healthy).await.unwrap().unwrap();
    assert_eq!(healthy_project.status, ProjectStatus::Ready);
}

#[tokio::test]
async fn concurrency_limit_caps_claims_per_cycle() {
    let store = Arc::new(MemoryStore::new());
    let first = queue(&store, "Acme Bank").await;
    let second = queue(&store, "Beta Bank").await;
    let worker = worker(&store, Arc::new(FixedExtractor), Arc::new(StaticSynthesizer), config(1));

    assert_eq!(worker.dispatch().await.unwrap(), 1);
    assert_eq!(job_status(&store, second).await, JobStatus::Queued);

    assert!(worker.drain(Duration::from_secs(1)).await);
    assert_eq!(job_status(&store, first).await, JobStatus::Done);
}

#[tokio::test]
async fn already_settled_project_closes_its_job() {
    let store = Arc::new(MemoryStore::new());
    let project_id = queue(&store, "Acme Bank").await;
    store.mark_error(project_id, "cancelled by operator").await.unwrap();
    let worker = worker(&store, Arc::new(FixedExtractor), Arc::new(StaticSynthesizer), config(4));

    worker.dispatch().await.unwrap();
    assert!(worker.drain(Duration::from_secs(1)).await);

    assert_eq!(job_status(&store, project_id).await, JobStatus::Done);
    let project = store.find_project(project_id).await.unwrap().unwrap();
    assert_eq!(project.status, ProjectStatus::Error);
    assert_eq!(project.error_message.as_deref(), Some("cancelled by operator"));
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn abandoned_claim_is_requeued_and_finished() {
    let store = Arc::new(MemoryStore::new());
    let project_id = queue(&store, "Acme Bank").await;

    // A worker claims the job and dies without recording anything.
    let abandoned = store.claim_next_job("crashed-worker").await.unwrap().unwrap();
    assert_eq!(abandoned.project_id, project_id);
    tokio::time::sleep(Duration::from_millis(5)).await;

    let worker = worker(
        &store,
        Arc::new(FixedExtractor),
        Arc::new(StaticSynthesizer),
        WorkerConfig {
            stale_after_secs: 0,
            ..config(4)
        },
    );
    assert_eq!(worker.dispatch().await.unwrap(), 0);
    assert_eq!(worker.requeue_stale().await.unwrap(), 1);
    assert_eq!(worker.dispatch().await.unwrap(), 1);
    assert!(worker.drain(Duration::from_secs(1)).await);

    let job = store.find_job(project_id).await.unwrap().unwrap();
    assert_eq!(job.status(), Some(JobStatus::Done));
    assert_eq!(job.attempts, 2);
    assert_eq!(job.worker_id.as_deref(), Some("test-worker"));
    let project = store.find_project(project_id).await.unwrap().unwrap();
    assert_eq!(project.status, ProjectStatus::Ready);
}

#[tokio::test]
async fn fresh_claims_are_not_requeued() {
    let store = Arc::new(MemoryStore::new());
    let project_id = queue(&store, "Acme Bank").await;
    store.claim_next_job("busy-worker").await.unwrap().unwrap();

    let worker = worker(&store, Arc::new(FixedExtractor), Arc::new(StaticSynthesizer), config(4));
    assert_eq!(worker.requeue_stale().await.unwrap(), 0);
    assert_eq!(job_status(&store, project_id).await, JobStatus::Running);
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_loop_processes_jobs_until_cancelled() {
    let store = Arc::new(MemoryStore::new());
    let worker = Arc::new(worker(
        &store,
        Arc::new(FixedExtractor),
        Arc::new(StaticSynthesizer),
        config(2),
    ));
    let cancel = CancellationToken::new();
    let handle = tokio::spawn({
        let worker = Arc::clone(&worker);
        let cancel = cancel.clone();
        async move { worker.run(cancel).await }
    });

    let project_id = queue(&store, "Acme Bank").await;
    let mut status = JobStatus::Queued;
    for _ in 0..200 {
        status = job_status(&store, project_id).await;
        if status == JobStatus::Done {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(status, JobStatus::Done);

    cancel.cancel();
    assert_matches!(tokio::time::timeout(Duration::from_secs(1), handle).await, Ok(Ok(())));
    assert!(worker.drain(Duration::from_secs(1)).await);
}
