use std::sync::Arc;
use std::time::Duration;

use pagesmith_ai::{AiConfig, AnthropicClient, TextGenerator};
use pagesmith_brand::{ExtractorConfig, HttpBrandExtractor};
use pagesmith_db::{PgStore, ProjectStore};
use pagesmith_pipeline::{synthesizer_for, Orchestrator, PipelineConfig};
use pagesmith_worker::{JobWorker, WorkerConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Time allowed for in-flight pipelines after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagesmith_worker=debug,pagesmith_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let worker_config = WorkerConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    let ai_config = AiConfig::from_env();
    let extractor_config = ExtractorConfig::from_env();
    tracing::info!(
        worker_id = %worker_config.worker_id,
        synthesis_mode = %pipeline_config.synthesis_mode,
        demo_mode = pipeline_config.demo_mode,
        "Loaded worker configuration",
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = pagesmith_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    pagesmith_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    pagesmith_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let store: Arc<dyn ProjectStore> = Arc::new(PgStore::new(pool));

    // --- Pipeline ---
    let extractor =
        Arc::new(HttpBrandExtractor::new(&extractor_config).expect("Failed to build HTTP client"));
    let generator = AnthropicClient::from_config(&ai_config)
        .expect("Failed to build generation client")
        .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
    let synthesizer = synthesizer_for(pipeline_config.synthesis_mode, generator);
    let orchestrator = Arc::new(Orchestrator::new(store, extractor, synthesizer, pipeline_config));

    // --- Worker loop ---
    let worker = JobWorker::new(orchestrator, worker_config);
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    worker.run(cancel).await;

    let in_flight = worker.in_flight();
    tracing::info!(in_flight, "Waiting for in-flight pipelines");
    if worker.drain(DRAIN_TIMEOUT).await {
        tracing::info!("Graceful shutdown complete");
    } else {
        tracing::warn!(
            in_flight = worker.in_flight(),
            "Drain timed out, unfinished jobs will be requeued by the stale sweep",
        );
    }
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), stopping worker");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping worker");
        }
    }
}
