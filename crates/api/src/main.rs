use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use pagesmith_ai::{AiConfig, AnthropicClient, RewriteEngine, TextGenerator};
use pagesmith_api::config::{ServerConfig, TriggerMode};
use pagesmith_api::router::build_app_router;
use pagesmith_api::state::AppState;
use pagesmith_brand::{ExtractorConfig, HttpBrandExtractor};
use pagesmith_db::{MemoryStore, PgStore, ProjectStore};
use pagesmith_pipeline::{
    synthesizer_for, InlineSubmitter, JobSubmitter, Orchestrator, PipelineConfig, QueueSubmitter,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Time allowed for inline pipeline runs after the server stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagesmith_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let mut config = ServerConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    let ai_config = AiConfig::from_env();
    let extractor_config = ExtractorConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn ProjectStore> = match std::env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = pagesmith_db::create_pool(&database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            pagesmith_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            pagesmith_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store with inline pipeline runs");
            config.trigger_mode = TriggerMode::Inline;
            Arc::new(MemoryStore::new())
        }
    };

    // --- Generation service ---
    let generator = AnthropicClient::from_config(&ai_config)
        .expect("Failed to build generation client")
        .map(|client| Arc::new(client) as Arc<dyn TextGenerator>);
    if generator.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set, rewrite requests will fail");
    }

    // --- Pipeline trigger ---
    let mut inline: Option<Arc<InlineSubmitter>> = None;
    let submitter: Arc<dyn JobSubmitter> = match config.trigger_mode {
        TriggerMode::Queue => Arc::new(QueueSubmitter::new(Arc::clone(&store))),
        TriggerMode::Inline => {
            let extractor = Arc::new(
                HttpBrandExtractor::new(&extractor_config).expect("Failed to build HTTP client"),
            );
            let synthesizer = synthesizer_for(pipeline_config.synthesis_mode, generator.clone());
            let orchestrator = Arc::new(Orchestrator::new(
                Arc::clone(&store),
                extractor,
                synthesizer,
                pipeline_config.clone(),
            ));
            let submitter = Arc::new(InlineSubmitter::new(orchestrator));
            inline = Some(Arc::clone(&submitter));
            submitter as Arc<dyn JobSubmitter>
        }
    };
    tracing::info!(trigger_mode = %config.trigger_mode, "Pipeline trigger ready");

    // --- App state ---
    let state = AppState {
        store,
        submitter,
        rewrite: RewriteEngine::new(generator),
        config: Arc::new(config.clone()),
        pipeline: Arc::new(pipeline_config),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    if let Some(inline) = inline {
        tracing::info!(in_flight = inline.in_flight(), "Waiting for inline pipeline runs");
        if !inline.drain(DRAIN_TIMEOUT).await {
            tracing::warn!(
                in_flight = inline.in_flight(),
                "Drain timed out, unfinished projects stay pending",
            );
        }
    }
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
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
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
