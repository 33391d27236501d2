//! Recognition server binary - wires the registry, the orchestrator and its
//! HTTP collaborators together and serves the API.

use std::env;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recognition_server::classify::{HttpImageFetcher, RemoteClassifier};
use recognition_server::{api, AppState, Config, InferenceOrchestrator, TaskRegistry};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("recognition-server {}", VERSION);
        return Ok(());
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml is well-formed or use RECOG__SECTION__KEY environment variables.",
            e
        )
    })?;
    tracing::info!(
        "Starting recognition-server, classifier at {}",
        config.classifier.base_url
    );

    // Injected collaborators for the inference pipeline
    let fetcher = Arc::new(HttpImageFetcher::new(&config.fetch)?);
    let classifier = Arc::new(RemoteClassifier::new(&config.classifier)?);

    // Shared registry and orchestrator
    let registry = Arc::new(TaskRegistry::new());
    let orchestrator = Arc::new(InferenceOrchestrator::new(
        registry.clone(),
        fetcher,
        classifier,
        config.classifier.top_k,
    ));

    let state = Arc::new(AppState::new(config.clone(), registry, orchestrator));

    // Build router
    let app = Router::new()
        .merge(api::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
