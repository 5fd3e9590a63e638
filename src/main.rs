//! SceneForge Server — Blend-to-glTF conversion service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};
use validator::Validate;

use sceneforge_api::{AppState, build_app};
use sceneforge_core::config::AppConfig;
use sceneforge_core::error::AppError;
use sceneforge_engine::{BlenderEngine, ConversionPipeline};
use sceneforge_realtime::StatusHub;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("SCENEFORGE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load(&env)?;

    config
        .engine
        .validate()
        .map_err(|e| AppError::configuration(format!("Invalid engine config: {}", e)))?;

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting SceneForge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        blender = %config.engine.blender_path.display(),
        timeout_s = config.engine.timeout_seconds,
        max_concurrency = config.engine.max_concurrency,
        "Converter engine configured"
    );

    let engine = Arc::new(BlenderEngine::new(
        config.engine.blender_path.clone(),
        config.engine.capture_chars,
    ));
    let status = Arc::new(StatusHub::new());
    let pipeline = ConversionPipeline::new(engine, status.clone(), config.engine.clone())
        .map_err(|e| AppError::internal(format!("Pipeline init failed: {}", e)))?;

    let app_state = AppState {
        config: Arc::new(config.clone()),
        pipeline: Arc::new(pipeline),
        status,
    };

    let app = build_app(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("SceneForge server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("SceneForge server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
