use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
};

use crate::config::ServerConfig;
use crate::llm::{HttpLlmClient, LlmConfig};
use crate::pipeline::Pipeline;
use crate::store::{ClickHouseStore, ConnectionPool, StoreConfig};

pub mod auth;
pub mod handlers;
pub mod models;

use handlers::{health_check, process_prompt_handler};

pub struct AppState {
    pub pipeline: Pipeline,
    pub config: ServerConfig,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.body_limit_bytes;
    let timeout = state.config.request_timeout_secs;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/ai/process", post(process_prompt_handler))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CatchPanicLayer::new());

    match timeout {
        Some(secs) => router.layer(TimeoutLayer::new(Duration::from_secs(secs))),
        None => router,
    }
}

pub async fn run_with_config(config: ServerConfig) {
    dotenv().ok();

    log::info!(
        "Server configuration: http={}:{}, sample_rows={}, enforce_read_only={}",
        config.http_host,
        config.http_port,
        config.pipeline.sample_rows,
        config.pipeline.enforce_read_only
    );
    if !config.pipeline.enforce_read_only {
        log::warn!("⚠ Read-only guard disabled: generated queries run unchecked");
    }

    let store_config = match StoreConfig::from_env() {
        Ok(store_config) => store_config,
        Err(e) => {
            log::error!("✗ ClickHouse configuration error: {}", e);
            std::process::exit(1);
        }
    };
    let pool = Arc::new(ConnectionPool::new(store_config).await);
    let stats = pool.stats();
    log::info!(
        "✓ ClickHouse pool ready: {} node(s), query role: {}",
        stats.node_count,
        stats.query_role.as_deref().unwrap_or("<none>")
    );

    let llm_config = match LlmConfig::from_env() {
        Some(llm_config) => llm_config,
        None => {
            log::error!("✗ No LLM API key found (set OPENAI_API_KEY, GROQ_API_KEY or ANTHROPIC_API_KEY)");
            std::process::exit(1);
        }
    };
    log::info!(
        "✓ LLM provider: {} (model {})",
        llm_config.provider.as_str(),
        llm_config.model
    );
    let model = llm_config.model.clone();

    let pipeline = Pipeline::new(
        Arc::new(ClickHouseStore::new(pool)),
        Arc::new(HttpLlmClient::new(llm_config)),
        model,
        config.pipeline.clone(),
    );

    let bind_address = format!("{}:{}", config.http_host, config.http_port);
    let app = build_router(Arc::new(AppState { pipeline, config }));

    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", bind_address);
            listener
        }
        Err(e) => {
            log::error!("✗ FATAL: Failed to bind HTTP listener to {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };

    println!("AskDB server is running");
    println!("  HTTP API: http://{}", bind_address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("HTTP server error: {:?}", e);
    }
    log::info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down"),
        _ = terminate => log::info!("Received SIGTERM, shutting down"),
    }
}
