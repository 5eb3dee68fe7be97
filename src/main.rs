//! Job Scout - job search assistant
//!
//! Finds a job posting for a free-text request, pauses for the user's
//! approval, searches again on rejection, and drafts a cover letter once a
//! posting is approved.

mod api;
mod config;
mod conversation;
mod cover_letter;
mod llm;
mod runtime;
mod state_machine;
mod system_prompt;
mod tools;

use api::{create_router, AppState};
use config::Config;
use llm::{AnthropicService, LlmService, LoggingService};
use runtime::{LlmClient, ServiceLlmClient, Session, ToolExecutor, ToolRegistryExecutor};
use std::net::SocketAddr;
use std::sync::Arc;
use tools::{JobSearchTool, ToolRegistry};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "job_scout=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Model backend
    let anthropic = AnthropicService::new(
        config.llm.api_key.clone(),
        config.llm.model,
        config.llm.gateway.as_deref(),
    )?;
    let service: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(anthropic)));
    tracing::info!(
        model = %service.model_id(),
        gateway = config.llm.gateway.as_deref().unwrap_or("none"),
        "LLM service initialized"
    );

    // Search tool
    tracing::info!(
        base_url = %config.search.base_url,
        max_results = config.search.max_results,
        "Job search tool initialized"
    );
    let registry = ToolRegistry::new(JobSearchTool::new(config.search.clone())?);

    let llm_client: Arc<dyn LlmClient> = Arc::new(ServiceLlmClient::new(service));
    let tool_executor: Arc<dyn ToolExecutor> = Arc::new(ToolRegistryExecutor::new(registry));
    let state = AppState::new(Session::new(llm_client, tool_executor));

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Job Scout server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
