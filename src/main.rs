// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::application::dashboard_service::DashboardService;
use crate::application::practice_service::PracticeService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::domain::models::{ModelEngine, ModelSwitch};
use crate::infrastructure::config::{load_dashboards_config, load_reporting_config};
use crate::infrastructure::reporting_client::ReportingClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_dashboard, get_models_enabled, get_praticien_summary, health_check, list_cabinets,
    list_praticiens, set_models_enabled, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let reporting_config = load_reporting_config()?;
    let dashboards_config = load_dashboards_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(ReportingClient::new(
        reporting_config.reporting.base_url,
        reporting_config.reporting.api_key,
    ));

    // One switch shared by the engine and the admin endpoint
    let model_switch = ModelSwitch::new(dashboards_config.models.enabled);
    let engine = ModelEngine::new(model_switch.clone(), dashboards_config.models.params);

    // Create services (application layer)
    let practice_service = PracticeService::new(repository.clone());
    let dashboard_service =
        DashboardService::new(repository.clone(), dashboards_config.clone(), engine);
    let streaming_service = StreamingDashboardService::new(
        repository.clone(),
        dashboards_config,
        dashboard_service.clone(),
    );

    // Create application state
    let state = Arc::new(AppState {
        practice_service,
        dashboard_service,
        streaming_service,
        model_switch,
        default_months: reporting_config.reporting.default_months,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/cabinets", get(list_cabinets))
        .route("/cabinets/:id/praticiens", get(list_praticiens))
        .route("/dashboards/:id", get(get_dashboard))
        .route("/dashboards/:id/stream", get(stream_dashboard))
        .route("/dashboards/:id/praticiens/:praticien", get(get_praticien_summary))
        .route("/models/enabled", get(get_models_enabled).put(set_models_enabled))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse()?;
    tracing::info!("Starting cabinet-analytics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
