// HTTP request handlers
use crate::infrastructure::event_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub months: Option<u32>,
}

#[derive(Deserialize, Serialize)]
pub struct ModelsToggle {
    pub enabled: bool,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all cabinets
pub async fn list_cabinets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.practice_service.list_cabinets().await {
        Ok(cabinets) => Json(cabinets).into_response(),
        Err(e) => {
            tracing::error!("Error listing cabinets: {}", e);
            // Return empty list on error
            Json(Vec::<crate::domain::cabinet::Cabinet>::new()).into_response()
        }
    }
}

/// List practitioner codes for a cabinet
pub async fn list_praticiens(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.practice_service.list_praticiens(&id).await {
        Ok(praticiens) => Json(praticiens).into_response(),
        Err(e) => {
            tracing::error!("Error listing praticiens for {}: {}", id, e);
            Json(Vec::<String>::new()).into_response()
        }
    }
}

/// Full dashboard for a cabinet
pub async fn get_dashboard(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let months = query.months.unwrap_or(state.default_months);

    match state.dashboard_service.get_dashboard(&id, months).await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(e) => {
            tracing::error!("Error building dashboard for {}: {}", id, e);
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// Stream dashboard for a cabinet (progressive loading)
pub async fn stream_dashboard(
    Path(id): Path<String>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let months = query.months.unwrap_or(state.default_months);

    let rx = state.streaming_service.stream_dashboard(&id, months).await;
    stream_from_receiver(rx)
}

/// Simplified summary for one practitioner
pub async fn get_praticien_summary(
    Path((id, praticien)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let months = query.months.unwrap_or(state.default_months);

    match state
        .dashboard_service
        .get_praticien_summary(&id, &praticien, months)
        .await
    {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!("Error building summary for {}/{}: {}", id, praticien, e);
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// Current state of the analysis-models switch
pub async fn get_models_enabled(State(state): State<Arc<AppState>>) -> Json<ModelsToggle> {
    Json(ModelsToggle {
        enabled: state.model_switch.is_enabled(),
    })
}

/// Toggle the analysis models process-wide. Requests already in flight may
/// finish with the previous setting.
pub async fn set_models_enabled(
    State(state): State<Arc<AppState>>,
    Json(toggle): Json<ModelsToggle>,
) -> Json<ModelsToggle> {
    state.model_switch.set(toggle.enabled);
    tracing::info!("Analysis models enabled = {}", toggle.enabled);
    Json(ModelsToggle {
        enabled: state.model_switch.is_enabled(),
    })
}
