use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::{any::Any, sync::Arc, time::Instant};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    engine::BiddingEngine,
    error::{feature_error, AppError},
    types::{BiddingRequest, BiddingResponse, FeatureSet},
};

pub type AppState = Arc<BiddingEngine>;

pub fn build_router(engine: AppState) -> Router {
    Router::new()
        .route("/", post(predict_ctr))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(engine)
}

/// A panicking handler still answers with a logged 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::Unexpected(detail).into_response()
}

pub async fn predict_ctr(
    State(engine): State<AppState>,
    payload: Result<Json<BiddingRequest>, JsonRejection>,
) -> Result<Json<BiddingResponse>, AppError> {
    let start = Instant::now();
    metrics::counter!("ctr_requests_total").increment(1);

    // Unparseable bodies are the caller's fault, same as a missing field.
    let Json(request) = payload.map_err(|e| feature_error(&e.body_text()))?;
    let features = FeatureSet::try_from(request)?;
    let prediction = engine.predict(&features).await?;

    let latency = start.elapsed().as_secs_f64() * 1000.0;
    metrics::histogram!("ctr_prediction_duration_ms").record(latency);

    Ok(Json(BiddingResponse {
        ctr: prediction.to_string(),
    }))
}

pub async fn health_check(State(engine): State<AppState>) -> (StatusCode, Json<Value>) {
    let healthy = engine.is_healthy().await;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
