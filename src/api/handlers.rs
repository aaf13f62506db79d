// src/api/handlers.rs

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::{types::*, ApiState};
use crate::context::{Enrichment, Insights, LearningProfile, Prediction};

/// POST /api/v1/context/track — Record a tool interaction.
pub async fn track(
    State(state): State<ApiState>,
    Json(body): Json<TrackRequest>,
) -> Result<(StatusCode, Json<TrackResponse>), (StatusCode, Json<ErrorResponse>)> {
    if body.user_id.trim().is_empty() || body.tool_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "user_id and tool_id cannot be empty".into(),
            }),
        ));
    }

    let mut engine = state.engine.lock().await;
    engine
        .track_usage(
            &body.user_id,
            &body.tool_id,
            &body.action,
            body.success,
            body.data,
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(TrackResponse {
            status: "tracked".into(),
            events_tracked: engine.tracked_events(&body.user_id),
        }),
    ))
}

/// POST /api/v1/context/enrich — Advisory bundle for the current tool.
pub async fn enrich(
    State(state): State<ApiState>,
    Json(body): Json<EnrichRequest>,
) -> Result<Json<Enrichment>, (StatusCode, Json<ErrorResponse>)> {
    if body.user_id.trim().is_empty() || body.tool_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "user_id and tool_id cannot be empty".into(),
            }),
        ));
    }

    let mut engine = state.engine.lock().await;
    let enrichment = engine
        .enrich(&body.user_id, &body.tool_id, body.context)
        .await;
    Ok(Json(enrichment))
}

/// GET /api/v1/context/:user_id/predictions — Tool recommendations.
pub async fn predictions(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Json<Prediction> {
    let mut engine = state.engine.lock().await;
    Json(engine.predict(&user_id).await)
}

/// GET /api/v1/context/:user_id/insights — Cross-tool summary.
pub async fn insights(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Json<Insights> {
    let mut engine = state.engine.lock().await;
    Json(engine.summarize(&user_id).await)
}

/// GET /api/v1/context/:user_id/profile — Current learning profile.
/// Unknown users get a freshly seeded profile, never a 404.
pub async fn profile(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Json<LearningProfile> {
    let mut engine = state.engine.lock().await;
    Json(engine.get_or_create(&user_id).await.clone())
}

/// GET /api/v1/health — Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
