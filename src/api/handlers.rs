// src/api/handlers.rs

use crate::api::{auth, types::*, ApiState};
use crate::core::analytics::SelectionAnalytics;
use crate::core::dispatcher::AutoGenerationStatus;
use crate::core::types::PersonaRecommendation;
use crate::infra::errors::DispatchError;
use crate::persona::store::catalog_error;
use crate::persona::types::{GeneratedPersonaSummary, Persona};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Configuration errors are the caller's fault; everything else is ours.
fn dispatch_error(e: DispatchError) -> ApiError {
    let status = match &e {
        DispatchError::PersonaNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_user_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, e.to_string())
}

fn require_task(description: &str) -> Result<(), ApiError> {
    if description.trim().is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Task description cannot be empty",
        ));
    }
    Ok(())
}

/// POST /api/v1/select: Pick the best persona for a task.
pub async fn select_persona(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<SelectRequest>,
) -> Result<Json<PersonaRecommendation>, ApiError> {
    auth::check_auth(&state, &headers)?;
    require_task(&body.task_description)?;

    let rec = state
        .dispatcher
        .select_persona(&body.task_description, &body.context, body.project.as_deref())
        .await
        .map_err(dispatch_error)?;
    Ok(Json(rec))
}

/// POST /api/v1/analyze: Task analysis and category, no selection.
pub async fn analyze_task(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let task_context = state
        .dispatcher
        .analyze_task(&body.task_description, &body.context);
    let task_category = state.dispatcher.classify_task(&task_context);
    Ok(Json(AnalyzeResponse {
        task_context,
        task_category,
    }))
}

/// POST /api/v1/feedback: Rate a selection 1..=5.
pub async fn record_feedback(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<FeedbackRequest>,
) -> Result<StatusCode, ApiError> {
    auth::check_auth(&state, &headers)?;

    state
        .dispatcher
        .record_feedback(
            &body.task_description,
            &body.persona_id,
            body.score,
            &body.comment,
        )
        .map_err(dispatch_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/analytics
pub async fn get_analytics(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<SelectionAnalytics>, ApiError> {
    auth::check_auth(&state, &headers)?;
    Ok(Json(state.dispatcher.get_selection_analytics()))
}

/// POST /api/v1/improvements: Catalog gaps for a task.
pub async fn suggest_improvements(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<ImprovementsRequest>,
) -> Result<Json<ImprovementsResponse>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let suggestions = state
        .dispatcher
        .suggest_persona_improvements(&body.task_description)
        .map_err(dispatch_error)?;
    Ok(Json(ImprovementsResponse { suggestions }))
}

/// GET /api/v1/auto-generation
pub async fn get_auto_generation(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<AutoGenerationStatus>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let status = state
        .dispatcher
        .get_auto_generation_status()
        .map_err(dispatch_error)?;
    Ok(Json(status))
}

/// POST /api/v1/auto-generation: Toggle persona synthesis.
pub async fn set_auto_generation(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<AutoGenerationRequest>,
) -> Result<Json<AutoGenerationStatus>, ApiError> {
    auth::check_auth(&state, &headers)?;

    state.dispatcher.enable_auto_generation(body.enabled);
    let status = state
        .dispatcher
        .get_auto_generation_status()
        .map_err(dispatch_error)?;
    Ok(Json(status))
}

/// POST /api/v1/threshold
pub async fn set_threshold(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<ThresholdRequest>,
) -> Result<Json<AutoGenerationStatus>, ApiError> {
    auth::check_auth(&state, &headers)?;

    state
        .dispatcher
        .set_confidence_threshold(body.threshold)
        .map_err(dispatch_error)?;
    let status = state
        .dispatcher
        .get_auto_generation_status()
        .map_err(dispatch_error)?;
    Ok(Json(status))
}

/// GET /api/v1/personas?search=: Whole catalog, or matches for `search`.
pub async fn list_personas(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<PersonaQuery>,
) -> Result<Json<Vec<Persona>>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let store = state.dispatcher.store();
    let personas = match query.search.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(q) => store.search_personas(q),
        None => store
            .get_all_personas()
            .map(|all| all.into_values().collect()),
    }
    .map_err(|e| dispatch_error(catalog_error(e)))?;
    Ok(Json(personas))
}

/// GET /api/v1/personas/generated
pub async fn list_generated(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<GeneratedPersonaSummary>>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let generated = state
        .dispatcher
        .list_generated_personas()
        .map_err(dispatch_error)?;
    Ok(Json(generated))
}

/// GET /api/v1/personas/{id}
pub async fn get_persona(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Persona>, ApiError> {
    auth::check_auth(&state, &headers)?;

    match state.dispatcher.store().get_persona(&id) {
        Ok(Some(persona)) => Ok(Json(persona)),
        Ok(None) => Err(dispatch_error(DispatchError::PersonaNotFound { id })),
        Err(e) => Err(dispatch_error(catalog_error(e))),
    }
}

/// POST /api/v1/tasks/complete: Feed a finished task back to project context.
pub async fn complete_task(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(body): Json<CompleteTaskRequest>,
) -> Result<Json<CompleteTaskResponse>, ApiError> {
    auth::check_auth(&state, &headers)?;
    require_task(&body.task_description)?;

    let context_updated = state
        .dispatcher
        .complete_task_with_context_update(
            &body.task_description,
            &body.result,
            &body.persona_id,
            body.project.as_deref(),
        )
        .await;
    Ok(Json(CompleteTaskResponse { context_updated }))
}

/// GET /api/v1/context?project=: Summary and suggested priorities.
pub async fn get_context(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<ContextResponse>, ApiError> {
    auth::check_auth(&state, &headers)?;

    let project = query.project.as_deref();
    let summary = state.dispatcher.get_context_summary(project).await;
    let priorities = state.dispatcher.suggest_task_priorities(project).await;
    Ok(Json(ContextResponse {
        summary,
        priorities,
    }))
}

/// GET /api/v1/health: Simple health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
