use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::Error;
use crate::models::ActivistInput;
use crate::services::query::ListOptions;
use crate::services::{activist_service, merge_service};
use crate::web::AppState;

fn error_response(context: &str, err: Error) -> Response {
    let status = match &err {
        Error::Validation { .. } => StatusCode::BAD_REQUEST,
        Error::NotFound => StatusCode::NOT_FOUND,
        Error::Ambiguous(_) | Error::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!("{} failed: {}", context, err);
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub async fn list_handler(
    State(state): State<AppState>,
    Json(options): Json<ListOptions>,
) -> Response {
    match activist_service::list_activists(&state.pool, &state.composer, &options).await {
        Ok(activists) => Json(activists).into_response(),
        Err(e) => error_response("activist list", e),
    }
}

pub async fn get_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match activist_service::get_activist(&state.pool, &state.composer, id).await {
        Ok(activist) => Json(activist).into_response(),
        Err(e) => error_response("activist lookup", e),
    }
}

pub async fn create_handler(
    State(state): State<AppState>,
    Json(input): Json<ActivistInput>,
) -> Response {
    match activist_service::create_activist(&state.pool, input).await {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id }))).into_response(),
        Err(e) => error_response("activist create", e),
    }
}

pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut input): Json<ActivistInput>,
) -> Response {
    input.id = id;
    match activist_service::update_activist(&state.pool, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("activist update", e),
    }
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub original_id: i64,
    pub target_id: i64,
}

pub async fn merge_handler(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> Response {
    match merge_service::merge_activists(&state.pool, request.original_id, request.target_id).await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("activist merge", e),
    }
}

pub async fn hide_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match activist_service::hide_activist(&state.pool, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("activist hide", e),
    }
}

pub async fn names_handler(State(state): State<AppState>) -> Response {
    match activist_service::recent_names(&state.pool).await {
        Ok(names) => Json(names).into_response(),
        Err(e) => error_response("autocomplete names", e),
    }
}

pub async fn chapter_members_handler(State(state): State<AppState>) -> Response {
    match activist_service::chapter_members(&state.pool).await {
        Ok(members) => Json(members).into_response(),
        Err(e) => error_response("chapter member roster", e),
    }
}

pub async fn organizers_handler(State(state): State<AppState>) -> Response {
    match activist_service::organizers(&state.pool).await {
        Ok(members) => Json(members).into_response(),
        Err(e) => error_response("organizer roster", e),
    }
}
