//! Message board endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::message::{CreateMessageRequest, MessageResponse, ValidationErrorResponse};
use crate::services::messages;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_messages, create_message),
    components(schemas(CreateMessageRequest, MessageResponse, ValidationErrorResponse))
)]
pub struct MessagesApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/messages", get(list_messages).post(create_message))
}

/// List every message, newest first.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "messages",
    responses(
        (status = 200, description = "All messages, newest first", body = [MessageResponse]),
        (status = 500, description = "Store unavailable"),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageResponse>>, ServerError> {
    let records = messages::list_messages(state.store.as_ref()).await?;
    Ok(Json(records.iter().map(|r| r.to_response()).collect()))
}

/// Post a new message.
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message created", body = MessageResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 413, description = "Request body too large"),
        (status = 422, description = "Validation failed", body = ValidationErrorResponse),
        (status = 500, description = "Store unavailable"),
    )
)]
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ServerError> {
    let Json(req) = payload?;
    let record = messages::create_message(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(record.to_response())))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
