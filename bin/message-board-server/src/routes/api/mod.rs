pub mod messages;

use crate::state::AppState;
use utoipa::OpenApi;

use axum::Router;
use std::sync::Arc;

/// Routes nested under `/api`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().merge(messages::router())
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    messages::MessagesApi::openapi()
}
