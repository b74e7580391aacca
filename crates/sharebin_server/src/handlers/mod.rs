//! HTTP request handlers.

use crate::{docs::ApiDocumentation, AppState};
use axum::{extract::State, Json};

pub(crate) mod maintenance;
/// Paste-related endpoints.
pub mod paste;
pub(crate) mod redirect;
/// Bearer-authenticated user endpoints.
pub mod user;

/// Serve the API information document.
pub async fn documentation(State(state): State<AppState>) -> Json<ApiDocumentation> {
    Json(state.docs.as_ref().clone())
}
