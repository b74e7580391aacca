//! Legacy path redirects.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
};

/// `GET /docs` and `GET /documentation`.
pub async fn documentation() -> impl IntoResponse {
    (
        StatusCode::FOUND,
        [(header::LOCATION, "/api/documentation")],
    )
}

/// `POST /documents` and `POST /api/documents`.
///
/// 308 keeps the method and body, so old clients still create a paste.
pub async fn legacy_documents() -> Redirect {
    Redirect::permanent("/api/paste")
}
