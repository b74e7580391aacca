//! Paste HTTP handlers.

use crate::{
    error::HttpError,
    extract::{PathParams, QueryParams, TextBody},
    models::paste::*,
    password, session, validate_paste, AppError, AppState,
};
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tower_sessions::Session;

/// Interpret a request body as a JSON paste or, failing that, plain text.
///
/// Anything that is not a JSON object becomes a single unnamed file holding
/// the raw body.
fn json_or_text(body: String) -> Result<PasteSubmission, AppError> {
    match serde_json::from_str::<Value>(&body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value)
            .map_err(|err| AppError::BadRequest(format!("Invalid paste payload: {}", err))),
        _ => Ok(PasteSubmission::from_text(body)),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|err| {
        tracing::error!("Password task failed: {}", err);
        AppError::Internal
    })?
}

/// Reject access to a protected paste unless `supplied` matches.
async fn check_password(paste: &Paste, supplied: Option<String>) -> Result<(), AppError> {
    let Some(hash) = paste.password_hash.clone() else {
        return Ok(());
    };
    let Some(supplied) = supplied else {
        return Err(AppError::Unauthorized("Password required.".to_string()));
    };
    if run_blocking(move || password::verify_password(&supplied, &hash)).await? {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Incorrect password.".to_string()))
    }
}

/// Create a new paste.
///
/// # Arguments
/// - `state`: Application state.
/// - `session`: Caller session; the new id is remembered there.
/// - `body`: JSON paste payload or plain text.
///
/// # Returns
/// The new id, creation time, expiry, and the safety token for deletion.
///
/// # Errors
/// Returns 400 when the payload fails validation or the expiry is not in the
/// future.
pub async fn create_paste(
    State(state): State<AppState>,
    session: Session,
    TextBody(body): TextBody,
) -> Result<Json<CreatedPaste>, HttpError> {
    let submission = json_or_text(body)?;
    validate_paste(&submission, &state.config.limits)?;

    let now = Utc::now();
    if submission.expires.is_some_and(|expires| expires <= now) {
        return Err(AppError::BadRequest("The expiry must be in the future.".to_string()).into());
    }

    let files: Vec<PasteFile> = submission
        .files
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, file)| {
            PasteFile::new(
                index,
                file.filename,
                file.syntax,
                file.content.flatten().unwrap_or_default(),
            )
        })
        .collect();
    if files.is_empty() {
        return Err(AppError::BadRequest("Paste must contain at least one file.".to_string()).into());
    }

    let mut paste = Paste::new(files);
    paste.expires_at = submission.expires;
    if let Some(secret) = submission.password.filter(|value| !value.is_empty()) {
        paste.password_hash = Some(run_blocking(move || password::hash_password(&secret)).await?);
    }

    let created = CreatedPaste::from(&paste);
    tracing::info!(
        id = %paste.id,
        files = paste.files.len(),
        protected = paste.has_password(),
        "Created paste"
    );
    state.db.pastes.create(paste)?;
    session::remember_paste(&session, &created.id).await?;

    Ok(Json(created))
}

/// Fetch a paste and count the view.
///
/// # Errors
/// Returns 404 for missing or expired pastes and 401 when a password is
/// required or wrong.
pub async fn get_paste(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
    QueryParams(query): QueryParams<PasteAccessQuery>,
) -> Result<Json<PasteView>, HttpError> {
    let paste = state
        .db
        .pastes
        .get(&id, Utc::now())?
        .ok_or(AppError::NotFound)?;
    check_password(&paste, query.password).await?;

    let viewed = state
        .db
        .pastes
        .record_view(&id, Utc::now())?
        .ok_or(AppError::NotFound)?;
    Ok(Json(PasteView::from(&viewed)))
}

/// Serve one file of a paste as plain text.
///
/// Raw reads do not count as views.
pub async fn get_raw_file(
    State(state): State<AppState>,
    PathParams((id, index)): PathParams<(String, usize)>,
    QueryParams(query): QueryParams<PasteAccessQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let mut paste = state
        .db
        .pastes
        .get(&id, Utc::now())?
        .ok_or(AppError::NotFound)?;
    check_password(&paste, query.password).await?;

    if index >= paste.files.len() {
        return Err(AppError::NotFound.into());
    }
    let file = paste.files.swap_remove(index);
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        file.content,
    ))
}

/// Delete the paste owning a safety token.
pub async fn delete_by_safety_token(
    State(state): State<AppState>,
    PathParams(token): PathParams<String>,
) -> Result<Json<Value>, HttpError> {
    let id = state
        .db
        .pastes
        .delete_by_safety(&token)?
        .ok_or(AppError::NotFound)?;
    tracing::info!(id = %id, "Deleted paste by safety token");
    Ok(Json(json!({ "deleted": id })))
}

#[derive(Serialize)]
pub struct SessionPastes {
    pub pastes: Vec<String>,
}

/// List pastes created in the caller's session that still exist.
pub async fn list_session_pastes(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<SessionPastes>, HttpError> {
    let now = Utc::now();
    let mut pastes = Vec::new();
    for id in session::recent_pastes(&session).await? {
        if state.db.pastes.get(&id, now)?.is_some() {
            pastes.push(id);
        }
    }
    Ok(Json(SessionPastes { pastes }))
}

#[cfg(test)]
mod tests {
    use super::json_or_text;

    #[test]
    fn json_object_is_parsed_as_submission() {
        let submission =
            json_or_text(r#"{"files":[{"content":"hi","filename":"a.txt"}]}"#.to_string())
                .unwrap();
        let files = submission.files.unwrap();
        assert_eq!(files[0].filename.as_deref(), Some("a.txt"));
    }

    #[test]
    fn non_object_bodies_become_text() {
        for body in ["just some text", "42", "[1, 2]", "\"quoted\""] {
            let submission = json_or_text(body.to_string()).unwrap();
            let files = submission.files.unwrap();
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].content, Some(Some(body.to_string())));
        }
    }

    #[test]
    fn object_with_wrong_shape_is_rejected() {
        assert!(json_or_text(r#"{"files":"nope"}"#.to_string()).is_err());
    }
}
