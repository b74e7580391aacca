//! Extractors whose rejections render as `{"error": ...}` bodies.

use crate::{error::HttpError, AppError};
use async_trait::async_trait;
use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection, StringRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;

/// Request body decoded as UTF-8 text.
pub struct TextBody(pub String);

/// Path parameters.
pub struct PathParams<T>(pub T);

/// Query string parameters.
pub struct QueryParams<T>(pub T);

fn body_error(rejection: StringRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(rejection.body_text())
    }
}

fn path_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => AppError::BadRequest(err.body_text()),
        other => {
            tracing::error!("Path parameters unavailable: {}", other.body_text());
            AppError::Internal
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for TextBody
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        String::from_request(req, state)
            .await
            .map(TextBody)
            .map_err(|rejection| HttpError(body_error(rejection)))
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| PathParams(value))
            .map_err(|rejection| HttpError(path_error(rejection)))
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|rejection: QueryRejection| {
                HttpError(AppError::BadRequest(rejection.body_text()))
            })
    }
}
