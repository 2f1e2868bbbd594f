//! Shared response types for API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Result of a PUT handler.
///
/// A PUT whose required field (title or content) is blank is treated as "no
/// change" and answered with `304 Not Modified` and an empty body.
#[derive(Debug)]
pub enum Updated<T> {
    Changed(T),
    NotModified,
}

impl<T: Serialize> IntoResponse for Updated<T> {
    fn into_response(self) -> Response {
        match self {
            Updated::Changed(body) => Json(body).into_response(),
            Updated::NotModified => StatusCode::NOT_MODIFIED.into_response(),
        }
    }
}

/// Body of `GET /cards/timer` when no card of the caller is ticking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoTimer {
    pub no_timer_on: bool,
}

impl Default for NoTimer {
    fn default() -> Self {
        Self { no_timer_on: true }
    }
}
