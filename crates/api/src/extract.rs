//! Extractor wrappers whose rejections render as [`AppError`] JSON bodies.
//!
//! A malformed path id (`/api/cards/abc`) or an unparseable request body
//! becomes a 400 `{error, code}` response instead of axum's plain-text
//! rejection.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `Path<T>` with [`AppError`] as its rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct IdPath<T>(pub T);

/// `Json<T>` with [`AppError`] as its rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
