//! Request body and query extractors
//!
//! Same as `axum::Json` and `axum::extract::Query`, except a rejection is
//! reported through [`ApiError`] so malformed input gets the usual error body.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
