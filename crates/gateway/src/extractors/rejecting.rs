use axum::extract::{FromRequest, FromRequestParts};

use common::AppError;

/// `axum::Json` answering with the JSON_PARSE_ERROR / INVALID_JSON_FIELD envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

/// `axum::extract::Path` answering with METHOD_ARGUMENT_TYPE_MISMATCH.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// `axum::extract::Query` answering with INVALID_INPUT.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
