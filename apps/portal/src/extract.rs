//! Request extractors that report failures through `AppError`.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// A JSON form body. Unlike a bare `Json<T>`, a body that is not JSON or
/// that does not fit `T` is answered with the usual 400 error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonForm<T>(pub T);
