/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_server::RenderError;

/// `RenderError` as an axum response. A newtype because neither the trait
/// nor the error type lives in this crate.
#[derive(Debug)]
pub struct AxumError(pub RenderError);

impl From<RenderError> for AxumError {
  fn from(err: RenderError) -> Self {
    Self(err)
  }
}

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    tracing::error!(code = err.code(), error = %err, "page render failed");
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let payload = serde_json::json!({
      "ok": false,
      "error": { "code": err.code(), "message": err.to_string() }
    });
    (status, axum::Json(payload)).into_response()
  }
}
