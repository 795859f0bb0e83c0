/* src/server/adapter/axum/src/response.rs */

use axum::body::{Body, Bytes};
use axum::http::StatusCode;
use axum::response::Response;
use futures_util::{Stream, TryStreamExt};
use quire_server::{RenderError, RenderedPage, ResponseHead, StreamingPage};

/// Conversion of a finished or started render into an axum response.
pub trait IntoAxumResponse {
  fn into_axum_response(self) -> Response;
}

fn status_code(status: u16) -> StatusCode {
  StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn with_head(body: Body, head: ResponseHead) -> Response {
  let mut response = Response::new(body);
  *response.status_mut() = status_code(head.status);
  *response.headers_mut() = head.headers;
  response
}

impl IntoAxumResponse for RenderedPage {
  fn into_axum_response(self) -> Response {
    with_head(Body::from(self.html), ResponseHead { status: self.status, headers: self.headers })
  }
}

impl IntoAxumResponse for StreamingPage {
  fn into_axum_response(self) -> Response {
    let (head, body) = self.into_parts();
    streaming_response(head, body)
  }
}

/// Mid-stream errors become body errors, which makes hyper abort the
/// connection instead of ending the response cleanly.
pub(crate) fn streaming_response<S>(head: ResponseHead, body: S) -> Response
where
  S: Stream<Item = Result<Bytes, RenderError>> + Send + 'static,
{
  let body = body.inspect_err(|err| {
    tracing::warn!(code = err.code(), error = %err, "aborting streamed response");
  });
  with_head(Body::from_stream(body), head)
}
