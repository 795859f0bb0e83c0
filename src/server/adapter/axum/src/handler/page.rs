/* src/server/adapter/axum/src/handler/page.rs */

use std::sync::Arc;

use axum::extract::{MatchedPath, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_server::RequestContext;

use super::{AppState, RenderMode};
use crate::error::AxumError;
use crate::response::IntoAxumResponse;

pub(super) async fn handle_page(
  State(state): State<Arc<AppState>>,
  matched: MatchedPath,
  req: Request,
) -> Response {
  let Some(page) = state.pages.get(matched.as_str()) else {
    return StatusCode::NOT_FOUND.into_response();
  };

  let (parts, _body) = req.into_parts();
  let request = RequestContext::from_parts(&parts);
  let response_state = request.response_state();
  let mut render = (page.factory)(&request).request(request);
  if let Some(manifest) = &state.manifest {
    render = render.or_manifest(manifest.clone());
  }

  let result = match page.mode {
    RenderMode::Buffered => {
      render.render(response_state).await.map(IntoAxumResponse::into_axum_response)
    }
    RenderMode::Streaming => {
      render.stream(response_state).await.map(IntoAxumResponse::into_axum_response)
    }
  };
  result.unwrap_or_else(|err| AxumError(err).into_response())
}
