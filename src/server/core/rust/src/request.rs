/* src/server/core/rust/src/request.rs */

use http::{HeaderMap, Uri, header};

/// The parts of the incoming request that renderers and manifests may read.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
  pub uri: Uri,
  pub headers: HeaderMap,
}

impl RequestContext {
  pub fn new(uri: Uri) -> Self {
    Self { uri, headers: HeaderMap::new() }
  }

  pub fn with_headers(mut self, headers: HeaderMap) -> Self {
    self.headers = headers;
    self
  }

  pub fn from_parts(parts: &http::request::Parts) -> Self {
    Self { uri: parts.uri.clone(), headers: parts.headers.clone() }
  }

  pub fn path(&self) -> &str {
    self.uri.path()
  }

  /// A fresh response state that sees this request's cookies.
  pub fn response_state(&self) -> quire_engine::ResponseState {
    quire_engine::ResponseState::from_cookie_header(self.cookie_header())
  }

  /// The raw `Cookie` header, when present and valid ASCII.
  pub fn cookie_header(&self) -> Option<&str> {
    self.headers.get(header::COOKIE).and_then(|v| v.to_str().ok())
  }
}

impl<B> From<&http::Request<B>> for RequestContext {
  fn from(req: &http::Request<B>) -> Self {
    Self { uri: req.uri().clone(), headers: req.headers().clone() }
  }
}
