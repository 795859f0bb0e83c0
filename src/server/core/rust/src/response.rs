/* src/server/core/rust/src/response.rs */

use http::header::{CONTENT_TYPE, LINK, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use quire_engine::{AssetBundle, ResponseState, preload_link_values};

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Status and headers of a response, fixed once the first byte is sent.
#[derive(Debug, Clone)]
pub struct ResponseHead {
  pub status: u16,
  pub headers: HeaderMap,
}

/// A fully buffered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
  pub html: String,
  pub status: u16,
  pub headers: HeaderMap,
}

/// Snapshot the response head from `state`. Render-time headers are kept as
/// they are; preload `Link` values and logged cookies are appended after them.
pub fn finalize_head(state: &ResponseState, entry: Option<&AssetBundle>) -> ResponseHead {
  let mut headers = state.headers().clone();
  if !headers.contains_key(CONTENT_TYPE) {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
  }
  if let Some(entry) = entry {
    for value in preload_link_values(entry) {
      append(&mut headers, LINK, &value);
    }
  }
  for cookie in state.cookies().set_cookie_headers() {
    append(&mut headers, SET_COOKIE, cookie);
  }
  ResponseHead { status: state.status(), headers }
}

fn append(headers: &mut HeaderMap, name: http::HeaderName, value: &str) {
  match HeaderValue::from_str(value) {
    Ok(value) => {
      headers.append(name, value);
    }
    Err(_) => tracing::warn!(header = %name, value, "dropping header value with invalid bytes"),
  }
}
