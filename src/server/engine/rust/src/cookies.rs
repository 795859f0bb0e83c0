/* src/server/engine/rust/src/cookies.rs */

use std::fmt::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
  Strict,
  Lax,
  None,
}

impl SameSite {
  fn as_str(self) -> &'static str {
    match self {
      SameSite::Strict => "Strict",
      SameSite::Lax => "Lax",
      SameSite::None => "None",
    }
  }
}

/// Attributes attached to an outgoing `Set-Cookie` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
  pub path: Option<String>,
  pub domain: Option<String>,
  pub expires: Option<SystemTime>,
  pub max_age: Option<Duration>,
  pub secure: bool,
  pub http_only: bool,
  pub same_site: Option<SameSite>,
}

impl CookieOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }

  pub fn domain(mut self, domain: impl Into<String>) -> Self {
    self.domain = Some(domain.into());
    self
  }

  pub fn expires(mut self, at: SystemTime) -> Self {
    self.expires = Some(at);
    self
  }

  pub fn max_age(mut self, age: Duration) -> Self {
    self.max_age = Some(age);
    self
  }

  pub fn secure(mut self) -> Self {
    self.secure = true;
    self
  }

  pub fn http_only(mut self) -> Self {
    self.http_only = true;
    self
  }

  pub fn same_site(mut self, same_site: SameSite) -> Self {
    self.same_site = Some(same_site);
    self
  }
}

// Everything outside RFC 6265 cookie-octet, plus '%' so encoded values decode
// unambiguously. Non-ASCII bytes are always encoded.
const COOKIE_VALUE: &AsciiSet =
  &CONTROLS.add(b' ').add(b'"').add(b'%').add(b',').add(b';').add(b'\\');

/// Whether `name` is an RFC 6265 cookie name (an RFC 2616 token).
pub fn is_valid_cookie_name(name: &str) -> bool {
  !name.is_empty()
    && name.bytes().all(|b| {
      b.is_ascii_graphic()
        && !matches!(
          b,
          b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'['
            | b']' | b'?' | b'=' | b'{' | b'}'
        )
    })
}

/// Build one `Set-Cookie` header value. `None` when `name` is not a valid
/// cookie name.
pub fn serialize_cookie(name: &str, value: &str, options: &CookieOptions) -> Option<String> {
  if !is_valid_cookie_name(name) {
    return None;
  }
  let mut out = format!("{name}={}", utf8_percent_encode(value, COOKIE_VALUE));
  if let Some(age) = options.max_age {
    let _ = write!(out, "; Max-Age={}", age.as_secs());
  }
  if let Some(ref domain) = options.domain {
    let _ = write!(out, "; Domain={domain}");
  }
  if let Some(ref path) = options.path {
    let _ = write!(out, "; Path={path}");
  }
  if let Some(at) = options.expires {
    let _ = write!(out, "; Expires={}", httpdate::fmt_http_date(at));
  }
  if options.http_only {
    out.push_str("; HttpOnly");
  }
  if options.secure {
    out.push_str("; Secure");
  }
  if let Some(same_site) = options.same_site {
    let _ = write!(out, "; SameSite={}", same_site.as_str());
  }
  Some(out)
}

/// Cookies visible to the request plus the `Set-Cookie` values queued for the
/// response. Writes are reflected in later reads.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
  values: IndexMap<String, String>,
  outgoing: Vec<String>,
}

impl Cookies {
  /// Parse an incoming `Cookie` header (`a=1; b=2`). Malformed pairs are
  /// skipped; the first occurrence of a name wins, as browsers send the most
  /// specific cookie first.
  pub fn from_header(header: &str) -> Self {
    let mut values = IndexMap::new();
    for pair in header.split(';') {
      let Some((name, value)) = pair.split_once('=') else { continue };
      let name = name.trim();
      if name.is_empty() {
        continue;
      }
      let value = value.trim();
      let value = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')).unwrap_or(value);
      values
        .entry(name.to_string())
        .or_insert_with(|| percent_decode_str(value).decode_utf8_lossy().into_owned());
    }
    Self { values, outgoing: Vec::new() }
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  pub fn has(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Queue a `Set-Cookie`. Invalid names are logged and dropped.
  pub fn set(&mut self, name: &str, value: &str, options: &CookieOptions) {
    let Some(header) = serialize_cookie(name, value, options) else {
      tracing::warn!(name, "invalid cookie name, not set");
      return;
    };
    self.outgoing.push(header);
    self.values.insert(name.to_string(), value.to_string());
  }

  /// Expire a cookie. `path`/`domain` in `options` must match the ones it was
  /// set with for the browser to drop it.
  pub fn delete(&mut self, name: &str, options: &CookieOptions) {
    let expired = CookieOptions {
      expires: Some(UNIX_EPOCH),
      max_age: Some(Duration::ZERO),
      ..options.clone()
    };
    let Some(header) = serialize_cookie(name, "", &expired) else {
      tracing::warn!(name, "invalid cookie name, not deleted");
      return;
    };
    self.outgoing.push(header);
    self.values.shift_remove(name);
  }

  /// `Set-Cookie` values in the order they were written.
  pub fn set_cookie_headers(&self) -> &[String] {
    &self.outgoing
  }
}
