/* src/server/engine/rust/src/state.rs */

use http::HeaderMap;
use indexmap::IndexMap;
use serde::Serialize;

use crate::assets::{AssetLoadTiming, AssetSelector, SelectedAsset, UseAsset};
use crate::attributes::Attributes;
use crate::cookies::{CookieOptions, Cookies};
use crate::head::{HeadElementKind, dedupe_metas};
use crate::resolvable::Resolvable;

pub const DEFAULT_STATUS: u16 = 200;

/// Which document element an attribute set applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTarget {
  Html,
  Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
  Title,
  Meta,
  Link,
  HtmlAttributes,
  BodyAttributes,
}

/// Handle returned by every `add_*` call. Pass it to `ResponseState::dispose`
/// to remove the entry it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Disposer {
  slot: Slot,
  id: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
  id: u64,
  value: T,
}

/// Everything a request's render records about its response besides the
/// application markup. One instance per request; the document pass reads it
/// and the application pass mutates it.
#[derive(Debug, Clone)]
pub struct ResponseState {
  next_id: u64,
  titles: Vec<Entry<Resolvable<String>>>,
  metas: Vec<Entry<Resolvable<Attributes>>>,
  links: Vec<Entry<Resolvable<Attributes>>>,
  html_attributes: Vec<Entry<Resolvable<Attributes>>>,
  body_attributes: Vec<Entry<Resolvable<Attributes>>>,
  status: u16,
  cookies: Cookies,
  serializations: IndexMap<String, serde_json::Value>,
  assets: AssetSelector,
  headers: HeaderMap,
}

impl Default for ResponseState {
  fn default() -> Self {
    Self::new()
  }
}

fn resolve_all(entries: &[Entry<Resolvable<Attributes>>]) -> impl Iterator<Item = Attributes> + '_ {
  entries.iter().map(|e| e.value.resolve())
}

impl ResponseState {
  pub fn new() -> Self {
    Self {
      next_id: 0,
      titles: Vec::new(),
      metas: Vec::new(),
      links: Vec::new(),
      html_attributes: Vec::new(),
      body_attributes: Vec::new(),
      status: DEFAULT_STATUS,
      cookies: Cookies::default(),
      serializations: IndexMap::new(),
      assets: AssetSelector::new(),
      headers: HeaderMap::new(),
    }
  }

  /// State for a request carrying the given `Cookie` header.
  pub fn from_cookie_header(header: Option<&str>) -> Self {
    let mut state = Self::new();
    if let Some(header) = header {
      state.cookies = Cookies::from_header(header);
    }
    state
  }

  fn next_disposer(&mut self, slot: Slot) -> Disposer {
    self.next_id += 1;
    Disposer { slot, id: self.next_id }
  }

  // -- status --

  /// Raise the status code. Lower codes than the current one are ignored.
  pub fn set_status(&mut self, code: u16) {
    if code < self.status {
      tracing::trace!(current = self.status, ignored = code, "status not lowered");
      return;
    }
    self.status = code;
  }

  pub fn status(&self) -> u16 {
    self.status
  }

  // -- title / head --

  pub fn add_title(&mut self, title: impl Into<Resolvable<String>>) -> Disposer {
    let disposer = self.next_disposer(Slot::Title);
    self.titles.push(Entry { id: disposer.id, value: title.into() });
    disposer
  }

  /// The most recently added title still present.
  pub fn title(&self) -> Option<String> {
    self.titles.last().map(|e| e.value.resolve())
  }

  pub fn add_head_element(
    &mut self,
    kind: HeadElementKind,
    attributes: impl Into<Resolvable<Attributes>>,
  ) -> Disposer {
    let (slot, list) = match kind {
      HeadElementKind::Meta => (Slot::Meta, &mut self.metas),
      HeadElementKind::Link => (Slot::Link, &mut self.links),
    };
    self.next_id += 1;
    let disposer = Disposer { slot, id: self.next_id };
    list.push(Entry { id: disposer.id, value: attributes.into() });
    disposer
  }

  /// Metas after name-keyed deduplication.
  pub fn metas(&self) -> Vec<Attributes> {
    dedupe_metas(resolve_all(&self.metas))
  }

  pub fn links(&self) -> Vec<Attributes> {
    resolve_all(&self.links).collect()
  }

  // -- document attributes --

  pub fn add_attributes(
    &mut self,
    target: AttributeTarget,
    attributes: impl Into<Resolvable<Attributes>>,
  ) -> Disposer {
    let slot = match target {
      AttributeTarget::Html => Slot::HtmlAttributes,
      AttributeTarget::Body => Slot::BodyAttributes,
    };
    let disposer = self.next_disposer(slot);
    let entry = Entry { id: disposer.id, value: attributes.into() };
    match target {
      AttributeTarget::Html => self.html_attributes.push(entry),
      AttributeTarget::Body => self.body_attributes.push(entry),
    }
    disposer
  }

  /// All attribute sets for `target` merged left to right.
  pub fn attributes(&self, target: AttributeTarget) -> Attributes {
    let entries = match target {
      AttributeTarget::Html => &self.html_attributes,
      AttributeTarget::Body => &self.body_attributes,
    };
    resolve_all(entries).fold(Attributes::new(), |mut merged, next| {
      merged.merge(&next);
      merged
    })
  }

  pub fn html_attributes(&self) -> Attributes {
    self.attributes(AttributeTarget::Html)
  }

  pub fn body_attributes(&self) -> Attributes {
    self.attributes(AttributeTarget::Body)
  }

  /// Remove the entry `disposer` was issued for. Returns false when it was
  /// already removed.
  pub fn dispose(&mut self, disposer: Disposer) -> bool {
    fn remove<T>(list: &mut Vec<Entry<T>>, id: u64) -> bool {
      let before = list.len();
      list.retain(|e| e.id != id);
      list.len() != before
    }
    match disposer.slot {
      Slot::Title => remove(&mut self.titles, disposer.id),
      Slot::Meta => remove(&mut self.metas, disposer.id),
      Slot::Link => remove(&mut self.links, disposer.id),
      Slot::HtmlAttributes => remove(&mut self.html_attributes, disposer.id),
      Slot::BodyAttributes => remove(&mut self.body_attributes, disposer.id),
    }
  }

  // -- cookies --

  pub fn cookies(&self) -> &Cookies {
    &self.cookies
  }

  pub fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) {
    self.cookies.set(name, value, options);
  }

  pub fn delete_cookie(&mut self, name: &str, options: &CookieOptions) {
    self.cookies.delete(name, options);
  }

  // -- serializations --

  /// Record `value` under `name`; `None` removes the entry.
  pub fn set_serialization(&mut self, name: impl Into<String>, value: Option<serde_json::Value>) {
    let name = name.into();
    match value {
      Some(value) => {
        self.serializations.insert(name, value);
      }
      None => {
        self.serializations.shift_remove(&name);
      }
    }
  }

  /// Serialize any `Serialize` value and record it under `name`.
  pub fn serialize<T: Serialize>(
    &mut self,
    name: impl Into<String>,
    value: &T,
  ) -> Result<(), serde_json::Error> {
    let value = serde_json::to_value(value)?;
    self.set_serialization(name, Some(value));
    Ok(())
  }

  pub fn serializations(&self) -> &IndexMap<String, serde_json::Value> {
    &self.serializations
  }

  // -- assets --

  pub fn use_asset(&mut self, id: impl Into<String>, options: UseAsset) {
    self.assets.use_asset(id, options);
  }

  pub fn get_assets(&self, timings: &[AssetLoadTiming]) -> Vec<SelectedAsset> {
    self.assets.get(timings)
  }

  pub fn assets(&self) -> &AssetSelector {
    &self.assets
  }

  // -- headers --

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Headers added during rendering. Use `append` so earlier values survive.
  pub fn headers_mut(&mut self) -> &mut HeaderMap {
    &mut self.headers
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;
  use std::sync::atomic::{AtomicU32, Ordering};

  use http::HeaderValue;
  use http::header::CACHE_CONTROL;

  use super::*;

  #[test]
  fn status_defaults_to_200_and_never_decreases() {
    let mut state = ResponseState::new();
    assert_eq!(state.status(), 200);
    for code in [404, 301, 500, 200] {
      state.set_status(code);
    }
    assert_eq!(state.status(), 500);
  }

  #[test]
  fn last_title_wins_and_dispose_restores_previous() {
    let mut state = ResponseState::new();
    state.add_title("Outer");
    let inner = state.add_title("Inner");
    assert_eq!(state.title().as_deref(), Some("Inner"));
    assert!(state.dispose(inner));
    assert_eq!(state.title().as_deref(), Some("Outer"));
    assert!(!state.dispose(inner));
  }

  #[test]
  fn deferred_title_resolves_on_read() {
    let count = Arc::new(AtomicU32::new(0));
    let reads = Arc::clone(&count);
    let mut state = ResponseState::new();
    state.add_title(Resolvable::deferred(move || {
      format!("Inbox ({})", reads.fetch_add(1, Ordering::SeqCst))
    }));
    assert_eq!(state.title().as_deref(), Some("Inbox (0)"));
    assert_eq!(state.title().as_deref(), Some("Inbox (1)"));
  }

  #[test]
  fn metas_with_same_name_keep_latest() {
    let mut state = ResponseState::new();
    state.add_head_element(HeadElementKind::Meta, [("name", "x"), ("content", "1")]);
    state.add_head_element(HeadElementKind::Meta, [("name", "y"), ("content", "a")]);
    state.add_head_element(HeadElementKind::Meta, [("name", "x"), ("content", "2")]);
    let metas = state.metas();
    assert_eq!(metas.len(), 2);
    assert_eq!(metas[0], Attributes::from([("name", "x"), ("content", "2")]));
  }

  #[test]
  fn links_are_all_kept() {
    let mut state = ResponseState::new();
    state.add_head_element(HeadElementKind::Link, [("rel", "icon"), ("href", "/a.ico")]);
    state.add_head_element(HeadElementKind::Link, [("rel", "icon"), ("href", "/b.ico")]);
    assert_eq!(state.links().len(), 2);
  }

  #[test]
  fn attributes_merge_left_to_right() {
    let mut state = ResponseState::new();
    state.add_attributes(AttributeTarget::Html, [("lang", "en"), ("class", "a")]);
    let dark = state.add_attributes(AttributeTarget::Html, [("class", "dark")]);
    state.add_attributes(AttributeTarget::Body, [("class", "page")]);

    assert_eq!(state.html_attributes(), Attributes::from([("lang", "en"), ("class", "dark")]));
    assert_eq!(state.body_attributes().get("class"), Some("page"));

    state.dispose(dark);
    assert_eq!(state.html_attributes().get("class"), Some("a"));
  }

  #[test]
  fn serialization_none_deletes() {
    let mut state = ResponseState::new();
    state.set_serialization("user", Some(serde_json::json!({"id": 1})));
    state.set_serialization("user", Some(serde_json::json!({"id": 2})));
    assert_eq!(state.serializations()["user"], serde_json::json!({"id": 2}));
    state.set_serialization("user", None);
    assert!(state.serializations().is_empty());
  }

  #[test]
  fn serialize_accepts_any_serde_value() {
    #[derive(Serialize)]
    struct Flags {
      beta: bool,
    }
    let mut state = ResponseState::new();
    state.serialize("flags", &Flags { beta: true }).unwrap();
    assert_eq!(state.serializations()["flags"], serde_json::json!({"beta": true}));
  }

  #[test]
  fn cookies_from_request_header() {
    let mut state = ResponseState::from_cookie_header(Some("theme=dark"));
    assert_eq!(state.cookies().get("theme"), Some("dark"));
    state.delete_cookie("theme", &CookieOptions::new());
    assert_eq!(state.cookies().get("theme"), None);
    assert_eq!(state.cookies().set_cookie_headers().len(), 1);
  }

  #[test]
  fn headers_append_not_overwrite() {
    let mut state = ResponseState::new();
    state.headers_mut().append(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    state.headers_mut().append(CACHE_CONTROL, HeaderValue::from_static("private"));
    assert_eq!(state.headers().get_all(CACHE_CONTROL).iter().count(), 2);
  }

  #[test]
  fn asset_usage_goes_through_selector() {
    let mut state = ResponseState::new();
    state.use_asset("m", UseAsset::timing(AssetLoadTiming::Preload));
    state.use_asset("m", UseAsset::timing(AssetLoadTiming::Load));
    assert_eq!(state.get_assets(&[AssetLoadTiming::Load]).len(), 1);
    assert!(state.get_assets(&[AssetLoadTiming::Preload]).is_empty());
  }
}
