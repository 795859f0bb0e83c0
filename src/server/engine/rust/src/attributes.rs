/* src/server/engine/rust/src/attributes.rs */

use indexmap::IndexMap;
use quire_injector::escape_html;
use serde::{Deserialize, Serialize};

/// Ordered HTML attribute set. Inserting an existing key overwrites its value
/// in place; new keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.insert(name, value);
    self
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.0.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.0.get(name).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Overlay `other` on top of `self`; keys in `other` win.
  pub fn merge(&mut self, other: &Attributes) {
    for (name, value) in &other.0 {
      self.0.insert(name.clone(), value.clone());
    }
  }

  /// Render as ` name="value"` pairs (leading space included). Empty values
  /// render as bare boolean attributes.
  pub fn to_html(&self) -> String {
    let mut out = String::new();
    for (name, value) in &self.0 {
      out.push(' ');
      out.push_str(name);
      if !value.is_empty() {
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
      }
    }
    out
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

impl<const N: usize> From<[(&str, &str); N]> for Attributes {
  fn from(pairs: [(&str, &str); N]) -> Self {
    pairs.into_iter().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_in_insertion_order() {
    let attrs = Attributes::from([("name", "x"), ("content", "1")]);
    assert_eq!(attrs.to_html(), r#" name="x" content="1""#);
  }

  #[test]
  fn overwrite_keeps_original_position() {
    let mut attrs = Attributes::from([("a", "1"), ("b", "2")]);
    attrs.insert("a", "3");
    assert_eq!(attrs.to_html(), r#" a="3" b="2""#);
  }

  #[test]
  fn merge_later_wins() {
    let mut attrs = Attributes::from([("lang", "en"), ("class", "light")]);
    attrs.merge(&Attributes::from([("class", "dark"), ("dir", "ltr")]));
    assert_eq!(attrs.get("class"), Some("dark"));
    assert_eq!(attrs.len(), 3);
  }

  #[test]
  fn escapes_values_and_renders_boolean() {
    let attrs = Attributes::new().with("title", "\"q\" & <a>").with("async", "");
    assert_eq!(attrs.to_html(), r#" title="&quot;q&quot; &amp; &lt;a&gt;" async"#);
  }
}
