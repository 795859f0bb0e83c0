/* src/server/engine/rust/src/assets/mod.rs */

mod selector;

pub use selector::{AssetLoadTiming, AssetSelector, AssetUsage, SelectedAsset, UseAsset};

use serde::{Deserialize, Serialize};

use crate::attributes::Attributes;

/// One built file: a source URL plus the attributes its tag needs
/// (`type`, `integrity`, `crossorigin`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
  pub src: String,
  #[serde(default, skip_serializing_if = "Attributes::is_empty")]
  pub attributes: Attributes,
}

impl Asset {
  pub fn new(src: impl Into<String>) -> Self {
    Self { src: src.into(), attributes: Attributes::new() }
  }

  pub fn module(src: impl Into<String>) -> Self {
    Self::new(src).attribute("type", "module")
  }

  pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.insert(name, value);
    self
  }

  pub fn is_module(&self) -> bool {
    self.attributes.get("type") == Some("module")
  }

  // Attributes that must travel with a preload hint for the fetch to be reused.
  fn fetch_attributes(&self) -> Attributes {
    self
      .attributes
      .iter()
      .filter(|(name, _)| matches!(*name, "integrity" | "crossorigin"))
      .collect()
  }
}

/// Scripts and styles resolved from the asset manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
  #[serde(default)]
  pub scripts: Vec<Asset>,
  #[serde(default)]
  pub styles: Vec<Asset>,
}

impl AssetBundle {
  pub fn is_empty(&self) -> bool {
    self.scripts.is_empty() && self.styles.is_empty()
  }

  /// Append `other`, skipping sources already present.
  pub fn extend(&mut self, other: AssetBundle) {
    fn push_unique(into: &mut Vec<Asset>, from: Vec<Asset>) {
      for asset in from {
        if !into.iter().any(|a| a.src == asset.src) {
          into.push(asset);
        }
      }
    }
    push_unique(&mut self.scripts, other.scripts);
    push_unique(&mut self.styles, other.styles);
  }
}

pub fn script_tag(asset: &Asset, async_load: bool) -> String {
  let mut attrs = Attributes::new().with("src", asset.src.as_str());
  attrs.merge(&asset.attributes);
  if async_load && attrs.get("async").is_none() {
    attrs.insert("async", "");
  }
  format!("<script{}></script>", attrs.to_html())
}

pub fn style_tag(asset: &Asset) -> String {
  let mut attrs = Attributes::new().with("rel", "stylesheet").with("href", asset.src.as_str());
  attrs.merge(&asset.attributes);
  format!("<link{}>", attrs.to_html())
}

pub fn preload_script_tag(asset: &Asset) -> String {
  let mut attrs = if asset.is_module() {
    Attributes::new().with("rel", "modulepreload").with("href", asset.src.as_str())
  } else {
    Attributes::new().with("rel", "preload").with("href", asset.src.as_str()).with("as", "script")
  };
  attrs.merge(&asset.fetch_attributes());
  format!("<link{}>", attrs.to_html())
}

pub fn preload_style_tag(asset: &Asset) -> String {
  let mut attrs =
    Attributes::new().with("rel", "preload").with("href", asset.src.as_str()).with("as", "style");
  attrs.merge(&asset.fetch_attributes());
  format!("<link{}>", attrs.to_html())
}

/// Styles first so they start downloading before any script executes.
pub fn render_load_tags(bundle: &AssetBundle, async_load: bool) -> String {
  let mut out = String::new();
  for style in &bundle.styles {
    out.push_str(&style_tag(style));
  }
  for script in &bundle.scripts {
    out.push_str(&script_tag(script, async_load));
  }
  out
}

pub fn render_preload_tags(bundle: &AssetBundle) -> String {
  let mut out = String::new();
  for style in &bundle.styles {
    out.push_str(&preload_style_tag(style));
  }
  for script in &bundle.scripts {
    out.push_str(&preload_script_tag(script));
  }
  out
}

/// `Link` header values announcing every asset in `bundle` as a preload.
pub fn preload_link_values(bundle: &AssetBundle) -> Vec<String> {
  let styles = bundle.styles.iter().map(|a| format!("<{}>; rel=\"preload\"; as=\"style\"", a.src));
  let scripts = bundle.scripts.iter().map(|a| {
    if a.is_module() {
      format!("<{}>; rel=\"modulepreload\"", a.src)
    } else {
      format!("<{}>; rel=\"preload\"; as=\"script\"", a.src)
    }
  });
  styles.chain(scripts).collect()
}
