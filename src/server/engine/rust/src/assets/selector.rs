/* src/server/engine/rust/src/assets/selector.rs */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// When a module's scripts or styles should be fetched. Ordered by priority:
/// `Never < Preload < Load`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AssetLoadTiming {
  #[default]
  Never,
  Preload,
  Load,
}

/// Per-axis timing recorded for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUsage {
  pub scripts: AssetLoadTiming,
  pub styles: AssetLoadTiming,
}

impl AssetUsage {
  /// Per-axis maximum; a timing is never lowered.
  pub fn merge(self, other: AssetUsage) -> AssetUsage {
    AssetUsage { scripts: self.scripts.max(other.scripts), styles: self.styles.max(other.styles) }
  }
}

/// Options for `AssetSelector::use_asset`. `timing` fills whichever axis is
/// left unset and itself defaults to `Load`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UseAsset {
  pub scripts: Option<AssetLoadTiming>,
  pub styles: Option<AssetLoadTiming>,
  pub timing: Option<AssetLoadTiming>,
}

impl UseAsset {
  pub fn timing(timing: AssetLoadTiming) -> Self {
    Self { timing: Some(timing), ..Self::default() }
  }

  pub fn scripts(mut self, timing: AssetLoadTiming) -> Self {
    self.scripts = Some(timing);
    self
  }

  pub fn styles(mut self, timing: AssetLoadTiming) -> Self {
    self.styles = Some(timing);
    self
  }

  fn usage(self) -> AssetUsage {
    let fallback = self.timing.unwrap_or(AssetLoadTiming::Load);
    AssetUsage {
      scripts: self.scripts.unwrap_or(fallback),
      styles: self.styles.unwrap_or(fallback),
    }
  }
}

/// A module picked by `AssetSelector::get`, with the axes that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
  pub id: String,
  pub scripts: bool,
  pub styles: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AssetSelector {
  usage: IndexMap<String, AssetUsage>,
}

impl AssetSelector {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn use_asset(&mut self, id: impl Into<String>, options: UseAsset) {
    let incoming = options.usage();
    self
      .usage
      .entry(id.into())
      .and_modify(|existing| *existing = existing.merge(incoming))
      .or_insert(incoming);
  }

  pub fn usage(&self, id: &str) -> Option<AssetUsage> {
    self.usage.get(id).copied()
  }

  pub fn is_empty(&self) -> bool {
    self.usage.is_empty()
  }

  /// Modules whose scripts or styles timing is one of `timings`, in the order
  /// they were first used.
  pub fn get(&self, timings: &[AssetLoadTiming]) -> Vec<SelectedAsset> {
    self
      .usage
      .iter()
      .filter_map(|(id, usage)| {
        let scripts = timings.contains(&usage.scripts);
        let styles = timings.contains(&usage.styles);
        (scripts || styles).then(|| SelectedAsset { id: id.clone(), scripts, styles })
      })
      .collect()
  }
}
