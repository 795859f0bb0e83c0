/* src/server/core/rust/src/manifest/types.rs */

use indexmap::IndexMap;
use quire_engine::{Asset, AssetBundle};
use serde::Deserialize;

/// On-disk shape of `assets.json`.
#[derive(Deserialize)]
pub(super) struct AssetsFile {
  #[serde(default)]
  pub(super) entry: AssetBundle,
  #[serde(default)]
  pub(super) bootstrap: Option<AssetRef>,
  #[serde(default)]
  pub(super) modules: IndexMap<String, AssetBundle>,
  /// Prepended to every relative `src`. Defaults to `/`.
  #[serde(default)]
  pub(super) base: Option<String>,
}

/// Assets may be written as a bare path or as a full object.
#[derive(Deserialize)]
#[serde(untagged)]
pub(super) enum AssetRef {
  Path(String),
  Full(Asset),
}

impl AssetRef {
  pub(super) fn into_asset(self) -> Asset {
    match self {
      AssetRef::Path(src) => Asset::module(src),
      AssetRef::Full(asset) => asset,
    }
  }
}

/// Join `base` and `src` unless `src` is already absolute or a full URL.
pub(super) fn with_base(base: &str, src: &str) -> String {
  if src.starts_with('/') || src.contains("://") {
    return src.to_string();
  }
  let base = base.trim_end_matches('/');
  format!("{base}/{src}")
}

pub(super) fn rebase(base: &str, bundle: &mut AssetBundle) {
  for asset in bundle.scripts.iter_mut().chain(bundle.styles.iter_mut()) {
    asset.src = with_base(base, &asset.src);
  }
}
