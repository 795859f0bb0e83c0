/* src/server/core/rust/src/manifest/mod.rs */

mod types;

use std::path::Path;

use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use quire_engine::{Asset, AssetBundle, SelectedAsset};

use crate::errors::ManifestError;
use crate::request::RequestContext;
use types::{AssetsFile, rebase, with_base};

pub const MANIFEST_FILE: &str = "assets.json";

/// Maps the modules a render used to the files the client must fetch.
/// Shared across requests, so lookups only read.
pub trait AssetManifest: Send + Sync {
  /// Assets every page needs to boot.
  fn entry<'a>(&'a self, request: &'a RequestContext)
  -> BoxFuture<'a, Result<AssetBundle, ManifestError>>;

  /// Assets for the selected modules, restricted to the axes that matched.
  fn modules<'a>(
    &'a self,
    selection: &'a [SelectedAsset],
    request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<AssetBundle, ManifestError>>;

  /// Optional loader module emitted before the entry assets.
  fn bootstrap(&self) -> Option<Asset> {
    None
  }
}

/// A manifest fixed at startup, usually loaded from the build output.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetManifest {
  entry: AssetBundle,
  bootstrap: Option<Asset>,
  modules: IndexMap<String, AssetBundle>,
}

impl StaticAssetManifest {
  pub fn new(entry: AssetBundle) -> Self {
    Self { entry, bootstrap: None, modules: IndexMap::new() }
  }

  pub fn with_bootstrap(mut self, asset: Asset) -> Self {
    self.bootstrap = Some(asset);
    self
  }

  pub fn with_module(mut self, id: impl Into<String>, bundle: AssetBundle) -> Self {
    self.modules.insert(id.into(), bundle);
    self
  }

  /// Parse the contents of an `assets.json` file.
  pub fn from_json(json: &str) -> Result<Self, ManifestError> {
    let file: AssetsFile = serde_json::from_str(json)?;
    let base = file.base.unwrap_or_else(|| "/".to_string());

    let mut entry = file.entry;
    rebase(&base, &mut entry);
    let mut modules = file.modules;
    for bundle in modules.values_mut() {
      rebase(&base, bundle);
    }
    let bootstrap = file.bootstrap.map(|r| {
      let mut asset = r.into_asset();
      asset.src = with_base(&base, &asset.src);
      asset
    });

    Ok(Self { entry, bootstrap, modules })
  }

  /// Load `<dir>/assets.json`.
  pub fn load(dir: impl AsRef<Path>) -> Result<Self, ManifestError> {
    let path = dir.as_ref().join(MANIFEST_FILE);
    let json = std::fs::read_to_string(&path)
      .map_err(|source| ManifestError::Io { path: path.clone(), source })?;
    let manifest = Self::from_json(&json)?;
    tracing::debug!(
      path = %path.display(),
      modules = manifest.modules.len(),
      "loaded asset manifest"
    );
    Ok(manifest)
  }

  fn lookup(&self, selection: &[SelectedAsset]) -> Result<AssetBundle, ManifestError> {
    let mut bundle = AssetBundle::default();
    for selected in selection {
      let module = self
        .modules
        .get(&selected.id)
        .ok_or_else(|| ManifestError::UnknownModule(selected.id.clone()))?;
      bundle.extend(AssetBundle {
        scripts: if selected.scripts { module.scripts.clone() } else { Vec::new() },
        styles: if selected.styles { module.styles.clone() } else { Vec::new() },
      });
    }
    Ok(bundle)
  }
}

impl AssetManifest for StaticAssetManifest {
  fn entry<'a>(
    &'a self,
    _request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<AssetBundle, ManifestError>> {
    let bundle = self.entry.clone();
    Box::pin(async move { Ok(bundle) })
  }

  fn modules<'a>(
    &'a self,
    selection: &'a [SelectedAsset],
    _request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<AssetBundle, ManifestError>> {
    let result = self.lookup(selection);
    Box::pin(async move { result })
  }

  fn bootstrap(&self) -> Option<Asset> {
    self.bootstrap.clone()
  }
}
