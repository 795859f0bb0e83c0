/* src/server/core/rust/src/errors.rs */

use std::path::PathBuf;

use quire_injector::{MarkupError, PlaceholderKind};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while loading or querying an asset manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
  #[error("failed to read asset manifest {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("invalid asset manifest: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("module `{0}` is not in the asset manifest")]
  UnknownModule(String),

  #[error(transparent)]
  Other(BoxError),
}

/// Everything that can stop a page from rendering. No variant is the client's
/// fault, so all of them surface as 500.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("content placeholder reached but no application renderer is configured")]
  MissingAppRenderer,

  #[error(transparent)]
  Markup(#[from] MarkupError),

  #[error("`{0}` placeholder needs an asset manifest")]
  MissingAssetManifest(PlaceholderKind),

  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("application render failed: {0}")]
  App(#[source] BoxError),

  #[error("failed to encode serialization `{name}`: {source}")]
  Serialization {
    name: String,
    #[source]
    source: BoxError,
  },

  #[error("render cancelled")]
  Cancelled,
}

impl RenderError {
  pub fn app(err: impl Into<BoxError>) -> Self {
    Self::App(err.into())
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingAppRenderer => "MISSING_APP_RENDERER",
      Self::Markup(_) => "INVALID_TEMPLATE",
      Self::MissingAssetManifest(_) => "MISSING_ASSET_MANIFEST",
      Self::Manifest(_) => "ASSET_MANIFEST",
      Self::App(_) => "APP_RENDER",
      Self::Serialization { .. } => "SERIALIZATION",
      Self::Cancelled => "CANCELLED",
    }
  }

  pub fn status(&self) -> u16 {
    500
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn markup_errors_keep_their_message() {
    let err: RenderError =
      MarkupError::UnknownPlaceholder { name: "bogus".into(), offset: 3 }.into();
    assert_eq!(err.code(), "INVALID_TEMPLATE");
    assert_eq!(err.to_string(), "unknown placeholder `bogus` at byte 3");
  }

  #[test]
  fn every_error_is_a_server_error() {
    let errors = [
      RenderError::MissingAppRenderer,
      RenderError::MissingAssetManifest(PlaceholderKind::EntryAssets),
      RenderError::Manifest(ManifestError::UnknownModule("m".into())),
      RenderError::app("boom"),
      RenderError::Cancelled,
    ];
    for err in &errors {
      assert_eq!(err.status(), 500, "{}", err.code());
    }
  }

  #[test]
  fn app_error_wraps_message() {
    assert_eq!(RenderError::app("boom").to_string(), "application render failed: boom");
    assert_eq!(
      RenderError::MissingAssetManifest(PlaceholderKind::AsyncAssets).to_string(),
      "`async-assets` placeholder needs an asset manifest"
    );
  }
}
