/* src/server/core/rust/src/resolve.rs */

use std::sync::Arc;

use quire_engine::{
  AssetBundle, AssetLoadTiming, ResponseState, render_load_tags, render_preload_tags,
  script_safe_json,
};
use quire_injector::{PlaceholderKind, Segment, escape_html, scan};

use crate::app::AppRenderer;
use crate::codec::SerializationCodec;
use crate::errors::RenderError;
use crate::manifest::AssetManifest;
use crate::request::RequestContext;

/// Replaces placeholder markers in rendered chunks with computed markup.
///
/// One resolver serves one request. The application renderer runs at most
/// once; its markup is cached for every later `content` placeholder, and the
/// entry bundle is cached the same way.
pub struct PlaceholderResolver {
  app: Option<Box<dyn AppRenderer>>,
  content: Option<String>,
  manifest: Option<Arc<dyn AssetManifest>>,
  entry: Option<AssetBundle>,
  codec: Arc<dyn SerializationCodec>,
  request: RequestContext,
}

impl PlaceholderResolver {
  pub fn new(
    app: Option<Box<dyn AppRenderer>>,
    manifest: Option<Arc<dyn AssetManifest>>,
    codec: Arc<dyn SerializationCodec>,
    request: RequestContext,
  ) -> Self {
    Self { app, content: None, manifest, entry: None, codec, request }
  }

  pub fn request(&self) -> &RequestContext {
    &self.request
  }

  pub fn has_app(&self) -> bool {
    self.app.is_some() || self.content.is_some()
  }

  /// Run the application renderer unless it already ran, returning its markup.
  pub async fn render_content(&mut self, state: &mut ResponseState) -> Result<&str, RenderError> {
    if self.content.is_none() {
      let mut app = self.app.take().ok_or(RenderError::MissingAppRenderer)?;
      let html = app.render(state, &self.request).await?;
      tracing::debug!(bytes = html.len(), "application rendered");
      self.content = Some(html);
    }
    Ok(self.content.as_deref().unwrap_or_default())
  }

  /// The manifest's entry bundle, fetched on first use. `None` without a
  /// manifest.
  pub async fn entry_bundle(&mut self) -> Result<Option<&AssetBundle>, RenderError> {
    let Some(manifest) = &self.manifest else {
      return Ok(None);
    };
    if self.entry.is_none() {
      self.entry = Some(manifest.entry(&self.request).await?);
    }
    Ok(self.entry.as_ref())
  }

  /// Resolve every placeholder in `chunk`, left to right. Replacement markup
  /// is appended as-is and never scanned again.
  ///
  /// A chunk holding a `content` placeholder renders the application first,
  /// so asset and serialization placeholders before it see what it recorded.
  pub async fn resolve_chunk(
    &mut self,
    chunk: &str,
    state: &mut ResponseState,
  ) -> Result<String, RenderError> {
    let segments = scan(chunk)?;
    let has_content = segments
      .iter()
      .any(|segment| matches!(segment, Segment::Placeholder { kind: PlaceholderKind::Content, .. }));
    if has_content {
      self.render_content(state).await?;
    }
    let mut out = String::with_capacity(chunk.len());
    for segment in segments {
      match segment {
        Segment::Text(text) => out.push_str(text),
        Segment::Placeholder { kind, .. } => {
          let html = self.resolve_placeholder(kind, state).await?;
          out.push_str(&html);
        }
      }
    }
    Ok(out)
  }

  async fn resolve_placeholder(
    &mut self,
    kind: PlaceholderKind,
    state: &mut ResponseState,
  ) -> Result<String, RenderError> {
    match kind {
      PlaceholderKind::Content => self.render_content(state).await.map(str::to_string),
      PlaceholderKind::Serializations => self.serializations(state).await,
      PlaceholderKind::EntryAssets => self.entry_assets().await,
      PlaceholderKind::AsyncAssets => {
        self.selected_assets(kind, state, AssetLoadTiming::Load).await
      }
      PlaceholderKind::PreloadAssets => {
        self.selected_assets(kind, state, AssetLoadTiming::Preload).await
      }
    }
  }

  async fn serializations(&mut self, state: &ResponseState) -> Result<String, RenderError> {
    let mut out = String::new();
    for (name, value) in state.serializations() {
      let encoded = self
        .codec
        .encode(value)
        .await
        .map_err(|source| RenderError::Serialization { name: name.clone(), source })?;
      out.push_str(&format!(
        r#"<script type="application/json" data-quire-serialization="{}">{}</script>"#,
        escape_html(name),
        script_safe_json(&encoded.to_string()),
      ));
    }
    Ok(out)
  }

  async fn entry_assets(&mut self) -> Result<String, RenderError> {
    let bootstrap = match &self.manifest {
      Some(manifest) => manifest.bootstrap(),
      None => return Err(RenderError::MissingAssetManifest(PlaceholderKind::EntryAssets)),
    };
    let mut out = String::new();
    if let Some(loader) = bootstrap {
      out.push_str(&quire_engine::assets::script_tag(&loader, false));
    }
    if let Some(entry) = self.entry_bundle().await? {
      out.push_str(&render_load_tags(entry, false));
    }
    Ok(out)
  }

  async fn selected_assets(
    &mut self,
    kind: PlaceholderKind,
    state: &ResponseState,
    timing: AssetLoadTiming,
  ) -> Result<String, RenderError> {
    let manifest = self.manifest.as_ref().ok_or(RenderError::MissingAssetManifest(kind))?;
    let selection = state.get_assets(&[timing]);
    if selection.is_empty() {
      return Ok(String::new());
    }
    let bundle = manifest.modules(&selection, &self.request).await?;
    tracing::debug!(placeholder = %kind, modules = selection.len(), "resolved module assets");
    Ok(match timing {
      AssetLoadTiming::Preload => render_preload_tags(&bundle),
      _ => render_load_tags(&bundle, true),
    })
  }
}
