/* src/server/core/rust/src/page.rs */

use std::sync::Arc;

use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;
use quire_engine::{ResponseState, Template, render_template};
use quire_injector::{join_chunks, split_chunks};
use tokio_util::sync::CancellationToken;

use crate::app::AppRenderer;
use crate::codec::{JsonCodec, SerializationCodec};
use crate::errors::RenderError;
use crate::manifest::AssetManifest;
use crate::request::RequestContext;
use crate::resolve::PlaceholderResolver;
use crate::response::{RenderedPage, ResponseHead, finalize_head};
use crate::stream::ResponseStreamer;

/// Everything needed to render one page for one request.
pub struct PageRender {
  template: Template,
  app: Option<Box<dyn AppRenderer>>,
  manifest: Option<Arc<dyn AssetManifest>>,
  codec: Arc<dyn SerializationCodec>,
  request: RequestContext,
  cancel: CancellationToken,
}

impl PageRender {
  pub fn new(template: impl Into<Template>) -> Self {
    Self {
      template: template.into(),
      app: None,
      manifest: None,
      codec: Arc::new(JsonCodec),
      request: RequestContext::default(),
      cancel: CancellationToken::new(),
    }
  }

  pub fn app(mut self, app: impl AppRenderer + 'static) -> Self {
    self.app = Some(Box::new(app));
    self
  }

  pub fn manifest(mut self, manifest: Arc<dyn AssetManifest>) -> Self {
    self.manifest = Some(manifest);
    self
  }

  /// Use `manifest` unless one was already set.
  pub fn or_manifest(mut self, manifest: Arc<dyn AssetManifest>) -> Self {
    self.manifest.get_or_insert(manifest);
    self
  }

  pub fn codec(mut self, codec: Arc<dyn SerializationCodec>) -> Self {
    self.codec = codec;
    self
  }

  pub fn request(mut self, request: RequestContext) -> Self {
    self.request = request;
    self
  }

  /// Cancelling the token stops the render before its next chunk.
  pub fn cancel_token(mut self, token: CancellationToken) -> Self {
    self.cancel = token;
    self
  }

  fn into_resolver(self) -> (Template, PlaceholderResolver, CancellationToken) {
    let resolver = PlaceholderResolver::new(self.app, self.manifest, self.codec, self.request);
    (self.template, resolver, self.cancel)
  }

  /// Render the whole page into one string. The application renders first,
  /// so everything it records shows up in the document shell.
  #[tracing::instrument(name = "render_page", skip_all, fields(path = %self.request.path()))]
  pub async fn render(self, mut state: ResponseState) -> Result<RenderedPage, RenderError> {
    let (template, mut resolver, cancel) = self.into_resolver();
    if cancel.is_cancelled() {
      return Err(RenderError::Cancelled);
    }
    if resolver.has_app() {
      resolver.render_content(&mut state).await?;
    }

    let html = join_chunks(&render_template(&template, &state))?;
    let html = resolver.resolve_chunk(&html, &mut state).await?;
    let entry = resolver.entry_bundle().await?;
    let ResponseHead { status, headers } = finalize_head(&state, entry);
    tracing::debug!(status, bytes = html.len(), "page rendered");
    Ok(RenderedPage { html, status, headers })
  }

  /// Start a streamed render. Resolves the first chunk before returning, so
  /// any error up to that point happens before a byte is sent.
  ///
  /// A template without stream boundaries has nothing to flush early and
  /// renders like `render`: application first, then the shell.
  #[tracing::instrument(name = "stream_page", skip_all, fields(path = %self.request.path()))]
  pub async fn stream(self, mut state: ResponseState) -> Result<StreamingPage, RenderError> {
    let (template, mut resolver, cancel) = self.into_resolver();
    let mut chunks = split_chunks(&render_template(&template, &state))?;
    if chunks.len() == 1 && resolver.has_app() {
      tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(RenderError::Cancelled),
        rendered = resolver.render_content(&mut state) => {
          rendered?;
        }
      }
      chunks = split_chunks(&render_template(&template, &state))?;
    }
    let mut streamer = ResponseStreamer::new(chunks, resolver, state, cancel);

    let first = match streamer.next_chunk().await {
      Some(first) => first?,
      None => String::new(),
    };
    let head = streamer.head().await?;
    tracing::debug!(status = head.status, chunks = streamer.total_chunks(), "stream started");
    Ok(StreamingPage { head, first: Bytes::from(first), rest: streamer })
  }
}

/// A streamed page whose status and headers are already fixed.
pub struct StreamingPage {
  head: ResponseHead,
  first: Bytes,
  rest: ResponseStreamer,
}

impl StreamingPage {
  pub fn head(&self) -> &ResponseHead {
    &self.head
  }

  pub fn status(&self) -> u16 {
    self.head.status
  }

  pub fn first_chunk(&self) -> &Bytes {
    &self.first
  }

  pub fn streamer(&mut self) -> &mut ResponseStreamer {
    &mut self.rest
  }

  /// The head plus the full body, first chunk included.
  pub fn into_parts(
    self,
  ) -> (ResponseHead, impl Stream<Item = Result<Bytes, RenderError>> + Send + 'static) {
    let body = futures_util::stream::once(std::future::ready(Ok(self.first)))
      .chain(self.rest.into_stream());
    (self.head, body)
  }
}
