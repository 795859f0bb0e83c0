/* src/server/core/rust/src/stream.rs */

use bytes::Bytes;
use futures_core::Stream;
use quire_engine::ResponseState;
use tokio_util::sync::CancellationToken;

use crate::errors::RenderError;
use crate::resolve::PlaceholderResolver;
use crate::response::{ResponseHead, finalize_head};

/// Where a streamed render is. `Flushing(n)` means `n` chunks have been
/// emitted and more remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
  Idle,
  FirstChunkPending,
  Flushing(usize),
  Closed,
  Aborted,
}

/// Resolves chunks one at a time, in order. Owns the response state for the
/// rest of the request; nothing else mutates it once streaming starts.
pub struct ResponseStreamer {
  chunks: Vec<String>,
  resolver: PlaceholderResolver,
  state: ResponseState,
  phase: StreamPhase,
  cancel: CancellationToken,
}

impl ResponseStreamer {
  pub fn new(
    chunks: Vec<String>,
    resolver: PlaceholderResolver,
    state: ResponseState,
    cancel: CancellationToken,
  ) -> Self {
    Self { chunks, resolver, state, phase: StreamPhase::Idle, cancel }
  }

  pub fn phase(&self) -> StreamPhase {
    self.phase
  }

  pub fn state(&self) -> &ResponseState {
    &self.state
  }

  pub fn total_chunks(&self) -> usize {
    self.chunks.len()
  }

  /// Status and headers as they stand now. Called once, right after the
  /// first chunk resolves.
  pub async fn head(&mut self) -> Result<ResponseHead, RenderError> {
    let entry = self.resolver.entry_bundle().await?;
    Ok(finalize_head(&self.state, entry))
  }

  /// Resolve and return the next chunk. `None` once the stream is closed or
  /// after an error has been returned.
  pub async fn next_chunk(&mut self) -> Option<Result<String, RenderError>> {
    let index = match self.phase {
      StreamPhase::Idle => {
        self.phase = StreamPhase::FirstChunkPending;
        0
      }
      StreamPhase::Flushing(emitted) => emitted,
      StreamPhase::FirstChunkPending | StreamPhase::Closed | StreamPhase::Aborted => return None,
    };
    let Some(chunk) = self.chunks.get(index) else {
      self.phase = StreamPhase::Closed;
      return None;
    };

    let result = if self.cancel.is_cancelled() {
      Err(RenderError::Cancelled)
    } else {
      let token = self.cancel.clone();
      tokio::select! {
        biased;
        () = token.cancelled() => Err(RenderError::Cancelled),
        resolved = self.resolver.resolve_chunk(chunk, &mut self.state) => resolved,
      }
    };

    match result {
      Ok(html) => {
        let emitted = index + 1;
        self.phase = if emitted < self.chunks.len() {
          StreamPhase::Flushing(emitted)
        } else {
          StreamPhase::Closed
        };
        tracing::debug!(chunk = index, bytes = html.len(), "chunk resolved");
        Some(Ok(html))
      }
      Err(err) => {
        self.phase = StreamPhase::Aborted;
        tracing::warn!(chunk = index, code = err.code(), error = %err, "stream aborted");
        Some(Err(err))
      }
    }
  }

  /// The remaining chunks as a byte stream. Dropping it drops any chunk
  /// still being resolved.
  pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, RenderError>> + Send + 'static {
    futures_util::stream::unfold(self, |mut streamer| async move {
      let item = streamer.next_chunk().await?;
      Some((item.map(Bytes::from), streamer))
    })
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use futures_util::StreamExt;

  use super::*;
  use crate::codec::JsonCodec;
  use crate::request::RequestContext;

  fn streamer(chunks: &[&str], app: &'static str) -> ResponseStreamer {
    let resolver = PlaceholderResolver::new(
      Some(Box::new(app)),
      None,
      Arc::new(JsonCodec),
      RequestContext::default(),
    );
    ResponseStreamer::new(
      chunks.iter().map(|c| (*c).to_string()).collect(),
      resolver,
      ResponseState::new(),
      CancellationToken::new(),
    )
  }

  #[tokio::test]
  async fn walks_phases_in_order() {
    let content = "<quire-placeholder-content></quire-placeholder-content>";
    let mut s = streamer(&["a", content, "c"], "b");
    assert_eq!(s.phase(), StreamPhase::Idle);
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "a");
    assert_eq!(s.phase(), StreamPhase::Flushing(1));
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "b");
    assert_eq!(s.phase(), StreamPhase::Flushing(2));
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "c");
    assert_eq!(s.phase(), StreamPhase::Closed);
    assert!(s.next_chunk().await.is_none());
  }

  #[tokio::test]
  async fn single_chunk_closes_immediately() {
    let mut s = streamer(&["only"], "");
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "only");
    assert_eq!(s.phase(), StreamPhase::Closed);
  }

  #[tokio::test]
  async fn no_chunks_closes_without_output() {
    let mut s = streamer(&[], "");
    assert_eq!(s.total_chunks(), 0);
    assert!(s.next_chunk().await.is_none());
    assert_eq!(s.phase(), StreamPhase::Closed);
    assert!(s.next_chunk().await.is_none());
  }

  #[tokio::test]
  async fn error_aborts_and_ends_stream() {
    let bogus = "<quire-placeholder-nope></quire-placeholder-nope>";
    let mut s = streamer(&["ok", bogus, "never"], "");
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "ok");
    let err = s.next_chunk().await.unwrap().unwrap_err();
    assert!(matches!(err, RenderError::Markup(_)));
    assert_eq!(s.phase(), StreamPhase::Aborted);
    assert!(s.next_chunk().await.is_none());
  }

  #[tokio::test]
  async fn cancellation_is_checked_before_each_chunk() {
    let mut s = streamer(&["a", "b"], "");
    let token = s.cancel.clone();
    assert_eq!(s.next_chunk().await.unwrap().unwrap(), "a");
    token.cancel();
    assert!(matches!(s.next_chunk().await, Some(Err(RenderError::Cancelled))));
    assert_eq!(s.phase(), StreamPhase::Aborted);
  }

  #[tokio::test]
  async fn into_stream_yields_bytes_then_ends_after_error() {
    let entry = "<quire-placeholder-entry-assets></quire-placeholder-entry-assets>";
    let s = streamer(&["a", entry, "c"], "");
    let items: Vec<_> = s.into_stream().collect().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("a"));
    assert!(matches!(items[1], Err(RenderError::MissingAssetManifest(_))));
  }
}
