/* src/server/core/rust/src/lib.rs */

pub mod app;
pub mod codec;
pub mod errors;
pub mod manifest;
pub mod page;
pub mod request;
pub mod resolve;
pub mod response;
pub mod stream;

// Re-exports for ergonomic use
pub use app::{AppRenderer, AsyncApp, SyncApp, async_app, sync_app};
pub use codec::{JsonCodec, SerializationCodec};
pub use errors::{BoxError, ManifestError, RenderError};
pub use futures_util::future::BoxFuture;
pub use manifest::{AssetManifest, MANIFEST_FILE, StaticAssetManifest};
pub use page::{PageRender, StreamingPage};
pub use request::RequestContext;
pub use resolve::PlaceholderResolver;
pub use response::{HTML_CONTENT_TYPE, RenderedPage, ResponseHead, finalize_head};
pub use stream::{ResponseStreamer, StreamPhase};

pub use quire_engine;
pub use quire_injector;
pub use tokio_util::sync::CancellationToken;

#[cfg(test)]
mod tests;
