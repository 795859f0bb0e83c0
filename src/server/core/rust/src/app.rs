/* src/server/core/rust/src/app.rs */

use futures_util::future::BoxFuture;
use quire_engine::ResponseState;

use crate::errors::RenderError;
use crate::request::RequestContext;

/// Renders the application body. It may mutate the response state while it
/// renders; everything it records is visible to placeholders resolved later.
pub trait AppRenderer: Send {
  fn render<'a>(
    &'a mut self,
    state: &'a mut ResponseState,
    request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<String, RenderError>>;
}

impl AppRenderer for String {
  fn render<'a>(
    &'a mut self,
    _state: &'a mut ResponseState,
    _request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<String, RenderError>> {
    let html = self.clone();
    Box::pin(async move { Ok(html) })
  }
}

impl AppRenderer for &'static str {
  fn render<'a>(
    &'a mut self,
    _state: &'a mut ResponseState,
    _request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<String, RenderError>> {
    let html = (*self).to_string();
    Box::pin(async move { Ok(html) })
  }
}

/// A synchronous closure as an application renderer.
pub struct SyncApp<F>(F);

impl<F> AppRenderer for SyncApp<F>
where
  F: FnMut(&mut ResponseState, &RequestContext) -> Result<String, RenderError> + Send,
{
  fn render<'a>(
    &'a mut self,
    state: &'a mut ResponseState,
    request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<String, RenderError>> {
    let result = (self.0)(state, request);
    Box::pin(async move { result })
  }
}

/// An asynchronous closure as an application renderer. The returned future
/// may hold the state borrow across await points.
pub struct AsyncApp<F>(F);

impl<F> AppRenderer for AsyncApp<F>
where
  F: for<'a> FnMut(
      &'a mut ResponseState,
      &'a RequestContext,
    ) -> BoxFuture<'a, Result<String, RenderError>>
    + Send,
{
  fn render<'a>(
    &'a mut self,
    state: &'a mut ResponseState,
    request: &'a RequestContext,
  ) -> BoxFuture<'a, Result<String, RenderError>> {
    (self.0)(state, request)
  }
}

pub fn sync_app<F>(f: F) -> SyncApp<F>
where
  F: FnMut(&mut ResponseState, &RequestContext) -> Result<String, RenderError> + Send,
{
  SyncApp(f)
}

pub fn async_app<F>(f: F) -> AsyncApp<F>
where
  F: for<'a> FnMut(
      &'a mut ResponseState,
      &'a RequestContext,
    ) -> BoxFuture<'a, Result<String, RenderError>>
    + Send,
{
  AsyncApp(f)
}
