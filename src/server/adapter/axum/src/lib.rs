/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;
mod response;

use std::sync::Arc;

use quire_server::{AssetManifest, PageRender, RequestContext};

pub use error::AxumError;
pub use handler::{PageFactory, RenderMode};
pub use response::IntoAxumResponse;

/// Re-export quire-server core for convenience
pub use quire_server;

/// Page routes served by an axum router. Every request gets its own
/// `PageRender` from the route's factory and its own response state.
#[derive(Default)]
pub struct QuirePages {
  pages: Vec<handler::PageDef>,
  manifest: Option<Arc<dyn AssetManifest>>,
}

impl QuirePages {
  pub fn new() -> Self {
    Self::default()
  }

  /// Manifest used by pages whose factory does not set one.
  pub fn manifest(mut self, manifest: Arc<dyn AssetManifest>) -> Self {
    self.manifest = Some(manifest);
    self
  }

  /// Register a page. `route` uses axum path syntax, e.g. `/user/{id}`.
  pub fn page<F>(mut self, route: &str, mode: RenderMode, factory: F) -> Self
  where
    F: Fn(&RequestContext) -> PageRender + Send + Sync + 'static,
  {
    let factory: PageFactory = Arc::new(factory);
    self.pages.push(handler::PageDef { route: route.to_string(), mode, factory });
    self
  }

  pub fn into_router(self) -> axum::Router {
    handler::build_router(self.pages, self.manifest)
  }

  pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.into_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(%local_addr, "quire pages listening");
    axum::serve(listener, router).await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use http_body_util::BodyExt;
  use quire_server::quire_engine::{Asset, AssetBundle, Document, Element, Node};
  use quire_server::quire_injector::{PlaceholderKind, stream_boundary};
  use quire_server::{StaticAssetManifest, sync_app};
  use tower::ServiceExt;

  use super::*;

  fn router() -> axum::Router {
    let manifest = StaticAssetManifest::new(AssetBundle {
      scripts: vec![Asset::module("/main.js")],
      styles: vec![],
    });
    QuirePages::new()
      .manifest(Arc::new(manifest))
      .page("/", RenderMode::Buffered, |request| {
        let greeting = format!("<p>{}</p>", request.path());
        PageRender::new(Document::new(
          Element::new("html")
            .child(Element::new("head").child(Node::Title).child(PlaceholderKind::EntryAssets))
            .child(Element::new("body").child(PlaceholderKind::Content)),
        ))
        .app(sync_app(move |state, req| {
          state.add_title("Home");
          let theme = req.cookie_header().unwrap_or("none").to_string();
          Ok(format!("{greeting}<i>{theme}</i>"))
        }))
      })
      .page("/stream", RenderMode::Streaming, |_| {
        let body = stream_boundary(&PlaceholderKind::Content.markup());
        PageRender::new(format!("<main>{body}</main>")).app("streamed")
      })
      .page("/broken", RenderMode::Buffered, |_| PageRender::new(PlaceholderKind::Content.markup()))
      .page("/broken-late", RenderMode::Streaming, |_| {
        PageRender::new(format!("ok{}", stream_boundary(&PlaceholderKind::Content.markup())))
      })
      .into_router()
  }

  async fn get(uri: &str) -> axum::response::Response {
    let req = Request::builder().uri(uri).header(header::COOKIE, "theme=dark").body(Body::empty());
    router().oneshot(req.unwrap()).await.unwrap()
  }

  #[tokio::test]
  async fn buffered_page_renders_with_headers() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    assert_eq!(response.headers()[header::LINK], "</main.js>; rel=\"modulepreload\"");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
      body,
      concat!(
        "<!DOCTYPE html><html><head><title>Home</title>",
        r#"<script src="/main.js" type="module"></script></head>"#,
        "<body><p>/</p><i>theme=dark</i></body></html>"
      )
    );
  }

  #[tokio::test]
  async fn streaming_page_concatenates_chunks() {
    let response = get("/stream").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body, "<main>streamed</main>");
  }

  #[tokio::test]
  async fn render_error_before_output_is_500() {
    let response = get("/broken").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["error"]["code"], "MISSING_APP_RENDERER");
  }

  #[tokio::test]
  async fn render_error_mid_stream_aborts_body() {
    let response = get("/broken-late").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.into_body().collect().await.is_err());
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    assert_eq!(get("/missing").await.status(), StatusCode::NOT_FOUND);
  }
}
