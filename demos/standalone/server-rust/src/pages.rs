/* demos/standalone/server-rust/src/pages.rs */

use std::sync::Arc;
use std::time::Duration;

use quire_server::quire_engine::{
  AssetLoadTiming, CookieOptions, Document, Element, HeadElementKind, Node, SameSite, UseAsset,
};
use quire_server::quire_injector::PlaceholderKind;
use quire_server::{AssetManifest, PageRender, async_app, sync_app};
use quire_server_axum::{QuirePages, RenderMode};
use serde_json::json;

fn visit_cookie() -> CookieOptions {
  CookieOptions::new()
    .path("/")
    .max_age(Duration::from_secs(60 * 60 * 24))
    .http_only()
    .same_site(SameSite::Lax)
}

/// `/` renders everything before sending a byte.
fn home() -> PageRender {
  PageRender::new(Document::standard()).app(sync_app(|state, request| {
    let previous = state.cookies().get("visits").and_then(|v| v.parse::<u32>().ok());
    let visits = previous.unwrap_or(0) + 1;
    state.set_cookie("visits", &visits.to_string(), &visit_cookie());

    state.add_title("Quire");
    state.add_head_element(
      HeadElementKind::Meta,
      [("name", "description"), ("content", "Buffered page")],
    );
    state.use_asset("counter", UseAsset::timing(AssetLoadTiming::Load));
    state.set_serialization("visits", Some(json!({ "count": visits, "path": request.path() })));

    Ok(format!(
      r#"<h1>Hello from Quire</h1><p>Visit #{visits}.</p><p><a href="/stream">Streamed page</a></p>"#
    ))
  }))
}

fn stream_document() -> Document {
  let head = Element::new("head")
    .child(Element::new("meta").attr("charset", "utf-8"))
    .child(Element::new("title").child(Node::text("Quire (streamed)")))
    .child(PlaceholderKind::EntryAssets);
  let body = Element::new("body")
    .child(Element::new("p").child(Node::text("Shell sent, waiting for the app...")))
    .child(Node::StreamBoundary(vec![
      Element::new("div").attr("id", "app").child(PlaceholderKind::Content).into(),
      PlaceholderKind::PreloadAssets.into(),
      PlaceholderKind::Serializations.into(),
      PlaceholderKind::AsyncAssets.into(),
    ]));
  Document::new(Element::new("html").attr("lang", "en").child(head).child(body))
}

fn millis(delay: Duration) -> u64 {
  u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// `/stream` flushes the shell, then the application once it finishes.
fn streamed(delay: Duration) -> PageRender {
  PageRender::new(stream_document()).app(async_app(move |state, _| {
    Box::pin(async move {
      tokio::time::sleep(delay).await;
      state.use_asset("counter", UseAsset::timing(AssetLoadTiming::Preload));
      state.set_serialization("delay_ms", Some(json!(millis(delay))));
      Ok("<h1>Rendered after a delay</h1>".to_string())
    })
  }))
}

pub fn routes(manifest: Arc<dyn AssetManifest>, delay: Duration) -> QuirePages {
  QuirePages::new()
    .manifest(manifest)
    .page("/", RenderMode::Buffered, |_| home())
    .page("/stream", RenderMode::Streaming, move |_| streamed(delay))
}
