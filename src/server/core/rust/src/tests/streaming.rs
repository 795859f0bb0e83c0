/* src/server/core/rust/src/tests/streaming.rs */

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use quire_engine::{AssetLoadTiming, ResponseState, Template, UseAsset};
use quire_injector::stream_boundary;
use serde_json::json;
use tokio::sync::oneshot;

use super::*;

async fn collect(page: StreamingPage) -> (ResponseHead, Vec<Result<Bytes, RenderError>>) {
  let (head, body) = page.into_parts();
  (head, body.collect().await)
}

fn concat(items: &[Result<Bytes, RenderError>]) -> String {
  items
    .iter()
    .map(|item| String::from_utf8_lossy(item.as_ref().unwrap()).into_owned())
    .collect()
}

/// Head, then a boundary holding the content and serializations.
fn gated_template() -> String {
  let body = format!(
    "{}{}",
    PlaceholderKind::Content.markup(),
    PlaceholderKind::Serializations.markup()
  );
  format!("<html><head></head><body>{}</body></html>", stream_boundary(&body))
}

#[tokio::test]
async fn first_chunk_arrives_before_slow_app() {
  let (release, gate) = oneshot::channel::<()>();
  let finished = Arc::new(AtomicBool::new(false));

  let done = finished.clone();
  let mut gate = Some(gate);
  let app = async_app(move |state, _| {
    let gate = gate.take();
    let done = done.clone();
    Box::pin(async move {
      if let Some(gate) = gate {
        let _ = gate.await;
      }
      state.set_serialization("user", Some(json!({ "id": 1 })));
      done.store(true, Ordering::SeqCst);
      Ok("<main>app</main>".to_string())
    })
  });

  let page = tokio::time::timeout(
    Duration::from_secs(1),
    PageRender::new(gated_template()).app(app).stream(ResponseState::new()),
  )
  .await
  .expect("first chunk must not wait for the app")
  .unwrap();

  assert_eq!(page.first_chunk(), &Bytes::from("<!DOCTYPE html><html><head></head><body>"));
  assert!(!finished.load(Ordering::SeqCst));

  release.send(()).unwrap();
  let (_, items) = collect(page).await;
  assert!(finished.load(Ordering::SeqCst));
  assert_eq!(items.len(), 3);
  assert_eq!(
    items[1].as_ref().unwrap(),
    &Bytes::from(concat!(
      "<main>app</main>",
      r#"<script type="application/json" data-quire-serialization="user">{"id":1}</script>"#
    ))
  );
  assert_eq!(items[2].as_ref().unwrap(), &Bytes::from("</body></html>"));
}

fn recording_app(timing: AssetLoadTiming) -> impl AppRenderer {
  sync_app(move |state, _| {
    state.add_title("FromApp");
    state.use_asset("chart", UseAsset::timing(timing));
    state.set_serialization("page", Some(json!({ "n": 3, "tag": "<b>" })));
    state.set_cookie("seen", "1", &quire_engine::CookieOptions::new());
    Ok("<p>body</p>".into())
  })
}

/// Buffered html and the concatenated streamed body for the same inputs.
async fn render_both(
  template: Template,
  timing: AssetLoadTiming,
  state: ResponseState,
) -> (String, String) {
  let buffered = PageRender::new(template.clone())
    .app(recording_app(timing))
    .manifest(manifest())
    .render(state.clone())
    .await
    .unwrap();
  let streamed = PageRender::new(template)
    .app(recording_app(timing))
    .manifest(manifest())
    .stream(state)
    .await
    .unwrap();
  let (_, items) = collect(streamed).await;
  (buffered.html, concat(&items))
}

#[tokio::test]
async fn streamed_output_matches_buffered_output() {
  let mut state = ResponseState::new();
  state.add_title("Same");
  let (buffered, streamed) =
    render_both(Document::streaming().into(), AssetLoadTiming::Load, state).await;

  assert_eq!(streamed, buffered);
  assert!(buffered.contains("<title>Same</title>"));
  assert!(buffered.contains(r#"<script src="/chart.js" type="module" async></script>"#));
}

#[tokio::test]
async fn unbounded_document_streams_what_the_app_recorded() {
  let (buffered, streamed) =
    render_both(Document::standard().into(), AssetLoadTiming::Preload, ResponseState::new()).await;

  assert_eq!(streamed, buffered);
  assert!(streamed.contains("<title>FromApp</title>"));
  assert!(streamed.contains(r#"<link rel="preload" href="/chart.css" as="style">"#));
  assert!(streamed.contains(r#"<link rel="modulepreload" href="/chart.js">"#));
}

#[tokio::test]
async fn preload_before_content_sees_app_assets() {
  let layout =
    format!("{}|{}", PlaceholderKind::PreloadAssets.markup(), PlaceholderKind::Content.markup());
  let expected = concat!(
    r#"<link rel="preload" href="/chart.css" as="style">"#,
    r#"<link rel="modulepreload" href="/chart.js">|<p>body</p>"#
  );

  let (buffered, streamed) =
    render_both(layout.clone().into(), AssetLoadTiming::Preload, ResponseState::new()).await;
  assert_eq!(buffered, expected);
  assert_eq!(streamed, expected);

  let bounded = format!("<head>{}", stream_boundary(&layout));
  let (buffered, streamed) =
    render_both(bounded.into(), AssetLoadTiming::Preload, ResponseState::new()).await;
  assert_eq!(streamed, buffered);
  assert_eq!(streamed, format!("<head>{expected}"));
}

#[tokio::test]
async fn head_is_fixed_at_first_chunk() {
  let template = format!("<p>{}", stream_boundary(&PlaceholderKind::Content.markup()));
  let app = sync_app(|state, _| {
    state.set_status(404);
    state.set_cookie("late", "1", &quire_engine::CookieOptions::new());
    Ok("gone".into())
  });
  let page = PageRender::new(template).app(app).stream(ResponseState::new()).await.unwrap();
  assert_eq!(page.status(), 200);

  let (head, items) = collect(page).await;
  assert_eq!(concat(&items), "<p>gone");
  assert_eq!(head.status, 200);
  assert!(!head.headers.contains_key(http::header::SET_COOKIE));
}

#[tokio::test]
async fn error_in_first_chunk_fails_before_any_bytes() {
  let result = PageRender::new(minimal_document()).stream(ResponseState::new()).await;
  assert!(matches!(result, Err(RenderError::MissingAppRenderer)));
}

#[tokio::test]
async fn error_in_later_chunk_ends_the_stream() {
  let template = format!(
    "head{}{}",
    stream_boundary(&PlaceholderKind::Content.markup()),
    stream_boundary("never")
  );
  let page = PageRender::new(template).stream(ResponseState::new()).await.unwrap();
  let (_, items) = collect(page).await;
  assert_eq!(items.len(), 2);
  assert!(matches!(items[1], Err(RenderError::MissingAppRenderer)));
}

#[tokio::test]
async fn invalid_boundary_fails_up_front() {
  let result = PageRender::new("<quire-stream-boundary>").stream(ResponseState::new()).await;
  assert!(matches!(result, Err(RenderError::Markup(_))));
}

#[tokio::test]
async fn cancelling_interrupts_a_pending_app() {
  let token = CancellationToken::new();
  let app = async_app(|_, _| Box::pin(std::future::pending::<Result<String, RenderError>>()));
  let template = format!("head{}", stream_boundary(&PlaceholderKind::Content.markup()));
  let page = PageRender::new(template)
    .app(app)
    .cancel_token(token.clone())
    .stream(ResponseState::new())
    .await
    .unwrap();

  let canceller = tokio::spawn(async move {
    tokio::time::sleep(Duration::from_millis(10)).await;
    token.cancel();
  });
  let (_, items) = tokio::time::timeout(Duration::from_secs(1), collect(page)).await.unwrap();
  canceller.await.unwrap();

  assert_eq!(items.len(), 2);
  assert!(matches!(items[1], Err(RenderError::Cancelled)));
}

#[tokio::test]
async fn phase_is_observable_between_chunks() {
  let template = format!("a{}c", stream_boundary("b"));
  let mut page = PageRender::new(template).stream(ResponseState::new()).await.unwrap();
  assert_eq!(page.streamer().phase(), StreamPhase::Flushing(1));
  assert_eq!(page.streamer().next_chunk().await.unwrap().unwrap(), "b");
  assert_eq!(page.streamer().next_chunk().await.unwrap().unwrap(), "c");
  assert_eq!(page.streamer().phase(), StreamPhase::Closed);
}

#[tokio::test]
async fn cancelled_token_stops_an_unbounded_page() {
  let token = CancellationToken::new();
  token.cancel();
  let result = PageRender::new(minimal_document())
    .app("<p>never</p>")
    .cancel_token(token)
    .stream(ResponseState::new())
    .await;
  assert!(matches!(result, Err(RenderError::Cancelled)));
}
