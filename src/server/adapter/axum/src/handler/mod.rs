/* src/server/adapter/axum/src/handler/mod.rs */

mod page;

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use quire_server::{AssetManifest, PageRender, RequestContext};

/// Builds the `PageRender` for one request.
pub type PageFactory = Arc<dyn Fn(&RequestContext) -> PageRender + Send + Sync>;

/// Whether a page is sent as one body or flushed chunk by chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
  Buffered,
  Streaming,
}

pub(crate) struct PageDef {
  pub route: String,
  pub mode: RenderMode,
  pub factory: PageFactory,
}

pub(crate) struct AppState {
  pub pages: HashMap<String, Arc<PageDef>>,
  pub manifest: Option<Arc<dyn AssetManifest>>,
}

pub(crate) fn build_router(
  pages: Vec<PageDef>,
  manifest: Option<Arc<dyn AssetManifest>>,
) -> Router {
  let mut page_map = HashMap::new();
  let mut router = Router::new();
  for page in pages {
    router = router.route(&page.route, get(page::handle_page));
    page_map.insert(page.route.clone(), Arc::new(page));
  }
  router.with_state(Arc::new(AppState { pages: page_map, manifest }))
}
