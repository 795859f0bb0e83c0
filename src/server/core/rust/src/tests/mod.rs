/* src/server/core/rust/src/tests/mod.rs */

use std::sync::Arc;

use quire_engine::{Asset, AssetBundle, Document, Element, Node};
use quire_injector::PlaceholderKind;

use super::*;

mod streaming;

fn manifest() -> Arc<dyn AssetManifest> {
  let manifest = StaticAssetManifest::new(AssetBundle {
    scripts: vec![Asset::module("/main.js")],
    styles: vec![Asset::new("/main.css")],
  })
  .with_module(
    "chart",
    AssetBundle {
      scripts: vec![Asset::module("/chart.js")],
      styles: vec![Asset::new("/chart.css")],
    },
  );
  Arc::new(manifest)
}

/// `<html><head><title/></head><body><content/></body></html>`
fn minimal_document() -> Document {
  Document::new(
    Element::new("html")
      .child(Element::new("head").child(Node::Title))
      .child(Element::new("body").child(PlaceholderKind::Content)),
  )
}
