/* src/server/engine/rust/src/document.rs */

use quire_injector::{PlaceholderKind, escape_html, is_void_element, normalize_doctype};

use crate::attributes::Attributes;
use crate::head::{HeadElementKind, render_head_element, render_title};
use crate::state::{AttributeTarget, ResponseState};

/// A node of a composable document template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Element(Element),
  /// Escaped text.
  Text(String),
  /// Markup emitted verbatim.
  Raw(String),
  /// `<title>` from the response state; nothing when no title was added.
  Title,
  /// Deduplicated metas followed by links from the response state.
  HeadElements,
  Placeholder(PlaceholderKind),
  /// Children rendered as their own flushable chunk.
  StreamBoundary(Vec<Node>),
}

impl Node {
  pub fn text(text: impl Into<String>) -> Self {
    Node::Text(text.into())
  }

  pub fn raw(html: impl Into<String>) -> Self {
    Node::Raw(html.into())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub tag: String,
  pub attributes: Attributes,
  pub children: Vec<Node>,
}

impl Element {
  pub fn new(tag: impl Into<String>) -> Self {
    Self { tag: tag.into(), attributes: Attributes::new(), children: Vec::new() }
  }

  pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.attributes.insert(name, value);
    self
  }

  pub fn child(mut self, node: impl Into<Node>) -> Self {
    self.children.push(node.into());
    self
  }

  pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
    self.children.extend(nodes);
    self
  }
}

impl From<Element> for Node {
  fn from(element: Element) -> Self {
    Node::Element(element)
  }
}

impl From<PlaceholderKind> for Node {
  fn from(kind: PlaceholderKind) -> Self {
    Node::Placeholder(kind)
  }
}

/// A document described as a node tree, rendered against the response state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  pub nodes: Vec<Node>,
}

impl Document {
  pub fn new(root: impl Into<Node>) -> Self {
    Self { nodes: vec![root.into()] }
  }

  fn head() -> Element {
    Element::new("head")
      .child(Element::new("meta").attr("charset", "utf-8"))
      .child(
        Element::new("meta")
          .attr("name", "viewport")
          .attr("content", "width=device-width, initial-scale=1.0"),
      )
      .child(Node::Title)
      .child(Node::HeadElements)
  }

  /// The default shell: asset hints in `<head>`, application markup in
  /// `<div id="app">`, then serialized data and async assets.
  pub fn standard() -> Self {
    let head = Self::head()
      .child(PlaceholderKind::PreloadAssets)
      .child(PlaceholderKind::EntryAssets);
    let body = Element::new("body")
      .child(Element::new("div").attr("id", "app").child(PlaceholderKind::Content))
      .child(PlaceholderKind::Serializations)
      .child(PlaceholderKind::AsyncAssets);
    Self::new(Element::new("html").child(head).child(body))
  }

  /// Like `standard`, but everything inside `<body>` sits behind a stream
  /// boundary so the head can be flushed before the application renders.
  /// Preload hints move into the body because they depend on the render.
  pub fn streaming() -> Self {
    let head = Self::head().child(PlaceholderKind::EntryAssets);
    let body = Element::new("body").child(Node::StreamBoundary(vec![
      Element::new("div").attr("id", "app").child(PlaceholderKind::Content).into(),
      PlaceholderKind::PreloadAssets.into(),
      PlaceholderKind::Serializations.into(),
      PlaceholderKind::AsyncAssets.into(),
    ]));
    Self::new(Element::new("html").child(head).child(body))
  }
}

/// What a page renders its shell from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
  /// Used verbatim.
  Html(String),
  Document(Document),
}

impl From<&str> for Template {
  fn from(html: &str) -> Self {
    Template::Html(html.to_string())
  }
}

impl From<String> for Template {
  fn from(html: String) -> Self {
    Template::Html(html)
  }
}

impl From<Document> for Template {
  fn from(document: Document) -> Self {
    Template::Document(document)
  }
}

/// Render a template to one HTML string that still carries placeholder and
/// stream-boundary markers. The state is only read.
pub fn render_template(template: &Template, state: &ResponseState) -> String {
  let html = match template {
    Template::Html(html) => return normalize_doctype(html).into_owned(),
    Template::Document(document) => {
      let mut out = String::new();
      for node in &document.nodes {
        render_node(node, state, &mut out);
      }
      out
    }
  };
  normalize_doctype(&html).into_owned()
}

fn render_node(node: &Node, state: &ResponseState, out: &mut String) {
  match node {
    Node::Element(element) => render_element(element, state, out),
    Node::Text(text) => out.push_str(&escape_html(text)),
    Node::Raw(html) => out.push_str(html),
    Node::Title => {
      if let Some(title) = state.title() {
        out.push_str(&render_title(&title));
      }
    }
    Node::HeadElements => {
      for meta in state.metas() {
        out.push_str(&render_head_element(HeadElementKind::Meta, &meta));
      }
      for link in state.links() {
        out.push_str(&render_head_element(HeadElementKind::Link, &link));
      }
    }
    Node::Placeholder(kind) => out.push_str(&kind.markup()),
    Node::StreamBoundary(children) => {
      let mut inner = String::new();
      for child in children {
        render_node(child, state, &mut inner);
      }
      out.push_str(&quire_injector::stream_boundary(&inner));
    }
  }
}

fn render_element(element: &Element, state: &ResponseState, out: &mut String) {
  let target = match element.tag.as_str() {
    "html" => Some(AttributeTarget::Html),
    "body" => Some(AttributeTarget::Body),
    _ => None,
  };
  let attributes = match target {
    Some(target) => {
      let mut merged = element.attributes.clone();
      merged.merge(&state.attributes(target));
      merged
    }
    None => element.attributes.clone(),
  };

  out.push('<');
  out.push_str(&element.tag);
  out.push_str(&attributes.to_html());
  out.push('>');
  if is_void_element(&element.tag) {
    return;
  }
  for child in &element.children {
    render_node(child, state, out);
  }
  out.push_str("</");
  out.push_str(&element.tag);
  out.push('>');
}
