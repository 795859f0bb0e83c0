/* src/server/engine/rust/src/head.rs */

use std::collections::HashMap;

use quire_injector::escape_html;

use crate::attributes::Attributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadElementKind {
  Meta,
  Link,
}

impl HeadElementKind {
  pub fn tag(self) -> &'static str {
    match self {
      HeadElementKind::Meta => "meta",
      HeadElementKind::Link => "link",
    }
  }
}

/// Collapse metas sharing a `name`: the latest entry wins but keeps the slot of
/// the first entry with that name. Unnamed metas are kept as they are.
pub(crate) fn dedupe_metas(metas: impl IntoIterator<Item = Attributes>) -> Vec<Attributes> {
  let mut out: Vec<Attributes> = Vec::new();
  let mut by_name: HashMap<String, usize> = HashMap::new();

  for meta in metas {
    let Some(name) = meta.get("name").map(str::to_string) else {
      out.push(meta);
      continue;
    };
    if let Some(&index) = by_name.get(&name) {
      out[index] = meta;
    } else {
      by_name.insert(name, out.len());
      out.push(meta);
    }
  }
  out
}

pub(crate) fn render_head_element(kind: HeadElementKind, attrs: &Attributes) -> String {
  format!("<{}{}>", kind.tag(), attrs.to_html())
}

pub(crate) fn render_title(title: &str) -> String {
  format!("<title>{}</title>", escape_html(title))
}
