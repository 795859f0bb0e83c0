/* src/server/injector/rust/src/marker.rs */

use std::fmt;
use std::str::FromStr;

/// Prefix shared by every placeholder start marker: `<quire-placeholder-NAME>`.
pub const PLACEHOLDER_OPEN: &str = "<quire-placeholder-";

/// Prefix shared by every placeholder end marker: `</quire-placeholder-NAME>`.
pub const PLACEHOLDER_CLOSE: &str = "</quire-placeholder-";

pub const STREAM_BOUNDARY_OPEN: &str = "<quire-stream-boundary>";
pub const STREAM_BOUNDARY_CLOSE: &str = "</quire-stream-boundary>";

/// The fixed placeholder vocabulary understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
  /// Application markup.
  Content,
  /// Always-loaded bundle for the request.
  EntryAssets,
  /// Modules used with `load` timing.
  AsyncAssets,
  /// Modules used with `preload` timing.
  PreloadAssets,
  /// Serialized data tags.
  Serializations,
}

impl PlaceholderKind {
  pub const ALL: [PlaceholderKind; 5] = [
    PlaceholderKind::Content,
    PlaceholderKind::EntryAssets,
    PlaceholderKind::AsyncAssets,
    PlaceholderKind::PreloadAssets,
    PlaceholderKind::Serializations,
  ];

  pub fn name(self) -> &'static str {
    match self {
      PlaceholderKind::Content => "content",
      PlaceholderKind::EntryAssets => "entry-assets",
      PlaceholderKind::AsyncAssets => "async-assets",
      PlaceholderKind::PreloadAssets => "preload-assets",
      PlaceholderKind::Serializations => "serializations",
    }
  }

  /// Markup for an empty placeholder of this kind, as a template author writes it.
  pub fn markup(self) -> String {
    let name = self.name();
    format!("{PLACEHOLDER_OPEN}{name}>{PLACEHOLDER_CLOSE}{name}>")
  }

  pub(crate) fn closing_tag(self) -> String {
    format!("{PLACEHOLDER_CLOSE}{}>", self.name())
  }
}

impl fmt::Display for PlaceholderKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for PlaceholderKind {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    PlaceholderKind::ALL.into_iter().find(|kind| kind.name() == s).ok_or(())
  }
}

/// Wrap already-rendered markup in a stream boundary.
pub fn stream_boundary(inner: &str) -> String {
  let mut out =
    String::with_capacity(STREAM_BOUNDARY_OPEN.len() + inner.len() + STREAM_BOUNDARY_CLOSE.len());
  out.push_str(STREAM_BOUNDARY_OPEN);
  out.push_str(inner);
  out.push_str(STREAM_BOUNDARY_CLOSE);
  out
}
