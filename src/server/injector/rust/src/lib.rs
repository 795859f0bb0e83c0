/* src/server/injector/rust/src/lib.rs */

mod doctype;
mod error;
mod helpers;
mod marker;
mod scan;
mod split;

pub use doctype::{HTML5_DOCTYPE, normalize_doctype};
pub use error::MarkupError;
pub use helpers::{escape_html, is_void_element};
pub use marker::{
  PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, PlaceholderKind, STREAM_BOUNDARY_CLOSE,
  STREAM_BOUNDARY_OPEN, stream_boundary,
};
pub use scan::{Segment, has_placeholders, scan};
pub use split::{join_chunks, split_chunks};

#[cfg(test)]
mod tests;
