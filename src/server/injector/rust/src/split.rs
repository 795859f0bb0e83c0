/* src/server/injector/rust/src/split.rs */

use crate::error::MarkupError;
use crate::marker::{STREAM_BOUNDARY_CLOSE, STREAM_BOUNDARY_OPEN};

/// Split a rendered document at its stream boundaries.
///
/// The boundary markers are discarded; the markup inside a boundary becomes its
/// own chunk, following the chunk that precedes it. `A<b>B</b>C` yields
/// `["A", "B", "C"]`. A document without boundaries yields exactly one chunk, so
/// the result is never empty and concatenating it reproduces the document minus
/// the markers.
pub fn split_chunks(html: &str) -> Result<Vec<String>, MarkupError> {
  let mut chunks = Vec::new();
  let mut cursor = 0;

  while let Some(rel) = html[cursor..].find(STREAM_BOUNDARY_OPEN) {
    let start = cursor + rel;
    let inner_start = start + STREAM_BOUNDARY_OPEN.len();
    let inner_len = html[inner_start..]
      .find(STREAM_BOUNDARY_CLOSE)
      .ok_or(MarkupError::UnterminatedBoundary { offset: start })?;
    let inner = &html[inner_start..inner_start + inner_len];

    if let Some(nested) = inner.find(STREAM_BOUNDARY_OPEN) {
      return Err(MarkupError::NestedBoundary { offset: inner_start + nested });
    }

    chunks.push(html[cursor..start].to_string());
    chunks.push(inner.to_string());
    cursor = inner_start + inner_len + STREAM_BOUNDARY_CLOSE.len();
  }

  chunks.push(html[cursor..].to_string());
  Ok(chunks)
}

/// Remove every stream boundary, producing the single chunk used when the
/// response is buffered.
pub fn join_chunks(html: &str) -> Result<String, MarkupError> {
  Ok(split_chunks(html)?.concat())
}
