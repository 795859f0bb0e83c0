/* src/server/injector/rust/src/scan.rs */

use crate::error::MarkupError;
use crate::marker::{PLACEHOLDER_OPEN, PlaceholderKind};

/// One piece of a scanned chunk: literal markup or a placeholder to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
  Text(&'a str),
  Placeholder { kind: PlaceholderKind, offset: usize },
}

fn is_name_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Split `chunk` into literal text and placeholder segments, left to right.
///
/// Each start marker is paired with the first `</quire-placeholder-NAME>` that
/// follows it; whatever sits between the two markers is dropped. Every byte is
/// visited a bounded number of times, and the cursor never moves backwards, so
/// replacement content produced later can never be mistaken for a marker.
pub fn scan(chunk: &str) -> Result<Vec<Segment<'_>>, MarkupError> {
  let mut segments = Vec::new();
  let mut cursor = 0;

  while let Some(rel) = chunk[cursor..].find(PLACEHOLDER_OPEN) {
    let start = cursor + rel;
    let name_start = start + PLACEHOLDER_OPEN.len();
    let name_len =
      chunk[name_start..].find(|c: char| !is_name_char(c)).unwrap_or(chunk.len() - name_start);
    let name = &chunk[name_start..name_start + name_len];

    let kind = name
      .parse::<PlaceholderKind>()
      .map_err(|()| MarkupError::UnknownPlaceholder { name: name.to_string(), offset: start })?;

    let unterminated =
      || MarkupError::UnterminatedPlaceholder { name: name.to_string(), offset: start };
    let after_name = name_start + name_len;
    let tag_end = chunk[after_name..].find('>').ok_or_else(unterminated)? + after_name + 1;
    let closing = kind.closing_tag();
    let end = chunk[tag_end..].find(&closing).ok_or_else(unterminated)? + tag_end;

    if start > cursor {
      segments.push(Segment::Text(&chunk[cursor..start]));
    }
    segments.push(Segment::Placeholder { kind, offset: start });
    cursor = end + closing.len();
  }

  if cursor < chunk.len() {
    segments.push(Segment::Text(&chunk[cursor..]));
  }
  Ok(segments)
}

/// True when `chunk` holds at least one placeholder start marker.
pub fn has_placeholders(chunk: &str) -> bool {
  chunk.contains(PLACEHOLDER_OPEN)
}
