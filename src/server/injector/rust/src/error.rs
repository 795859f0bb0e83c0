/* src/server/injector/rust/src/error.rs */

/// Malformed template markup. Offsets are byte positions in the scanned string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
  #[error("unknown placeholder `{name}` at byte {offset}")]
  UnknownPlaceholder { name: String, offset: usize },

  #[error("placeholder `{name}` at byte {offset} has no matching end marker")]
  UnterminatedPlaceholder { name: String, offset: usize },

  #[error("stream boundary at byte {offset} is never closed")]
  UnterminatedBoundary { offset: usize },

  #[error("stream boundary at byte {offset} is nested inside another boundary")]
  NestedBoundary { offset: usize },
}
