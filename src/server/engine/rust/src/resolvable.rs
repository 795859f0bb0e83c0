/* src/server/engine/rust/src/resolvable.rs */

use std::fmt;
use std::sync::Arc;

use crate::attributes::Attributes;

/// A value recorded on the response state, either fixed when it is added or
/// produced on demand every time the state is read.
pub enum Resolvable<T> {
  Static(T),
  Deferred(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Resolvable<T> {
  pub fn deferred(producer: impl Fn() -> T + Send + Sync + 'static) -> Self {
    Resolvable::Deferred(Arc::new(producer))
  }

  /// Current value. Deferred producers run on every call.
  pub fn resolve(&self) -> T {
    match self {
      Resolvable::Static(value) => value.clone(),
      Resolvable::Deferred(producer) => producer(),
    }
  }
}

impl<T: Clone> Clone for Resolvable<T> {
  fn clone(&self) -> Self {
    match self {
      Resolvable::Static(value) => Resolvable::Static(value.clone()),
      Resolvable::Deferred(producer) => Resolvable::Deferred(Arc::clone(producer)),
    }
  }
}

impl<T: fmt::Debug> fmt::Debug for Resolvable<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resolvable::Static(value) => f.debug_tuple("Static").field(value).finish(),
      Resolvable::Deferred(_) => f.write_str("Deferred(..)"),
    }
  }
}

impl<T> From<T> for Resolvable<T> {
  fn from(value: T) -> Self {
    Resolvable::Static(value)
  }
}

impl From<&str> for Resolvable<String> {
  fn from(value: &str) -> Self {
    Resolvable::Static(value.to_string())
  }
}

impl<const N: usize> From<[(&str, &str); N]> for Resolvable<Attributes> {
  fn from(pairs: [(&str, &str); N]) -> Self {
    Resolvable::Static(Attributes::from(pairs))
  }
}
