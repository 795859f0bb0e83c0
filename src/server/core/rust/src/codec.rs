/* src/server/core/rust/src/codec.rs */

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::errors::BoxError;

/// Transforms serialized values on their way into the page and back out on
/// the client. Implementations must round-trip: `decode(encode(x)) == x`.
pub trait SerializationCodec: Send + Sync {
  fn encode<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Result<Value, BoxError>>;

  fn decode(&self, value: &Value) -> Result<Value, BoxError>;
}

/// Plain JSON; values pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl SerializationCodec for JsonCodec {
  fn encode<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Result<Value, BoxError>> {
    let value = value.clone();
    Box::pin(async move { Ok(value) })
  }

  fn decode(&self, value: &Value) -> Result<Value, BoxError> {
    Ok(value.clone())
  }
}
