//! The `DocumentStore` trait and the versioned document envelope.
//!
//! The trait is implemented by storage backends (e.g. `duet-store-sqlite`).
//! Keys are opaque strings and values are JSON documents; every write
//! replaces the full value under its key. There are no partial updates and
//! no transactions spanning multiple keys — last writer wins, whole-value
//! replace, which is acceptable because the system assumes a single active
//! writer.

use std::future::Future;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Result};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persistent key-value store.
///
/// All methods return `Send` futures so the trait can be used from spawned
/// tokio tasks.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value under `key`; `None` if the key was never written.
  fn get<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + 'a;

  /// Atomically replace the whole value under `key`.
  fn put<'a>(
    &'a self,
    key: &'a str,
    value: Value,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove `key` entirely. Removing an absent key is not an error.
  fn delete<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Versioned envelope ──────────────────────────────────────────────────────

/// Version written by this build of the code.
pub const DOC_VERSION: u32 = 1;

#[derive(Serialize)]
struct EncodeEnvelope<'a, T> {
  version: u32,
  body:    &'a T,
}

#[derive(Deserialize)]
struct DecodeEnvelope<T> {
  #[allow(dead_code)]
  version: u32,
  body:    T,
}

/// Wrap `body` in the current envelope for persistence.
pub fn encode_document<T: Serialize>(body: &T) -> Result<Value> {
  Ok(serde_json::to_value(EncodeEnvelope { version: DOC_VERSION, body })?)
}

/// Unwrap a stored value, migrating legacy documents forward.
///
/// Blobs written before the envelope existed carry no `version` field; the
/// raw value itself is then taken as the body. A version newer than
/// [`DOC_VERSION`] is refused — downgrade reads are not supported.
pub fn decode_document<T: DeserializeOwned>(key: &str, raw: Value) -> Result<T> {
  match raw.get("version").and_then(Value::as_u64) {
    Some(v) if v as u32 == DOC_VERSION => {
      let envelope: DecodeEnvelope<T> = serde_json::from_value(raw)?;
      Ok(envelope.body)
    }
    Some(v) => Err(Error::UnsupportedDocVersion {
      key:     key.to_owned(),
      version: v as u32,
    }),
    None => Ok(serde_json::from_value(raw)?),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::rating::{Ledger, Verdict};

  #[test]
  fn encode_wraps_in_current_version() {
    let mut ledger = Ledger::new();
    ledger.record("1-2", Verdict::Yes, 7);

    let raw = encode_document(&ledger).unwrap();
    assert_eq!(raw["version"], DOC_VERSION);
    assert!(raw["body"].is_array());
  }

  #[test]
  fn decode_accepts_current_version() {
    let raw = json!({
      "version": 1,
      "body": [{ "pair_id": "1-2", "verdict": "yes", "timestamp": 7 }],
    });
    let ledger: Ledger = decode_document("ratings:u", raw).unwrap();
    assert_eq!(ledger.verdict_for("1-2"), Some(Verdict::Yes));
  }

  #[test]
  fn decode_migrates_legacy_bare_blobs() {
    // Pre-envelope writes stored the body directly.
    let raw = json!([{ "pair_id": "1-2", "verdict": "no", "timestamp": 7 }]);
    let ledger: Ledger = decode_document("ratings:u", raw).unwrap();
    assert_eq!(ledger.verdict_for("1-2"), Some(Verdict::No));
  }

  #[test]
  fn decode_refuses_future_versions() {
    let raw = json!({ "version": 2, "body": [] });
    let err = decode_document::<Ledger>("ratings:u", raw).unwrap_err();
    assert!(matches!(
      err,
      Error::UnsupportedDocVersion { version: 2, .. }
    ));
  }
}
