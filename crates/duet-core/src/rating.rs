//! Ratings and the per-user rating ledger.
//!
//! A rating is the user's yes/no judgment on one couple. The ledger holds at
//! most one rating per pair key: recording a verdict for an already-rated
//! pair removes the old entry and appends the new one at the tail, so ledger
//! position always reflects the latest write.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
  Yes,
  No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
  /// Canonical pair key of the rated couple (see [`crate::pair`]).
  pub pair_id:   String,
  pub verdict:   Verdict,
  /// Epoch milliseconds at which the verdict was recorded.
  pub timestamp: i64,
}

/// The append/overwrite log of one user's couple judgments.
///
/// Serialises as a bare JSON array, the shape the store keeps per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
  ratings: Vec<Rating>,
}

impl Ledger {
  pub fn new() -> Self { Self::default() }

  /// Record a verdict for a pair, replacing any earlier rating of the same
  /// pair. Returns the stored rating.
  pub fn record(
    &mut self,
    pair_id: impl Into<String>,
    verdict: Verdict,
    timestamp: i64,
  ) -> Rating {
    let rating = Rating { pair_id: pair_id.into(), verdict, timestamp };
    self.ratings.retain(|r| r.pair_id != rating.pair_id);
    self.ratings.push(rating.clone());
    rating
  }

  /// All ratings in insertion order.
  pub fn ratings(&self) -> &[Rating] { &self.ratings }

  /// The current verdict for a pair, or `None` if it was never rated.
  /// A pair is never "blank" — only absent or yes/no.
  pub fn verdict_for(&self, pair_id: &str) -> Option<Verdict> {
    self
      .ratings
      .iter()
      .find(|r| r.pair_id == pair_id)
      .map(|r| r.verdict)
  }

  pub fn len(&self) -> usize { self.ratings.len() }

  pub fn is_empty(&self) -> bool { self.ratings.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pair::pair_key;

  #[test]
  fn record_appends_in_insertion_order() {
    let mut ledger = Ledger::new();
    ledger.record("1-2", Verdict::Yes, 1);
    ledger.record("3-4", Verdict::No, 2);

    let pairs: Vec<&str> =
      ledger.ratings().iter().map(|r| r.pair_id.as_str()).collect();
    assert_eq!(pairs, ["1-2", "3-4"]);
  }

  #[test]
  fn replacement_overwrites_and_moves_to_tail() {
    let mut ledger = Ledger::new();
    ledger.record("1-2", Verdict::Yes, 1);
    ledger.record("3-4", Verdict::Yes, 2);
    ledger.record("1-2", Verdict::No, 3);

    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.verdict_for("1-2"), Some(Verdict::No));
    assert_eq!(ledger.ratings().last().map(|r| r.pair_id.as_str()), Some("1-2"));
  }

  #[test]
  fn reversed_pair_is_the_same_rated_pair() {
    let mut ledger = Ledger::new();
    ledger.record(pair_key("x", "y"), Verdict::Yes, 1);
    ledger.record(pair_key("y", "x"), Verdict::No, 2);

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.verdict_for(&pair_key("x", "y")), Some(Verdict::No));
  }

  #[test]
  fn unrated_pair_is_absent() {
    let ledger = Ledger::new();
    assert_eq!(ledger.verdict_for("1-2"), None);
    assert!(ledger.is_empty());
  }
}
