//! Canonical pair keys.
//!
//! A rated couple and a two-party conversation are identified by the same
//! construction: the two ids sorted lexicographically and joined with `-`.
//! The same two participants therefore always yield the same key, whichever
//! side is named first.

/// Canonical, order-independent key for an unordered pair of ids.
pub fn pair_key(a: &str, b: &str) -> String {
  if a <= b {
    format!("{a}-{b}")
  } else {
    format!("{b}-{a}")
  }
}

/// Whether `id` is one of the two ids encoded in a pair key.
pub fn pair_contains(key: &str, id: &str) -> bool {
  key.split('-').any(|part| part == id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pair_key_is_order_independent() {
    assert_eq!(pair_key("1", "2"), pair_key("2", "1"));
    assert_eq!(pair_key("1", "2"), "1-2");
    assert_eq!(pair_key("alice", "bob"), "alice-bob");
  }

  #[test]
  fn pair_key_of_equal_ids_is_stable() {
    assert_eq!(pair_key("x", "x"), "x-x");
  }

  #[test]
  fn pair_contains_matches_whole_ids_only() {
    assert!(pair_contains("1-2", "1"));
    assert!(pair_contains("1-2", "2"));
    assert!(!pair_contains("1-2", "3"));
    assert!(!pair_contains("11-2", "1"));
  }
}
