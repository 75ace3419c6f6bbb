//! Storage key layout.
//!
//! One key for the current user, one per-user key each for profile and
//! ratings, and one key per canonical conversation thread.

use duet_core::pair::pair_key;

/// Holds the id of the user the external auth collaborator last signed in.
pub const CURRENT_USER: &str = "user:current";

pub fn profile(user_id: &str) -> String { format!("profile:{user_id}") }

pub fn ratings(user_id: &str) -> String { format!("ratings:{user_id}") }

/// Thread key; order-independent in the two participant ids.
pub fn thread(a: &str, b: &str) -> String {
  format!("chat:{}", pair_key(a, b))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn thread_key_is_order_independent() {
    assert_eq!(thread("u1", "u2"), thread("u2", "u1"));
    assert_eq!(thread("u1", "u2"), "chat:u1-u2");
  }

  #[test]
  fn per_user_keys_do_not_collide() {
    assert_ne!(profile("u1"), ratings("u1"));
    assert_ne!(profile("u1"), profile("u2"));
  }
}
