//! Messages and conversation threads.
//!
//! A thread is the ordered message log between exactly two participants.
//! Messages are append-only: once in the log they are never edited, removed
//! or reordered. The only mutable field is the `read` flag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
  pub id:          String,
  pub sender_id:   String,
  pub receiver_id: String,
  pub content:     String,
  /// Epoch milliseconds; strictly increasing within a thread.
  pub timestamp:   i64,
  pub read:        bool,
}

/// The ordered message log of one two-party conversation.
///
/// Serialises as a bare JSON array, the shape the store keeps per thread.
/// An empty thread is the normal "no conversation yet" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thread {
  messages: Vec<Message>,
}

impl Thread {
  pub fn messages(&self) -> &[Message] { &self.messages }

  pub fn last(&self) -> Option<&Message> { self.messages.last() }

  pub fn len(&self) -> usize { self.messages.len() }

  pub fn is_empty(&self) -> bool { self.messages.is_empty() }

  /// Append a message from `sender_id` to `receiver_id`.
  ///
  /// Rejects empty or whitespace-only content. `now_ms` is the wall clock;
  /// the stored timestamp is clamped to `last + 1` when the clock has not
  /// advanced past the previous message, keeping the log strictly ordered.
  pub fn append(
    &mut self,
    sender_id: impl Into<String>,
    receiver_id: impl Into<String>,
    content: &str,
    now_ms: i64,
  ) -> Result<Message> {
    let content = content.trim();
    if content.is_empty() {
      return Err(Error::EmptyMessage);
    }

    let timestamp = match self.messages.last() {
      Some(prev) if now_ms <= prev.timestamp => prev.timestamp + 1,
      _ => now_ms,
    };

    let message = Message {
      id: Uuid::new_v4().to_string(),
      sender_id: sender_id.into(),
      receiver_id: receiver_id.into(),
      content: content.to_owned(),
      timestamp,
      read: false,
    };
    self.messages.push(message.clone());
    Ok(message)
  }

  /// Mark every message addressed to `reader_id` as read.
  /// Returns how many flags were flipped.
  pub fn mark_read(&mut self, reader_id: &str) -> usize {
    let mut changed = 0;
    for message in &mut self.messages {
      if message.receiver_id == reader_id && !message.read {
        message.read = true;
        changed += 1;
      }
    }
    changed
  }

  /// Messages addressed to `reader_id` that are still unread.
  pub fn unread_count(&self, reader_id: &str) -> usize {
    self
      .messages
      .iter()
      .filter(|m| m.receiver_id == reader_id && !m.read)
      .count()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whitespace_only_content_is_rejected() {
    let mut thread = Thread::default();
    let err = thread.append("a", "b", "   \n", 1).unwrap_err();
    assert!(matches!(err, Error::EmptyMessage));
    assert!(thread.is_empty());
  }

  #[test]
  fn content_is_trimmed() {
    let mut thread = Thread::default();
    let message = thread.append("a", "b", "  hi  ", 1).unwrap();
    assert_eq!(message.content, "hi");
  }

  #[test]
  fn timestamps_are_strictly_increasing() {
    let mut thread = Thread::default();
    // Same wall-clock millisecond for both appends.
    thread.append("a", "b", "one", 100).unwrap();
    thread.append("a", "b", "two", 100).unwrap();
    // And a clock that runs backwards.
    thread.append("a", "b", "three", 50).unwrap();

    let stamps: Vec<i64> =
      thread.messages().iter().map(|m| m.timestamp).collect();
    assert_eq!(stamps, [100, 101, 102]);
  }

  #[test]
  fn mark_read_only_touches_the_reader_side() {
    let mut thread = Thread::default();
    thread.append("a", "b", "to b", 1).unwrap();
    thread.append("b", "a", "to a", 2).unwrap();

    assert_eq!(thread.unread_count("a"), 1);
    assert_eq!(thread.unread_count("b"), 1);

    assert_eq!(thread.mark_read("a"), 1);
    assert_eq!(thread.unread_count("a"), 0);
    assert_eq!(thread.unread_count("b"), 1);

    // Idempotent.
    assert_eq!(thread.mark_read("a"), 0);
  }
}
