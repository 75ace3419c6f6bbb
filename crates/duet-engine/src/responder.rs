//! The responder simulator.
//!
//! Per open conversation this is a small state machine, `Idle → Pending →
//! Idle`: when the user's message lands and nothing is pending for that
//! thread, a delayed reply task is scheduled; while it sleeps the partner
//! reads as "typing"; on expiry one canned reply is appended on the
//! partner's behalf and the thread returns to idle.

use std::{collections::HashMap, ops::Range, sync::Arc, time::Duration};

use duet_core::store::DocumentStore;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{conversations::Conversations, keys};

/// The canned replies a simulated partner picks from, each chosen
/// uniformly and independently per message.
const DEFAULT_REPLIES: [&str; 10] = [
  "That's really interesting! Tell me more 😊",
  "I love that! What else do you enjoy doing?",
  "Sounds amazing! I'd love to hear more about it",
  "That's so cool! I've always wanted to try that",
  "Haha, you're funny! 😄",
  "I completely agree with you on that!",
  "That sounds like so much fun!",
  "You have great taste! 👍",
  "I'd love to learn more about that",
  "That's one of my favorite things too!",
];

/// Tuning knobs for the simulator.
///
/// The defaults reproduce the production behavior (2–4 s delay, the stock
/// reply pool, OS-seeded randomness); tests shrink the delay and pin the
/// seed.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
  /// Reply delay in milliseconds, sampled uniformly from this half-open
  /// range.
  pub delay_ms: Range<u64>,
  pub replies:  Vec<String>,
  /// Fix the random source for deterministic tests.
  pub seed:     Option<u64>,
}

impl Default for ResponderConfig {
  fn default() -> Self {
    Self {
      delay_ms: 2000..4000,
      replies:  DEFAULT_REPLIES.iter().map(|s| (*s).to_owned()).collect(),
      seed:     None,
    }
  }
}

pub struct Responder<S> {
  conversations: Conversations<S>,
  delay_ms:      Range<u64>,
  replies:       Arc<[String]>,
  rng:           Mutex<StdRng>,
  /// One pending delivery task at most per thread key.
  pending:       Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl<S: DocumentStore + 'static> Responder<S> {
  pub fn new(conversations: Conversations<S>, config: ResponderConfig) -> Self {
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_os_rng(),
    };
    Self {
      conversations,
      delay_ms: config.delay_ms,
      replies: config.replies.into(),
      rng: Mutex::new(rng),
      pending: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// Schedule a simulated reply from `partner_id` to `user_id`.
  ///
  /// Called after every user-authored append; a no-op while a reply is
  /// already pending for the thread, so each user message is followed by
  /// at most one response.
  pub async fn schedule(&self, user_id: &str, partner_id: &str) {
    let key = keys::thread(user_id, partner_id);
    let mut pending = self.pending.lock().await;
    if pending.get(&key).is_some_and(|task| !task.is_finished()) {
      return;
    }

    let (delay, reply) = {
      let mut rng = self.rng.lock().await;
      let delay = rng.random_range(self.delay_ms.clone());
      let reply = self.replies[rng.random_range(0..self.replies.len())].clone();
      (delay, reply)
    };

    tracing::debug!(thread = %key, delay_ms = delay, "scheduling simulated reply");

    let conversations = self.conversations.clone();
    let sender = partner_id.to_owned();
    let receiver = user_id.to_owned();
    let task_key = key.clone();
    let tasks = Arc::clone(&self.pending);

    let handle = tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(delay)).await;
      if let Err(err) = conversations.append(&sender, &receiver, &reply).await {
        // No externally observable failure mode for a simulated reply.
        tracing::warn!(thread = %task_key, error = %err, "dropping simulated reply");
      }
      tasks.lock().await.remove(&task_key);
    });
    pending.insert(key, handle);
  }

  /// Whether a reply for this thread is still pending — the "typing"
  /// indicator.
  pub async fn is_typing(&self, user_id: &str, partner_id: &str) -> bool {
    let key = keys::thread(user_id, partner_id);
    self
      .pending
      .lock()
      .await
      .get(&key)
      .is_some_and(|task| !task.is_finished())
  }

  /// Drop the pending reply for this thread, if any. Called when the
  /// conversation view closes.
  pub async fn cancel(&self, user_id: &str, partner_id: &str) {
    let key = keys::thread(user_id, partner_id);
    if let Some(task) = self.pending.lock().await.remove(&key) {
      task.abort();
      tracing::debug!(thread = %key, "cancelled pending simulated reply");
    }
  }

  /// Wait until the pending reply for this thread (if any) has been
  /// delivered.
  pub async fn join(&self, user_id: &str, partner_id: &str) {
    let key = keys::thread(user_id, partner_id);
    let task = self.pending.lock().await.remove(&key);
    if let Some(task) = task {
      // An abort surfaces as a JoinError; either way the thread is idle.
      let _ = task.await;
    }
  }
}
