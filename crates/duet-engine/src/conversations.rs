//! The conversation store: per-pair ordered message logs over the document
//! store.
//!
//! Each thread is persisted as one whole-blob document under its canonical
//! key. A per-thread async mutex serializes every load-modify-save cycle,
//! so a user send and a simulated delivery into the same thread never
//! interleave. Across different threads there is no ordering guarantee and
//! none is needed.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use duet_core::{
  Error, Result,
  message::{Message, Thread},
  store::{DocumentStore, decode_document, encode_document},
};
use tokio::sync::Mutex;

use crate::keys;

pub struct Conversations<S> {
  store: Arc<S>,
  locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl<S> Clone for Conversations<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      locks: Arc::clone(&self.locks),
    }
  }
}

impl<S: DocumentStore> Conversations<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, locks: Arc::new(Mutex::new(HashMap::new())) }
  }

  /// The write lock for one thread key, created on first use.
  async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
    let mut locks = self.locks.lock().await;
    Arc::clone(locks.entry(key.to_owned()).or_default())
  }

  async fn load_by_key(&self, key: &str) -> Result<Thread> {
    match self.store.get(key).await.map_err(Error::storage)? {
      Some(raw) => decode_document(key, raw),
      // "No conversation yet" is a normal state, not a failure.
      None => Ok(Thread::default()),
    }
  }

  async fn save(&self, key: &str, thread: &Thread) -> Result<()> {
    self
      .store
      .put(key, encode_document(thread)?)
      .await
      .map_err(Error::storage)
  }

  /// Load the thread between two participants, oldest message first.
  pub async fn load(&self, a: &str, b: &str) -> Result<Thread> {
    self.load_by_key(&keys::thread(a, b)).await
  }

  /// Append a message and persist the whole thread.
  ///
  /// Fails on blank content without touching the store; a storage failure
  /// leaves the last committed thread in place.
  pub async fn append(
    &self,
    sender_id: &str,
    receiver_id: &str,
    content: &str,
  ) -> Result<Message> {
    let key = keys::thread(sender_id, receiver_id);
    let lock = self.lock_for(&key).await;
    let _guard = lock.lock().await;

    let mut thread = self.load_by_key(&key).await?;
    let message = thread.append(
      sender_id,
      receiver_id,
      content,
      Utc::now().timestamp_millis(),
    )?;
    self.save(&key, &thread).await?;

    tracing::debug!(thread = %key, message = %message.id, "appended message");
    Ok(message)
  }

  /// Mark everything addressed to `reader_id` in the thread as read.
  /// Returns how many messages changed; skips the write when nothing did.
  pub async fn mark_read(
    &self,
    reader_id: &str,
    partner_id: &str,
  ) -> Result<usize> {
    let key = keys::thread(reader_id, partner_id);
    let lock = self.lock_for(&key).await;
    let _guard = lock.lock().await;

    let mut thread = self.load_by_key(&key).await?;
    let changed = thread.mark_read(reader_id);
    if changed > 0 {
      self.save(&key, &thread).await?;
    }
    Ok(changed)
  }

  /// Unread messages addressed to `reader_id` in one thread.
  pub async fn unread_count(
    &self,
    reader_id: &str,
    partner_id: &str,
  ) -> Result<usize> {
    Ok(self.load(reader_id, partner_id).await?.unread_count(reader_id))
  }
}
