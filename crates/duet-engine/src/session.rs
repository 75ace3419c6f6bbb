//! The explicit session context.
//!
//! A [`Session`] binds one signed-in user id to a document store and exposes
//! every core operation: profile load/save, rating submission, match
//! computation, and the conversation operations that drive the responder
//! simulator. The current user is never ambient process state — collaborators
//! construct a session and pass it around.

use std::sync::Arc;

use chrono::Utc;
use duet_core::{
  Error, Result,
  candidate::Candidate,
  matching::{Match, compute_matches},
  message::Message,
  pair::pair_key,
  profile::Profile,
  rating::{Ledger, Rating, Verdict},
  store::{DocumentStore, decode_document, encode_document},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  conversations::Conversations,
  keys,
  responder::{Responder, ResponderConfig},
};

/// One open conversation, as shown in the chat list.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
  pub partner_id:   String,
  pub last_message: Message,
  pub unread:       usize,
}

pub struct Session<S> {
  store:         Arc<S>,
  user_id:       String,
  conversations: Conversations<S>,
  responder:     Responder<S>,
}

impl<S: DocumentStore + 'static> Session<S> {
  pub fn new(store: Arc<S>, user_id: impl Into<String>) -> Self {
    Self::with_config(store, user_id, ResponderConfig::default())
  }

  /// A session with responder behavior overridden — tests shrink the reply
  /// delay and pin the random seed.
  pub fn with_config(
    store: Arc<S>,
    user_id: impl Into<String>,
    config: ResponderConfig,
  ) -> Self {
    let conversations = Conversations::new(Arc::clone(&store));
    let responder = Responder::new(conversations.clone(), config);
    Self { store, user_id: user_id.into(), conversations, responder }
  }

  pub fn user_id(&self) -> &str { &self.user_id }

  pub fn responder(&self) -> &Responder<S> { &self.responder }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn get_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
    match self.store.get(key).await.map_err(Error::storage)? {
      Some(raw) => Ok(Some(decode_document(key, raw)?)),
      None => Ok(None),
    }
  }

  async fn put_doc<T: Serialize>(&self, key: &str, body: &T) -> Result<()> {
    self
      .store
      .put(key, encode_document(body)?)
      .await
      .map_err(Error::storage)
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  /// The user's saved profile, or `None` before the first save.
  pub async fn profile(&self) -> Result<Option<Profile>> {
    self.get_doc(&keys::profile(&self.user_id)).await
  }

  /// Validate and persist the profile as a whole.
  pub async fn save_profile(&self, profile: &Profile) -> Result<()> {
    profile.validate()?;
    self.put_doc(&keys::profile(&self.user_id), profile).await?;
    tracing::debug!(user = %self.user_id, "saved profile");
    Ok(())
  }

  // ── Rating ledger ─────────────────────────────────────────────────────────

  /// The user's rating ledger; empty before the first rating.
  pub async fn ledger(&self) -> Result<Ledger> {
    Ok(self.get_doc(&keys::ratings(&self.user_id)).await?.unwrap_or_default())
  }

  /// Record a verdict on the couple `(a, b)` and persist the whole ledger.
  ///
  /// The pair key is canonical, so rating `(b, a)` afterwards overwrites
  /// this rating rather than adding a second one. On a storage failure the
  /// last committed ledger stands.
  pub async fn submit_rating(
    &self,
    a: &str,
    b: &str,
    verdict: Verdict,
  ) -> Result<Rating> {
    let mut ledger = self.ledger().await?;
    let rating =
      ledger.record(pair_key(a, b), verdict, Utc::now().timestamp_millis());
    self.put_doc(&keys::ratings(&self.user_id), &ledger).await?;

    tracing::debug!(
      user = %self.user_id,
      pair = %rating.pair_id,
      ?verdict,
      "recorded rating"
    );
    Ok(rating)
  }

  // ── Matching ──────────────────────────────────────────────────────────────

  /// Rank `pool` for this user with production randomness.
  ///
  /// The jitter makes consecutive calls differ; use [`Self::matches_with`]
  /// to fix the random source.
  pub async fn matches(&self, pool: &[Candidate]) -> Result<Vec<Match>> {
    let mut rng = StdRng::from_os_rng();
    self.matches_with(pool, &mut rng).await
  }

  /// Rank `pool` with an injected random source.
  pub async fn matches_with<R: Rng + ?Sized>(
    &self,
    pool: &[Candidate],
    rng: &mut R,
  ) -> Result<Vec<Match>> {
    let profile = self
      .profile()
      .await?
      .ok_or(Error::MissingProfileField("profile"))?;
    let ledger = self.ledger().await?;
    compute_matches(&profile, &ledger, pool, rng)
  }

  // ── Conversations ─────────────────────────────────────────────────────────

  /// Append a message from this user and schedule the simulated reply.
  pub async fn send_message(
    &self,
    partner_id: &str,
    content: &str,
  ) -> Result<Message> {
    let message = self
      .conversations
      .append(&self.user_id, partner_id, content)
      .await?;
    self.responder.schedule(&self.user_id, partner_id).await;
    Ok(message)
  }

  /// All messages exchanged with `partner_id`, oldest first. An empty list
  /// means no conversation yet.
  pub async fn load_messages(&self, partner_id: &str) -> Result<Vec<Message>> {
    Ok(
      self
        .conversations
        .load(&self.user_id, partner_id)
        .await?
        .messages()
        .to_vec(),
    )
  }

  /// Mark messages from `partner_id` to this user as read.
  pub async fn mark_read(&self, partner_id: &str) -> Result<usize> {
    self.conversations.mark_read(&self.user_id, partner_id).await
  }

  /// Unread messages from `partner_id`.
  pub async fn unread_count(&self, partner_id: &str) -> Result<usize> {
    self.conversations.unread_count(&self.user_id, partner_id).await
  }

  /// Whether the simulated partner is still composing a reply.
  pub async fn is_partner_typing(&self, partner_id: &str) -> bool {
    self.responder.is_typing(&self.user_id, partner_id).await
  }

  /// Close the conversation view: any pending simulated reply is dropped.
  pub async fn close_conversation(&self, partner_id: &str) {
    self.responder.cancel(&self.user_id, partner_id).await;
  }

  /// The chat list: every candidate with a non-empty thread, most recent
  /// activity first.
  pub async fn conversation_summaries(
    &self,
    partners: &[Candidate],
  ) -> Result<Vec<ConversationSummary>> {
    let mut summaries = Vec::new();
    for partner in partners {
      let thread = self.conversations.load(&self.user_id, &partner.id).await?;
      if let Some(last) = thread.last() {
        summaries.push(ConversationSummary {
          partner_id:   partner.id.clone(),
          last_message: last.clone(),
          unread:       thread.unread_count(&self.user_id),
        });
      }
    }
    summaries.sort_by(|a, b| b.last_message.timestamp.cmp(&a.last_message.timestamp));
    Ok(summaries)
  }
}

// ─── Current user ────────────────────────────────────────────────────────────

/// The id the auth collaborator last signed in, if any.
pub async fn current_user<S: DocumentStore>(store: &S) -> Result<Option<String>> {
  match store.get(keys::CURRENT_USER).await.map_err(Error::storage)? {
    Some(raw) => Ok(Some(decode_document(keys::CURRENT_USER, raw)?)),
    None => Ok(None),
  }
}

/// Remember `user_id` as the signed-in user.
pub async fn set_current_user<S: DocumentStore>(
  store: &S,
  user_id: &str,
) -> Result<()> {
  store
    .put(keys::CURRENT_USER, encode_document(&user_id)?)
    .await
    .map_err(Error::storage)
}

/// Forget the signed-in user. Profiles, ratings and threads stay for the
/// next sign-in.
pub async fn clear_current_user<S: DocumentStore>(store: &S) -> Result<()> {
  store.delete(keys::CURRENT_USER).await.map_err(Error::storage)
}
