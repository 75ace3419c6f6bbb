//! The match ranker — a pure function from (profile, ledger, pool) to an
//! ordered list of scored candidates.
//!
//! Nothing here is persisted; matches are recomputed on every read.

use rand::Rng;
use serde::Serialize;

use crate::{
  Error, Result,
  candidate::Candidate,
  pair::pair_contains,
  profile::Profile,
  rating::{Ledger, Verdict},
};

/// Score added for every `yes` rating that names the candidate.
const RATING_BOOST: i64 = 10;
/// Exclusive upper bound of the cosmetic jitter added to each score.
const JITTER_BOUND: i64 = 30;
/// Matches returned at most.
const MAX_MATCHES: usize = 10;
/// Display percentage bounds; purely cosmetic.
const MIN_PERCENT: i64 = 60;
const MAX_PERCENT: i64 = 95;

/// A scored candidate. Derived data only — never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
  pub candidate:    Candidate,
  pub score:        i64,
  pub mutual_count: u32,
}

impl Match {
  /// The compatibility percentage shown next to the match.
  ///
  /// Scores below 60 are floored and scores above 95 capped for display;
  /// the clamp never feeds back into ranking order, which uses the raw
  /// score.
  pub fn display_percent(&self) -> i64 {
    self.score.clamp(MIN_PERCENT, MAX_PERCENT)
  }
}

/// Rank the candidate pool for `profile` against the rating ledger.
///
/// Candidates of the preferred gender each earn +10 and one mutual
/// connection per `yes` rating whose pair key names them, plus a uniform
/// jitter in `[0, 30)` drawn from `rng`. The jitter is cosmetic variance:
/// results are not reproducible between calls unless the caller fixes the
/// generator (tests inject a seeded or all-zero rng).
///
/// Fails with a configuration error if `profile.preference` is unset; an
/// empty eligible set is a normal empty result.
pub fn compute_matches<R: Rng + ?Sized>(
  profile: &Profile,
  ledger: &Ledger,
  pool: &[Candidate],
  rng: &mut R,
) -> Result<Vec<Match>> {
  let preference = profile.preference.ok_or(Error::PreferenceUnset)?;
  let wanted = preference.target_gender();

  let mut matches: Vec<Match> = pool
    .iter()
    .filter(|candidate| candidate.gender == wanted)
    .map(|candidate| {
      let mut score = 0i64;
      let mut mutual_count = 0u32;

      // A rating covers a pair, so it may credit 0, 1 or 2 of the
      // eligible candidates.
      for rating in ledger.ratings() {
        if rating.verdict == Verdict::Yes
          && pair_contains(&rating.pair_id, &candidate.id)
        {
          score += RATING_BOOST;
          mutual_count += 1;
        }
      }

      score += rng.random_range(0..JITTER_BOUND);
      Match { candidate: candidate.clone(), score, mutual_count }
    })
    .collect();

  // Stable sort: exact score ties keep their pool order.
  matches.sort_by(|a, b| b.score.cmp(&a.score));
  matches.truncate(MAX_MATCHES);
  Ok(matches)
}

#[cfg(test)]
mod tests {
  use rand::RngCore;

  use super::*;
  use crate::{
    candidate::{Gender, demo_pool},
    profile::Preference,
  };

  /// Rng whose every draw is zero, fixing the jitter to 0.
  struct ZeroRng;

  impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 { 0 }

    fn next_u64(&mut self) -> u64 { 0 }

    fn fill_bytes(&mut self, dest: &mut [u8]) { dest.fill(0) }
  }

  fn profile_preferring(preference: Preference) -> Profile {
    Profile {
      name: "Demo".into(),
      gender: Some(Gender::Woman),
      preference: Some(preference),
      ..Profile::default()
    }
  }

  fn candidate(id: &str, gender: Gender) -> Candidate {
    Candidate {
      id: id.to_owned(),
      name: format!("c{id}"),
      age: 30,
      photo_ref: String::new(),
      bio: String::new(),
      gender,
    }
  }

  #[test]
  fn only_preferred_gender_is_eligible() {
    let profile = profile_preferring(Preference::Man);
    let matches =
      compute_matches(&profile, &Ledger::new(), &demo_pool(), &mut ZeroRng)
        .unwrap();

    assert!(!matches.is_empty());
    assert!(matches.iter().all(|m| m.candidate.gender == Gender::Man));
  }

  #[test]
  fn unset_preference_is_a_configuration_error() {
    let profile = Profile { name: "Demo".into(), ..Profile::default() };
    let err =
      compute_matches(&profile, &Ledger::new(), &demo_pool(), &mut ZeroRng)
        .unwrap_err();
    assert!(err.is_configuration());
  }

  #[test]
  fn yes_rating_adds_ten_and_one_mutual() {
    let profile = profile_preferring(Preference::Woman);
    let mut ledger = Ledger::new();
    ledger.record("1-2", Verdict::Yes, 1);

    let matches =
      compute_matches(&profile, &ledger, &demo_pool(), &mut ZeroRng).unwrap();

    let sam = matches.iter().find(|m| m.candidate.id == "2").unwrap();
    assert_eq!(sam.score, 10);
    assert_eq!(sam.mutual_count, 1);

    let riley = matches.iter().find(|m| m.candidate.id == "6").unwrap();
    assert_eq!(riley.score, 0);
    assert_eq!(riley.mutual_count, 0);
  }

  #[test]
  fn no_ratings_are_counted_as_zero() {
    let profile = profile_preferring(Preference::Woman);
    let mut ledger = Ledger::new();
    ledger.record("1-2", Verdict::No, 1);

    let matches =
      compute_matches(&profile, &ledger, &demo_pool(), &mut ZeroRng).unwrap();
    let sam = matches.iter().find(|m| m.candidate.id == "2").unwrap();
    assert_eq!(sam.score, 0);
    assert_eq!(sam.mutual_count, 0);
  }

  #[test]
  fn rated_candidate_ranks_above_otherwise_equal_unrated() {
    let profile = profile_preferring(Preference::Woman);
    let mut ledger = Ledger::new();
    ledger.record("1-4", Verdict::Yes, 1);

    let matches =
      compute_matches(&profile, &ledger, &demo_pool(), &mut ZeroRng).unwrap();
    assert_eq!(matches[0].candidate.id, "4");
    assert!(matches[0].score > matches[1].score);
  }

  #[test]
  fn a_rating_may_credit_both_members_of_a_pair() {
    let profile = profile_preferring(Preference::Woman);
    let mut ledger = Ledger::new();
    // Both "2" and "4" are eligible women.
    ledger.record("2-4", Verdict::Yes, 1);

    let matches =
      compute_matches(&profile, &ledger, &demo_pool(), &mut ZeroRng).unwrap();
    for id in ["2", "4"] {
      let m = matches.iter().find(|m| m.candidate.id == id).unwrap();
      assert_eq!(m.score, 10);
      assert_eq!(m.mutual_count, 1);
    }
  }

  #[test]
  fn results_truncate_to_ten() {
    let pool: Vec<Candidate> = (0..15)
      .map(|i| candidate(&format!("w{i}"), Gender::Woman))
      .collect();
    let profile = profile_preferring(Preference::Woman);

    let matches =
      compute_matches(&profile, &Ledger::new(), &pool, &mut ZeroRng).unwrap();
    assert_eq!(matches.len(), 10);
  }

  #[test]
  fn exact_ties_keep_pool_order() {
    let pool: Vec<Candidate> = (0..5)
      .map(|i| candidate(&format!("w{i}"), Gender::Woman))
      .collect();
    let profile = profile_preferring(Preference::Woman);

    let matches =
      compute_matches(&profile, &Ledger::new(), &pool, &mut ZeroRng).unwrap();
    let ids: Vec<&str> =
      matches.iter().map(|m| m.candidate.id.as_str()).collect();
    assert_eq!(ids, ["w0", "w1", "w2", "w3", "w4"]);
  }

  #[test]
  fn empty_eligible_set_is_an_empty_result() {
    let pool = vec![candidate("m0", Gender::Man)];
    let profile = profile_preferring(Preference::Woman);

    let matches =
      compute_matches(&profile, &Ledger::new(), &pool, &mut ZeroRng).unwrap();
    assert!(matches.is_empty());
  }

  #[test]
  fn display_percent_clamps_without_reordering() {
    let low = Match {
      candidate:    candidate("a", Gender::Woman),
      score:        5,
      mutual_count: 0,
    };
    let high = Match {
      candidate:    candidate("b", Gender::Woman),
      score:        120,
      mutual_count: 3,
    };
    assert_eq!(low.display_percent(), 60);
    assert_eq!(high.display_percent(), 95);
    // Raw scores keep their distance even when the display saturates.
    assert!(high.score > low.score);
  }
}
