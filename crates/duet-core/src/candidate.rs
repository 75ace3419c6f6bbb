//! Candidates and the couples derived from them.
//!
//! Candidates come from a static, externally supplied pool; they are never
//! created or mutated by the core. Couples are every mixed-gender pairing of
//! the pool, presented to the user for rating.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::pair::pair_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Man,
  Woman,
}

/// A static person profile eligible to be matched or rated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
  pub id:        String,
  pub name:      String,
  pub age:       u8,
  pub photo_ref: String,
  pub bio:       String,
  pub gender:    Gender,
}

/// A rateable pairing of two candidates, identified by the canonical pair
/// key of its members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Couple {
  pub id:     String,
  pub first:  Candidate,
  pub second: Candidate,
}

/// All mixed-gender pairings of `pool`, in an order shuffled by `rng`.
///
/// Each unordered pair appears exactly once; same-gender pairings are
/// skipped.
pub fn generate_couples<R: Rng + ?Sized>(
  pool: &[Candidate],
  rng: &mut R,
) -> Vec<Couple> {
  let mut couples: Vec<Couple> = Vec::new();
  for (i, first) in pool.iter().enumerate() {
    for second in &pool[i + 1..] {
      if first.gender != second.gender {
        couples.push(Couple {
          id:     pair_key(&first.id, &second.id),
          first:  first.clone(),
          second: second.clone(),
        });
      }
    }
  }
  couples.shuffle(rng);
  couples
}

/// The demo candidate pool shipped with the application.
pub fn demo_pool() -> Vec<Candidate> {
  let raw: [(&str, &str, u8, &str, Gender); 6] = [
    ("1", "Alex", 28, "Love hiking and coffee", Gender::Man),
    ("2", "Sam", 26, "Artist and book lover", Gender::Woman),
    ("3", "Jordan", 30, "Musician and traveler", Gender::Man),
    ("4", "Casey", 25, "Yoga instructor and foodie", Gender::Woman),
    ("5", "Taylor", 27, "Tech enthusiast", Gender::Man),
    ("6", "Riley", 24, "Photography and nature lover", Gender::Woman),
  ];

  raw
    .into_iter()
    .map(|(id, name, age, bio, gender)| Candidate {
      id: id.to_owned(),
      name: name.to_owned(),
      age,
      photo_ref: format!("photos/{id}.jpg"),
      bio: bio.to_owned(),
      gender,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  #[test]
  fn couples_are_mixed_gender_and_unique() {
    let pool = demo_pool();
    let mut rng = StdRng::seed_from_u64(42);
    let couples = generate_couples(&pool, &mut rng);

    // 3 men x 3 women.
    assert_eq!(couples.len(), 9);
    for couple in &couples {
      assert_ne!(couple.first.gender, couple.second.gender);
    }

    let mut ids: Vec<&str> = couples.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 9);
  }

  #[test]
  fn couple_ids_are_canonical_pair_keys() {
    let pool = demo_pool();
    let mut rng = StdRng::seed_from_u64(0);
    for couple in generate_couples(&pool, &mut rng) {
      assert_eq!(couple.id, pair_key(&couple.second.id, &couple.first.id));
    }
  }
}
