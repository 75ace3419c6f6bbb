//! The user's own profile.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, candidate::Gender};

/// Which candidate gender the user is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
  Man,
  Woman,
}

impl Preference {
  /// The candidate gender this preference selects.
  pub fn target_gender(self) -> Gender {
    match self {
      Self::Man => Gender::Man,
      Self::Woman => Gender::Woman,
    }
  }
}

/// Owned by exactly one user; mutated only through an explicit save.
///
/// Fields the user has not filled in yet are `None` — they are never
/// silently defaulted. Ranking in particular refuses to run while
/// `preference` is unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
  pub name:       String,
  pub gender:     Option<Gender>,
  pub preference: Option<Preference>,
  pub photo_ref:  String,
  pub summary:    String,
}

impl Profile {
  /// Check the fields every persisted profile must carry.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingProfileField("name"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_name_is_rejected() {
    let profile = Profile { name: "  ".into(), ..Profile::default() };
    let err = profile.validate().unwrap_err();
    assert!(err.is_validation());
  }

  #[test]
  fn preference_selects_matching_gender() {
    assert_eq!(Preference::Man.target_gender(), Gender::Man);
    assert_eq!(Preference::Woman.target_gender(), Gender::Woman);
  }
}
