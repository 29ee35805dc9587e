//! Problem difficulty tiers.
//!
//! Tiers gate progression: each tier above `easy` unlocks only once the tier
//! below it has been solved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Difficulty tier of a problem.
///
/// Ordering follows difficulty, so `Tier::Easy < Tier::Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// First problem; always unlocked.
    Easy,
    /// Second problem; unlocked by solving `Easy`.
    Medium,
    /// Final problem; unlocked by solving `Medium`.
    Hard,
}

/// Error returned when parsing an unknown tier name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier: {0}")]
pub struct UnknownTier(pub String);

impl Tier {
    /// Every tier in progression order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// The tier that must be solved before this one unlocks.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Tier;
    ///
    /// assert_eq!(Tier::Hard.previous(), Some(Tier::Medium));
    /// assert_eq!(Tier::Easy.previous(), None);
    /// ```
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Easy => None,
            Self::Medium => Some(Self::Easy),
            Self::Hard => Some(Self::Medium),
        }
    }

    /// One-based position used by the `/problemN` routes.
    pub const fn slot(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    /// Inverse of [`Tier::slot`].
    pub const fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Profile column holding the solve duration for this tier.
    pub const fn duration_column(self) -> &'static str {
        match self {
            Self::Easy => "time_easy_ms",
            Self::Medium => "time_medium_ms",
            Self::Hard => "time_hard_ms",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownTier(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Tier::Easy, 1)]
    #[case(Tier::Medium, 2)]
    #[case(Tier::Hard, 3)]
    fn slots_round_trip(#[case] tier: Tier, #[case] slot: u8) {
        assert_eq!(tier.slot(), slot);
        assert_eq!(Tier::from_slot(slot), Some(tier));
    }

    #[rstest]
    #[case(0)]
    #[case(4)]
    fn unknown_slots_are_rejected(#[case] slot: u8) {
        assert_eq!(Tier::from_slot(slot), None);
    }

    #[rstest]
    #[case("easy", Tier::Easy)]
    #[case(" Medium ", Tier::Medium)]
    #[case("HARD", Tier::Hard)]
    fn parses_tier_names(#[case] raw: &str, #[case] expected: Tier) {
        assert_eq!(raw.parse::<Tier>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("expert".parse::<Tier>().is_err());
    }

    #[test]
    fn ordering_follows_difficulty() {
        assert!(Tier::Easy < Tier::Medium);
        assert!(Tier::Medium < Tier::Hard);
    }

    #[test]
    fn serialises_lowercase() {
        let value = serde_json::to_value(Tier::Medium).expect("serialise tier");
        assert_eq!(value, "medium");
    }
}
