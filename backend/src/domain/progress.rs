//! Progress tracking and the tier unlock state machine.
//!
//! A tier counts as solved once its solve duration is recorded. Medium unlocks
//! after easy is solved, hard after medium; easy is always open.

use serde::{Deserialize, Serialize};

use super::{ProblemId, Tier, UserId};

/// Per-tier solve durations in milliseconds.
///
/// ## Invariants
/// - A field is `None` until that tier is solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDurations {
    /// Time taken to solve the easy problem.
    pub easy_ms: Option<u64>,
    /// Time taken to solve the medium problem.
    pub medium_ms: Option<u64>,
    /// Time taken to solve the hard problem.
    pub hard_ms: Option<u64>,
}

impl TierDurations {
    /// Duration recorded for `tier`, if solved.
    pub const fn get(&self, tier: Tier) -> Option<u64> {
        match tier {
            Tier::Easy => self.easy_ms,
            Tier::Medium => self.medium_ms,
            Tier::Hard => self.hard_ms,
        }
    }

    /// Copy with `tier` replaced by `duration_ms`; the other tiers are kept.
    #[must_use]
    pub const fn with_duration(mut self, tier: Tier, duration_ms: u64) -> Self {
        match tier {
            Tier::Easy => self.easy_ms = Some(duration_ms),
            Tier::Medium => self.medium_ms = Some(duration_ms),
            Tier::Hard => self.hard_ms = Some(duration_ms),
        }
        self
    }

    /// Solved flags derived from the recorded durations.
    pub const fn solved(&self) -> SolvedTiers {
        SolvedTiers {
            easy: self.easy_ms.is_some(),
            medium: self.medium_ms.is_some(),
            hard: self.hard_ms.is_some(),
        }
    }

    /// Sum of all three durations once every tier is solved.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{Tier, TierDurations};
    ///
    /// let partial = TierDurations::default().with_duration(Tier::Easy, 1_000);
    /// assert_eq!(partial.total_ms(), None);
    ///
    /// let full = partial
    ///     .with_duration(Tier::Medium, 2_000)
    ///     .with_duration(Tier::Hard, 3_000);
    /// assert_eq!(full.total_ms(), Some(6_000));
    /// ```
    pub fn total_ms(&self) -> Option<u64> {
        let easy = self.easy_ms?;
        let medium = self.medium_ms?;
        let hard = self.hard_ms?;
        Some(easy.saturating_add(medium).saturating_add(hard))
    }
}

/// Display status of a tier for a given player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierStatus {
    /// The previous tier is unsolved.
    Locked,
    /// Open but not yet solved.
    Unlocked,
    /// Already solved.
    Solved,
}

/// Which tiers a player has solved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedTiers {
    /// Easy solved.
    pub easy: bool,
    /// Medium solved.
    pub medium: bool,
    /// Hard solved.
    pub hard: bool,
}

impl SolvedTiers {
    /// Whether `tier` has been solved.
    pub const fn is_solved(&self, tier: Tier) -> bool {
        match tier {
            Tier::Easy => self.easy,
            Tier::Medium => self.medium,
            Tier::Hard => self.hard,
        }
    }

    /// Whether `tier` may be opened.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::{SolvedTiers, Tier};
    ///
    /// let mut solved = SolvedTiers::default();
    /// assert!(solved.is_unlocked(Tier::Easy));
    /// assert!(!solved.is_unlocked(Tier::Medium));
    /// solved.mark_solved(Tier::Easy);
    /// assert!(solved.is_unlocked(Tier::Medium));
    /// assert!(!solved.is_unlocked(Tier::Hard));
    /// ```
    pub const fn is_unlocked(&self, tier: Tier) -> bool {
        match tier.previous() {
            None => true,
            Some(previous) => self.is_solved(previous),
        }
    }

    /// Record `tier` as solved.
    pub const fn mark_solved(&mut self, tier: Tier) {
        match tier {
            Tier::Easy => self.easy = true,
            Tier::Medium => self.medium = true,
            Tier::Hard => self.hard = true,
        }
    }

    /// Number of solved tiers.
    pub fn solved_count(&self) -> usize {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.is_solved(*tier))
            .count()
    }

    /// The highest tier the player may open.
    pub fn highest_unlocked(&self) -> Tier {
        Tier::ALL
            .into_iter()
            .rev()
            .find(|tier| self.is_unlocked(*tier))
            .unwrap_or(Tier::Easy)
    }

    /// Status shown next to `tier`.
    pub const fn status(&self, tier: Tier) -> TierStatus {
        if self.is_solved(tier) {
            TierStatus::Solved
        } else if self.is_unlocked(tier) {
            TierStatus::Unlocked
        } else {
            TierStatus::Locked
        }
    }
}

/// Session-resident view of the signed-in player.
///
/// Serialised in camelCase so the stored shape matches the client's
/// persisted user object: `{id, name, solved, activeProblem}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Solved flags per tier.
    pub solved: SolvedTiers,
    /// Problem open in the editor, if any.
    #[serde(default)]
    pub active_problem: Option<ProblemId>,
}

impl Player {
    /// Fresh player with nothing solved.
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            solved: SolvedTiers::default(),
            active_problem: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn solved(easy: bool, medium: bool, hard: bool) -> SolvedTiers {
        SolvedTiers { easy, medium, hard }
    }

    #[rstest]
    #[case(solved(false, false, false), Tier::Easy, true)]
    #[case(solved(false, false, false), Tier::Medium, false)]
    #[case(solved(false, false, false), Tier::Hard, false)]
    #[case(solved(true, false, false), Tier::Medium, true)]
    #[case(solved(true, false, false), Tier::Hard, false)]
    #[case(solved(true, true, false), Tier::Hard, true)]
    #[case(solved(false, true, false), Tier::Hard, true)]
    fn unlock_rules(#[case] state: SolvedTiers, #[case] tier: Tier, #[case] expected: bool) {
        assert_eq!(state.is_unlocked(tier), expected);
    }

    #[rstest]
    #[case(solved(false, false, false), Tier::Easy)]
    #[case(solved(true, false, false), Tier::Medium)]
    #[case(solved(true, true, false), Tier::Hard)]
    #[case(solved(true, true, true), Tier::Hard)]
    fn highest_unlocked_tier(#[case] state: SolvedTiers, #[case] expected: Tier) {
        assert_eq!(state.highest_unlocked(), expected);
    }

    #[rstest]
    #[case(solved(true, false, false), Tier::Easy, TierStatus::Solved)]
    #[case(solved(true, false, false), Tier::Medium, TierStatus::Unlocked)]
    #[case(solved(true, false, false), Tier::Hard, TierStatus::Locked)]
    fn status_per_tier(
        #[case] state: SolvedTiers,
        #[case] tier: Tier,
        #[case] expected: TierStatus,
    ) {
        assert_eq!(state.status(tier), expected);
    }

    #[test]
    fn with_duration_replaces_only_that_tier() {
        let durations = TierDurations {
            easy_ms: Some(10),
            medium_ms: Some(20),
            hard_ms: None,
        };
        let updated = durations.with_duration(Tier::Medium, 25);
        assert_eq!(updated.easy_ms, Some(10));
        assert_eq!(updated.medium_ms, Some(25));
        assert_eq!(updated.hard_ms, None);
    }

    #[test]
    fn total_requires_all_three_tiers() {
        let durations = TierDurations::default()
            .with_duration(Tier::Easy, 1_500)
            .with_duration(Tier::Hard, 9_000);
        assert_eq!(durations.total_ms(), None);
        let complete = durations.with_duration(Tier::Medium, 4_000);
        assert_eq!(complete.total_ms(), Some(14_500));
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let durations = TierDurations {
            easy_ms: Some(u64::MAX),
            medium_ms: Some(1),
            hard_ms: Some(1),
        };
        assert_eq!(durations.total_ms(), Some(u64::MAX));
    }

    #[test]
    fn solved_flags_follow_durations() {
        let durations = TierDurations::default().with_duration(Tier::Easy, 1);
        assert_eq!(durations.solved(), solved(true, false, false));
        assert_eq!(durations.solved().solved_count(), 1);
    }

    #[test]
    fn player_serialises_like_the_stored_user_object() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        let mut player = Player::new(id, "ada");
        player.active_problem = Some(ProblemId::new("reverseString").expect("problem id"));
        let value = serde_json::to_value(&player).expect("serialise player");
        assert_eq!(value["name"], "ada");
        assert_eq!(value["solved"]["easy"], false);
        assert_eq!(value["activeProblem"], "reverseString");
    }
}
