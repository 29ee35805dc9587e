//! Problem catalogue.
//!
//! CodeRush ships exactly one problem per tier. The catalogue is hardcoded and
//! immutable; adapters look problems up by id or by tier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Tier;

/// Validation errors returned by [`ProblemId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProblemIdValidationError {
    /// The identifier was empty.
    #[error("problem id must not be empty")]
    Empty,
    /// The identifier carried surrounding whitespace.
    #[error("problem id must not contain surrounding whitespace")]
    Padded,
}

/// Stable problem identifier such as `reverseString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProblemId(String);

impl ProblemId {
    /// Validate and construct a [`ProblemId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ProblemIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ProblemIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(ProblemIdValidationError::Padded);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ProblemId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ProblemId> for String {
    fn from(value: ProblemId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProblemId {
    type Error = ProblemIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One coding challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Stable identifier.
    pub id: ProblemId,
    /// Difficulty tier gating access.
    pub tier: Tier,
    /// Short title.
    pub title: String,
    /// Full statement sent to the verification model.
    pub description: String,
}

struct ProblemSeed {
    id: &'static str,
    tier: Tier,
    title: &'static str,
    description: &'static str,
}

const SEEDS: [ProblemSeed; 3] = [
    ProblemSeed {
        id: "reverseString",
        tier: Tier::Easy,
        title: "Reverse String",
        description: "Write a function that reverses a string. The input string is given as \
an array of characters. You must do this by modifying the input array in-place with O(1) extra \
memory.",
    },
    ProblemSeed {
        id: "findPairSum",
        tier: Tier::Medium,
        title: "Find Pair Sum",
        description: "Given an array of integers and a target sum, return indices of the two \
numbers such that they add up to the target. You may assume that each input would have exactly \
one solution, and you may not use the same element twice.",
    },
    ProblemSeed {
        id: "minCostPath",
        tier: Tier::Hard,
        title: "Minimum Cost Path",
        description: "Given a cost matrix and a position (m, n) in the matrix, find cost of \
minimum cost path to reach (m, n) from top left cell (0, 0). You can only traverse down, right \
and diagonally lower cells from a given cell.",
    },
];

/// The fixed set of problems, ordered by tier.
///
/// # Examples
/// ```
/// use coderush::domain::{ProblemCatalogue, Tier};
///
/// let catalogue = ProblemCatalogue::default();
/// let easy = catalogue.by_tier(Tier::Easy);
/// assert_eq!(easy.id.as_ref(), "reverseString");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemCatalogue {
    easy: Problem,
    medium: Problem,
    hard: Problem,
}

impl Default for ProblemCatalogue {
    fn default() -> Self {
        let [easy, medium, hard] = SEEDS.map(|seed| Problem {
            id: ProblemId(seed.id.to_owned()),
            tier: seed.tier,
            title: seed.title.to_owned(),
            description: seed.description.to_owned(),
        });
        Self { easy, medium, hard }
    }
}

impl ProblemCatalogue {
    /// The problem assigned to `tier`.
    pub fn by_tier(&self, tier: Tier) -> &Problem {
        match tier {
            Tier::Easy => &self.easy,
            Tier::Medium => &self.medium,
            Tier::Hard => &self.hard,
        }
    }

    /// Look a problem up by identifier.
    pub fn find(&self, id: &str) -> Option<&Problem> {
        self.iter().find(|problem| problem.id.as_ref() == id)
    }

    /// Problems in tier order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        Tier::ALL.into_iter().map(|tier| self.by_tier(tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("reverseString", Tier::Easy, "Reverse String")]
    #[case("findPairSum", Tier::Medium, "Find Pair Sum")]
    #[case("minCostPath", Tier::Hard, "Minimum Cost Path")]
    fn catalogue_holds_one_problem_per_tier(
        #[case] id: &str,
        #[case] tier: Tier,
        #[case] title: &str,
    ) {
        let catalogue = ProblemCatalogue::default();
        let problem = catalogue.find(id).expect("problem present");
        assert_eq!(problem.tier, tier);
        assert_eq!(problem.title, title);
        assert_eq!(catalogue.by_tier(tier).id.as_ref(), id);
    }

    #[test]
    fn iterates_in_tier_order() {
        let catalogue = ProblemCatalogue::default();
        let tiers: Vec<Tier> = catalogue.iter().map(|problem| problem.tier).collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
    }

    #[test]
    fn unknown_id_is_absent() {
        assert!(ProblemCatalogue::default().find("twoSum").is_none());
    }

    #[rstest]
    #[case("", ProblemIdValidationError::Empty)]
    #[case(" reverseString", ProblemIdValidationError::Padded)]
    fn problem_id_validation(#[case] raw: &str, #[case] expected: ProblemIdValidationError) {
        assert_eq!(ProblemId::new(raw), Err(expected));
    }

    #[test]
    fn descriptions_mention_constraints() {
        let catalogue = ProblemCatalogue::default();
        assert!(catalogue.by_tier(Tier::Easy).description.contains("O(1) extra memory"));
        assert!(catalogue.by_tier(Tier::Hard).description.contains("diagonally lower"));
    }
}
