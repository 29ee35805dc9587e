//! Editor attempts: timing and the verify-before-submit gate.
//!
//! An attempt starts when the player opens a problem and ends when a verified
//! submission is accepted. A verdict is bound to the exact code that was
//! verified, so any edit invalidates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{Error, ProblemId, Tier, Verdict};

/// Message returned when submitting code that has not passed verification.
pub const VERIFY_BEFORE_SUBMIT: &str = "Please verify your code before submitting.";

/// Hex-encoded SHA-256 digest of a code snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeDigest(String);

impl CodeDigest {
    /// Digest `code`.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::CodeDigest;
    ///
    /// assert_eq!(CodeDigest::of("x"), CodeDigest::of("x"));
    /// assert_ne!(CodeDigest::of("x"), CodeDigest::of("x "));
    /// ```
    pub fn of(code: &str) -> Self {
        Self(hex::encode(Sha256::digest(code.as_bytes())))
    }

    /// Hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One timed attempt at a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Problem being solved.
    pub problem: ProblemId,
    /// Tier of that problem.
    pub tier: Tier,
    /// When the editor opened.
    pub started_at: DateTime<Utc>,
    /// Digest of the last code that verified as correct.
    #[serde(default)]
    verified: Option<CodeDigest>,
}

impl Attempt {
    /// Start an attempt at `now`.
    pub const fn start(problem: ProblemId, tier: Tier, now: DateTime<Utc>) -> Self {
        Self {
            problem,
            tier,
            started_at: now,
            verified: None,
        }
    }

    /// Record the verdict returned for `code`.
    ///
    /// A correct verdict binds the attempt to `code`; an incorrect one clears
    /// any earlier verification.
    pub fn record_verdict(&mut self, code: &str, verdict: Verdict) {
        self.verified = match verdict {
            Verdict::Correct => Some(CodeDigest::of(code)),
            Verdict::Incorrect => None,
        };
    }

    /// Drop any verification, e.g. after an edit.
    pub fn invalidate(&mut self) {
        self.verified = None;
    }

    /// Whether some code snapshot is currently verified.
    pub const fn is_verified(&self) -> bool {
        self.verified.is_some()
    }

    /// Whether exactly `code` is the verified snapshot.
    pub fn is_verified_for(&self, code: &str) -> bool {
        self.verified
            .as_ref()
            .is_some_and(|digest| *digest == CodeDigest::of(code))
    }

    /// Reject submission unless `code` is the verified snapshot.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use coderush::domain::{Attempt, ProblemId, Tier, Verdict};
    ///
    /// let id = ProblemId::new("reverseString").unwrap();
    /// let mut attempt = Attempt::start(id, Tier::Easy, Utc::now());
    /// assert!(attempt.ensure_verified("print(1)").is_err());
    /// attempt.record_verdict("print(1)", Verdict::Correct);
    /// assert!(attempt.ensure_verified("print(1)").is_ok());
    /// assert!(attempt.ensure_verified("print(2)").is_err());
    /// ```
    pub fn ensure_verified(&self, code: &str) -> Result<(), Error> {
        if self.is_verified_for(code) {
            Ok(())
        } else {
            Err(Error::conflict(VERIFY_BEFORE_SUBMIT))
        }
    }

    /// Milliseconds since the attempt started, clamped at zero.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.started_at).num_milliseconds()).unwrap_or(0)
    }
}

/// Format a duration as `mm:ss`, or `hh:mm:ss` once it reaches an hour.
///
/// # Examples
/// ```
/// use coderush::domain::format_elapsed;
///
/// assert_eq!(format_elapsed(65_000), "01:05");
/// assert_eq!(format_elapsed(3_726_000), "01:02:06");
/// ```
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1_000;
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
