//! User identity primitives and the hosted profile row.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LeaderboardRow, TierDurations};

/// Validation errors returned by the identity constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier issued by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 64;

/// Public handle shown on the leaderboard.
///
/// Stored trimmed; uniqueness is enforced by the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`], trimming surrounding whitespace.
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; the auth service owns real address validation.
        let pattern = r"^[^@\s]+@[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// E-mail address used for password sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`], trimming surrounding whitespace.
    ///
    /// # Examples
    /// ```
    /// use coderush::domain::Email;
    ///
    /// assert!(Email::new(" ada@example.com ").is_ok());
    /// assert!(Email::new("ada").is_err());
    /// ```
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One row of the hosted `profiles` table.
///
/// Identity columns stay empty until the first successful sign-in writes
/// them; durations fill in as tiers are solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Primary key, equal to the auth user id.
    pub id: UserId,
    /// Public handle.
    pub username: Option<Username>,
    /// Sign-in address.
    pub email: Option<Email>,
    /// Per-tier solve times.
    pub durations: TierDurations,
}

impl UserProfile {
    /// Empty profile for `id`.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            username: None,
            email: None,
            durations: TierDurations::default(),
        }
    }

    /// The row the `public_leaderboard` view derives from this profile.
    pub fn leaderboard_row(&self) -> LeaderboardRow {
        LeaderboardRow {
            id: Some(self.id.to_string()),
            username: self.username.as_ref().map(ToString::to_string),
            email: self.email.as_ref().map(ToString::to_string),
            time_easy_ms: self.durations.easy_ms,
            time_medium_ms: self.durations.medium_ms,
            time_hard_ms: self.durations.hard_ms,
            total_time_ms: self.durations.total_ms(),
        }
    }
}
