//! Authentication primitives such as credentials and access tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::{Email, UserId, UserValidationError, Username};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing, blank or too long.
    Username(UserValidationError),
    /// E-mail address was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(err) | Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated credentials used by both sign-in and sign-up.
///
/// ## Invariants
/// - `username` and `email` are trimmed and validated.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use coderush::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("ada", "ada@example.com", "pw").unwrap();
/// assert_eq!(creds.username().as_ref(), "ada");
/// assert_eq!(creds.password(), "pw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: Username,
    email: Email,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let username = Username::new(username).map_err(CredentialsValidationError::Username)?;
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username recorded on the profile.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// E-mail address used for password sign-in.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Bearer token issued by the hosted auth service.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Borrow the raw token for outbound requests.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Session returned by the auth service after a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Authenticated user id.
    pub user_id: UserId,
    /// Bearer token for subsequent calls.
    pub access_token: AccessToken,
}

/// Result of a sign-up call against the auth service.
///
/// `session` is absent when the project requires e-mail confirmation before
/// the first sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpResult {
    /// Id of the created account, when the service reports one.
    pub user_id: Option<UserId>,
    /// Session, when the service signs the user in immediately.
    pub session: Option<AuthSession>,
}

/// User authenticated by the account service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user id.
    pub id: UserId,
    /// Public handle.
    pub username: Username,
    /// Bearer token kept in the session.
    pub access_token: AccessToken,
}

/// Outcome of a sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account exists and the user is signed in.
    SignedIn(AuthenticatedUser),
    /// The account exists but cannot sign in until the e-mail is confirmed.
    VerificationRequired {
        /// Id of the created account, when known.
        user_id: Option<UserId>,
    },
}
