//! Session configuration parsing and validation.
//!
//! The cookie session holds the access token, the player and the active
//! attempt, so its key, cookie flags and lifetime are validated up front.
//! Debug builds fall back to safe defaults with warnings; release builds
//! reject missing or invalid values.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;
mod parsing;

use parsing::{Lenient, optional_minutes, parse_same_site, required_bool};

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/coderush_session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
pub(crate) const COOKIE_SECURE_ENV: &str = "CODERUSH_SESSION_COOKIE_SECURE";
pub(crate) const SAMESITE_ENV: &str = "CODERUSH_SESSION_SAMESITE";
pub(crate) const ALLOW_EPHEMERAL_ENV: &str = "CODERUSH_SESSION_ALLOW_EPHEMERAL";
pub(crate) const KEY_FILE_ENV: &str = "CODERUSH_SESSION_KEY_FILE";
pub(crate) const TTL_ENV: &str = "CODERUSH_SESSION_TTL_MINUTES";
const TTL_MINUTES_DEFAULT: i64 = 120;
const TTL_MINUTES_RANGE: std::ops::RangeInclusive<i64> = 5..=720;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use coderush::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    /// Whether missing settings may fall back to local stand-ins.
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Session settings derived from configuration toggles.
pub struct SessionSettings {
    /// Signing key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Configured `SameSite` policy for session cookies.
    pub same_site: SameSite,
    /// How long a session, and with it a running attempt, survives.
    pub ttl: Duration,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie setting in release builds.
    #[error("CODERUSH_SESSION_SAMESITE=None requires CODERUSH_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("CODERUSH_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use coderush::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("coderush_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let key_file = key_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(move |name| match name {
///         "CODERUSH_SESSION_KEY_FILE" => Some(key_file.clone()),
///         "CODERUSH_SESSION_COOKIE_SECURE" => Some("1".to_string()),
///         "CODERUSH_SESSION_SAMESITE" => Some("Strict".to_string()),
///         "CODERUSH_SESSION_ALLOW_EPHEMERAL" => Some("0".to_string()),
///         _ => None,
///     });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// assert_eq!(settings.ttl.whole_minutes(), 120);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let lenient = Lenient(mode);
    let cookie_secure = required_bool(env, lenient, COOKIE_SECURE_ENV, true)?;
    let same_site = same_site_from_env(env, lenient, cookie_secure)?;
    let allow_ephemeral = required_bool(env, lenient, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl_minutes = optional_minutes(
        env,
        lenient,
        TTL_ENV,
        TTL_MINUTES_RANGE,
        TTL_MINUTES_DEFAULT,
    )?;
    let key = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl: Duration::minutes(ttl_minutes),
    })
}

fn same_site_from_env<E: Env>(
    env: &E,
    lenient: Lenient,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if lenient.0.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match env.string(SAMESITE_ENV) {
        Some(raw) => parse_same_site(raw, lenient, cookie_secure, default),
        None => lenient.fallback(default, SessionConfigError::MissingEnv { name: SAMESITE_ENV }),
    }
}

fn session_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let key_path = env
        .string(KEY_FILE_ENV)
        .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned());
    let path = PathBuf::from(key_path);

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) => {
            if mode.is_debug() || allow_ephemeral {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(SessionConfigError::KeyRead {
                    path,
                    source: error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests;
