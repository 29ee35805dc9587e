//! Parsers for the individual session environment variables.
//!
//! Each parser returns the parsed value, or hands a [`SessionConfigError`] to
//! [`Lenient::fallback`], which substitutes a default in debug builds and
//! fails in release builds.

use std::ops::RangeInclusive;

use actix_web::cookie::SameSite;
use mockable::Env;
use tracing::warn;

use super::{BuildMode, COOKIE_SECURE_ENV, SAMESITE_ENV, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const MINUTES_EXPECTED: &str = "whole minutes between 5 and 720";

/// Debug-only tolerance for missing or malformed values.
#[derive(Clone, Copy)]
pub(super) struct Lenient(pub(super) BuildMode);

impl Lenient {
    /// `default` in debug builds, `error` in release builds.
    pub(super) fn fallback<T: std::fmt::Debug>(
        self,
        default: T,
        error: SessionConfigError,
    ) -> Result<T, SessionConfigError> {
        if self.0.is_debug() {
            warn!(%error, fallback = ?default, "session setting defaulted");
            Ok(default)
        } else {
            Err(error)
        }
    }
}

/// Read a boolean toggle; missing values are an error in release builds.
pub(super) fn required_bool<E: Env>(
    env: &E,
    lenient: Lenient,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return lenient.fallback(default, SessionConfigError::MissingEnv { name });
    };
    match parse_bool(&raw) {
        Some(flag) => Ok(flag),
        None => lenient.fallback(
            default,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: BOOL_EXPECTED,
            },
        ),
    }
}

/// Read an optional whole-minute duration bounded by `range`.
pub(super) fn optional_minutes<E: Env>(
    env: &E,
    lenient: Lenient,
    name: &'static str,
    range: RangeInclusive<i64>,
    default: i64,
) -> Result<i64, SessionConfigError> {
    let Some(raw) = env.string(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(minutes) if range.contains(&minutes) => Ok(minutes),
        _ => lenient.fallback(
            default,
            SessionConfigError::InvalidEnv {
                name,
                value: raw,
                expected: MINUTES_EXPECTED,
            },
        ),
    }
}

/// Parse a `SameSite` policy. `None` is only allowed with secure cookies.
pub(super) fn parse_same_site(
    raw: String,
    lenient: Lenient,
    cookie_secure: bool,
    default: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => {
            warn!(
                "{SAMESITE_ENV}=None with {COOKIE_SECURE_ENV}=0; browsers may reject the cookie"
            );
            lenient.fallback(SameSite::None, SessionConfigError::InsecureSameSiteNone)
        }
        _ => lenient.fallback(
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: raw,
                expected: SAMESITE_EXPECTED,
            },
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    const TTL_ENV: &str = "CODERUSH_SESSION_TTL_MINUTES";

    fn env_with(value: Option<&'static str>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .returning(move |_| value.map(str::to_owned));
        env
    }

    #[rstest]
    #[case("1", Some(true))]
    #[case(" YES ", Some(true))]
    #[case("false", Some(false))]
    #[case("N", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn boolean_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw), expected);
    }

    #[rstest]
    #[case(None, 120)]
    #[case(Some("45"), 45)]
    #[case(Some(" 720 "), 720)]
    fn minutes_within_range_are_kept(#[case] raw: Option<&'static str>, #[case] expected: i64) {
        let minutes = optional_minutes(
            &env_with(raw),
            Lenient(BuildMode::Release),
            TTL_ENV,
            5..=720,
            120,
        )
        .expect("valid minutes");
        assert_eq!(minutes, expected);
    }

    #[rstest]
    #[case("4")]
    #[case("721")]
    #[case("two hours")]
    fn out_of_range_minutes_depend_on_build_mode(#[case] raw: &'static str) {
        let env = env_with(Some(raw));
        let debug = optional_minutes(&env, Lenient(BuildMode::Debug), TTL_ENV, 5..=720, 120);
        assert_eq!(debug.expect("debug falls back"), 120);

        let release = optional_minutes(&env, Lenient(BuildMode::Release), TTL_ENV, 5..=720, 120);
        assert!(matches!(
            release,
            Err(SessionConfigError::InvalidEnv { name: TTL_ENV, .. })
        ));
    }
}
