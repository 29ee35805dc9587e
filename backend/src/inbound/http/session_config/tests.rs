//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("coderush-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write temporary key");
        Self { path }
    }

    fn path_str(&self) -> String {
        self.path.to_str().expect("utf-8 temp path").to_owned()
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars(key_file: &TempKeyFile) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_file.path_str()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ])
}

fn release_error(vars: HashMap<&'static str, String>) -> SessionConfigError {
    match session_settings_from_env(&mock_env(vars), BuildMode::Release) {
        Ok(_) => panic!("release settings should have been rejected"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_each_toggle(#[case] missing: &'static str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.remove(missing);

    let error = release_error(vars);
    assert!(
        matches!(error, SessionConfigError::MissingEnv { name } if name == missing),
        "unexpected error: {error}"
    );
}

#[rstest]
#[case("maybe")]
#[case("")]
fn release_rejects_unparseable_cookie_secure(#[case] value: &str) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, value.to_owned());

    let error = release_error(vars);
    assert!(matches!(
        error,
        SessionConfigError::InvalidEnv {
            name: COOKIE_SECURE_ENV,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(ALLOW_EPHEMERAL_ENV, "yes".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::EphemeralNotAllowed
    ));
}

#[rstest]
fn release_rejects_unreadable_key_file() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(
        KEY_FILE_ENV,
        format!("{}-missing", key_file.path_str()),
    );

    assert!(matches!(release_error(vars), SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_short_key() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN / 2);
    let error = release_error(release_vars(&key_file));
    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn release_rejects_same_site_none_without_secure_cookie() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(COOKIE_SECURE_ENV, "0".to_owned());
    vars.insert(SAMESITE_ENV, "None".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_accepts_complete_settings() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let settings = session_settings_from_env(&mock_env(release_vars(&key_file)), BuildMode::Release)
        .expect("valid release settings");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, Duration::minutes(TTL_MINUTES_DEFAULT));
}

#[rstest]
fn release_honours_session_ttl() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(TTL_ENV, "30".to_owned());

    let settings = session_settings_from_env(&mock_env(vars), BuildMode::Release)
        .expect("valid release settings");
    assert_eq!(settings.ttl, Duration::minutes(30));
}

#[rstest]
fn release_rejects_session_ttl_outside_bounds() {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(TTL_ENV, "0".to_owned());

    assert!(matches!(
        release_error(vars),
        SessionConfigError::InvalidEnv { name: TTL_ENV, .. }
    ));
}

#[rstest]
fn debug_fills_in_defaults_and_ephemeral_key() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults");

    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("unexpected", SameSite::Lax)]
#[case("strict", SameSite::Strict)]
fn debug_same_site_parsing(#[case] raw: &str, #[case] expected: SameSite) {
    let key_file = TempKeyFile::new(SESSION_KEY_MIN_LEN);
    let mut vars = release_vars(&key_file);
    vars.insert(SAMESITE_ENV, raw.to_owned());

    let settings =
        session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings");
    assert_eq!(settings.same_site, expected);
}
