//! Application settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use coderush::inbound::http::session_config::{BuildMode, SessionSettings};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CORS_ORIGIN: &str = "*";

fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

fn default_cors_origin() -> String {
    DEFAULT_CORS_ORIGIN.to_owned()
}

/// Runtime settings loaded via OrthoConfig from `CODERUSH_*` variables,
/// configuration files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CODERUSH")]
pub struct AppSettings {
    /// Interface to bind.
    #[ortho_config(default = default_host())]
    pub host: String,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Hosted backend project URL.
    pub supabase_url: Option<String>,
    /// Hosted backend anonymous key.
    pub supabase_anon_key: Option<String>,
    /// Chat-completions endpoint of the verification model.
    pub codestral_api_url: Option<String>,
    /// Bearer key for the verification model.
    pub codestral_api_key: Option<String>,
    /// Model name override.
    pub codestral_model: Option<String>,
    /// Timeout applied to every outbound request, in seconds.
    #[ortho_config(default = 30)]
    pub http_timeout_secs: u64,
    /// `Access-Control-Allow-Origin` of the `verify-code` procedure.
    #[ortho_config(default = default_cors_origin())]
    pub cors_allowed_origin: String,
}

/// Hosted backend connection details.
pub struct HostedBackendSettings {
    pub url: Url,
    pub anon_key: Zeroizing<String>,
}

/// Verification model connection details.
pub struct ModelSettings {
    pub url: Url,
    pub api_key: Zeroizing<String>,
    pub model: Option<String>,
}

/// Errors raised while interpreting [`AppSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {host}:{port}: {source}")]
    BindAddress {
        host: String,
        port: u16,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid URL in {field}: {source}")]
    Url {
        field: &'static str,
        #[source]
        source: url::ParseError,
    },
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|source| SettingsError::Url { field, source })
}

impl AppSettings {
    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.trim();
        format!("{host}:{}", self.port)
            .parse()
            .map_err(|source| SettingsError::BindAddress {
                host: host.to_owned(),
                port: self.port,
                source,
            })
    }

    /// Outbound request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Allowed CORS origin for `verify-code`.
    pub fn cors_allowed_origin(&self) -> &str {
        self.cors_allowed_origin.trim()
    }

    /// Hosted backend settings; `None` unless both URL and key are set.
    pub fn hosted_backend(&self) -> Result<Option<HostedBackendSettings>, SettingsError> {
        let (Some(url), Some(key)) = (
            non_blank(self.supabase_url.as_ref()),
            non_blank(self.supabase_anon_key.as_ref()),
        ) else {
            return Ok(None);
        };
        Ok(Some(HostedBackendSettings {
            url: parse_url("supabase_url", url)?,
            anon_key: Zeroizing::new(key.to_owned()),
        }))
    }

    /// Verification model settings; `None` unless both URL and key are set.
    pub fn model(&self) -> Result<Option<ModelSettings>, SettingsError> {
        let (Some(url), Some(key)) = (
            non_blank(self.codestral_api_url.as_ref()),
            non_blank(self.codestral_api_key.as_ref()),
        ) else {
            return Ok(None);
        };
        Ok(Some(ModelSettings {
            url: parse_url("codestral_api_url", url)?,
            api_key: Zeroizing::new(key.to_owned()),
            model: non_blank(self.codestral_model.as_ref()).map(str::to_owned),
        }))
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: actix_web::cookie::time::Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) hosted_backend: Option<HostedBackendSettings>,
    pub(crate) model: Option<ModelSettings>,
    pub(crate) http_timeout: Duration,
    pub(crate) cors_allowed_origin: String,
    pub(crate) build_mode: BuildMode,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and the bind
    /// address; outbound adapters stay unconfigured until attached.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ttl,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl: ttl,
            bind_addr,
            hosted_backend: None,
            model: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cors_allowed_origin: DEFAULT_CORS_ORIGIN.to_owned(),
            build_mode: BuildMode::from_debug_assertions(),
        }
    }

    /// Set whether unconfigured adapters may fall back to in-process
    /// stand-ins ([`BuildMode::Debug`]) or must report the gap.
    #[must_use]
    pub fn with_build_mode(mut self, build_mode: BuildMode) -> Self {
        self.build_mode = build_mode;
        self
    }

    /// Attach the outbound settings from `settings`.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when a configured URL does not parse.
    pub fn with_settings(mut self, settings: &AppSettings) -> Result<Self, SettingsError> {
        self.hosted_backend = settings.hosted_backend()?;
        self.model = settings.model()?;
        self.http_timeout = settings.http_timeout();
        self.cors_allowed_origin = settings.cors_allowed_origin().to_owned();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "CODERUSH_HOST",
        "CODERUSH_PORT",
        "CODERUSH_SUPABASE_URL",
        "CODERUSH_SUPABASE_ANON_KEY",
        "CODERUSH_CODESTRAL_API_URL",
        "CODERUSH_CODESTRAL_API_KEY",
        "CODERUSH_CODESTRAL_MODEL",
        "CODERUSH_HTTP_TIMEOUT_SECS",
        "CODERUSH_CORS_ALLOWED_ORIGIN",
    ];

    fn load_with(overrides: &[(&'static str, &str)]) -> AppSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        AppSettings::load_from_iter([OsString::from("coderush")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.http_timeout(), Duration::from_secs(30));
        assert_eq!(settings.cors_allowed_origin(), "*");
        assert!(settings.hosted_backend().expect("settings").is_none());
        assert!(settings.model().expect("settings").is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("CODERUSH_HOST", "127.0.0.1"),
            ("CODERUSH_PORT", "9000"),
            ("CODERUSH_SUPABASE_URL", "https://project.supabase.co"),
            ("CODERUSH_SUPABASE_ANON_KEY", "anon"),
            ("CODERUSH_CODESTRAL_API_URL", "https://codestral.example/v1/chat/completions"),
            ("CODERUSH_CODESTRAL_API_KEY", "secret"),
            ("CODERUSH_HTTP_TIMEOUT_SECS", "5"),
            ("CODERUSH_CORS_ALLOWED_ORIGIN", "https://coderush.example"),
        ]);
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.http_timeout(), Duration::from_secs(5));
        assert_eq!(settings.cors_allowed_origin(), "https://coderush.example");

        let hosted = settings.hosted_backend().expect("settings").expect("hosted");
        assert_eq!(hosted.url.host_str(), Some("project.supabase.co"));
        assert_eq!(hosted.anon_key.as_str(), "anon");

        let model = settings.model().expect("settings").expect("model");
        assert_eq!(model.api_key.as_str(), "secret");
        assert!(model.model.is_none());
    }

    #[rstest]
    #[case(&[("CODERUSH_SUPABASE_URL", "https://project.supabase.co")])]
    #[case(&[("CODERUSH_SUPABASE_ANON_KEY", "anon")])]
    #[case(&[("CODERUSH_SUPABASE_URL", "  "), ("CODERUSH_SUPABASE_ANON_KEY", "anon")])]
    fn partial_hosted_settings_count_as_unconfigured(#[case] vars: &[(&'static str, &str)]) {
        let settings = load_with(vars);
        assert!(settings.hosted_backend().expect("settings").is_none());
    }

    #[rstest]
    fn malformed_urls_are_rejected() {
        let settings = load_with(&[
            ("CODERUSH_CODESTRAL_API_URL", "not a url"),
            ("CODERUSH_CODESTRAL_API_KEY", "secret"),
        ]);
        assert!(matches!(
            settings.model(),
            Err(SettingsError::Url {
                field: "codestral_api_url",
                ..
            })
        ));
    }

    #[rstest]
    fn unset_settings_still_load() {
        let settings = load_with(&[]);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.http_timeout_secs, 30);
        assert_eq!(settings.cors_allowed_origin, "*");
        assert!(settings.supabase_url.is_none());
        assert!(settings.codestral_api_key.is_none());
    }

    #[rstest]
    fn unparsable_host_is_reported() {
        let settings = load_with(&[("CODERUSH_HOST", "not a host"), ("CODERUSH_PORT", "1")]);
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddress { port: 1, .. })
        ));
    }
}
