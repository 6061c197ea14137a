//! Application settings loaded via OrthoConfig.
//!
//! Values are layered from `EVENTS_*` environment variables, CLI flags and an
//! optional configuration file. Unset values fall back to the defaults below.

use std::net::SocketAddr;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use events_api::domain::{AccountRole, ClientCredentials, CredentialsValidationError, TokenSettings};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CLIENT_ID: &str = "myApp";
const DEFAULT_CLIENT_SECRET: &str = "pass";
const DEFAULT_ADMIN_USERNAME: &str = "admin@email.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_USER_USERNAME: &str = "user@email.com";
const DEFAULT_USER_PASSWORD: &str = "user";
const DEFAULT_ACCESS_TTL_SECS: i64 = 600;
const DEFAULT_REFRESH_TTL_SECS: i64 = 3600;

/// Failure to turn loaded settings into runtime values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid public base URL {value:?}: {message}")]
    PublicBaseUrl { value: String, message: String },
    #[error("invalid client credentials: {0}")]
    Client(#[from] CredentialsValidationError),
    #[error("{name} must be a positive number of seconds, got {value}")]
    Ttl { name: &'static str, value: i64 },
}

/// Account created at startup when missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    pub roles: Vec<AccountRole>,
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EVENTS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// Origin used for hypermedia links instead of the request `Host`.
    pub public_base_url: Option<String>,
    /// Registered OAuth2 client identifier.
    pub client_id: Option<String>,
    /// Registered OAuth2 client secret.
    pub client_secret: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub user_username: Option<String>,
    pub user_password: Option<String>,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: Option<i64>,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: Option<i64>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn public_base_url(&self) -> Result<Option<Url>, SettingsError> {
        self.public_base_url
            .as_deref()
            .map(|value| {
                Url::parse(value).map_err(|err| SettingsError::PublicBaseUrl {
                    value: value.to_owned(),
                    message: err.to_string(),
                })
            })
            .transpose()
    }

    /// Client registration and token lifetimes.
    pub fn token_settings(&self) -> Result<TokenSettings, SettingsError> {
        let client = ClientCredentials::try_from_parts(
            self.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID),
            self.client_secret.as_deref().unwrap_or(DEFAULT_CLIENT_SECRET),
        )?;
        Ok(TokenSettings {
            client,
            access_ttl: ttl(
                "access_token_ttl_secs",
                self.access_token_ttl_secs.unwrap_or(DEFAULT_ACCESS_TTL_SECS),
            )?,
            refresh_ttl: ttl(
                "refresh_token_ttl_secs",
                self.refresh_token_ttl_secs
                    .unwrap_or(DEFAULT_REFRESH_TTL_SECS),
            )?,
        })
    }

    /// The admin account (ADMIN and USER) followed by the plain user account.
    pub fn seed_accounts(&self) -> [SeedAccount; 2] {
        [
            SeedAccount {
                username: self
                    .admin_username
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_owned()),
                password: self
                    .admin_password
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned()),
                roles: vec![AccountRole::Admin, AccountRole::User],
            },
            SeedAccount {
                username: self
                    .user_username
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_USERNAME.to_owned()),
                password: self
                    .user_password
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER_PASSWORD.to_owned()),
                roles: vec![AccountRole::User],
            },
        ]
    }
}

fn ttl(name: &'static str, value: i64) -> Result<TimeDelta, SettingsError> {
    if value <= 0 {
        return Err(SettingsError::Ttl { name, value });
    }
    Ok(TimeDelta::seconds(value))
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 11] = [
        "EVENTS_BIND_ADDR",
        "EVENTS_DATABASE_URL",
        "EVENTS_PUBLIC_BASE_URL",
        "EVENTS_CLIENT_ID",
        "EVENTS_CLIENT_SECRET",
        "EVENTS_ADMIN_USERNAME",
        "EVENTS_ADMIN_PASSWORD",
        "EVENTS_USER_USERNAME",
        "EVENTS_USER_PASSWORD",
        "EVENTS_ACCESS_TOKEN_TTL_SECS",
        "EVENTS_REFRESH_TOKEN_TTL_SECS",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("events-api")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url().is_none());
        assert!(settings.public_base_url().expect("absent").is_none());

        let tokens = settings.token_settings().expect("default token settings");
        assert_eq!(tokens.client.client_id(), "myApp");
        assert_eq!(tokens.access_ttl, TimeDelta::seconds(600));
        assert_eq!(tokens.refresh_ttl, TimeDelta::seconds(3600));

        let [admin, user] = settings.seed_accounts();
        assert_eq!(admin.username, "admin@email.com");
        assert_eq!(admin.roles, vec![AccountRole::Admin, AccountRole::User]);
        assert_eq!(user.username, "user@email.com");
        assert_eq!(user.roles, vec![AccountRole::User]);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("EVENTS_BIND_ADDR", "127.0.0.1:9090"),
            ("EVENTS_DATABASE_URL", "postgres://localhost/events"),
            ("EVENTS_PUBLIC_BASE_URL", "https://events.example.com"),
            ("EVENTS_CLIENT_ID", "console"),
            ("EVENTS_ACCESS_TOKEN_TTL_SECS", "60"),
            ("EVENTS_ADMIN_USERNAME", "root@email.com"),
        ]);

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("literal")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/events"));
        assert_eq!(
            settings
                .public_base_url()
                .expect("valid url")
                .map(|url| url.host_str().map(str::to_owned)),
            Some(Some("events.example.com".to_owned()))
        );
        let tokens = settings.token_settings().expect("token settings");
        assert_eq!(tokens.client.client_id(), "console");
        assert_eq!(tokens.access_ttl, TimeDelta::seconds(60));
        assert_eq!(settings.seed_accounts()[0].username, "root@email.com");
    }

    #[rstest]
    #[case::bad_address(("EVENTS_BIND_ADDR", "not-an-address"))]
    #[case::bad_url(("EVENTS_PUBLIC_BASE_URL", "::nope"))]
    #[case::zero_ttl(("EVENTS_ACCESS_TOKEN_TTL_SECS", "0"))]
    #[case::negative_ttl(("EVENTS_REFRESH_TOKEN_TTL_SECS", "-5"))]
    fn invalid_values_are_reported(#[case] invalid: (&str, &str)) {
        let settings = load_with(&[invalid]);

        let failed = settings.bind_addr().is_err()
            || settings.public_base_url().is_err()
            || settings.token_settings().is_err();
        assert!(failed, "{} should be rejected", invalid.0);
    }

    #[rstest]
    fn blank_database_url_selects_memory_adapters() {
        let settings = load_with(&[("EVENTS_DATABASE_URL", "  ")]);
        assert!(settings.database_url().is_none());
    }
}
