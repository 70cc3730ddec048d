//! Store configuration from the process environment
//!
//! Host, database, user and password have no defaults. A missing or empty
//! value is a startup error naming the variable.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

pub const ENV_HOST: &str = "SQL_SERVER";
pub const ENV_DATABASE: &str = "SQL_DB";
pub const ENV_USER: &str = "SQL_USER";
pub const ENV_PASSWORD: &str = "SQL_PASSWORD";
pub const ENV_PORT: &str = "SQL_PORT";
pub const ENV_SSL_MODE: &str = "SQL_SSL_MODE";
pub const ENV_MAX_CONNECTIONS: &str = "SQL_MAX_CONNECTIONS";
pub const ENV_ACQUIRE_TIMEOUT: &str = "SQL_ACQUIRE_TIMEOUT_SECS";
pub const ENV_QUERY_TIMEOUT: &str = "SQL_QUERY_TIMEOUT_SECS";

const DEFAULT_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

/// Configuration error raised before the server starts
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Connection settings for the backing store
#[derive(Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: SecretString,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
    /// Bound on acquiring a pooled connection, including establishing a new one
    pub acquire_timeout: Duration,
    /// Bound on a single statement, enforced client- and server-side
    pub query_timeout: Duration,
}

impl StoreConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let host = required(ENV_HOST)?;
        let database = required(ENV_DATABASE)?;
        let username = required(ENV_USER)?;
        let password = SecretString::from(required(ENV_PASSWORD)?);

        let port = parse_or(get(ENV_PORT), ENV_PORT, DEFAULT_PORT)?;
        let ssl_mode = parse_or(get(ENV_SSL_MODE), ENV_SSL_MODE, PgSslMode::Require)?;
        let max_connections =
            parse_or(get(ENV_MAX_CONNECTIONS), ENV_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS)?;
        let acquire_secs =
            parse_or(get(ENV_ACQUIRE_TIMEOUT), ENV_ACQUIRE_TIMEOUT, DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let query_secs =
            parse_or(get(ENV_QUERY_TIMEOUT), ENV_QUERY_TIMEOUT, DEFAULT_QUERY_TIMEOUT_SECS)?;

        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: ENV_MAX_CONNECTIONS,
                reason: "must be at least 1".into(),
            });
        }
        for (var, secs) in [(ENV_ACQUIRE_TIMEOUT, acquire_secs), (ENV_QUERY_TIMEOUT, query_secs)] {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var,
                    reason: "timeout must be at least 1 second".into(),
                });
            }
        }

        Ok(Self {
            host,
            port,
            database,
            username,
            password,
            ssl_mode,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_secs),
            query_timeout: Duration::from_secs(query_secs),
        })
    }

    /// Build sqlx connect options.
    ///
    /// Sets `statement_timeout` on every session so the server cancels
    /// statements the client has given up on.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(self.password.expose_secret())
            .ssl_mode(self.ssl_mode)
            .application_name("custctl")
            .options([(
                "statement_timeout",
                format!("{}ms", self.query_timeout.as_millis()),
            )])
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("query_timeout", &self.query_timeout)
            .finish()
    }
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        (ENV_HOST, "db.internal"),
        (ENV_DATABASE, "customers"),
        (ENV_USER, "svc"),
        (ENV_PASSWORD, "s3cret"),
    ];

    #[test]
    fn loads_required_with_defaults() {
        let config = StoreConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "customers");
        assert_eq!(config.username, "svc");
        assert_eq!(config.password.expose_secret(), "s3cret");
        assert!(matches!(config.ssl_mode, PgSslMode::Require));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert_eq!(config.query_timeout, Duration::from_secs(5));
    }

    #[test]
    fn each_required_var_is_reported() {
        for skip in [ENV_HOST, ENV_DATABASE, ENV_USER, ENV_PASSWORD] {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != skip).collect();
            let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(skip));
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[3] = (ENV_PASSWORD, "  ");
        let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_PASSWORD));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            (ENV_PORT, "6543"),
            (ENV_SSL_MODE, "disable"),
            (ENV_MAX_CONNECTIONS, "12"),
            (ENV_ACQUIRE_TIMEOUT, "2"),
            (ENV_QUERY_TIMEOUT, "30"),
        ]);
        let config = StoreConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 6543);
        assert!(matches!(config.ssl_mode, PgSslMode::Disable));
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
        assert_eq!(config.query_timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((ENV_PORT, "not-a-port"));
        let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_PORT, .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((ENV_QUERY_TIMEOUT, "0"));
        let err = StoreConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_QUERY_TIMEOUT, .. }));
    }

    #[test]
    fn debug_redacts_password() {
        let config = StoreConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
