//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use postboard_infra::DatabaseConfig;

pub const DEFAULT_COOKIE_NAME: &str = "postboard_session";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub redis_url: Option<String>,
    pub redis_connect_timeout: Duration,
    pub session: SessionConfig,
}

/// How the session token travels and how long it lives.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// `None` keeps sessions until logout.
    pub ttl: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            ttl: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let database = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 20),
                min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 2),
            });

        let session = SessionConfig {
            cookie_name: lookup("SESSION_COOKIE_NAME")
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            cookie_secure: lookup("SESSION_COOKIE_SECURE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
                .unwrap_or(false),
            ttl: parsed("SESSION_TTL_SECS").map(Duration::from_secs),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080),
            database,
            redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),
            redis_connect_timeout: Duration::from_secs(parsed("REDIS_CONNECT_TIMEOUT_SECS").unwrap_or(5)),
            session,
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
