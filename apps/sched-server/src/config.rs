//! Server configuration.

use std::env;

use crate::services::TimeNormalizer;

/// Storage backend selected by the database URL scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    Sqlite,
    Postgres,
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// IANA zone that incoming wall-clock times are read in.
    pub time_zone: String,
    /// Maximum pooled database connections.
    pub max_connections: u32,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9080,
            database_url: "sqlite:sched.db?mode=rwc".to_string(),
            time_zone: "UTC".to_string(),
            max_connections: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SCHED_SERVER_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("SCHED_SERVER_PORT is not a valid port: {port}"))?,
            None => defaults.port,
        };

        let max_connections = match lookup("SCHED_DB_MAX_CONNECTIONS") {
            Some(value) => value.parse().map_err(|_| {
                anyhow::anyhow!("SCHED_DB_MAX_CONNECTIONS is not a valid count: {value}")
            })?,
            None => defaults.max_connections,
        };

        let time_zone = lookup("SCHED_TIME_ZONE").unwrap_or(defaults.time_zone);
        TimeNormalizer::new(&time_zone)?;

        let config = Self {
            host: lookup("SCHED_SERVER_HOST").unwrap_or(defaults.host),
            port,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            time_zone,
            max_connections,
            log_level: lookup("SCHED_LOG_LEVEL").unwrap_or(defaults.log_level),
        };
        config.database_kind()?;

        Ok(config)
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the storage backend for the configured database URL.
    pub fn database_kind(&self) -> anyhow::Result<DatabaseKind> {
        let url = self.database_url.as_str();
        if url.starts_with("sqlite:") {
            Ok(DatabaseKind::Sqlite)
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseKind::Postgres)
        } else {
            anyhow::bail!("Unsupported DATABASE_URL scheme: {url}")
        }
    }
}
