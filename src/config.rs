use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// `None` runs against the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub log_level: String,
    /// Caps how many questions the index page shows.
    pub index_limit: Option<usize>,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(ConfigError::Invalid(format!(".env: {err}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let host = match get("HOST") {
            Some(raw) => parse(&raw, "HOST")?,
            None => parse(DEFAULT_HOST, "HOST")?,
        };
        let port = get("PORT")
            .map(|raw| parse(&raw, "PORT"))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let max_connections = get("DATABASE_MAX_CONNECTIONS")
            .map(|raw| parse::<u32>(&raw, "DATABASE_MAX_CONNECTIONS"))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::Invalid(
                "DATABASE_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        let database = get("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections,
        });

        let index_limit = get("POLLS_INDEX_LIMIT")
            .map(|raw| parse::<usize>(&raw, "POLLS_INDEX_LIMIT"))
            .transpose()?;
        if index_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "POLLS_INDEX_LIMIT must be positive".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            database,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            index_limit,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(raw: &str, key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::Invalid(format!("invalid {key} '{raw}': {e}")))
}
