use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};

/// Installs the global fmt subscriber. `RUST_LOG` wins over `LOG_LEVEL`.
pub fn init_tracing(config: &Config) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}

fn default_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    let directives = format!("{level},sqlx=warn,tower_http={level}");
    EnvFilter::try_new(directives)
        .map_err(|e| ConfigError::Invalid(format!("invalid LOG_LEVEL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_levels() {
        assert!(default_filter("debug").is_ok());
    }

    #[test]
    fn rejects_garbage_levels() {
        assert!(default_filter("polls=loud").is_err());
    }
}
