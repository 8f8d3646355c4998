//! Storage backend selection.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on `max_connections`.
pub const MAX_POOL_SIZE: u32 = 100;

/// Where the domain model, its audit trail and the finding ledger live.
///
/// Without a `url` everything is kept in process memory and lost on
/// restart. With one, both stores share a single PostgreSQL pool; a
/// ledger sync or annotation holds one pooled connection for the length
/// of its transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a request waits for a pooled connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Apply the embedded migrations before serving.
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// The PostgreSQL URL, if one is set and not blank.
    pub fn postgres_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let Some(url) = self.postgres_url() else {
            return Ok(());
        };
        if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            run_migrations: false,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn no_url_selects_memory_storage() {
        let config = DatabaseConfig::default();
        assert_eq!(config.postgres_url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_url_selects_memory_storage() {
        let config = postgres("   ");
        assert_eq!(config.postgres_url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn url_is_trimmed() {
        let config = postgres(" postgres://localhost/workbench ");
        assert_eq!(config.postgres_url(), Some("postgres://localhost/workbench"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let config = postgres("mysql://localhost/workbench");
        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));
    }

    #[test]
    fn pool_needs_at_least_one_connection() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..postgres("postgresql://localhost/workbench")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPoolSize));
    }

    #[test]
    fn pool_size_is_capped() {
        let config = DatabaseConfig {
            max_connections: MAX_POOL_SIZE + 1,
            ..postgres("postgresql://localhost/workbench")
        };
        assert_eq!(config.validate(), Err(ValidationError::PoolSizeTooLarge));
    }

    #[test]
    fn acquire_timeout_is_in_seconds() {
        let config = DatabaseConfig {
            acquire_timeout_secs: 2,
            ..Default::default()
        };
        assert_eq!(config.acquire_timeout(), Duration::from_secs(2));
    }
}
