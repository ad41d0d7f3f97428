#[cfg(feature = "config")]
use clap::Args;
use ipreverser_core::{Error, Result};
use ipreverser_postgres::{PgClient, PgConfig};
use serde::{Deserialize, Serialize};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Record store database connection.
    #[cfg_attr(feature = "config", clap(flatten))]
    pub postgres: PgConfig,
}

impl ServiceConfig {
    /// Creates a configuration for the given database settings.
    pub fn new(postgres: PgConfig) -> Self {
        Self { postgres }
    }

    /// Validates the configuration without connecting anywhere.
    pub fn validate(&self) -> Result<()> {
        self.postgres.validate().map_err(|e| {
            Error::startup()
                .with_message("Invalid database configuration")
                .with_source(e)
        })
    }

    /// Builds the pooled database client.
    ///
    /// Connections are opened lazily; reachability is verified when the
    /// record store is initialized.
    pub fn create_postgres_client(&self) -> Result<PgClient> {
        self.postgres.clone().build().map_err(|e| {
            Error::startup()
                .with_message("Failed to create database client")
                .with_source(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use ipreverser_core::ErrorKind;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_config_is_a_startup_error() {
        let config = ServiceConfig::new(PgConfig::default().with_max_connections(0));
        let error = config.validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Startup);
    }

    #[tokio::test]
    async fn client_is_created_without_connecting() -> anyhow::Result<()> {
        let client = ServiceConfig::default().create_postgres_client()?;
        assert_eq!(client.pool_status().size, 0);
        Ok(())
    }
}
