//! Store factory
//!
//! This module builds the configured store backend.

use crate::adapters::database::traits::CareStore;
use crate::adapters::memory::{load_fixture, MemoryStore};
use crate::adapters::postgresql::adapter::PostgreSQLStore;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{CareLinkConfig, DatabaseTarget};
use crate::domain::errors::CareLinkError;
use crate::domain::Result;
use std::sync::Arc;

/// Create the store selected by `database_target`
///
/// # Errors
///
/// Returns an error if the backend section is missing, the PostgreSQL pool
/// cannot be built, or the memory fixture cannot be loaded.
pub async fn create_store(config: &CareLinkConfig) -> Result<Arc<dyn CareStore>> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                CareLinkError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            Ok(Arc::new(PostgreSQLStore::new(client)) as Arc<dyn CareStore>)
        }
        DatabaseTarget::Memory => {
            let store = match config.memory.fixture_path {
                Some(ref path) => {
                    tracing::info!(fixture = %path, "Creating in-memory store from fixture");
                    MemoryStore::from_fixture(load_fixture(path)?)?
                }
                None => {
                    tracing::info!("Creating empty in-memory store");
                    MemoryStore::new()
                }
            };
            Ok(Arc::new(store) as Arc<dyn CareStore>)
        }
    }
}

/// Create the PostgreSQL client directly, for schema migrations
pub async fn create_postgresql_client(config: &CareLinkConfig) -> Result<PostgreSQLClient> {
    let pg_config = config.postgresql.as_ref().ok_or_else(|| {
        CareLinkError::Configuration("migrate requires a [postgresql] section".to_string())
    })?;
    PostgreSQLClient::new(pg_config.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::traits::RecordSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_create_empty_memory_store() {
        let store = create_store(&CareLinkConfig::in_memory()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.connections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_memory_store_from_fixture() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"hospitals": [{"hospital_id": "A", "name": "Alpha", "location": "North"}]}"#,
        )
        .unwrap();

        let mut config = CareLinkConfig::in_memory();
        config.memory.fixture_path = Some(file.path().to_string_lossy().to_string());

        let store = create_store(&config).await.unwrap();
        let hospital = store
            .hospital(&crate::domain::HospitalId::new("A").unwrap())
            .await
            .unwrap();
        assert!(hospital.is_some());
    }

    #[tokio::test]
    async fn test_postgresql_target_without_section() {
        let mut config = CareLinkConfig::in_memory();
        config.database_target = DatabaseTarget::PostgreSQL;

        let result = create_store(&config).await;
        assert!(matches!(result, Err(CareLinkError::Configuration(_))));
    }
}
