//! MySqlSettingsStore - Persistenza MySQL delle policy di condivisione

use super::traits::{SettingsStore, StoreError};
use crate::entities::{CategorySelection, ConnectionSettings};
use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

/// Le categorie sono memorizzate come payload JSON (`CategorySelection`
/// serializzato): il formato memorizzato non incorpora mai il collasso
/// privacy, che viene applicato solo in lettura dal service layer.
pub struct MySqlSettingsStore {
    connection_pool: MySqlPool,
}

impl MySqlSettingsStore {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl SettingsStore for MySqlSettingsStore {
    async fn get(
        &self,
        connection_id: i64,
        group_id: i64,
    ) -> Result<Option<ConnectionSettings>, StoreError> {
        let row = sqlx::query_as::<_, (String, bool)>(
            "SELECT categories, exclude_comments FROM connection_settings
             WHERE connection_id = ? AND group_id = ?",
        )
        .bind(connection_id)
        .bind(group_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        let Some((categories_json, exclude_comments)) = row else {
            return Ok(None);
        };

        let categories: CategorySelection = serde_json::from_str(&categories_json)?;

        Ok(Some(ConnectionSettings {
            connection_id,
            group_id,
            categories,
            exclude_comments,
        }))
    }

    async fn set(&self, settings: &ConnectionSettings) -> Result<(), StoreError> {
        let categories_json = serde_json::to_string(&settings.categories)?;

        sqlx::query(
            "INSERT INTO connection_settings (connection_id, group_id, categories, exclude_comments)
             VALUES (?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE categories = VALUES(categories),
                                     exclude_comments = VALUES(exclude_comments)",
        )
        .bind(settings.connection_id)
        .bind(settings.group_id)
        .bind(categories_json)
        .bind(settings.exclude_comments)
        .execute(&self.connection_pool)
        .await?;

        debug!(
            "Saved settings for connection {} group {}",
            settings.connection_id, settings.group_id
        );

        Ok(())
    }

    async fn delete_for_connection(&self, connection_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM connection_settings WHERE connection_id = ?")
            .bind(connection_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
