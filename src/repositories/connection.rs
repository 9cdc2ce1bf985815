//! MySqlConnectionStore - Persistenza MySQL delle connessioni tra gruppi

use super::cache::RowCache;
use super::traits::{ConnectionStore, StoreError};
use crate::entities::connection::{Connection, normalize_pair};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use std::sync::Arc;
use tracing::debug;

pub struct MySqlConnectionStore {
    connection_pool: MySqlPool,
    cache: Arc<dyn RowCache<Connection>>,
}

impl MySqlConnectionStore {
    pub fn new(connection_pool: MySqlPool, cache: Arc<dyn RowCache<Connection>>) -> Self {
        Self {
            connection_pool,
            cache,
        }
    }
}

#[async_trait]
impl ConnectionStore for MySqlConnectionStore {
    async fn create(
        &self,
        group_a: i64,
        group_b: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Connection, StoreError> {
        // La coppia è non ordinata: normalizzarla prima dell'insert fa sì
        // che l'indice univoco su (group_1_id, group_2_id) copra entrambe
        // le direzioni.
        let (group_1_id, group_2_id) = normalize_pair(group_a, group_b);

        let result = sqlx::query(
            "INSERT INTO connections (group_1_id, group_2_id, date_created) VALUES (?, ?, ?)",
        )
        .bind(group_1_id)
        .bind(group_2_id)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await
        .map_err(StoreError::from_write)?;

        let connection = Connection {
            connection_id: result.last_insert_id() as i64,
            group_1_id,
            group_2_id,
            date_created: created_at,
        };

        debug!("Created connection {} for pair ({}, {})", connection.connection_id, group_1_id, group_2_id);

        self.cache.invalidate(connection.connection_id);

        Ok(connection)
    }

    async fn get(&self, connection_id: i64) -> Result<Option<Connection>, StoreError> {
        if let Some(cached) = self.cache.get(connection_id) {
            debug!("Connection {} served from cache", connection_id);
            return Ok(Some(cached));
        }

        let row = sqlx::query_as::<_, Connection>(
            "SELECT connection_id, group_1_id, group_2_id, date_created
             FROM connections WHERE connection_id = ?",
        )
        .bind(connection_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        if let Some(ref connection) = row {
            self.cache.put(connection_id, connection.clone());
        }

        Ok(row)
    }

    async fn find_by_group(&self, group_id: i64) -> Result<Vec<Connection>, StoreError> {
        let rows = sqlx::query_as::<_, Connection>(
            "SELECT connection_id, group_1_id, group_2_id, date_created
             FROM connections WHERE group_1_id = ? OR group_2_id = ?",
        )
        .bind(group_id)
        .bind(group_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows)
    }

    async fn delete(&self, connection_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM connections WHERE connection_id = ?")
            .bind(connection_id)
            .execute(&self.connection_pool)
            .await?;

        // Invalidazione sincrona prima del ritorno: la richiesta successiva
        // non deve vedere la riga cancellata.
        self.cache.invalidate(connection_id);

        Ok(result.rows_affected() > 0)
    }
}
