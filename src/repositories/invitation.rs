//! MySqlInvitationStore - Persistenza MySQL degli inviti di connessione

use super::cache::RowCache;
use super::traits::{InvitationStore, StoreError};
use crate::dtos::InvitationQuery;
use crate::entities::Invitation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use sqlx::Row;
use std::sync::Arc;
use tracing::debug;

const SELECT_COLUMNS: &str = "invitation_id, inviter_group_id, invitee_group_id, \
     inviter_user_id, connection_id, date_created, date_accepted, date_rejected";

pub struct MySqlInvitationStore {
    connection_pool: MySqlPool,
    cache: Arc<dyn RowCache<Invitation>>,
}

impl MySqlInvitationStore {
    pub fn new(connection_pool: MySqlPool, cache: Arc<dyn RowCache<Invitation>>) -> Self {
        Self {
            connection_pool,
            cache,
        }
    }
}

#[async_trait]
impl InvitationStore for MySqlInvitationStore {
    async fn create(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
        inviter_user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Invitation, StoreError> {
        // La garanzia di univocità pending è l'indice univoco su
        // (inviter_group_id, invitee_group_id, pending_key): in caso di
        // corsa l'insert perdente fallisce e from_write lo mappa su
        // Duplicate. Il controllo qui anticipa solo l'esito nel caso comune.
        if self.exists_pending(inviter_group_id, invitee_group_id).await? {
            return Err(StoreError::Duplicate);
        }

        let result = sqlx::query(
            "INSERT INTO connection_invitations
                 (inviter_group_id, invitee_group_id, inviter_user_id, date_created)
             VALUES (?, ?, ?, ?)",
        )
        .bind(inviter_group_id)
        .bind(invitee_group_id)
        .bind(inviter_user_id)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await
        .map_err(StoreError::from_write)?;

        let invitation = Invitation {
            invitation_id: result.last_insert_id() as i64,
            inviter_group_id,
            invitee_group_id,
            inviter_user_id,
            connection_id: None,
            date_created: created_at,
            date_accepted: None,
            date_rejected: None,
        };

        debug!(
            "Created invitation {} ({} -> {})",
            invitation.invitation_id, inviter_group_id, invitee_group_id
        );

        Ok(invitation)
    }

    async fn get(&self, invitation_id: i64) -> Result<Option<Invitation>, StoreError> {
        if let Some(cached) = self.cache.get(invitation_id) {
            debug!("Invitation {} served from cache", invitation_id);
            return Ok(Some(cached));
        }

        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM connection_invitations WHERE invitation_id = ?"
        );
        let row = sqlx::query_as::<_, Invitation>(&query)
            .bind(invitation_id)
            .fetch_optional(&self.connection_pool)
            .await?;

        if let Some(ref invitation) = row {
            self.cache.put(invitation_id, invitation.clone());
        }

        Ok(row)
    }

    async fn exists_pending(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM connection_invitations
             WHERE inviter_group_id = ? AND invitee_group_id = ?
               AND date_accepted IS NULL AND date_rejected IS NULL",
        )
        .bind(inviter_group_id)
        .bind(invitee_group_id)
        .fetch_one(&self.connection_pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    async fn query(&self, filter: &InvitationQuery) -> Result<Vec<Invitation>, StoreError> {
        // WHERE assemblata dinamicamente in base ai filtri presenti,
        // con bind posizionali nello stesso ordine delle clausole.
        let mut clauses: Vec<String> = Vec::new();

        if let Some(ids) = &filter.invitation_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(",");
            clauses.push(format!("invitation_id IN ({placeholders})"));
        }

        if filter.inviter_group_id.is_some() {
            clauses.push("inviter_group_id = ?".to_string());
        }

        if filter.invitee_group_id.is_some() {
            clauses.push("invitee_group_id = ?".to_string());
        }

        if filter.pending_only {
            clauses.push("date_accepted IS NULL AND date_rejected IS NULL".to_string());
        }

        let mut statement =
            format!("SELECT {SELECT_COLUMNS} FROM connection_invitations");
        if !clauses.is_empty() {
            statement.push_str(" WHERE ");
            statement.push_str(&clauses.join(" AND "));
        }
        statement.push_str(" ORDER BY invitation_id ASC");

        let mut query = sqlx::query_as::<_, Invitation>(&statement);

        if let Some(ids) = &filter.invitation_ids {
            for id in ids {
                query = query.bind(id);
            }
        }
        if let Some(inviter) = filter.inviter_group_id {
            query = query.bind(inviter);
        }
        if let Some(invitee) = filter.invitee_group_id {
            query = query.bind(invitee);
        }

        let rows = query.fetch_all(&self.connection_pool).await?;
        Ok(rows)
    }

    async fn mark_accepted(
        &self,
        invitation_id: i64,
        connection_id: i64,
        when: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE connection_invitations
             SET connection_id = ?, date_accepted = ?
             WHERE invitation_id = ?",
        )
        .bind(connection_id)
        .bind(when)
        .bind(invitation_id)
        .execute(&self.connection_pool)
        .await?;

        self.cache.invalidate(invitation_id);

        Ok(())
    }

    async fn mark_rejected(
        &self,
        invitation_id: i64,
        when: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE connection_invitations SET date_rejected = ? WHERE invitation_id = ?",
        )
        .bind(when)
        .bind(invitation_id)
        .execute(&self.connection_pool)
        .await?;

        self.cache.invalidate(invitation_id);

        Ok(())
    }

    async fn delete(&self, invitation_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM connection_invitations WHERE invitation_id = ?")
            .bind(invitation_id)
            .execute(&self.connection_pool)
            .await?;

        self.cache.invalidate(invitation_id);

        Ok(result.rows_affected() > 0)
    }
}
