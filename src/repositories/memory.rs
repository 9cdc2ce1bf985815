//! In-memory stores - Implementazioni in memoria degli store
//!
//! Stesso contratto delle implementazioni MySQL, senza database: usate nei
//! test di integrazione e utilizzabili come backend embedded.

use super::traits::{ConnectionStore, InvitationStore, SettingsStore, StoreError};
use crate::dtos::InvitationQuery;
use crate::entities::connection::{Connection, normalize_pair};
use crate::entities::{ConnectionSettings, Invitation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Default)]
pub struct MemoryConnectionStore {
    rows: Mutex<HashMap<i64, Connection>>,
    next_id: AtomicI64,
}

impl MemoryConnectionStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn create(
        &self,
        group_a: i64,
        group_b: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Connection, StoreError> {
        let (group_1_id, group_2_id) = normalize_pair(group_a, group_b);

        let mut rows = self.rows.lock().expect("connection store poisoned");

        let duplicate = rows
            .values()
            .any(|c| c.group_1_id == group_1_id && c.group_2_id == group_2_id);
        if duplicate {
            return Err(StoreError::Duplicate);
        }

        let connection = Connection {
            connection_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            group_1_id,
            group_2_id,
            date_created: created_at,
        };

        rows.insert(connection.connection_id, connection.clone());
        Ok(connection)
    }

    async fn get(&self, connection_id: i64) -> Result<Option<Connection>, StoreError> {
        let rows = self.rows.lock().expect("connection store poisoned");
        Ok(rows.get(&connection_id).cloned())
    }

    async fn find_by_group(&self, group_id: i64) -> Result<Vec<Connection>, StoreError> {
        let rows = self.rows.lock().expect("connection store poisoned");
        Ok(rows
            .values()
            .filter(|c| c.involves(group_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, connection_id: i64) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().expect("connection store poisoned");
        Ok(rows.remove(&connection_id).is_some())
    }
}

#[derive(Default)]
pub struct MemoryInvitationStore {
    rows: Mutex<HashMap<i64, Invitation>>,
    next_id: AtomicI64,
}

impl MemoryInvitationStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl InvitationStore for MemoryInvitationStore {
    async fn create(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
        inviter_user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Invitation, StoreError> {
        let mut rows = self.rows.lock().expect("invitation store poisoned");

        let duplicate = rows.values().any(|i| {
            i.inviter_group_id == inviter_group_id
                && i.invitee_group_id == invitee_group_id
                && i.is_pending()
        });
        if duplicate {
            return Err(StoreError::Duplicate);
        }

        let invitation = Invitation {
            invitation_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            inviter_group_id,
            invitee_group_id,
            inviter_user_id,
            connection_id: None,
            date_created: created_at,
            date_accepted: None,
            date_rejected: None,
        };

        rows.insert(invitation.invitation_id, invitation.clone());
        Ok(invitation)
    }

    async fn get(&self, invitation_id: i64) -> Result<Option<Invitation>, StoreError> {
        let rows = self.rows.lock().expect("invitation store poisoned");
        Ok(rows.get(&invitation_id).cloned())
    }

    async fn exists_pending(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
    ) -> Result<bool, StoreError> {
        let rows = self.rows.lock().expect("invitation store poisoned");
        Ok(rows.values().any(|i| {
            i.inviter_group_id == inviter_group_id
                && i.invitee_group_id == invitee_group_id
                && i.is_pending()
        }))
    }

    async fn query(&self, filter: &InvitationQuery) -> Result<Vec<Invitation>, StoreError> {
        let rows = self.rows.lock().expect("invitation store poisoned");

        let mut found: Vec<Invitation> = rows
            .values()
            .filter(|i| {
                if let Some(ids) = &filter.invitation_ids {
                    if !ids.contains(&i.invitation_id) {
                        return false;
                    }
                }
                if let Some(inviter) = filter.inviter_group_id {
                    if i.inviter_group_id != inviter {
                        return false;
                    }
                }
                if let Some(invitee) = filter.invitee_group_id {
                    if i.invitee_group_id != invitee {
                        return false;
                    }
                }
                if filter.pending_only && !i.is_pending() {
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        found.sort_by_key(|i| i.invitation_id);
        Ok(found)
    }

    async fn mark_accepted(
        &self,
        invitation_id: i64,
        connection_id: i64,
        when: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().expect("invitation store poisoned");
        if let Some(invitation) = rows.get_mut(&invitation_id) {
            invitation.connection_id = Some(connection_id);
            invitation.date_accepted = Some(when);
        }
        Ok(())
    }

    async fn mark_rejected(
        &self,
        invitation_id: i64,
        when: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().expect("invitation store poisoned");
        if let Some(invitation) = rows.get_mut(&invitation_id) {
            invitation.date_rejected = Some(when);
        }
        Ok(())
    }

    async fn delete(&self, invitation_id: i64) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().expect("invitation store poisoned");
        Ok(rows.remove(&invitation_id).is_some())
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    rows: Mutex<HashMap<(i64, i64), ConnectionSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(
        &self,
        connection_id: i64,
        group_id: i64,
    ) -> Result<Option<ConnectionSettings>, StoreError> {
        let rows = self.rows.lock().expect("settings store poisoned");
        Ok(rows.get(&(connection_id, group_id)).cloned())
    }

    async fn set(&self, settings: &ConnectionSettings) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().expect("settings store poisoned");
        rows.insert(
            (settings.connection_id, settings.group_id),
            settings.clone(),
        );
        Ok(())
    }

    async fn delete_for_connection(&self, connection_id: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().expect("settings store poisoned");
        rows.retain(|(cid, _), _| *cid != connection_id);
        Ok(())
    }
}
