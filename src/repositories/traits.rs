//! Store traits - Interfacce di persistenza del dominio connessioni

use crate::dtos::InvitationQuery;
use crate::entities::{Connection, ConnectionSettings, Invitation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errori del layer di persistenza.
///
/// `Duplicate` copre le violazioni di univocità (coppia di connessione,
/// invito pending per coppia ordinata); il ciclo di vita le rimappa nelle
/// condizioni user-facing.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("stored payload could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Mappa gli errori di scrittura distinguendo le violazioni di indice
    /// univoco dagli altri errori del database.
    pub fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Database(err),
        }
    }
}

/// Persistenza delle coppie di connessione.
///
/// L'ordinamento per nome del gruppo controparte non avviene qui: lo store
/// non conosce la directory dei gruppi, ci pensa il service layer.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Crea una connessione per la coppia non ordinata.
    ///
    /// Fallisce con `StoreError::Duplicate` se esiste già una connessione
    /// attiva per la stessa coppia.
    async fn create(
        &self,
        group_a: i64,
        group_b: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Connection, StoreError>;

    async fn get(&self, connection_id: i64) -> Result<Option<Connection>, StoreError>;

    /// Lookup simmetrico: connessioni in cui il gruppo compare da una parte
    /// o dall'altra. Nessun ordinamento garantito.
    async fn find_by_group(&self, group_id: i64) -> Result<Vec<Connection>, StoreError>;

    /// Idempotente: `false` se la connessione non esiste.
    async fn delete(&self, connection_id: i64) -> Result<bool, StoreError>;
}

/// Persistenza degli inviti.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Crea un invito pending.
    ///
    /// Fallisce con `StoreError::Duplicate` se esiste già un invito pending
    /// per la stessa coppia ordinata (la direzione conta).
    async fn create(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
        inviter_user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Invitation, StoreError>;

    async fn get(&self, invitation_id: i64) -> Result<Option<Invitation>, StoreError>;

    async fn exists_pending(
        &self,
        inviter_group_id: i64,
        invitee_group_id: i64,
    ) -> Result<bool, StoreError>;

    async fn query(&self, filter: &InvitationQuery) -> Result<Vec<Invitation>, StoreError>;

    /// Registra l'accettazione: connection_id + date_accepted.
    async fn mark_accepted(
        &self,
        invitation_id: i64,
        connection_id: i64,
        when: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn mark_rejected(&self, invitation_id: i64, when: DateTime<Utc>)
        -> Result<(), StoreError>;

    async fn delete(&self, invitation_id: i64) -> Result<bool, StoreError>;
}

/// Persistenza delle policy di condivisione, chiave (connection_id, group_id).
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Restituisce la riga memorizzata, se esiste. Il default e il collasso
    /// privacy sono responsabilità del service layer, mai dello storage.
    async fn get(
        &self,
        connection_id: i64,
        group_id: i64,
    ) -> Result<Option<ConnectionSettings>, StoreError>;

    /// Upsert della policy.
    async fn set(&self, settings: &ConnectionSettings) -> Result<(), StoreError>;

    /// Rimuove le policy di entrambi i gruppi quando la connessione cade.
    async fn delete_for_connection(&self, connection_id: i64) -> Result<(), StoreError>;
}
