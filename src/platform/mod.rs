//! Platform ports - Interfacce verso i sottosistemi della piattaforma
//!
//! Il dominio connessioni non possiede gruppi, siti, tassonomie o consegna
//! delle notifiche: li raggiunge attraverso queste porte. Le implementazioni
//! di produzione sono in `mysql` e `notify`, i fake per i test in `memory`.

pub mod memory;
pub mod mysql;
pub mod notify;

use crate::entities::Invitation;
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

/// Livello di visibilità minimo perché il sito di un gruppo sia pubblico.
/// Sotto questa soglia il contenuto del gruppo non viene mai condiviso.
pub const PUBLIC_VISIBILITY_FLOOR: i64 = -1;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

/// Directory dei gruppi della piattaforma.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn group_name(&self, group_id: i64) -> Result<String, PlatformError>;

    async fn group_slug(&self, group_id: i64) -> Result<String, PlatformError>;

    async fn group_admins(&self, group_id: i64) -> Result<Vec<i64>, PlatformError>;

    async fn is_group_admin(&self, user_id: i64, group_id: i64) -> Result<bool, PlatformError>;

    async fn is_platform_moderator(&self, user_id: i64) -> Result<bool, PlatformError>;

    /// Feature gate per gruppo: alcuni tipi di gruppo hanno le connessioni
    /// disabilitate.
    async fn connections_enabled(&self, group_id: i64) -> Result<bool, PlatformError>;
}

/// Lookup del sito associato a un gruppo e della sua visibilità.
#[async_trait]
pub trait SiteDirectory: Send + Sync {
    async fn site_id_for_group(&self, group_id: i64) -> Result<Option<i64>, PlatformError>;

    /// Livello di visibilità con segno; privato sotto
    /// [`PUBLIC_VISIBILITY_FLOOR`].
    async fn site_visibility(&self, site_id: i64) -> Result<i64, PlatformError>;

    /// Un gruppo senza sito associato conta come pubblico: non ha contenuto
    /// da nascondere.
    async fn group_has_public_site(&self, group_id: i64) -> Result<bool, PlatformError> {
        let Some(site_id) = self.site_id_for_group(group_id).await? else {
            return Ok(true);
        };
        Ok(self.site_visibility(site_id).await? >= PUBLIC_VISIBILITY_FLOOR)
    }
}

/// Query di tassonomia sul sito di un gruppo.
#[async_trait]
pub trait TaxonomyReader: Send + Sync {
    /// Post del sito appartenenti ad almeno uno dei term indicati.
    async fn post_ids_in_categories(
        &self,
        site_id: i64,
        terms: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, PlatformError>;

    /// Commenti del sito attaccati ai post indicati.
    async fn comment_ids_for_posts(
        &self,
        site_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, PlatformError>;
}

/// Consegna delle notifiche di invito. I fallimenti vengono loggati dal
/// chiamante e non fanno mai fallire la transizione di stato.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifica gli admin del gruppo invitato; restituisce gli utenti
    /// raggiunti.
    async fn invitation_sent(&self, invitation: &Invitation) -> Result<Vec<i64>, PlatformError>;

    /// Notifica l'utente che aveva inviato l'invito.
    async fn invitation_accepted(&self, invitation: &Invitation) -> Result<(), PlatformError>;
}
