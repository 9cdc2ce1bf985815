//! Application State - Stato globale dell'applicazione
//!
//! Contiene gli store del dominio connessioni e le porte verso la
//! piattaforma, tutti dietro trait object così che i test possano iniettare
//! le implementazioni in memoria.

use crate::platform::mysql::{MySqlGroupDirectory, MySqlSiteDirectory, MySqlTaxonomyReader};
use crate::platform::notify::LogNotifier;
use crate::platform::{GroupDirectory, Notifier, SiteDirectory, TaxonomyReader};
use crate::repositories::{
    ConnectionStore, DashCache, InvitationStore, MySqlConnectionStore, MySqlInvitationStore,
    MySqlSettingsStore, NoopCache, SettingsStore,
};
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale condiviso tra tutte le route e middleware.
pub struct AppState {
    /// Store delle connessioni attive tra gruppi
    pub connections: Arc<dyn ConnectionStore>,

    /// Store degli inviti di connessione
    pub invitations: Arc<dyn InvitationStore>,

    /// Store delle policy di condivisione per (connessione, gruppo)
    pub settings: Arc<dyn SettingsStore>,

    /// Directory dei gruppi della piattaforma
    pub directory: Arc<dyn GroupDirectory>,

    /// Lookup sito/visibilità per gruppo
    pub sites: Arc<dyn SiteDirectory>,

    /// Query di tassonomia sui siti dei gruppi
    pub taxonomy: Arc<dyn TaxonomyReader>,

    /// Consegna delle notifiche di invito
    pub notifier: Arc<dyn Notifier>,

    /// Secret key per JWT token
    pub jwt_secret: String,
}

impl AppState {
    /// Costruttore esplicito: ogni dipendenza viene iniettata. Usato dai
    /// test con store in memoria e fake della piattaforma.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connections: Arc<dyn ConnectionStore>,
        invitations: Arc<dyn InvitationStore>,
        settings: Arc<dyn SettingsStore>,
        directory: Arc<dyn GroupDirectory>,
        sites: Arc<dyn SiteDirectory>,
        taxonomy: Arc<dyn TaxonomyReader>,
        notifier: Arc<dyn Notifier>,
        jwt_secret: String,
    ) -> Self {
        Self {
            connections,
            invitations,
            settings,
            directory,
            sites,
            taxonomy,
            notifier,
            jwt_secret,
        }
    }

    /// Cablaggio di produzione: store MySQL con cache per-riga e adapter
    /// MySQL delle porte piattaforma, tutti sullo stesso pool.
    pub fn mysql(pool: MySqlPool, jwt_secret: String) -> Self {
        let directory: Arc<dyn GroupDirectory> = Arc::new(MySqlGroupDirectory::new(pool.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new(directory.clone()));

        Self {
            connections: Arc::new(MySqlConnectionStore::new(
                pool.clone(),
                Arc::new(DashCache::new()),
            )),
            // Un invito viene riletto quasi solo per essere subito risolto
            // o ritirato, quindi questo store gira senza cache.
            invitations: Arc::new(MySqlInvitationStore::new(
                pool.clone(),
                Arc::new(NoopCache),
            )),
            settings: Arc::new(MySqlSettingsStore::new(pool.clone())),
            sites: Arc::new(MySqlSiteDirectory::new(pool.clone())),
            taxonomy: Arc::new(MySqlTaxonomyReader::new(pool)),
            directory,
            notifier,
            jwt_secret,
        }
    }
}
