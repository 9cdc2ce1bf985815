//! Helper condivisi dai test di integrazione
//!
//! I test girano su store in memoria e fake della piattaforma: stesso
//! router e stessi middleware della produzione, nessun database richiesto.

use axum_test::TestServer;
use connections::core::AppState;
use connections::platform::memory::{FakeDirectory, FakeSites, FakeTaxonomy, RecordingNotifier};
use connections::repositories::{
    MemoryConnectionStore, MemoryInvitationStore, MemorySettingsStore,
};
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "unsegretodatestchenonvamaiusatoinproduzione";

/// Ambiente di test: lo stato dell'applicazione più gli handle ai fake,
/// così i test possono pilotare la piattaforma e ispezionare le notifiche.
pub struct TestEnv {
    pub state: Arc<AppState>,
    pub directory: Arc<FakeDirectory>,
    pub sites: Arc<FakeSites>,
    pub taxonomy: Arc<FakeTaxonomy>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestEnv {
    pub fn new() -> Self {
        let directory = Arc::new(FakeDirectory::new());
        let sites = Arc::new(FakeSites::new());
        let taxonomy = Arc::new(FakeTaxonomy::new());
        let notifier = Arc::new(RecordingNotifier::new(directory.clone()));

        let state = Arc::new(AppState::new(
            Arc::new(MemoryConnectionStore::new()),
            Arc::new(MemoryInvitationStore::new()),
            Arc::new(MemorySettingsStore::new()),
            directory.clone(),
            sites.clone(),
            taxonomy.clone(),
            notifier.clone(),
            TEST_JWT_SECRET.to_string(),
        ));

        Self {
            state,
            directory,
            sites,
            taxonomy,
            notifier,
        }
    }

    pub fn server(&self) -> TestServer {
        let app = connections::create_router(self.state.clone());
        TestServer::new(app).expect("Failed to create test server")
    }
}

/// Genera un JWT token per testing con lo stesso encoder del servizio.
pub fn create_test_jwt(user_id: i64, username: &str, jwt_secret: &str) -> String {
    connections::auth::encode_jwt(username.to_string(), user_id, jwt_secret)
        .ok()
        .expect("Failed to create JWT token")
}

/// Header `Authorization: Bearer <token>` per l'utente indicato.
pub fn bearer(user_id: i64, username: &str) -> String {
    format!(
        "Bearer {}",
        create_test_jwt(user_id, username, TEST_JWT_SECRET)
    )
}
