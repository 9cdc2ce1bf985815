//! Repositories module - Persistenza di connessioni, inviti e settings
//!
//! Ogni store è un trait asincrono con due implementazioni: quella MySQL
//! usata in produzione e quella in-memory usata nei test. Le query usano
//! l'API runtime di sqlx, così la build non richiede un database attivo.

pub mod cache;
pub mod connection;
pub mod invitation;
pub mod memory;
pub mod settings;
pub mod traits;

// Re-exports per facilitare l'import
pub use cache::{DashCache, NoopCache, RowCache};
pub use connection::MySqlConnectionStore;
pub use invitation::MySqlInvitationStore;
pub use memory::{MemoryConnectionStore, MemoryInvitationStore, MemorySettingsStore};
pub use settings::MySqlSettingsStore;
pub use traits::{ConnectionStore, InvitationStore, SettingsStore, StoreError};
