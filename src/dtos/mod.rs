//! DTOs module - Data Transfer Objects per l'API HTTP
//!
//! Gli handler non espongono mai le entity direttamente: ogni risposta passa
//! da un DTO, eventualmente arricchito con i dati della directory gruppi.

pub mod connection;
pub mod invitation;
pub mod query;
pub mod settings;

// Re-exports per facilitare l'import
pub use connection::{ConnectionDTO, GroupRefDTO};
pub use invitation::{CreateInvitationDTO, EnrichedInvitationDTO, InvitationDTO};
pub use query::{ActivityFilterQuery, InvitationListQuery, InvitationQuery};
pub use settings::{SettingsDTO, UpdateSettingsDTO};
