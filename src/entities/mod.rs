//! Entities module - Entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella del database delle connessioni.

pub mod connection;
pub mod enums;
pub mod invitation;
pub mod settings;

// Re-exports per facilitare l'import
pub use connection::Connection;
pub use enums::InvitationStatus;
pub use invitation::Invitation;
pub use settings::{CategorySelection, ConnectionSettings};
