//! Services module - Handler HTTP e logica applicativa
//!
//! Gli handler sono raggruppati per funzionalità; le transizioni di stato
//! vivono in `lifecycle`, separate dal trasporto, così i test possono
//! esercitarle anche senza passare dal router.

pub mod activity;
pub mod connections;
pub mod invitations;
pub mod lifecycle;
pub mod settings;

// Re-exports per facilitare l'import
pub use activity::compose_filter;
pub use connections::{disconnect_connection, list_connections};
pub use invitations::{
    delete_invitation, list_invitations, respond_to_invitation, send_invitation,
};
pub use settings::{get_settings, update_settings};

use crate::AppState;
use crate::dtos::GroupRefDTO;
use crate::platform::GroupDirectory;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;
use tracing::warn;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Connections service is running!")
}

/// Risolve nome e slug di un gruppo dalla directory; un lookup fallito
/// produce `None` invece di far fallire la risposta che lo contiene.
pub(crate) async fn resolve_group_ref(state: &AppState, group_id: i64) -> Option<GroupRefDTO> {
    let name = match state.directory.group_name(group_id).await {
        Ok(name) => name,
        Err(e) => {
            warn!("Group name lookup failed for {}: {}", group_id, e);
            return None;
        }
    };

    let slug = match state.directory.group_slug(group_id).await {
        Ok(slug) => slug,
        Err(e) => {
            warn!("Group slug lookup failed for {}: {}", group_id, e);
            return None;
        }
    };

    Some(GroupRefDTO {
        group_id,
        name,
        slug,
    })
}
