//! Connections library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod filter;
pub mod monitoring;
pub mod platform;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use crate::services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/groups", configure_group_routes(state.clone()))
        .nest("/invitations", configure_invitation_routes(state.clone()))
        .nest("/connections", configure_connection_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes viste dal lato gruppo (connessioni, inviti, filtro)
fn configure_group_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/{group_id}/connections", get(list_connections))
        .route(
            "/{group_id}/invitations",
            get(list_invitations).post(send_invitation),
        )
        .route("/{group_id}/activity-filter", get(compose_filter))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per la risoluzione degli inviti
fn configure_invitation_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/{invitation_id}/{action}", post(respond_to_invitation))
        .route("/{invitation_id}", delete(delete_invitation))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per connessioni esistenti e relative policy
fn configure_connection_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/{connection_id}", delete(disconnect_connection))
        .route(
            "/{connection_id}/settings/{group_id}",
            get(get_settings).put(update_settings),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
