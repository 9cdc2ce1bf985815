//! Connection services - Elenco e scioglimento delle connessioni

use crate::core::auth::require_connection_admin;
use crate::core::{AppError, AppState, CurrentUser};
use crate::dtos::{ConnectionDTO, GroupRefDTO};
use crate::repositories::ConnectionStore;
use crate::services::lifecycle;
use crate::services::resolve_group_ref;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use axum_macros::debug_handler;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[debug_handler]
#[instrument(skip(state, current_user), fields(group_id = %group_id, user_id = %current_user.user_id))]
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<Vec<ConnectionDTO>>, AppError> {
    debug!("Listing connections for group");
    // 1. Lookup simmetrico delle connessioni del gruppo (singola query)
    // 2. Risolvere in parallelo nome/slug della controparte di ciascuna
    // 3. Ordinare per nome controparte (case-sensitive), pareggi per id
    // 4. Ritornare la lista di ConnectionDTO come risposta JSON

    let connections = state.connections.find_by_group(group_id).await?;

    debug!("Found {} connections", connections.len());

    let refs = join_all(connections.iter().map(|connection| {
        let state = state.clone();
        async move {
            match connection.counterpart_of(group_id) {
                Some(counterpart_id) => resolve_group_ref(&state, counterpart_id)
                    .await
                    .unwrap_or(GroupRefDTO {
                        group_id: counterpart_id,
                        name: String::new(),
                        slug: String::new(),
                    }),
                // Riga corrotta: il gruppo non fa parte della coppia.
                None => GroupRefDTO {
                    group_id: 0,
                    name: String::new(),
                    slug: String::new(),
                },
            }
        }
    }))
    .await;

    let mut result: Vec<ConnectionDTO> = connections
        .into_iter()
        .zip(refs)
        .map(|(connection, connected_group)| ConnectionDTO {
            connection_id: connection.connection_id,
            group_id,
            connected_group,
            date_created: connection.date_created,
        })
        .collect();

    // Confronto lessicale case-sensitive sul nome della controparte.
    result.sort_by(|a, b| {
        a.connected_group
            .name
            .cmp(&b.connected_group.name)
            .then(a.connection_id.cmp(&b.connection_id))
    });

    info!("Successfully retrieved {} connections", result.len());
    Ok(Json(result))
}

#[debug_handler]
#[instrument(skip(state, current_user), fields(connection_id = %connection_id, user_id = %current_user.user_id))]
pub async fn disconnect_connection(
    State(state): State<Arc<AppState>>,
    Path(connection_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<(), AppError> {
    debug!("Disconnect requested");
    // 1. Verificare che la connessione esista
    // 2. Autorizzare: admin di uno dei due gruppi (o moderatore)
    // 3. Cancellare connessione e relative policy (scioglimento unilaterale)

    let connection = state
        .connections
        .get(connection_id)
        .await?
        .ok_or_else(|| {
            warn!("Connection not found: {}", connection_id);
            AppError::not_found("Connection not found")
        })?;

    let [group_1_id, group_2_id] = connection.group_ids();
    let authorized_on_first =
        require_connection_admin(&state, current_user.user_id, group_1_id).await;
    if authorized_on_first.is_err() {
        require_connection_admin(&state, current_user.user_id, group_2_id)
            .await
            .map_err(|_| {
                AppError::forbidden("You must be an admin of one of the connected groups")
            })?;
    }

    let deleted = lifecycle::disconnect(&state, connection_id).await?;
    if !deleted {
        // Già sciolta da una richiesta concorrente.
        return Err(AppError::not_found("Connection not found"));
    }

    info!("Connection {} disconnected by user {}", connection_id, current_user.user_id);
    Ok(())
}
