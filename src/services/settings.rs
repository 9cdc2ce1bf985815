//! Settings services - Policy di condivisione per (connessione, gruppo)

use crate::core::auth::require_connection_admin;
use crate::core::{AppError, AppState, CurrentUser};
use crate::dtos::{SettingsDTO, UpdateSettingsDTO};
use crate::entities::{CategorySelection, ConnectionSettings};
use crate::platform::SiteDirectory;
use crate::repositories::{ConnectionStore, SettingsStore, StoreError};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Settings memorizzate per la coppia, oppure il default (condividi tutto)
/// se nessuna riga esiste. Nessun collasso privacy qui: è la vista "cosa ha
/// configurato il gruppo", non "cosa fluisce davvero".
pub async fn stored_or_default(
    state: &AppState,
    connection_id: i64,
    group_id: i64,
) -> Result<ConnectionSettings, StoreError> {
    let stored = state.settings.get(connection_id, group_id).await?;
    Ok(stored.unwrap_or_else(|| ConnectionSettings::default_for(connection_id, group_id)))
}

/// Settings effettive in lettura: se il sito del gruppo non è pubblico (o
/// la visibilità non è verificabile) la selezione collassa a `None`. La riga
/// memorizzata non viene toccata: il collasso è solo della vista.
pub async fn effective_settings(
    state: &AppState,
    connection_id: i64,
    group_id: i64,
) -> Result<ConnectionSettings, StoreError> {
    let mut settings = stored_or_default(state, connection_id, group_id).await?;

    let public = match state.sites.group_has_public_site(group_id).await {
        Ok(public) => public,
        Err(e) => {
            warn!("Site privacy lookup failed for group {}: {}", group_id, e);
            false
        }
    };

    if !public {
        settings.categories = CategorySelection::None;
    }

    Ok(settings)
}

#[debug_handler]
#[instrument(skip(state, current_user), fields(connection_id = %connection_id, group_id = %group_id, user_id = %current_user.user_id))]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Path((connection_id, group_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<SettingsDTO>, AppError> {
    debug!("Reading sharing settings");
    // 1. Verificare che la connessione esista e coinvolga il gruppo
    // 2. Ritornare la vista effettiva (collasso privacy applicato)

    let connection = state
        .connections
        .get(connection_id)
        .await?
        .ok_or_else(|| {
            warn!("Connection not found: {}", connection_id);
            AppError::not_found("Connection not found")
        })?;

    if !connection.involves(group_id) {
        warn!(
            "Group {} is not part of connection {}",
            group_id, connection_id
        );
        return Err(AppError::not_found("Group is not part of this connection"));
    }

    let settings = effective_settings(&state, connection_id, group_id).await?;

    Ok(Json(settings.into()))
}

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(connection_id = %connection_id, group_id = %group_id, user_id = %current_user.user_id))]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path((connection_id, group_id)): Path<(i64, i64)>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<UpdateSettingsDTO>,
) -> Result<Json<SettingsDTO>, AppError> {
    debug!("Updating sharing settings");
    // 1. Verificare che la connessione esista e coinvolga il gruppo
    // 2. Autorizzare: solo gli admin del gruppo cambiano la sua policy
    // 3. Persistere la policy così com'è (il collasso privacy è in lettura)

    let connection = state
        .connections
        .get(connection_id)
        .await?
        .ok_or_else(|| {
            warn!("Connection not found: {}", connection_id);
            AppError::not_found("Connection not found")
        })?;

    if !connection.involves(group_id) {
        warn!(
            "Group {} is not part of connection {}",
            group_id, connection_id
        );
        return Err(AppError::not_found("Group is not part of this connection"));
    }

    require_connection_admin(&state, current_user.user_id, group_id).await?;

    let settings = ConnectionSettings {
        connection_id,
        group_id,
        categories: body.categories,
        exclude_comments: body.exclude_comments,
    };

    state.settings.set(&settings).await?;

    info!(
        "Settings updated for connection {} group {}",
        connection_id, group_id
    );
    Ok(Json(settings.into()))
}
