//! Lifecycle engine - Transizioni di stato di inviti e connessioni
//!
//! Ogni transizione che fallisce una precondizione è una no-op che ritorna
//! un errore tipizzato; le condizioni duplicate/già-risolte sono terminali
//! per l'utente, mai da ritentare. I fallimenti di notifica vengono loggati
//! e non annullano mai la transizione già persistita.

use crate::core::{AppError, AppState};
use crate::entities::Invitation;
use crate::platform::{GroupDirectory, Notifier};
use crate::repositories::{ConnectionStore, InvitationStore, SettingsStore, StoreError};
use chrono::Utc;
use tracing::{debug, info, warn};

/// Invia un invito di connessione `inviter_group_id` → `invitee_group_id`.
///
/// L'univocità pending è per coppia ordinata: un invito pending nell'altra
/// direzione non blocca questo.
pub async fn send_invitation(
    state: &AppState,
    inviter_group_id: i64,
    invitee_group_id: i64,
    inviter_user_id: i64,
) -> Result<Invitation, AppError> {
    if inviter_group_id == invitee_group_id {
        return Err(AppError::bad_request("A group cannot connect to itself"));
    }

    for group_id in [inviter_group_id, invitee_group_id] {
        let enabled = state
            .directory
            .connections_enabled(group_id)
            .await
            .map_err(AppError::from)?;
        if !enabled {
            return Err(AppError::forbidden("Connections are disabled for this group"));
        }
    }

    let invitation = state
        .invitations
        .create(inviter_group_id, invitee_group_id, inviter_user_id, Utc::now())
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::duplicate_invitation(),
            other => other.into(),
        })?;

    info!(
        "Invitation {} sent ({} -> {})",
        invitation.invitation_id, inviter_group_id, invitee_group_id
    );

    // La consegna è best-effort: l'invito esiste anche se la notifica fallisce.
    match state.notifier.invitation_sent(&invitation).await {
        Ok(recipients) => debug!("Invitation notification sent to {} admins", recipients.len()),
        Err(e) => warn!("Invitation notification failed: {}", e),
    }

    Ok(invitation)
}

/// Accetta un invito pending: crea la connessione e registra la risoluzione.
///
/// L'univocità della coppia è garantita dallo store: se una connessione per
/// la stessa coppia esiste già (gara o invito inverso accettato prima), la
/// create fallisce e l'invito resta pending.
pub async fn accept_invitation(
    state: &AppState,
    invitation_id: i64,
) -> Result<Invitation, AppError> {
    let invitation = state
        .invitations
        .get(invitation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;

    if !invitation.is_pending() {
        return Err(AppError::already_resolved());
    }

    let now = Utc::now();

    let connection = state
        .connections
        .create(invitation.invitee_group_id, invitation.inviter_group_id, now)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => AppError::connection_exists(),
            other => other.into(),
        })?;

    state
        .invitations
        .mark_accepted(invitation_id, connection.connection_id, now)
        .await?;

    info!(
        "Invitation {} accepted, connection {} created",
        invitation_id, connection.connection_id
    );

    let accepted = Invitation {
        connection_id: Some(connection.connection_id),
        date_accepted: Some(now),
        ..invitation
    };

    if let Err(e) = state.notifier.invitation_accepted(&accepted).await {
        warn!("Acceptance notification failed: {}", e);
    }

    Ok(accepted)
}

/// Rifiuta un invito pending. Nessuna connessione viene creata.
pub async fn reject_invitation(
    state: &AppState,
    invitation_id: i64,
) -> Result<Invitation, AppError> {
    let invitation = state
        .invitations
        .get(invitation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;

    if !invitation.is_pending() {
        return Err(AppError::already_resolved());
    }

    let now = Utc::now();
    state.invitations.mark_rejected(invitation_id, now).await?;

    info!("Invitation {} rejected", invitation_id);

    Ok(Invitation {
        date_rejected: Some(now),
        ..invitation
    })
}

/// Cancella un invito. Consentito solo finché è pending: gli inviti risolti
/// sono storia immutabile.
pub async fn delete_invitation(state: &AppState, invitation_id: i64) -> Result<(), AppError> {
    let invitation = state
        .invitations
        .get(invitation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation not found"))?;

    if !invitation.is_pending() {
        return Err(AppError::already_resolved());
    }

    let deleted = state.invitations.delete(invitation_id).await?;
    if !deleted {
        return Err(AppError::not_found("Invitation not found"));
    }

    info!("Invitation {} deleted", invitation_id);
    Ok(())
}

/// Scioglie una connessione. Unilaterale e idempotente: `false` se la
/// connessione non esiste più. L'invito che l'aveva originata non viene
/// toccato né riattivato.
pub async fn disconnect(state: &AppState, connection_id: i64) -> Result<bool, AppError> {
    let deleted = state.connections.delete(connection_id).await?;

    if deleted {
        // Le policy orfane non devono sopravvivere alla connessione.
        state.settings.delete_for_connection(connection_id).await?;
        info!("Connection {} disconnected", connection_id);
    } else {
        debug!("Disconnect on missing connection {}", connection_id);
    }

    Ok(deleted)
}
