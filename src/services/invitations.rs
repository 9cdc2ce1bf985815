//! Invitation services - Invio, elenco e risoluzione degli inviti

use crate::core::auth::require_connection_admin;
use crate::core::{AppError, AppState, CurrentUser};
use crate::dtos::{
    CreateInvitationDTO, EnrichedInvitationDTO, InvitationDTO, InvitationListQuery,
    InvitationQuery,
};
use crate::repositories::InvitationStore;
use crate::services::lifecycle;
use crate::services::resolve_group_ref;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[debug_handler]
#[instrument(skip(state, current_user, body), fields(group_id = %group_id, user_id = %current_user.user_id))]
pub async fn send_invitation(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateInvitationDTO>,
) -> Result<Json<InvitationDTO>, AppError> {
    debug!("Sending connection invitation");
    // 1. Validare il body e autorizzare l'utente sul gruppo inviter
    // 2. Delegare al lifecycle engine (univocità pending, notifiche)
    // 3. Ritornare l'invito creato come risposta JSON

    body.validate()?;

    require_connection_admin(&state, current_user.user_id, group_id).await?;

    let invitation = lifecycle::send_invitation(
        &state,
        group_id,
        body.invitee_group_id,
        current_user.user_id,
    )
    .await?;

    info!("Invitation {} created", invitation.invitation_id);
    Ok(Json(invitation.into()))
}

#[debug_handler]
#[instrument(skip(state, current_user, params), fields(group_id = %group_id, user_id = %current_user.user_id))]
pub async fn list_invitations(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
    Query(params): Query<InvitationListQuery>,
) -> Result<Json<Vec<EnrichedInvitationDTO>>, AppError> {
    debug!("Listing invitations for group");
    // 1. Autorizzare: gli inviti sono dati di gestione del gruppo
    // 2. Tradurre direction/pending nel filtro dello store
    // 3. Arricchire ogni invito con i riferimenti ai gruppi coinvolti

    require_connection_admin(&state, current_user.user_id, group_id).await?;

    let mut filter = InvitationQuery {
        pending_only: params.pending.unwrap_or(true),
        ..InvitationQuery::default()
    };

    match params.direction.as_deref() {
        Some("sent") => filter.inviter_group_id = Some(group_id),
        Some("received") | None => filter.invitee_group_id = Some(group_id),
        Some(other) => {
            warn!("Invalid direction parameter: {}", other);
            return Err(AppError::bad_request("direction must be `sent` or `received`"));
        }
    }

    let invitations = state.invitations.query(&filter).await?;

    info!("Found {} invitations", invitations.len());

    let mut enriched = Vec::with_capacity(invitations.len());
    for invitation in invitations {
        let inviter_group = resolve_group_ref(&state, invitation.inviter_group_id).await;
        let invitee_group = resolve_group_ref(&state, invitation.invitee_group_id).await;

        enriched.push(EnrichedInvitationDTO {
            invitation_id: invitation.invitation_id,
            status: invitation.status(),
            date_created: invitation.date_created,
            inviter_group,
            invitee_group,
        });
    }

    Ok(Json(enriched))
}

#[debug_handler]
#[instrument(skip(state, current_user), fields(invitation_id = %invitation_id, action = %action, user_id = %current_user.user_id))]
pub async fn respond_to_invitation(
    State(state): State<Arc<AppState>>,
    Path((invitation_id, action)): Path<(i64, String)>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<InvitationDTO>, AppError> {
    debug!("Responding to invitation");
    // 1. Recuperare l'invito per conoscere il gruppo invitato
    // 2. Autorizzare: solo gli admin del gruppo invitato rispondono
    // 3. Delegare accept/reject al lifecycle engine

    let invitation = state
        .invitations
        .get(invitation_id)
        .await?
        .ok_or_else(|| {
            warn!("Invitation not found: {}", invitation_id);
            AppError::not_found("Invitation not found")
        })?;

    require_connection_admin(&state, current_user.user_id, invitation.invitee_group_id).await?;

    let resolved = match action.as_str() {
        "accept" => lifecycle::accept_invitation(&state, invitation_id).await?,
        "reject" => lifecycle::reject_invitation(&state, invitation_id).await?,
        other => {
            warn!("Invalid invitation action: {}", other);
            return Err(AppError::bad_request("action must be `accept` or `reject`"));
        }
    };

    info!("Invitation {} {}ed", invitation_id, action);
    Ok(Json(resolved.into()))
}

#[debug_handler]
#[instrument(skip(state, current_user), fields(invitation_id = %invitation_id, user_id = %current_user.user_id))]
pub async fn delete_invitation(
    State(state): State<Arc<AppState>>,
    Path(invitation_id): Path<i64>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<(), AppError> {
    debug!("Deleting invitation");
    // 1. Recuperare l'invito per conoscere il gruppo inviter
    // 2. Autorizzare: solo chi gestisce il gruppo inviter può ritirarlo
    // 3. Delegare al lifecycle engine (solo pending)

    let invitation = state
        .invitations
        .get(invitation_id)
        .await?
        .ok_or_else(|| {
            warn!("Invitation not found: {}", invitation_id);
            AppError::not_found("Invitation not found")
        })?;

    require_connection_admin(&state, current_user.user_id, invitation.inviter_group_id).await?;

    lifecycle::delete_invitation(&state, invitation_id).await?;

    info!("Invitation {} deleted by user {}", invitation_id, current_user.user_id);
    Ok(())
}
