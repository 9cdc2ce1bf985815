//! Invitation DTOs - Data Transfer Objects per gli inviti

use crate::dtos::GroupRefDTO;
use crate::entities::{Invitation, InvitationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct InvitationDTO {
    pub invitation_id: i64,
    pub inviter_group_id: i64,
    pub invitee_group_id: i64,
    pub inviter_user_id: i64,
    pub connection_id: Option<i64>,
    pub status: InvitationStatus,
    pub date_created: DateTime<Utc>,
    pub date_accepted: Option<DateTime<Utc>>,
    pub date_rejected: Option<DateTime<Utc>>,
}

impl From<Invitation> for InvitationDTO {
    fn from(value: Invitation) -> Self {
        Self {
            invitation_id: value.invitation_id,
            inviter_group_id: value.inviter_group_id,
            invitee_group_id: value.invitee_group_id,
            inviter_user_id: value.inviter_user_id,
            connection_id: value.connection_id,
            status: value.status(),
            date_created: value.date_created,
            date_accepted: value.date_accepted,
            date_rejected: value.date_rejected,
        }
    }
}

/// DTO per l'invio di un invito da parte del gruppo corrente.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateInvitationDTO {
    #[validate(range(min = 1, message = "invitee_group_id must be a valid group id"))]
    pub invitee_group_id: i64,
}

/// DTO arricchito con i riferimenti ai gruppi coinvolti; i lookup falliti
/// lasciano il riferimento a None invece di far fallire la lista.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EnrichedInvitationDTO {
    pub invitation_id: i64,
    pub status: InvitationStatus,
    pub date_created: DateTime<Utc>,
    pub inviter_group: Option<GroupRefDTO>,
    pub invitee_group: Option<GroupRefDTO>,
}
