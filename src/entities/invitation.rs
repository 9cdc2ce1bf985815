//! Invitation entity - Proposta direzionale di connessione tra gruppi

use super::enums::InvitationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un invito inviato da un gruppo (tramite un suo admin) a un altro gruppo.
///
/// La direzione conta: un invito pending A→B non blocca un invito B→A.
/// `connection_id` viene valorizzato solo all'accettazione.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Invitation {
    pub invitation_id: i64,
    pub inviter_group_id: i64,
    pub invitee_group_id: i64,
    pub inviter_user_id: i64,
    pub connection_id: Option<i64>,
    pub date_created: DateTime<Utc>,
    pub date_accepted: Option<DateTime<Utc>>,
    pub date_rejected: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Pending = nessuna delle due date di risoluzione è valorizzata.
    pub fn is_pending(&self) -> bool {
        self.date_accepted.is_none() && self.date_rejected.is_none()
    }

    pub fn status(&self) -> InvitationStatus {
        if self.date_accepted.is_some() {
            InvitationStatus::Accepted
        } else if self.date_rejected.is_some() {
            InvitationStatus::Rejected
        } else {
            InvitationStatus::Pending
        }
    }
}
