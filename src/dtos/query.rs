//! Query DTOs - Data Transfer Objects per filtri e query parameters

use crate::filter::ActivityScope;
use serde::{Deserialize, Serialize};

/// Filtro dello store inviti; i campi assenti non filtrano.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct InvitationQuery {
    pub invitation_ids: Option<Vec<i64>>,
    pub inviter_group_id: Option<i64>,
    pub invitee_group_id: Option<i64>,
    #[serde(default)]
    pub pending_only: bool,
}

/// Query parameters di `GET /groups/{group_id}/invitations`.
#[derive(Serialize, Deserialize, Debug)]
pub struct InvitationListQuery {
    /// `sent` (inviti inviati dal gruppo) o `received` (ricevuti).
    /// Default: received.
    #[serde(default)]
    pub direction: Option<String>,
    /// Solo inviti pending. Default: true.
    #[serde(default)]
    pub pending: Option<bool>,
}

/// Query parameters di `GET /groups/{group_id}/activity-filter`.
#[derive(Serialize, Deserialize, Debug)]
pub struct ActivityFilterQuery {
    pub scope: ActivityScope,
    /// Tipi di attività richiesti dal chiamante, separati da virgola
    /// (es. `new_blog_post,new_blog_comment`). Assente = tutti.
    #[serde(default)]
    pub types: Option<String>,
}
