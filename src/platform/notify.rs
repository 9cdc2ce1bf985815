//! LogNotifier - Consegna notifiche delegata al canale di logging
//!
//! La consegna vera (email) appartiene alla piattaforma; questo adapter
//! risolve destinatari e token del template e passa il messaggio al canale
//! strutturato, da cui il collettore della piattaforma lo raccoglie.

use super::{GroupDirectory, Notifier, PlatformError};
use crate::entities::Invitation;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const INVITATION_SUBJECT: &str =
    "Your group {invitee-group-name} has received a connection invitation from {inviter-group-name}";

const ACCEPTED_SUBJECT: &str =
    "Your connection invitation for {invitee-group-name} has been accepted";

pub struct LogNotifier {
    directory: Arc<dyn GroupDirectory>,
}

impl LogNotifier {
    pub fn new(directory: Arc<dyn GroupDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn invitation_sent(&self, invitation: &Invitation) -> Result<Vec<i64>, PlatformError> {
        let admins = self
            .directory
            .group_admins(invitation.invitee_group_id)
            .await?;

        let invitee_name = self
            .directory
            .group_name(invitation.invitee_group_id)
            .await?;
        let inviter_name = self
            .directory
            .group_name(invitation.inviter_group_id)
            .await?;

        let subject = INVITATION_SUBJECT
            .replace("{invitee-group-name}", &invitee_name)
            .replace("{inviter-group-name}", &inviter_name);

        for admin_id in &admins {
            info!(
                recipient = admin_id,
                invitation_id = invitation.invitation_id,
                subject = %subject,
                "dispatching connection-invitation notification"
            );
        }

        Ok(admins)
    }

    async fn invitation_accepted(&self, invitation: &Invitation) -> Result<(), PlatformError> {
        let invitee_name = self
            .directory
            .group_name(invitation.invitee_group_id)
            .await?;

        let subject = ACCEPTED_SUBJECT.replace("{invitee-group-name}", &invitee_name);

        info!(
            recipient = invitation.inviter_user_id,
            invitation_id = invitation.invitation_id,
            subject = %subject,
            "dispatching invitation-accepted notification"
        );

        Ok(())
    }
}
