//! Fake in-memory delle porte piattaforma
//!
//! Controparti dei fake usati nei test: stato interno mutabile dietro Mutex
//! e failure injection per esercitare i percorsi fail-closed.

use super::{GroupDirectory, Notifier, PlatformError, SiteDirectory, TaxonomyReader};
use crate::entities::Invitation;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct FakeGroup {
    name: String,
    slug: String,
    admins: Vec<i64>,
    connections_enabled: bool,
}

#[derive(Default)]
pub struct FakeDirectory {
    groups: Mutex<HashMap<i64, FakeGroup>>,
    moderators: Mutex<HashSet<i64>>,
    failing: Mutex<HashSet<i64>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&self, group_id: i64, name: &str, admins: &[i64]) {
        let slug = name.to_lowercase().replace(' ', "-");
        self.groups.lock().unwrap().insert(
            group_id,
            FakeGroup {
                name: name.to_string(),
                slug,
                admins: admins.to_vec(),
                connections_enabled: true,
            },
        );
    }

    pub fn disable_connections(&self, group_id: i64) {
        if let Some(group) = self.groups.lock().unwrap().get_mut(&group_id) {
            group.connections_enabled = false;
        }
    }

    pub fn add_moderator(&self, user_id: i64) {
        self.moderators.lock().unwrap().insert(user_id);
    }

    /// Fa fallire ogni lookup su questo gruppo.
    pub fn fail_group(&self, group_id: i64) {
        self.failing.lock().unwrap().insert(group_id);
    }

    fn group(&self, group_id: i64) -> Result<FakeGroup, PlatformError> {
        if self.failing.lock().unwrap().contains(&group_id) {
            return Err(PlatformError::Lookup(format!(
                "injected failure for group {group_id}"
            )));
        }
        self.groups
            .lock()
            .unwrap()
            .get(&group_id)
            .cloned()
            .ok_or_else(|| PlatformError::Lookup(format!("unknown group {group_id}")))
    }
}

#[async_trait]
impl GroupDirectory for FakeDirectory {
    async fn group_name(&self, group_id: i64) -> Result<String, PlatformError> {
        Ok(self.group(group_id)?.name)
    }

    async fn group_slug(&self, group_id: i64) -> Result<String, PlatformError> {
        Ok(self.group(group_id)?.slug)
    }

    async fn group_admins(&self, group_id: i64) -> Result<Vec<i64>, PlatformError> {
        Ok(self.group(group_id)?.admins)
    }

    async fn is_group_admin(&self, user_id: i64, group_id: i64) -> Result<bool, PlatformError> {
        Ok(self.group(group_id)?.admins.contains(&user_id))
    }

    async fn is_platform_moderator(&self, user_id: i64) -> Result<bool, PlatformError> {
        Ok(self.moderators.lock().unwrap().contains(&user_id))
    }

    async fn connections_enabled(&self, group_id: i64) -> Result<bool, PlatformError> {
        Ok(self.group(group_id)?.connections_enabled)
    }
}

#[derive(Default)]
pub struct FakeSites {
    site_by_group: Mutex<HashMap<i64, i64>>,
    visibility: Mutex<HashMap<i64, i64>>,
    failing_groups: Mutex<HashSet<i64>>,
}

impl FakeSites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_site(&self, group_id: i64, site_id: i64, visibility: i64) {
        self.site_by_group.lock().unwrap().insert(group_id, site_id);
        self.visibility.lock().unwrap().insert(site_id, visibility);
    }

    /// Cambia la visibilità dopo il setup, per verificare che il collasso
    /// privacy avvenga in lettura e non in scrittura.
    pub fn set_visibility(&self, site_id: i64, visibility: i64) {
        self.visibility.lock().unwrap().insert(site_id, visibility);
    }

    pub fn fail_group(&self, group_id: i64) {
        self.failing_groups.lock().unwrap().insert(group_id);
    }
}

#[async_trait]
impl SiteDirectory for FakeSites {
    async fn site_id_for_group(&self, group_id: i64) -> Result<Option<i64>, PlatformError> {
        if self.failing_groups.lock().unwrap().contains(&group_id) {
            return Err(PlatformError::Lookup(format!(
                "injected failure for group {group_id}"
            )));
        }
        Ok(self.site_by_group.lock().unwrap().get(&group_id).copied())
    }

    async fn site_visibility(&self, site_id: i64) -> Result<i64, PlatformError> {
        self.visibility
            .lock()
            .unwrap()
            .get(&site_id)
            .copied()
            .ok_or_else(|| PlatformError::Lookup(format!("unknown site {site_id}")))
    }
}

#[derive(Debug, Clone)]
struct FakePost {
    post_id: i64,
    site_id: i64,
    terms: BTreeSet<i64>,
}

#[derive(Default)]
pub struct FakeTaxonomy {
    posts: Mutex<Vec<FakePost>>,
    comments: Mutex<Vec<(i64, i64)>>, // (comment_id, post_id)
    failing_sites: Mutex<HashSet<i64>>,
}

impl FakeTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_post(&self, site_id: i64, post_id: i64, terms: &[i64]) {
        self.posts.lock().unwrap().push(FakePost {
            post_id,
            site_id,
            terms: terms.iter().copied().collect(),
        });
    }

    pub fn add_comment(&self, comment_id: i64, post_id: i64) {
        self.comments.lock().unwrap().push((comment_id, post_id));
    }

    pub fn fail_site(&self, site_id: i64) {
        self.failing_sites.lock().unwrap().insert(site_id);
    }

    fn check_site(&self, site_id: i64) -> Result<(), PlatformError> {
        if self.failing_sites.lock().unwrap().contains(&site_id) {
            return Err(PlatformError::Lookup(format!(
                "injected failure for site {site_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TaxonomyReader for FakeTaxonomy {
    async fn post_ids_in_categories(
        &self,
        site_id: i64,
        terms: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, PlatformError> {
        self.check_site(site_id)?;

        let mut ids: Vec<i64> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.site_id == site_id && !p.terms.is_disjoint(terms))
            .map(|p| p.post_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn comment_ids_for_posts(
        &self,
        site_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, PlatformError> {
        self.check_site(site_id)?;

        let mut ids: Vec<i64> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, post_id)| post_ids.contains(post_id))
            .map(|(comment_id, _)| *comment_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

/// Evento di notifica registrato dal fake.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationRecord {
    InvitationSent {
        invitation_id: i64,
        recipients: Vec<i64>,
    },
    InvitationAccepted {
        invitation_id: i64,
        recipient: i64,
    },
}

/// Notifier che registra le consegne invece di effettuarle, con failure
/// injection per verificare che un dispatch fallito non annulli la
/// transizione di stato.
pub struct RecordingNotifier {
    directory: Arc<dyn GroupDirectory>,
    records: Mutex<Vec<NotificationRecord>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new(directory: Arc<dyn GroupDirectory>) -> Self {
        Self {
            directory,
            records: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn invitation_sent(&self, invitation: &Invitation) -> Result<Vec<i64>, PlatformError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlatformError::Dispatch("injected failure".to_string()));
        }

        let recipients = self
            .directory
            .group_admins(invitation.invitee_group_id)
            .await?;

        self.records
            .lock()
            .unwrap()
            .push(NotificationRecord::InvitationSent {
                invitation_id: invitation.invitation_id,
                recipients: recipients.clone(),
            });

        Ok(recipients)
    }

    async fn invitation_accepted(&self, invitation: &Invitation) -> Result<(), PlatformError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PlatformError::Dispatch("injected failure".to_string()));
        }

        self.records
            .lock()
            .unwrap()
            .push(NotificationRecord::InvitationAccepted {
                invitation_id: invitation.invitation_id,
                recipient: invitation.inviter_user_id,
            });

        Ok(())
    }
}
