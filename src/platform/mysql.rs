//! Adapter MySQL per le porte piattaforma
//!
//! Le tabelle dei gruppi, dei siti e dei contenuti appartengono alla
//! piattaforma; qui vengono solo lette.

use super::{GroupDirectory, PlatformError, SiteDirectory, TaxonomyReader};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::collections::BTreeSet;

pub struct MySqlGroupDirectory {
    connection_pool: MySqlPool,
}

impl MySqlGroupDirectory {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    async fn group_row(&self, group_id: i64) -> Result<(String, String, bool), PlatformError> {
        let row = sqlx::query_as::<_, (String, String, bool)>(
            "SELECT name, slug, connections_disabled FROM platform_groups WHERE group_id = ?",
        )
        .bind(group_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        row.ok_or_else(|| PlatformError::Lookup(format!("unknown group {group_id}")))
    }
}

#[async_trait]
impl GroupDirectory for MySqlGroupDirectory {
    async fn group_name(&self, group_id: i64) -> Result<String, PlatformError> {
        Ok(self.group_row(group_id).await?.0)
    }

    async fn group_slug(&self, group_id: i64) -> Result<String, PlatformError> {
        Ok(self.group_row(group_id).await?.1)
    }

    async fn group_admins(&self, group_id: i64) -> Result<Vec<i64>, PlatformError> {
        let admins = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM platform_group_members
             WHERE group_id = ? AND is_admin = TRUE",
        )
        .bind(group_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(admins)
    }

    async fn is_group_admin(&self, user_id: i64, group_id: i64) -> Result<bool, PlatformError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM platform_group_members
             WHERE group_id = ? AND user_id = ? AND is_admin = TRUE",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    async fn is_platform_moderator(&self, user_id: i64) -> Result<bool, PlatformError> {
        let moderator = sqlx::query_scalar::<_, bool>(
            "SELECT is_moderator FROM platform_users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(moderator.unwrap_or(false))
    }

    async fn connections_enabled(&self, group_id: i64) -> Result<bool, PlatformError> {
        Ok(!self.group_row(group_id).await?.2)
    }
}

pub struct MySqlSiteDirectory {
    connection_pool: MySqlPool,
}

impl MySqlSiteDirectory {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl SiteDirectory for MySqlSiteDirectory {
    async fn site_id_for_group(&self, group_id: i64) -> Result<Option<i64>, PlatformError> {
        let site_id = sqlx::query_scalar::<_, i64>(
            "SELECT site_id FROM platform_group_sites WHERE group_id = ?",
        )
        .bind(group_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(site_id)
    }

    async fn site_visibility(&self, site_id: i64) -> Result<i64, PlatformError> {
        let visibility = sqlx::query_scalar::<_, i64>(
            "SELECT visibility FROM platform_sites WHERE site_id = ?",
        )
        .bind(site_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        visibility.ok_or_else(|| PlatformError::Lookup(format!("unknown site {site_id}")))
    }
}

pub struct MySqlTaxonomyReader {
    connection_pool: MySqlPool,
}

impl MySqlTaxonomyReader {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

#[async_trait]
impl TaxonomyReader for MySqlTaxonomyReader {
    async fn post_ids_in_categories(
        &self,
        site_id: i64,
        terms: &BTreeSet<i64>,
    ) -> Result<Vec<i64>, PlatformError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; terms.len()].join(",");
        let statement = format!(
            "SELECT DISTINCT p.post_id FROM platform_posts p
             JOIN platform_post_terms t ON t.post_id = p.post_id
             WHERE p.site_id = ? AND t.term_id IN ({placeholders})
             ORDER BY p.post_id ASC"
        );

        let mut query = sqlx::query_scalar::<_, i64>(&statement).bind(site_id);
        for term in terms {
            query = query.bind(term);
        }

        Ok(query.fetch_all(&self.connection_pool).await?)
    }

    async fn comment_ids_for_posts(
        &self,
        site_id: i64,
        post_ids: &[i64],
    ) -> Result<Vec<i64>, PlatformError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; post_ids.len()].join(",");
        let statement = format!(
            "SELECT c.comment_id FROM platform_comments c
             JOIN platform_posts p ON p.post_id = c.post_id
             WHERE p.site_id = ? AND c.post_id IN ({placeholders})
             ORDER BY c.comment_id ASC"
        );

        let mut query = sqlx::query_scalar::<_, i64>(&statement).bind(site_id);
        for post_id in post_ids {
            query = query.bind(post_id);
        }

        Ok(query.fetch_all(&self.connection_pool).await?)
    }
}
