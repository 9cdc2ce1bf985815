//! Activity Filter Composer - Da connessioni e policy al filtro attività
//!
//! Funzione pura dello stato osservabile (connessioni del gruppo, settings,
//! visibilità siti, tassonomia): nessuno stato interno, rivalutata a ogni
//! richiesta. Non fallisce mai: ogni lookup esterno andato male esclude la
//! sola connessione interessata (fail-closed) e la composizione prosegue.

use crate::core::AppState;
use crate::entities::{CategorySelection, Connection};
use crate::filter::ast::{
    Condition, Filter, GROUPS_COMPONENT, TYPE_NEW_BLOG_COMMENT, TYPE_NEW_BLOG_POST,
};
use crate::platform::{SiteDirectory, TaxonomyReader};
use crate::repositories::ConnectionStore;
use crate::services::settings::stored_or_default;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Scope richiesto dal chiamante del flusso attività.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// Solo l'attività dei gruppi connessi.
    #[serde(rename = "connected-groups")]
    ConnectedGroups,
    /// Attività del gruppo stesso più quella dei gruppi connessi.
    #[serde(rename = "this-group-and-connected-groups")]
    ThisGroupAndConnectedGroups,
}

/// Compone il filtro attività per `group_id`.
///
/// `requested_types` sono i tipi di evento chiesti dal chiamante (vuoto =
/// tutti): limitano post e commenti condivisi e passano inalterati nella
/// clausola del gruppo stesso. Zero connessioni eleggibili producono
/// `Filter::MatchNone`, mai un filtro permissivo.
#[instrument(skip(state, requested_types), fields(group_id = %group_id, scope = ?scope))]
pub async fn compose_activity_filter(
    state: &AppState,
    group_id: i64,
    scope: ActivityScope,
    requested_types: &[String],
) -> Filter {
    let allow_post = requested_types.is_empty()
        || requested_types.iter().any(|t| t == TYPE_NEW_BLOG_POST);
    let allow_comment = requested_types.is_empty()
        || requested_types.iter().any(|t| t == TYPE_NEW_BLOG_COMMENT);

    let connections = match state.connections.find_by_group(group_id).await {
        Ok(connections) => connections,
        Err(e) => {
            // Senza l'elenco delle connessioni non c'è nulla di condiviso
            // da mostrare; il fallimento non deve aprire il filtro.
            warn!("Connection lookup failed for group {}: {}", group_id, e);
            Vec::new()
        }
    };

    debug!("Composing filter over {} connections", connections.len());

    let mut clauses: Vec<Filter> = Vec::new();
    for connection in &connections {
        if let Some(clause) =
            connected_group_clause(state, group_id, connection, allow_post, allow_comment).await
        {
            clauses.push(clause);
        }
    }

    if scope == ActivityScope::ThisGroupAndConnectedGroups {
        clauses.push(own_group_clause(group_id, requested_types));
    }

    Filter::or(clauses)
}

/// Clausola del gruppo stesso: lo scope richiesto passa inalterato, senza
/// applicare alcuna policy di condivisione.
fn own_group_clause(group_id: i64, requested_types: &[String]) -> Filter {
    let mut parts = vec![
        Filter::leaf(Condition::Component(vec![GROUPS_COMPONENT.to_string()])),
        Filter::leaf(Condition::ItemId(vec![group_id])),
    ];

    if !requested_types.is_empty() {
        parts.push(Filter::leaf(Condition::ActivityType(
            requested_types.to_vec(),
        )));
    }

    Filter::and(parts)
}

/// Clausola per un singolo gruppo connesso; `None` = la connessione non
/// contribuisce al filtro.
async fn connected_group_clause(
    state: &AppState,
    group_id: i64,
    connection: &Connection,
    allow_post: bool,
    allow_comment: bool,
) -> Option<Filter> {
    let connected_group_id = connection.counterpart_of(group_id)?;

    // Il contenuto dei siti non pubblici non viene mai condiviso; un lookup
    // fallito conta come non pubblico.
    match state.sites.group_has_public_site(connected_group_id).await {
        Ok(true) => {}
        Ok(false) => {
            debug!("Group {} has a non-public site, excluded", connected_group_id);
            return None;
        }
        Err(e) => {
            warn!("Site privacy lookup failed for group {}: {}", connected_group_id, e);
            return None;
        }
    }

    let settings = match stored_or_default(state, connection.connection_id, connected_group_id)
        .await
    {
        Ok(settings) => settings,
        Err(e) => {
            warn!(
                "Settings lookup failed for connection {} group {}: {}",
                connection.connection_id, connected_group_id, e
            );
            return None;
        }
    };

    if settings.categories.shares_nothing() {
        debug!("Group {} shares no categories, excluded", connected_group_id);
        return None;
    }

    let base = vec![
        Filter::leaf(Condition::Component(vec![GROUPS_COMPONENT.to_string()])),
        Filter::leaf(Condition::ItemId(vec![connected_group_id])),
    ];

    match &settings.categories {
        CategorySelection::All => {
            let mut types = Vec::new();
            if allow_post {
                types.push(TYPE_NEW_BLOG_POST.to_string());
            }
            if allow_comment && !settings.exclude_comments {
                types.push(TYPE_NEW_BLOG_COMMENT.to_string());
            }

            if types.is_empty() {
                return None;
            }

            let mut parts = base;
            parts.push(Filter::leaf(Condition::ActivityType(types)));
            Some(Filter::and(parts))
        }

        CategorySelection::Terms(terms) => {
            let site_id = match state.sites.site_id_for_group(connected_group_id).await {
                Ok(Some(site_id)) => site_id,
                // Nessun sito: nessun post può appartenere alle categorie
                // selezionate.
                Ok(None) => return None,
                Err(e) => {
                    warn!("Site lookup failed for group {}: {}", connected_group_id, e);
                    return None;
                }
            };

            let post_ids = match state.taxonomy.post_ids_in_categories(site_id, terms).await {
                Ok(post_ids) => post_ids,
                Err(e) => {
                    warn!("Taxonomy lookup failed for site {}: {}", site_id, e);
                    return None;
                }
            };

            // Zero post nelle categorie scelte: il ramo post resta il
            // sentinello matches-nothing, non un wildcard.
            let posts_branch = if allow_post && !post_ids.is_empty() {
                Filter::and(vec![
                    Filter::leaf(Condition::ActivityType(vec![TYPE_NEW_BLOG_POST.to_string()])),
                    Filter::leaf(Condition::SecondaryItemId(post_ids.clone())),
                ])
            } else {
                Filter::MatchNone
            };

            let comments_branch = if allow_comment
                && !settings.exclude_comments
                && !post_ids.is_empty()
            {
                let comment_ids = match state
                    .taxonomy
                    .comment_ids_for_posts(site_id, &post_ids)
                    .await
                {
                    Ok(comment_ids) => comment_ids,
                    Err(e) => {
                        warn!("Comment lookup failed for site {}: {}", site_id, e);
                        return None;
                    }
                };

                if comment_ids.is_empty() {
                    Filter::MatchNone
                } else {
                    Filter::and(vec![
                        Filter::leaf(Condition::ActivityType(vec![
                            TYPE_NEW_BLOG_COMMENT.to_string(),
                        ])),
                        Filter::leaf(Condition::SecondaryItemId(comment_ids)),
                    ])
                }
            } else {
                Filter::MatchNone
            };

            let type_query = Filter::or(vec![posts_branch, comments_branch]);

            let mut parts = base;
            parts.push(type_query);
            // Se entrambi i rami sono sentinelli l'intera clausola collassa
            // a MatchNone e viene scartata dalla disgiunzione esterna.
            Some(Filter::and(parts))
        }

        // shares_nothing() ha già escluso questo caso.
        CategorySelection::None => None,
    }
}
