//! Predicate AST - Albero booleano di predicati sul flusso attività
//!
//! Sostituisce la costruzione per strutture associative annidate del layer
//! di query: l'albero è costruito funzionalmente dal composer e serializzato
//! verso il sottosistema attività, che lo traduce nel proprio linguaggio.
//! `matches` è la semantica di riferimento, usata anche nei test.

use serde::{Deserialize, Serialize};

/// Componente del flusso attività a cui appartengono gli eventi di gruppo.
pub const GROUPS_COMPONENT: &str = "groups";

/// Evento di pubblicazione post sul sito di un gruppo.
pub const TYPE_NEW_BLOG_POST: &str = "new_blog_post";

/// Evento di commento a un post sul sito di un gruppo.
pub const TYPE_NEW_BLOG_COMMENT: &str = "new_blog_comment";

/// Vincolo IN su una singola colonna del record attività.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Component(Vec<String>),
    ItemId(Vec<i64>),
    ActivityType(Vec<String>),
    SecondaryItemId(Vec<i64>),
}

impl Condition {
    fn matches(&self, item: &ActivityItem) -> bool {
        match self {
            Condition::Component(values) => values.iter().any(|v| v == &item.component),
            Condition::ItemId(values) => values.contains(&item.item_id),
            Condition::ActivityType(values) => values.iter().any(|v| v == &item.activity_type),
            Condition::SecondaryItemId(values) => values.contains(&item.secondary_item_id),
        }
    }
}

/// Albero di predicati. `MatchNone` è il sentinello "nessun record": la
/// composizione senza connessioni eleggibili deve produrre un filtro che
/// non lascia passare nulla, mai un filtro assente.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    MatchNone,
    Leaf(Condition),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn leaf(condition: Condition) -> Self {
        Filter::Leaf(condition)
    }

    /// Congiunzione normalizzata: un `MatchNone` assorbe l'intero ramo.
    pub fn and(parts: Vec<Filter>) -> Self {
        if parts.is_empty() || parts.iter().any(|p| matches!(p, Filter::MatchNone)) {
            return Filter::MatchNone;
        }
        if parts.len() == 1 {
            return parts.into_iter().next().expect("len checked");
        }
        Filter::And(parts)
    }

    /// Disgiunzione normalizzata: i rami `MatchNone` vengono scartati e la
    /// disgiunzione vuota resta `MatchNone`.
    pub fn or(parts: Vec<Filter>) -> Self {
        let mut parts: Vec<Filter> = parts
            .into_iter()
            .filter(|p| !matches!(p, Filter::MatchNone))
            .collect();
        match parts.len() {
            0 => Filter::MatchNone,
            1 => parts.remove(0),
            _ => Filter::Or(parts),
        }
    }

    /// Semantica di riferimento del filtro.
    pub fn matches(&self, item: &ActivityItem) -> bool {
        match self {
            Filter::MatchNone => false,
            Filter::Leaf(condition) => condition.matches(item),
            Filter::And(parts) => parts.iter().all(|p| p.matches(item)),
            Filter::Or(parts) => parts.iter().any(|p| p.matches(item)),
        }
    }
}

/// Record del flusso attività, nella proiezione minima su cui i predicati
/// possono esprimersi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub component: String,
    pub item_id: i64,
    pub activity_type: String,
    pub secondary_item_id: i64,
}

impl ActivityItem {
    pub fn new(component: &str, item_id: i64, activity_type: &str, secondary_item_id: i64) -> Self {
        Self {
            component: component.to_string(),
            item_id,
            activity_type: activity_type.to_string(),
            secondary_item_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_item(group_id: i64, post_id: i64) -> ActivityItem {
        ActivityItem::new(GROUPS_COMPONENT, group_id, TYPE_NEW_BLOG_POST, post_id)
    }

    #[test]
    fn match_none_rejects_everything() {
        assert!(!Filter::MatchNone.matches(&post_item(1, 1)));
    }

    #[test]
    fn and_with_match_none_collapses() {
        let filter = Filter::and(vec![
            Filter::leaf(Condition::Component(vec![GROUPS_COMPONENT.to_string()])),
            Filter::MatchNone,
        ]);
        assert_eq!(filter, Filter::MatchNone);
    }

    #[test]
    fn or_drops_match_none_branches() {
        let keep = Filter::leaf(Condition::ItemId(vec![7]));
        let filter = Filter::or(vec![Filter::MatchNone, keep.clone()]);
        assert_eq!(filter, keep);

        assert_eq!(Filter::or(vec![Filter::MatchNone]), Filter::MatchNone);
        assert_eq!(Filter::or(Vec::new()), Filter::MatchNone);
    }

    #[test]
    fn conjunction_requires_all_conditions() {
        let filter = Filter::and(vec![
            Filter::leaf(Condition::Component(vec![GROUPS_COMPONENT.to_string()])),
            Filter::leaf(Condition::ItemId(vec![7])),
            Filter::leaf(Condition::ActivityType(vec![TYPE_NEW_BLOG_POST.to_string()])),
        ]);

        assert!(filter.matches(&post_item(7, 42)));
        assert!(!filter.matches(&post_item(8, 42)));
        assert!(!filter.matches(&ActivityItem::new(
            GROUPS_COMPONENT,
            7,
            TYPE_NEW_BLOG_COMMENT,
            42
        )));
    }

    #[test]
    fn disjunction_accepts_any_branch() {
        let filter = Filter::or(vec![
            Filter::leaf(Condition::ItemId(vec![1])),
            Filter::leaf(Condition::ItemId(vec![2])),
        ]);

        assert!(filter.matches(&post_item(1, 0)));
        assert!(filter.matches(&post_item(2, 0)));
        assert!(!filter.matches(&post_item(3, 0)));
    }

    #[test]
    fn serializes_for_the_query_layer() {
        let filter = Filter::and(vec![
            Filter::leaf(Condition::Component(vec![GROUPS_COMPONENT.to_string()])),
            Filter::leaf(Condition::ItemId(vec![7])),
        ]);

        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "and": [
                    { "leaf": { "component": ["groups"] } },
                    { "leaf": { "item_id": [7] } }
                ]
            })
        );
    }
}
