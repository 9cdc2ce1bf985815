//! ConnectionSettings entity - Policy di condivisione per (connessione, gruppo)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selezione delle categorie che un gruppo condivide dentro una connessione.
///
/// `None` (condividi niente) è distinto sia da `All` sia da "mai
/// configurato": l'assenza di una riga di settings si risolve nel default
/// (`All`) in fase di lettura, non viene mai memorizzata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "terms", rename_all = "snake_case")]
pub enum CategorySelection {
    All,
    Terms(BTreeSet<i64>),
    None,
}

impl CategorySelection {
    /// True quando la selezione non lascia passare alcun contenuto.
    ///
    /// Un insieme esplicito vuoto equivale a `None`: zero categorie
    /// selezionate non deve mai degradare a "tutto".
    pub fn shares_nothing(&self) -> bool {
        match self {
            CategorySelection::All => false,
            CategorySelection::Terms(terms) => terms.is_empty(),
            CategorySelection::None => true,
        }
    }
}

/// Policy che `group_id` applica al contenuto che condivide *dentro* la
/// connessione `connection_id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub connection_id: i64,
    pub group_id: i64,
    pub categories: CategorySelection,
    pub exclude_comments: bool,
}

impl ConnectionSettings {
    /// Default quando non esiste una riga memorizzata: tutte le categorie,
    /// commenti inclusi.
    pub fn default_for(connection_id: i64, group_id: i64) -> Self {
        Self {
            connection_id,
            group_id,
            categories: CategorySelection::All,
            exclude_comments: false,
        }
    }
}
