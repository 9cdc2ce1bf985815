//! Settings DTOs - Data Transfer Objects per le policy di condivisione

use crate::entities::{CategorySelection, ConnectionSettings};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SettingsDTO {
    pub connection_id: i64,
    pub group_id: i64,
    pub categories: CategorySelection,
    pub exclude_comments: bool,
}

impl From<ConnectionSettings> for SettingsDTO {
    fn from(value: ConnectionSettings) -> Self {
        Self {
            connection_id: value.connection_id,
            group_id: value.group_id,
            categories: value.categories,
            exclude_comments: value.exclude_comments,
        }
    }
}

/// DTO per aggiornare la policy di condivisione di un gruppo.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateSettingsDTO {
    pub categories: CategorySelection,
    #[serde(default)]
    pub exclude_comments: bool,
}
