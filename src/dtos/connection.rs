//! Connection DTOs - Data Transfer Objects per le connessioni

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Riferimento minimale a un gruppo della piattaforma, risolto dalla
/// directory in fase di risposta.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupRefDTO {
    pub group_id: i64,
    pub name: String,
    pub slug: String,
}

/// Connessione vista dal lato di un gruppo: la controparte è già risolta.
///
/// L'elenco restituito da `list_connections` è ordinato per nome della
/// controparte (confronto lessicale case-sensitive, pareggi per
/// connection_id crescente).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionDTO {
    pub connection_id: i64,
    pub group_id: i64,
    pub connected_group: GroupRefDTO,
    pub date_created: DateTime<Utc>,
}
