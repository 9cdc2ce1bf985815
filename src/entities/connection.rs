//! Connection entity - Collegamento simmetrico tra due gruppi

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Una connessione attiva tra due gruppi.
///
/// La coppia è non ordinata: viene normalizzata in fase di inserimento
/// (`group_1_id < group_2_id`) così che l'indice univoco sulla coppia
/// garantisca al massimo una connessione per coppia di gruppi.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Connection {
    pub connection_id: i64,
    pub group_1_id: i64,
    pub group_2_id: i64,
    pub date_created: DateTime<Utc>,
}

impl Connection {
    /// Di solito non importa quale gruppo sia il primo e quale il secondo.
    pub fn group_ids(&self) -> [i64; 2] {
        [self.group_1_id, self.group_2_id]
    }

    /// Restituisce l'altro gruppo della coppia, se `group_id` ne fa parte.
    pub fn counterpart_of(&self, group_id: i64) -> Option<i64> {
        if self.group_1_id == group_id {
            Some(self.group_2_id)
        } else if self.group_2_id == group_id {
            Some(self.group_1_id)
        } else {
            None
        }
    }

    /// Verifica se un gruppo è membro della connessione.
    pub fn involves(&self, group_id: i64) -> bool {
        self.group_1_id == group_id || self.group_2_id == group_id
    }
}

/// Normalizza una coppia di gruppi nell'ordine di memorizzazione.
pub fn normalize_pair(group_a: i64, group_b: i64) -> (i64, i64) {
    if group_a <= group_b {
        (group_a, group_b)
    } else {
        (group_b, group_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn connection(a: i64, b: i64) -> Connection {
        Connection {
            connection_id: 1,
            group_1_id: a,
            group_2_id: b,
            date_created: Utc::now(),
        }
    }

    #[test]
    fn counterpart_resolution() {
        let c = connection(3, 7);
        assert_eq!(c.counterpart_of(3), Some(7));
        assert_eq!(c.counterpart_of(7), Some(3));
        assert_eq!(c.counterpart_of(9), None);
    }

    #[test]
    fn pair_normalization() {
        assert_eq!(normalize_pair(9, 2), (2, 9));
        assert_eq!(normalize_pair(2, 9), (2, 9));
    }
}
