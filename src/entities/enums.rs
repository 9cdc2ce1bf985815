//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};

/// Stato di un invito, derivato dalle date di risoluzione.
///
/// Non viene memorizzato come colonna: un invito è `Pending` finché
/// `date_accepted` e `date_rejected` sono entrambe assenti. Gli inviti
/// risolti sono storia immutabile e non tornano mai `Pending`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}
