//! Row cache - Porta di caching read-through per righe indicizzate per id
//!
//! Iniettata negli store MySQL; l'invalidazione avviene in modo sincrono
//! dentro l'operazione che muta la riga, prima del ritorno, così la
//! richiesta successiva non legge mai una riga stantia.

use dashmap::DashMap;

/// Porta di cache per righe con chiave numerica.
pub trait RowCache<T: Clone + Send + Sync>: Send + Sync {
    fn get(&self, id: i64) -> Option<T>;
    fn put(&self, id: i64, value: T);
    fn invalidate(&self, id: i64);
}

/// Cache che non memorizza nulla: disattiva il caching di uno store senza
/// toccarne il codice.
pub struct NoopCache;

impl<T: Clone + Send + Sync> RowCache<T> for NoopCache {
    fn get(&self, _id: i64) -> Option<T> {
        None
    }

    fn put(&self, _id: i64, _value: T) {}

    fn invalidate(&self, _id: i64) {}
}

/// Cache in-process basata su DashMap, condivisibile tra richieste.
pub struct DashCache<T> {
    rows: DashMap<i64, T>,
}

impl<T> DashCache<T> {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

impl<T> Default for DashCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> RowCache<T> for DashCache<T> {
    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).map(|entry| entry.value().clone())
    }

    fn put(&self, id: i64, value: T) {
        self.rows.insert(id, value);
    }

    fn invalidate(&self, id: i64) {
        self.rows.remove(&id);
    }
}
