//! Filter module - Composizione del filtro attività per i gruppi connessi
//!
//! `ast` definisce l'albero di predicati consegnato al sottosistema di
//! query attività; `composer` lo costruisce a partire dalle connessioni del
//! gruppo e dalle relative policy.

pub mod ast;
pub mod composer;

pub use ast::{ActivityItem, Condition, Filter, GROUPS_COMPONENT, TYPE_NEW_BLOG_COMMENT, TYPE_NEW_BLOG_POST};
pub use composer::{ActivityScope, compose_activity_filter};
