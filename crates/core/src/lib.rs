//! Forum domain core.
//!
//! Entities, validation, access rules, the content lifecycle engine and the
//! search façade, all written against the [`store::ForumStore`] trait so the
//! same logic runs over PostgreSQL or the in-memory store.

pub mod access;
pub mod accounts;
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod search;
pub mod status;
pub mod store;
pub mod types;
pub mod validation;
