//! # docshare-entity
//!
//! Domain entity models for DocShare. Every struct in this crate
//! represents a database row or a write payload handed to the store.
//! Row types derive `sqlx::FromRow`.

pub mod directory;
pub mod document;
