//! # docshare-core
//!
//! Core crate for DocShare. Contains the configuration schema, typed
//! identifiers, pagination/sorting types, the tri-state [`types::Patch`]
//! used by partial updates, the [`traits::BlobStore`] collaborator
//! contract, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocShare crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
