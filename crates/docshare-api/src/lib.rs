//! # docshare-api
//!
//! HTTP API layer for DocShare built on Axum.
//!
//! Provides the document and version endpoints, the health check,
//! middleware (CORS, request logging), extractors that report malformed
//! input in the standard envelope, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
