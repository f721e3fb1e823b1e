//! HTTP API layer for quill.
//!
//! This crate provides the JSON API:
//!
//! - **Endpoints**: feeds, posts, groups, profiles and auth
//! - **Extractors**: required and optional authentication
//! - **Middleware**: token resolution, shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
