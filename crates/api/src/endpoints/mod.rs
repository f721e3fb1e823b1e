//! API endpoints.

mod auth;
mod feed;
mod groups;
mod posts;
mod profiles;

use axum::Router;

use crate::middleware::AppState;

/// Create the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(posts::router())
        .merge(feed::router())
        .merge(groups::router())
        .merge(profiles::router())
        .nest("/auth", auth::router())
}
