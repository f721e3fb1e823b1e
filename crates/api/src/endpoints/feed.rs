//! The follow feed: posts by authors the viewer follows.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use quill_common::{AppResult, Page, PageRequest};

use super::posts::PostResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// One page of posts by followed authors, newest first. The viewer's own
/// posts are not included.
async fn follow_feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> AppResult<ApiResponse<Page<PostResponse>>> {
    let page = state.follow_service.feed(&user.id, request).await?;
    Ok(ApiResponse::ok(page.map(PostResponse::from)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/follow", get(follow_feed))
}
