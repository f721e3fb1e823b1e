//! Profile endpoints: an author's page and the follow/unfollow actions.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use quill_common::{AppResult, Page, PageRequest};
use quill_db::entities::user;
use serde::Serialize;

use super::posts::PostResponse;
use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Public author representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub bio: Option<String>,
}

impl From<user::Model> for AuthorResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            bio: model.bio,
        }
    }
}

/// An author's profile with one page of their posts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub author: AuthorResponse,
    /// Whether the viewer follows this author. Always false for anonymous
    /// viewers and for the author's own profile.
    pub following: bool,
    pub follower_count: u64,
    pub following_count: u64,
    pub posts: Page<PostResponse>,
}

/// An author's profile and posts, newest first. Unknown usernames are 404.
async fn profile(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(request): Query<PageRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let feed = state.post_service.author_feed(&username, request).await?;

    let following = match viewer {
        Some(viewer) if viewer.id != feed.author.id => {
            state
                .follow_service
                .is_following(&viewer.id, &feed.author.id)
                .await?
        }
        _ => false,
    };

    let follower_count = state.follow_service.follower_count(&feed.author.id).await?;
    let following_count = state.follow_service.following_count(&feed.author.id).await?;

    Ok(ApiResponse::ok(ProfileResponse {
        author: feed.author.into(),
        following,
        follower_count,
        following_count,
        posts: feed.posts.map(PostResponse::from),
    }))
}

/// Follow an author. Following yourself or someone already followed is a
/// no-op.
async fn follow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.follow_service.follow(&user.id, &username).await?;
    Ok(response::ok())
}

/// Unfollow an author. 404 when there is no follow to remove.
async fn unfollow(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.follow_service.unfollow(&user.id, &username).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile/{username}", get(profile))
        .route("/profile/{username}/follow", post(follow))
        .route("/profile/{username}/unfollow", post(unfollow))
}
