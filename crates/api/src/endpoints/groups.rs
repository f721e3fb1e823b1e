//! Group endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use quill_common::{AppResult, Page, PageRequest};
use quill_db::entities::group;
use serde::Serialize;

use super::posts::PostResponse;
use crate::{middleware::AppState, response::ApiResponse};

/// Group representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
}

impl From<group::Model> for GroupResponse {
    fn from(model: group::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            title: model.title,
            description: model.description,
        }
    }
}

/// A group with one page of its posts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFeedResponse {
    pub group: GroupResponse,
    pub posts: Page<PostResponse>,
}

/// A group's posts, newest first. Unknown slugs are 404.
async fn group_feed(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(request): Query<PageRequest>,
) -> AppResult<ApiResponse<GroupFeedResponse>> {
    let feed = state.post_service.group_feed(&slug, request).await?;

    Ok(ApiResponse::ok(GroupFeedResponse {
        group: feed.group.into(),
        posts: feed.posts.map(PostResponse::from),
    }))
}

/// All groups, for the post form's group picker.
async fn list_groups(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<GroupResponse>>> {
    let all = state.post_service.groups().await?;
    Ok(ApiResponse::ok(all.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups))
        .route("/group/{slug}", get(group_feed))
}
