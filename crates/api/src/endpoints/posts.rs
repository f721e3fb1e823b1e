//! Post endpoints: the index feed, creation, detail and comments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use quill_common::{AppError, AppResult, PageRequest};
use quill_core::{AddCommentInput, CreatePostInput, EditOutcome, UpdatePostInput};
use quill_db::entities::{comment, post};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Post representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub group_id: Option<String>,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl From<post::Model> for PostResponse {
    fn from(model: post::Model) -> Self {
        Self {
            id: model.id,
            author_id: model.author_id,
            group_id: model.group_id,
            text: model.text,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Comment representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<FixedOffset>,
}

impl From<comment::Model> for CommentResponse {
    fn from(model: comment::Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            author_id: model.author_id,
            text: model.text,
            created_at: model.created_at,
        }
    }
}

/// A post together with its comment thread.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

/// The front page: one page of all posts, newest first.
///
/// Responses are served from the page cache when a fresh enough copy
/// exists, so a brand-new post can lag here by up to the cache TTL.
async fn index(
    State(state): State<AppState>,
    Query(request): Query<PageRequest>,
) -> AppResult<Response> {
    let key = request.number();

    if let Some(body) = state.page_cache.get(key).await {
        return Ok(json_body(body));
    }

    let page = state.post_service.index(request).await?;
    let envelope = ApiResponse::ok(page.map(PostResponse::from));
    let body =
        serde_json::to_string(&envelope).map_err(|e| AppError::Internal(e.to_string()))?;

    state.page_cache.set(key, body.clone()).await;
    Ok(json_body(body))
}

fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Create a new post.
async fn create_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let created = state.post_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// A single post with its comments.
async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PostDetailResponse>> {
    let model = state.post_service.get(&id).await?;
    let comments = state.comment_service.list_for_post(&id).await?;

    Ok(ApiResponse::ok(PostDetailResponse {
        post: model.into(),
        comments: comments.into_iter().map(Into::into).collect(),
    }))
}

/// Edit a post.
///
/// A requester who is not the author is sent to the read-only detail
/// view instead of getting an error; the post stays untouched.
async fn edit_post(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePostInput>,
) -> AppResult<Response> {
    match state.post_service.update(&user.id, &id, input).await? {
        EditOutcome::Updated(updated) => {
            Ok(ApiResponse::ok(PostResponse::from(updated)).into_response())
        }
        EditOutcome::NotAuthor(unchanged) => {
            Ok(Redirect::to(&format!("/posts/{}", unchanged.id)).into_response())
        }
    }
}

/// Add a comment to a post.
async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AddCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let created = state.comment_service.add(&user.id, &id, input).await?;
    Ok(ApiResponse::ok(created.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/create", post(create_post))
        .route("/posts/{id}", get(post_detail))
        .route("/posts/{id}/edit", post(edit_post))
        .route("/posts/{id}/comment", post(add_comment))
}
