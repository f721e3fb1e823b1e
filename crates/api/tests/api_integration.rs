//! Router-level tests over a mocked database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use quill_api::{AppState, middleware::auth_middleware, router};
use quill_common::PageCache;
use quill_core::{CommentService, FollowService, PostService, UserService};
use quill_db::repositories::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use quill_db::test_utils::{count_result, test_post, test_user};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// One mock connection per repository, so each test only has to queue
/// results for the tables it actually touches.
struct TestDbs {
    user: DatabaseConnection,
    post: DatabaseConnection,
    group: DatabaseConnection,
    comment: DatabaseConnection,
    follow: DatabaseConnection,
}

impl Default for TestDbs {
    fn default() -> Self {
        Self {
            user: empty_db(),
            post: empty_db(),
            group: empty_db(),
            comment: empty_db(),
            follow: empty_db(),
        }
    }
}

fn build_app(dbs: TestDbs) -> Router {
    let user_repo = UserRepository::new(Arc::new(dbs.user));
    let post_repo = PostRepository::new(Arc::new(dbs.post));
    let group_repo = GroupRepository::new(Arc::new(dbs.group));
    let comment_repo = CommentRepository::new(Arc::new(dbs.comment));
    let follow_repo = FollowRepository::new(Arc::new(dbs.follow));

    let state = AppState {
        user_service: UserService::new(user_repo.clone()),
        post_service: PostService::new(post_repo.clone(), group_repo, user_repo.clone()),
        comment_service: CommentService::new(comment_repo, post_repo.clone()),
        follow_service: FollowService::new(follow_repo, user_repo, post_repo),
        page_cache: PageCache::new(),
    };

    router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_index_is_served_from_cache_on_repeat() {
    // Only one count + one select are queued; the second request must
    // come out of the page cache or it would hit the exhausted mock.
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_result(1)])
        .append_query_results([[test_post("p1", "u1", None)]])
        .into_connection();

    let app = build_app(TestDbs {
        post: post_db,
        ..Default::default()
    });

    let first = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = axum::body::to_bytes(first.into_body(), usize::MAX)
        .await
        .unwrap();

    let second = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second_body = axum::body::to_bytes(second.into_body(), usize::MAX)
        .await
        .unwrap();

    assert_eq!(first_body, second_body);
}

#[tokio::test]
async fn test_index_with_garbled_page_falls_back_to_first() {
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_result(1)])
        .append_query_results([[test_post("p1", "u1", None)]])
        .into_connection();

    let app = build_app(TestDbs {
        post: post_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?page=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["page"], 1);
}

#[tokio::test]
async fn test_profile_reports_follow_counts() {
    let user_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", "leo")]])
        .into_connection();
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_result(1)])
        .append_query_results([[test_post("p1", "u1", None)]])
        .into_connection();
    let follow_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_result(5)])
        .append_query_results([count_result(2)])
        .into_connection();

    let app = build_app(TestDbs {
        user: user_db,
        post: post_db,
        follow: follow_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/profile/leo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["followerCount"], 5);
    assert_eq!(json["data"]["followingCount"], 2);
    assert_eq!(json["data"]["following"], false);
}

#[tokio::test]
async fn test_create_without_login_redirects_to_login() {
    let app = build_app(TestDbs::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/create")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=/create"
    );
}

#[tokio::test]
async fn test_follow_feed_requires_login() {
    let app = build_app(TestDbs::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/follow")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=/follow"
    );
}

#[tokio::test]
async fn test_unknown_group_is_404() {
    let group_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<quill_db::entities::group::Model>::new()])
        .into_connection();

    let app = build_app(TestDbs {
        group: group_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/group/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<quill_db::entities::post::Model>::new()])
        .into_connection();

    let app = build_app(TestDbs {
        post: post_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_by_non_author_redirects_to_detail() {
    // Token resolves to u1, but the post belongs to someone else
    let user_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", "leo")]])
        .into_connection();
    let post_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_post("p1", "author1", None)]])
        .into_connection();

    let app = build_app(TestDbs {
        user: user_db,
        post: post_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/edit")
                .method("POST")
                .header("Authorization", "Bearer token-u1")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"hijacked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/posts/p1"
    );
}

#[tokio::test]
async fn test_signup_returns_token() {
    let user = test_user("u1", "leo");

    // First lookup: username free; second result: the inserted row
    let user_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<quill_db::entities::user::Model>::new()])
        .append_query_results([[user]])
        .into_connection();

    let app = build_app(TestDbs {
        user: user_db,
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/signup")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"username":"leo","password":"password123"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["token"], "token-u1");
}

#[tokio::test]
async fn test_comment_requires_login() {
    let app = build_app(TestDbs::default());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/posts/p1/comment")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"hi"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login?next=/posts/p1/comment"
    );
}
