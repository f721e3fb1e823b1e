//! Test utilities for database operations.
//!
//! Model factories shared by repository, service, and API tests. Each
//! factory produces a fully-populated model so tests only spell out the
//! fields they care about.

use crate::entities::{comment, follow, group, post, user};
use chrono::Utc;

/// Build a test user.
#[must_use]
pub fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        name: None,
        bio: None,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$stub$stub".to_string(),
        token: Some(format!("token-{id}")),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a test group.
#[must_use]
pub fn test_group(id: &str, slug: &str) -> group::Model {
    group::Model {
        id: id.to_string(),
        slug: slug.to_string(),
        title: format!("Group {slug}"),
        description: "a test group".to_string(),
        created_at: Utc::now().into(),
    }
}

/// Build a test post.
#[must_use]
pub fn test_post(id: &str, author_id: &str, group_id: Option<&str>) -> post::Model {
    post::Model {
        id: id.to_string(),
        author_id: author_id.to_string(),
        group_id: group_id.map(ToString::to_string),
        text: "hello world".to_string(),
        image_url: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build a test comment.
#[must_use]
pub fn test_comment(id: &str, post_id: &str, author_id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        post_id: post_id.to_string(),
        author_id: author_id.to_string(),
        text: "nice post".to_string(),
        created_at: Utc::now().into(),
    }
}

/// Build a test follow edge.
#[must_use]
pub fn test_follow(id: &str, follower_id: &str, followee_id: &str) -> follow::Model {
    follow::Model {
        id: id.to_string(),
        follower_id: follower_id.to_string(),
        followee_id: followee_id.to_string(),
        created_at: Utc::now().into(),
    }
}

/// A count query result for `MockDatabase`, as produced by
/// `PaginatorTrait::count` and `num_items_and_pages`.
#[must_use]
pub fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
    vec![std::collections::BTreeMap::from([(
        "num_items",
        sea_orm::Value::BigInt(Some(n)),
    )])]
}
