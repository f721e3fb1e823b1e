//! Follow service.

use quill_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use quill_db::{
    entities::{follow, post},
    repositories::{FollowRepository, PostRepository, UserRepository},
};
use sea_orm::Set;

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow an author by username.
    ///
    /// Idempotent: following someone already followed is a no-op, as is
    /// attempting to follow yourself. The unique `(follower, followee)`
    /// index backs this up at the schema level.
    pub async fn follow(&self, follower_id: &str, username: &str) -> AppResult<()> {
        let author = self.user_repo.get_by_username(username).await?;

        if author.id == follower_id {
            return Ok(());
        }

        if self.follow_repo.is_following(follower_id, &author.id).await? {
            return Ok(());
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(author.id.clone()),
            ..Default::default()
        };

        self.follow_repo.create(model).await?;
        tracing::info!(follower_id, author_id = %author.id, "Follow created");
        Ok(())
    }

    /// Unfollow an author by username. Errors when no follow edge exists.
    pub async fn unfollow(&self, follower_id: &str, username: &str) -> AppResult<()> {
        let author = self.user_repo.get_by_username(username).await?;

        let deleted = self
            .follow_repo
            .delete_by_pair(follower_id, &author.id)
            .await?;

        if !deleted {
            return Err(AppError::NotFound(format!("Not following {username}")));
        }

        tracing::info!(follower_id, author_id = %author.id, "Follow removed");
        Ok(())
    }

    /// Whether `viewer_id` follows `author_id`.
    pub async fn is_following(&self, viewer_id: &str, author_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(viewer_id, author_id).await
    }

    /// One page of posts by authors the user follows, newest first.
    ///
    /// The user's own posts are not part of the feed.
    pub async fn feed(&self, user_id: &str, request: PageRequest) -> AppResult<Page<post::Model>> {
        let followee_ids = self.follow_repo.find_followee_ids(user_id).await?;
        self.post_repo
            .find_page_by_authors(&followee_ids, request)
            .await
    }

    /// Number of followers an author has.
    pub async fn follower_count(&self, author_id: &str) -> AppResult<u64> {
        self.follow_repo.count_followers(author_id).await
    }

    /// Number of authors a user follows.
    pub async fn following_count(&self, user_id: &str) -> AppResult<u64> {
        self.follow_repo.count_following(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_db::test_utils::{count_result, test_follow, test_post, test_user};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    #[tokio::test]
    async fn test_follow_unknown_author_is_404() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<quill_db::entities::user::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(empty_db()),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        let result = service.follow("user1", "ghost").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_follow_yourself_is_a_noop() {
        let me = test_user("user1", "leo");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[me]])
                .into_connection(),
        );

        // No follow-repo queries are mocked: a lookup or insert would fail
        let service = FollowService::new(
            FollowRepository::new(empty_db()),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        service.follow("user1", "leo").await.unwrap();
    }

    #[tokio::test]
    async fn test_follow_twice_is_a_noop() {
        let author = test_user("user2", "mia");
        let edge = test_follow("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        // Existing edge found; no insert is attempted
        service.follow("user1", "mia").await.unwrap();
    }

    #[tokio::test]
    async fn test_follow_creates_edge() {
        let author = test_user("user2", "mia");
        let stored = test_follow("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<quill_db::entities::follow::Model>::new()])
                .append_query_results([[stored]])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        service.follow("user1", "mia").await.unwrap();
    }

    #[tokio::test]
    async fn test_unfollow_without_edge_is_error() {
        let author = test_user("user2", "mia");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<quill_db::entities::follow::Model>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        let result = service.unfollow("user1", "mia").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_unfollow_deletes_edge() {
        let author = test_user("user2", "mia");
        let edge = test_follow("f1", "user1", "user2");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(user_db),
            PostRepository::new(empty_db()),
        );

        service.unfollow("user1", "mia").await.unwrap();
    }

    #[tokio::test]
    async fn test_feed_with_no_follows_is_empty() {
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<std::collections::BTreeMap<
                    &'static str,
                    sea_orm::Value,
                >>::new()])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(empty_db()),
            PostRepository::new(empty_db()),
        );

        let page = service.feed("user1", PageRequest::default()).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
    }

    #[tokio::test]
    async fn test_feed_lists_followed_authors_posts() {
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![maplit::btreemap! {
                    "followee_id" => sea_orm::Value::from("user2")
                }]])
                .into_connection(),
        );
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_result(1)])
                .append_query_results([[test_post("p1", "user2", None)]])
                .into_connection(),
        );

        let service = FollowService::new(
            FollowRepository::new(follow_db),
            UserRepository::new(empty_db()),
            PostRepository::new(post_db),
        );

        let page = service.feed("user1", PageRequest::default()).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].author_id, "user2");
    }
}
