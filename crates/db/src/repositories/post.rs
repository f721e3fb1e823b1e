//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use crate::pagination::fetch_page;
use quill_common::{AppError, AppResult, Page, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

/// All post feeds order newest-first. ULID primary keys are time-ordered,
/// so `id DESC` matches creation order.
fn newest_first() -> Select<Post> {
    Post::find().order_by_desc(post::Column::Id)
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// One page of all posts, newest first.
    pub async fn find_page(&self, request: PageRequest) -> AppResult<Page<post::Model>> {
        fetch_page(self.db.as_ref(), newest_first(), request).await
    }

    /// One page of a group's posts, newest first.
    pub async fn find_page_by_group(
        &self,
        group_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<post::Model>> {
        let query = newest_first().filter(post::Column::GroupId.eq(group_id));
        fetch_page(self.db.as_ref(), query, request).await
    }

    /// One page of an author's posts, newest first.
    pub async fn find_page_by_author(
        &self,
        author_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<post::Model>> {
        let query = newest_first().filter(post::Column::AuthorId.eq(author_id));
        fetch_page(self.db.as_ref(), query, request).await
    }

    /// One page of posts by any of the given authors, newest first.
    ///
    /// Backs the follow feed. An empty author list short-circuits to an
    /// empty page.
    pub async fn find_page_by_authors(
        &self,
        author_ids: &[String],
        request: PageRequest,
    ) -> AppResult<Page<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Page::new(vec![], 1, 0, 0));
        }

        let query = newest_first().filter(post::Column::AuthorId.is_in(author_ids.to_vec()));
        fetch_page(self.db.as_ref(), query, request).await
    }

    /// Count posts in a group.
    pub async fn count_by_group(&self, group_id: &str) -> AppResult<u64> {
        Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
