//! Comment service.

use quill_common::{AppResult, IdGenerator};
use quill_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

/// Input for adding a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post. 404 when the post does not exist.
    pub async fn add(
        &self,
        author_id: &str,
        post_id: &str,
        input: AddCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id),
            author_id: Set(author_id.to_string()),
            text: Set(input.text),
            ..Default::default()
        };

        self.comment_repo.create(model).await
    }

    /// List a post's comments, oldest first.
    pub async fn list_for_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }
}
