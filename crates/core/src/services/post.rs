//! Post service.

use quill_common::{AppError, AppResult, IdGenerator, Page, PageRequest};
use quill_db::{
    entities::{group, post, user},
    repositories::{GroupRepository, PostRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    group_repo: GroupRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,

    /// Group to file the post under.
    pub group_id: Option<String>,

    /// Illustration URL.
    #[validate(length(max = 1024))]
    pub image_url: Option<String>,
}

/// Input for editing a post.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: Option<String>,

    /// New group (None = no change, Some(None) = detach, Some(Some(id)) = set).
    pub group_id: Option<Option<String>>,

    /// New image (None = no change, Some(None) = remove, Some(Some(url)) = set).
    pub image_url: Option<Option<String>>,
}

/// Result of an edit attempt.
///
/// Only the author may change a post; anyone else gets `NotAuthor` so the
/// API layer can send them to the read-only detail view without surfacing
/// an error.
#[derive(Debug)]
pub enum EditOutcome {
    /// The edit was applied.
    Updated(post::Model),
    /// The requester is not the author; the post is unchanged.
    NotAuthor(post::Model),
}

/// A group together with one page of its posts.
#[derive(Debug)]
pub struct GroupFeed {
    pub group: group::Model,
    pub posts: Page<post::Model>,
}

/// An author together with one page of their posts.
#[derive(Debug)]
pub struct ProfileFeed {
    pub author: user::Model,
    pub posts: Page<post::Model>,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        group_repo: GroupRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post owned by `author_id`.
    pub async fn create(&self, author_id: &str, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        // An unknown group is a form error, not a missing resource
        if let Some(ref group_id) = input.group_id
            && self.group_repo.find_by_id(group_id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!("Unknown group: {group_id}")));
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(author_id.to_string()),
            group_id: Set(input.group_id),
            text: Set(input.text),
            image_url: Set(input.image_url),
            ..Default::default()
        };

        let post = self.post_repo.create(model).await?;
        tracing::info!(post_id = %post.id, author_id, "Post created");
        Ok(post)
    }

    /// Edit a post in place.
    ///
    /// Returns [`EditOutcome::NotAuthor`] with the untouched post when the
    /// requester does not own it.
    pub async fn update(
        &self,
        editor_id: &str,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<EditOutcome> {
        let post = self.post_repo.get_by_id(post_id).await?;

        // Ownership first: a non-author is turned away before the input
        // is even looked at, however malformed it is
        if post.author_id != editor_id {
            return Ok(EditOutcome::NotAuthor(post));
        }

        input.validate()?;

        if let Some(Some(ref group_id)) = input.group_id
            && self.group_repo.find_by_id(group_id).await?.is_none()
        {
            return Err(AppError::BadRequest(format!("Unknown group: {group_id}")));
        }

        let mut active: post::ActiveModel = post.into();

        if let Some(text) = input.text {
            active.text = Set(text);
        }
        if let Some(group_id) = input.group_id {
            active.group_id = Set(group_id);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.post_repo.update(active).await?;
        Ok(EditOutcome::Updated(updated))
    }

    /// Get a post by ID.
    pub async fn get(&self, post_id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(post_id).await
    }

    /// One page of all posts, newest first.
    pub async fn index(&self, request: PageRequest) -> AppResult<Page<post::Model>> {
        self.post_repo.find_page(request).await
    }

    /// A group's feed, addressed by slug. 404 for unknown slugs.
    pub async fn group_feed(&self, slug: &str, request: PageRequest) -> AppResult<GroupFeed> {
        let group = self.group_repo.get_by_slug(slug).await?;
        let posts = self.post_repo.find_page_by_group(&group.id, request).await?;
        Ok(GroupFeed { group, posts })
    }

    /// An author's feed, addressed by username. 404 for unknown users.
    pub async fn author_feed(
        &self,
        username: &str,
        request: PageRequest,
    ) -> AppResult<ProfileFeed> {
        let author = self.user_repo.get_by_username(username).await?;
        let posts = self
            .post_repo
            .find_page_by_author(&author.id, request)
            .await?;
        Ok(ProfileFeed { author, posts })
    }

    /// All groups, for the post form's group picker.
    pub async fn groups(&self) -> AppResult<Vec<group::Model>> {
        self.group_repo.find_all().await
    }
}
