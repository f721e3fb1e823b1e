//! Business logic services.

pub mod comment;
pub mod follow;
pub mod post;
pub mod user;

pub use comment::{AddCommentInput, CommentService};
pub use follow::FollowService;
pub use post::{CreatePostInput, EditOutcome, GroupFeed, PostService, ProfileFeed, UpdatePostInput};
pub use user::{CreateUserInput, UserService};
