/// Business logic layer for blog-service
///
/// - Feed service: paginated post listings (index, group, profile, follow feed)
/// - Post service: post creation, editing and the detail view
/// - Comment service: comments on posts
/// - Follow service: the follow graph
pub mod comments;
pub mod feed;
pub mod follow;
pub mod posts;

pub use comments::CommentService;
pub use feed::{FeedService, ProfileFeed};
pub use follow::FollowService;
pub use posts::{PostDetail, PostService};
