/// Context documents handed to the presentation layer, one per view.
use serde::{Deserialize, Serialize};

use super::{CommentForm, CommentView, Group, PostForm, PostView, User};
use crate::pagination::Page;

pub const INDEX_SUBTITLE: &str = "Latest updates on the site";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexContext {
    pub title: String,
    pub text: String,
    pub page_obj: Page<PostView>,
}

impl IndexContext {
    pub fn new(page_obj: Page<PostView>) -> Self {
        Self {
            title: format!("Home page: {}", INDEX_SUBTITLE),
            text: INDEX_SUBTITLE.to_string(),
            page_obj,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupContext {
    pub title: String,
    pub group: Group,
    pub page_obj: Page<PostView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileContext {
    pub title: String,
    pub author: User,
    pub count_posts: i64,
    pub page_obj: Page<PostView>,
    pub following: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailContext {
    /// Group title of the post, if any
    pub title: Option<String>,
    pub post: PostView,
    pub author_posts: i64,
    pub comments: Vec<CommentView>,
    pub form: CommentForm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFormContext {
    pub form: PostForm,
    pub is_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowFeedContext {
    pub page_obj: Page<PostView>,
}
