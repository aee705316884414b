//! Shared fixtures for unit tests.

use std::rc::Rc;

use crate::record::RecordRef;
use crate::relations::{RelationRegistry, RelationSpec};

/// A small blog schema: users have posts and a profile, posts have an
/// author and comments.
pub(crate) struct Blog {
    pub users: Rc<RelationRegistry>,
    pub posts: Rc<RelationRegistry>,
}

impl Blog {
    pub fn new() -> Self {
        let users = RelationRegistry::for_model("User")
            .with(RelationSpec::one_to_many("posts", "Post"))
            .with(RelationSpec::one_to_one("profile", "Profile"));
        let posts = RelationRegistry::for_model("Post")
            .with(RelationSpec::many_to_one("author", "User"))
            .with(RelationSpec::one_to_many("comments", "Comment"));

        Self {
            users: Rc::new(users),
            posts: Rc::new(posts),
        }
    }

    pub fn user(&self, id: i64) -> RecordRef {
        self.users.row(id).into_ref()
    }

    pub fn post(&self, id: i64) -> RecordRef {
        self.posts.row(id).into_ref()
    }

    pub fn user_with_posts(&self, id: i64, posts: Vec<RecordRef>) -> RecordRef {
        self.users.row(id).with_many("posts", posts).into_ref()
    }

    pub fn post_with_author(&self, id: i64, author: Option<RecordRef>) -> RecordRef {
        self.posts.row(id).with_one("author", author).into_ref()
    }
}
