//! Relation declarations and already-loaded association targets.
//!
//! This module provides the pieces the preload layer reads from:
//! - `RelationSpec` / `RelationRegistry` for declaring a model's relations
//! - `Association` for the targets an association currently holds
//! - `Row` as an in-memory record backed by a registry
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use prax_preload::Record;
//! use prax_preload::relations::{RelationRegistry, RelationSpec};
//!
//! let mut users = RelationRegistry::for_model("User");
//! users.register(RelationSpec::one_to_many("posts", "Post"));
//! let users = Rc::new(users);
//!
//! let mut posts = RelationRegistry::for_model("Post");
//! posts.register(RelationSpec::many_to_one("author", "User"));
//! let posts = Rc::new(posts);
//!
//! let post = posts.row(10).into_ref();
//! let user = users.row(1).with_many("posts", vec![post]).into_ref();
//! assert_eq!(user.association("posts").unwrap().len(), 1);
//! ```

mod association;
mod row;
mod spec;

pub use association::Association;
pub use row::Row;
pub use spec::{RelationRegistry, RelationSpec, RelationType};
