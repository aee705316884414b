//! # prax-preload
//!
//! Lazy association preloading for the Prax ORM.
//!
//! Instead of declaring every `include` upfront, records loaded together are
//! grouped in a [`Context`]. When code traverses an association on one of
//! them, a child context is built for the association targets of the whole
//! group, so the eager loader can fetch the next level in one query instead
//! of one per record.
//!
//! This crate provides:
//! - [`AssociationEnumerator`], a lazy, cached, optionally deduplicated view
//!   over one association across many records
//! - [`AssociatedContextBuilder`], which turns (parent context, association)
//!   into the next context
//! - [`AssociationTree`] and [`TreeProvider`] for declared nested associations
//! - [`RecordSet`], the capability trait anything standing in for a list of
//!   records implements
//!
//! Nothing here runs queries. Only targets that are already in memory are
//! read; loading them is the job of a [`Preloader`].
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use prax_preload::{AssociatedContextBuilder, AssociationTree, Context};
//! use prax_preload::records::{RecordSet, RecordSetExt};
//! use prax_preload::relations::{RelationRegistry, RelationSpec};
//!
//! let users = Rc::new(
//!     RelationRegistry::for_model("User").with(RelationSpec::one_to_one("profile", "Profile")),
//! );
//! let profiles = Rc::new(RelationRegistry::for_model("Profile"));
//!
//! let records = vec![
//!     users.row(1).with_one("profile", Some(profiles.row(1).into_ref())).into_ref(),
//!     users.row(2).with_one("profile", None).into_ref(),
//! ];
//! let root = Context::new(records, Some(AssociationTree::new().include("profile")), false);
//!
//! let profiles = AssociatedContextBuilder::new(false)
//!     .prepare(&root, "profile")
//!     .unwrap();
//!
//! // Absent targets are elements until compacted.
//! assert_eq!(profiles.records().len().unwrap(), 2);
//! assert_eq!(profiles.records().records().unwrap().len(), 1);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use prax_preload::{ErrorCode, PreloadError};
//!
//! let err = PreloadError::unknown_association("User", "postz");
//! assert_eq!(err.code, ErrorCode::UnknownAssociation);
//! ```

pub mod builder;
pub mod context;
pub mod enumerator;
pub mod error;
pub mod logging;
pub mod record;
pub mod records;
pub mod relations;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use builder::{AssociatedContextBuilder, PreloadMode};
pub use context::{Context, ContextRegistry, Contexts, Preloader};
pub use enumerator::{AssociationEnumerator, Flattening};
pub use error::{ErrorCode, ErrorContext, PreloadError, PreloadResult};
pub use record::{Identity, Record, RecordId, RecordRef};
pub use records::{IntoRecordSet, RecordList, RecordSet, RecordSetExt};
pub use relations::{Association, RelationRegistry, RelationSpec, RelationType, Row};
pub use tree::{AssociationTree, NestedTreeProvider, TreeProvider};
