//! # Prax Lazy
//!
//! Lazy association preloading for the Prax ORM.
//!
//! Records loaded together share a preload context. The first time code
//! traverses an association on any of them, a child context is prepared for
//! the targets of the whole group, so the next level can be eager-loaded in
//! one go instead of once per record. No `include` has to be declared upfront.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use prax_lazy::prelude::*;
//!
//! let config = PreloadConfig::from_str(r#"
//!     [preload]
//!     auto_preload = false
//! "#).unwrap();
//!
//! let users = Rc::new(
//!     RelationRegistry::for_model("User").with(RelationSpec::one_to_many("posts", "Post")),
//! );
//! let posts = Rc::new(RelationRegistry::for_model("Post"));
//! let user = users.row(1).with_many("posts", vec![posts.row(1).into_ref()]).into_ref();
//!
//! let root = Context::new(vec![user], Some(AssociationTree::new().include("posts")), false);
//! let builder = AssociatedContextBuilder::new(&config);
//!
//! let posts = builder.prepare(&root, "posts").unwrap();
//! assert_eq!(posts.records().len().unwrap(), 1);
//! ```
//!
//! ## Logging
//!
//! Enable the `logging` feature and set `PRAX_DEBUG=1`, then call
//! [`preload::logging::init`] at startup.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Configuration loading.
pub mod config {
    pub use prax_config::*;
}

/// Contexts, enumerators and association trees.
pub mod preload {
    pub use prax_preload::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::PreloadConfig;
    pub use crate::preload::{
        AssociatedContextBuilder, AssociationEnumerator, AssociationTree, Context, IntoRecordSet,
        Record, RecordSet, RecordSetExt, RelationRegistry, RelationSpec,
    };
}

// Re-export key types at the crate root
pub use config::{ConfigError, PreloadConfig};
pub use preload::{PreloadError, PreloadResult};
