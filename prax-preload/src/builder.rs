//! Building the context for an association that was just traversed.
//!
//! When code reads `association` on a record that belongs to a context, the
//! interception layer calls [`AssociatedContextBuilder::prepare`] with that
//! parent context. The new context holds a lazy view over the association
//! targets of every parent record, plus the part of the association tree
//! declared under `association`. It becomes the parent context for the next
//! traversal one level deeper.
//!
//! ```rust
//! use prax_preload::{AssociatedContextBuilder, AssociationTree, Context};
//! use prax_preload::records::RecordSet;
//! use prax_preload::relations::{RelationRegistry, RelationSpec};
//! use std::rc::Rc;
//!
//! let users = Rc::new(
//!     RelationRegistry::for_model("User").with(RelationSpec::one_to_many("posts", "Post")),
//! );
//! let posts = Rc::new(RelationRegistry::for_model("Post"));
//!
//! let user = users
//!     .row(1)
//!     .with_many("posts", vec![posts.row(10).into_ref(), posts.row(11).into_ref()])
//!     .into_ref();
//!
//! let tree = AssociationTree::from_paths(["posts.comments"]).unwrap();
//! let root = Context::new(vec![user], Some(tree), false);
//!
//! let builder = AssociatedContextBuilder::new(false);
//! let posts = builder.prepare(&root, "posts").unwrap();
//!
//! assert_eq!(posts.records().len().unwrap(), 2);
//! assert!(posts.association_tree().unwrap().contains("comments"));
//! ```

use std::rc::Rc;

use prax_config::PreloadConfig;
use tracing::debug;

use crate::context::{Context, ContextRegistry, Contexts};
use crate::enumerator::AssociationEnumerator;
use crate::error::PreloadResult;
use crate::tree::{NestedTreeProvider, TreeProvider};

/// Source of the preload mode, read each time a context is prepared.
pub trait PreloadMode {
    /// Whether auto-preload mode is active.
    fn auto_preload(&self) -> bool;

    /// Whether every prepared context should be logged.
    fn log_contexts(&self) -> bool {
        false
    }
}

impl PreloadMode for bool {
    fn auto_preload(&self) -> bool {
        *self
    }
}

impl PreloadMode for PreloadConfig {
    fn auto_preload(&self) -> bool {
        PreloadConfig::auto_preload(self)
    }

    fn log_contexts(&self) -> bool {
        self.debug.log_contexts
    }
}

impl<M: PreloadMode + ?Sized> PreloadMode for &M {
    fn auto_preload(&self) -> bool {
        (**self).auto_preload()
    }

    fn log_contexts(&self) -> bool {
        (**self).log_contexts()
    }
}

impl<M: PreloadMode + ?Sized> PreloadMode for Rc<M> {
    fn auto_preload(&self) -> bool {
        (**self).auto_preload()
    }

    fn log_contexts(&self) -> bool {
        (**self).log_contexts()
    }
}

/// Builds child contexts on lazy association access.
#[derive(Debug, Clone)]
pub struct AssociatedContextBuilder<M = bool, P = NestedTreeProvider, R = Contexts> {
    mode: M,
    provider: P,
    registry: R,
}

impl<M: PreloadMode> AssociatedContextBuilder<M> {
    /// Create a builder with the default tree provider and registry.
    pub fn new(mode: M) -> Self {
        Self {
            mode,
            provider: NestedTreeProvider,
            registry: Contexts,
        }
    }
}

impl<M, P, R> AssociatedContextBuilder<M, P, R>
where
    M: PreloadMode,
    P: TreeProvider,
    R: ContextRegistry,
{
    /// Use a different tree provider.
    pub fn with_tree_provider<P2: TreeProvider>(
        self,
        provider: P2,
    ) -> AssociatedContextBuilder<M, P2, R> {
        AssociatedContextBuilder {
            mode: self.mode,
            provider,
            registry: self.registry,
        }
    }

    /// Use a different context registry.
    pub fn with_registry<R2: ContextRegistry>(
        self,
        registry: R2,
    ) -> AssociatedContextBuilder<M, P, R2> {
        AssociatedContextBuilder {
            mode: self.mode,
            provider: self.provider,
            registry,
        }
    }

    /// The preload mode source.
    pub fn mode(&self) -> &M {
        &self.mode
    }

    /// Build and register the context for `association` under `parent`.
    ///
    /// Nothing is resolved here: a record that lacks `association` only
    /// fails once the new context's records are sized or iterated. In
    /// auto-preload mode the child tree is always `None` and the tree
    /// provider is not consulted.
    pub fn prepare(&self, parent: &Context, association: &str) -> PreloadResult<Rc<Context>> {
        let records = Rc::new(AssociationEnumerator::new(
            Rc::clone(parent.records()),
            association,
        ));

        let auto_preload = self.mode.auto_preload();
        let association_tree = if auto_preload {
            None
        } else {
            self.provider
                .subtree_for(parent.association_tree(), association)?
        };

        if self.mode.log_contexts() {
            debug!(
                association = %association,
                auto_preload,
                nested = ?association_tree.as_ref().map(ToString::to_string),
                "Prepared lazy preload context"
            );
        } else {
            crate::prax_debug!(association = %association, auto_preload, "Prepared lazy preload context");
        }

        Ok(self.registry.register(records, association_tree, auto_preload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, PreloadError};
    use crate::records::{RecordSet, RecordSetExt};
    use crate::test_support::Blog;
    use crate::tree::AssociationTree;
    use std::cell::Cell;

    fn root(blog: &Blog, tree: Option<AssociationTree>) -> Context {
        let users = vec![
            blog.user_with_posts(1, vec![blog.post(1), blog.post(2)]),
            blog.user_with_posts(2, vec![blog.post(3)]),
        ];
        Context::new(users, tree, false)
    }

    /// Returns a fixed answer and counts calls.
    struct FixedProvider {
        answer: Option<AssociationTree>,
        calls: Cell<usize>,
    }

    impl TreeProvider for FixedProvider {
        fn subtree_for(
            &self,
            _node: Option<&AssociationTree>,
            _name: &str,
        ) -> PreloadResult<Option<AssociationTree>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answer.clone())
        }
    }

    struct FailingProvider;

    impl TreeProvider for FailingProvider {
        fn subtree_for(
            &self,
            _node: Option<&AssociationTree>,
            name: &str,
        ) -> PreloadResult<Option<AssociationTree>> {
            Err(PreloadError::invalid_tree(format!("no tree for {}", name)))
        }
    }

    #[test]
    fn test_prepare_wraps_enumerator() {
        let blog = Blog::new();
        let parent = root(&blog, None);

        let context = AssociatedContextBuilder::new(false)
            .prepare(&parent, "posts")
            .unwrap();

        assert_eq!(context.records().len().unwrap(), 3);
        assert!(!context.auto_preload());
    }

    #[test]
    fn test_prepare_uses_subtree() {
        let blog = Blog::new();
        let tree = AssociationTree::from_paths(["posts.comments", "profile"]).unwrap();
        let parent = root(&blog, Some(tree));

        let context = AssociatedContextBuilder::new(false)
            .prepare(&parent, "posts")
            .unwrap();

        assert_eq!(
            context.association_tree(),
            Some(&AssociationTree::new().include("comments"))
        );
    }

    #[test]
    fn test_prepare_returns_provider_answer_exactly() {
        let blog = Blog::new();
        let parent = root(&blog, Some(AssociationTree::new().include("posts")));

        let answer = AssociationTree::from_paths(["tags.owner"]).unwrap();
        let provider = FixedProvider {
            answer: Some(answer.clone()),
            calls: Cell::new(0),
        };
        let builder = AssociatedContextBuilder::new(false).with_tree_provider(&provider);
        let context = builder.prepare(&parent, "posts").unwrap();
        assert_eq!(context.association_tree(), Some(&answer));

        let none = FixedProvider {
            answer: None,
            calls: Cell::new(0),
        };
        let builder = AssociatedContextBuilder::new(false).with_tree_provider(&none);
        let context = builder.prepare(&parent, "posts").unwrap();
        assert!(context.association_tree().is_none());
    }

    #[test]
    fn test_auto_preload_ignores_tree() {
        let blog = Blog::new();
        let tree = AssociationTree::from_paths(["posts.comments"]).unwrap();
        let parent = root(&blog, Some(tree));

        let provider = FixedProvider {
            answer: Some(AssociationTree::new().include("comments")),
            calls: Cell::new(0),
        };
        let builder = AssociatedContextBuilder::new(true).with_tree_provider(&provider);
        let context = builder.prepare(&parent, "posts").unwrap();

        assert!(context.association_tree().is_none());
        assert!(context.auto_preload());
        assert_eq!(provider.calls.get(), 0);
    }

    #[test]
    fn test_config_drives_mode() {
        let blog = Blog::new();
        let parent = root(&blog, Some(AssociationTree::from_paths(["posts.comments"]).unwrap()));
        let config = PreloadConfig::default().with_auto_preload(true);

        let context = AssociatedContextBuilder::new(&config)
            .prepare(&parent, "posts")
            .unwrap();
        assert!(context.association_tree().is_none());
    }

    #[test]
    fn test_provider_errors_propagate() {
        let blog = Blog::new();
        let parent = root(&blog, None);

        let err = AssociatedContextBuilder::new(false)
            .with_tree_provider(FailingProvider)
            .prepare(&parent, "posts")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTree);
    }

    #[test]
    fn test_unknown_association_is_lazy() {
        let blog = Blog::new();
        let parent = root(&blog, None);

        let context = AssociatedContextBuilder::new(false)
            .prepare(&parent, "tags")
            .unwrap();

        let err = context.records().len().unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownAssociation);
    }

    #[test]
    fn test_parent_is_untouched() {
        let blog = Blog::new();
        let parent = root(&blog, Some(AssociationTree::new().include("posts")));

        AssociatedContextBuilder::new(false)
            .prepare(&parent, "posts")
            .unwrap();

        assert_eq!(parent.records().len().unwrap(), 2);
        assert_eq!(parent.association_tree(), Some(&AssociationTree::new().include("posts")));
    }

    #[test]
    fn test_chained_prepare() {
        let blog = Blog::new();
        let author = blog.user(9);
        let users = vec![blog.user_with_posts(
            1,
            vec![
                blog.post_with_author(1, Some(author.clone())),
                blog.post_with_author(2, Some(author)),
            ],
        )];
        let tree = AssociationTree::from_paths(["posts.author.profile"]).unwrap();
        let root = Context::new(users, Some(tree), false);
        let builder = AssociatedContextBuilder::new(false);

        let posts = builder.prepare(&root, "posts").unwrap();
        let authors = builder.prepare(&posts, "author").unwrap();

        assert_eq!(authors.records().len().unwrap(), 2);
        assert_eq!(authors.records().records().unwrap().len(), 2);
        assert_eq!(
            authors.association_tree(),
            Some(&AssociationTree::new().include("profile"))
        );
    }
}
