//! Association trees and subtree lookup.
//!
//! An [`AssociationTree`] is the nested set of relation names declared for
//! preloading, e.g. `posts -> { comments -> { author }, tags }`. Trees are
//! built elsewhere; the preload layer only asks a [`TreeProvider`] for the
//! subtree under one association name.
//!
//! ```rust
//! use prax_preload::tree::{AssociationTree, NestedTreeProvider, TreeProvider};
//!
//! let tree = AssociationTree::from_paths(["posts.comments.author", "posts.tags"]).unwrap();
//!
//! let posts = NestedTreeProvider.subtree_for(Some(&tree), "posts").unwrap().unwrap();
//! assert!(posts.contains("comments"));
//! assert!(posts.contains("tags"));
//!
//! assert!(NestedTreeProvider.subtree_for(Some(&tree), "profile").unwrap().is_none());
//! ```

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{PreloadError, PreloadResult};

/// Recursive `name -> subtree` mapping, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationTree {
    children: IndexMap<SmolStr, AssociationTree>,
}

impl AssociationTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include an association with no nested associations.
    pub fn include(self, name: impl Into<SmolStr>) -> Self {
        self.include_nested(name, AssociationTree::new())
    }

    /// Include an association with a nested subtree.
    ///
    /// Including the same name twice merges the subtrees.
    pub fn include_nested(mut self, name: impl Into<SmolStr>, subtree: AssociationTree) -> Self {
        self.insert(name.into(), subtree);
        self
    }

    /// Include a dotted path such as `"posts.comments.author"`.
    pub fn include_path(mut self, path: &str) -> PreloadResult<Self> {
        let mut segments = Vec::new();
        for segment in path.split('.') {
            let segment = segment.trim();
            if segment.is_empty() {
                return Err(PreloadError::invalid_tree(format!(
                    "empty segment in `{}`",
                    path
                )));
            }
            segments.push(segment);
        }

        let mut node = &mut self;
        for segment in segments {
            node = node.children.entry(SmolStr::new(segment)).or_default();
        }
        Ok(self)
    }

    /// Build a tree from dotted paths.
    pub fn from_paths<I, S>(paths: I) -> PreloadResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .try_fold(Self::new(), |tree, path| tree.include_path(path.as_ref()))
    }

    fn insert(&mut self, name: SmolStr, subtree: AssociationTree) {
        match self.children.get_mut(&name) {
            Some(existing) => existing.merge(subtree),
            None => {
                self.children.insert(name, subtree);
            }
        }
    }

    /// Merge another tree into this one.
    pub fn merge(&mut self, other: AssociationTree) {
        for (name, subtree) in other.children {
            self.insert(name, subtree);
        }
    }

    /// Subtree declared under `name`.
    pub fn get(&self, name: &str) -> Option<&AssociationTree> {
        self.children.get(name)
    }

    /// Check if `name` is declared at this level.
    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Names declared at this level, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(SmolStr::as_str)
    }

    /// Number of names declared at this level.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if nothing is declared at this level.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for AssociationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (name, subtree)) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if subtree.is_empty() {
                write!(f, "{}", name)?;
            } else {
                write!(f, "{}: {}", name, subtree)?;
            }
        }
        f.write_str("]")
    }
}

/// Looks up the subtree declared for an association.
pub trait TreeProvider {
    /// Subtree of `name` under `node`, or `None` when nothing is declared.
    ///
    /// Must be pure: the same inputs always give the same answer.
    fn subtree_for(
        &self,
        node: Option<&AssociationTree>,
        name: &str,
    ) -> PreloadResult<Option<AssociationTree>>;
}

/// Reads subtrees straight out of an [`AssociationTree`].
///
/// A name declared as a leaf yields an empty tree, not `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedTreeProvider;

impl TreeProvider for NestedTreeProvider {
    fn subtree_for(
        &self,
        node: Option<&AssociationTree>,
        name: &str,
    ) -> PreloadResult<Option<AssociationTree>> {
        Ok(node.and_then(|tree| tree.get(name)).cloned())
    }
}

impl<P: TreeProvider + ?Sized> TreeProvider for &P {
    fn subtree_for(
        &self,
        node: Option<&AssociationTree>,
        name: &str,
    ) -> PreloadResult<Option<AssociationTree>> {
        (**self).subtree_for(node, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_include_builder() {
        let tree = AssociationTree::new()
            .include("profile")
            .include_nested("posts", AssociationTree::new().include("comments"));

        assert_eq!(tree.len(), 2);
        assert!(tree.get("profile").unwrap().is_empty());
        assert!(tree.get("posts").unwrap().contains("comments"));
        assert_eq!(tree.names().collect::<Vec<_>>(), ["profile", "posts"]);
    }

    #[test]
    fn test_include_merges() {
        let tree = AssociationTree::new()
            .include_nested("posts", AssociationTree::new().include("comments"))
            .include_nested("posts", AssociationTree::new().include("tags"));

        let posts = tree.get("posts").unwrap();
        assert!(posts.contains("comments"));
        assert!(posts.contains("tags"));
    }

    #[test]
    fn test_from_paths() {
        let tree = AssociationTree::from_paths(["posts.comments.author", "posts.tags", "profile"])
            .unwrap();

        assert_eq!(tree.to_string(), "[posts: [comments: [author], tags], profile]");
    }

    #[test]
    fn test_empty_segment_rejected() {
        let err = AssociationTree::from_paths(["posts..author"]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTree);
    }

    #[test]
    fn test_provider_lookup() {
        let tree = AssociationTree::from_paths(["posts.comments"]).unwrap();
        let provider = NestedTreeProvider;

        let posts = provider.subtree_for(Some(&tree), "posts").unwrap();
        assert_eq!(posts, Some(AssociationTree::new().include("comments")));

        assert_eq!(provider.subtree_for(Some(&tree), "profile").unwrap(), None);
        assert_eq!(provider.subtree_for(None, "posts").unwrap(), None);
    }

    #[test]
    fn test_leaf_yields_empty_tree() {
        let tree = AssociationTree::new().include("posts");
        let subtree = NestedTreeProvider.subtree_for(Some(&tree), "posts").unwrap();

        assert_eq!(subtree, Some(AssociationTree::new()));
    }
}
