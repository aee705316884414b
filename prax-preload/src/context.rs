//! Preload contexts.
//!
//! A [`Context`] groups the records that were loaded together with the
//! association tree declared for them. When one association is traversed
//! on any record of the group, the eager loader can load it for the whole
//! group at once instead of once per record.

use std::fmt;
use std::rc::Rc;

use crate::error::PreloadResult;
use crate::records::{IntoRecordSet, RecordSet};
use crate::tree::AssociationTree;

/// Records loaded together plus the associations known to be needed for them.
///
/// Immutable after construction and shared between the context builder and
/// the eager loader.
pub struct Context {
    records: Rc<dyn RecordSet>,
    association_tree: Option<AssociationTree>,
    auto_preload: bool,
}

impl Context {
    /// Create a context.
    pub fn new(
        records: impl IntoRecordSet,
        association_tree: Option<AssociationTree>,
        auto_preload: bool,
    ) -> Self {
        Self {
            records: records.into_record_set(),
            association_tree,
            auto_preload,
        }
    }

    /// The records of this context.
    pub fn records(&self) -> &Rc<dyn RecordSet> {
        &self.records
    }

    /// The association tree, if any nested associations are declared.
    pub fn association_tree(&self) -> Option<&AssociationTree> {
        self.association_tree.as_ref()
    }

    /// Whether the context was created in auto-preload mode.
    pub fn auto_preload(&self) -> bool {
        self.auto_preload
    }

    /// Whether accessing `association` should preload it for every record.
    ///
    /// Always true in auto-preload mode. Otherwise the association must be
    /// declared in this context's tree.
    pub fn should_preload(&self, association: &str) -> bool {
        self.auto_preload
            || self
                .association_tree
                .as_ref()
                .is_some_and(|tree| tree.contains(association))
    }

    /// Hand the records to `preloader` if `association` should be preloaded.
    ///
    /// Returns whether the preloader ran. Empty record sets are skipped.
    pub fn try_preload_lazily(
        &self,
        association: &str,
        preloader: &dyn Preloader,
    ) -> PreloadResult<bool> {
        if !self.should_preload(association) || self.records.is_empty()? {
            return Ok(false);
        }

        crate::prax_debug!(association = %association, auto_preload = self.auto_preload, "Preloading association");
        preloader.preload(self.records.as_ref(), association)?;
        Ok(true)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("records", &self.records)
            .field(
                "association_tree",
                &self.association_tree.as_ref().map(ToString::to_string),
            )
            .field("auto_preload", &self.auto_preload)
            .finish()
    }
}

/// Creates and hands out contexts.
pub trait ContextRegistry {
    /// Register a new context for `records`.
    fn register(
        &self,
        records: Rc<dyn RecordSet>,
        association_tree: Option<AssociationTree>,
        auto_preload: bool,
    ) -> Rc<Context>;
}

/// Default registry: every registration yields a fresh shared context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contexts;

impl ContextRegistry for Contexts {
    fn register(
        &self,
        records: Rc<dyn RecordSet>,
        association_tree: Option<AssociationTree>,
        auto_preload: bool,
    ) -> Rc<Context> {
        Rc::new(Context::new(records, association_tree, auto_preload))
    }
}

impl<R: ContextRegistry + ?Sized> ContextRegistry for &R {
    fn register(
        &self,
        records: Rc<dyn RecordSet>,
        association_tree: Option<AssociationTree>,
        auto_preload: bool,
    ) -> Rc<Context> {
        (**self).register(records, association_tree, auto_preload)
    }
}

/// Eager loader that fills an association for a whole record set.
///
/// Query execution lives outside this crate; implementations receive the
/// records of a context and the association to load.
pub trait Preloader {
    /// Load `association` for every record in `records`.
    fn preload(&self, records: &dyn RecordSet, association: &str) -> PreloadResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{RecordList, RecordSetExt};
    use crate::test_support::Blog;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPreloader {
        calls: RefCell<Vec<(String, usize)>>,
    }

    impl Preloader for RecordingPreloader {
        fn preload(&self, records: &dyn RecordSet, association: &str) -> PreloadResult<()> {
            let count = records.records()?.len();
            self.calls.borrow_mut().push((association.to_string(), count));
            Ok(())
        }
    }

    #[test]
    fn test_should_preload_follows_tree() {
        let blog = Blog::new();
        let tree = AssociationTree::new().include("posts");
        let context = Context::new(vec![blog.user(1)], Some(tree), false);

        assert!(context.should_preload("posts"));
        assert!(!context.should_preload("profile"));
    }

    #[test]
    fn test_should_preload_without_tree() {
        let blog = Blog::new();
        let context = Context::new(vec![blog.user(1)], None, false);
        assert!(!context.should_preload("posts"));

        let auto = Context::new(vec![blog.user(1)], None, true);
        assert!(auto.should_preload("posts"));
    }

    #[test]
    fn test_try_preload_lazily() {
        let blog = Blog::new();
        let tree = AssociationTree::new().include("posts");
        let context = Context::new(vec![blog.user(1), blog.user(2)], Some(tree), false);
        let preloader = RecordingPreloader::default();

        assert!(context.try_preload_lazily("posts", &preloader).unwrap());
        assert!(!context.try_preload_lazily("profile", &preloader).unwrap());
        assert_eq!(*preloader.calls.borrow(), vec![("posts".to_string(), 2)]);
    }

    #[test]
    fn test_try_preload_skips_empty() {
        let context = Context::new(RecordList::new(), None, true);
        let preloader = RecordingPreloader::default();

        assert!(!context.try_preload_lazily("posts", &preloader).unwrap());
        assert!(preloader.calls.borrow().is_empty());
    }

    #[test]
    fn test_registry_shares_records() {
        let blog = Blog::new();
        let records = vec![blog.user(1)].into_record_set();
        let context = Contexts.register(Rc::clone(&records), None, false);

        assert!(crate::records::same_set(context.records(), &records));
        assert!(context.association_tree().is_none());
    }
}
