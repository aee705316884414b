//! Array-like record sets.
//!
//! Code that consumes "the records of a context" accepts anything that
//! implements [`RecordSet`], not only a concrete list. Both [`RecordList`]
//! and the lazy [`AssociationEnumerator`] qualify, so a context's records
//! can be a view over another context's records without being copied.
//!
//! Elements are `Option<RecordRef>`: a non-compacted view over a to-one
//! association yields `None` for every absent target.
//!
//! ```rust
//! use std::rc::Rc;
//! use prax_preload::records::{IntoRecordSet, RecordSet, RecordSetExt};
//! use prax_preload::relations::{RelationRegistry, RelationSpec};
//!
//! let users = Rc::new(
//!     RelationRegistry::for_model("User").with(RelationSpec::one_to_many("posts", "Post")),
//! );
//! let records = vec![users.row(1).into_ref(), users.row(2).into_ref()].into_record_set();
//!
//! assert_eq!(records.len().unwrap(), 2);
//! assert!(records.all(|r| r.is_some()).unwrap());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::enumerator::AssociationEnumerator;
use crate::error::PreloadResult;
use crate::record::RecordRef;

/// One element of a record set, or the error raised while resolving it.
pub type RecordItem = PreloadResult<Option<RecordRef>>;

/// Iterator over a record set.
pub type RecordIter<'a> = Box<dyn Iterator<Item = RecordItem> + 'a>;

/// Capability interface for anything that can stand in for a list of records.
pub trait RecordSet: fmt::Debug {
    /// Number of elements.
    fn len(&self) -> PreloadResult<usize>;

    /// Check if there are no elements.
    fn is_empty(&self) -> PreloadResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Iterate elements in order.
    ///
    /// Iteration stops after the first error.
    fn iter(&self) -> RecordIter<'_>;
}

/// Convenience operations available on every [`RecordSet`].
pub trait RecordSetExt: RecordSet {
    /// Call `f` for every element.
    fn each<F>(&self, mut f: F) -> PreloadResult<()>
    where
        F: FnMut(Option<&RecordRef>),
    {
        for item in self.iter() {
            f(item?.as_ref());
        }
        Ok(())
    }

    /// Lazily map elements.
    fn map<'a, T, F>(&'a self, mut f: F) -> impl Iterator<Item = PreloadResult<T>> + 'a
    where
        F: FnMut(Option<RecordRef>) -> T + 'a,
        T: 'a,
    {
        self.iter().map(move |item| item.map(&mut f))
    }

    /// Check that every element satisfies `predicate`.
    ///
    /// Stops at the first element that fails. An empty set satisfies any predicate.
    fn all<F>(&self, mut predicate: F) -> PreloadResult<bool>
    where
        F: FnMut(Option<&RecordRef>) -> bool,
    {
        for item in self.iter() {
            if !predicate(item?.as_ref()) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Collect every element, absent ones included.
    fn to_vec(&self) -> PreloadResult<Vec<Option<RecordRef>>> {
        self.iter().collect()
    }

    /// Collect the present records, dropping absent elements.
    fn records(&self) -> PreloadResult<Vec<RecordRef>> {
        let mut records = Vec::new();
        for item in self.iter() {
            records.extend(item?);
        }
        Ok(records)
    }
}

impl<T: RecordSet + ?Sized> RecordSetExt for T {}

/// A concrete, fully materialized record set.
#[derive(Clone, Default)]
pub struct RecordList {
    records: Vec<Option<RecordRef>>,
}

impl RecordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: RecordRef) {
        self.records.push(Some(record));
    }

    /// Append an absent element.
    pub fn push_none(&mut self) {
        self.records.push(None);
    }

    /// Borrow the elements.
    pub fn as_slice(&self) -> &[Option<RecordRef>] {
        &self.records
    }
}

impl RecordSet for RecordList {
    fn len(&self) -> PreloadResult<usize> {
        Ok(self.records.len())
    }

    fn iter(&self) -> RecordIter<'_> {
        Box::new(self.records.iter().cloned().map(Ok))
    }
}

impl fmt::Debug for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.records.iter()).finish()
    }
}

impl From<Vec<RecordRef>> for RecordList {
    fn from(records: Vec<RecordRef>) -> Self {
        Self {
            records: records.into_iter().map(Some).collect(),
        }
    }
}

impl From<Vec<Option<RecordRef>>> for RecordList {
    fn from(records: Vec<Option<RecordRef>>) -> Self {
        Self { records }
    }
}

impl FromIterator<RecordRef> for RecordList {
    fn from_iter<T: IntoIterator<Item = RecordRef>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().map(Some).collect(),
        }
    }
}

/// Conversion into a shared record set.
///
/// Values that already are record sets are returned as the same allocation,
/// so wrapping a view never nests it inside another container.
pub trait IntoRecordSet {
    /// Convert into a shared record set.
    fn into_record_set(self) -> Rc<dyn RecordSet>;
}

impl IntoRecordSet for Rc<dyn RecordSet> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        self
    }
}

impl IntoRecordSet for Rc<AssociationEnumerator> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        self
    }
}

impl IntoRecordSet for AssociationEnumerator {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(self)
    }
}

impl IntoRecordSet for Rc<RecordList> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        self
    }
}

impl IntoRecordSet for RecordList {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(self)
    }
}

impl IntoRecordSet for Vec<RecordRef> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(RecordList::from(self))
    }
}

impl IntoRecordSet for Vec<Option<RecordRef>> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(RecordList::from(self))
    }
}

impl IntoRecordSet for RecordRef {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(RecordList::from(vec![self]))
    }
}

impl IntoRecordSet for Option<RecordRef> {
    fn into_record_set(self) -> Rc<dyn RecordSet> {
        Rc::new(RecordList::from(vec![self]))
    }
}

/// Check if two record sets are the same allocation.
pub fn same_set(a: &Rc<dyn RecordSet>, b: &Rc<dyn RecordSet>) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RecordId};
    use crate::test_support::Blog;

    #[test]
    fn test_record_list_len() {
        let blog = Blog::new();
        let list: RecordList = vec![blog.user(1), blog.user(2)].into();

        assert_eq!(list.len().unwrap(), 2);
        assert!(!list.is_empty().unwrap());
        assert!(RecordList::new().is_empty().unwrap());
    }

    #[test]
    fn test_absent_elements_are_counted() {
        let blog = Blog::new();
        let mut list = RecordList::new();
        list.push(blog.user(1));
        list.push_none();

        assert_eq!(list.len().unwrap(), 2);
        assert_eq!(list.records().unwrap().len(), 1);
        assert!(!list.all(|r| r.is_some()).unwrap());
    }

    #[test]
    fn test_map_and_each() {
        let blog = Blog::new();
        let list: RecordList = vec![blog.user(1), blog.user(2)].into();

        let ids: Vec<Option<RecordId>> = list
            .map(|r| r.and_then(|r| r.primary_key()))
            .collect::<PreloadResult<_>>()
            .unwrap();
        assert_eq!(ids, vec![Some(RecordId::Int(1)), Some(RecordId::Int(2))]);

        let mut seen = 0;
        list.each(|_| seen += 1).unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_all_on_empty_is_true() {
        let list = RecordList::new();
        assert!(list.all(|_| false).unwrap());
    }

    #[test]
    fn test_into_record_set_keeps_allocation() {
        let blog = Blog::new();
        let shared: Rc<dyn RecordSet> = vec![blog.user(1)].into_record_set();
        let again = Rc::clone(&shared).into_record_set();

        assert!(same_set(&shared, &again));
    }

    #[test]
    fn test_single_record_is_wrapped() {
        let blog = Blog::new();
        let set = blog.user(1).into_record_set();
        assert_eq!(set.len().unwrap(), 1);
    }
}
