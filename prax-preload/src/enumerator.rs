//! Lazy flattening view over one association across many records.
//!
//! An [`AssociationEnumerator`] presents the targets of `association` on
//! every parent record as one ordered sequence: parent order first, then the
//! natural order of each to-many target list. Nothing is resolved until the
//! view is sized or iterated, and resolution only reads targets that are
//! already in memory.
//!
//! # Modes
//!
//! - **compact** (fixed at construction): absent to-one targets are skipped.
//! - **dedup** (switched on by [`AssociationEnumerator::uniq`]): a target
//!   seen earlier in the same pass is skipped. The seen-set spans the whole
//!   pass, not one parent, and an absent to-one target counts as a value.
//!
//! For to-one associations the dedup check runs before the compact check,
//! so a repeated absence is suppressed by dedup rather than by compaction.
//! The resulting counts are the same either way.
//!
//! # Caching
//!
//! The size and the sequence plan are cached together in one record stamped
//! with a generation counter. `uniq()` replaces that record in a single step,
//! so a size computed under one mode can never be read under another.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use prax_preload::AssociationEnumerator;
//! use prax_preload::records::{IntoRecordSet, RecordSet};
//! use prax_preload::relations::{RelationRegistry, RelationSpec};
//!
//! let users = Rc::new(
//!     RelationRegistry::for_model("User").with(RelationSpec::one_to_many("posts", "Post")),
//! );
//! let posts = Rc::new(RelationRegistry::for_model("Post"));
//!
//! let (x, y, z) = (posts.row(1).into_ref(), posts.row(2).into_ref(), posts.row(3).into_ref());
//! let parents = vec![
//!     users.row(1).with_many("posts", vec![x.clone(), y.clone()]).into_ref(),
//!     users.row(2).with_many("posts", vec![y, z]).into_ref(),
//! ];
//!
//! let posts = AssociationEnumerator::new(parents.into_record_set(), "posts");
//! assert_eq!(posts.len().unwrap(), 4);
//!
//! posts.uniq();
//! assert_eq!(posts.len().unwrap(), 3);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::error::PreloadResult;
use crate::record::{Identity, RecordRef};
use crate::records::{RecordItem, RecordIter, RecordSet};
use crate::relations::Association;

/// Flattening configuration of an enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flattening {
    /// Skip absent to-one targets.
    pub compact: bool,
    /// Skip targets already produced earlier in the pass.
    pub dedup: bool,
}

/// The built shape of the lazy sequence for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SequencePlan {
    mode: Flattening,
    generation: u64,
}

/// Size and plan, always computed under the same mode.
#[derive(Debug, Default)]
struct CacheState {
    generation: u64,
    size: Option<usize>,
    plan: Option<Rc<SequencePlan>>,
}

impl CacheState {
    /// Drop everything and move to the next generation.
    fn invalidate(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            size: None,
            plan: None,
        };
    }
}

/// Seen-set shared by sizing and iteration.
#[derive(Debug)]
struct Dedup {
    seen: Option<HashSet<Identity>>,
}

impl Dedup {
    fn new(enabled: bool) -> Self {
        Self {
            seen: enabled.then(HashSet::new),
        }
    }

    /// Record `target` and report whether it was not produced before.
    fn admit(&mut self, target: Option<&RecordRef>) -> bool {
        match self.seen.as_mut() {
            Some(seen) => seen.insert(Identity::of(target)),
            None => true,
        }
    }

    fn is_enabled(&self) -> bool {
        self.seen.is_some()
    }
}

/// Whether a to-one target becomes an element. Dedup runs first.
fn keep_singular(mode: Flattening, dedup: &mut Dedup, target: Option<&RecordRef>) -> bool {
    if !dedup.admit(target) {
        return false;
    }
    !(mode.compact && target.is_none())
}

/// Lazy, sized, optionally deduplicated view over one association.
///
/// Not safe for concurrent use: calling [`uniq`](Self::uniq) while an
/// iterator from the same enumerator is alive is a caller bug. The live
/// iterator keeps producing under the mode it started with.
#[derive(Debug)]
pub struct AssociationEnumerator {
    parents: Rc<dyn RecordSet>,
    association: SmolStr,
    compact: bool,
    dedup: Cell<bool>,
    cache: RefCell<CacheState>,
}

impl AssociationEnumerator {
    /// Create a view over `association` on every record of `parents`.
    pub fn new(parents: Rc<dyn RecordSet>, association: impl Into<SmolStr>) -> Self {
        Self::with_compact(parents, association.into(), false)
    }

    fn with_compact(parents: Rc<dyn RecordSet>, association: SmolStr, compact: bool) -> Self {
        Self {
            parents,
            association,
            compact,
            dedup: Cell::new(false),
            cache: RefCell::new(CacheState::default()),
        }
    }

    /// Name of the association being flattened.
    pub fn association_name(&self) -> &str {
        &self.association
    }

    /// The parent records.
    pub fn parents(&self) -> &Rc<dyn RecordSet> {
        &self.parents
    }

    /// Check if absent to-one targets are skipped.
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Check if repeated targets are skipped.
    pub fn is_dedup(&self) -> bool {
        self.dedup.get()
    }

    /// Current flattening configuration.
    pub fn mode(&self) -> Flattening {
        Flattening {
            compact: self.compact,
            dedup: self.dedup.get(),
        }
    }

    /// A new view over the same parents and association that skips absent
    /// to-one targets.
    ///
    /// Dedup is not carried over: `e.uniq(); e.compact()` produces a view
    /// that does not deduplicate, while `e.compact().uniq()` does.
    pub fn compact(&self) -> Self {
        Self::with_compact(Rc::clone(&self.parents), self.association.clone(), true)
    }

    /// Switch on dedup in place and drop cached size and plan.
    ///
    /// Idempotent.
    pub fn uniq(&self) -> &Self {
        self.dedup.set(true);
        self.cache.borrow_mut().invalidate();
        crate::prax_trace!(association = %self.association, "Enabled association dedup");
        self
    }

    /// Cached plan for the current mode, built on first use.
    fn plan(&self) -> Rc<SequencePlan> {
        let mode = self.mode();
        let mut cache = self.cache.borrow_mut();
        let generation = cache.generation;
        let plan = cache
            .plan
            .get_or_insert_with(|| Rc::new(SequencePlan { mode, generation }));
        debug_assert_eq!(plan.mode, mode);
        Rc::clone(plan)
    }

    /// Count elements without building the sequence.
    fn count(&self, mode: Flattening) -> PreloadResult<usize> {
        let mut dedup = Dedup::new(mode.dedup);
        let mut count = 0;

        for parent in self.parents.iter() {
            let Some(parent) = parent? else {
                continue;
            };

            match parent.association(&self.association)? {
                Association::Collection(targets) => {
                    if dedup.is_enabled() {
                        count += targets.iter().filter(|&t| dedup.admit(Some(t))).count();
                    } else {
                        count += targets.len();
                    }
                }
                Association::Singular(target) => {
                    if keep_singular(mode, &mut dedup, target.as_ref()) {
                        count += 1;
                    }
                }
            }
        }

        Ok(count)
    }

    #[cfg(test)]
    fn generation(&self) -> u64 {
        self.cache.borrow().generation
    }
}

impl RecordSet for AssociationEnumerator {
    fn len(&self) -> PreloadResult<usize> {
        let generation = {
            let cache = self.cache.borrow();
            if let Some(size) = cache.size {
                return Ok(size);
            }
            cache.generation
        };

        let size = self.count(self.mode())?;

        let mut cache = self.cache.borrow_mut();
        if cache.generation == generation {
            cache.size = Some(size);
        }
        crate::prax_trace!(
            association = %self.association,
            size,
            generation,
            "Computed association size"
        );
        Ok(size)
    }

    fn iter(&self) -> RecordIter<'_> {
        let plan = self.plan();
        Box::new(Flatten {
            parents: self.parents.iter(),
            association: &self.association,
            dedup: Dedup::new(plan.mode.dedup),
            plan,
            pending: Vec::new().into_iter(),
            done: false,
        })
    }
}

/// Iterator produced by [`AssociationEnumerator::iter`].
struct Flatten<'a> {
    parents: RecordIter<'a>,
    association: &'a str,
    plan: Rc<SequencePlan>,
    dedup: Dedup,
    pending: std::vec::IntoIter<RecordRef>,
    done: bool,
}

impl Iterator for Flatten<'_> {
    type Item = RecordItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(target) = self.pending.next() {
                if self.dedup.admit(Some(&target)) {
                    return Some(Ok(Some(target)));
                }
                continue;
            }

            let parent = match self.parents.next()? {
                Ok(Some(parent)) => parent,
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            match parent.association(self.association) {
                Ok(Association::Collection(targets)) => self.pending = targets.into_iter(),
                Ok(Association::Singular(target)) => {
                    if keep_singular(self.plan.mode, &mut self.dedup, target.as_ref()) {
                        return Some(Ok(target));
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
