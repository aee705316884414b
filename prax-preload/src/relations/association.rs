//! Targets held by an association.

use crate::record::RecordRef;

/// The already-loaded targets of one association on one record.
#[derive(Debug, Clone)]
pub enum Association {
    /// To-many association, in its natural load order.
    Collection(Vec<RecordRef>),
    /// To-one association; `None` when the target is absent.
    Singular(Option<RecordRef>),
}

impl Association {
    /// Check if this association holds a collection.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Number of elements this association contributes before compaction.
    ///
    /// A to-one association always contributes one element, absent or not.
    pub fn len(&self) -> usize {
        match self {
            Self::Collection(targets) => targets.len(),
            Self::Singular(_) => 1,
        }
    }

    /// Check if the association has no present target.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Collection(targets) => targets.is_empty(),
            Self::Singular(target) => target.is_none(),
        }
    }

    /// Present targets, skipping an absent to-one target.
    pub fn into_targets(self) -> Vec<RecordRef> {
        match self {
            Self::Collection(targets) => targets,
            Self::Singular(target) => target.into_iter().collect(),
        }
    }
}
