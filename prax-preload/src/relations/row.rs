//! In-memory records backed by a relation registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::error::{PreloadError, PreloadResult};
use crate::record::{Record, RecordId, RecordRef};

use super::association::Association;
use super::spec::RelationRegistry;

/// A record whose associations are plain in-memory lists.
///
/// Associations that are declared but were never loaded read as empty: an
/// empty collection for to-many relations and an absent target for to-one
/// relations. Undeclared names are an error.
pub struct Row {
    relations: Rc<RelationRegistry>,
    id: Option<RecordId>,
    loaded: RefCell<IndexMap<SmolStr, Vec<RecordRef>>>,
}

impl Row {
    /// Create a row for the registry's model.
    pub fn new(relations: Rc<RelationRegistry>, id: Option<RecordId>) -> Self {
        Self {
            relations,
            id,
            loaded: RefCell::new(IndexMap::new()),
        }
    }

    /// Set the targets of a to-many association.
    pub fn with_many(self, name: impl Into<SmolStr>, targets: Vec<RecordRef>) -> Self {
        self.loaded.borrow_mut().insert(name.into(), targets);
        self
    }

    /// Set the target of a to-one association.
    pub fn with_one(self, name: impl Into<SmolStr>, target: Option<RecordRef>) -> Self {
        self.loaded
            .borrow_mut()
            .insert(name.into(), target.into_iter().collect());
        self
    }

    /// Store loaded targets on an existing row.
    ///
    /// This is the hook an eager loader uses to hand results back. For a
    /// to-one relation only the first target is kept.
    pub fn load(&self, name: &str, mut targets: Vec<RecordRef>) -> PreloadResult<()> {
        let spec = self
            .relations
            .get(name)
            .ok_or_else(|| PreloadError::unknown_association(self.relations.model(), name))?;

        if spec.relation_type.is_one() {
            targets.truncate(1);
        }
        self.loaded.borrow_mut().insert(spec.name.clone(), targets);
        Ok(())
    }

    /// Check if an association has been loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.borrow().contains_key(name)
    }

    /// Wrap the row in a shared record handle.
    pub fn into_ref(self) -> RecordRef {
        Rc::new(self)
    }
}

impl Record for Row {
    fn model_name(&self) -> &str {
        self.relations.model()
    }

    fn primary_key(&self) -> Option<RecordId> {
        self.id.clone()
    }

    fn association(&self, name: &str) -> PreloadResult<Association> {
        let spec = self
            .relations
            .get(name)
            .ok_or_else(|| PreloadError::unknown_association(self.relations.model(), name))?;

        let loaded = self.loaded.borrow();
        let targets = loaded.get(name);

        Ok(if spec.relation_type.is_many() {
            Association::Collection(targets.cloned().unwrap_or_default())
        } else {
            Association::Singular(targets.and_then(|t| t.first().cloned()))
        })
    }
}

// Rows routinely point back at their parents, so only association names are printed.
impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = self.loaded.borrow();
        f.debug_struct("Row")
            .field("model", &self.relations.model())
            .field("id", &self.id)
            .field("loaded", &loaded.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RelationRegistry {
    /// Create a persisted row of this model.
    pub fn row(self: &Rc<Self>, id: impl Into<RecordId>) -> Row {
        Row::new(Rc::clone(self), Some(id.into()))
    }

    /// Create a row of this model that has no primary key yet.
    pub fn new_row(self: &Rc<Self>) -> Row {
        Row::new(Rc::clone(self), None)
    }
}
