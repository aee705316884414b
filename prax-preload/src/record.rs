//! Records and record identity.
//!
//! A [`Record`] is anything whose associations can be read from memory. The
//! preload layer never loads data itself; it asks each record for the
//! targets an association already holds.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use smol_str::SmolStr;
use uuid::Uuid;

use crate::error::PreloadResult;
use crate::relations::Association;

/// Shared handle to a record.
pub type RecordRef = Rc<dyn Record>;

/// A record whose associations are already resident in memory.
pub trait Record: fmt::Debug {
    /// Name of the record's model (e.g. `"User"`).
    fn model_name(&self) -> &str;

    /// Primary key, or `None` for records that have not been persisted.
    fn primary_key(&self) -> Option<RecordId>;

    /// Read the already-loaded targets of an association.
    ///
    /// Implementations must not trigger loading. An association that is
    /// not declared on the model is an
    /// [`UnknownAssociation`](crate::ErrorCode::UnknownAssociation) error.
    /// Implementations that track load state may refuse to read a declared
    /// but unloaded association with
    /// [`AssociationNotLoaded`](crate::ErrorCode::AssociationNotLoaded)
    /// instead of reporting it as empty.
    fn association(&self, name: &str) -> PreloadResult<Association>;
}

/// Primary key value of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    /// Integer key.
    Int(i64),
    /// String key.
    Text(SmolStr),
    /// UUID key.
    Uuid(Uuid),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Text(id) => write!(f, "{}", id),
            Self::Uuid(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self::Int(id as i64)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::Text(SmolStr::new(id))
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::Text(SmolStr::from(id))
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

/// Equality key used when deduplicating association targets.
///
/// Persisted records are equal when model and primary key match. Records
/// without a key only equal themselves. An absent to-one target is
/// [`Identity::Null`], so repeated absences collapse as well.
#[derive(Debug, Clone)]
pub enum Identity {
    /// Absent target.
    Null,
    /// Persisted record.
    Key {
        /// Model name.
        model: SmolStr,
        /// Primary key.
        id: RecordId,
    },
    /// Unpersisted record, compared by allocation.
    ///
    /// The handle keeps the allocation alive while the identity exists.
    Object(RecordRef),
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (
                Self::Key { model, id },
                Self::Key {
                    model: other_model,
                    id: other_id,
                },
            ) => model == other_model && id == other_id,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Key { model, id } => {
                model.hash(state);
                id.hash(state);
            }
            Self::Object(record) => Rc::as_ptr(record).cast::<()>().hash(state),
        }
    }
}

impl Identity {
    /// Identity of an optional record.
    pub fn of(record: Option<&RecordRef>) -> Self {
        match record {
            Some(record) => Self::of_record(record),
            None => Self::Null,
        }
    }

    /// Identity of a record.
    pub fn of_record(record: &RecordRef) -> Self {
        match record.primary_key() {
            Some(id) => Self::Key {
                model: SmolStr::new(record.model_name()),
                id,
            },
            None => Self::Object(Rc::clone(record)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::{RelationRegistry, RelationSpec};

    fn users() -> Rc<RelationRegistry> {
        let mut registry = RelationRegistry::for_model("User");
        registry.register(RelationSpec::one_to_many("posts", "Post"));
        Rc::new(registry)
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::from(7).to_string(), "7");
        assert_eq!(RecordId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_identity_by_key() {
        let users = users();
        let a: RecordRef = users.row(1).into_ref();
        let b: RecordRef = users.row(1).into_ref();
        let c: RecordRef = users.row(2).into_ref();

        assert_eq!(Identity::of_record(&a), Identity::of_record(&b));
        assert_ne!(Identity::of_record(&a), Identity::of_record(&c));
    }

    #[test]
    fn test_identity_unpersisted_by_address() {
        let users = users();
        let a: RecordRef = users.new_row().into_ref();
        let b: RecordRef = users.new_row().into_ref();

        assert_eq!(Identity::of_record(&a), Identity::of_record(&a.clone()));
        assert_ne!(Identity::of_record(&a), Identity::of_record(&b));
    }

    #[test]
    fn test_identity_null() {
        assert_eq!(Identity::of(None), Identity::Null);
    }
}
