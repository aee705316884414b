//! Relation specification types.

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Type of relation between models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-one relation (e.g., User has one Profile).
    OneToOne,
    /// One-to-many relation (e.g., User has many Posts).
    OneToMany,
    /// Many-to-one relation (e.g., Post belongs to User).
    ManyToOne,
    /// Many-to-many relation (e.g., Post has many Tags).
    ManyToMany,
}

impl RelationType {
    /// Check if this relation returns multiple records.
    pub fn is_many(&self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }

    /// Check if this relation returns a single record.
    pub fn is_one(&self) -> bool {
        matches!(self, Self::OneToOne | Self::ManyToOne)
    }
}

/// Specification for a relation between models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    /// Name of the relation (field name).
    pub name: SmolStr,
    /// Type of relation.
    pub relation_type: RelationType,
    /// Name of the related model.
    pub related_model: SmolStr,
}

impl RelationSpec {
    /// Create a relation spec.
    pub fn new(
        name: impl Into<SmolStr>,
        relation_type: RelationType,
        related_model: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            relation_type,
            related_model: related_model.into(),
        }
    }

    /// Create a one-to-one relation spec.
    pub fn one_to_one(name: impl Into<SmolStr>, related_model: impl Into<SmolStr>) -> Self {
        Self::new(name, RelationType::OneToOne, related_model)
    }

    /// Create a one-to-many relation spec.
    pub fn one_to_many(name: impl Into<SmolStr>, related_model: impl Into<SmolStr>) -> Self {
        Self::new(name, RelationType::OneToMany, related_model)
    }

    /// Create a many-to-one relation spec.
    pub fn many_to_one(name: impl Into<SmolStr>, related_model: impl Into<SmolStr>) -> Self {
        Self::new(name, RelationType::ManyToOne, related_model)
    }

    /// Create a many-to-many relation spec.
    pub fn many_to_many(name: impl Into<SmolStr>, related_model: impl Into<SmolStr>) -> Self {
        Self::new(name, RelationType::ManyToMany, related_model)
    }
}

/// Registry of relation specifications for a model.
#[derive(Debug, Clone, Default)]
pub struct RelationRegistry {
    model: SmolStr,
    relations: IndexMap<SmolStr, RelationSpec>,
}

impl RelationRegistry {
    /// Create an empty registry for a model.
    pub fn for_model(model: impl Into<SmolStr>) -> Self {
        Self {
            model: model.into(),
            relations: IndexMap::new(),
        }
    }

    /// Name of the model the relations are declared on.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Register a relation.
    pub fn register(&mut self, spec: RelationSpec) {
        self.relations.insert(spec.name.clone(), spec);
    }

    /// Register a relation, builder style.
    pub fn with(mut self, spec: RelationSpec) -> Self {
        self.register(spec);
        self
    }

    /// Get a relation by name.
    pub fn get(&self, name: &str) -> Option<&RelationSpec> {
        self.relations.get(name)
    }

    /// Get all relations in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &RelationSpec> {
        self.relations.values()
    }

    /// Get all relations that return multiple records.
    pub fn to_many(&self) -> impl Iterator<Item = &RelationSpec> {
        self.relations.values().filter(|r| r.relation_type.is_many())
    }

    /// Get all relations that return a single record.
    pub fn to_one(&self) -> impl Iterator<Item = &RelationSpec> {
        self.relations.values().filter(|r| r.relation_type.is_one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_type() {
        assert!(RelationType::OneToMany.is_many());
        assert!(RelationType::ManyToMany.is_many());
        assert!(!RelationType::OneToOne.is_many());
        assert!(RelationType::OneToOne.is_one());
        assert!(RelationType::ManyToOne.is_one());
    }

    #[test]
    fn test_relation_spec() {
        let spec = RelationSpec::one_to_many("posts", "Post");

        assert_eq!(spec.name, "posts");
        assert_eq!(spec.relation_type, RelationType::OneToMany);
        assert_eq!(spec.related_model, "Post");
    }

    #[test]
    fn test_relation_registry() {
        let registry = RelationRegistry::for_model("User")
            .with(RelationSpec::one_to_many("posts", "Post"))
            .with(RelationSpec::one_to_one("profile", "Profile"));

        assert_eq!(registry.model(), "User");
        assert!(registry.get("posts").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.to_many().count(), 1);
        assert_eq!(registry.to_one().count(), 1);

        let names: Vec<_> = registry.all().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["posts", "profile"]);
    }
}
