//! Per-field scope passed to every field stage.

use crate::introspection::{ClassIntrospection, FieldIntrospection};

/// What the schema builder knows about the field currently being finalized.
///
/// A context borrows the introspection metadata for the duration of a single stage invocation;
/// stages never retain it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Context<'a> {
    /// Is the field a generated accessor following a foreign key to the referenced row?
    pub is_pg_forward_relation_field: bool,
    /// The column or constraint backing the field. Absent for fields not backed by the database.
    pub pg_field_introspection: Option<&'a FieldIntrospection>,
    /// The table of the object type the field belongs to.
    pub pg_introspection: Option<&'a ClassIntrospection>,
}

impl<'a> Context<'a> {
    /// A context for a field with no database metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context for a field backed by the column or constraint `field`, on an object type backed
    /// by the table owning it.
    pub fn for_field(field: &'a FieldIntrospection) -> Self {
        Self::new().field(field).class(&field.class)
    }

    /// A context for a forward relation field following the foreign key `constraint`.
    pub fn for_forward_relation(constraint: &'a FieldIntrospection) -> Self {
        Self::for_field(constraint).forward_relation(true)
    }

    pub fn forward_relation(self, is_pg_forward_relation_field: bool) -> Self {
        Self {
            is_pg_forward_relation_field,
            ..self
        }
    }

    pub fn field(self, field: &'a FieldIntrospection) -> Self {
        Self {
            pg_field_introspection: Some(field),
            ..self
        }
    }

    pub fn class(self, class: &'a ClassIntrospection) -> Self {
        Self {
            pg_introspection: Some(class),
            ..self
        }
    }
}
