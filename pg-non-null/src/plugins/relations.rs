//! Infer non-null forward relations from the constraints on their foreign key columns.
//!
//! A forward relation field follows a foreign key from a row to the row it references. If every
//! column of the key forbids nulls, every row references something, so the relation can never
//! resolve to null.

use crate::{
    context::Context,
    graphql::{FieldDescriptor, Nullability},
    introspection::FieldIntrospection,
};

/// Can the foreign key `constraint` never be null?
///
/// This holds when every column of the key is `NOT NULL`, either directly or through a `NOT NULL`
/// domain. A key which matches none of the owning table's columns holds vacuously. An object with
/// no key at all is not a foreign key, and never holds.
pub fn relation_is_not_null(constraint: &FieldIntrospection) -> bool {
    let Some(key) = constraint.key_attributes() else {
        tracing::error!(
            constraint = %constraint.name,
            table = %constraint.class.name,
            "forward relation has no foreign key; leaving relation nullable"
        );
        return false;
    };
    let mut key = key.peekable();
    if key.peek().is_none() {
        tracing::warn!(
            constraint = %constraint.name,
            table = %constraint.class.name,
            key = ?constraint.key_attribute_nums,
            "foreign key matches no columns; treating relation as non-null"
        );
    }
    key.all(|attr| attr.forbids_null())
}

/// Make a forward relation field non-null if its foreign key cannot be null.
///
/// Any other field is returned unchanged.
pub fn transform(field: FieldDescriptor, context: &Context) -> FieldDescriptor {
    let constraint = match context.pg_field_introspection {
        Some(constraint) if context.is_pg_forward_relation_field => constraint,
        _ => return field,
    };
    if !relation_is_not_null(constraint) {
        return field;
    }

    tracing::debug!(
        field = field.name(),
        constraint = %constraint.name,
        "foreign key is not null, making relation non-null"
    );
    let ty = field.ty().clone().non_null();
    field.with_type(ty)
}
