//! Force fields non-null with the `@nonNull` smart comment.
//!
//! The tag can be placed in three places:
//! * On a column (or foreign key constraint) as a bare `@nonNull`, which covers that field.
//! * On a table as `@nonNull email`, or repeated to build a list, which covers the fields named.
//! * On a table's row type, with the same form as on the table.
//!
//! Unlike relation inference, the tag is authoritative: a tagged field is rebuilt from its
//! nullable type, so applying the tag any number of times yields the same single non-null wrapper.

use crate::{
    context::Context,
    graphql::{FieldDescriptor, Nullability},
    introspection::TagValue,
};
use derive_more::Display;

/// Where a `@nonNull` tag covering a field was found.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    /// The tag was on the column or constraint backing the field.
    #[display(fmt = "field")]
    Field,
    /// The tag was on the table and named the field.
    #[display(fmt = "class")]
    Class,
    /// The tag was on the table's row type and named the field.
    #[display(fmt = "type")]
    Type,
}

/// Find the `@nonNull` tag which covers the field described by `context`, if any.
///
/// Sources are checked in the order field, table, row type, and the first match is reported.
pub fn annotated_non_null(context: &Context) -> Option<Source> {
    let field = context.pg_field_introspection?;
    if field.tags.non_null().map_or(false, |tag| tag.is_set()) {
        return Some(Source::Field);
    }

    let class = context.pg_introspection?;
    let designated = |tag: Option<&TagValue>| {
        tag.map_or(false, |tag| tag.designates(&field.name))
    };
    if designated(class.tags.non_null()) {
        return Some(Source::Class);
    }
    match &class.ty {
        Some(ty) if designated(ty.tags.non_null()) => Some(Source::Type),
        _ => None,
    }
}

/// Make a field non-null if a `@nonNull` tag covers it.
///
/// Fields which are not covered are returned unchanged.
pub fn transform(field: FieldDescriptor, context: &Context) -> FieldDescriptor {
    let Some(source) = annotated_non_null(context) else {
        return field;
    };

    tracing::debug!(field = field.name(), %source, "@nonNull tag found");
    let ty = field.ty().clone().nullable().non_null();
    field.with_type(ty)
}
