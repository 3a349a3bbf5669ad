//! Non-null wrapping of GraphQL type references.
//!
//! These are the only two type-system operations the nullability stages rely on: wrapping a type
//! in a non-null wrapper, and stripping a non-null wrapper to recover the underlying nullable type.

use super::TypeRef;

/// Nullability operations on a [`TypeRef`].
pub trait Nullability: Sized {
    /// Wrap this type in a non-null wrapper.
    ///
    /// GraphQL has no notion of a doubly non-null type (`T!!`), so wrapping a type which is already
    /// non-null returns it unchanged. This makes the operation idempotent, and it means a stage can
    /// promote a field without knowing whether an earlier stage already did.
    fn non_null(self) -> Self;

    /// The nullable type underlying this type.
    ///
    /// Strips the outermost non-null wrapper, if there is one. Types which are already nullable
    /// are returned unchanged. Wrappers nested inside a list are not affected.
    fn nullable(self) -> Self;

    /// Is this type wrapped in a non-null wrapper?
    fn is_non_null(&self) -> bool;
}

impl Nullability for TypeRef {
    fn non_null(self) -> Self {
        if self.is_non_null() {
            self
        } else {
            TypeRef::NonNull(Box::new(self))
        }
    }

    fn nullable(self) -> Self {
        match self {
            TypeRef::NonNull(inner) => *inner,
            ty => ty,
        }
    }

    fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}
