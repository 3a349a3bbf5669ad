//! Field definitions under construction.

use super::{
    dynamic::{Field, FieldFuture, ResolverContext},
    Nullability, TypeRef,
};

/// A GraphQL field definition which has not been installed into a schema yet.
///
/// Descriptors are treated as values: a stage which wants to change a field produces a new
/// descriptor (see [`with_type`](Self::with_type)) rather than mutating the one it was given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeRef,
    description: Option<String>,
    deprecation: Option<String>,
}

impl FieldDescriptor {
    /// A field called `name` of type `ty`.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            deprecation: None,
        }
    }

    /// Attach documentation to this field.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this field as deprecated for the given reason.
    pub fn with_deprecation(mut self, reason: impl Into<String>) -> Self {
        self.deprecation = Some(reason.into());
        self
    }

    /// A copy of this field, identical except for its type.
    pub fn with_type(self, ty: TypeRef) -> Self {
        Self { ty, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deprecation(&self) -> Option<&str> {
        self.deprecation.as_deref()
    }

    /// Is the type of this field non-null?
    pub fn is_non_null(&self) -> bool {
        self.ty.is_non_null()
    }

    /// Install the finalized descriptor as a field of a dynamic schema, resolved by `resolver`.
    pub fn into_field<F>(self, resolver: F) -> Field
    where
        F: for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
    {
        let mut field = Field::new(self.name, self.ty, resolver);
        if let Some(description) = self.description {
            field = field.description(description);
        }
        if let Some(reason) = self.deprecation {
            field = field.deprecation(Some(&reason));
        }
        field
    }
}
