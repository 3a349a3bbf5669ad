//! Common items that you will always want in scope when finalizing fields.

pub use crate::{
    context::Context,
    graphql::{FieldDescriptor, Nullability, TypeRef},
    introspection::{
        AttributeIntrospection, ClassIntrospection, FieldIntrospection, TagValue, Tags,
        TypeIntrospection,
    },
    plugins::{Options, Pipeline, Stage},
};
