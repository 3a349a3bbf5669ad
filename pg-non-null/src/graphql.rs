//! The GraphQL side of nullability: type references and the field definitions they belong to.

pub mod field;
pub mod wrapping;

pub use field::FieldDescriptor;
pub use wrapping::Nullability;

// Re-export the dynamic schema types that field descriptors are built from.
pub use async_graphql::dynamic::{self, TypeRef};

// Re-export `async_graphql` directly as an escape hatch.
pub extern crate async_graphql;
