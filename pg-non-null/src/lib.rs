//! Non-null GraphQL fields for PostgreSQL-backed schemas.
//!
//! A schema generated from a relational database starts out with every field nullable. This crate
//! decides, for each field of a generated object type, whether its type can be made non-null
//! instead. It consists of:
//!
//! * An [introspection] model of the tables, columns and constraints backing each field, including
//!   the `@nonNull` smart comment tags attached to them.
//! * Two independent [plugins] which inspect that metadata: one inferring non-null
//!   [relations](plugins::relations) from `NOT NULL` foreign key columns, and one applying
//!   explicit [`@nonNull`](plugins::smart_comment) tags.
//! * A [`Pipeline`](plugins::Pipeline) which the host schema builder runs over each
//!   [`FieldDescriptor`](graphql::FieldDescriptor) as it finalizes the field.
//!
//! The stages only ever make fields stricter, so the result does not depend on the order they run.
//!
//! # Examples
//!
//! ```
//! use pg_non_null::prelude::*;
//! use std::sync::Arc;
//!
//! let post = Arc::new(ClassIntrospection {
//!     name: "post".into(),
//!     attributes: vec![AttributeIntrospection {
//!         num: 2,
//!         name: "author_id".into(),
//!         is_not_null: true,
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! });
//! let fk = FieldIntrospection::foreign_key(post, "post_author_id_fkey", [2]);
//!
//! let author = Pipeline::default().apply(
//!     FieldDescriptor::new("author", TypeRef::named("User")),
//!     &Context::for_forward_relation(&fk),
//! );
//! assert_eq!(author.ty().to_string(), "User!");
//! ```

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub mod context;
pub mod graphql;
pub mod introspection;
pub mod plugins;
pub mod prelude;

pub use introspection::Error;

/// Initialize tracing.
pub fn init_logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        // Another handler may already be installed by the host application.
        if let Err(err) = color_eyre::install() {
            eprintln!("error installing color_eyre: {err}");
        }
        tracing_subscriber::fmt()
            .with_ansi(true)
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    });
}
