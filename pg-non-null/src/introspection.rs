//! Read-only metadata about the database objects behind GraphQL fields.
//!
//! These structures are produced by an external introspection of the PostgreSQL catalog. Their
//! serialized form uses the catalog's camelCase vocabulary (`isNotNull`, `keyAttributeNums`, ...),
//! so an introspection result can be loaded straight from JSON with
//! [`FieldIntrospection::from_json`] or [`ClassIntrospection::from_json`].

use derive_more::From;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The tag which marks fields as non-null.
pub const NON_NULL_TAG: &str = "nonNull";

/// The identifier of a column within its table.
pub type AttributeNum = i16;

/// Errors encountered while loading introspection metadata.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("malformed introspection: {source}"))]
    Introspection { source: serde_json::Error },

    #[snafu(display("error reading introspection from {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Deserialize an introspection document from JSON text.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, Error> {
    serde_json::from_str(json).context(IntrospectionSnafu)
}

/// Read and deserialize an introspection document from a JSON file.
pub fn from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).context(IoSnafu { path })?;
    from_json(&json)
}

/// The value of a single annotation tag.
///
/// Tags come from smart comments on database objects. A bare `@nonNull` parses as a flag, while
/// `@nonNull email` names a single identifier, and repeating the tag (`@nonNull email` followed by
/// `@nonNull phone`) collects the identifiers into a list. Lists may hold values other than
/// identifiers; only their string elements can match. Values of any other shape are kept but never
/// match anything.
#[derive(Clone, Debug, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Single(String),
    Many(Vec<serde_json::Value>),
    Other(serde_json::Value),
}

impl TagValue {
    /// Does this tag value name `identifier`?
    ///
    /// A single identifier designates exactly itself; a list designates each of its elements.
    pub fn designates(&self, identifier: &str) -> bool {
        match self {
            Self::Single(name) => !name.is_empty() && name == identifier,
            Self::Many(names) => names.iter().any(|name| name.as_str() == Some(identifier)),
            Self::Flag(_) | Self::Other(_) => false,
        }
    }

    /// Is this the bare flag form of the tag?
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Flag(true))
    }
}

impl From<&str> for TagValue {
    fn from(name: &str) -> Self {
        Self::Single(name.into())
    }
}

impl From<Vec<String>> for TagValue {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names.into_iter().map(Into::into).collect())
    }
}

/// Annotation tags attached to a database object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, TagValue>);

impl Tags {
    /// Add a tag.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.0.get(key)
    }

    /// The value of the `@nonNull` tag, if present.
    pub fn non_null(&self) -> Option<&TagValue> {
        self.get(NON_NULL_TAG)
    }
}

/// A PostgreSQL type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeIntrospection {
    pub name: String,
    /// Set for domain types declared `NOT NULL`, which forbid nulls regardless of the columns
    /// using them.
    #[serde(default)]
    pub domain_is_not_null: bool,
    #[serde(default)]
    pub tags: Tags,
}

/// A column of a table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeIntrospection {
    pub num: AttributeNum,
    pub name: String,
    #[serde(default)]
    pub is_not_null: bool,
    #[serde(rename = "type", default)]
    pub ty: TypeIntrospection,
    #[serde(default)]
    pub tags: Tags,
}

impl AttributeIntrospection {
    /// Can this column never hold a null, either by its own constraint or by its domain type?
    pub fn forbids_null(&self) -> bool {
        self.is_not_null || self.ty.domain_is_not_null
    }
}

/// A table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassIntrospection {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeIntrospection>,
    #[serde(default)]
    pub tags: Tags,
    /// The composite type PostgreSQL defines for the rows of this table.
    #[serde(rename = "type", default)]
    pub ty: Option<TypeIntrospection>,
}

impl ClassIntrospection {
    /// Load a table description from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        from_json(json)
    }

    /// The column called `name`, if there is one.
    pub fn attribute(&self, name: &str) -> Option<&AttributeIntrospection> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// The database object behind a single GraphQL field.
///
/// For a column field this describes the column itself. For a forward relation field it describes
/// the foreign key constraint, whose `key_attribute_nums` identify the constrained columns of
/// `class`. Columns have no key at all, which is distinct from a constraint with an empty key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIntrospection {
    pub name: String,
    #[serde(default)]
    pub is_not_null: bool,
    #[serde(default)]
    pub tags: Tags,
    /// The table owning the column or constraint.
    pub class: Arc<ClassIntrospection>,
    /// The columns making up a foreign key, in key order. Absent for anything but a constraint.
    #[serde(default)]
    pub key_attribute_nums: Option<Vec<AttributeNum>>,
    #[serde(rename = "type", default)]
    pub ty: Option<TypeIntrospection>,
}

impl FieldIntrospection {
    /// Describe the column `attr` of `class`.
    pub fn column(class: Arc<ClassIntrospection>, attr: &AttributeIntrospection) -> Self {
        Self {
            name: attr.name.clone(),
            is_not_null: attr.is_not_null,
            tags: attr.tags.clone(),
            class,
            key_attribute_nums: None,
            ty: Some(attr.ty.clone()),
        }
    }

    /// Describe a foreign key constraint called `name` on the columns `key` of `class`.
    pub fn foreign_key(
        class: Arc<ClassIntrospection>,
        name: impl Into<String>,
        key: impl IntoIterator<Item = AttributeNum>,
    ) -> Self {
        Self {
            name: name.into(),
            is_not_null: false,
            tags: Tags::default(),
            class,
            key_attribute_nums: Some(key.into_iter().collect()),
            ty: None,
        }
    }

    /// Replace the tags on this object.
    pub fn with_tags(self, tags: Tags) -> Self {
        Self { tags, ..self }
    }

    /// Load a field description from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        from_json(json)
    }

    /// The columns of the owning table which make up this object's foreign key.
    ///
    /// Returns [`None`] if this object is not a constraint and so has no key.
    pub fn key_attributes(&self) -> Option<impl Iterator<Item = &AttributeIntrospection>> {
        let key = self.key_attribute_nums.as_ref()?;
        Some(
            self.class
                .attributes
                .iter()
                .filter(move |attr| key.contains(&attr.num)),
        )
    }
}
