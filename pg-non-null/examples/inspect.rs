use clap::Parser;
use convert_case::{Case, Casing};
use pg_non_null::{introspection, prelude::*};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

////////////////////////////////////////////////////////////////////////////////////////////////////
// Table description
//

/// A table and the forward relations generated for it.
#[derive(Clone, Debug, Deserialize)]
pub struct Table {
    table: ClassIntrospection,
    #[serde(default)]
    relations: Vec<Relation>,
}

/// A forward relation following a foreign key of the table.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    name: String,
    constraint: String,
    key_attribute_nums: Vec<i16>,
    /// The object type of the referenced table.
    target: String,
    #[serde(default)]
    tags: Tags,
}

/// The GraphQL scalar used for columns of the PostgreSQL type `pg_type`.
fn scalar(pg_type: &str) -> &'static str {
    match pg_type {
        "int2" | "int4" => TypeRef::INT,
        "float4" | "float8" | "numeric" => TypeRef::FLOAT,
        "bool" => TypeRef::BOOLEAN,
        _ => TypeRef::STRING,
    }
}

/// Finalize the fields of the object type generated for `table`.
pub fn fields(table: Table, pipeline: &Pipeline) -> Vec<FieldDescriptor> {
    let class = Arc::new(table.table);

    let columns = class
        .attributes
        .iter()
        .map(|attr| FieldIntrospection::column(class.clone(), attr))
        .collect::<Vec<_>>();
    let constraints = table
        .relations
        .iter()
        .map(|rel| {
            FieldIntrospection::foreign_key(
                class.clone(),
                &rel.constraint,
                rel.key_attribute_nums.iter().copied(),
            )
            .with_tags(rel.tags.clone())
        })
        .collect::<Vec<_>>();

    let column_fields = columns.iter().map(|column| {
        let ty = column
            .ty
            .as_ref()
            .map_or(TypeRef::STRING, |ty| scalar(&ty.name));
        (
            FieldDescriptor::new(column.name.to_case(Case::Camel), TypeRef::named(ty)),
            Context::for_field(column),
        )
    });
    let relation_fields = table.relations.iter().zip(&constraints).map(|(rel, fk)| {
        (
            FieldDescriptor::new(&rel.name, TypeRef::named(&rel.target)),
            Context::for_forward_relation(fk),
        )
    });
    pipeline.apply_all(column_fields.chain(relation_fields))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Command line
//

#[derive(Clone, Debug, Parser)]
pub struct Options {
    /// JSON file describing the table.
    #[clap(
        env = "EXAMPLE_TABLE",
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/blog.json")
    )]
    table: PathBuf,

    #[clap(flatten)]
    stages: pg_non_null::plugins::Options,
}

fn main() -> color_eyre::Result<()> {
    pg_non_null::init_logging();
    let opt = Options::parse();

    let table: Table = introspection::from_file(&opt.table)?;
    let pipeline = Pipeline::from_options(opt.stages);
    tracing::info!(table = %table.table.name, stages = ?pipeline.stages(), "finalizing fields");

    for field in fields(table, &pipeline) {
        println!("{}: {}", field.name(), field.ty());
    }
    Ok(())
}
