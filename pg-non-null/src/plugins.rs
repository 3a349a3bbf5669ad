//! Field stages deciding nullability, and the pipeline composing them.
//!
//! There are two independent rules:
//! * [`relations`] infers that a forward relation is non-null from its foreign key columns.
//! * [`smart_comment`] applies explicit `@nonNull` tags.
//!
//! A [`Pipeline`] runs every field the host is finalizing through each enabled stage in turn.
//! Either stage may promote a field to non-null and neither ever makes a field nullable again, so
//! the final verdict is the disjunction of the two rules, whatever order they run in.

use crate::{context::Context, graphql::FieldDescriptor};
use derive_more::Display;

pub mod relations;
pub mod smart_comment;

/// A single field-finalization stage.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Apply `@nonNull` smart comments.
    #[display(fmt = "smart-comment")]
    SmartComment,
    /// Infer non-null forward relations from foreign key constraints.
    #[display(fmt = "relations")]
    Relations,
}

impl Stage {
    /// Run this stage on `field`.
    pub fn apply(self, field: FieldDescriptor, context: &Context) -> FieldDescriptor {
        match self {
            Self::SmartComment => smart_comment::transform(field, context),
            Self::Relations => relations::transform(field, context),
        }
    }
}

/// Which stages to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct Options {
    /// Make forward relations non-null when their foreign key columns are NOT NULL.
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            env = "PG_NON_NULL_RELATIONS",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    pub relations: bool,

    /// Honor `@nonNull` smart comments on columns, tables and row types.
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            env = "PG_NON_NULL_SMART_COMMENTS",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    pub smart_comments: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            relations: true,
            smart_comments: true,
        }
    }
}

/// An ordered list of stages through which every field is passed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_options(Options::default())
    }
}

impl Pipeline {
    /// A pipeline with no stages, which passes every field through unchanged.
    pub fn new() -> Self {
        Self { stages: vec![] }
    }

    /// A pipeline running the stages enabled in `options`.
    ///
    /// Smart comments run before relation inference.
    pub fn from_options(options: Options) -> Self {
        let mut pipeline = Self::new();
        if options.smart_comments {
            pipeline = pipeline.stage(Stage::SmartComment);
        }
        if options.relations {
            pipeline = pipeline.stage(Stage::Relations);
        }
        pipeline
    }

    /// Append a stage to the end of this pipeline.
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Finalize a single field.
    pub fn apply(&self, field: FieldDescriptor, context: &Context) -> FieldDescriptor {
        self.stages
            .iter()
            .fold(field, |field, stage| stage.apply(field, context))
    }

    /// Finalize every field of an object type.
    pub fn apply_all<'a, I>(&self, fields: I) -> Vec<FieldDescriptor>
    where
        I: IntoIterator<Item = (FieldDescriptor, Context<'a>)>,
    {
        fields
            .into_iter()
            .map(|(field, context)| self.apply(field, &context))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        graphql::{Nullability, TypeRef},
        introspection::{
            AttributeIntrospection, ClassIntrospection, FieldIntrospection, TagValue, Tags,
        },
    };
    use proptest::prelude::*;
    use std::sync::Arc;

    fn column(num: i16, name: &str, is_not_null: bool) -> AttributeIntrospection {
        AttributeIntrospection {
            num,
            name: name.into(),
            is_not_null,
            ..Default::default()
        }
    }

    fn post(author_id_not_null: bool, tags: Tags) -> Arc<ClassIntrospection> {
        Arc::new(ClassIntrospection {
            name: "post".into(),
            attributes: vec![
                column(1, "id", true),
                column(2, "author_id", author_id_not_null),
            ],
            tags,
            ty: None,
        })
    }

    fn author(ty: TypeRef) -> FieldDescriptor {
        FieldDescriptor::new("author", ty)
    }

    #[test]
    fn test_default_pipeline() {
        assert_eq!(
            Pipeline::default().stages(),
            [Stage::SmartComment, Stage::Relations]
        );
        assert_eq!(
            Pipeline::from_options(Options {
                relations: false,
                smart_comments: true
            })
            .stages(),
            [Stage::SmartComment]
        );
        assert!(Pipeline::from_options(Options {
            relations: false,
            smart_comments: false
        })
        .stages()
        .is_empty());
    }

    #[test]
    fn test_forward_relation_not_null() {
        let class = post(true, Tags::default());
        let fk = FieldIntrospection::foreign_key(class, "post_author_id_fkey", [2]);
        let field = Pipeline::default().apply(
            author(TypeRef::named("User")),
            &Context::for_forward_relation(&fk),
        );
        assert_eq!(field, author(TypeRef::named("User").non_null()));
    }

    #[test]
    fn test_field_tag_overrides_nullable_column() {
        let class = post(false, Tags::default());
        let nickname = FieldIntrospection::column(class.clone(), &column(3, "nickname", false))
            .with_tags(Tags::default().with("nonNull", true));
        let field = Pipeline::default().apply(
            FieldDescriptor::new("nickname", TypeRef::named(TypeRef::STRING)),
            &Context::for_field(&nickname),
        );
        assert!(field.is_non_null());
    }

    #[test]
    fn test_not_database_backed() {
        let context = Context::new().forward_relation(true);
        let field = author(TypeRef::named("User"));
        for stage in [Stage::SmartComment, Stage::Relations] {
            assert_eq!(stage.apply(field.clone(), &context), field);
        }
        assert_eq!(Pipeline::default().apply(field.clone(), &context), field);
    }

    #[test]
    fn test_both_rules_fire() {
        // The constraint is tagged and its key is not null, so both stages promote the field. The
        // result must still be a single non-null wrapper, in either order.
        let class = post(true, Tags::default());
        let fk = FieldIntrospection::foreign_key(class, "post_author_id_fkey", [2])
            .with_tags(Tags::default().with("nonNull", true));
        let context = Context::for_forward_relation(&fk);
        let expected = author(TypeRef::named("User").non_null());

        assert_eq!(
            Pipeline::default().apply(author(TypeRef::named("User")), &context),
            expected
        );
        let reversed = Pipeline::new()
            .stage(Stage::Relations)
            .stage(Stage::SmartComment);
        assert_eq!(reversed.apply(author(TypeRef::named("User")), &context), expected);
    }

    #[test]
    fn test_apply_all() {
        let class = post(
            false,
            Tags::default().with("nonNull", vec!["title".to_string()]),
        );
        let fk = FieldIntrospection::foreign_key(class.clone(), "post_author_id_fkey", [2]);
        let title = FieldIntrospection::column(class.clone(), &column(3, "title", false));
        let body = FieldIntrospection::column(class.clone(), &column(4, "body", false));

        let fields = Pipeline::default().apply_all([
            (author(TypeRef::named("User")), Context::for_forward_relation(&fk)),
            (
                FieldDescriptor::new("title", TypeRef::named(TypeRef::STRING)),
                Context::for_field(&title),
            ),
            (
                FieldDescriptor::new("body", TypeRef::named(TypeRef::STRING)),
                Context::for_field(&body),
            ),
            (
                FieldDescriptor::new("wordCount", TypeRef::named(TypeRef::INT)),
                Context::new(),
            ),
        ]);
        assert_eq!(
            fields
                .iter()
                .map(|field| (field.name(), field.ty().to_string()))
                .collect::<Vec<_>>(),
            [
                ("author", "User".to_string()),
                ("title", "String!".to_string()),
                ("body", "String".to_string()),
                ("wordCount", "Int".to_string()),
            ]
        );
    }

    /// A forward relation over a two column key, with arbitrary constraints and tags.
    #[derive(Clone, Debug)]
    struct Relation {
        key_not_null: (bool, bool),
        constraint_tag: Option<TagValue>,
        class_tag: Option<TagValue>,
        forward: bool,
        introspected: bool,
        already_non_null: bool,
    }

    fn tag_value() -> impl Strategy<Value = Option<TagValue>> {
        prop_oneof![
            Just(None),
            any::<bool>().prop_map(|flag| Some(TagValue::Flag(flag))),
            prop_oneof![Just("membership_fkey"), Just("other_fkey")]
                .prop_map(|name| Some(TagValue::from(name))),
            proptest::collection::vec(
                prop_oneof![Just("membership_fkey".to_string()), Just("other_fkey".to_string())],
                0..3
            )
            .prop_map(|names| Some(TagValue::from(names))),
        ]
    }

    fn relation() -> impl Strategy<Value = Relation> {
        (
            any::<(bool, bool)>(),
            tag_value(),
            tag_value(),
            any::<bool>(),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(
                |(key_not_null, constraint_tag, class_tag, forward, introspected, non_null)| {
                    Relation {
                        key_not_null,
                        constraint_tag,
                        class_tag,
                        forward,
                        introspected,
                        already_non_null: non_null,
                    }
                },
            )
    }

    impl Relation {
        fn introspection(&self) -> FieldIntrospection {
            let mut class_tags = Tags::default();
            if let Some(tag) = &self.class_tag {
                class_tags = class_tags.with("nonNull", tag.clone());
            }
            let mut constraint_tags = Tags::default();
            if let Some(tag) = &self.constraint_tag {
                constraint_tags = constraint_tags.with("nonNull", tag.clone());
            }

            let class = Arc::new(ClassIntrospection {
                name: "membership".into(),
                attributes: vec![
                    column(1, "org_id", self.key_not_null.0),
                    column(2, "user_id", self.key_not_null.1),
                ],
                tags: class_tags,
                ty: None,
            });
            FieldIntrospection::foreign_key(class, "membership_fkey", [1, 2])
                .with_tags(constraint_tags)
        }

        fn context<'a>(&self, introspection: &'a FieldIntrospection) -> Context<'a> {
            let context = Context::new().forward_relation(self.forward);
            if self.introspected {
                context.field(introspection).class(&introspection.class)
            } else {
                context
            }
        }

        fn field(&self) -> FieldDescriptor {
            let ty = TypeRef::named("Org");
            author(if self.already_non_null { ty.non_null() } else { ty })
        }
    }

    proptest! {
        #[test]
        fn test_verdict_is_disjunction(relation in relation()) {
            let introspection = relation.introspection();
            let context = relation.context(&introspection);
            let field = relation.field();

            let by_relations = Stage::Relations.apply(field.clone(), &context).is_non_null();
            let by_tags = Stage::SmartComment.apply(field.clone(), &context).is_non_null();
            let result = Pipeline::default().apply(field.clone(), &context);

            prop_assert_eq!(result.is_non_null(), by_relations || by_tags);
            // Never less strict than the input.
            prop_assert!(result.is_non_null() || !field.is_non_null());
            // Nothing but the type changes, and it is only ever wrapped once.
            prop_assert_eq!(result.ty().clone().nullable(), TypeRef::named("Org"));
            prop_assert_eq!(result.name(), field.name());
        }

        #[test]
        fn test_order_independent(relation in relation()) {
            let introspection = relation.introspection();
            let context = relation.context(&introspection);
            let reversed = Pipeline::new().stage(Stage::Relations).stage(Stage::SmartComment);

            prop_assert_eq!(
                Pipeline::default().apply(relation.field(), &context),
                reversed.apply(relation.field(), &context)
            );
        }

        #[test]
        fn test_idempotent(relation in relation()) {
            let introspection = relation.introspection();
            let context = relation.context(&introspection);
            let pipeline = Pipeline::default();

            let once = pipeline.apply(relation.field(), &context);
            prop_assert_eq!(pipeline.apply(once.clone(), &context), once);
        }

        #[test]
        fn test_pass_through_without_introspection(relation in relation()) {
            let context = Context::new().forward_relation(relation.forward);
            prop_assert_eq!(
                Pipeline::default().apply(relation.field(), &context),
                relation.field()
            );
        }
    }
}
