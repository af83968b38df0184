//! Service layer for schema design
//!
//! Validation, relationship resolution and DDL generation. Each stage is a
//! pure function of its input; [`compile`] runs all three in order.

mod ddl_generator;
mod resolver;
mod validator;

pub use ddl_generator::{DdlGenerator, DdlScript, DdlStatement, StatementKind};
pub use resolver::{ManyToManyPairing, RelationshipResolver, ResolverOptions, join_table_name};
pub use validator::{RESERVED_KEYWORDS, SchemaValidator, is_reserved_keyword};

use crate::error::DesignError;
use crate::models::Schema;

/// Validate, resolve and render a schema without touching any database
pub fn compile(schema: &Schema, options: ResolverOptions) -> Result<DdlScript, DesignError> {
    SchemaValidator::validate(schema).map_err(DesignError::Validation)?;
    let resolved = RelationshipResolver::new(schema, options)
        .resolve()
        .map_err(DesignError::Resolution)?;
    Ok(DdlGenerator::generate(&resolved))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NameScope, SchemaError};
    use crate::models::{Field, Relationship, Table};

    #[test]
    fn test_compile_rejects_reserved_name_before_resolution() {
        let schema = Schema::new()
            .with_table(Table::new("t1", "Order").with_field(Field::named("id").bigint()))
            .with_relationship(Relationship::one_to_many("r1", "Order", "Order"));

        match compile(&schema, ResolverOptions::default()) {
            Err(DesignError::Validation(errors)) => assert_eq!(
                errors.first(),
                &SchemaError::NameConflict {
                    name: "Order".into(),
                    scope: NameScope::Table,
                }
            ),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_reports_resolution_failure() {
        let schema = Schema::new()
            .with_table(Table::new("t1", "Tag").with_field(Field::named("label")))
            .with_table(Table::new("t2", "Post").with_field(Field::named("id").bigint().primary_key()))
            .with_relationship(Relationship::many_to_many("r1", "Post", "Tag"));

        assert!(matches!(
            compile(&schema, ResolverOptions::default()),
            Err(DesignError::Resolution(SchemaError::MissingPrimaryKey { table, .. })) if table == "Tag"
        ));
    }
}
