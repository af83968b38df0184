use sqlgen_core::SqlgenError;
use sqlgen_designer::{DesignError, SchemaError, ValidationErrors};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse category of a failure, for callers that branch on the cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A table or field name is a reserved keyword
    NameConflict,
    /// A relationship needs a primary key that does not exist
    MissingPrimaryKey,
    /// A many-to-many relationship was declared from one side only
    MissingInverseRelationship,
    /// Any other problem with the schema description
    InvalidSchema,
    /// The database rejected a statement
    Execution,
}

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Resolution(SchemaError),

    #[error("Failed to create table '{table}': {source}")]
    Execution {
        /// Position of the failing statement in the script
        index: usize,
        table: String,
        statement: String,
        #[source]
        source: SqlgenError,
    },

    #[error("Failed to drop preview tables: {}", .tables.join(", "))]
    Cleanup { tables: Vec<String> },
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(errors) => schema_error_kind(errors.first()),
            ServiceError::Resolution(error) => schema_error_kind(error),
            ServiceError::Execution { .. } | ServiceError::Cleanup { .. } => ErrorKind::Execution,
        }
    }
}

fn schema_error_kind(error: &SchemaError) -> ErrorKind {
    match error {
        SchemaError::NameConflict { .. } => ErrorKind::NameConflict,
        SchemaError::MissingPrimaryKey { .. } => ErrorKind::MissingPrimaryKey,
        SchemaError::MissingInverseRelationship { .. } => ErrorKind::MissingInverseRelationship,
        _ => ErrorKind::InvalidSchema,
    }
}

impl From<DesignError> for ServiceError {
    fn from(error: DesignError) -> Self {
        match error {
            DesignError::Validation(errors) => ServiceError::Validation(errors),
            DesignError::Resolution(error) => ServiceError::Resolution(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_designer::NameScope;

    #[test]
    fn test_kind_follows_first_validation_issue() {
        let errors = ValidationErrors::from_vec(vec![
            SchemaError::EmptyTable("Log".into()),
            SchemaError::NameConflict {
                name: "order".into(),
                scope: NameScope::Table,
            },
        ])
        .expect("non-empty");

        assert_eq!(
            ServiceError::Validation(errors).kind(),
            ErrorKind::InvalidSchema
        );
    }

    #[test]
    fn test_kind_of_resolution_errors() {
        let missing_key = ServiceError::from(DesignError::Resolution(
            SchemaError::MissingPrimaryKey {
                table: "Tag".into(),
                relationship: "r1".into(),
            },
        ));
        assert_eq!(missing_key.kind(), ErrorKind::MissingPrimaryKey);

        let unpaired = ServiceError::Resolution(SchemaError::MissingInverseRelationship {
            relationship: "r1".into(),
            source_table: "Book".into(),
            target_table: "author".into(),
        });
        assert_eq!(unpaired.kind(), ErrorKind::MissingInverseRelationship);
    }

    #[test]
    fn test_execution_error_message() {
        let error = ServiceError::Execution {
            index: 1,
            table: "Book".into(),
            statement: "CREATE TABLE Book (\n    id BIGINT\n);".into(),
            source: SqlgenError::Query("table Book already exists".into()),
        };

        assert_eq!(
            error.to_string(),
            "Failed to create table 'Book': Query error: table Book already exists"
        );
        assert_eq!(error.kind(), ErrorKind::Execution);
    }

    #[test]
    fn test_cleanup_error_lists_tables() {
        let error = ServiceError::Cleanup {
            tables: vec!["author_Book".into(), "Book".into()],
        };

        assert_eq!(
            error.to_string(),
            "Failed to drop preview tables: author_Book, Book"
        );
    }
}
