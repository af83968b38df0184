//! Tests for SchemaGenerationService against a mock connection

mod common;

use common::{MockConnection, id_field, library_schema};
use pretty_assertions::assert_eq;
use sqlgen_designer::{
    Field, ManyToManyPairing, Relationship, ResolverOptions, Schema, StatementKind, Table,
};
use sqlgen_services::{EXECUTION_ERROR_HEADER, ErrorKind, SchemaGenerationService, ServiceError};
use std::sync::Arc;

#[tokio::test]
async fn test_generate_executes_in_order_then_drops_in_reverse() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone());

    let report = service.generate(&library_schema()).await.unwrap();

    assert_eq!(report.executed, 4);
    assert_eq!(report.dropped, vec!["author_Book", "Publisher", "Book", "author"]);

    let log = mock.statement_log();
    assert_eq!(log.len(), 8);
    assert!(log[0].starts_with("CREATE TABLE author ("));
    assert!(log[1].starts_with("CREATE TABLE Book ("));
    assert!(log[2].starts_with("CREATE TABLE Publisher ("));
    assert!(log[3].starts_with("CREATE TABLE author_Book ("));
    assert_eq!(log[4], "DROP TABLE IF EXISTS author_Book;");
    assert_eq!(log[7], "DROP TABLE IF EXISTS author;");
    assert!(mock.tables().is_empty());
}

#[tokio::test]
async fn test_report_script_matches_render() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone());
    let schema = library_schema();

    let rendered = service.render(&schema).unwrap();
    let report = service.generate(&schema).await.unwrap();

    assert_eq!(report.script, rendered);
    assert_eq!(
        report.script.statements()[3].kind,
        StatementKind::CreateJoinTable
    );
    assert_eq!(
        service.generate_and_preview(&schema).await,
        rendered.render()
    );
}

#[tokio::test]
async fn test_render_does_not_touch_connection() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone());

    let script = service.render(&library_schema()).unwrap();

    assert_eq!(script.len(), 4);
    assert!(mock.statement_log().is_empty());
}

#[tokio::test]
async fn test_reserved_name_executes_nothing() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone());
    let schema = Schema::new().with_table(Table::new("t1", "Order").with_field(id_field()));

    let err = service.generate(&schema).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NameConflict);
    assert!(mock.statement_log().is_empty());
}

#[tokio::test]
async fn test_missing_primary_key_executes_nothing() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone());
    let schema = Schema::new()
        .with_table(Table::new("t1", "Publisher").with_field(Field::named("name").varchar(64)))
        .with_table(Table::new("t2", "Book").with_field(id_field()))
        .with_relationship(Relationship::one_to_many("r1", "Book", "Publisher"));

    let err = service.generate(&schema).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingPrimaryKey);
    assert!(mock.statement_log().is_empty());
}

#[tokio::test]
async fn test_failed_statement_rolls_back_created_tables() {
    let mock = Arc::new(
        MockConnection::new()
            .with_table("legacy")
            .failing_on("CREATE TABLE author_Book"),
    );
    let service = SchemaGenerationService::new(mock.clone());

    let err = service.generate(&library_schema()).await.unwrap_err();

    match &err {
        ServiceError::Execution { index, table, .. } => {
            assert_eq!(*index, 3);
            assert_eq!(table, "author_Book");
        }
        other => panic!("expected execution error, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(
        mock.statement_log()[4..].to_vec(),
        vec![
            "DROP TABLE IF EXISTS Publisher;",
            "DROP TABLE IF EXISTS Book;",
            "DROP TABLE IF EXISTS author;",
        ]
    );
    assert_eq!(mock.tables(), vec!["legacy"]);
}

#[tokio::test]
async fn test_clashing_preexisting_table_is_left_alone() {
    let mock = Arc::new(MockConnection::new().with_table("Book"));
    let service = SchemaGenerationService::new(mock.clone());

    let message = service.generate_and_preview(&library_schema()).await;

    assert!(message.starts_with(&format!("{}\n", EXECUTION_ERROR_HEADER)));
    assert!(message.contains("Failed to create table 'Book'"));
    assert_eq!(
        mock.statement_log().last().map(String::as_str),
        Some("DROP TABLE IF EXISTS author;")
    );
    assert_eq!(mock.tables(), vec!["Book"]);
}

#[tokio::test]
async fn test_cleanup_failure_after_success_is_reported() {
    let mock = Arc::new(MockConnection::new().failing_on("DROP TABLE IF EXISTS Book;"));
    let service = SchemaGenerationService::new(mock.clone());

    let err = service.generate(&library_schema()).await.unwrap_err();

    match err {
        ServiceError::Cleanup { tables } => assert_eq!(tables, vec!["Book"]),
        other => panic!("expected cleanup error, got {:?}", other),
    }
    assert_eq!(mock.tables(), vec!["Book"]);
}

#[tokio::test]
async fn test_cleanup_failure_does_not_mask_execution_error() {
    let mock = Arc::new(
        MockConnection::new()
            .failing_on("CREATE TABLE Publisher")
            .failing_on("DROP TABLE IF EXISTS author;"),
    );
    let service = SchemaGenerationService::new(mock.clone());

    let err = service.generate(&library_schema()).await.unwrap_err();

    assert!(matches!(err, ServiceError::Execution { index: 2, .. }));
}

#[tokio::test]
async fn test_required_pairing_rejects_one_sided_many_to_many() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock.clone())
        .with_options(ResolverOptions::default().with_pairing(ManyToManyPairing::Required));

    let err = service.generate(&library_schema()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingInverseRelationship);
    assert!(mock.statement_log().is_empty());

    let paired = library_schema().with_relationship(Relationship::many_to_many("r3", "author", "Book"));
    let report = service.generate(&paired).await.unwrap();
    assert_eq!(report.executed, 4);
}

#[tokio::test]
async fn test_validation_message_lists_every_issue() {
    let mock = Arc::new(MockConnection::new());
    let service = SchemaGenerationService::new(mock);
    let schema = Schema::new()
        .with_table(Table::new("t1", "select").with_field(id_field()))
        .with_table(Table::new("t2", "Log"));

    let message = service.generate_and_preview(&schema).await;

    assert_eq!(
        message,
        "Error while executing script:\nTable name 'select' is a reserved keyword.\nTable 'Log' declares no fields."
    );
}
