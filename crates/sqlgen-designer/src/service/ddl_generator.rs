//! DDL generation for resolved schemas
//!
//! Produces an ordered [`DdlScript`]: one `CREATE TABLE` per declared table
//! in declaration order, followed by one per join table. Foreign keys are
//! rendered inline in the owning table, so no separate `ALTER TABLE`
//! statements are needed. Statement boundaries are kept as structured
//! [`DdlStatement`] values; the rendered text is only for display.

use std::fmt;

use crate::models::{ForeignKeyDesign, ResolvedColumn, ResolvedSchema, ResolvedTable};

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    CreateTable,
    CreateJoinTable,
    DropTable,
}

/// A single executable statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlStatement {
    pub kind: StatementKind,
    /// Table the statement creates or drops
    pub table: String,
    /// Statement text, terminated by `;`
    pub sql: String,
}

/// Ordered statements for one schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DdlScript {
    statements: Vec<DdlStatement>,
}

impl DdlScript {
    pub fn statements(&self) -> &[DdlStatement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DdlStatement> {
        self.statements.iter()
    }

    /// Script text: every statement followed by a blank line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DdlScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}\n\n", statement.sql)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DdlScript {
    type Item = &'a DdlStatement;
    type IntoIter = std::slice::Iter<'a, DdlStatement>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.iter()
    }
}

/// DDL Generator for creating SQL statements from resolved schemas
///
/// Stateless: every method is an associated function, and identical input
/// always renders identical text.
pub struct DdlGenerator;

impl DdlGenerator {
    /// Generate the creation script for a resolved schema
    pub fn generate(schema: &ResolvedSchema) -> DdlScript {
        let mut statements = Vec::with_capacity(schema.tables.len() + schema.join_tables.len());

        for table in &schema.tables {
            statements.push(DdlStatement {
                kind: StatementKind::CreateTable,
                table: table.name.clone(),
                sql: Self::generate_create_table(table),
            });
        }

        for table in &schema.join_tables {
            statements.push(DdlStatement {
                kind: StatementKind::CreateJoinTable,
                table: table.name.clone(),
                sql: Self::generate_create_table(table),
            });
        }

        tracing::debug!(statements = statements.len(), "generated DDL script");
        DdlScript { statements }
    }

    /// Generate CREATE TABLE statement
    pub fn generate_create_table(table: &ResolvedTable) -> String {
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(Self::generate_column_definition)
            .collect();

        let pk_columns = table.primary_key_columns();
        if !pk_columns.is_empty() {
            lines.push(format!("{}PRIMARY KEY ({})", INDENT, pk_columns.join(", ")));
        }

        for columns in &table.unique_constraints {
            lines.push(format!("{}UNIQUE ({})", INDENT, columns.join(", ")));
        }

        for fk in &table.foreign_keys {
            lines.push(Self::generate_foreign_key_constraint(fk));
        }

        format!("CREATE TABLE {} (\n{}\n);", table.name, lines.join(",\n"))
    }

    /// Generate DROP TABLE statement
    pub fn generate_drop_table(table_name: &str) -> DdlStatement {
        DdlStatement {
            kind: StatementKind::DropTable,
            table: table_name.to_string(),
            sql: format!("DROP TABLE IF EXISTS {};", table_name),
        }
    }

    fn generate_column_definition(column: &ResolvedColumn) -> String {
        let mut def = format!("{}{} {}", INDENT, column.name, column.data_type);

        if column.is_unique() {
            def.push_str(" UNIQUE");
        }

        if !column.nullable {
            def.push_str(" NOT NULL");
        }

        def
    }

    fn generate_foreign_key_constraint(fk: &ForeignKeyDesign) -> String {
        let mut constraint = String::from(INDENT);

        if let Some(ref name) = fk.name {
            constraint.push_str(&format!("CONSTRAINT {} ", name));
        }

        constraint.push_str(&format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            fk.columns.join(", "),
            fk.referenced_table,
            fk.referenced_columns.join(", ")
        ));

        constraint
    }
}
