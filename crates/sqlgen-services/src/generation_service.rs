//! Schema generation service
//!
//! Runs validate → resolve → render, then applies the script to the
//! connection as a preview: every table created during the run is dropped
//! again afterwards, whether execution succeeded or not. Tables that existed
//! before the run are never touched.
//!
//! Callers must serialize requests against the same database; concurrent
//! previews can race on table names.

use std::fmt;
use std::sync::Arc;

use sqlgen_core::Connection;
use sqlgen_designer::{
    DdlGenerator, DdlScript, RelationshipResolver, ResolverOptions, Schema, SchemaValidator,
    StatementKind,
};

use crate::error::{ServiceError, ServiceResult};

/// First line of every failure message returned by
/// [`SchemaGenerationService::generate_and_preview`]
pub const EXECUTION_ERROR_HEADER: &str = "Error while executing script:";

/// Lifecycle of a single generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationPhase {
    Idle,
    Validating,
    Resolving,
    Rendering,
    Executing,
    Committed,
    RolledBack,
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationPhase::Idle => "idle",
            GenerationPhase::Validating => "validating",
            GenerationPhase::Resolving => "resolving",
            GenerationPhase::Rendering => "rendering",
            GenerationPhase::Executing => "executing",
            GenerationPhase::Committed => "committed",
            GenerationPhase::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful preview run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub script: DdlScript,
    /// Number of statements the database accepted
    pub executed: usize,
    /// Tables dropped during cleanup, in drop order
    pub dropped: Vec<String>,
}

/// Service for generating and previewing schema DDL
pub struct SchemaGenerationService {
    connection: Arc<dyn Connection>,
    options: ResolverOptions,
}

impl SchemaGenerationService {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    fn enter(phase: GenerationPhase) {
        tracing::debug!(%phase, "generation phase");
    }

    /// Render the script without touching the database
    pub fn render(&self, schema: &Schema) -> ServiceResult<DdlScript> {
        let result = self.render_inner(schema);
        if result.is_err() {
            Self::enter(GenerationPhase::Idle);
        }
        result
    }

    fn render_inner(&self, schema: &Schema) -> ServiceResult<DdlScript> {
        Self::enter(GenerationPhase::Validating);
        SchemaValidator::validate(schema).map_err(ServiceError::Validation)?;

        Self::enter(GenerationPhase::Resolving);
        let resolved = RelationshipResolver::new(schema, self.options)
            .resolve()
            .map_err(ServiceError::Resolution)?;

        Self::enter(GenerationPhase::Rendering);
        Ok(DdlGenerator::generate(&resolved))
    }

    /// Generate the script, apply it, then drop every table it created
    #[tracing::instrument(skip(self, schema), fields(tables = schema.tables.len()))]
    pub async fn generate(&self, schema: &Schema) -> ServiceResult<GenerationReport> {
        let script = self.render(schema)?;

        Self::enter(GenerationPhase::Executing);
        let mut created: Vec<&str> = Vec::new();
        let mut failure = None;

        for (index, statement) in script.iter().enumerate() {
            tracing::debug!("Executing DDL:\n{}", statement.sql);
            match self.connection.execute(&statement.sql).await {
                Ok(_) => {
                    if matches!(
                        statement.kind,
                        StatementKind::CreateTable | StatementKind::CreateJoinTable
                    ) {
                        created.push(&statement.table);
                    }
                }
                Err(source) => {
                    tracing::warn!(table = %statement.table, error = %source, "statement rejected");
                    failure = Some(ServiceError::Execution {
                        index,
                        table: statement.table.clone(),
                        statement: statement.sql.clone(),
                        source,
                    });
                    break;
                }
            }
        }
        let executed = created.len();

        let phase = if failure.is_some() {
            GenerationPhase::RolledBack
        } else {
            GenerationPhase::Committed
        };
        Self::enter(phase);

        let (dropped, leftover) = self.drop_created(&created).await;
        Self::enter(GenerationPhase::Idle);

        if let Some(error) = failure {
            if !leftover.is_empty() {
                tracing::error!(tables = ?leftover, "preview tables left behind after failed run");
            }
            return Err(error);
        }
        if !leftover.is_empty() {
            return Err(ServiceError::Cleanup { tables: leftover });
        }

        tracing::info!(statements = executed, "Schema script previewed successfully");
        Ok(GenerationReport {
            script,
            executed,
            dropped,
        })
    }

    /// Drop tables in reverse creation order, so join tables go before the
    /// tables they reference. Returns the dropped and the failed table names.
    async fn drop_created(&self, created: &[&str]) -> (Vec<String>, Vec<String>) {
        let mut dropped = Vec::with_capacity(created.len());
        let mut failed = Vec::new();

        for table in created.iter().rev() {
            let statement = DdlGenerator::generate_drop_table(table);
            match self.connection.execute(&statement.sql).await {
                Ok(_) => dropped.push(statement.table),
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "failed to drop preview table");
                    failed.push(statement.table);
                }
            }
        }

        (dropped, failed)
    }

    /// Total variant of [`generate`](Self::generate): the script text on
    /// success, otherwise a friendly message starting with
    /// [`EXECUTION_ERROR_HEADER`]
    pub async fn generate_and_preview(&self, schema: &Schema) -> String {
        match self.generate(schema).await {
            Ok(report) => report.script.render(),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "schema generation failed");
                format!("{}\n{}", EXECUTION_ERROR_HEADER, e)
            }
        }
    }
}
