//! sqlgen command-line interface
//!
//! Reads a JSON schema description, previews the generated DDL against a
//! SQLite database and prints the script. The database is left exactly as
//! it was found.
//!
//! Usage examples:
//!   sqlgen schema.json
//!   sqlgen schema.json --render-only
//!   sqlgen schema.json --database ./preview.db --pairing required
//!   cat schema.json | sqlgen -

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use sqlgen_core::Connection;
use sqlgen_designer::{ManyToManyPairing, Schema, compile};
use sqlgen_driver_sqlite::SqliteConnection;
use sqlgen_services::{
    EXECUTION_ERROR_HEADER, GeneratorSettings, SchemaGenerationService, ServiceError,
};

#[derive(Parser, Debug)]
#[command(
    name = "sqlgen",
    version,
    about = "Generate SQL DDL from a schema description"
)]
struct Cli {
    /// Schema description in JSON; `-` reads from stdin
    schema: PathBuf,

    /// Settings file (defaults to <config dir>/sqlgen/config.toml)
    #[arg(long, env = "SQLGEN_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database used for the preview run
    #[arg(long)]
    database: Option<String>,

    /// Print the script without executing it
    #[arg(long)]
    render_only: bool,

    /// Whether many-to-many relationships must be declared from both sides
    #[arg(long, value_enum)]
    pairing: Option<PairingArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PairingArg {
    Optional,
    Required,
}

impl From<PairingArg> for ManyToManyPairing {
    fn from(arg: PairingArg) -> Self {
        match arg {
            PairingArg::Optional => ManyToManyPairing::Optional,
            PairingArg::Required => ManyToManyPairing::Required,
        }
    }
}

impl Cli {
    fn settings(&self) -> Result<GeneratorSettings> {
        let mut settings = match &self.config {
            Some(path) => GeneratorSettings::load(path)?,
            None => GeneratorSettings::load_default()?,
        };
        if let Some(database) = &self.database {
            settings.database = database.clone();
        }
        if let Some(pairing) = self.pairing {
            settings.many_to_many_pairing = pairing.into();
        }
        Ok(settings)
    }
}

fn read_schema(path: &Path) -> Result<Schema> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read schema from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema from {:?}", path))?
    };
    serde_json::from_str(&content).context("Failed to parse schema description")
}

fn report_failure(error: &ServiceError) -> ExitCode {
    tracing::debug!(kind = ?error.kind(), "generation failed");
    eprintln!("{}\n{}", EXECUTION_ERROR_HEADER, error);
    ExitCode::FAILURE
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = cli.settings()?;
    logging::init(&settings.log_filter)?;

    let schema = read_schema(&cli.schema)?;
    tracing::info!(
        tables = schema.tables.len(),
        relationships = schema.relationships.len(),
        "Schema loaded"
    );

    if cli.render_only {
        return Ok(match compile(&schema, settings.resolver_options()) {
            Ok(script) => {
                print!("{}", script);
                ExitCode::SUCCESS
            }
            Err(e) => report_failure(&e.into()),
        });
    }

    let connection = Arc::new(
        SqliteConnection::open(&settings.database)
            .with_context(|| format!("Failed to open database '{}'", settings.database))?,
    );
    let service = SchemaGenerationService::new(connection.clone())
        .with_options(settings.resolver_options());

    let code = match service.generate(&schema).await {
        Ok(report) => {
            print!("{}", report.script);
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(&e),
    };

    connection.close().await?;
    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
