//! Service layer for sqlgen
//!
//! Coordinates the designer pipeline with a live database connection.
//! Services return structured errors while keeping a friendly message for
//! display, and never leave preview tables behind.

mod error;
mod generation_service;
mod settings;

pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use generation_service::{
    EXECUTION_ERROR_HEADER, GenerationPhase, GenerationReport, SchemaGenerationService,
};
pub use settings::{GeneratorSettings, config_dir};
