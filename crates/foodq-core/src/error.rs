use foodq_model::ConfigError;
use foodq_standards::SchemaError;
use thiserror::Error;

/// Failures that prevent the engine from starting. No record is processed
/// after one of these.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to load schema: {0}")]
    Schema(#[from] SchemaError),
}
