use thiserror::Error;

/// Errors raised while transforming or synthesizing phenotype artifacts.
///
/// All variants are recoverable at the unit-of-work level: the pipelines log
/// a warning and move on to the next dataset or output entry.
#[derive(Debug, Error)]
pub enum PhenoError {
    #[error("unknown calculation: {0}")]
    UnknownOperation(String),
    #[error("variable not found: {0}")]
    VariableNotFound(String),
    #[error("cannot rename {from} to {to}: {to} already exists")]
    RenameCollision { from: String, to: String },
    #[error("column already exists: {0}")]
    DuplicateColumn(String),
    #[error("value {value:?} in {variable} is not numeric")]
    NotNumeric { variable: String, value: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, PhenoError>;
