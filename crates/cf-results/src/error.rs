//! Result-layer error types.

use thiserror::Error;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Vector name '{name}' does not match the kind(token) shape")]
    MalformedVectorName { name: String },

    #[error("Vector '{name}' carries no data")]
    EmptyVector { name: String },

    #[error("Unsupported result format: {what}")]
    UnsupportedFormat { what: String },

    #[error("Result artifact syntax error at line {line}: {what}")]
    ArtifactSyntax { line: usize, what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
