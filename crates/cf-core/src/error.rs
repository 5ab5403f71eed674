use thiserror::Error;

pub type CfResult<T> = Result<T, CfError>;

#[derive(Error, Debug)]
pub enum CfError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
