//! Circuit-layer error types.

use cf_core::{CfError, Node};
use thiserror::Error;

pub type CircuitResult<T> = Result<T, CircuitError>;

#[derive(Error, Debug)]
pub enum CircuitError {
    #[error("{op} needs at least {min} terminals, got {got}")]
    Arity {
        op: &'static str,
        min: usize,
        got: usize,
    },

    #[error("Device {device} has no free port left to wire")]
    NoFreePort { device: String },

    #[error("Terminals are already bound to different nodes ({a} and {b})")]
    NetConflict { a: Node, b: Node },

    #[error("Port {port} of {device} has no node assigned")]
    UnwiredPort { device: String, port: usize },

    #[error("Device {device} has no port {port}")]
    PortOutOfRange { device: String, port: usize },

    #[error("{device} has no port named '{name}'")]
    UnknownPortName { device: String, name: String },

    #[error("No device with index {index}")]
    UnknownDevice { index: u32 },

    #[error("Piecewise-linear drive needs at least one time/value pair")]
    EmptyPwl,

    #[error("Subcircuit '{model}' declares no ports")]
    EmptySubcircuit { model: String },

    #[error("No simulation outcome loaded")]
    NotSimulated,

    #[error("No simulation result for node {node}")]
    NoResult { node: Node },

    #[error("No simulation result for branch '{branch}'")]
    NoBranch { branch: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CircuitError> for CfError {
    fn from(err: CircuitError) -> Self {
        match err {
            CircuitError::Io(e) => CfError::Io(e),
            other => CfError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
