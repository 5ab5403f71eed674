//! Simulation-layer error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use cf_circuit::CircuitError;
use cf_results::ResultsError;
use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(
        "ngspice not runnable at '{path}': {reason}. Set the NGSPICE environment \
         variable to point at the binary. {hint}"
    )]
    NgspiceNotFound {
        path: String,
        reason: String,
        hint: &'static str,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Simulator produced no result artifact at {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error(transparent)]
    Circuit(#[from] CircuitError),

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
