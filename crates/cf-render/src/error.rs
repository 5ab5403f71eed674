//! Render-layer error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Port '{pin}' of {device} has no node assigned; wire the circuit before rendering")]
    UnwiredPort { device: String, pin: String },

    #[error(
        "netlistsvg not runnable at '{path}': {reason}. Set the NETLISTSVG \
         environment variable to point at the binary."
    )]
    RendererNotFound { path: String, reason: String },

    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Renderer produced no image at {}", path.display())]
    MissingArtifact { path: PathBuf },

    #[error("Descriptor serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
