//! External netlistsvg invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use cf_circuit::Circuit;
use tracing::debug;

use crate::descriptor::descriptor;
use crate::error::{RenderError, RenderResult};

fn default_path() -> String {
    std::env::var("NETLISTSVG").unwrap_or_else(|_| "netlistsvg".to_string())
}

/// Handle to a netlistsvg installation.
pub struct Netlistsvg {
    path: PathBuf,
}

impl Netlistsvg {
    /// Locate netlistsvg via the `NETLISTSVG` environment variable, falling
    /// back to `netlistsvg` on PATH, and verify it runs.
    pub fn discover() -> RenderResult<Self> {
        let renderer = Self::from_path(default_path());
        renderer.check()?;
        Ok(renderer)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn check(&self) -> RenderResult<()> {
        match Command::new(&self.path).arg("--help").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(RenderError::RendererNotFound {
                path: self.path.to_string_lossy().into_owned(),
                reason: format!("--help exited with {}", output.status),
            }),
            Err(e) => Err(RenderError::RendererNotFound {
                path: self.path.to_string_lossy().into_owned(),
                reason: e.to_string(),
            }),
        }
    }

    /// Render a wired circuit to SVG bytes.
    ///
    /// Writes the descriptor JSON to a temp directory, runs the renderer,
    /// and reads the image back; nothing persists past the call.
    pub fn render_svg(&self, circuit: &Circuit) -> RenderResult<Vec<u8>> {
        let doc = descriptor(circuit)?;
        let json = serde_json::to_string_pretty(&doc)?;

        let dir = tempfile::tempdir()?;
        let input = dir.path().join("schematic.json");
        let output = dir.path().join("schematic.svg");
        std::fs::write(&input, json)?;

        debug!(path = %self.path.display(), input = %input.display(), "invoking netlistsvg");
        let result = Command::new(&self.path)
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .output()?;

        if !result.status.success() {
            return Err(RenderError::ProcessFailed {
                program: "netlistsvg",
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        if !output.exists() {
            return Err(RenderError::MissingArtifact { path: output });
        }

        Ok(std::fs::read(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_reports_not_found() {
        let renderer = Netlistsvg::from_path("/nonexistent/netlistsvg-binary");
        assert!(matches!(
            renderer.check(),
            Err(RenderError::RendererNotFound { .. })
        ));
    }
}
