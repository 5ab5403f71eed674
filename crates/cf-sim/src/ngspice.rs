//! ngspice discovery and synchronous batch invocation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{SimError, SimResult};

fn default_path() -> String {
    std::env::var("NGSPICE").unwrap_or_else(|_| "ngspice".to_string())
}

fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "You can install it with: brew install ngspice"
    } else if cfg!(target_os = "windows") {
        "You can download it from: https://ngspice.sourceforge.io/download.html"
    } else {
        "You can install it with: sudo apt install ngspice"
    }
}

/// Handle to an ngspice installation.
pub struct Ngspice {
    path: PathBuf,
}

impl Ngspice {
    /// Locate ngspice via the `NGSPICE` environment variable (falling back
    /// to `ngspice` on PATH) and verify it runs.
    pub fn discover() -> SimResult<Self> {
        let sim = Self::from_path(default_path());
        sim.check()?;
        Ok(sim)
    }

    /// Use an explicit binary path, without verifying it.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verify the binary executes, with an installation hint if not.
    pub fn check(&self) -> SimResult<()> {
        match Command::new(&self.path).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(SimError::NgspiceNotFound {
                path: self.path.to_string_lossy().into_owned(),
                reason: format!("--version exited with {}", output.status),
                hint: install_hint(),
            }),
            Err(e) => Err(SimError::NgspiceNotFound {
                path: self.path.to_string_lossy().into_owned(),
                reason: e.to_string(),
                hint: install_hint(),
            }),
        }
    }

    /// Run one batch simulation: netlist on stdin, result artifact written
    /// to `artifact` as an ASCII rawfile.
    ///
    /// Synchronous request/response: the call blocks until the process
    /// exits, however long that takes.
    pub fn run_batch(&self, netlist: &str, artifact: &Path) -> SimResult<()> {
        debug!(path = %self.path.display(), artifact = %artifact.display(), "invoking ngspice");

        let mut child = Command::new(&self.path)
            .arg("-a")
            .arg("-b")
            .arg("-r")
            .arg(artifact)
            // ask for the ASCII rawfile variant; the binary one is not supported
            .env("SPICE_ASCIIRAWFILE", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(netlist.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SimError::ProcessFailed {
                program: "ngspice",
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !artifact.exists() {
            return Err(SimError::MissingArtifact {
                path: artifact.to_path_buf(),
            });
        }

        Ok(())
    }
}
