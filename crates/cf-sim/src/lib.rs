//! cf-sim: external simulator collaborator for circuitflow.
//!
//! Provides:
//! - ngspice discovery and synchronous batch invocation
//! - the ASCII rawfile reader (the concrete `ResultReader`)
//! - the `Simulator` abstraction, swappable for stubs in tests
//! - analysis orchestration: netlist -> simulate -> decode -> circuit

pub mod error;
pub mod ngspice;
pub mod rawfile;
pub mod run;

// Re-exports for ergonomics
pub use error::{SimError, SimResult};
pub use ngspice::Ngspice;
pub use rawfile::{RawfileReader, parse_rawfile};
pub use run::{NgspiceSimulator, Simulator, run_dc, run_op, run_tran};
