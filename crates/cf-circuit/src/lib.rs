//! cf-circuit: topology model and netlist serialization for circuitflow.
//!
//! Provides:
//! - `Circuit`: device registry, node allocation, `connect`/`ground` wiring
//! - `Device`: the closed set of component variants and their netlist lines
//! - `Analysis`: simulation-mode directives appended to the netlist
//! - result read-back (`voltage`, `current`) once an outcome is installed
//!
//! # Example
//!
//! ```
//! use cf_circuit::{Analysis, Circuit, Drive};
//!
//! let mut c = Circuit::new();
//! let dc = c.voltage_source(Drive::Dc(2.0)).unwrap();
//! let r1 = c.resistor(100.0);
//! let r2 = c.resistor(100.0);
//! c.ground(&[dc.neg().into(), r2.bottom().into()]).unwrap();
//! c.connect(&[dc.pos().into(), r1.top().into()]).unwrap();
//! c.connect(&[r1.bottom().into(), r2.top().into()]).unwrap();
//!
//! let netlist = c.netlist(&Analysis::OperatingPoint).unwrap();
//! assert!(netlist.contains("R0 2 1 100"));
//! ```

pub mod circuit;
pub mod device;
pub mod error;
pub mod netlist;
pub mod port;

// Re-exports for ergonomics
pub use circuit::{Circuit, SubcircuitModel};
pub use device::{Device, DeviceKind, Drive, Symbol};
pub use error::{CircuitError, CircuitResult};
pub use netlist::{Analysis, Sweep};
pub use port::{
    BjtHandle, CapacitorHandle, PortRef, Probe, ResistorHandle, SubcircuitHandle, Terminal,
    VoltageSourceHandle,
};
