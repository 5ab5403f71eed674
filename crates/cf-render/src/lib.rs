//! cf-render: schematic rendering for circuitflow.
//!
//! Provides:
//! - the render descriptor document (netlistsvg JSON shape)
//! - invocation of the external netlistsvg renderer

pub mod descriptor;
pub mod error;
pub mod netlistsvg;

// Re-exports for ergonomics
pub use descriptor::{RenderDoc, descriptor};
pub use error::{RenderError, RenderResult};
pub use netlistsvg::Netlistsvg;
