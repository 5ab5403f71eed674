//! Netlist assembly and analysis directives.

use crate::circuit::Circuit;
use crate::error::{CircuitError, CircuitResult};

/// One swept source for a `.dc` analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    /// Netlist name of the swept source (`V0`, ...).
    pub source: String,
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Sweep {
    pub fn new(source: impl Into<String>, start: f64, stop: f64, step: f64) -> Self {
        Self {
            source: source.into(),
            start,
            stop,
            step,
        }
    }
}

/// Simulation-mode directives appended after the device lines.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    /// `.op`
    OperatingPoint,
    /// One `.dc <source> <start> <stop> <step>` directive per swept source,
    /// in registration order.
    DcSweep(Vec<Sweep>),
    /// `.tran <step> <stop>`
    Transient { step_s: f64, stop_s: f64 },
}

impl Circuit {
    /// Serialize the circuit to netlist text: title line, deduplicated
    /// subcircuit definitions, one line per device in insertion order, the
    /// analysis directives, then the terminating `.end`.
    ///
    /// Every device port must be wired; an unset node is a hard error, not
    /// a placeholder.
    pub fn netlist(&self, analysis: &Analysis) -> CircuitResult<String> {
        let mut out = String::new();
        out.push_str(self.title());
        out.push('\n');

        for body in self.include_bodies() {
            out.push_str(body);
            if !body.ends_with('\n') {
                out.push('\n');
            }
        }

        for device in self.devices() {
            out.push_str(&device.netlist_line()?);
            out.push('\n');
        }

        match analysis {
            Analysis::OperatingPoint => out.push_str(".op\n"),
            Analysis::DcSweep(sweeps) => {
                if sweeps.is_empty() {
                    return Err(CircuitError::Arity {
                        op: ".dc",
                        min: 1,
                        got: 0,
                    });
                }
                for sweep in sweeps {
                    out.push_str(&format!(
                        ".dc {} {} {} {}\n",
                        sweep.source, sweep.start, sweep.stop, sweep.step
                    ));
                }
            }
            Analysis::Transient { step_s, stop_s } => {
                out.push_str(&format!(".tran {step_s} {stop_s}\n"));
            }
        }

        out.push_str(".end\n");
        Ok(out)
    }
}
