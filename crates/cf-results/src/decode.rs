//! Demultiplexes simulator plots into typed per-node and per-branch results.

use std::collections::HashMap;

use cf_core::Node;
use tracing::debug;

use crate::error::{ResultsError, ResultsResult};
use crate::name::{VectorClass, classify};
use crate::vector::{Plot, Vector};

/// A decoded result: one value per node/branch for an operating point, a
/// sequence per node/branch for sweeps and transients.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Series(Vec<f64>),
}

impl Value {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(x) => Some(*x),
            Value::Series(_) => None,
        }
    }

    pub fn series(&self) -> Option<&[f64]> {
        match self {
            Value::Scalar(_) => None,
            Value::Series(xs) => Some(xs),
        }
    }
}

/// How vector data is stored: a single-point result keeps the scalar first
/// element of each vector, a swept/transient result keeps whole sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    OperatingPoint,
    Series,
}

/// Decoded simulation results, ready to install into a circuit.
///
/// Ground is implicit: node 0 never appears in the voltage map and reads as
/// zero through [`SimOutcome::voltage`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimOutcome {
    pub node_voltages: HashMap<Node, Value>,
    pub branch_currents: HashMap<String, Value>,
    pub time: Option<Vec<f64>>,
    pub sweep: Option<Vec<f64>>,
}

impl SimOutcome {
    /// Voltage of a node, with ground reading as zero in whatever shape the
    /// stored results have. `None` means the simulation never populated the
    /// node.
    pub fn voltage(&self, node: Node) -> Option<Value> {
        if node.is_ground() {
            return Some(match self.axis_len() {
                Some(n) => Value::Series(vec![0.0; n]),
                None => Value::Scalar(0.0),
            });
        }
        self.node_voltages.get(&node).cloned()
    }

    /// Current through a branch, looked up by lowercased name.
    pub fn current(&self, branch: &str) -> Option<Value> {
        self.branch_currents.get(&branch.to_ascii_lowercase()).cloned()
    }

    /// Length of the independent axis, if the outcome holds sequences.
    fn axis_len(&self) -> Option<usize> {
        if let Some(t) = &self.time {
            return Some(t.len());
        }
        if let Some(s) = &self.sweep {
            return Some(s.len());
        }
        self.node_voltages
            .values()
            .chain(self.branch_currents.values())
            .find_map(|v| v.series().map(<[f64]>::len))
    }
}

fn value_of(vector: &Vector, mode: DecodeMode) -> ResultsResult<Value> {
    match mode {
        DecodeMode::OperatingPoint => {
            let first = vector
                .data
                .first()
                .copied()
                .ok_or_else(|| ResultsError::EmptyVector {
                    name: vector.name.clone(),
                })?;
            Ok(Value::Scalar(first))
        }
        DecodeMode::Series => Ok(Value::Series(vector.data.clone())),
    }
}

fn route(vector: &Vector, mode: DecodeMode, out: &mut SimOutcome) -> ResultsResult<()> {
    match classify(&vector.name)? {
        VectorClass::NodeVoltage(node) => {
            out.node_voltages.insert(node, value_of(vector, mode)?);
        }
        VectorClass::SweepAxis => {
            out.sweep = Some(vector.data.clone());
        }
        VectorClass::BranchCurrent(branch) => {
            out.branch_currents.insert(branch, value_of(vector, mode)?);
        }
        VectorClass::UnknownNode(token) => {
            debug!(vector = %vector.name, token, "skipping internal node vector");
        }
        VectorClass::UnknownKind { kind, token } => {
            debug!(vector = %vector.name, kind, token, "skipping unrecognized vector kind");
        }
    }
    Ok(())
}

/// Decode simulator plots into a [`SimOutcome`].
///
/// A scale vector named literally `time` becomes the time base and is not
/// classified further; every other vector (scale included) is classified by
/// name and routed, with unrecognized-but-well-formed vectors skipped and
/// malformed names failing hard.
pub fn decode(plots: &[Plot], mode: DecodeMode) -> ResultsResult<SimOutcome> {
    let mut out = SimOutcome::default();

    for plot in plots {
        if plot.scale.name == "time" {
            out.time = Some(plot.scale.data.clone());
        } else {
            route(&plot.scale, mode, &mut out)?;
        }

        for vector in &plot.data {
            route(vector, mode, &mut out)?;
        }
    }

    Ok(out)
}
