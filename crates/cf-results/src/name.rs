//! Vector-name classification.
//!
//! Simulator vectors are named `<kind>(<token>)` — kind a lowercase ASCII
//! letter run, token ASCII alphanumerics plus `-` and `.`. Classification
//! decides where a vector's values are routed; names that do not match the
//! shape at all are a hard parse failure.

use cf_core::Node;

use crate::error::{ResultsError, ResultsResult};

/// Name the independent sweep variable carries inside `v(...)` when the
/// scale is a swept source rather than time.
pub const SWEEP_TOKEN: &str = "v-sweep";

/// Where a vector's values belong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VectorClass {
    /// `v(<digits>)`: voltage of a numbered node.
    NodeVoltage(Node),
    /// `v(v-sweep)`: the independent sweep axis.
    SweepAxis,
    /// `v(<other>)`: a simulator-internal node this model does not track.
    UnknownNode(String),
    /// `i(<branch>)`: current through a named branch/device (lowercased).
    BranchCurrent(String),
    /// Any other kind letter: a measurement type this model does not track.
    UnknownKind { kind: String, token: String },
}

/// Split `name` into its kind letters and parenthesized token.
fn split(name: &str) -> Option<(&str, &str)> {
    let open = name.find('(')?;
    let kind = &name[..open];
    let token = name[open + 1..].strip_suffix(')')?;
    if kind.is_empty() || token.is_empty() {
        return None;
    }
    if !kind.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
    {
        return None;
    }
    Some((kind, token))
}

/// Classify a vector name, failing hard on names that do not match the
/// `kind(token)` shape.
pub fn classify(name: &str) -> ResultsResult<VectorClass> {
    let (kind, token) = split(name).ok_or_else(|| ResultsError::MalformedVectorName {
        name: name.to_string(),
    })?;

    match kind {
        "v" => {
            if token.chars().all(|c| c.is_ascii_digit()) {
                // Node indices fit comfortably in u32; anything larger is
                // not a node this model could have allocated.
                let index: u32 =
                    token
                        .parse()
                        .map_err(|_| ResultsError::MalformedVectorName {
                            name: name.to_string(),
                        })?;
                Ok(VectorClass::NodeVoltage(Node::from_index(index)))
            } else if token == SWEEP_TOKEN {
                Ok(VectorClass::SweepAxis)
            } else {
                Ok(VectorClass::UnknownNode(token.to_string()))
            }
        }
        "i" => Ok(VectorClass::BranchCurrent(token.to_ascii_lowercase())),
        _ => Ok(VectorClass::UnknownKind {
            kind: kind.to_string(),
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_node_voltage() {
        assert_eq!(
            classify("v(2)").unwrap(),
            VectorClass::NodeVoltage(Node::from_index(2))
        );
    }

    #[test]
    fn classifies_sweep_axis() {
        assert_eq!(classify("v(v-sweep)").unwrap(), VectorClass::SweepAxis);
    }

    #[test]
    fn classifies_branch_current_lowercased() {
        assert_eq!(
            classify("i(V0)").unwrap(),
            VectorClass::BranchCurrent("v0".to_string())
        );
    }

    #[test]
    fn internal_node_names_are_soft() {
        assert_eq!(
            classify("v(net.x1.fb)").unwrap(),
            VectorClass::UnknownNode("net.x1.fb".to_string())
        );
    }

    #[test]
    fn unknown_kind_is_soft() {
        assert!(matches!(
            classify("vm(2)").unwrap(),
            VectorClass::UnknownKind { .. }
        ));
    }

    #[test]
    fn malformed_names_are_hard_errors() {
        for bad in ["time", "v()", "(2)", "v(2", "V(2)", "v(a b)", "v2"] {
            assert!(
                matches!(
                    classify(bad),
                    Err(ResultsError::MalformedVectorName { .. })
                ),
                "expected hard failure for {bad:?}"
            );
        }
    }
}
