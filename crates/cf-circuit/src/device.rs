//! Device variants: the closed set of components a circuit can hold.
//!
//! Every variant renders itself two ways: a SPICE netlist line and a
//! schematic symbol descriptor for the external renderer.

use cf_core::Node;

use crate::error::{CircuitError, CircuitResult};

/// Variant class of a device; determines the netlist name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Resistor,
    Capacitor,
    VoltageSource,
    Bjt,
    Subcircuit,
}

impl DeviceKind {
    pub fn prefix(self) -> char {
        match self {
            DeviceKind::Resistor => 'R',
            DeviceKind::Capacitor => 'C',
            DeviceKind::VoltageSource => 'V',
            DeviceKind::Bjt => 'Q',
            DeviceKind::Subcircuit => 'X',
        }
    }
}

/// Voltage-source drive. The modes are mutually exclusive by construction
/// rather than by which optional parameter happens to be set.
#[derive(Debug, Clone, PartialEq)]
pub enum Drive {
    /// Plain constant.
    Dc(f64),
    /// Constant flagged for AC small-signal analysis.
    Ac(f64),
    /// Piecewise-linear time/value pairs.
    Pwl(Vec<(f64, f64)>),
}

#[derive(Debug, Clone)]
pub struct Resistor {
    pub(crate) name: String,
    pub(crate) ohms: f64,
    pub(crate) slots: [Option<Node>; 2],
}

#[derive(Debug, Clone)]
pub struct Capacitor {
    pub(crate) name: String,
    pub(crate) farads: f64,
    pub(crate) slots: [Option<Node>; 2],
}

#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub(crate) name: String,
    pub(crate) drive: Drive,
    pub(crate) slots: [Option<Node>; 2],
}

#[derive(Debug, Clone)]
pub struct Bjt {
    pub(crate) name: String,
    pub(crate) model: String,
    pub(crate) slots: [Option<Node>; 3],
}

#[derive(Debug, Clone)]
pub struct SubcircuitInstance {
    pub(crate) name: String,
    pub(crate) model: String,
    pub(crate) port_names: Vec<String>,
    pub(crate) slots: Vec<Option<Node>>,
}

/// A registered component. Closed: the netlist and the renderer know every
/// variant.
#[derive(Debug, Clone)]
pub enum Device {
    Resistor(Resistor),
    Capacitor(Capacitor),
    VoltageSource(VoltageSource),
    Bjt(Bjt),
    Subcircuit(SubcircuitInstance),
}

/// Schematic symbol descriptor: cell type, pins with their wired nodes, and
/// display attributes, consumed by the render layer.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub cell_type: String,
    /// (pin name, wired node) in pin order.
    pub pins: Vec<(String, Option<Node>)>,
    pub attributes: Vec<(String, String)>,
    /// Generic cells (subcircuit models) need explicit port directions in
    /// the render document; skin-known cells do not.
    pub needs_directions: bool,
}

impl Device {
    pub fn name(&self) -> &str {
        match self {
            Device::Resistor(d) => &d.name,
            Device::Capacitor(d) => &d.name,
            Device::VoltageSource(d) => &d.name,
            Device::Bjt(d) => &d.name,
            Device::Subcircuit(d) => &d.name,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            Device::Resistor(_) => DeviceKind::Resistor,
            Device::Capacitor(_) => DeviceKind::Capacitor,
            Device::VoltageSource(_) => DeviceKind::VoltageSource,
            Device::Bjt(_) => DeviceKind::Bjt,
            Device::Subcircuit(_) => DeviceKind::Subcircuit,
        }
    }

    /// Port slots in declaration order; `None` until wired.
    pub fn slots(&self) -> &[Option<Node>] {
        match self {
            Device::Resistor(d) => &d.slots,
            Device::Capacitor(d) => &d.slots,
            Device::VoltageSource(d) => &d.slots,
            Device::Bjt(d) => &d.slots,
            Device::Subcircuit(d) => &d.slots,
        }
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Option<Node>] {
        match self {
            Device::Resistor(d) => &mut d.slots,
            Device::Capacitor(d) => &mut d.slots,
            Device::VoltageSource(d) => &mut d.slots,
            Device::Bjt(d) => &mut d.slots,
            Device::Subcircuit(d) => &mut d.slots,
        }
    }

    /// Semantic name of a port slot.
    pub fn port_name(&self, port: usize) -> Option<&str> {
        match self {
            Device::Resistor(_) | Device::Capacitor(_) => ["top", "bottom"].get(port).copied(),
            Device::VoltageSource(_) => ["pos", "neg"].get(port).copied(),
            Device::Bjt(_) => ["collector", "base", "emitter"].get(port).copied(),
            Device::Subcircuit(d) => d.port_names.get(port).map(String::as_str),
        }
    }

    fn wired(&self, port: usize) -> CircuitResult<Node> {
        self.slots()[port].ok_or_else(|| CircuitError::UnwiredPort {
            device: self.name().to_string(),
            port,
        })
    }

    /// Emit this device's netlist line. Every referenced port must be wired.
    ///
    /// Resistors and capacitors emit `pos` (port 1) before `neg` (port 0);
    /// the inversion matches what the simulator expects and is preserved
    /// exactly.
    pub fn netlist_line(&self) -> CircuitResult<String> {
        match self {
            Device::Resistor(d) => Ok(format!(
                "{} {} {} {}",
                d.name,
                self.wired(1)?,
                self.wired(0)?,
                d.ohms
            )),
            Device::Capacitor(d) => Ok(format!(
                "{} {} {} {}",
                d.name,
                self.wired(1)?,
                self.wired(0)?,
                d.farads
            )),
            Device::VoltageSource(d) => {
                let mut line = format!("{} {} {}", d.name, self.wired(0)?, self.wired(1)?);
                match &d.drive {
                    Drive::Dc(volts) => {
                        line.push_str(&format!(" {volts}"));
                    }
                    Drive::Ac(volts) => {
                        line.push_str(&format!(" ac {volts}"));
                    }
                    Drive::Pwl(points) => {
                        line.push_str(" pwl");
                        for (t, v) in points {
                            line.push_str(&format!(" {t} {v}"));
                        }
                    }
                }
                Ok(line)
            }
            Device::Bjt(d) => Ok(format!(
                "{} {} {} {} {}",
                d.name,
                self.wired(0)?,
                self.wired(1)?,
                self.wired(2)?,
                d.model
            )),
            Device::Subcircuit(d) => {
                let mut line = d.name.clone();
                for port in 0..d.slots.len() {
                    line.push_str(&format!(" {}", self.wired(port)?));
                }
                line.push_str(&format!(" {}", d.model));
                Ok(line)
            }
        }
    }

    /// Describe this device as a schematic symbol.
    pub fn symbol(&self) -> Symbol {
        match self {
            Device::Resistor(d) => Symbol {
                cell_type: "r_v".to_string(),
                pins: vec![("A".to_string(), d.slots[0]), ("B".to_string(), d.slots[1])],
                attributes: vec![("value".to_string(), d.ohms.to_string())],
                needs_directions: false,
            },
            Device::Capacitor(d) => Symbol {
                cell_type: "c_v".to_string(),
                pins: vec![("A".to_string(), d.slots[0]), ("B".to_string(), d.slots[1])],
                attributes: vec![("value".to_string(), d.farads.to_string())],
                needs_directions: false,
            },
            Device::VoltageSource(d) => {
                let value = match &d.drive {
                    Drive::Dc(v) => v.to_string(),
                    Drive::Ac(v) => format!("{v} ac"),
                    Drive::Pwl(_) => "pwl".to_string(),
                };
                Symbol {
                    cell_type: "v".to_string(),
                    pins: vec![("+".to_string(), d.slots[0]), ("-".to_string(), d.slots[1])],
                    attributes: vec![("value".to_string(), value)],
                    needs_directions: false,
                }
            }
            Device::Bjt(d) => Symbol {
                cell_type: "q_npn".to_string(),
                pins: vec![
                    ("C".to_string(), d.slots[0]),
                    ("B".to_string(), d.slots[1]),
                    ("E".to_string(), d.slots[2]),
                ],
                attributes: vec![("model".to_string(), d.model.clone())],
                needs_directions: false,
            },
            Device::Subcircuit(d) => Symbol {
                cell_type: d.model.clone(),
                pins: d
                    .port_names
                    .iter()
                    .cloned()
                    .zip(d.slots.iter().copied())
                    .collect(),
                attributes: Vec::new(),
                needs_directions: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor(slots: [Option<Node>; 2]) -> Device {
        Device::Resistor(Resistor {
            name: "R0".into(),
            ohms: 100.0,
            slots,
        })
    }

    #[test]
    fn resistor_line_emits_pos_then_neg() {
        let dev = resistor([Some(Node::from_index(1)), Some(Node::from_index(2))]);
        // pos is the second declared port, neg the first
        assert_eq!(dev.netlist_line().unwrap(), "R0 2 1 100");
    }

    #[test]
    fn unwired_port_is_fatal() {
        let dev = resistor([Some(Node::from_index(1)), None]);
        assert!(matches!(
            dev.netlist_line(),
            Err(CircuitError::UnwiredPort { port: 1, .. })
        ));
    }

    #[test]
    fn voltage_source_drive_forms() {
        let mk = |drive| {
            Device::VoltageSource(VoltageSource {
                name: "V0".into(),
                drive,
                slots: [Some(Node::from_index(1)), Some(Node::GROUND)],
            })
        };

        assert_eq!(mk(Drive::Dc(2.0)).netlist_line().unwrap(), "V0 1 0 2");
        assert_eq!(mk(Drive::Ac(1.0)).netlist_line().unwrap(), "V0 1 0 ac 1");
        assert_eq!(
            mk(Drive::Pwl(vec![(0.0, 0.0), (0.001, 5.0)]))
                .netlist_line()
                .unwrap(),
            "V0 1 0 pwl 0 0 0.001 5"
        );
    }

    #[test]
    fn bjt_line_orders_collector_base_emitter() {
        let dev = Device::Bjt(Bjt {
            name: "Q0".into(),
            model: "2n2222".into(),
            slots: [
                Some(Node::from_index(3)),
                Some(Node::from_index(1)),
                Some(Node::GROUND),
            ],
        });
        assert_eq!(dev.netlist_line().unwrap(), "Q0 3 1 0 2n2222");
    }

    #[test]
    fn subcircuit_line_joins_nodes_then_model() {
        let dev = Device::Subcircuit(SubcircuitInstance {
            name: "X0".into(),
            model: "opamp".into(),
            port_names: vec!["inp".into(), "inn".into(), "out".into()],
            slots: vec![
                Some(Node::from_index(1)),
                Some(Node::from_index(2)),
                Some(Node::from_index(3)),
            ],
        });
        assert_eq!(dev.netlist_line().unwrap(), "X0 1 2 3 opamp");
    }
}
