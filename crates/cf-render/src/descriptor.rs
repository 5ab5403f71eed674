//! The render descriptor document.
//!
//! The external renderer consumes
//! `{modules: {circuit: {cells: {<name>: {type, port_directions?,
//! connections, attributes}}}}}` with one cell per device plus a fixed
//! ground cell keyed `gnd`.

use std::collections::BTreeMap;

use cf_circuit::Circuit;
use cf_core::Node;
use serde::Serialize;

use crate::error::{RenderError, RenderResult};

#[derive(Debug, Serialize)]
pub struct RenderDoc {
    pub modules: BTreeMap<String, Module>,
}

#[derive(Debug, Serialize)]
pub struct Module {
    pub cells: BTreeMap<String, Cell>,
}

#[derive(Debug, Serialize)]
pub struct Cell {
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_directions: Option<BTreeMap<String, String>>,
    pub connections: BTreeMap<String, Vec<u32>>,
    pub attributes: BTreeMap<String, String>,
}

fn gnd_cell() -> Cell {
    Cell {
        cell_type: "gnd".to_string(),
        port_directions: None,
        connections: BTreeMap::from([("A".to_string(), vec![Node::GROUND.index()])]),
        attributes: BTreeMap::new(),
    }
}

/// Build the render descriptor for a fully wired circuit.
pub fn descriptor(circuit: &Circuit) -> RenderResult<RenderDoc> {
    let mut cells = BTreeMap::new();

    for device in circuit.devices() {
        let symbol = device.symbol();

        let mut connections = BTreeMap::new();
        for (pin, node) in &symbol.pins {
            let node = node.ok_or_else(|| RenderError::UnwiredPort {
                device: device.name().to_string(),
                pin: pin.clone(),
            })?;
            connections.insert(pin.clone(), vec![node.index()]);
        }

        let port_directions = symbol.needs_directions.then(|| {
            symbol
                .pins
                .iter()
                .map(|(pin, _)| (pin.clone(), "inout".to_string()))
                .collect()
        });

        cells.insert(
            device.name().to_string(),
            Cell {
                cell_type: symbol.cell_type,
                port_directions,
                connections,
                attributes: symbol.attributes.into_iter().collect(),
            },
        );
    }

    cells.insert("gnd".to_string(), gnd_cell());

    Ok(RenderDoc {
        modules: BTreeMap::from([("circuit".to_string(), Module { cells })]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_circuit::Drive;

    fn wired_circuit() -> Circuit {
        let mut c = Circuit::new();
        let dc = c.voltage_source(Drive::Dc(2.0)).unwrap();
        let r = c.resistor(100.0);
        c.ground(&[dc.neg().into(), r.bottom().into()]).unwrap();
        c.connect(&[dc.pos().into(), r.top().into()]).unwrap();
        c
    }

    #[test]
    fn descriptor_has_expected_shape() {
        let doc = descriptor(&wired_circuit()).unwrap();
        let json = serde_json::to_value(&doc).unwrap();

        let cells = &json["modules"]["circuit"]["cells"];
        assert_eq!(cells["R0"]["type"], "r_v");
        assert_eq!(cells["R0"]["connections"]["A"][0], 1);
        assert_eq!(cells["R0"]["connections"]["B"][0], 0);
        assert_eq!(cells["R0"]["attributes"]["value"], "100");
        assert_eq!(cells["V0"]["type"], "v");
        assert_eq!(cells["V0"]["connections"]["+"][0], 1);
        assert_eq!(cells["gnd"]["type"], "gnd");
        assert_eq!(cells["gnd"]["connections"]["A"][0], 0);
        // skin-known cells carry no port_directions
        assert!(cells["R0"].get("port_directions").is_none());
    }

    #[test]
    fn unwired_circuit_is_rejected() {
        let mut c = Circuit::new();
        c.resistor(100.0);
        assert!(matches!(
            descriptor(&c),
            Err(RenderError::UnwiredPort { .. })
        ));
    }

    #[test]
    fn subcircuit_cells_carry_port_directions() {
        let mut c = Circuit::new();
        let model = c
            .declare_subcircuit("buf", &["in", "out"], ".subckt buf in out\n.ends\n")
            .unwrap();
        let x = c.subcircuit(&model).unwrap();
        let v = c.voltage_source(Drive::Dc(1.0)).unwrap();
        c.ground(&[v.neg().into()]).unwrap();
        c.connect(&[v.pos().into(), x.port(0).into()]).unwrap();
        c.ground(&[x.port(1).into()]).unwrap();

        let doc = descriptor(&c).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        let cell = &json["modules"]["circuit"]["cells"]["X0"];
        assert_eq!(cell["type"], "buf");
        assert_eq!(cell["port_directions"]["in"], "inout");
        assert_eq!(cell["connections"]["in"][0], 1);
        assert_eq!(cell["connections"]["out"][0], 0);
    }
}
