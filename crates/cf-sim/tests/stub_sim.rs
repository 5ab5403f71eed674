//! End-to-end orchestration tests against a stub simulator.

use std::cell::RefCell;

use cf_circuit::{Circuit, Drive, Sweep};
use cf_core::Node;
use cf_results::{Plot, Value, Vector};
use cf_sim::{SimResult, Simulator, run_dc, run_op, run_tran};

/// Echoes back fixed plots, recording the netlist it was handed.
struct StubSimulator {
    plots: Vec<Plot>,
    seen: RefCell<Option<String>>,
}

impl StubSimulator {
    fn new(plots: Vec<Plot>) -> Self {
        Self {
            plots,
            seen: RefCell::new(None),
        }
    }

    fn netlist(&self) -> String {
        self.seen.borrow().clone().expect("simulate was not called")
    }
}

impl Simulator for StubSimulator {
    fn simulate(&self, netlist: &str) -> SimResult<Vec<Plot>> {
        *self.seen.borrow_mut() = Some(netlist.to_string());
        Ok(self.plots.clone())
    }
}

fn op_plot(vectors: &[(&str, f64)]) -> Plot {
    let mut iter = vectors.iter();
    let (scale_name, scale_value) = iter.next().expect("need at least one vector");
    Plot {
        name: "Operating Point".to_string(),
        scale: Vector::new(*scale_name, vec![*scale_value]),
        data: iter.map(|(n, v)| Vector::new(*n, vec![*v])).collect(),
    }
}

#[test]
fn series_round_trip_populates_operating_points() {
    let mut c = Circuit::new();
    let dc = c.voltage_source(Drive::Dc(2.0)).unwrap();
    let r1 = c.resistor(100.0);
    let r2 = c.resistor(100.0);
    c.ground(&[dc.neg().into(), r2.bottom().into()]).unwrap();
    let top = c.connect(&[dc.pos().into(), r1.top().into()]).unwrap();
    let mid = c.connect(&[r1.bottom().into(), r2.top().into()]).unwrap();

    let stub = StubSimulator::new(vec![op_plot(&[("v(1)", 2.0), ("v(2)", 1.0)])]);
    run_op(&mut c, &stub).unwrap();

    assert!(stub.netlist().contains(".op\n"));
    assert_eq!(c.voltage(top).unwrap(), Value::Scalar(2.0));
    assert_eq!(c.voltage(mid).unwrap(), Value::Scalar(1.0));
    // ground is implicit, never stored
    assert!(
        !c.outcome()
            .unwrap()
            .node_voltages
            .contains_key(&Node::GROUND)
    );
    assert_eq!(c.voltage_at(Node::GROUND).unwrap(), Value::Scalar(0.0));
}

#[test]
fn divider_junction_reads_midpoint_voltage() {
    // V(2V) - R(100) - junction - R(50) || R(50) - ground
    let mut c = Circuit::new();
    let dc = c.voltage_source(Drive::Dc(2.0)).unwrap();
    let r1 = c.resistor(100.0);
    let r2 = c.resistor(50.0);
    let r3 = c.resistor(50.0);

    c.ground(&[dc.neg().into(), r2.bottom().into(), r3.bottom().into()])
        .unwrap();
    c.connect(&[dc.pos().into(), r1.top().into()]).unwrap();
    let junction = c
        .connect(&[r1.bottom().into(), r2.top().into(), r3.top().into()])
        .unwrap();

    let stub = StubSimulator::new(vec![op_plot(&[("v(1)", 2.0), ("v(2)", 1.0)])]);
    run_op(&mut c, &stub).unwrap();

    assert_eq!(c.voltage(junction).unwrap(), Value::Scalar(1.0));
}

#[test]
fn branch_current_is_stored_lowercased() {
    let mut c = Circuit::new();
    let dc = c.voltage_source(Drive::Dc(1.0)).unwrap();
    let r = c.resistor(100.0);
    c.ground(&[dc.neg().into(), r.bottom().into()]).unwrap();
    c.connect(&[dc.pos().into(), r.top().into()]).unwrap();

    let stub = StubSimulator::new(vec![op_plot(&[("v(1)", 1.0), ("i(V0)", -0.01)])]);
    run_op(&mut c, &stub).unwrap();

    assert_eq!(c.current("V0").unwrap(), Value::Scalar(-0.01));
    assert_eq!(c.current("v0").unwrap(), Value::Scalar(-0.01));
}

#[test]
fn dc_sweep_stores_series_and_axis() {
    let mut c = Circuit::new();
    let dc = c.voltage_source(Drive::Dc(0.0)).unwrap();
    let r1 = c.resistor(100.0);
    let r2 = c.resistor(100.0);
    c.ground(&[dc.neg().into(), r2.bottom().into()]).unwrap();
    c.connect(&[dc.pos().into(), r1.top().into()]).unwrap();
    let mid = c.connect(&[r1.bottom().into(), r2.top().into()]).unwrap();

    let source = c.device_name(dc.id()).unwrap().to_string();
    let plot = Plot {
        name: "DC transfer characteristic".to_string(),
        scale: Vector::new("v(v-sweep)", vec![0.0, 0.5, 1.0]),
        data: vec![
            Vector::new("v(1)", vec![0.0, 0.5, 1.0]),
            Vector::new("v(2)", vec![0.0, 0.25, 0.5]),
        ],
    };
    let stub = StubSimulator::new(vec![plot]);
    run_dc(&mut c, &stub, vec![Sweep::new(&source, 0.0, 1.0, 0.5)]).unwrap();

    assert!(stub.netlist().contains(".dc V0 0 1 0.5\n"));
    assert_eq!(c.sweep_axis(), Some(&[0.0, 0.5, 1.0][..]));
    assert_eq!(
        c.voltage(mid).unwrap(),
        Value::Series(vec![0.0, 0.25, 0.5])
    );
    assert!(c.time_base().is_none());
}

#[test]
fn transient_stores_time_base() {
    let mut c = Circuit::new();
    let v = c
        .voltage_source(Drive::Pwl(vec![(0.0, 0.0), (1e-3, 5.0)]))
        .unwrap();
    let r = c.resistor(1000.0);
    let cap = c.capacitor(1e-6);
    c.connect(&[v.pos().into(), r.top().into()]).unwrap();
    let out = c.connect(&[r.bottom().into(), cap.top().into()]).unwrap();
    c.ground(&[v.neg().into(), cap.bottom().into()]).unwrap();

    let plot = Plot {
        name: "Transient Analysis".to_string(),
        scale: Vector::new("time", vec![0.0, 1e-3, 2e-3]),
        data: vec![
            Vector::new("v(1)", vec![0.0, 5.0, 5.0]),
            Vector::new("v(2)", vec![0.0, 3.1, 4.6]),
        ],
    };
    let stub = StubSimulator::new(vec![plot]);
    run_tran(&mut c, &stub, 1e-5, 2e-3).unwrap();

    assert!(stub.netlist().contains(".tran 0.00001 0.002\n"));
    assert_eq!(c.time_base(), Some(&[0.0, 1e-3, 2e-3][..]));
    assert_eq!(
        c.voltage(out).unwrap(),
        Value::Series(vec![0.0, 3.1, 4.6])
    );
    // ground reads as a matching zero series
    assert_eq!(
        c.voltage_at(Node::GROUND).unwrap(),
        Value::Series(vec![0.0, 0.0, 0.0])
    );
}

#[test]
fn simulator_failure_propagates() {
    struct FailingSimulator;
    impl Simulator for FailingSimulator {
        fn simulate(&self, _netlist: &str) -> SimResult<Vec<Plot>> {
            Err(cf_sim::SimError::MissingArtifact {
                path: "/tmp/never.raw".into(),
            })
        }
    }

    let mut c = Circuit::new();
    let dc = c.voltage_source(Drive::Dc(1.0)).unwrap();
    let r = c.resistor(100.0);
    c.ground(&[dc.neg().into(), r.bottom().into()]).unwrap();
    c.connect(&[dc.pos().into(), r.top().into()]).unwrap();

    let err = run_op(&mut c, &FailingSimulator).unwrap_err();
    assert!(matches!(err, cf_sim::SimError::MissingArtifact { .. }));
    // no half-applied outcome
    assert!(c.outcome().is_none());
}
