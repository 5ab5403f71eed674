//! Bundled demo circuits exercising the library end-to-end.

use cf_circuit::{Analysis, Circuit, CircuitResult, Drive, Probe, Sweep};

/// A demo: a wired circuit, its natural analysis, and the nets worth
/// reporting afterwards.
pub struct Demo {
    pub circuit: Circuit,
    pub analysis: Analysis,
    pub probes: Vec<(&'static str, Probe)>,
}

/// Series-parallel divider: V(2V) - R(100) - junction - R(50) || R(50) - gnd.
/// The junction sits at half the supply.
pub fn divider() -> CircuitResult<Demo> {
    let mut c = Circuit::new();
    c.set_title("series-parallel divider");

    let dc = c.voltage_source(Drive::Dc(2.0))?;
    let r1 = c.resistor(100.0);
    let r2 = c.resistor(50.0);
    let r3 = c.resistor(50.0);

    c.ground(&[dc.neg().into(), r2.bottom().into(), r3.bottom().into()])?;
    let supply = c.connect(&[dc.pos().into(), r1.top().into()])?;
    let junction = c.connect(&[r1.bottom().into(), r2.top().into(), r3.top().into()])?;

    Ok(Demo {
        circuit: c,
        analysis: Analysis::OperatingPoint,
        probes: vec![("supply", supply), ("junction", junction)],
    })
}

/// The same divider with its source swept 0..1 V in 0.5 V steps.
pub fn divider_sweep() -> CircuitResult<Demo> {
    let mut demo = divider()?;
    demo.circuit.set_title("swept divider");
    let source = demo.circuit.devices()[0].name().to_string();
    demo.analysis = Analysis::DcSweep(vec![Sweep::new(source, 0.0, 1.0, 0.5)]);
    Ok(demo)
}

/// RC low-pass driven by a piecewise-linear pulse, run as a transient.
pub fn rc_step() -> CircuitResult<Demo> {
    let mut c = Circuit::new();
    c.set_title("rc step response");

    let v = c.voltage_source(Drive::Pwl(vec![(0.0, 0.0), (1e-4, 5.0), (3e-3, 5.0)]))?;
    let r = c.resistor(1000.0);
    let cap = c.capacitor(1e-6);

    c.connect(&[v.pos().into(), r.top().into()])?;
    let out = c.connect(&[r.bottom().into(), cap.top().into()])?;
    c.ground(&[v.neg().into(), cap.bottom().into()])?;

    Ok(Demo {
        circuit: c,
        analysis: Analysis::Transient {
            step_s: 1e-5,
            stop_s: 5e-3,
        },
        probes: vec![("out", out)],
    })
}
