//! Analysis orchestration: serialize, simulate, decode, install.

use cf_circuit::{Analysis, Circuit, Sweep};
use cf_results::{DecodeMode, Plot, ResultReader, decode};
use tracing::debug;

use crate::error::SimResult;
use crate::ngspice::Ngspice;
use crate::rawfile::RawfileReader;

/// Abstract simulator backend.
///
/// Production code uses [`NgspiceSimulator`]; tests substitute stubs that
/// echo back fixed plots.
pub trait Simulator {
    fn simulate(&self, netlist: &str) -> SimResult<Vec<Plot>>;
}

/// Runs ngspice in batch mode with a temp-directory result artifact.
pub struct NgspiceSimulator {
    ngspice: Ngspice,
}

impl NgspiceSimulator {
    /// Discover ngspice and verify it runs.
    pub fn new() -> SimResult<Self> {
        Ok(Self {
            ngspice: Ngspice::discover()?,
        })
    }

    pub fn with(ngspice: Ngspice) -> Self {
        Self { ngspice }
    }
}

impl Simulator for NgspiceSimulator {
    fn simulate(&self, netlist: &str) -> SimResult<Vec<Plot>> {
        let dir = tempfile::tempdir()?;
        let artifact = dir.path().join("result.raw");
        self.ngspice.run_batch(netlist, &artifact)?;
        Ok(RawfileReader::open(&artifact).read_plots()?)
    }
}

fn run(
    circuit: &mut Circuit,
    sim: &dyn Simulator,
    analysis: &Analysis,
    mode: DecodeMode,
) -> SimResult<()> {
    let netlist = circuit.netlist(analysis)?;
    debug!(netlist_bytes = netlist.len(), ?mode, "running simulation");
    let plots = sim.simulate(&netlist)?;
    let outcome = decode(&plots, mode)?;
    circuit.apply_outcome(outcome);
    Ok(())
}

/// Operating-point analysis: one scalar per node/branch.
pub fn run_op(circuit: &mut Circuit, sim: &dyn Simulator) -> SimResult<()> {
    run(circuit, sim, &Analysis::OperatingPoint, DecodeMode::OperatingPoint)
}

/// DC sweep analysis: a sequence per node/branch plus the sweep axis.
pub fn run_dc(circuit: &mut Circuit, sim: &dyn Simulator, sweeps: Vec<Sweep>) -> SimResult<()> {
    run(circuit, sim, &Analysis::DcSweep(sweeps), DecodeMode::Series)
}

/// Transient analysis: a time series per node/branch plus the time base.
pub fn run_tran(circuit: &mut Circuit, sim: &dyn Simulator, step_s: f64, stop_s: f64) -> SimResult<()> {
    run(
        circuit,
        sim,
        &Analysis::Transient { step_s, stop_s },
        DecodeMode::Series,
    )
}
