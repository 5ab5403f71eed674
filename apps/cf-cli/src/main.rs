use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use cf_circuit::{Analysis, CircuitError};
use cf_render::{Netlistsvg, RenderError};
use cf_results::Value;
use cf_sim::{Ngspice, NgspiceSimulator, SimError, run_dc, run_op, run_tran};

mod demos;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "circuitflow CLI - build, simulate, and render demo circuits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoName {
    /// Series-parallel divider, operating point
    Divider,
    /// Divider with its source swept
    Sweep,
    /// RC step response, transient
    Rc,
}

impl DemoName {
    fn build(self) -> CliResult<demos::Demo> {
        Ok(match self {
            DemoName::Divider => demos::divider()?,
            DemoName::Sweep => demos::divider_sweep()?,
            DemoName::Rc => demos::rc_step()?,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the external collaborators are installed
    Check,
    /// Print the generated netlist for a demo circuit
    Netlist {
        /// Demo circuit to build
        #[arg(value_enum)]
        demo: DemoName,
    },
    /// Simulate a demo circuit with ngspice and print its results
    Run {
        /// Demo circuit to build
        #[arg(value_enum)]
        demo: DemoName,
    },
    /// Render a demo circuit to SVG via netlistsvg
    Render {
        /// Demo circuit to build
        #[arg(value_enum)]
        demo: DemoName,
        /// Output SVG file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => cmd_check(),
        Commands::Netlist { demo } => cmd_netlist(demo),
        Commands::Run { demo } => cmd_run(demo),
        Commands::Render { demo, output } => cmd_render(demo, &output),
    }
}

fn cmd_check() -> CliResult<()> {
    match Ngspice::discover() {
        Ok(sim) => println!("✓ ngspice found at {}", sim.path().display()),
        Err(e) => println!("✗ ngspice unavailable: {e}"),
    }
    match Netlistsvg::discover() {
        Ok(renderer) => println!("✓ netlistsvg found at {}", renderer.path().display()),
        Err(e) => println!("✗ netlistsvg unavailable: {e}"),
    }
    Ok(())
}

fn cmd_netlist(demo: DemoName) -> CliResult<()> {
    let demo = demo.build()?;
    print!("{}", demo.circuit.netlist(&demo.analysis)?);
    Ok(())
}

fn cmd_run(demo: DemoName) -> CliResult<()> {
    let mut demo = demo.build()?;
    let sim = NgspiceSimulator::new()?;

    match demo.analysis.clone() {
        Analysis::OperatingPoint => run_op(&mut demo.circuit, &sim)?,
        Analysis::DcSweep(sweeps) => run_dc(&mut demo.circuit, &sim, sweeps)?,
        Analysis::Transient { step_s, stop_s } => {
            run_tran(&mut demo.circuit, &sim, step_s, stop_s)?
        }
    }

    println!("✓ Simulation completed: {}", demo.circuit.title());
    if let Some(time) = demo.circuit.time_base() {
        println!("  Time points: {}", time.len());
    }
    if let Some(sweep) = demo.circuit.sweep_axis() {
        println!("  Sweep points: {}", sweep.len());
    }
    for (label, probe) in &demo.probes {
        print_value(label, &demo.circuit.voltage(*probe)?);
    }
    Ok(())
}

fn print_value(label: &str, value: &Value) {
    match value {
        Value::Scalar(x) => println!("  {label}: {x:.6} V"),
        Value::Series(xs) => {
            let last = xs.last().copied().unwrap_or(0.0);
            println!("  {label}: {} samples, final {last:.6} V", xs.len());
        }
    }
}

fn cmd_render(demo: DemoName, output: &std::path::Path) -> CliResult<()> {
    let demo = demo.build()?;
    let renderer = Netlistsvg::discover()?;
    let svg = renderer.render_svg(&demo.circuit)?;
    std::fs::write(output, svg)?;
    println!("✓ Wrote {}", output.display());
    Ok(())
}
