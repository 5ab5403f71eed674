//! The circuit: device registry, node allocation, wiring, result read-back.

use std::path::Path;

use cf_core::{DeviceId, Node};
use cf_results::{SimOutcome, Value};
use tracing::debug;

use crate::device::{
    Bjt, Capacitor, Device, DeviceKind, Drive, Resistor, SubcircuitInstance, VoltageSource,
};
use crate::error::{CircuitError, CircuitResult};
use crate::port::{
    BjtHandle, CapacitorHandle, PortRef, Probe, ResistorHandle, SubcircuitHandle, Terminal,
    VoltageSourceHandle,
};

/// A reusable subcircuit model: the model name its instances reference plus
/// the declared port names, in instance port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcircuitModel {
    pub model: String,
    pub ports: Vec<String>,
}

/// Per-variant name counters. Owned by the circuit so numbering never leaks
/// between circuits in the same process.
#[derive(Debug, Default)]
struct NameCounters {
    resistors: u32,
    capacitors: u32,
    sources: u32,
    bjts: u32,
    subcircuits: u32,
}

impl NameCounters {
    fn next(&mut self, kind: DeviceKind) -> String {
        let counter = match kind {
            DeviceKind::Resistor => &mut self.resistors,
            DeviceKind::Capacitor => &mut self.capacitors,
            DeviceKind::VoltageSource => &mut self.sources,
            DeviceKind::Bjt => &mut self.bjts,
            DeviceKind::Subcircuit => &mut self.subcircuits,
        };
        let seq = *counter;
        *counter += 1;
        format!("{}{}", kind.prefix(), seq)
    }
}

/// A definition body prepended ahead of the netlist, registered once per
/// key (canonical path for file imports, caller key for literal text).
#[derive(Debug, Clone)]
struct Include {
    key: String,
    body: String,
}

/// Candidate slot for one terminal of a `connect`/`ground` call.
enum Pick {
    /// Terminal already carries a node; contributes it for merging.
    Existing(Node),
    /// Unwired slot to assign.
    Free(PortRef),
}

/// An in-memory circuit: the sole authority for node allocation and device
/// naming, and the place decoded simulation results land.
#[derive(Debug)]
pub struct Circuit {
    title: String,
    devices: Vec<Device>,
    node_count: u32,
    names: NameCounters,
    includes: Vec<Include>,
    outcome: Option<SimOutcome>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self {
            title: "circuitflow netlist".to_string(),
            devices: Vec::new(),
            // 0 is permanently ground; allocation starts above it
            node_count: 1,
            names: NameCounters::default(),
            includes: Vec::new(),
            outcome: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Devices in insertion (= netlist emission) order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Next node number the allocator would hand out.
    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn device(&self, id: DeviceId) -> CircuitResult<&Device> {
        self.devices
            .get(id.index() as usize)
            .ok_or(CircuitError::UnknownDevice { index: id.index() })
    }

    fn device_mut(&mut self, id: DeviceId) -> CircuitResult<&mut Device> {
        self.devices
            .get_mut(id.index() as usize)
            .ok_or(CircuitError::UnknownDevice { index: id.index() })
    }

    /// Netlist identifier of a device (`R0`, `V1`, ...).
    pub fn device_name(&self, id: DeviceId) -> CircuitResult<&str> {
        Ok(self.device(id)?.name())
    }

    /// Node a port is wired to, if any.
    pub fn node_of(&self, port: PortRef) -> CircuitResult<Option<Node>> {
        let dev = self.device(port.device)?;
        dev.slots()
            .get(port.port)
            .copied()
            .ok_or_else(|| CircuitError::PortOutOfRange {
                device: dev.name().to_string(),
                port: port.port,
            })
    }

    /// Resolve a port of a device by its semantic name.
    pub fn port(&self, device: DeviceId, name: &str) -> CircuitResult<PortRef> {
        let dev = self.device(device)?;
        for port in 0..dev.slots().len() {
            if dev.port_name(port) == Some(name) {
                return Ok(PortRef { device, port });
            }
        }
        Err(CircuitError::UnknownPortName {
            device: dev.name().to_string(),
            name: name.to_string(),
        })
    }

    fn push(&mut self, device: Device) -> DeviceId {
        debug!(device = device.name(), "registering device");
        self.devices.push(device);
        DeviceId::from_index((self.devices.len() - 1) as u32)
    }

    pub fn resistor(&mut self, ohms: f64) -> ResistorHandle {
        let name = self.names.next(DeviceKind::Resistor);
        let id = self.push(Device::Resistor(Resistor {
            name,
            ohms,
            slots: [None; 2],
        }));
        ResistorHandle::new(id)
    }

    pub fn capacitor(&mut self, farads: f64) -> CapacitorHandle {
        let name = self.names.next(DeviceKind::Capacitor);
        let id = self.push(Device::Capacitor(Capacitor {
            name,
            farads,
            slots: [None; 2],
        }));
        CapacitorHandle::new(id)
    }

    /// Register a voltage source. A piecewise-linear drive must carry at
    /// least one time/value pair.
    pub fn voltage_source(&mut self, drive: Drive) -> CircuitResult<VoltageSourceHandle> {
        if matches!(&drive, Drive::Pwl(points) if points.is_empty()) {
            return Err(CircuitError::EmptyPwl);
        }
        let name = self.names.next(DeviceKind::VoltageSource);
        let id = self.push(Device::VoltageSource(VoltageSource {
            name,
            drive,
            slots: [None; 2],
        }));
        Ok(VoltageSourceHandle::new(id))
    }

    pub fn bjt(&mut self, model: impl Into<String>) -> BjtHandle {
        let name = self.names.next(DeviceKind::Bjt);
        let id = self.push(Device::Bjt(Bjt {
            name,
            model: model.into(),
            slots: [None; 3],
        }));
        BjtHandle::new(id)
    }

    /// Instantiate an imported subcircuit model.
    pub fn subcircuit(&mut self, model: &SubcircuitModel) -> CircuitResult<SubcircuitHandle> {
        if model.ports.is_empty() {
            return Err(CircuitError::EmptySubcircuit {
                model: model.model.clone(),
            });
        }
        let name = self.names.next(DeviceKind::Subcircuit);
        let id = self.push(Device::Subcircuit(SubcircuitInstance {
            name,
            model: model.model.clone(),
            port_names: model.ports.clone(),
            slots: vec![None; model.ports.len()],
        }));
        Ok(SubcircuitHandle::new(id))
    }

    /// Import a subcircuit definition file and declare its interface.
    ///
    /// The file body is prepended ahead of the netlist exactly once per
    /// canonical path, however many times it is imported.
    pub fn import_subcircuit(
        &mut self,
        path: &Path,
        model: impl Into<String>,
        ports: &[&str],
    ) -> CircuitResult<SubcircuitModel> {
        let model = model.into();
        if ports.is_empty() {
            return Err(CircuitError::EmptySubcircuit { model });
        }
        let canonical = path.canonicalize()?;
        let key = canonical.to_string_lossy().into_owned();
        if !self.includes.iter().any(|inc| inc.key == key) {
            let body = std::fs::read_to_string(&canonical)?;
            self.includes.push(Include { key, body });
        }
        Ok(SubcircuitModel {
            model,
            ports: ports.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Declare a subcircuit from literal definition text, deduplicated by
    /// model name.
    pub fn declare_subcircuit(
        &mut self,
        model: impl Into<String>,
        ports: &[&str],
        body: impl Into<String>,
    ) -> CircuitResult<SubcircuitModel> {
        let model = model.into();
        if ports.is_empty() {
            return Err(CircuitError::EmptySubcircuit { model });
        }
        self.include_literal(format!("subckt:{model}"), body);
        Ok(SubcircuitModel {
            model,
            ports: ports.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Prepend raw netlist text (`.model` cards and the like) ahead of the
    /// device lines, once per key.
    pub fn include_literal(&mut self, key: impl Into<String>, body: impl Into<String>) {
        let key = key.into();
        if !self.includes.iter().any(|inc| inc.key == key) {
            self.includes.push(Include {
                key,
                body: body.into(),
            });
        }
    }

    pub(crate) fn include_bodies(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(|inc| inc.body.as_str())
    }

    fn allocate_node(&mut self) -> Node {
        let node = Node::from_index(self.node_count);
        self.node_count += 1;
        node
    }

    /// Select the slot a terminal contributes, without mutating anything.
    /// `claimed` holds slots taken earlier in the same call, so mentioning
    /// a device twice consumes successive free ports.
    fn pick(&self, terminal: Terminal, claimed: &mut Vec<PortRef>) -> CircuitResult<Pick> {
        match terminal {
            Terminal::Net(node) => Ok(Pick::Existing(node)),
            Terminal::Port(port) => match self.node_of(port)? {
                Some(node) => Ok(Pick::Existing(node)),
                None => {
                    claimed.push(port);
                    Ok(Pick::Free(port))
                }
            },
            Terminal::Device(device) => {
                let dev = self.device(device)?;
                for port in 0..dev.slots().len() {
                    let candidate = PortRef { device, port };
                    if dev.slots()[port].is_none() && !claimed.contains(&candidate) {
                        claimed.push(candidate);
                        return Ok(Pick::Free(candidate));
                    }
                }
                Err(CircuitError::NoFreePort {
                    device: dev.name().to_string(),
                })
            }
        }
    }

    fn assign(&mut self, port: PortRef, node: Node) -> CircuitResult<()> {
        let dev = self.device_mut(port.device)?;
        let name = dev.name().to_string();
        let slot = dev
            .slots_mut()
            .get_mut(port.port)
            .ok_or(CircuitError::PortOutOfRange {
                device: name,
                port: port.port,
            })?;
        *slot = Some(node);
        Ok(())
    }

    /// Wire the given terminals together onto one node.
    ///
    /// If any terminal already carries a node, that node is reused and the
    /// rest join it; otherwise a fresh node is allocated, advancing the
    /// counter by exactly one regardless of arity. Terminals bound to two
    /// different nodes cannot be merged (nodes are never renumbered) and
    /// fail the call before anything is wired.
    ///
    /// Returns a probe on the net, so its voltage can be read back later
    /// without naming a device terminal.
    pub fn connect(&mut self, terminals: &[Terminal]) -> CircuitResult<Probe> {
        if terminals.len() < 2 {
            return Err(CircuitError::Arity {
                op: "connect",
                min: 2,
                got: terminals.len(),
            });
        }

        let mut claimed = Vec::new();
        let mut picks = Vec::with_capacity(terminals.len());
        for &terminal in terminals {
            picks.push(self.pick(terminal, &mut claimed)?);
        }

        let mut existing: Option<Node> = None;
        for pick in &picks {
            if let Pick::Existing(node) = *pick {
                match existing {
                    None => existing = Some(node),
                    Some(prev) if prev != node => {
                        return Err(CircuitError::NetConflict { a: prev, b: node });
                    }
                    Some(_) => {}
                }
            }
        }

        let node = match existing {
            Some(node) => node,
            None => self.allocate_node(),
        };

        for pick in picks {
            if let Pick::Free(port) = pick {
                self.assign(port, node)?;
            }
        }

        debug!(%node, terminals = terminals.len(), "connected net");
        Ok(Probe::new(node))
    }

    /// Bind the given terminals to ground (node 0).
    ///
    /// Never allocates. Re-grounding an already-grounded terminal is a
    /// harmless no-op; a terminal bound to any other node is a conflict,
    /// and a device with no free port is an error rather than a silent
    /// skip.
    pub fn ground(&mut self, terminals: &[Terminal]) -> CircuitResult<()> {
        if terminals.is_empty() {
            return Err(CircuitError::Arity {
                op: "ground",
                min: 1,
                got: 0,
            });
        }

        let mut claimed = Vec::new();
        let mut frees = Vec::new();
        for &terminal in terminals {
            match self.pick(terminal, &mut claimed)? {
                Pick::Existing(node) if node.is_ground() => {}
                Pick::Existing(node) => {
                    return Err(CircuitError::NetConflict {
                        a: Node::GROUND,
                        b: node,
                    });
                }
                Pick::Free(port) => frees.push(port),
            }
        }

        for port in frees {
            self.assign(port, Node::GROUND)?;
        }
        Ok(())
    }

    /// Install decoded simulation results, replacing any previous outcome.
    pub fn apply_outcome(&mut self, outcome: SimOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn outcome(&self) -> Option<&SimOutcome> {
        self.outcome.as_ref()
    }

    /// Voltage of the net a probe is bound to.
    pub fn voltage(&self, probe: Probe) -> CircuitResult<Value> {
        self.voltage_at(probe.node())
    }

    /// Voltage of a node. Ground reads as zero; a node the simulation never
    /// populated is an error.
    pub fn voltage_at(&self, node: Node) -> CircuitResult<Value> {
        let outcome = self.outcome.as_ref().ok_or(CircuitError::NotSimulated)?;
        outcome.voltage(node).ok_or(CircuitError::NoResult { node })
    }

    /// Voltage at a specific device terminal.
    pub fn port_voltage(&self, port: PortRef) -> CircuitResult<Value> {
        let device = self.device(port.device)?.name().to_string();
        let node = self
            .node_of(port)?
            .ok_or(CircuitError::UnwiredPort {
                device,
                port: port.port,
            })?;
        self.voltage_at(node)
    }

    /// Current through a named branch (`v0`, case-insensitive).
    pub fn current(&self, branch: &str) -> CircuitResult<Value> {
        let outcome = self.outcome.as_ref().ok_or(CircuitError::NotSimulated)?;
        outcome
            .current(branch)
            .ok_or_else(|| CircuitError::NoBranch {
                branch: branch.to_ascii_lowercase(),
            })
    }

    /// Time base of the last transient run.
    pub fn time_base(&self) -> Option<&[f64]> {
        self.outcome.as_ref()?.time.as_deref()
    }

    /// Independent axis of the last sweep run.
    pub fn sweep_axis(&self) -> Option<&[f64]> {
        self.outcome.as_ref()?.sweep.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_per_variant_and_per_circuit() {
        let mut a = Circuit::new();
        let r0 = a.resistor(100.0);
        let r1 = a.resistor(200.0);
        let c0 = a.capacitor(1e-6);
        assert_eq!(a.device_name(r0.id()).unwrap(), "R0");
        assert_eq!(a.device_name(r1.id()).unwrap(), "R1");
        assert_eq!(a.device_name(c0.id()).unwrap(), "C0");

        // a second circuit starts numbering from scratch
        let mut b = Circuit::new();
        let r = b.resistor(1.0);
        assert_eq!(b.device_name(r.id()).unwrap(), "R0");
    }

    #[test]
    fn connect_allocates_one_node_per_call() {
        let mut c = Circuit::new();
        let r1 = c.resistor(100.0);
        let r2 = c.resistor(100.0);

        assert_eq!(c.node_count(), 1);
        let probe = c.connect(&[r1.into(), r2.into()]).unwrap();
        assert_eq!(c.node_count(), 2);
        assert_eq!(probe.node(), Node::from_index(1));

        // first free ports were consumed in declaration order
        assert_eq!(c.node_of(r1.top()).unwrap(), Some(Node::from_index(1)));
        assert_eq!(c.node_of(r2.top()).unwrap(), Some(Node::from_index(1)));
        assert_eq!(c.node_of(r1.bottom()).unwrap(), None);
    }

    #[test]
    fn connect_merges_onto_existing_node() {
        let mut c = Circuit::new();
        let r1 = c.resistor(100.0);
        let r2 = c.resistor(100.0);
        let r3 = c.resistor(100.0);

        let net = c.connect(&[r1.bottom().into(), r2.top().into()]).unwrap();
        let before = c.node_count();
        let extended = c.connect(&[net.into(), r3.top().into()]).unwrap();

        // extending an existing net does not advance the counter
        assert_eq!(c.node_count(), before);
        assert_eq!(extended.node(), net.node());
        assert_eq!(c.node_of(r3.top()).unwrap(), Some(net.node()));
    }

    #[test]
    fn connect_twice_consumes_successive_ports() {
        let mut c = Circuit::new();
        let r1 = c.resistor(100.0);
        let r2 = c.resistor(100.0);

        c.connect(&[r1.into(), r2.into()]).unwrap();
        c.connect(&[r1.into(), r2.into()]).unwrap();

        assert!(c.node_of(r1.top()).unwrap().is_some());
        assert!(c.node_of(r1.bottom()).unwrap().is_some());

        // both ports taken: a third mention must fail loudly
        let r3 = c.resistor(100.0);
        assert!(matches!(
            c.connect(&[r1.into(), r3.into()]),
            Err(CircuitError::NoFreePort { .. })
        ));
    }

    #[test]
    fn device_mentioned_twice_in_one_call_takes_two_ports() {
        let mut c = Circuit::new();
        let r = c.resistor(100.0);
        // shorting both terminals of one resistor onto one net
        c.connect(&[r.into(), r.into()]).unwrap();
        assert_eq!(c.node_of(r.top()).unwrap(), c.node_of(r.bottom()).unwrap());
    }

    #[test]
    fn connect_rejects_distinct_assigned_nodes() {
        let mut c = Circuit::new();
        let r1 = c.resistor(100.0);
        let r2 = c.resistor(100.0);
        let a = c.connect(&[r1.top().into(), r2.top().into()]).unwrap();
        let b = c.connect(&[r1.bottom().into(), r2.bottom().into()]).unwrap();

        assert!(matches!(
            c.connect(&[a.into(), b.into()]),
            Err(CircuitError::NetConflict { .. })
        ));
    }

    #[test]
    fn ground_never_allocates() {
        let mut c = Circuit::new();
        let r = c.resistor(100.0);
        let v = c.voltage_source(Drive::Dc(1.0)).unwrap();

        c.ground(&[r.into(), v.neg().into()]).unwrap();
        assert_eq!(c.node_count(), 1);
        assert_eq!(c.node_of(r.top()).unwrap(), Some(Node::GROUND));
        assert_eq!(c.node_of(v.neg()).unwrap(), Some(Node::GROUND));
    }

    #[test]
    fn reground_is_harmless_but_conflicts_fail() {
        let mut c = Circuit::new();
        let r = c.resistor(100.0);
        c.ground(&[r.top().into()]).unwrap();
        c.ground(&[r.top().into()]).unwrap();

        let r2 = c.resistor(100.0);
        c.connect(&[r.bottom().into(), r2.top().into()]).unwrap();
        assert!(matches!(
            c.ground(&[r.bottom().into()]),
            Err(CircuitError::NetConflict { .. })
        ));
    }

    #[test]
    fn port_lookup_by_name() {
        let mut c = Circuit::new();
        let q = c.bjt("2n2222");
        let base = c.port(q.id(), "base").unwrap();
        assert_eq!(base, q.base());
        assert!(matches!(
            c.port(q.id(), "gate"),
            Err(CircuitError::UnknownPortName { .. })
        ));
    }

    #[test]
    fn empty_pwl_is_rejected() {
        let mut c = Circuit::new();
        assert!(matches!(
            c.voltage_source(Drive::Pwl(Vec::new())),
            Err(CircuitError::EmptyPwl)
        ));
    }

    #[test]
    fn voltage_before_simulation_is_an_error() {
        let mut c = Circuit::new();
        let r1 = c.resistor(100.0);
        let r2 = c.resistor(100.0);
        let probe = c.connect(&[r1.into(), r2.into()]).unwrap();
        assert!(matches!(
            c.voltage(probe),
            Err(CircuitError::NotSimulated)
        ));
    }
}
