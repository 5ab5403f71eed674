//! Wiring handles: port references, net probes, and the terminal sum type
//! accepted by `connect`/`ground`.

use cf_core::{DeviceId, Node};

/// A specific terminal slot of a specific device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRef {
    pub device: DeviceId,
    pub port: usize,
}

/// A synthetic junction port: bound to a node, owned by no device.
///
/// `connect` returns a fresh probe for the net it wired, so the same net can
/// be read back from multiple call sites without tying the read to a
/// particular device terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    node: Node,
}

impl Probe {
    pub(crate) fn new(node: Node) -> Self {
        Self { node }
    }

    pub fn node(self) -> Node {
        self.node
    }
}

/// Anything `connect`/`ground` can wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// A specific device terminal.
    Port(PortRef),
    /// A whole device: its first still-unwired port is taken, in declaration
    /// order, one per mention.
    Device(DeviceId),
    /// An existing net, via the probe `connect` returned for it.
    Net(Node),
}

impl From<PortRef> for Terminal {
    fn from(port: PortRef) -> Self {
        Terminal::Port(port)
    }
}

impl From<DeviceId> for Terminal {
    fn from(device: DeviceId) -> Self {
        Terminal::Device(device)
    }
}

impl From<Probe> for Terminal {
    fn from(probe: Probe) -> Self {
        Terminal::Net(probe.node())
    }
}

/// Handle to a resistor registered in a circuit.
///
/// `top`/`bottom` are the physical aliases, `neg`/`pos` the electrical ones:
/// the netlist line emits `pos` (port 1) before `neg` (port 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResistorHandle {
    id: DeviceId,
}

impl ResistorHandle {
    pub(crate) fn new(id: DeviceId) -> Self {
        Self { id }
    }

    pub fn id(self) -> DeviceId {
        self.id
    }

    pub fn top(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 0,
        }
    }

    pub fn neg(self) -> PortRef {
        self.top()
    }

    pub fn bottom(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 1,
        }
    }

    pub fn pos(self) -> PortRef {
        self.bottom()
    }
}

impl From<ResistorHandle> for Terminal {
    fn from(h: ResistorHandle) -> Self {
        Terminal::Device(h.id)
    }
}

/// Handle to a capacitor; same port aliasing as a resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitorHandle {
    id: DeviceId,
}

impl CapacitorHandle {
    pub(crate) fn new(id: DeviceId) -> Self {
        Self { id }
    }

    pub fn id(self) -> DeviceId {
        self.id
    }

    pub fn top(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 0,
        }
    }

    pub fn neg(self) -> PortRef {
        self.top()
    }

    pub fn bottom(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 1,
        }
    }

    pub fn pos(self) -> PortRef {
        self.bottom()
    }
}

impl From<CapacitorHandle> for Terminal {
    fn from(h: CapacitorHandle) -> Self {
        Terminal::Device(h.id)
    }
}

/// Handle to a voltage source (`pos` = port 0, `neg` = port 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoltageSourceHandle {
    id: DeviceId,
}

impl VoltageSourceHandle {
    pub(crate) fn new(id: DeviceId) -> Self {
        Self { id }
    }

    pub fn id(self) -> DeviceId {
        self.id
    }

    pub fn pos(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 0,
        }
    }

    pub fn neg(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 1,
        }
    }
}

impl From<VoltageSourceHandle> for Terminal {
    fn from(h: VoltageSourceHandle) -> Self {
        Terminal::Device(h.id)
    }
}

/// Handle to a bipolar transistor (collector, base, emitter in port order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BjtHandle {
    id: DeviceId,
}

impl BjtHandle {
    pub(crate) fn new(id: DeviceId) -> Self {
        Self { id }
    }

    pub fn id(self) -> DeviceId {
        self.id
    }

    pub fn collector(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 0,
        }
    }

    pub fn base(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 1,
        }
    }

    pub fn emitter(self) -> PortRef {
        PortRef {
            device: self.id,
            port: 2,
        }
    }
}

impl From<BjtHandle> for Terminal {
    fn from(h: BjtHandle) -> Self {
        Terminal::Device(h.id)
    }
}

/// Handle to a subcircuit instance. Ports follow the declaration order of
/// the imported model; use [`crate::Circuit::port`] to resolve them by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubcircuitHandle {
    id: DeviceId,
}

impl SubcircuitHandle {
    pub(crate) fn new(id: DeviceId) -> Self {
        Self { id }
    }

    pub fn id(self) -> DeviceId {
        self.id
    }

    pub fn port(self, index: usize) -> PortRef {
        PortRef {
            device: self.id,
            port: index,
        }
    }
}

impl From<SubcircuitHandle> for Terminal {
    fn from(h: SubcircuitHandle) -> Self {
        Terminal::Device(h.id)
    }
}
