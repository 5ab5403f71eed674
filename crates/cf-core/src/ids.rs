use core::fmt;

/// Electrical node: identifies a set of electrically-common terminals.
///
/// - node 0 is permanently reserved for ground/reference
/// - nodes >= 1 are allocated monotonically by the owning circuit,
///   never reused, never renumbered
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(u32);

impl Node {
    /// The reference node. Only explicit grounding binds terminals to it;
    /// the allocation counter never produces it.
    pub const GROUND: Node = Node(0);

    pub fn from_index(index: u32) -> Self {
        Node(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn is_ground(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a device in its circuit's insertion-ordered device list.
///
/// Insertion order is netlist emission order, so the id doubles as a stable
/// handle for topology queries.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(u32);

impl DeviceId {
    pub fn from_index(index: u32) -> Self {
        DeviceId(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
