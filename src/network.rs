//! Construction of the flow network for the class allocation problem.
//!
//! The network consists of the following layers of nodes:
//!
//! ```text
//!                 +--> slot[t] ----------+
//! source --> student[i]                  +--> class[j] --+--> super sink
//!                 +--> overflow in --> overflow out --+  +--> sink --^
//! ```
//!
//! * Every student gets one unit of flow from the source.
//! * A student may send it to the slot nodes of their top five preferences, from where it may go
//!   to any class held at that slot.
//! * Alternatively, the unit may bypass the preferences via the two overflow nodes, which reach
//!   every class. The edge between them only lets `n - minimum_satisfaction` units pass, so at
//!   least `minimum_satisfaction` units have to go through a preferred slot.
//! * Class sizes are bounded from below by splitting each class's outgoing flow: `num_min` units
//!   go directly to the super sink, only the remaining `min(num_max, n) - num_min` units may go
//!   via the sink node. The edge from sink to super sink has capacity `n - Σ num_min`. Thus, a
//!   flow of value `n` must saturate every class's minimum edge.
//!
//! So a valid allocation exists iff the maximum flow from source to super sink equals the number
//! of students.

use crate::error::{AllocationError, Infeasibility};
use crate::flow::{EdgeRef, Flow, FlowGraph};
use crate::{Class, Student, NUM_SLOTS};
use log::{debug, warn};

/// Role of a node in the allocation network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Source,
    Student(usize),
    Slot(usize),
    Class(usize),
    OverflowIn,
    OverflowOut,
    Sink,
    SuperSink,
}

/// Number of nodes not depending on the number of students or classes: source, slots, two
/// overflow nodes, sink and super sink
const FIXED_NODES: usize = NUM_SLOTS + 5;

/// Mapping between node roles and node ids of the network for a given problem size.
///
/// Node ids are laid out as: source, students, slots, classes, overflow in, overflow out, sink,
/// super sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    students: usize,
    classes: usize,
}

impl Layout {
    pub fn new(students: usize, classes: usize) -> Self {
        Layout { students, classes }
    }

    pub fn num_nodes(&self) -> usize {
        self.students + self.classes + FIXED_NODES
    }

    pub fn num_students(&self) -> usize {
        self.students
    }

    pub fn num_classes(&self) -> usize {
        self.classes
    }

    fn first_slot(&self) -> usize {
        1 + self.students
    }

    fn first_class(&self) -> usize {
        self.first_slot() + NUM_SLOTS
    }

    fn overflow_in(&self) -> usize {
        self.first_class() + self.classes
    }

    /// Get the node id of a role. Panics if the role's index is out of range.
    pub fn node(&self, role: NodeRole) -> usize {
        match role {
            NodeRole::Source => 0,
            NodeRole::Student(i) => {
                assert!(i < self.students, "Student {} out of range", i);
                1 + i
            }
            NodeRole::Slot(t) => {
                assert!(t < NUM_SLOTS, "Slot {} out of range", t);
                self.first_slot() + t
            }
            NodeRole::Class(j) => {
                assert!(j < self.classes, "Class {} out of range", j);
                self.first_class() + j
            }
            NodeRole::OverflowIn => self.overflow_in(),
            NodeRole::OverflowOut => self.overflow_in() + 1,
            NodeRole::Sink => self.overflow_in() + 2,
            NodeRole::SuperSink => self.overflow_in() + 3,
        }
    }

    /// Get the role of a node id. Returns None if the id is not part of the network.
    pub fn role(&self, node: usize) -> Option<NodeRole> {
        let role = if node == 0 {
            NodeRole::Source
        } else if node < self.first_slot() {
            NodeRole::Student(node - 1)
        } else if node < self.first_class() {
            NodeRole::Slot(node - self.first_slot())
        } else if node < self.overflow_in() {
            NodeRole::Class(node - self.first_class())
        } else {
            match node - self.overflow_in() {
                0 => NodeRole::OverflowIn,
                1 => NodeRole::OverflowOut,
                2 => NodeRole::Sink,
                3 => NodeRole::SuperSink,
                _ => return None,
            }
        };
        Some(role)
    }
}

/// Edges of the overflow route, bypassing the preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowHop {
    /// student -> overflow in
    Enter { student: usize },
    /// overflow in -> overflow out, limiting the number of unsatisfied students
    Quota,
    /// overflow out -> class
    Exit { class: usize },
}

/// Edges encoding the class size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundHop {
    /// class -> super sink with the class's minimum size
    Minimum { class: usize },
    /// class -> sink with the difference of maximum (capped at `n`) and minimum size
    Remainder { class: usize },
    /// sink -> super sink
    Recycle,
}

/// Meaning of an edge in the allocation network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// source -> student
    Source { student: usize },
    /// student -> slot of one of their top preferences
    Preference { student: usize, slot: usize },
    /// slot -> class held at the slot
    Slot { slot: usize, class: usize },
    Overflow(OverflowHop),
    Bound(BoundHop),
}

/// The flow network of an allocation problem, together with its node layout
pub struct AllocationNetwork {
    layout: Layout,
    graph: FlowGraph<EdgeKind>,
}

impl AllocationNetwork {
    /// Build the flow network for the given students and classes.
    ///
    /// Fails without building anything, if the problem is obviously infeasible (minimum class
    /// sizes exceed the number of students, maximum class sizes are not sufficient or the
    /// minimum satisfaction exceeds the number of students) or a class has a minimum size
    /// larger than its maximum size.
    pub fn build(
        students: &[Student],
        classes: &[Class],
        minimum_satisfaction: usize,
    ) -> Result<Self, AllocationError> {
        let n = students.len();
        for c in classes.iter() {
            if c.num_min > c.num_max {
                return Err(AllocationError::Malformed(format!(
                    "Class {} ({}) has minimum size {} larger than maximum size {}",
                    c.index, c.name, c.num_min, c.num_max
                )));
            }
        }
        if minimum_satisfaction > n {
            return Err(Infeasibility::SatisfactionExceedsStudents {
                minimum_satisfaction,
                students: n,
            }
            .into());
        }
        let total_min = classes
            .iter()
            .fold(0usize, |acc, c| acc.saturating_add(c.num_min));
        if total_min > n {
            return Err(Infeasibility::MinimumExceedsStudents {
                total_min,
                students: n,
            }
            .into());
        }
        let total_max = classes
            .iter()
            .fold(0usize, |acc, c| acc.saturating_add(c.num_max));
        if total_max < n {
            return Err(Infeasibility::CapacityBelowStudents {
                total_max,
                students: n,
            }
            .into());
        }

        let layout = Layout::new(n, classes.len());
        let mut network = AllocationNetwork {
            layout,
            graph: FlowGraph::new(layout.num_nodes()),
        };
        network.connect_students();
        network.connect_preferences(students);
        network.connect_slots(classes);
        network.connect_overflow(minimum_satisfaction);
        network.connect_bounds(classes, total_min);
        debug!(
            "Built allocation network with {} nodes and {} edges.",
            network.graph.num_nodes(),
            network.graph.num_edges()
        );

        Ok(network)
    }

    fn connect(
        &mut self,
        from: NodeRole,
        to: NodeRole,
        capacity: usize,
        kind: EdgeKind,
    ) -> EdgeRef {
        let u = self.layout.node(from);
        let v = self.layout.node(to);
        self.graph.add_edge(u, v, capacity as Flow, kind)
    }

    fn connect_students(&mut self) {
        for i in 0..self.layout.num_students() {
            self.connect(
                NodeRole::Source,
                NodeRole::Student(i),
                1,
                EdgeKind::Source { student: i },
            );
        }
    }

    fn connect_preferences(&mut self, students: &[Student]) {
        for (i, s) in students.iter().enumerate() {
            for slot in s.top_preferences().iter().copied() {
                if slot >= NUM_SLOTS {
                    warn!(
                        "Ignoring preference for slot {} of student {} ({}), which is out of range.",
                        slot, i, s.name
                    );
                    continue;
                }
                self.connect(
                    NodeRole::Student(i),
                    NodeRole::Slot(slot),
                    1,
                    EdgeKind::Preference { student: i, slot },
                );
            }
        }
    }

    fn connect_slots(&mut self, classes: &[Class]) {
        let n = self.layout.num_students();
        for (j, c) in classes.iter().enumerate() {
            if c.slot >= NUM_SLOTS {
                warn!(
                    "Class {} ({}) is held at slot {}, which is out of range. It can only be filled \
                    with unsatisfied students.",
                    j, c.name, c.slot
                );
                continue;
            }
            self.connect(
                NodeRole::Slot(c.slot),
                NodeRole::Class(j),
                n,
                EdgeKind::Slot {
                    slot: c.slot,
                    class: j,
                },
            );
        }
    }

    fn connect_overflow(&mut self, minimum_satisfaction: usize) {
        let n = self.layout.num_students();
        for i in 0..n {
            self.connect(
                NodeRole::Student(i),
                NodeRole::OverflowIn,
                1,
                EdgeKind::Overflow(OverflowHop::Enter { student: i }),
            );
        }
        self.connect(
            NodeRole::OverflowIn,
            NodeRole::OverflowOut,
            n - minimum_satisfaction,
            EdgeKind::Overflow(OverflowHop::Quota),
        );
        for j in 0..self.layout.num_classes() {
            self.connect(
                NodeRole::OverflowOut,
                NodeRole::Class(j),
                n,
                EdgeKind::Overflow(OverflowHop::Exit { class: j }),
            );
        }
    }

    fn connect_bounds(&mut self, classes: &[Class], total_min: usize) {
        let n = self.layout.num_students();
        for (j, c) in classes.iter().enumerate() {
            self.connect(
                NodeRole::Class(j),
                NodeRole::SuperSink,
                c.num_min,
                EdgeKind::Bound(BoundHop::Minimum { class: j }),
            );
            self.connect(
                NodeRole::Class(j),
                NodeRole::Sink,
                c.num_max.min(n) - c.num_min,
                EdgeKind::Bound(BoundHop::Remainder { class: j }),
            );
        }
        self.connect(
            NodeRole::Sink,
            NodeRole::SuperSink,
            n - total_min,
            EdgeKind::Bound(BoundHop::Recycle),
        );
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn graph(&self) -> &FlowGraph<EdgeKind> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut FlowGraph<EdgeKind> {
        &mut self.graph
    }

    pub fn source(&self) -> usize {
        self.layout.node(NodeRole::Source)
    }

    pub fn super_sink(&self) -> usize {
        self.layout.node(NodeRole::SuperSink)
    }

    /// Iterate the forward edges leaving the node of `role` together with their kind, in order of
    /// insertion.
    pub fn edges_from(&self, role: NodeRole) -> impl Iterator<Item = (EdgeRef, EdgeKind)> + '_ {
        self.graph
            .outgoing(self.layout.node(role))
            .filter(|e| e.is_forward())
            .map(move |e| (e, self.graph.label(e)))
    }
}
