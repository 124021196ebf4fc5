//! A directed capacitated multigraph with residual edges for maximum flow computations.
//!
//! Edges are always created in pairs: A forward edge with the given capacity and a reverse edge
//! with capacity 0. The flow of the reverse edge is always the negated flow of the forward edge,
//! so pushing flow over a reverse edge cancels flow of the forward edge. Both edges of a pair are
//! stored next to each other in the edge list (forward edge at an even position), so the reverse
//! edge of any edge is found by flipping the lowest bit of its index.
//!
//! Each edge pair carries a label of type `K`, which is used by the network builder to attach
//! the meaning of the edge, without the graph or the flow algorithm having to know about it.

/// Type of capacity and flow values. Signed, because reverse edges carry negative flow.
pub type Flow = i64;

/// Reference to an edge in a `FlowGraph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef(usize);

impl EdgeRef {
    /// The paired edge, going into the opposite direction
    pub fn reverse(self) -> EdgeRef {
        EdgeRef(self.0 ^ 1)
    }

    /// True if this is an edge created by `add_edge()`, false if it is the residual reverse edge
    pub fn is_forward(self) -> bool {
        self.0 & 1 == 0
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    capacity: Flow,
    flow: Flow,
}

impl Edge {
    pub fn capacity(&self) -> Flow {
        self.capacity
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Remaining amount of flow, that may be pushed over this edge
    pub fn residual(&self) -> Flow {
        self.capacity - self.flow
    }
}

/// A flow network with a fixed number of nodes `0..num_nodes`
#[derive(Debug, Clone)]
pub struct FlowGraph<K> {
    /// Outgoing edges (forward and reverse) of each node in order of insertion
    adjacency: Vec<Vec<EdgeRef>>,
    edges: Vec<Edge>,
    /// One label per edge pair
    labels: Vec<K>,
}

impl<K: Copy> FlowGraph<K> {
    pub fn new(num_nodes: usize) -> Self {
        FlowGraph {
            adjacency: vec![Vec::new(); num_nodes],
            edges: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, including reverse edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Add an edge from `u` to `v` with the given capacity and its reverse edge from `v` to `u`.
    /// Returns the reference of the forward edge.
    ///
    /// A capacity of 0 is allowed. Panics if `u` or `v` is not a node of this graph or the
    /// capacity is negative.
    pub fn add_edge(&mut self, u: usize, v: usize, capacity: Flow, label: K) -> EdgeRef {
        assert!(
            u < self.num_nodes() && v < self.num_nodes(),
            "Edge {} -> {} out of node range",
            u,
            v
        );
        assert!(capacity >= 0, "Negative capacity {} for edge {} -> {}", capacity, u, v);
        let forward = EdgeRef(self.edges.len());
        self.edges.push(Edge {
            from: u,
            to: v,
            capacity,
            flow: 0,
        });
        self.edges.push(Edge {
            from: v,
            to: u,
            capacity: 0,
            flow: 0,
        });
        self.labels.push(label);
        self.adjacency[u].push(forward);
        self.adjacency[v].push(forward.reverse());
        forward
    }

    pub fn edge(&self, e: EdgeRef) -> &Edge {
        &self.edges[e.0]
    }

    /// The label of the edge pair, `e` belongs to
    pub fn label(&self, e: EdgeRef) -> K {
        self.labels[e.0 >> 1]
    }

    pub fn residual(&self, e: EdgeRef) -> Flow {
        self.edges[e.0].residual()
    }

    pub fn flow(&self, e: EdgeRef) -> Flow {
        self.edges[e.0].flow
    }

    /// Push `amount` units of flow over edge `e`, i.e. increase its flow and decrease the flow of
    /// its reverse edge.
    ///
    /// `amount` must not exceed the residual capacity of `e`.
    pub fn push_flow(&mut self, e: EdgeRef, amount: Flow) {
        debug_assert!(
            amount <= self.residual(e),
            "Pushing {} units over edge {} with residual capacity {}",
            amount,
            e.0,
            self.residual(e)
        );
        self.edges[e.0].flow += amount;
        self.edges[e.reverse().0].flow -= amount;
    }

    /// Iterate the outgoing edges of node `u` (including reverse edges of its incoming edges) in
    /// the order of their creation
    pub fn outgoing(&self, u: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        self.adjacency[u].iter().copied()
    }

    /// Iterate all edges (forward and reverse) in the order of their creation. The position of each
    /// edge in the iteration equals its `EdgeRef::index()`.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeRef, &Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeRef(i), e))
    }

    /// Iterate all forward edges in the order of their creation
    pub fn forward_edges(&self) -> impl Iterator<Item = EdgeRef> {
        (0..self.edges.len()).step_by(2).map(EdgeRef)
    }

    /// Flow leaving node `u` minus flow entering it. Zero for every node except source and sink,
    /// when the current flow is valid.
    pub fn net_outflow(&self, u: usize) -> Flow {
        self.adjacency[u].iter().map(|e| self.edges[e.0].flow).sum()
    }
}
