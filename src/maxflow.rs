//! The Edmonds–Karp maximum flow algorithm: Ford–Fulkerson with augmenting paths found by
//! breadth-first search in the residual graph.
//!
//! The solver works in place on a `FlowGraph`. Starting from the graph's current flow (usually
//! zero), it augments along shortest paths until the sink is no longer reachable from the source
//! over edges with positive residual capacity.

use crate::flow::{EdgeRef, Flow, FlowGraph};
use log::debug;
use std::collections::VecDeque;

/// Reusable state of the Edmonds–Karp algorithm for graphs with a fixed number of nodes
pub struct EdmondsKarp {
    /// Edge used to discover each node in the current search
    parent: Vec<Option<EdgeRef>>,
    discovered: Vec<bool>,
    queue: VecDeque<usize>,
}

impl EdmondsKarp {
    pub fn new(num_nodes: usize) -> Self {
        EdmondsKarp {
            parent: vec![None; num_nodes],
            discovered: vec![false; num_nodes],
            queue: VecDeque::with_capacity(num_nodes),
        }
    }

    /// Compute a maximum flow from `source` to `sink` and apply it to `graph`. Returns the value of
    /// the flow added by this run.
    pub fn run<K: Copy>(&mut self, graph: &mut FlowGraph<K>, source: usize, sink: usize) -> Flow {
        assert_eq!(
            graph.num_nodes(),
            self.parent.len(),
            "Solver state was created for a different number of nodes"
        );
        let mut total: Flow = 0;
        let mut augmentations = 0usize;

        while self.search(graph, source, sink) {
            let bottleneck = self.bottleneck(graph, source, sink);
            let mut v = sink;
            while v != source {
                let e = self.parent_edge(v);
                graph.push_flow(e, bottleneck);
                v = graph.edge(e).from;
            }
            total += bottleneck;
            augmentations += 1;
        }

        debug!(
            "Maximum flow of {} found after {} augmentations.",
            total, augmentations
        );
        total
    }

    /// Breadth-first search from `source` over edges with positive residual capacity. Stops as
    /// soon as `sink` is discovered. Returns true, if it was.
    fn search<K: Copy>(&mut self, graph: &FlowGraph<K>, source: usize, sink: usize) -> bool {
        self.parent.iter_mut().for_each(|p| *p = None);
        self.discovered.iter_mut().for_each(|d| *d = false);
        self.queue.clear();

        self.discovered[source] = true;
        self.queue.push_back(source);
        while let Some(u) = self.queue.pop_front() {
            for e in graph.outgoing(u) {
                if graph.residual(e) <= 0 {
                    continue;
                }
                let v = graph.edge(e).to;
                if self.discovered[v] {
                    continue;
                }
                self.discovered[v] = true;
                self.parent[v] = Some(e);
                if v == sink {
                    return true;
                }
                self.queue.push_back(v);
            }
        }
        false
    }

    /// Minimum residual capacity along the path found by the last `search()`
    fn bottleneck<K: Copy>(&self, graph: &FlowGraph<K>, source: usize, sink: usize) -> Flow {
        let mut bottleneck = Flow::MAX;
        let mut v = sink;
        while v != source {
            let e = self.parent_edge(v);
            bottleneck = bottleneck.min(graph.residual(e));
            v = graph.edge(e).from;
        }
        bottleneck
    }

    fn parent_edge(&self, v: usize) -> EdgeRef {
        match self.parent[v] {
            Some(e) => e,
            None => unreachable!("Node {} on augmenting path has no parent edge", v),
        }
    }
}
