//! The ZX-diagram value type.
//!
//! A diagram is a labeled undirected graph: node identifiers, edges between
//! distinct nodes, and a `(spider kind, phase)` label on every node.
//! Diagrams are value types with copy semantics; every mutation happens on an
//! owned clone and nothing hands out aliasing references into an ensemble.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, ZxError};
use crate::phase::Phase;
use crate::NodeId;

/// Spider polymorphic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Spider {
    /// Z-basis spider.
    Z,
    /// X-basis spider.
    X,
}

impl Spider {
    /// Returns the opposite spider kind.
    pub fn flipped(&self) -> Spider {
        match self {
            Spider::Z => Spider::X,
            Spider::X => Spider::Z,
        }
    }
}

/// Label carried by every diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeLabel {
    /// Spider kind.
    pub spider: Spider,
    /// Dyadic phase.
    pub phase: Phase,
}

impl NodeLabel {
    /// Creates a label.
    pub fn new(spider: Spider, phase: Phase) -> Self {
        Self { spider, phase }
    }
}

/// A ZX-diagram: nodes, undirected edges, and one label per node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZxDiagram {
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    labels: BTreeMap<NodeId, NodeLabel>,
}

impl ZxDiagram {
    /// Creates an empty diagram, which is valid by definition.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            labels: BTreeMap::new(),
        }
    }

    /// The canonical seed diagram: a single Z-spider with phase 0.
    ///
    /// Every evolution starts here; the constructor is deterministic.
    pub fn seed() -> Self {
        let mut diagram = Self::new();
        diagram.add_node(NodeLabel::new(Spider::Z, Phase::zero()));
        diagram
    }

    /// Adds a node with a freshly allocated identifier and returns it.
    pub fn add_node(&mut self, label: NodeLabel) -> NodeId {
        let id = NodeId::from_raw(
            self.nodes
                .iter()
                .map(|node| node.as_raw() + 1)
                .max()
                .unwrap_or(0),
        );
        self.nodes.push(id);
        self.labels.insert(id, label);
        id
    }

    /// Inserts a node with an explicit identifier.
    pub fn insert_node(&mut self, id: NodeId, label: NodeLabel) -> Result<(), ZxError> {
        if self.labels.contains_key(&id) {
            return Err(diagram_error("duplicate-node", "node already exists")
                .with_node("node", id));
        }
        self.nodes.push(id);
        self.labels.insert(id, label);
        Ok(())
    }

    /// Adds an undirected edge between two existing, distinct nodes.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), ZxError> {
        if u == v {
            return Err(diagram_error("self-loop", "self-loops are not permitted")
                .with_node("node", u));
        }
        for node in [u, v] {
            if !self.labels.contains_key(&node) {
                return Err(diagram_error("unknown-node", "edge references unknown node")
                    .with_node("node", node));
            }
        }
        self.edges.push((u, v));
        Ok(())
    }

    /// Removes a node and every edge incident to it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), ZxError> {
        if self.labels.remove(&id).is_none() {
            return Err(diagram_error("unknown-node", "node does not exist")
                .with_node("node", id));
        }
        self.nodes.retain(|node| *node != id);
        self.edges.retain(|(u, v)| *u != id && *v != id);
        Ok(())
    }

    /// Removes one edge between `u` and `v`, in either orientation.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), ZxError> {
        let position = self
            .edges
            .iter()
            .position(|(a, b)| (*a == u && *b == v) || (*a == v && *b == u));
        match position {
            Some(idx) => {
                self.edges.remove(idx);
                Ok(())
            }
            None => Err(diagram_error("unknown-edge", "edge does not exist")
                .with_node("u", u)
                .with_node("v", v)),
        }
    }

    /// Replaces the label of an existing node.
    pub fn set_label(&mut self, id: NodeId, label: NodeLabel) -> Result<(), ZxError> {
        match self.labels.get_mut(&id) {
            Some(slot) => {
                *slot = label;
                Ok(())
            }
            None => Err(diagram_error("unknown-node", "node does not exist")
                .with_node("node", id)),
        }
    }

    /// Returns the label of a node, if present.
    pub fn label(&self, id: NodeId) -> Option<&NodeLabel> {
        self.labels.get(&id)
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// All labels keyed by node.
    pub fn labels(&self) -> &BTreeMap<NodeId, NodeLabel> {
        &self.labels
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the diagram has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Degree of a node (0 for unknown nodes).
    pub fn degree(&self, id: NodeId) -> usize {
        self.edges
            .iter()
            .filter(|(u, v)| *u == id || *v == id)
            .count()
    }

    /// Undirected adjacency lists for every node.
    pub fn adjacency(&self) -> BTreeMap<NodeId, Vec<NodeId>> {
        let mut adjacency: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
        for node in &self.nodes {
            adjacency.entry(*node).or_default();
        }
        for (u, v) in &self.edges {
            adjacency.entry(*u).or_default().push(*v);
            adjacency.entry(*v).or_default().push(*u);
        }
        adjacency
    }

    /// Whether an edge between `u` and `v` exists, in either orientation.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.edges
            .iter()
            .any(|(a, b)| (*a == u && *b == v) || (*a == v && *b == u))
    }

    /// Number of Z-spiders.
    pub fn z_count(&self) -> usize {
        self.labels
            .values()
            .filter(|label| label.spider == Spider::Z)
            .count()
    }

    /// Number of X-spiders.
    pub fn x_count(&self) -> usize {
        self.labels
            .values()
            .filter(|label| label.spider == Spider::X)
            .count()
    }

    /// Maximum number of undirected edges for the current node count.
    pub fn max_edges(&self) -> usize {
        let n = self.nodes.len();
        n.saturating_sub(1) * n / 2
    }

    /// Edge density in `[0, 1]` (0 for diagrams with fewer than two nodes).
    pub fn density(&self) -> f64 {
        let max = self.max_edges();
        if max == 0 {
            0.0
        } else {
            self.edges.len() as f64 / max as f64
        }
    }

    /// Checks the structural contract.
    ///
    /// Failures: a duplicate node identifier, an edge referencing an unknown
    /// node, a self-loop, a node without a label, a label without a node, or
    /// a phase off the dyadic grid (possible after deserialization).
    pub fn validate(&self) -> Result<(), ZxError> {
        let node_set: BTreeSet<NodeId> = self.nodes.iter().copied().collect();
        if node_set.len() != self.nodes.len() {
            return Err(diagram_error("duplicate-node", "node list contains duplicates"));
        }
        for (u, v) in &self.edges {
            if u == v {
                return Err(diagram_error("self-loop", "self-loops are not permitted")
                    .with_node("node", *u));
            }
            for node in [u, v] {
                if !node_set.contains(node) {
                    return Err(diagram_error("unknown-node", "edge references unknown node")
                        .with_node("node", *node));
                }
            }
        }
        for node in &self.nodes {
            match self.labels.get(node) {
                None => {
                    return Err(diagram_error("missing-label", "node has no label")
                        .with_node("node", *node));
                }
                Some(label) if !label.phase.is_canonical() => {
                    return Err(diagram_error(
                        "bad-denominator",
                        "phase is not on the dyadic grid",
                    )
                    .with_node("node", *node));
                }
                Some(_) => {}
            }
        }
        for node in self.labels.keys() {
            if !node_set.contains(node) {
                return Err(diagram_error("orphan-label", "label references unknown node")
                    .with_node("node", *node));
            }
        }
        Ok(())
    }

    /// Edges as an order-independent set of `(min, max)` raw pairs.
    pub(crate) fn edge_signatures(&self) -> BTreeSet<(u64, u64)> {
        self.edges
            .iter()
            .map(|(u, v)| {
                let (a, b) = (u.as_raw(), v.as_raw());
                (a.min(b), a.max(b))
            })
            .collect()
    }
}

impl Default for ZxDiagram {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural equality: same node count, same label per node, same
/// undirected edge set. Edge ordering and orientation are ignored.
impl PartialEq for ZxDiagram {
    fn eq(&self, other: &Self) -> bool {
        if self.nodes.len() != other.nodes.len() || self.edges.len() != other.edges.len() {
            return false;
        }
        if self.labels != other.labels {
            return false;
        }
        self.edge_signatures() == other.edge_signatures()
    }
}

impl Eq for ZxDiagram {}

fn diagram_error(code: impl Into<String>, message: impl Into<String>) -> ZxError {
    ZxError::Diagram(ErrorInfo::new(code, message))
}

trait NodeContextExt {
    fn with_node(self, key: impl Into<String>, node: NodeId) -> ZxError;
}

impl NodeContextExt for ZxError {
    fn with_node(self, key: impl Into<String>, node: NodeId) -> ZxError {
        match self {
            ZxError::Diagram(info) => ZxError::Diagram(info.with_context(key, node.as_raw())),
            other => other,
        }
    }
}
