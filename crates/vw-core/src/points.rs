//! Observable points and the dataflow graph between them.
//!
//! Every widget owns one `PointGraph`. Nodes are points: a coordinate plus
//! an ordered, de-duplicated subscriber list. Edges run from an input
//! point to a point whose position a widget rule derives from it, which
//! makes the cascade order of a widget explicit and checkable.
//!
//! `set` never calls back into user code itself. It stores the new
//! coordinates and returns the subscribers to notify, in subscription
//! order; the owning engine dispatches them synchronously before handling
//! anything else. A subscriber must not `set` the point that is currently
//! notifying it.

use crate::id::PointId;
use kurbo::Point;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Subscribers ─────────────────────────────────────────────────────────

/// Index of a drawing primitive within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub usize);

/// Index of a handle within its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub usize);

/// Index of a derived-value rule within its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub usize);

/// Something that wants to hear about a point moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscriber {
    /// A vector or polygon that must recompute its geometry.
    Shape(ShapeId),
    /// A handle whose hit circle follows the point.
    Handle(HandleId),
    /// A widget rule that recomputes derived points and readouts.
    Rule(RuleId),
}

pub type Subscribers = SmallVec<[Subscriber; 4]>;

// ─── Point nodes ─────────────────────────────────────────────────────────

/// One observable point.
#[derive(Debug, Clone)]
pub struct PointNode {
    pub id: PointId,
    pub pos: Point,
    subscribers: Subscribers,
}

impl PointNode {
    pub fn new(id: PointId, pos: Point) -> Self {
        Self {
            id,
            pos,
            subscribers: SmallVec::new(),
        }
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }
}

/// Edge weight: the rule that derives the target from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub rule: RuleId,
}

// ─── Point graph ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PointGraph {
    /// Points and "derived from" edges.
    pub graph: StableDiGraph<PointNode, Derivation>,

    /// Index from PointId → NodeIndex for fast lookup.
    pub id_index: HashMap<PointId, NodeIndex>,
}

impl PointGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point. Re-using an id re-points the index at the new node.
    pub fn add_point(&mut self, id: PointId, pos: Point) -> NodeIndex {
        let idx = self.graph.add_node(PointNode::new(id, pos));
        self.id_index.insert(id, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&PointNode> {
        self.graph.node_weight(idx)
    }

    /// Get the index for a PointId.
    pub fn index_of(&self, id: PointId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Current coordinates of a point.
    pub fn position(&self, idx: NodeIndex) -> Option<Point> {
        self.graph.node_weight(idx).map(|n| n.pos)
    }

    /// Current coordinates of a point, looked up by id.
    pub fn position_of(&self, id: PointId) -> Option<Point> {
        self.index_of(id).and_then(|idx| self.position(idx))
    }

    /// Overwrite a point's coordinates and return who must be notified.
    ///
    /// The coordinates are stored even when unchanged, and the full
    /// subscriber list is returned every time. Unknown indices yield no
    /// subscribers.
    pub fn set(&mut self, idx: NodeIndex, x: f64, y: f64) -> Subscribers {
        match self.graph.node_weight_mut(idx) {
            Some(node) => {
                node.pos = Point::new(x, y);
                log::trace!("set {} = ({x}, {y})", node.id);
                node.subscribers.clone()
            }
            None => SmallVec::new(),
        }
    }

    /// Register a subscriber. Returns `false` if it was already registered
    /// on this point (or the point does not exist).
    pub fn on_change(&mut self, idx: NodeIndex, subscriber: Subscriber) -> bool {
        let Some(node) = self.graph.node_weight_mut(idx) else {
            return false;
        };
        if node.subscribers.contains(&subscriber) {
            return false;
        }
        node.subscribers.push(subscriber);
        true
    }

    pub fn subscribers(&self, idx: NodeIndex) -> &[Subscriber] {
        self.graph
            .node_weight(idx)
            .map(|n| n.subscribers())
            .unwrap_or(&[])
    }

    /// Record that `rule` computes `output` from `input`.
    pub fn derive(&mut self, input: NodeIndex, output: NodeIndex, rule: RuleId) {
        if self.graph.find_edge(input, output).is_none() {
            self.graph.add_edge(input, output, Derivation { rule });
        }
    }

    /// Points derived directly from `idx`, in insertion order.
    pub fn dependents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        out.sort();
        out
    }

    /// Points that `idx` is derived from, in insertion order.
    pub fn inputs_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .collect();
        out.sort();
        out
    }

    /// Whether any rule writes to this point.
    pub fn is_derived(&self, idx: NodeIndex) -> bool {
        !self.inputs_of(idx).is_empty()
    }

    /// All points ordered so every input precedes what is derived from it.
    pub fn derivation_order(&self) -> Result<Vec<NodeIndex>, String> {
        petgraph::algo::toposort(&self.graph, None).map_err(|cycle| {
            let id = self.graph[cycle.node_id()].id;
            format!("Derivation cycle through point {id}")
        })
    }
}
