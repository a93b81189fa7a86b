//! The state-space graph: nodes are (position, velocity) states, edges are
//! one-turn transitions tagged with the acceleration that produces them.
//!
//! Nodes live in a flat arena and are addressed by [`NodeId`]. The graph
//! holds no search state, so one [`Graph`] can back any number of
//! [`DijkstraPathFinder`](crate::DijkstraPathFinder)s at once.

use std::collections::{HashMap, HashSet};
use std::fmt;

use racetrack_core::{Direction, Point};

/// Stable index of a node in its [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed, weighted edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphConnection {
    pub from: NodeId,
    pub to: NodeId,
    /// Turns needed to traverse the edge. Always 1 for generated graphs.
    pub cost: i32,
    /// The acceleration applied at `from` to reach `to`.
    pub direction: Direction,
}

/// One discrete (position, velocity) state.
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: NodeId,
    position: Point,
    velocity: Point,
    connections: Vec<GraphConnection>,
}

impl GraphNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// The velocity a car has when it is at this node.
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    /// The natural key of the node, unique within its graph.
    pub fn key(&self) -> (Point, Point) {
        (self.position, self.velocity)
    }

    /// Outgoing connections, in the order they were generated.
    pub fn connections(&self) -> &[GraphConnection] {
        &self.connections
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {} [{} / {}]", self.id.0, self.position, self.velocity)
    }
}

/// An immutable state-space graph plus its finish-line nodes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<(Point, Point), NodeId>,
    end_nodes: Vec<NodeId>,
}

impl Graph {
    /// A graph without any node. Every search on it finds no path.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    /// Look up the node for a (position, velocity) state.
    pub fn find(&self, position: Point, velocity: Point) -> Option<NodeId> {
        self.index.get(&(position, velocity)).copied()
    }

    /// Nodes whose position lies on a finish-line cell, in id order.
    pub fn end_nodes(&self) -> &[NodeId] {
        &self.end_nodes
    }

    /// Every connection of the graph, grouped by source node.
    pub fn connections(&self) -> impl Iterator<Item = &GraphConnection> + '_ {
        self.nodes.iter().flat_map(|n| n.connections.iter())
    }

    pub fn connection_count(&self) -> usize {
        self.nodes.iter().map(|n| n.connections.len()).sum()
    }
}

/// Incremental construction of a [`Graph`], used by the generators.
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    nodes: Vec<GraphNode>,
    index: HashMap<(Point, Point), NodeId>,
}

impl GraphBuilder {
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn find(&self, position: Point, velocity: Point) -> Option<NodeId> {
        self.index.get(&(position, velocity)).copied()
    }

    pub(crate) fn key(&self, id: NodeId) -> (Point, Point) {
        self.nodes[id.0].key()
    }

    /// Add a node for a state that is not in the graph yet.
    pub(crate) fn insert(&mut self, position: Point, velocity: Point) -> NodeId {
        debug_assert!(self.find(position, velocity).is_none());
        let id = NodeId(self.nodes.len());
        self.nodes.push(GraphNode {
            id,
            position,
            velocity,
            connections: Vec::new(),
        });
        self.index.insert((position, velocity), id);
        id
    }

    /// Connect `from` to `to`. A connection identical to an existing one is
    /// ignored.
    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId, cost: i32, direction: Direction) {
        let connection = GraphConnection {
            from,
            to,
            cost,
            direction,
        };
        let node = &mut self.nodes[from.0];
        if !node.connections.contains(&connection) {
            node.connections.push(connection);
        }
    }

    /// Freeze the graph, marking nodes on any of `finish` as end nodes.
    pub(crate) fn build(self, finish: &[Point]) -> Graph {
        let finish: HashSet<Point> = finish.iter().copied().collect();
        let end_nodes = self
            .nodes
            .iter()
            .filter(|n| finish.contains(&n.position))
            .map(|n| n.id)
            .collect();
        Graph {
            nodes: self.nodes,
            index: self.index,
            end_nodes,
        }
    }
}
