//! Computation graph of symbolic tensor operations.
//!
//! The graph is an arena: it owns every node, and nodes refer to each other
//! through [`NodeId`] handles. A node may feed any number of other nodes.
//! Nodes hold no tensor values; values live in a
//! [`Session`](crate::Session).

mod op;

pub use op::Op;

use crate::error::GraphError;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashSet;
use std::fmt;

/// Unique identifier for a node in a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the internal index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// A node in the computation graph.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    op: Op,
}

impl Node {
    /// Get node ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The operation this node performs.
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Nodes this node depends on, in order.
    pub fn inputs(&self) -> &[NodeId] {
        self.op.inputs()
    }
}

/// Arena of graph nodes.
///
/// # Example
///
/// ```
/// use ndgraph::Graph;
///
/// let mut graph = Graph::new();
/// let a = graph.variable();
/// let b = graph.variable();
/// let sum = graph.add(&[a, b]).unwrap();
/// let y = graph.multiply(&[sum, b]).unwrap();
/// assert_eq!(graph.inputs(y).unwrap(), &[sum, b]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: Op) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { id, op });
        id
    }

    fn check_known(&self, inputs: &[NodeId]) -> Result<(), GraphError> {
        match inputs.iter().find(|id| id.0 >= self.nodes.len()) {
            Some(&node) => Err(GraphError::UnknownNode { node }),
            None => Ok(()),
        }
    }

    fn create(&mut self, template: Op, inputs: &[NodeId]) -> Result<NodeId, GraphError> {
        self.check_known(inputs)?;
        let id = NodeId(self.nodes.len());
        let op = template.with_inputs(id, inputs)?;
        Ok(self.push(op))
    }

    /// Add a variable leaf.
    pub fn variable(&mut self) -> NodeId {
        self.push(Op::Variable)
    }

    /// Add an element-wise sum of one or more inputs.
    pub fn add(&mut self, inputs: &[NodeId]) -> Result<NodeId, GraphError> {
        self.create(Op::Add(Vec::new()), inputs)
    }

    /// Add an element-wise product of one or more inputs.
    pub fn multiply(&mut self, inputs: &[NodeId]) -> Result<NodeId, GraphError> {
        self.create(Op::Multiply(Vec::new()), inputs)
    }

    /// Add the matrix product `a @ b`.
    pub fn matrix_multiply(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
        self.create(Op::MatrixMultiply([a, b]), &[a, b])
    }

    /// Replace the inputs of an existing node, keeping its op kind.
    ///
    /// This is the only way to introduce a cycle; cycles are reported when
    /// the graph is run, differentiated, or [validated](Graph::validate).
    pub fn set_inputs(&mut self, node: NodeId, inputs: &[NodeId]) -> Result<(), GraphError> {
        self.check_known(inputs)?;
        let op = self.node(node)?.op.with_inputs(node, inputs)?;
        self.nodes[node.0].op = op;
        Ok(())
    }

    /// Get node by ID.
    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes
            .get(id.0)
            .ok_or(GraphError::UnknownNode { node: id })
    }

    /// Inputs of a node.
    pub fn inputs(&self, id: NodeId) -> Result<&[NodeId], GraphError> {
        Ok(self.node(id)?.inputs())
    }

    /// Get all nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dependency graph with an edge from every input to its consumer.
    fn dependency_graph(&self) -> DiGraph<NodeId, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), 0);
        for node in &self.nodes {
            graph.add_node(node.id);
        }
        for node in &self.nodes {
            for input in node.inputs() {
                graph.add_edge(NodeIndex::new(input.0), NodeIndex::new(node.id.0), ());
            }
        }
        graph
    }

    /// Check the graph is acyclic, returning nodes with dependencies first.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::CyclicGraph` naming a node on a cycle.
    pub fn validate(&self) -> Result<Vec<NodeId>, GraphError> {
        let graph = self.dependency_graph();
        toposort(&graph, None)
            .map(|order| order.into_iter().map(|idx| graph[idx]).collect())
            .map_err(|cycle| GraphError::CyclicGraph {
                node: graph[cycle.node_id()],
            })
    }

    /// Whether the value of `node` depends, transitively, on `other`.
    ///
    /// A node does not depend on itself unless it lies on a cycle.
    pub fn depends_on(&self, node: NodeId, other: NodeId) -> Result<bool, GraphError> {
        self.node(node)?;
        self.node(other)?;
        let graph = self.dependency_graph();
        let from = NodeIndex::new(other.0);
        Ok(self
            .inputs(node)?
            .iter()
            .any(|input| has_path_connecting(&graph, from, NodeIndex::new(input.0), None)))
    }

    /// Every node whose value depends on `node`, including `node` itself.
    pub fn dependents(&self, node: NodeId) -> Result<HashSet<NodeId>, GraphError> {
        self.node(node)?;
        let graph = self.dependency_graph();
        let mut dfs = Dfs::new(&graph, NodeIndex::new(node.0));
        let mut reached = HashSet::new();
        while let Some(idx) = dfs.next(&graph) {
            reached.insert(graph[idx]);
        }
        Ok(reached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let sum = graph.add(&[a, b]).unwrap();
        let prod = graph.multiply(&[sum, a]).unwrap();
        let mm = graph.matrix_multiply(prod, b).unwrap();

        assert_eq!(graph.len(), 5);
        assert_eq!(mm.index(), 4);
        assert_eq!(graph.node(a).unwrap().op(), &Op::Variable);
        assert_eq!(graph.inputs(sum).unwrap(), &[a, b]);
        assert_eq!(graph.inputs(mm).unwrap(), &[prod, b]);
        assert_eq!(graph.node(prod).unwrap().op().name(), "Multiply");
    }

    #[test]
    fn test_unknown_input_rejected() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let ghost = NodeId::new(7);
        assert_eq!(
            graph.add(&[a, ghost]),
            Err(GraphError::UnknownNode { node: ghost })
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_empty_reduction_rejected() {
        let mut graph = Graph::new();
        assert!(matches!(
            graph.add(&[]),
            Err(GraphError::InvalidArity { op: "Add", actual: 0, .. })
        ));
        assert!(graph.multiply(&[]).is_err());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_validate_orders_dependencies_first() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let sum = graph.add(&[a, b]).unwrap();
        let y = graph.multiply(&[sum, sum]).unwrap();
        let order = graph.validate().unwrap();
        let pos = |id| order.iter().position(|&n| n == id).unwrap();
        assert!(pos(a) < pos(sum));
        assert!(pos(b) < pos(sum));
        assert!(pos(sum) < pos(y));
    }

    #[test]
    fn test_set_inputs_can_form_cycle() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let s = graph.add(&[a]).unwrap();
        let t = graph.add(&[s]).unwrap();
        graph.set_inputs(s, &[a, t]).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(GraphError::CyclicGraph { .. })
        ));
        assert!(graph.depends_on(s, s).unwrap());
    }

    #[test]
    fn test_set_inputs_keeps_op_kind() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let mm = graph.matrix_multiply(a, b).unwrap();
        graph.set_inputs(mm, &[b, a]).unwrap();
        assert_eq!(graph.node(mm).unwrap().op(), &Op::MatrixMultiply([b, a]));
        assert!(graph.set_inputs(mm, &[a]).is_err());
        assert!(graph.set_inputs(a, &[b]).is_err());
    }

    #[test]
    fn test_depends_on() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let c = graph.variable();
        let sum = graph.add(&[a, b]).unwrap();
        let y = graph.multiply(&[sum, b]).unwrap();
        assert!(graph.depends_on(y, a).unwrap());
        assert!(graph.depends_on(y, sum).unwrap());
        assert!(!graph.depends_on(y, c).unwrap());
        assert!(!graph.depends_on(a, a).unwrap());
        assert!(graph.depends_on(y, NodeId::new(99)).is_err());
    }

    #[test]
    fn test_dependents() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let sum = graph.add(&[a, b]).unwrap();
        let y = graph.multiply(&[sum, b]).unwrap();
        let of_a = graph.dependents(a).unwrap();
        assert_eq!(of_a, HashSet::from([a, sum, y]));
        let of_y = graph.dependents(y).unwrap();
        assert_eq!(of_y, HashSet::from([y]));
    }
}
