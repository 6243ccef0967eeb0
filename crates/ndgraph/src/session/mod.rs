//! Memoizing execution engine.
//!
//! A [`Session`] holds the tensor values of one computation over a
//! [`Graph`]: values assigned to variables, and the values computed for
//! every node the last time it was evaluated. Each [`Session::run`] starts a
//! new generation; within a generation a node is evaluated at most once,
//! however many paths reach it.
//!
//! A session is single-threaded: tensors share storage through `Rc`, so a
//! session can be neither sent to nor shared with another thread. Run
//! independent sessions per worker instead; any number of sessions may
//! borrow the same graph.

mod values;

pub use values::ValueMap;

use crate::error::GraphError;
use crate::graph::{Graph, NodeId, Op};
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet};

/// Cached evaluation state for one graph.
///
/// # Example
///
/// ```
/// use ndgraph::{Graph, Session, Tensor};
///
/// let mut graph = Graph::new();
/// let a = graph.variable();
/// let b = graph.variable();
/// let sum = graph.add(&[a, b]).unwrap();
///
/// let mut session = Session::new(&graph);
/// session.assign(a, Tensor::from_vec(vec![1, 2], &[2]).unwrap()).unwrap();
/// session.assign(b, Tensor::from_vec(vec![10, 20], &[2]).unwrap()).unwrap();
/// session.run(&[sum]).unwrap();
/// assert_eq!(session.value(sum).unwrap().to_vec().unwrap(), vec![11, 22]);
/// ```
#[derive(Debug)]
pub struct Session<'g, T: Scalar> {
    graph: &'g Graph,
    values: ValueMap<T>,
    generations: HashMap<NodeId, u64>,
    evaluations: HashMap<NodeId, usize>,
    generation: u64,
}

impl<'g, T: Scalar> Session<'g, T> {
    /// Create a session with no values over `graph`.
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            values: ValueMap::new(),
            generations: HashMap::new(),
            evaluations: HashMap::new(),
            generation: 0,
        }
    }

    /// The graph this session evaluates.
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Set the value of a variable.
    ///
    /// The variable's generation stamp is left alone, so the next run
    /// re-reads it like any other node.
    ///
    /// # Errors
    ///
    /// - `GraphError::UnknownNode` if `variable` is not in the graph
    /// - `GraphError::NotAVariable` if it is not a variable
    pub fn assign(&mut self, variable: NodeId, value: Tensor<T>) -> Result<(), GraphError> {
        if !matches!(self.graph.node(variable)?.op(), Op::Variable) {
            return Err(GraphError::NotAVariable { node: variable });
        }
        log::trace!("assign {variable}: shape {:?}", value.shape());
        self.values.insert(variable, value);
        Ok(())
    }

    /// Evaluate `outputs` and everything they depend on.
    ///
    /// Starts a new generation, then walks each output's dependencies
    /// depth-first, evaluating inputs before the nodes that consume them.
    /// Nodes already evaluated during this generation are skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first failing node. Values computed earlier in the same
    /// run are kept; no other cached value is touched.
    ///
    /// - `GraphError::UnassignedVariable` for a variable with no value
    /// - `GraphError::CyclicGraph` if a dependency cycle is reached
    /// - `GraphError::Tensor` if an op rejects its input tensors
    pub fn run(&mut self, outputs: &[NodeId]) -> Result<(), GraphError> {
        self.generation += 1;
        log::debug!(
            "run generation {}: {} output(s)",
            self.generation,
            outputs.len()
        );
        let mut in_progress = HashSet::new();
        for &output in outputs {
            self.evaluate(output, &mut in_progress)?;
        }
        Ok(())
    }

    fn evaluate(
        &mut self,
        id: NodeId,
        in_progress: &mut HashSet<NodeId>,
    ) -> Result<(), GraphError> {
        let graph = self.graph;
        let node = graph.node(id)?;
        if self.generations.get(&id) == Some(&self.generation) {
            log::trace!("{id}: fresh in generation {}", self.generation);
            return Ok(());
        }
        if !in_progress.insert(id) {
            return Err(GraphError::CyclicGraph { node: id });
        }

        for &input in node.inputs() {
            self.evaluate(input, in_progress)?;
        }
        let value = node.op().evaluate(id, &self.values)?;
        log::trace!("{id}: evaluated {} -> {:?}", node.op().name(), value.shape());

        self.values.insert(id, value);
        self.generations.insert(id, self.generation);
        *self.evaluations.entry(id).or_default() += 1;
        in_progress.remove(&id);
        Ok(())
    }

    /// All values held by the session.
    pub fn values(&self) -> &ValueMap<T> {
        &self.values
    }

    /// Value of a node from its last evaluation or assignment.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownNode` if the node has no value.
    pub fn value(&self, id: NodeId) -> Result<&Tensor<T>, GraphError> {
        self.values.value(id)
    }

    /// Number of runs started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation in which `id` was last evaluated, if ever.
    pub fn generation_of(&self, id: NodeId) -> Option<u64> {
        self.generations.get(&id).copied()
    }

    /// How many times `id` has been evaluated over the session's lifetime.
    pub fn evaluation_count(&self, id: NodeId) -> usize {
        self.evaluations.get(&id).copied().unwrap_or(0)
    }

    /// Partial derivative of `y` with respect to `x` at the currently
    /// assigned variable values.
    ///
    /// Only variable assignments are read from the session; cached values of
    /// other nodes are neither used nor updated.
    #[cfg(feature = "autodiff")]
    pub fn partial(&self, y: NodeId, x: NodeId) -> Result<Tensor<T>, GraphError> {
        crate::autodiff::partial(self.graph, &self.values, y, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(data: &[i32]) -> Tensor<i32> {
        Tensor::from_vec(data.to_vec(), &[data.len()]).unwrap()
    }

    #[test]
    fn test_assign_requires_variable() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let s = graph.add(&[a]).unwrap();
        let mut session = Session::new(&graph);
        assert_eq!(
            session.assign(s, vector(&[1])),
            Err(GraphError::NotAVariable { node: s })
        );
        assert_eq!(
            session.assign(NodeId::new(5), vector(&[1])),
            Err(GraphError::UnknownNode {
                node: NodeId::new(5)
            })
        );
        assert!(session.values().is_empty());
    }

    #[test]
    fn test_run_stamps_generation() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let s = graph.add(&[a, a]).unwrap();
        let mut session = Session::new(&graph);
        session.assign(a, vector(&[1, 2])).unwrap();
        assert_eq!(session.generation_of(a), None);

        session.run(&[s]).unwrap();
        assert_eq!(session.generation(), 1);
        assert_eq!(session.generation_of(a), Some(1));
        assert_eq!(session.generation_of(s), Some(1));
        assert_eq!(session.evaluation_count(a), 1);

        session.run(&[s]).unwrap();
        assert_eq!(session.generation_of(s), Some(2));
        assert_eq!(session.evaluation_count(s), 2);
    }

    #[test]
    fn test_unrequested_nodes_not_evaluated() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let sa = graph.add(&[a]).unwrap();
        let sb = graph.add(&[b]).unwrap();
        let mut session = Session::new(&graph);
        session.assign(a, vector(&[1])).unwrap();
        session.run(&[sa]).unwrap();
        assert_eq!(session.evaluation_count(sb), 0);
        assert_eq!(
            session.value(sb).err(),
            Some(GraphError::UnknownNode { node: sb })
        );
    }

    #[test]
    fn test_assigned_tensor_shares_cached_storage() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let t = vector(&[1, 2]);
        assert!(!t.is_shared());

        let mut session = Session::new(&graph);
        session.assign(a, t.clone()).unwrap();
        assert!(t.is_shared());
        assert!(t.shares_storage_with(session.value(a).unwrap()));
        t.set(&[0], 5).unwrap();
        assert_eq!(session.value(a).unwrap().get(&[0]).unwrap(), 5);
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let s = graph.add(&[a]).unwrap();
        let t = graph.add(&[s]).unwrap();
        graph.set_inputs(s, &[a, t]).unwrap();

        let mut session = Session::new(&graph);
        session.assign(a, vector(&[1])).unwrap();
        assert!(matches!(
            session.run(&[t]),
            Err(GraphError::CyclicGraph { .. })
        ));
    }
}
