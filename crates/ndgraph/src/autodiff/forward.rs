//! Uncached forward evaluation.

use crate::error::GraphError;
use crate::graph::{Graph, NodeId, Op};
use crate::scalar::Scalar;
use crate::session::ValueMap;
use crate::tensor::Tensor;

/// Recursive evaluator reading only variable bindings.
pub(crate) struct Forward<'a, T: Scalar> {
    graph: &'a Graph,
    bindings: &'a ValueMap<T>,
}

impl<'a, T: Scalar> Forward<'a, T> {
    /// The graph must already be known to be acyclic.
    pub(crate) fn new(graph: &'a Graph, bindings: &'a ValueMap<T>) -> Self {
        Self { graph, bindings }
    }

    pub(crate) fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Value of `node`, recomputing every non-variable on the way.
    pub(crate) fn value(&self, node: NodeId) -> Result<Tensor<T>, GraphError> {
        let op = self.graph.node(node)?.op();
        if let Op::Variable = op {
            return self
                .bindings
                .get(node)
                .cloned()
                .ok_or(GraphError::UnassignedVariable { node });
        }
        let inputs = op
            .inputs()
            .iter()
            .map(|&input| self.value(input))
            .collect::<Result<Vec<_>, _>>()?;
        op.combine(node, &inputs)
    }
}

/// Evaluate `node` from variable bindings alone, without caching.
///
/// Entries in `bindings` for non-variable nodes are ignored.
///
/// # Errors
///
/// - `GraphError::CyclicGraph` if the graph has a cycle
/// - `GraphError::UnassignedVariable` if a needed variable has no binding
/// - `GraphError::Tensor` if an op rejects its input tensors
pub fn evaluate<T: Scalar>(
    graph: &Graph,
    bindings: &ValueMap<T>,
    node: NodeId,
) -> Result<Tensor<T>, GraphError> {
    graph.validate()?;
    Forward::new(graph, bindings).value(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_ignores_cached_intermediates() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let s = graph.add(&[a, a]).unwrap();

        let mut bindings = ValueMap::new();
        bindings.insert(a, Tensor::from_vec(vec![1, 2], &[2]).unwrap());
        // stale entry for a non-variable must not be used
        bindings.insert(s, Tensor::from_vec(vec![-1, -1], &[2]).unwrap());

        let value = evaluate(&graph, &bindings, s).unwrap();
        assert_eq!(value.to_vec().unwrap(), vec![2, 4]);
        assert_eq!(bindings.value(s).unwrap().to_vec().unwrap(), vec![-1, -1]);
    }

    #[test]
    fn test_evaluate_unassigned() {
        let mut graph = Graph::new();
        let a = graph.variable();
        let b = graph.variable();
        let p = graph.multiply(&[a, b]).unwrap();
        let mut bindings = ValueMap::new();
        bindings.insert(a, Tensor::<f64>::ones(&[1]).unwrap());
        assert_eq!(
            evaluate(&graph, &bindings, p).err(),
            Some(GraphError::UnassignedVariable { node: b })
        );
    }
}
