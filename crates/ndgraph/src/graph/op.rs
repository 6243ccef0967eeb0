//! Op kinds and their evaluation rules.

use super::NodeId;
use crate::error::{GraphError, TensorError};
use crate::operations::{add, matrix_multiply, multiply};
use crate::scalar::Scalar;
use crate::session::ValueMap;
use crate::tensor::Tensor;

/// The operation a graph node performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Leaf whose value is assigned from outside the graph.
    Variable,
    /// Left-to-right element-wise sum of one or more inputs.
    Add(Vec<NodeId>),
    /// Left-to-right element-wise product of one or more inputs.
    Multiply(Vec<NodeId>),
    /// Matrix product of exactly two rank-2 inputs.
    MatrixMultiply([NodeId; 2]),
}

impl Op {
    /// Short name used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Variable => "Variable",
            Op::Add(_) => "Add",
            Op::Multiply(_) => "Multiply",
            Op::MatrixMultiply(_) => "MatrixMultiply",
        }
    }

    /// Nodes this op depends on, in order.
    pub fn inputs(&self) -> &[NodeId] {
        match self {
            Op::Variable => &[],
            Op::Add(inputs) | Op::Multiply(inputs) => inputs,
            Op::MatrixMultiply(pair) => pair,
        }
    }

    /// Build an op of the same kind as `self` over new inputs.
    pub(crate) fn with_inputs(&self, node: NodeId, inputs: &[NodeId]) -> Result<Op, GraphError> {
        let arity = |expected| GraphError::InvalidArity {
            node,
            op: self.name(),
            expected,
            actual: inputs.len(),
        };
        match self {
            Op::Variable if inputs.is_empty() => Ok(Op::Variable),
            Op::Variable => Err(arity("0")),
            Op::Add(_) | Op::Multiply(_) if inputs.is_empty() => Err(arity("at least 1")),
            Op::Add(_) => Ok(Op::Add(inputs.to_vec())),
            Op::Multiply(_) => Ok(Op::Multiply(inputs.to_vec())),
            Op::MatrixMultiply(_) => match inputs {
                &[a, b] => Ok(Op::MatrixMultiply([a, b])),
                _ => Err(arity("2")),
            },
        }
    }

    /// Compute the value of `node` from the values already cached for its
    /// inputs.
    ///
    /// Never recurses: every input must have an entry in `values`, otherwise
    /// `GraphError::UnknownNode` names the missing input. A variable reads
    /// its own assigned entry.
    pub fn evaluate<T: Scalar>(
        &self,
        node: NodeId,
        values: &ValueMap<T>,
    ) -> Result<Tensor<T>, GraphError> {
        if let Op::Variable = self {
            return values
                .get(node)
                .cloned()
                .ok_or(GraphError::UnassignedVariable { node });
        }
        let inputs = self
            .inputs()
            .iter()
            .map(|&input| values.value(input).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        self.combine(node, &inputs)
    }

    /// Apply this op to already-evaluated input tensors.
    pub(crate) fn combine<T: Scalar>(
        &self,
        node: NodeId,
        inputs: &[Tensor<T>],
    ) -> Result<Tensor<T>, GraphError> {
        let wrap = |source: TensorError| GraphError::Tensor {
            node,
            op: self.name(),
            source,
        };
        match (self, inputs) {
            (Op::Variable, _) => Err(GraphError::UnassignedVariable { node }),
            (Op::Add(_), [first, rest @ ..]) => rest
                .iter()
                .try_fold(first.deep_copy().map_err(wrap)?, |acc, t| add(&acc, t))
                .map_err(wrap),
            (Op::Multiply(_), [first, rest @ ..]) => rest
                .iter()
                .try_fold(first.deep_copy().map_err(wrap)?, |acc, t| multiply(&acc, t))
                .map_err(wrap),
            (Op::MatrixMultiply(_), [a, b]) => matrix_multiply(a, b).map_err(wrap),
            _ => Err(GraphError::InvalidArity {
                node,
                op: self.name(),
                expected: if let Op::MatrixMultiply(_) = self {
                    "2"
                } else {
                    "at least 1"
                },
                actual: inputs.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(NodeId::new).collect()
    }

    fn cached(entries: &[(NodeId, Tensor<i32>)]) -> ValueMap<i32> {
        let mut values = ValueMap::new();
        for (id, t) in entries {
            values.insert(*id, t.clone());
        }
        values
    }

    #[test]
    fn test_inputs() {
        let n = ids(3);
        assert!(Op::Variable.inputs().is_empty());
        assert_eq!(Op::Add(n.clone()).inputs(), n.as_slice());
        assert_eq!(Op::MatrixMultiply([n[1], n[0]]).inputs(), &[n[1], n[0]]);
    }

    #[test]
    fn test_add_left_to_right() {
        let n = ids(4);
        let values = cached(&[
            (n[0], Tensor::from_vec(vec![1, 2], &[2]).unwrap()),
            (n[1], Tensor::from_vec(vec![10, 20], &[2]).unwrap()),
            (n[2], Tensor::from_vec(vec![100, 200], &[2]).unwrap()),
        ]);
        let op = Op::Add(vec![n[0], n[1], n[2]]);
        let out = op.evaluate(n[3], &values).unwrap();
        assert_eq!(out.to_vec().unwrap(), vec![111, 222]);
    }

    #[test]
    fn test_unary_reduction_is_identity_copy() {
        let n = ids(2);
        let x = Tensor::from_vec(vec![3, 4], &[2]).unwrap();
        let values = cached(&[(n[0], x.clone())]);
        for op in [Op::Add(vec![n[0]]), Op::Multiply(vec![n[0]])] {
            let out = op.evaluate(n[1], &values).unwrap();
            assert_eq!(out, x);
            assert!(!out.shares_storage_with(&x));
        }
    }

    #[test]
    fn test_missing_input_is_unknown_node() {
        let n = ids(3);
        let values = cached(&[(n[0], Tensor::ones(&[2]).unwrap())]);
        let op = Op::Multiply(vec![n[0], n[1]]);
        assert_eq!(
            op.evaluate(n[2], &values).err(),
            Some(GraphError::UnknownNode { node: n[1] })
        );
    }

    #[test]
    fn test_unassigned_variable() {
        let values: ValueMap<i32> = ValueMap::new();
        let node = NodeId::new(0);
        assert_eq!(
            Op::Variable.evaluate(node, &values).err(),
            Some(GraphError::UnassignedVariable { node })
        );
    }

    #[test]
    fn test_tensor_error_carries_node() {
        let n = ids(3);
        let values = cached(&[
            (n[0], Tensor::zeros(&[2, 3]).unwrap()),
            (n[1], Tensor::zeros(&[3, 2]).unwrap()),
        ]);
        let err = Op::Add(vec![n[0], n[1]]).evaluate(n[2], &values).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Tensor {
                op: "Add",
                source: TensorError::ShapeMismatch { .. },
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "node #2 (Add): shape mismatch: [2, 3] vs [3, 2]"
        );
    }

    #[test]
    fn test_with_inputs_arity() {
        let n = ids(3);
        let mm = Op::MatrixMultiply([n[0], n[1]]);
        assert!(mm.with_inputs(n[2], &[n[0]]).is_err());
        assert_eq!(
            mm.with_inputs(n[2], &[n[1], n[0]]).unwrap(),
            Op::MatrixMultiply([n[1], n[0]])
        );
        assert!(Op::Add(vec![n[0]]).with_inputs(n[2], &[]).is_err());
        assert!(Op::Variable.with_inputs(n[2], &[n[0]]).is_err());
    }
}
