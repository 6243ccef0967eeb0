//! Chain-rule partial derivatives.

use super::forward::Forward;
use crate::error::{GraphError, TensorError};
use crate::graph::{Graph, NodeId, Op};
use crate::operations::{add, multiply};
use crate::scalar::Scalar;
use crate::session::ValueMap;
use crate::tensor::Tensor;
use std::collections::HashSet;

/// Partial derivative of `y` with respect to `x`.
///
/// The result has the shape of `x`'s value. Variable values are taken from
/// `bindings`; every other value is recomputed.
///
/// # Errors
///
/// - `GraphError::UnknownNode` if `y` or `x` is not in the graph
/// - `GraphError::CyclicGraph` if the graph has a cycle
/// - `GraphError::UnassignedVariable` if a needed variable has no binding
/// - `GraphError::NotDifferentiable` if a matrix product lies between `y`
///   and `x`
/// - `GraphError::Tensor` if operand shapes differ from `x`'s shape
pub fn partial<T: Scalar>(
    graph: &Graph,
    bindings: &ValueMap<T>,
    y: NodeId,
    x: NodeId,
) -> Result<Tensor<T>, GraphError> {
    graph.node(y)?;
    graph.validate()?;
    log::debug!("partial of {y} with respect to {x}");

    let forward = Forward::new(graph, bindings);
    let x_value = forward.value(x)?;
    let chain = Chain {
        forward,
        x,
        x_shape: x_value.shape().to_vec(),
        dependents: graph.dependents(x)?,
    };
    chain.partial(y)
}

struct Chain<'a, T: Scalar> {
    forward: Forward<'a, T>,
    x: NodeId,
    x_shape: Vec<usize>,
    /// Nodes whose value depends on `x`.
    dependents: HashSet<NodeId>,
}

impl<T: Scalar> Chain<'_, T> {
    fn filled(&self, value: T) -> Result<Tensor<T>, GraphError> {
        Tensor::full(&self.x_shape, value).map_err(|source| GraphError::Tensor {
            node: self.x,
            op: "Variable",
            source,
        })
    }

    fn partial(&self, y: NodeId) -> Result<Tensor<T>, GraphError> {
        if y == self.x {
            return self.filled(T::one());
        }
        if !self.dependents.contains(&y) {
            return self.filled(T::zero());
        }

        let op = self.forward.graph().node(y)?.op();
        let wrap = |source: TensorError| GraphError::Tensor {
            node: y,
            op: op.name(),
            source,
        };
        let mut total: Option<Tensor<T>> = None;
        match op {
            Op::Variable => {}
            Op::Add(inputs) => {
                for &input in inputs.iter().filter(|i| self.dependents.contains(*i)) {
                    let term = self.partial(input)?;
                    total = Some(accumulate(total, term).map_err(wrap)?);
                }
            }
            Op::Multiply(inputs) => {
                for (i, &input) in inputs.iter().enumerate() {
                    if !self.dependents.contains(&input) {
                        continue;
                    }
                    let mut term = self.partial(input)?;
                    for (j, &other) in inputs.iter().enumerate() {
                        if j != i {
                            term = multiply(&self.forward.value(other)?, &term).map_err(wrap)?;
                        }
                    }
                    total = Some(accumulate(total, term).map_err(wrap)?);
                }
            }
            Op::MatrixMultiply(_) => {
                return Err(GraphError::NotDifferentiable {
                    node: y,
                    op: op.name(),
                });
            }
        }
        match total {
            Some(t) => Ok(t),
            None => self.filled(T::zero()),
        }
    }
}

fn accumulate<T: Scalar>(
    total: Option<Tensor<T>>,
    term: Tensor<T>,
) -> Result<Tensor<T>, TensorError> {
    match total {
        Some(acc) => add(&acc, &term),
        None => Ok(term),
    }
}
