//! Error types for ndgraph.

use crate::graph::NodeId;
use thiserror::Error;

/// Errors that can occur in tensor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// A dimension of zero was requested.
    #[error("invalid shape {shape:?}: every dimension must be at least 1")]
    InvalidShape { shape: Vec<usize> },

    /// Elementwise operands with different shapes.
    #[error("shape mismatch: {lhs:?} vs {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// Data length doesn't match the number of elements of a shape.
    #[error("data length mismatch: expected {expected} elements, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    /// Operation requires specific tensor rank.
    #[error("expected tensor of rank {expected}, got rank {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// Matrix product with incompatible inner dimensions.
    #[error("inner dimensions do not match: {lhs:?} x {rhs:?}")]
    InnerDimensionMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {dim} with size {dim_size}")]
    IndexOutOfBounds {
        index: usize,
        dim: usize,
        dim_size: usize,
    },

    /// Wrong number of indices provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// Slice range out of bounds or empty.
    #[error("slice range {start}..{end} out of bounds for dimension {dim} with size {size}")]
    SliceOutOfBounds {
        start: usize,
        end: usize,
        dim: usize,
        size: usize,
    },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// A view would address storage past its end.
    #[error("view addresses offset {max_offset} but storage holds {len} elements")]
    ViewOutOfBounds { max_offset: usize, len: usize },

    /// Integer arithmetic left the range of the element type.
    #[error("integer overflow in {op}")]
    ArithmeticOverflow { op: &'static str },

    /// Storage is already mutably borrowed through an `at` guard.
    #[error("tensor storage is already borrowed")]
    StorageBorrowed,
}

/// Errors raised while building, running, or differentiating a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A variable was read before any value was assigned to it.
    #[error("{node} is a variable with no assigned value")]
    UnassignedVariable { node: NodeId },

    /// The dependency walk came back to a node still being evaluated.
    #[error("dependency cycle through {node}")]
    CyclicGraph { node: NodeId },

    /// The node does not belong to the graph, or has no value.
    #[error("{node} is unknown or has not been evaluated")]
    UnknownNode { node: NodeId },

    /// Assignment target is not a variable.
    #[error("{node} is not a variable")]
    NotAVariable { node: NodeId },

    /// Wrong number of inputs for an op kind.
    #[error("{node} ({op}) expects {expected} inputs, got {actual}")]
    InvalidArity {
        node: NodeId,
        op: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// No partial derivative rule exists for this op.
    #[error("{node} ({op}) has no partial derivative rule")]
    NotDifferentiable { node: NodeId, op: &'static str },

    /// A tensor operation failed while evaluating a node.
    #[error("{node} ({op}): {source}")]
    Tensor {
        node: NodeId,
        op: &'static str,
        #[source]
        source: TensorError,
    },
}
