//! ndgraph - deferred-execution tensor graphs
//!
//! This crate provides a strided n-dimensional tensor over shared storage, a
//! graph of symbolic tensor operations, a session that evaluates the graph
//! on demand with per-run memoization, and chain-rule partial derivatives.
//!
//! # Architecture
//!
//! ```text
//! Graph (arena of Op nodes, NodeId handles)
//!     → Variable | Add | Multiply | MatrixMultiply
//!
//! Session<'g, T> (borrows a Graph)
//!     → assign(variable, tensor)
//!     → run(outputs)          # post-order walk, one evaluation per node per run
//!     → values() / value(id)
//!
//! autodiff::partial(graph, bindings, y, x)   # feature = "autodiff"
//!     → recursive chain rule, recomputes forward values, no caching
//!
//! Tensor<T> (shape, strides, offset over Rc-shared Dense<T>)
//!     → operations: add, subtract, multiply, negate, apply, matrix_multiply
//!     → views: slice, permutedims, transpose, reshape
//! ```
//!
//! # Example
//!
//! ```
//! use ndgraph::{Graph, Session, Tensor};
//!
//! let mut graph = Graph::new();
//! let a = graph.variable();
//! let b = graph.variable();
//! let y = graph.matrix_multiply(a, b).unwrap();
//!
//! let mut session = Session::new(&graph);
//! session.assign(a, Tensor::from_vec(vec![1, 2, 1, 2, 1, 2], &[3, 2]).unwrap()).unwrap();
//! session.assign(b, Tensor::from_vec(vec![1, 2, 3, 1, 2, 3], &[2, 3]).unwrap()).unwrap();
//! session.run(&[y]).unwrap();
//!
//! let out = session.value(y).unwrap();
//! assert_eq!(out.shape(), &[3, 3]);
//! assert_eq!(out.get(&[0, 2]).unwrap(), 9);
//! ```

#[cfg(feature = "autodiff")]
pub mod autodiff;
pub mod error;
pub mod graph;
pub mod operations;
pub mod scalar;
pub mod session;
pub mod storage;
pub mod strides;
pub mod tensor;

pub use error::{GraphError, TensorError};
pub use graph::{Graph, Node, NodeId, Op};
pub use scalar::Scalar;
pub use session::{Session, ValueMap};
pub use storage::Dense;
pub use tensor::Tensor;
