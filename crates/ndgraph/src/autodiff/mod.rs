//! Symbolic partial derivatives over a computation graph.
//!
//! [`partial`] computes `∂y/∂x` as a tensor shaped like `x`'s value by the
//! chain rule, recursing through the ops between `y` and `x`:
//!
//! ```text
//! ∂x/∂x             = 1
//! ∂y/∂x             = 0                      if y does not depend on x
//! ∂(Σ vᵢ)/∂x        = Σ ∂vᵢ/∂x
//! ∂(Π vᵢ)/∂x        = Σᵢ (Π_{j≠i} vⱼ) * ∂vᵢ/∂x
//! ∂(a @ b)/∂x       → NotDifferentiable
//! ```
//!
//! Every input position contributes its own term, so a node reached through
//! several paths (or listed twice as an input) accumulates all of them.
//!
//! Forward values needed by the product rule are recomputed from the
//! variable bindings on every call. No session cache is read or written;
//! callers wanting reuse across calls must memoize above this layer.
//!
//! # Example
//!
//! ```
//! use ndgraph::{Graph, Session, Tensor};
//!
//! let mut graph = Graph::new();
//! let a = graph.variable();
//! let b = graph.variable();
//! let y = graph.multiply(&[a, b]).unwrap();
//!
//! let mut session = Session::new(&graph);
//! session.assign(a, Tensor::from_vec(vec![2.0, 3.0], &[2]).unwrap()).unwrap();
//! session.assign(b, Tensor::from_vec(vec![5.0, 7.0], &[2]).unwrap()).unwrap();
//!
//! let dy_da = session.partial(y, a).unwrap();
//! assert_eq!(dy_da.to_vec().unwrap(), vec![5.0, 7.0]);
//! ```

mod forward;
mod partial;

pub use forward::evaluate;
pub use partial::partial;
