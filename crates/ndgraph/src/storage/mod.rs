//! Storage types for tensor data.
//!
//! Storage is always a flat buffer; shape, strides and offset come from the
//! [`Tensor`](crate::Tensor) wrapper. Several tensors may view one buffer.

mod dense;

pub use dense::Dense;
