//! Tensor operations.
//!
//! ```text
//! elementwise: add, subtract, multiply, negate, apply, apply_binary
//!     → new contiguous tensor, shapes must match exactly
//! matmul:      matrix_multiply
//!     → new contiguous tensor, rank-2 operands
//! views:       slice, permutedims
//!     → share storage with the input
//! copy:        copy_into
//!     → writes through the destination's layout
//! ```

mod copy;
mod elementwise;
mod matmul;
mod permutedims;
mod slice;

pub use copy::copy_into;
pub use elementwise::{add, apply, apply_binary, multiply, negate, subtract};
pub use matmul::matrix_multiply;
pub use permutedims::permutedims;
pub use slice::slice;
