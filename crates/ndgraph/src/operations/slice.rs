//! Zero-copy slicing.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use std::ops::Range;

/// View a rectangular sub-block of a tensor.
///
/// The result shares storage with `tensor`; writes through either are
/// visible through both.
///
/// # Errors
///
/// Returns error if:
/// - Number of ranges doesn't match tensor dimensions
/// - Any range is empty or out of bounds
///
/// # Example
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::slice;
///
/// let t = Tensor::<f64>::ones(&[4, 5, 6]).unwrap();
/// let s = slice(&t, &[1..3, 0..5, 2..4]).unwrap();
/// assert_eq!(s.shape(), &[2, 5, 2]);
/// assert!(s.shares_storage_with(&t));
/// ```
pub fn slice<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    ranges: &[Range<usize>],
) -> Result<Tensor<ElT>, TensorError> {
    let shape = tensor.shape();
    if ranges.len() != tensor.ndim() {
        return Err(TensorError::WrongNumberOfIndices {
            expected: tensor.ndim(),
            actual: ranges.len(),
        });
    }

    let mut new_shape = Vec::with_capacity(ranges.len());
    let mut offset = tensor.offset();
    for (dim, (range, &stride)) in ranges.iter().zip(tensor.strides()).enumerate() {
        if range.start >= range.end || range.end > shape[dim] {
            return Err(TensorError::SliceOutOfBounds {
                start: range.start,
                end: range.end,
                dim,
                size: shape[dim],
            });
        }
        new_shape.push(range.end - range.start);
        offset += range.start * stride;
    }

    tensor.view(&new_shape, tensor.strides(), offset)
}
