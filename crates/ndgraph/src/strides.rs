//! Shape and stride utilities.
//!
//! Uses row-major order: the last dimension is contiguous.

use crate::error::TensorError;
use smallvec::SmallVec;

/// Dimension vector used for shapes, strides and multi-indices.
pub type Dims = SmallVec<[usize; 4]>;

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use ndgraph::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[4, 2, 3, 5]).as_slice(), &[30, 15, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]).as_slice(), &[3, 1]);
/// assert_eq!(compute_strides(&[5]).as_slice(), &[1]);
/// assert!(compute_strides(&[]).is_empty());
/// ```
pub fn compute_strides(shape: &[usize]) -> Dims {
    let mut strides: Dims = SmallVec::from_elem(1, shape.len());
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = shape[i + 1] * strides[i + 1];
    }
    strides
}

/// Number of elements addressed by a shape. The empty shape is a scalar.
///
/// The shape must already have passed [`validate_shape`].
#[inline]
pub fn num_elements(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Number of elements addressed by a shape, or `None` if the count does not
/// fit in `isize`.
pub fn checked_num_elements(shape: &[usize]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .filter(|&n| n <= isize::MAX as usize)
}

/// Reject shapes containing a zero dimension or addressing more elements
/// than can be indexed.
pub fn validate_shape(shape: &[usize]) -> Result<(), TensorError> {
    if shape.contains(&0) || checked_num_elements(shape).is_none() {
        return Err(TensorError::InvalidShape {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Convert cartesian indices to a linear offset.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear position to cartesian indices using row-major order.
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Dims {
    let mut indices: Dims = SmallVec::from_elem(0, shape.len());
    for (slot, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *slot = linear % dim;
        linear /= dim;
    }
    indices
}

/// Largest offset (relative to the view's base offset) a shape/stride pair
/// can address, or `None` if it overflows `usize`.
pub fn max_linear_offset(shape: &[usize], strides: &[usize]) -> Option<usize> {
    shape
        .iter()
        .zip(strides.iter())
        .try_fold(0usize, |acc, (&dim, &stride)| {
            dim.saturating_sub(1)
                .checked_mul(stride)
                .and_then(|extent| acc.checked_add(extent))
        })
}

/// Iterate over every multi-index of `shape` in row-major order.
///
/// The scalar shape yields a single empty index.
pub fn indices(shape: &[usize]) -> Indices {
    Indices {
        shape: shape.iter().copied().collect(),
        next: if shape.contains(&0) {
            None
        } else {
            Some(SmallVec::from_elem(0, shape.len()))
        },
    }
}

/// Row-major multi-index iterator returned by [`indices`].
#[derive(Debug, Clone)]
pub struct Indices {
    shape: Dims,
    next: Option<Dims>,
}

impl Iterator for Indices {
    type Item = Dims;

    fn next(&mut self) -> Option<Dims> {
        let current = self.next.take()?;
        let mut advanced = current.clone();
        for d in (0..self.shape.len()).rev() {
            advanced[d] += 1;
            if advanced[d] < self.shape[d] {
                self.next = Some(advanced);
                break;
            }
            advanced[d] = 0;
        }
        Some(current)
    }
}
