//! Tensor copy operations.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::{cartesian_to_linear, indices};
use crate::tensor::Tensor;

/// Copy data from source tensor into destination tensor.
///
/// Both tensors must have the same shape. Elements are written through
/// `dest`'s strides, so the copy is visible through every tensor sharing
/// `dest`'s storage.
///
/// # Errors
///
/// Returns error if shapes don't match.
///
/// # Example
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::copy_into;
///
/// let src = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
/// let dst = Tensor::<f64>::zeros(&[3]).unwrap();
/// copy_into(&dst, &src).unwrap();
/// assert_eq!(dst.to_vec().unwrap(), vec![1.0, 2.0, 3.0]);
/// ```
pub fn copy_into<ElT: Scalar>(dest: &Tensor<ElT>, src: &Tensor<ElT>) -> Result<(), TensorError> {
    if dest.shape() != src.shape() {
        return Err(TensorError::ShapeMismatch {
            lhs: dest.shape().to_vec(),
            rhs: src.shape().to_vec(),
        });
    }
    // Gather first: src may alias dest.
    let values = src.to_vec()?;
    let mut data = dest.storage().borrow_mut()?;
    for (index, value) in indices(dest.shape()).zip(values) {
        data[dest.offset() + cartesian_to_linear(&index, dest.strides())] = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_into_view_is_visible_in_parent() {
        let parent: Tensor<i32> = Tensor::zeros(&[3, 3]).unwrap();
        let diagonal = parent.view(&[3], &[4], 0).unwrap();
        let src = Tensor::from_vec(vec![1, 2, 3], &[3]).unwrap();
        copy_into(&diagonal, &src).unwrap();
        assert_eq!(parent.to_vec().unwrap(), vec![1, 0, 0, 0, 2, 0, 0, 0, 3]);
    }

    #[test]
    fn test_copy_into_from_aliasing_transpose() {
        let t = Tensor::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let tt = t.transpose().unwrap();
        copy_into(&t, &tt).unwrap();
        assert_eq!(t.to_vec().unwrap(), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_copy_into_shape_mismatch() {
        let src = Tensor::from_vec(vec![1.0, 2.0, 3.0], &[3]).unwrap();
        let dst = Tensor::<f64>::zeros(&[2]).unwrap();
        assert!(copy_into(&dst, &src).is_err());
    }
}
