//! Dimension permutation as a zero-copy view.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Permute the dimensions of a tensor without copying.
///
/// `perm[i]` gives the source dimension for the i-th dimension of the
/// result. The result shares storage with `tensor`.
///
/// # Errors
///
/// Returns error if `perm` is not a valid permutation of `0..ndim`.
///
/// # Examples
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::permutedims;
///
/// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// let t2 = permutedims(&t, &[1, 0]).unwrap();
/// assert_eq!(t2.shape(), &[3, 2]);
/// assert_eq!(t.get(&[1, 0]).unwrap(), t2.get(&[0, 1]).unwrap());
/// ```
pub fn permutedims<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    perm: &[usize],
) -> Result<Tensor<ElT>, TensorError> {
    validate_permutation(perm, tensor.ndim())?;
    let shape: Vec<usize> = perm.iter().map(|&p| tensor.shape()[p]).collect();
    let strides: Vec<usize> = perm.iter().map(|&p| tensor.strides()[p]).collect();
    tensor.view(&shape, &strides, tensor.offset())
}

/// Validate that perm is a valid permutation of 0..ndim.
fn validate_permutation(perm: &[usize], ndim: usize) -> Result<(), TensorError> {
    let invalid = || TensorError::InvalidPermutation {
        perm: perm.to_vec(),
        ndim,
    };
    if perm.len() != ndim {
        return Err(invalid());
    }
    let mut seen = vec![false; ndim];
    for &p in perm {
        if p >= ndim || seen[p] {
            return Err(invalid());
        }
        seen[p] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strides::indices;

    #[test]
    fn test_permutedims_3d() {
        let t = Tensor::from_vec((0..24).collect::<Vec<i64>>(), &[2, 3, 4]).unwrap();
        let t2 = permutedims(&t, &[2, 0, 1]).unwrap();
        assert_eq!(t2.shape(), &[4, 2, 3]);
        for idx in indices(&[2, 3, 4]) {
            let (i, j, k) = (idx[0], idx[1], idx[2]);
            assert_eq!(t.get(&[i, j, k]).unwrap(), t2.get(&[k, i, j]).unwrap());
        }
        assert!(t.shares_storage_with(&t2));
    }

    #[test]
    fn test_permutedims_identity() {
        let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let t2 = permutedims(&t, &[0, 1]).unwrap();
        assert!(t2.is_contiguous());
        assert_eq!(t, t2);
    }

    #[test]
    fn test_permutedims_invalid() {
        let t: Tensor<f64> = Tensor::zeros(&[2, 3]).unwrap();
        assert!(permutedims(&t, &[0]).is_err());
        assert!(permutedims(&t, &[0, 1, 2]).is_err());
        assert!(permutedims(&t, &[0, 2]).is_err());
        assert!(permutedims(&t, &[0, 0]).is_err());
    }
}
