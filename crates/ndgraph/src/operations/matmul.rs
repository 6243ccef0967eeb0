//! Matrix product of rank-2 tensors.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Multiply an `m x k` matrix by a `k x n` matrix.
///
/// Reads operands through their strides, so transposed or sliced views are
/// accepted. Accumulation stays in `ElT`.
///
/// # Errors
///
/// - `TensorError::RankMismatch` if either operand is not rank 2
/// - `TensorError::InnerDimensionMismatch` if `a.shape[1] != b.shape[0]`
/// - `TensorError::ArithmeticOverflow` if an integer product or sum overflows
///
/// # Example
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::matrix_multiply;
///
/// let a = Tensor::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
/// let id = Tensor::identity(&[2, 2]).unwrap();
/// assert_eq!(matrix_multiply(&a, &id).unwrap(), a);
/// ```
pub fn matrix_multiply<ElT: Scalar>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
) -> Result<Tensor<ElT>, TensorError> {
    for operand in [a, b] {
        if operand.ndim() != 2 {
            return Err(TensorError::RankMismatch {
                expected: 2,
                actual: operand.ndim(),
            });
        }
    }
    let (m, k) = (a.shape()[0], a.shape()[1]);
    let n = b.shape()[1];
    if b.shape()[0] != k {
        return Err(TensorError::InnerDimensionMismatch {
            lhs: a.shape().to_vec(),
            rhs: b.shape().to_vec(),
        });
    }

    let a_data = a.storage().borrow()?;
    let b_data = b.storage().borrow()?;
    let (a_rs, a_cs) = (a.strides()[0], a.strides()[1]);
    let (b_rs, b_cs) = (b.strides()[0], b.strides()[1]);

    let mut out = Vec::with_capacity(m * n);
    for i in 0..m {
        for j in 0..n {
            let mut sum = ElT::zero();
            for p in 0..k {
                let x = a_data[a.offset() + i * a_rs + p * a_cs];
                let y = b_data[b.offset() + p * b_rs + j * b_cs];
                sum = x
                    .mul_checked(y)
                    .and_then(|xy| sum.add_checked(xy))
                    .ok_or(TensorError::ArithmeticOverflow {
                        op: "matrix_multiply",
                    })?;
            }
            out.push(sum);
        }
    }
    Tensor::from_vec(out, &[m, n])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_multiply_3x2_2x3() {
        let a = Tensor::from_vec(vec![1, 2, 1, 2, 1, 2], &[3, 2]).unwrap();
        let b = Tensor::from_vec(vec![1, 2, 3, 1, 2, 3], &[2, 3]).unwrap();
        let c = matrix_multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), &[3, 3]);
        for row in 0..3 {
            assert_eq!(c.get(&[row, 0]).unwrap(), 3);
            assert_eq!(c.get(&[row, 1]).unwrap(), 6);
            assert_eq!(c.get(&[row, 2]).unwrap(), 9);
        }
    }

    #[test]
    fn test_matrix_vector_column() {
        let a = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0], &[3, 3])
            .unwrap();
        let x = Tensor::ones(&[3, 1]).unwrap();
        let y = matrix_multiply(&a, &x).unwrap();
        assert_eq!(y.shape(), &[3, 1]);
        assert_eq!(y.to_vec().unwrap(), vec![6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_transposed_operand() {
        let a = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        let gram = matrix_multiply(&a, &a.transpose().unwrap()).unwrap();
        assert_eq!(gram.to_vec().unwrap(), vec![14, 32, 32, 77]);
    }

    #[test]
    fn test_inner_dimension_mismatch() {
        let a: Tensor<f64> = Tensor::zeros(&[2, 3]).unwrap();
        let b: Tensor<f64> = Tensor::zeros(&[2, 3]).unwrap();
        assert_eq!(
            matrix_multiply(&a, &b).err(),
            Some(TensorError::InnerDimensionMismatch {
                lhs: vec![2, 3],
                rhs: vec![2, 3]
            })
        );
    }

    #[test]
    fn test_rank_mismatch() {
        let a: Tensor<f64> = Tensor::zeros(&[2, 3, 1]).unwrap();
        let b: Tensor<f64> = Tensor::zeros(&[3, 2]).unwrap();
        assert_eq!(
            matrix_multiply(&a, &b).err(),
            Some(TensorError::RankMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert!(matrix_multiply(&b, &Tensor::zeros(&[2]).unwrap()).is_err());
    }

    #[test]
    fn test_integer_accumulation_overflow() {
        let a = Tensor::from_vec(vec![i32::MAX, 1], &[1, 2]).unwrap();
        let b = Tensor::from_vec(vec![1, 1], &[2, 1]).unwrap();
        assert_eq!(
            matrix_multiply(&a, &b).err(),
            Some(TensorError::ArithmeticOverflow {
                op: "matrix_multiply"
            })
        );
        let c = Tensor::from_vec(vec![i32::MAX, -1], &[1, 2]).unwrap();
        assert_eq!(matrix_multiply(&c, &b).unwrap().get(&[0, 0]).unwrap(), i32::MAX - 1);
    }
}
