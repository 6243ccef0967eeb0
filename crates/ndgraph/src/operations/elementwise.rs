//! Element-wise tensor operations.
//!
//! Operands must have identical shapes; there is no broadcasting. Every
//! result is a newly allocated contiguous tensor, whatever the operands'
//! layouts.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Apply a function to each element, returning a new tensor.
///
/// # Example
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::apply;
///
/// let t = Tensor::from_vec(vec![1.0, 4.0, 9.0], &[3]).unwrap();
/// let ts = apply(&t, |x: f64| x.sqrt()).unwrap();
/// assert_eq!(ts.to_vec().unwrap(), vec![1.0, 2.0, 3.0]);
/// ```
pub fn apply<ElT: Scalar, F>(tensor: &Tensor<ElT>, f: F) -> Result<Tensor<ElT>, TensorError>
where
    F: Fn(ElT) -> ElT,
{
    let data: Vec<ElT> = tensor.to_vec()?.into_iter().map(f).collect();
    Tensor::from_vec(data, tensor.shape())
}

/// Apply a binary function combining two tensors element-wise.
///
/// # Errors
///
/// Returns `TensorError::ShapeMismatch` unless both shapes are identical.
///
/// # Example
///
/// ```
/// use ndgraph::Tensor;
/// use ndgraph::operations::apply_binary;
///
/// let a = Tensor::from_vec(vec![1, 2, 3], &[3]).unwrap();
/// let b = Tensor::from_vec(vec![4, 5, 6], &[3]).unwrap();
/// let c = apply_binary(&a, &b, |x, y| x * 10 + y).unwrap();
/// assert_eq!(c.to_vec().unwrap(), vec![14, 25, 36]);
/// ```
pub fn apply_binary<ElT: Scalar, F>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
    f: F,
) -> Result<Tensor<ElT>, TensorError>
where
    F: Fn(ElT, ElT) -> ElT,
{
    zip_checked(a, b, "apply_binary", |x, y| Some(f(x, y)))
}

fn zip_checked<ElT: Scalar, F>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
    op: &'static str,
    f: F,
) -> Result<Tensor<ElT>, TensorError>
where
    F: Fn(ElT, ElT) -> Option<ElT>,
{
    if a.shape() != b.shape() {
        return Err(TensorError::ShapeMismatch {
            lhs: a.shape().to_vec(),
            rhs: b.shape().to_vec(),
        });
    }
    let data = a
        .to_vec()?
        .into_iter()
        .zip(b.to_vec()?)
        .map(|(x, y)| f(x, y).ok_or(TensorError::ArithmeticOverflow { op }))
        .collect::<Result<Vec<ElT>, _>>()?;
    Tensor::from_vec(data, a.shape())
}

/// Element-wise sum.
///
/// # Errors
///
/// - `TensorError::ShapeMismatch` unless both shapes are identical
/// - `TensorError::ArithmeticOverflow` if an integer sum overflows
pub fn add<ElT: Scalar>(a: &Tensor<ElT>, b: &Tensor<ElT>) -> Result<Tensor<ElT>, TensorError> {
    zip_checked(a, b, "add", ElT::add_checked)
}

/// Element-wise difference `a - b`.
pub fn subtract<ElT: Scalar>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
) -> Result<Tensor<ElT>, TensorError> {
    zip_checked(a, b, "subtract", ElT::sub_checked)
}

/// Element-wise (Hadamard) product.
pub fn multiply<ElT: Scalar>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
) -> Result<Tensor<ElT>, TensorError> {
    zip_checked(a, b, "multiply", ElT::mul_checked)
}

/// Element-wise negation.
pub fn negate<ElT: Scalar>(tensor: &Tensor<ElT>) -> Result<Tensor<ElT>, TensorError> {
    let data = tensor
        .to_vec()?
        .into_iter()
        .map(|x| x.neg_checked().ok_or(TensorError::ArithmeticOverflow { op: "negate" }))
        .collect::<Result<Vec<ElT>, _>>()?;
    Tensor::from_vec(data, tensor.shape())
}
