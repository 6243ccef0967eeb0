//! Strided n-dimensional tensor over shared storage.
//!
//! A tensor is a view descriptor `(shape, strides, offset)` over a
//! reference-counted [`Dense`] buffer. Cloning a tensor, or taking a view of
//! it, shares the buffer: writes made through [`Tensor::at`] or
//! [`Tensor::set`] on one handle are visible through every other handle on
//! the same storage. [`Tensor::deep_copy`] is the only way to detach.

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::storage::Dense;
use crate::strides::{
    Dims, cartesian_to_linear, compute_strides, indices, max_linear_offset, num_elements,
    validate_shape,
};
use std::cell::RefMut;

/// Validate `shape` and check that its elements fit in one allocation.
fn allocation_len<ElT>(shape: &[usize]) -> Result<usize, TensorError> {
    validate_shape(shape)?;
    let len = num_elements(shape);
    match len.checked_mul(std::mem::size_of::<ElT>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(len),
        _ => Err(TensorError::InvalidShape {
            shape: shape.to_vec(),
        }),
    }
}

/// A strided n-dimensional tensor.
#[derive(Debug, Clone)]
pub struct Tensor<ElT: Scalar> {
    storage: Dense<ElT>,
    shape: Dims,
    strides: Dims,
    offset: usize,
}

impl<ElT: Scalar> Tensor<ElT> {
    /// Allocate a tensor for `shape`. Always zero-initialized.
    pub fn new(shape: &[usize]) -> Result<Self, TensorError> {
        Self::zeros(shape)
    }

    /// Create a new tensor with the given shape, zero-initialized.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::InvalidShape` if any dimension is zero or the
    /// element count overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndgraph::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::zeros(&[2, 3, 4]).unwrap();
    /// assert_eq!(t.shape(), &[2, 3, 4]);
    /// assert_eq!(t.size(), 24);
    /// ```
    pub fn zeros(shape: &[usize]) -> Result<Self, TensorError> {
        let len = allocation_len::<ElT>(shape)?;
        Ok(Self::contiguous(Dense::zeros(len), shape))
    }

    /// Create a tensor filled with ones.
    pub fn ones(shape: &[usize]) -> Result<Self, TensorError> {
        Self::full(shape, ElT::one())
    }

    /// Create a tensor with every element set to `value`.
    pub fn full(shape: &[usize], value: ElT) -> Result<Self, TensorError> {
        let len = allocation_len::<ElT>(shape)?;
        Ok(Self::contiguous(Dense::from_vec(vec![value; len]), shape))
    }

    /// Create a tensor with ones on the generalized diagonal.
    ///
    /// Element `[i, i, ..., i]` is one for `i < min(shape)`, everything else
    /// is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndgraph::Tensor;
    ///
    /// let t: Tensor<i32> = Tensor::identity(&[2, 3]).unwrap();
    /// assert_eq!(t.to_vec().unwrap(), vec![1, 0, 0, 0, 1, 0]);
    /// ```
    pub fn identity(shape: &[usize]) -> Result<Self, TensorError> {
        let tensor = Self::zeros(shape)?;
        let diagonal = shape.iter().copied().min().unwrap_or(1);
        {
            let mut data = tensor.storage.borrow_mut()?;
            let step: usize = tensor.strides.iter().sum();
            for i in 0..diagonal {
                data[i * step] = ElT::one();
            }
        }
        Ok(tensor)
    }

    /// Create tensor from data laid out in row-major order.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::DataLengthMismatch` if data length doesn't match
    /// the shape, or `TensorError::InvalidShape` for a zero dimension.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndgraph::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t.get(&[0, 2]).unwrap(), 3.0);
    /// assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
    /// ```
    pub fn from_vec(data: Vec<ElT>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected = allocation_len::<ElT>(shape)?;
        if data.len() != expected {
            return Err(TensorError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self::contiguous(Dense::from_vec(data), shape))
    }

    fn contiguous(storage: Dense<ElT>, shape: &[usize]) -> Self {
        Self {
            storage,
            shape: shape.iter().copied().collect(),
            strides: compute_strides(shape),
            offset: 0,
        }
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Offset of element `[0, ..., 0]` in storage.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements addressed by this tensor.
    #[inline]
    pub fn size(&self) -> usize {
        num_elements(&self.shape)
    }

    /// Underlying storage.
    #[inline]
    pub fn storage(&self) -> &Dense<ElT> {
        &self.storage
    }

    /// Storage offset of a multi-index, checked against the shape.
    pub fn linear_index(&self, index: &[usize]) -> Result<usize, TensorError> {
        if index.len() != self.ndim() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: self.ndim(),
                actual: index.len(),
            });
        }
        for (dim, (&idx, &dim_size)) in index.iter().zip(self.shape.iter()).enumerate() {
            if idx >= dim_size {
                return Err(TensorError::IndexOutOfBounds {
                    index: idx,
                    dim,
                    dim_size,
                });
            }
        }
        Ok(self.offset + cartesian_to_linear(index, &self.strides))
    }

    /// Read the element at `index`.
    pub fn get(&self, index: &[usize]) -> Result<ElT, TensorError> {
        let linear = self.linear_index(index)?;
        Ok(self.storage.borrow()?[linear])
    }

    /// Mutable access to the element at `index`.
    ///
    /// The guard keeps the whole storage borrowed; any other access to the
    /// same storage returns `TensorError::StorageBorrowed` until it drops.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndgraph::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::zeros(&[2, 2]).unwrap();
    /// *t.at(&[1, 0]).unwrap() = 4.0;
    /// assert_eq!(t.get(&[1, 0]).unwrap(), 4.0);
    /// ```
    pub fn at(&self, index: &[usize]) -> Result<RefMut<'_, ElT>, TensorError> {
        let linear = self.linear_index(index)?;
        let data = self.storage.borrow_mut()?;
        Ok(RefMut::map(data, |d| &mut d[linear]))
    }

    /// Write `value` at `index`.
    pub fn set(&self, index: &[usize], value: ElT) -> Result<(), TensorError> {
        *self.at(index)? = value;
        Ok(())
    }

    /// Set every element addressed by this view to `value`.
    pub fn fill(&self, value: ElT) -> Result<(), TensorError> {
        let mut data = self.storage.borrow_mut()?;
        for index in indices(&self.shape) {
            data[self.offset + cartesian_to_linear(&index, &self.strides)] = value;
        }
        Ok(())
    }

    /// Elements in logical row-major order, honoring strides and offset.
    pub fn to_vec(&self) -> Result<Vec<ElT>, TensorError> {
        let data = self.storage.borrow()?;
        if self.is_contiguous() {
            return Ok(data[self.offset..self.offset + self.size()].to_vec());
        }
        Ok(indices(&self.shape)
            .map(|index| data[self.offset + cartesian_to_linear(&index, &self.strides)])
            .collect())
    }

    /// Copy into newly allocated contiguous storage.
    ///
    /// Works from any strided view; the result shares nothing with `self`.
    pub fn deep_copy(&self) -> Result<Self, TensorError> {
        Ok(Self::contiguous(
            Dense::from_vec(self.to_vec()?),
            &self.shape,
        ))
    }

    /// Whether the view covers a row-major contiguous block of storage.
    pub fn is_contiguous(&self) -> bool {
        self.shape
            .iter()
            .zip(self.strides.iter())
            .zip(compute_strides(&self.shape).iter())
            .all(|((&dim, &stride), &expected)| dim == 1 || stride == expected)
    }

    /// Create a view over this tensor's storage with an arbitrary layout.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ViewOutOfBounds` if the layout would address
    /// past the end of the storage.
    pub fn view(
        &self,
        shape: &[usize],
        strides: &[usize],
        offset: usize,
    ) -> Result<Self, TensorError> {
        validate_shape(shape)?;
        if shape.len() != strides.len() {
            return Err(TensorError::WrongNumberOfIndices {
                expected: shape.len(),
                actual: strides.len(),
            });
        }
        let len = self.storage.len();
        // usize::MAX stands in for an offset too large to represent
        let max_offset = max_linear_offset(shape, strides)
            .and_then(|extent| extent.checked_add(offset))
            .unwrap_or(usize::MAX);
        if max_offset >= len {
            return Err(TensorError::ViewOutOfBounds { max_offset, len });
        }
        Ok(Self {
            storage: self.storage.clone(),
            shape: shape.iter().copied().collect(),
            strides: strides.iter().copied().collect(),
            offset,
        })
    }

    /// Reshape the tensor to a new shape.
    ///
    /// Returns a view sharing storage when this tensor is contiguous, and a
    /// contiguous copy otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndgraph::Tensor;
    ///
    /// let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
    /// let r = t.reshape(&[3, 2]).unwrap();
    /// assert!(t.shares_storage_with(&r));
    /// assert_eq!(r.get(&[2, 0]).unwrap(), 5);
    /// ```
    pub fn reshape(&self, new_shape: &[usize]) -> Result<Self, TensorError> {
        validate_shape(new_shape)?;
        let new_len = num_elements(new_shape);
        if new_len != self.size() {
            return Err(TensorError::DataLengthMismatch {
                expected: self.size(),
                actual: new_len,
            });
        }
        let source = if self.is_contiguous() {
            self.clone()
        } else {
            self.deep_copy()?
        };
        Ok(Self {
            storage: source.storage,
            shape: new_shape.iter().copied().collect(),
            strides: compute_strides(new_shape),
            offset: source.offset,
        })
    }

    /// Swap the two axes of a matrix without copying.
    pub fn transpose(&self) -> Result<Self, TensorError> {
        if self.ndim() != 2 {
            return Err(TensorError::RankMismatch {
                expected: 2,
                actual: self.ndim(),
            });
        }
        crate::operations::permutedims(self, &[1, 0])
    }

    /// Check if this tensor shares storage with another tensor.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        self.storage.shares_storage_with(&other.storage)
    }

    /// Whether any other handle (clone, view, or cached session value) holds
    /// this tensor's storage.
    pub fn is_shared(&self) -> bool {
        self.storage.is_shared()
    }
}

/// Logical equality: same shape and same elements in row-major order,
/// regardless of layout or storage sharing.
impl<ElT: Scalar> PartialEq for Tensor<ElT> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && match (self.to_vec(), other.to_vec()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            }
    }
}
