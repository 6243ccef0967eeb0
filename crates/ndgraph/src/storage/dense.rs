//! Shared dense storage for tensor data.

use crate::error::TensorError;
use crate::scalar::Scalar;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Dense storage - a flat, reference-counted, mutable buffer.
///
/// Cloning a `Dense` shares the buffer: a write made through one clone is
/// observed by every other clone. Use [`Dense::deep_clone`] for an
/// independent copy.
#[derive(Debug, Clone)]
pub struct Dense<ElT: Scalar> {
    data: Rc<RefCell<Vec<ElT>>>,
}

impl<ElT: Scalar> Dense<ElT> {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![ElT::zero(); len])
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<ElT>) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// Length of storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    /// Check if storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the whole buffer immutably.
    pub fn borrow(&self) -> Result<Ref<'_, Vec<ElT>>, TensorError> {
        self.data.try_borrow().map_err(|_| TensorError::StorageBorrowed)
    }

    /// Borrow the whole buffer mutably.
    pub fn borrow_mut(&self) -> Result<RefMut<'_, Vec<ElT>>, TensorError> {
        self.data
            .try_borrow_mut()
            .map_err(|_| TensorError::StorageBorrowed)
    }

    /// Allocate a new buffer holding a copy of the data.
    pub fn deep_clone(&self) -> Result<Self, TensorError> {
        Ok(Self::from_vec(self.borrow()?.clone()))
    }

    /// Whether both handles point at the same buffer.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Whether more than one handle refers to this buffer.
    pub fn is_shared(&self) -> bool {
        Rc::strong_count(&self.data) > 1
    }
}
