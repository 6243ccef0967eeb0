//! Scalar trait for tensor element types.

use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// Trait for scalar types supported by ndgraph.
///
/// Accumulation in every operation stays within `Self`; no widening to a
/// larger type takes place. Tensor operations combine elements through the
/// `*_checked` methods: integer overflow is reported as
/// [`TensorError::ArithmeticOverflow`](crate::TensorError::ArithmeticOverflow)
/// in every build profile, while floats follow IEEE 754 and never fail.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// `self + rhs`, or `None` on overflow.
    fn add_checked(self, rhs: Self) -> Option<Self>;

    /// `self - rhs`, or `None` on overflow.
    fn sub_checked(self, rhs: Self) -> Option<Self>;

    /// `self * rhs`, or `None` on overflow.
    fn mul_checked(self, rhs: Self) -> Option<Self>;

    /// `-self`, or `None` on overflow.
    fn neg_checked(self) -> Option<Self>;
}

macro_rules! impl_scalar_float {
    ($($t:ty),*) => {
        $(impl Scalar for $t {
            #[inline]
            fn add_checked(self, rhs: Self) -> Option<Self> {
                Some(self + rhs)
            }

            #[inline]
            fn sub_checked(self, rhs: Self) -> Option<Self> {
                Some(self - rhs)
            }

            #[inline]
            fn mul_checked(self, rhs: Self) -> Option<Self> {
                Some(self * rhs)
            }

            #[inline]
            fn neg_checked(self) -> Option<Self> {
                Some(-self)
            }
        })*
    };
}

macro_rules! impl_scalar_int {
    ($($t:ty),*) => {
        $(impl Scalar for $t {
            #[inline]
            fn add_checked(self, rhs: Self) -> Option<Self> {
                self.checked_add(rhs)
            }

            #[inline]
            fn sub_checked(self, rhs: Self) -> Option<Self> {
                self.checked_sub(rhs)
            }

            #[inline]
            fn mul_checked(self, rhs: Self) -> Option<Self> {
                self.checked_mul(rhs)
            }

            #[inline]
            fn neg_checked(self) -> Option<Self> {
                self.checked_neg()
            }
        })*
    };
}

impl_scalar_float!(f32, f64);
impl_scalar_int!(i32, i64);
