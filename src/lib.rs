//! `sparse-glue` provides the structure-changing kernels of a compressed sparse column (CSC)
//! matrix type: merging a modified submatrix back into its parent, building a symmetric or
//! hermitian matrix out of one triangle, and flattening a matrix into a column or row vector.
//!
//! Every kernel reads its inputs through ordered nonzero iterators, writes into freshly
//! allocated storage sized by an exact or worst-case bound, and then moves that storage into the
//! output matrix. Outputs never store explicit zeros.
//!
//! # Example
//! ```
//! use sparse_glue::{sparse::symmat::symmat, sparse::SparseColMat, Side};
//!
//! let a = SparseColMat::<usize, f64>::try_new_from_triplets(
//!     3,
//!     3,
//!     &[(0, 0, 1.0), (1, 1, 2.0), (2, 2, 3.0), (0, 2, 5.0)],
//! )
//! .unwrap();
//!
//! let s = symmat(a.as_ref(), Side::Upper).unwrap();
//! assert_eq!(s.compute_nnz(), 5);
//! assert_eq!(s.read(2, 0), 5.0);
//! assert_eq!(s.read(0, 2), 5.0);
//! ```

#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(non_snake_case)]

use core::fmt::Debug;
use equator::{assert, debug_assert};

pub use dyn_stack;

pub mod sparse;

mod seal;

/// Complex number type with `f32` components.
#[allow(non_camel_case_types)]
pub type c32 = num_complex::Complex<f32>;
/// Complex number type with `f64` components.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;

/// Specifies whether the triangular lower or upper part of a matrix should be accessed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Lower half should be accessed.
    Lower,
    /// Upper half should be accessed.
    Upper,
}

/// Whether a value should be implicitly conjugated when read or not.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conj {
    /// Do conjugate.
    Yes,
    /// Do not conjugate.
    No,
}

impl Conj {
    /// Applies the conjugation to `value`.
    #[inline(always)]
    pub fn apply<E: ComplexField>(self, value: E) -> E {
        match self {
            Conj::Yes => value.sp_conj(),
            Conj::No => value,
        }
    }
}

/// Element types that can be stored in a sparse matrix.
///
/// Real types implement conjugation as the identity.
pub trait ComplexField: seal::Seal + Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Returns `0.0`.
    fn sp_zero() -> Self;
    /// Returns `self + rhs`.
    fn sp_add(self, rhs: Self) -> Self;
    /// Returns `conjugate(self)`.
    fn sp_conj(self) -> Self;

    /// Returns true if `self` is exactly zero.
    #[inline(always)]
    fn sp_is_zero(&self) -> bool {
        *self == Self::sp_zero()
    }
}

macro_rules! impl_real {
    ($ty: ty) => {
        impl ComplexField for $ty {
            #[inline(always)]
            fn sp_zero() -> Self {
                0.0
            }
            #[inline(always)]
            fn sp_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn sp_conj(self) -> Self {
                self
            }
        }
    };
}

macro_rules! impl_complex {
    ($ty: ty) => {
        impl ComplexField for $ty {
            #[inline(always)]
            fn sp_zero() -> Self {
                <$ty>::new(0.0, 0.0)
            }
            #[inline(always)]
            fn sp_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn sp_conj(self) -> Self {
                <$ty>::new(self.re, -self.im)
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);
impl_complex!(c32);
impl_complex!(c64);

/// Trait for unsigned integers that can be indexed with.
///
/// Always smaller than or equal to `usize`.
pub trait Index:
    seal::Seal
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::AddAssign
    + core::ops::SubAssign
    + bytemuck::Pod
    + Eq
    + Ord
    + Send
    + Sync
{
    /// Equally-sized signed index type.
    type Signed: SignedIndex;

    /// Truncate `value` to type [`Self`].
    #[must_use]
    #[inline(always)]
    fn truncate(value: usize) -> Self {
        Self::from_signed(<Self::Signed as SignedIndex>::truncate(value))
    }

    /// Zero extend `self`.
    #[must_use]
    #[inline(always)]
    fn zx(self) -> usize {
        self.to_signed().zx()
    }

    /// Convert a signed value to an unsigned one.
    #[inline(always)]
    fn from_signed(value: Self::Signed) -> Self {
        bytemuck::cast(value)
    }

    /// Convert an unsigned value to a signed one.
    #[inline(always)]
    fn to_signed(self) -> Self::Signed {
        bytemuck::cast(self)
    }
}

/// Trait for signed integers corresponding to the ones satisfying [`Index`].
///
/// Always smaller than or equal to `isize`.
pub trait SignedIndex:
    seal::Seal
    + core::fmt::Debug
    + core::ops::Neg<Output = Self>
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::AddAssign
    + core::ops::SubAssign
    + bytemuck::Pod
    + Eq
    + Ord
    + Send
    + Sync
{
    /// Maximum representable value.
    const MAX: Self;

    /// Truncate `value` to type [`Self`].
    #[must_use]
    fn truncate(value: usize) -> Self;

    /// Zero extend `self`.
    #[must_use]
    fn zx(self) -> usize;
}

impl Index for u32 {
    type Signed = i32;
}
#[cfg(target_pointer_width = "64")]
impl Index for u64 {
    type Signed = i64;
}
impl Index for usize {
    type Signed = isize;
}

impl SignedIndex for i32 {
    const MAX: Self = Self::MAX;

    #[inline(always)]
    fn truncate(value: usize) -> Self {
        #[allow(clippy::assertions_on_constants)]
        const _: () = {
            core::assert!(i32::BITS <= usize::BITS);
        };
        value as isize as Self
    }

    #[inline(always)]
    fn zx(self) -> usize {
        self as u32 as usize
    }
}

#[cfg(target_pointer_width = "64")]
impl SignedIndex for i64 {
    const MAX: Self = Self::MAX;

    #[inline(always)]
    fn truncate(value: usize) -> Self {
        value as isize as Self
    }

    #[inline(always)]
    fn zx(self) -> usize {
        self as u64 as usize
    }
}

impl SignedIndex for isize {
    const MAX: Self = Self::MAX;

    #[inline(always)]
    fn truncate(value: usize) -> Self {
        value as isize
    }

    #[inline(always)]
    fn zx(self) -> usize {
        self as usize
    }
}
