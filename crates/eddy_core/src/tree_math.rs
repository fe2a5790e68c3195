//! Infix arithmetic over structured states.
//!
//! [`Infix`] is a transparent view over any [`VectorSpace`] state: `+` and scalar `*`
//! recurse into the wrapped structure, and [`Infix::into_inner`] hands back the state
//! with its original layout. Steppers are written against `Infix<S>` as if the state
//! were a flat vector.

use crate::error::ShapeMismatch;
use crate::traits::VectorSpace;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use std::ops::{Add, Mul};

/// Wraps a state for infix arithmetic.
pub fn wrap<S: VectorSpace>(state: S) -> Infix<S> {
    Infix(state)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Infix<S>(S);

impl<S: VectorSpace> Infix<S> {
    pub fn new(state: S) -> Self {
        Self(state)
    }

    pub fn inner(&self) -> &S {
        &self.0
    }

    pub fn into_inner(self) -> S {
        self.0
    }

    /// Fallible form of `+` for states that may not share a structure.
    pub fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        self.0.try_add(&other.0).map(Self)
    }

    fn sum(&self, other: &Self) -> Self {
        match self.try_add(other) {
            Ok(sum) => sum,
            // Equations must return states shaped like their input.
            Err(err) => panic!("{err}"),
        }
    }
}

/// Leaf-wise sum of two states.
///
/// # Panics
///
/// Panics with the [`ShapeMismatch`] message when the operands differ in structure; use
/// [`Infix::try_add`] to get the error instead.
impl<S: VectorSpace> Add for Infix<S> {
    type Output = Infix<S>;

    fn add(self, rhs: Infix<S>) -> Infix<S> {
        self.sum(&rhs)
    }
}

/// See the owned `Add` impl; panics on a structure mismatch.
impl<'a, S: VectorSpace> Add<&'a Infix<S>> for &'a Infix<S> {
    type Output = Infix<S>;

    fn add(self, rhs: &'a Infix<S>) -> Infix<S> {
        self.sum(rhs)
    }
}

/// See the owned `Add` impl; panics on a structure mismatch.
impl<'a, S: VectorSpace> Add<&'a Infix<S>> for Infix<S> {
    type Output = Infix<S>;

    fn add(self, rhs: &'a Infix<S>) -> Infix<S> {
        self.sum(rhs)
    }
}

impl<S: VectorSpace> Add<f64> for Infix<S> {
    type Output = Infix<S>;

    fn add(self, rhs: f64) -> Infix<S> {
        Infix(self.0.offset(rhs))
    }
}

impl<S: VectorSpace> Add<Infix<S>> for f64 {
    type Output = Infix<S>;

    fn add(self, rhs: Infix<S>) -> Infix<S> {
        Infix(rhs.0.offset(self))
    }
}

impl<S: VectorSpace> Mul<f64> for Infix<S> {
    type Output = Infix<S>;

    fn mul(self, rhs: f64) -> Infix<S> {
        Infix(self.0.scale(rhs))
    }
}

impl<S: VectorSpace> Mul<f64> for &Infix<S> {
    type Output = Infix<S>;

    fn mul(self, rhs: f64) -> Infix<S> {
        Infix(self.0.scale(rhs))
    }
}

impl<S: VectorSpace> Mul<Infix<S>> for f64 {
    type Output = Infix<S>;

    fn mul(self, rhs: Infix<S>) -> Infix<S> {
        Infix(rhs.0.scale(self))
    }
}

impl<'a, S: VectorSpace> Mul<&'a Infix<S>> for f64 {
    type Output = Infix<S>;

    fn mul(self, rhs: &'a Infix<S>) -> Infix<S> {
        Infix(rhs.0.scale(self))
    }
}

// --- Leaf and container implementations ---

impl VectorSpace for f64 {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        Ok(self + other)
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn offset(&self, offset: f64) -> Self {
        self + offset
    }

    fn shape_description(&self) -> String {
        "f64".to_string()
    }
}

impl VectorSpace for Complex<f64> {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        Ok(*self + *other)
    }

    fn scale(&self, factor: f64) -> Self {
        *self * factor
    }

    fn offset(&self, offset: f64) -> Self {
        *self + offset
    }

    fn shape_description(&self) -> String {
        "complex".to_string()
    }
}

impl<T: VectorSpace> VectorSpace for Vec<T> {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        if self.len() != other.len() {
            return Err(ShapeMismatch::new(
                self.shape_description(),
                other.shape_description(),
            ));
        }
        self.iter().zip(other).map(|(a, b)| a.try_add(b)).collect()
    }

    fn scale(&self, factor: f64) -> Self {
        self.iter().map(|x| x.scale(factor)).collect()
    }

    fn offset(&self, offset: f64) -> Self {
        self.iter().map(|x| x.offset(offset)).collect()
    }

    fn shape_description(&self) -> String {
        match self.first() {
            Some(first) => format!("[{}; {}]", first.shape_description(), self.len()),
            None => "[]".to_string(),
        }
    }
}

impl<T: VectorSpace, const N: usize> VectorSpace for [T; N] {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        let mut out = self.clone();
        for (slot, rhs) in out.iter_mut().zip(other) {
            *slot = slot.try_add(rhs)?;
        }
        Ok(out)
    }

    fn scale(&self, factor: f64) -> Self {
        let mut out = self.clone();
        for slot in &mut out {
            *slot = slot.scale(factor);
        }
        out
    }

    fn offset(&self, offset: f64) -> Self {
        let mut out = self.clone();
        for slot in &mut out {
            *slot = slot.offset(offset);
        }
        out
    }
}

impl<A: VectorSpace, B: VectorSpace> VectorSpace for (A, B) {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        Ok((self.0.try_add(&other.0)?, self.1.try_add(&other.1)?))
    }

    fn scale(&self, factor: f64) -> Self {
        (self.0.scale(factor), self.1.scale(factor))
    }

    fn offset(&self, offset: f64) -> Self {
        (self.0.offset(offset), self.1.offset(offset))
    }

    fn shape_description(&self) -> String {
        format!(
            "({}, {})",
            self.0.shape_description(),
            self.1.shape_description()
        )
    }
}

impl<A: VectorSpace, B: VectorSpace, C: VectorSpace> VectorSpace for (A, B, C) {
    fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
        Ok((
            self.0.try_add(&other.0)?,
            self.1.try_add(&other.1)?,
            self.2.try_add(&other.2)?,
        ))
    }

    fn scale(&self, factor: f64) -> Self {
        (
            self.0.scale(factor),
            self.1.scale(factor),
            self.2.scale(factor),
        )
    }

    fn offset(&self, offset: f64) -> Self {
        (
            self.0.offset(offset),
            self.1.offset(offset),
            self.2.offset(offset),
        )
    }

    fn shape_description(&self) -> String {
        format!(
            "({}, {}, {})",
            self.0.shape_description(),
            self.1.shape_description(),
            self.2.shape_description()
        )
    }
}

macro_rules! impl_vector_space_for_matrix {
    ($($ty:ty),* $(,)?) => {
        $(
            impl VectorSpace for $ty {
                fn try_add(&self, other: &Self) -> Result<Self, ShapeMismatch> {
                    if self.shape() != other.shape() {
                        return Err(ShapeMismatch::new(
                            self.shape_description(),
                            other.shape_description(),
                        ));
                    }
                    Ok(self + other)
                }

                fn scale(&self, factor: f64) -> Self {
                    self.map(|x| x * factor)
                }

                fn offset(&self, offset: f64) -> Self {
                    self.map(|x| x + offset)
                }

                fn shape_description(&self) -> String {
                    let (rows, cols) = self.shape();
                    format!("{rows}x{cols} matrix")
                }
            }
        )*
    };
}

impl_vector_space_for_matrix!(
    DVector<f64>,
    DMatrix<f64>,
    DVector<Complex<f64>>,
    DMatrix<Complex<f64>>,
);

/// Implements [`VectorSpace`](crate::traits::VectorSpace) for a record by recursing
/// into each listed field. Every field of the record must be listed.
///
/// ```
/// use eddy_core::impl_vector_space;
/// use nalgebra::DMatrix;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Velocity {
///     u: DMatrix<f64>,
///     v: DMatrix<f64>,
/// }
///
/// impl_vector_space!(Velocity { u, v });
/// ```
#[macro_export]
macro_rules! impl_vector_space {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::traits::VectorSpace for $ty {
            fn try_add(
                &self,
                other: &Self,
            ) -> ::std::result::Result<Self, $crate::error::ShapeMismatch> {
                Ok(Self {
                    $($field: $crate::traits::VectorSpace::try_add(&self.$field, &other.$field)?,)+
                })
            }

            fn scale(&self, factor: f64) -> Self {
                Self {
                    $($field: $crate::traits::VectorSpace::scale(&self.$field, factor),)+
                }
            }

            fn offset(&self, offset: f64) -> Self {
                Self {
                    $($field: $crate::traits::VectorSpace::offset(&self.$field, offset),)+
                }
            }

            fn shape_description(&self) -> ::std::string::String {
                let fields: ::std::vec::Vec<::std::string::String> = ::std::vec![
                    $(::std::format!(
                        "{}: {}",
                        ::std::stringify!($field),
                        $crate::traits::VectorSpace::shape_description(&self.$field)
                    ),)+
                ];
                ::std::format!("{} {{ {} }}", ::std::stringify!($ty), fields.join(", "))
            }
        }
    };
}
