//! Scalar fields over point sets: the contract the mesh engine consumes.
//!
//! Purpose
//! - `Evaluable` is the only thing the engine knows about distance and size
//!   functions: `(N, D)` points in, `N` values out. Implementations must be
//!   pure; the engine calls them many times per step, including at
//!   synthetically perturbed points.
//! - `Functional` is a cloneable closure wrapper with arithmetic and
//!   min/max/abs combinators, so domains can be written as expressions
//!   (`rectangular(&b).max(&-circular(0.5, None))`).
//!
//! Conventions
//! - Distance functions are level sets: negative inside, positive outside,
//!   zero on the boundary. They need not be true Euclidean distances.
//! - Size functions return positive desired edge lengths (relative scale only).

pub mod shapes;

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

pub use shapes::{circular, elliptical, polygon, rectangular, uniform};

/// A scalar field evaluated row-wise on a point matrix.
pub trait Evaluable {
    fn eval(&self, points: &DMatrix<f64>) -> DVector<f64>;
}

impl<F> Evaluable for F
where
    F: Fn(&DMatrix<f64>) -> DVector<f64>,
{
    #[inline]
    fn eval(&self, points: &DMatrix<f64>) -> DVector<f64> {
        self(points)
    }
}

type FieldFn = dyn Fn(&DMatrix<f64>) -> DVector<f64> + Send + Sync;

/// Composable scalar field (cheap to clone; shares the closure).
#[derive(Clone)]
pub struct Functional {
    f: Arc<FieldFn>,
}

impl fmt::Debug for Functional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Functional(..)")
    }
}

impl Evaluable for Functional {
    #[inline]
    fn eval(&self, points: &DMatrix<f64>) -> DVector<f64> {
        (self.f)(points)
    }
}

impl Functional {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DMatrix<f64>) -> DVector<f64> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Same value everywhere.
    pub fn constant(c: f64) -> Self {
        Self::new(move |p| DVector::from_element(p.nrows(), c))
    }

    /// Pointwise combination of two fields.
    fn zip_with(&self, rhs: &Functional, op: fn(f64, f64) -> f64) -> Self {
        let (a, b) = (self.clone(), rhs.clone());
        Self::new(move |p| a.eval(p).zip_map(&b.eval(p), op))
    }

    fn map(&self, op: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        let a = self.clone();
        Self::new(move |p| a.eval(p).map(&op))
    }

    pub fn min(&self, rhs: &Functional) -> Self {
        self.zip_with(rhs, f64::min)
    }

    pub fn max(&self, rhs: &Functional) -> Self {
        self.zip_with(rhs, f64::max)
    }

    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    /// Union of two domains given by distance functions.
    pub fn union(&self, rhs: &Functional) -> Self {
        self.min(rhs)
    }

    /// Intersection of two domains given by distance functions.
    pub fn intersect(&self, rhs: &Functional) -> Self {
        self.max(rhs)
    }

    /// Domain `self` with `rhs` removed.
    pub fn diff(&self, rhs: &Functional) -> Self {
        self.max(&-rhs)
    }

    /// Translate the field by `offset`: `g(p) = f(p - offset)`.
    pub fn shift(&self, offset: &[f64]) -> Self {
        let a = self.clone();
        let off = offset.to_vec();
        Self::new(move |p| {
            // missing offset components count as zero
            let q = DMatrix::from_fn(p.nrows(), p.ncols(), |r, k| {
                p[(r, k)] - off.get(k).copied().unwrap_or(0.0)
            });
            a.eval(&q)
        })
    }

    /// Rotate a field counterclockwise by `angle` radians in the plane of the
    /// first two axes; further axes pass through. Inputs with fewer than two
    /// columns evaluate to NaN.
    pub fn rotate(&self, angle: f64) -> Self {
        let a = self.clone();
        let (s, c) = angle.sin_cos();
        Self::new(move |p| {
            if p.ncols() < 2 {
                return DVector::from_element(p.nrows(), f64::NAN);
            }
            // evaluate at R(-angle) p
            let q = DMatrix::from_fn(p.nrows(), p.ncols(), |r, k| {
                let (x, y) = (p[(r, 0)], p[(r, 1)]);
                match k {
                    0 => c * x + s * y,
                    1 => -s * x + c * y,
                    _ => p[(r, k)],
                }
            });
            a.eval(&q)
        })
    }
}

impl Neg for Functional {
    type Output = Functional;
    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

impl Neg for &Functional {
    type Output = Functional;
    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<Functional> for Functional {
            type Output = Functional;
            fn $method(self, rhs: Functional) -> Self::Output {
                self.zip_with(&rhs, |a, b| a $op b)
            }
        }
        impl $trait<&Functional> for &Functional {
            type Output = Functional;
            fn $method(self, rhs: &Functional) -> Self::Output {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }
        impl $trait<f64> for Functional {
            type Output = Functional;
            fn $method(self, rhs: f64) -> Self::Output {
                self.map(move |a| a $op rhs)
            }
        }
        impl $trait<Functional> for f64 {
            type Output = Functional;
            fn $method(self, rhs: Functional) -> Self::Output {
                rhs.map(move |b| self $op b)
            }
        }
    };
}

impl_binary_op!(Add, add, +);
impl_binary_op!(Sub, sub, -);
impl_binary_op!(Mul, mul, *);
impl_binary_op!(Div, div, /);

#[cfg(test)]
mod tests;
