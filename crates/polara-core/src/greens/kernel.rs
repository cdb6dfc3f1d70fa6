//! Free-space 2D Helmholtz kernels in scalar, reduced, and full dyadic form.
//!
//! The scalar kernel is $\tfrac{i}{4} H_0^{(1)}(k d)$. The dyadic kernels
//! couple in-plane dipole components; the "reduced" form divides out $k^2$
//! and is the natural unit for self-interaction sums, while the full form
//! carries the $k^2$ prefactor and feeds the direct interaction matrix.

use std::ops::{Add, AddAssign, Mul};

use num_complex::Complex64;

use crate::error::CoreError;
use crate::special::hankel1;

/// Independent in-plane components of the dyadic Green's function.
///
/// Off-diagonal coupling is symmetric (`yx == xy`) and out-of-plane terms
/// vanish for in-plane dipoles, so these three span the whole block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DyadicComponent {
    Xx,
    Xy,
    Yy,
}

impl DyadicComponent {
    /// All components in assembly order.
    pub const ALL: [DyadicComponent; 3] = [
        DyadicComponent::Xx,
        DyadicComponent::Xy,
        DyadicComponent::Yy,
    ];
}

/// One dyadic block: the three independent components at a single separation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DyadicValue {
    pub xx: Complex64,
    pub xy: Complex64,
    pub yy: Complex64,
}

impl DyadicValue {
    pub fn new(xx: Complex64, xy: Complex64, yy: Complex64) -> Self {
        Self { xx, xy, yy }
    }

    /// Select a single component.
    pub fn component(&self, which: DyadicComponent) -> Complex64 {
        match which {
            DyadicComponent::Xx => self.xx,
            DyadicComponent::Xy => self.xy,
            DyadicComponent::Yy => self.yy,
        }
    }

    /// In-plane trace `xx + yy`.
    pub fn trace(&self) -> Complex64 {
        self.xx + self.yy
    }
}

impl Add for DyadicValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            xx: self.xx + rhs.xx,
            xy: self.xy + rhs.xy,
            yy: self.yy + rhs.yy,
        }
    }
}

impl AddAssign for DyadicValue {
    fn add_assign(&mut self, rhs: Self) {
        self.xx += rhs.xx;
        self.xy += rhs.xy;
        self.yy += rhs.yy;
    }
}

impl Mul<Complex64> for DyadicValue {
    type Output = Self;

    fn mul(self, rhs: Complex64) -> Self::Output {
        Self {
            xx: self.xx * rhs,
            xy: self.xy * rhs,
            yy: self.yy * rhs,
        }
    }
}

/// Scalar kernel $\tfrac{i}{4} H_0^{(1)}(k d)$.
///
/// # Errors
/// Fails with a domain error when `k * distance <= 0`, where the Neumann
/// part of the Hankel function is singular.
pub fn scalar(k: f64, distance: f64) -> Result<Complex64, CoreError> {
    Ok(Complex64::new(0.0, 0.25) * hankel1(0, k * distance)?)
}

/// Reduced dyadic kernel, the $k^2$-free combination
/// `[a + c, b, a - c]` with `a = (i/8) H0`, `b = (i/8) H2 sin 2θ`,
/// `c = (i/8) H2 cos 2θ` at polar angle θ of the displacement.
///
/// # Errors
/// Fails with a domain error at zero separation.
pub fn reduced(k: f64, displacement: [f64; 2]) -> Result<DyadicValue, CoreError> {
    let r = displacement[0].hypot(displacement[1]);
    let theta = displacement[1].atan2(displacement[0]);
    let h0 = hankel1(0, k * r)?;
    let h2 = hankel1(2, k * r)?;
    let eighth = Complex64::new(0.0, 0.125);
    let a = eighth * h0;
    let b = eighth * h2 * (2.0 * theta).sin();
    let c = eighth * h2 * (2.0 * theta).cos();
    Ok(DyadicValue::new(a + c, b, a - c))
}

/// Full dyadic kernel with the $k^2$ prefactor, in the Hankel closed form
///
/// $G_{xx} = \tfrac{i}{4} k^2 \left[ \tfrac{y^2}{R^2} H_0 +
/// \tfrac{x^2 - y^2}{k R^3} H_1 \right]$
///
/// and its `yy`/`xy` companions. Algebraically this equals
/// $k^2$ times [`reduced`]; both forms are kept because the direct
/// assembler consumes this one verbatim.
///
/// # Errors
/// Fails with a domain error at zero separation.
pub fn full(k: f64, displacement: [f64; 2]) -> Result<DyadicValue, CoreError> {
    let [x, y] = displacement;
    let r = x.hypot(y);
    let h0 = hankel1(0, k * r)?;
    let h1 = hankel1(1, k * r)?;
    let h2 = hankel1(2, k * r)?;
    let pref = Complex64::new(0.0, 0.25) * k * k;
    let aniso = (x * x - y * y) / (k * r * r * r);
    let xx = pref * ((y * y / (r * r)) * h0 + aniso * h1);
    let yy = pref * ((x * x / (r * r)) * h0 - aniso * h1);
    let xy = pref * (x * y / (r * r)) * h2;
    Ok(DyadicValue::new(xx, xy, yy))
}
