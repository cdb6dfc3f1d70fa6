//! Cylinder Bessel functions of the first and second kind, orders 0 and 1,
//! and the first-kind Hankel functions assembled from them.
//!
//! Small arguments use the ascending power series; from $x \geq 12$ the
//! Hankel asymptotic moduli $P_\nu$, $Q_\nu$ take over (A&S 9.2.5-9.2.10).
//! The crossover keeps both branches comfortably inside f64 accuracy.

use num_complex::Complex64;

use crate::error::CoreError;
use crate::special::EULER_GAMMA;

/// Argument above which the asymptotic expansion is used.
const ASYMPTOTIC_CUTOFF: f64 = 12.0;

/// Ascending power series for $J_\nu$, $\nu \in \{0, 1\}$:
/// $\sum_m (-1)^m (x/2)^{2m+\nu} / (m!\,(m+\nu)!)$.
fn j_series(nu: u32, x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = if nu == 0 { 1.0 } else { half };
    let mut total = term;
    let mut m = 1u32;
    while m < 200 {
        term *= -(half * half) / ((m * (m + nu)) as f64);
        total += term;
        if term.abs() < 1e-18 * total.abs().max(1e-300) {
            break;
        }
        m += 1;
    }
    total
}

/// Asymptotic moduli $(P_\nu, Q_\nu)$ of the Hankel expansion
/// $H^{(1)}_\nu(x) \sim \sqrt{2/(\pi x)}\,(P + iQ)\,e^{i\chi}$.
fn asymptotic_pq(nu: u32, x: f64) -> (f64, f64) {
    let mu = 4.0 * (nu * nu) as f64;
    let mut term_p = 1.0;
    let mut term_q = (mu - 1.0) / (8.0 * x);
    let mut p_sum = term_p;
    let mut q_sum = term_q;
    let mut k = 1u32;
    while k < 20 {
        let kf = k as f64;
        let denom = (8.0 * x) * (8.0 * x);
        term_p *= -(mu - (4.0 * kf - 3.0).powi(2)) * (mu - (4.0 * kf - 1.0).powi(2))
            / ((2.0 * kf - 1.0) * (2.0 * kf) * denom);
        p_sum += term_p;
        term_q *= -(mu - (4.0 * kf - 1.0).powi(2)) * (mu - (4.0 * kf + 1.0).powi(2))
            / ((2.0 * kf) * (2.0 * kf + 1.0) * denom);
        q_sum += term_q;
        k += 1;
        if term_p.abs() < 1e-18 && term_q.abs() < 1e-18 {
            break;
        }
    }
    (p_sum, q_sum)
}

/// Bessel function of the first kind $J_0(x)$.
pub fn bessel_j0(x: f64) -> f64 {
    let x = x.abs();
    if x < ASYMPTOTIC_CUTOFF {
        return j_series(0, x);
    }
    let (p, q) = asymptotic_pq(0, x);
    let chi = x - 0.25 * std::f64::consts::PI;
    (2.0 / (std::f64::consts::PI * x)).sqrt() * (p * chi.cos() - q * chi.sin())
}

/// Bessel function of the first kind $J_1(x)$ (odd in $x$).
pub fn bessel_j1(x: f64) -> f64 {
    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();
    if x < ASYMPTOTIC_CUTOFF {
        return sign * j_series(1, x);
    }
    let (p, q) = asymptotic_pq(1, x);
    let chi = x - 0.75 * std::f64::consts::PI;
    sign * (2.0 / (std::f64::consts::PI * x)).sqrt() * (p * chi.cos() - q * chi.sin())
}

/// Bessel function of the second kind $Y_0(x)$, $x > 0$.
///
/// # Errors
/// Returns [`CoreError::Domain`] for $x \leq 0$.
pub fn bessel_y0(x: f64) -> Result<f64, CoreError> {
    if x <= 0.0 {
        return Err(CoreError::Domain {
            function: "bessel_y0",
            argument: x,
        });
    }
    if x < ASYMPTOTIC_CUTOFF {
        // Y0 = 2/pi [ (ln(x/2) + gamma) J0 + sum_{m>=1} (-1)^{m+1} h_m z^m / (m!)^2 ]
        let z = x * x / 4.0;
        let mut term = 1.0;
        let mut harmonic = 0.0;
        let mut total = 0.0;
        let mut m = 1u32;
        while m < 200 {
            let mf = m as f64;
            term *= z / (mf * mf);
            harmonic += 1.0 / mf;
            let sign = if m % 2 == 1 { 1.0 } else { -1.0 };
            let contrib = sign * harmonic * term;
            total += contrib;
            if contrib.abs() < 1e-18 * total.abs().max(1e-300) {
                break;
            }
            m += 1;
        }
        let j0 = bessel_j0(x);
        return Ok((2.0 / std::f64::consts::PI) * (((x / 2.0).ln() + EULER_GAMMA) * j0 + total));
    }
    let (p, q) = asymptotic_pq(0, x);
    let chi = x - 0.25 * std::f64::consts::PI;
    Ok((2.0 / (std::f64::consts::PI * x)).sqrt() * (p * chi.sin() + q * chi.cos()))
}

/// Bessel function of the second kind $Y_1(x)$, $x > 0$.
///
/// # Errors
/// Returns [`CoreError::Domain`] for $x \leq 0$.
pub fn bessel_y1(x: f64) -> Result<f64, CoreError> {
    if x <= 0.0 {
        return Err(CoreError::Domain {
            function: "bessel_y1",
            argument: x,
        });
    }
    if x < ASYMPTOTIC_CUTOFF {
        // Y1 = 2/pi [ (ln(x/2) + gamma) J1 - 1/x
        //             - (x/4) sum_{m>=0} (-1)^m (h_m + h_{m+1}) z^m / (m!(m+1)!) ]
        let z = x * x / 4.0;
        let mut term = 1.0;
        let mut harmonic = 0.0;
        let mut total = 0.0;
        let mut m = 0u32;
        while m < 200 {
            let mf = m as f64;
            if m > 0 {
                term *= z / (mf * (mf + 1.0));
                harmonic += 1.0 / mf;
            }
            let harmonic_next = harmonic + 1.0 / (mf + 1.0);
            let sign = if m % 2 == 0 { 1.0 } else { -1.0 };
            let contrib = sign * (harmonic + harmonic_next) * term;
            total += contrib;
            if contrib.abs() < 1e-18 * total.abs().max(1e-300) && m > 2 {
                break;
            }
            m += 1;
        }
        let j1 = bessel_j1(x);
        return Ok((2.0 / std::f64::consts::PI)
            * (((x / 2.0).ln() + EULER_GAMMA) * j1 - 1.0 / x - (x / 4.0) * total));
    }
    let (p, q) = asymptotic_pq(1, x);
    let chi = x - 0.75 * std::f64::consts::PI;
    Ok((2.0 / (std::f64::consts::PI * x)).sqrt() * (p * chi.sin() + q * chi.cos()))
}

/// First-kind Hankel function $H^{(1)}_n(x) = J_n(x) + i Y_n(x)$ for
/// orders 0, 1 and 2 and real $x > 0$.
///
/// Order 2 uses the recurrence $H_2(x) = (2/x) H_1(x) - H_0(x)$.
///
/// # Errors
/// Returns [`CoreError::Domain`] for $x \leq 0$ or an unsupported order.
pub fn hankel1(order: u32, x: f64) -> Result<Complex64, CoreError> {
    match order {
        0 => Ok(Complex64::new(bessel_j0(x), bessel_y0(x)?)),
        1 => Ok(Complex64::new(bessel_j1(x), bessel_y1(x)?)),
        2 => {
            let h0 = Complex64::new(bessel_j0(x), bessel_y0(x)?);
            let h1 = Complex64::new(bessel_j1(x), bessel_y1(x)?);
            Ok(h1 * (2.0 / x) - h0)
        }
        n => Err(CoreError::Domain {
            function: "hankel1 order",
            argument: n as f64,
        }),
    }
}
