//! Exponential integrals: the generalised $E_n(x)$ family and $\mathrm{Ei}$.
//!
//! $E_n$ follows the classical split (A&S 5.1.12 series for $x \leq 1$, a
//! modified Lentz continued fraction beyond), $E_0(x) = e^{-x}/x$ in closed
//! form. $\mathrm{Ei}$ uses the ascending series, with a complex variant for
//! resonance searches at complex frequency.

use num_complex::Complex64;

use crate::error::CoreError;
use crate::special::EULER_GAMMA;

/// Generalised exponential integral $E_n(x)$ for integer $n \geq 0$, $x \geq 0$.
///
/// # Errors
/// Returns [`CoreError::Domain`] for $x < 0$, for $E_0(0)$ and for $E_1(0)$
/// (both diverge).
pub fn expn(n: u32, x: f64) -> Result<f64, CoreError> {
    if x < 0.0 {
        return Err(CoreError::Domain {
            function: "expn",
            argument: x,
        });
    }
    if n == 0 {
        if x == 0.0 {
            return Err(CoreError::Domain {
                function: "expn(0, .)",
                argument: x,
            });
        }
        return Ok((-x).exp() / x);
    }
    if x == 0.0 {
        if n >= 2 {
            return Ok(1.0 / (n - 1) as f64);
        }
        return Err(CoreError::Domain {
            function: "expn(1, .)",
            argument: x,
        });
    }
    if x > 1.0 {
        return Ok(continued_fraction(n, x));
    }
    Ok(ascending_series(n, x))
}

/// Modified Lentz continued fraction, after Numerical Recipes `expint`.
fn continued_fraction(n: u32, x: f64) -> f64 {
    let nf = n as f64;
    let mut b = x + nf;
    let mut c = 1e308;
    let mut d = 1.0 / b;
    let mut h = d;
    let mut i = 1u32;
    while i < 200 {
        let a = -(i as f64) * (nf - 1.0 + i as f64);
        b += 2.0;
        d = 1.0 / (a * d + b);
        c = b + a / c;
        let delta = c * d;
        h *= delta;
        if (delta - 1.0).abs() < 1e-16 {
            break;
        }
        i += 1;
    }
    (-x).exp() * h
}

/// Ascending series (A&S 5.1.12), valid for $0 < x \leq 1$.
fn ascending_series(n: u32, x: f64) -> f64 {
    let n1 = (n - 1) as i64;
    let mut psi = -EULER_GAMMA;
    let mut factorial = 1.0;
    let mut power = 1.0;
    for i in 1..=n1 {
        psi += 1.0 / i as f64;
        factorial *= i as f64;
        power *= -x;
    }
    let mut total = power / factorial * (psi - x.ln());
    let mut term = 1.0;
    let mut m = 0i64;
    while m < 400 {
        if m > 0 {
            term *= -x / m as f64;
        }
        if m != n1 {
            let contrib = -term / (m - n1) as f64;
            total += contrib;
            if contrib.abs() < 1e-18 * total.abs().max(1e-300) && m > n1 + 2 {
                break;
            }
        }
        m += 1;
    }
    total
}

/// Exponential integral $\mathrm{Ei}(x)$ for real $x \neq 0$ via the
/// ascending series $\gamma + \ln|x| + \sum_k x^k/(k \cdot k!)$.
///
/// # Errors
/// Returns [`CoreError::Domain`] at $x = 0$ where the integral diverges.
pub fn expi(x: f64) -> Result<f64, CoreError> {
    if x == 0.0 {
        return Err(CoreError::Domain {
            function: "expi",
            argument: x,
        });
    }
    let mut total = EULER_GAMMA + x.abs().ln();
    let mut term = 1.0;
    let mut k = 1u32;
    while k < 200 {
        term *= x / k as f64;
        let contrib = term / k as f64;
        total += contrib;
        if contrib.abs() < 1e-18 * total.abs().max(1e-300) {
            break;
        }
        k += 1;
    }
    Ok(total)
}

/// $\mathrm{Ei}(z)$ for complex $z$ off the negative real axis.
///
/// The ascending series converges for the small and moderate $|z|$ the
/// self-interaction term produces; the principal branch of the logarithm
/// fixes the branch of the result.
pub fn expi_complex(z: Complex64) -> Complex64 {
    let mut total = EULER_GAMMA + z.ln();
    let mut term = Complex64::from(1.0);
    let mut k = 1u32;
    while k < 300 {
        term *= z / k as f64;
        let contrib = term / k as f64;
        total += contrib;
        if contrib.norm() < 1e-18 * total.norm().max(1e-300) {
            break;
        }
        k += 1;
    }
    total
}
