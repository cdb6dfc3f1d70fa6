//! Ewald-accelerated lattice Green's functions.
//!
//! The direct Bloch sums of [`super::direct`] converge like
//! $\sum R^{-1/2} e^{i q R}$, far too slowly for assembly work. The Ewald
//! split writes each sum as
//!
//! $$ G = G^{(1)} + G^{(2)} $$
//!
//! where $G^{(1)}$ runs over reciprocal vectors with a Gaussian spectral
//! filter $e^{(k^2 - \beta^2)/4\eta^2}$ and $G^{(2)}$ runs over real-space
//! vectors with exponential-integral screening. Both halves converge in a
//! few shells and their total is independent of the splitting parameter
//! $\eta$, which is the main correctness diagnostic for this module.
//!
//! Self-interactions (observer on the source sublattice) follow the same
//! split through the Hankel lattice sums $h_n = t_0\delta_{n0} + t_1(n) +
//! t_2(n)$, with the divergent origin term regularised into $t_0$ via the
//! exponential integral of complex argument.
//!
//! The engine is cheap to clone: per-`(distance, frequency)` moments of the
//! self sums are memoised per instance, so sweep drivers typically build one
//! engine per work item.

use std::collections::HashMap;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::kernel::DyadicValue;
use crate::error::CoreError;
use crate::lattice::cells::UnitCell;
use crate::special::{expi_complex, expn};
use crate::types::Units;

fn default_eta_scale() -> f64 {
    1.0
}

fn default_j_max() -> u32 {
    5
}

fn default_truncation() -> i32 {
    12
}

/// Tuning knobs for the Ewald split.
///
/// The defaults hold the total to better than 1e-8 relative accuracy for
/// nearest-neighbour spacings in the tens of nanometres; they only need
/// touching for strongly anisotropic cells or for convergence studies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EwaldParams {
    /// Splitting parameter as a multiple of $2\pi/\sqrt{A}$.
    #[serde(default = "default_eta_scale")]
    pub eta_scale: f64,
    /// Number of terms in the exponential-integral series per lattice point.
    #[serde(default = "default_j_max")]
    pub j_max: u32,
    /// Half-width of the summation window in shells.
    #[serde(default = "default_truncation")]
    pub truncation: i32,
}

impl Default for EwaldParams {
    fn default() -> Self {
        Self {
            eta_scale: default_eta_scale(),
            j_max: default_j_max(),
            truncation: default_truncation(),
        }
    }
}

/// Cache key for the screened radial moments: exact bit patterns of the
/// distance and the complex frequency, plus the moment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MomentKey {
    distance: u64,
    frequency_re: u64,
    frequency_im: u64,
    order: u32,
}

/// Ewald summation engine for one unit-cell family.
///
/// Holds the truncated real and reciprocal point sets, the splitting
/// parameter, and the moment cache. Frequency, Bloch wavevector, and
/// observation position are method arguments, so one engine serves a whole
/// `(w, q)` sweep.
#[derive(Debug, Clone)]
pub struct EwaldSum {
    params: EwaldParams,
    units: Units,
    area: f64,
    eta: f64,
    reciprocal_points: Vec<[f64; 2]>,
    real_points: Vec<[f64; 2]>,
    punctured_points: Vec<[f64; 2]>,
    moments: HashMap<MomentKey, Complex64>,
}

impl EwaldSum {
    /// Build an engine for `cell`, with $\eta = s \cdot 2\pi/\sqrt{A}$ for
    /// the configured scale $s$ and cell area $A$.
    ///
    /// # Errors
    /// Propagates [`CoreError::DegenerateLattice`] from the cell basis.
    pub fn new(cell: &UnitCell, params: EwaldParams, units: Units) -> Result<Self, CoreError> {
        let lattice = cell.lattice()?;
        let window = cell.index_window(params.truncation);
        let area = lattice.area();
        Ok(Self {
            params,
            units,
            area,
            eta: params.eta_scale * 2.0 * std::f64::consts::PI / area.sqrt(),
            reciprocal_points: lattice.reciprocal_points_at(&window, true),
            real_points: lattice.points_at(&window, true),
            punctured_points: lattice.points_at(&window, false),
            moments: HashMap::new(),
        })
    }

    /// The splitting parameter $\eta$ (m⁻¹).
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Unit-cell area (m²).
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Unit system the engine was built with.
    pub fn units(&self) -> &Units {
        &self.units
    }

    fn wavenumber(&self, frequency: Complex64) -> Complex64 {
        self.units.wavenumber(frequency)
    }

    fn term_failure(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        point: [f64; 2],
        source: CoreError,
    ) -> CoreError {
        CoreError::LatticeSum {
            frequency,
            qx: q[0],
            qy: q[1],
            px: point[0],
            py: point[1],
            reason: source.to_string(),
        }
    }

    /// Spectral half of the monopolar Green's function,
    /// $G^{(1)} = \tfrac{1}{A} \sum_\mathbf{G} \frac{e^{i\beta\cdot r}
    /// \, e^{(k^2-\beta^2)/4\eta^2}}{\beta^2 - k^2}$ with
    /// $\beta = \mathbf{q} + \mathbf{G}$, origin included.
    pub fn reciprocal_monopolar(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> Complex64 {
        let k2 = self.wavenumber(frequency).powu(2);
        let four_eta2 = 4.0 * self.eta * self.eta;
        let mut total = Complex64::default();
        for &g in &self.reciprocal_points {
            let bx = q[0] + g[0];
            let by = q[1] + g[1];
            let beta2 = bx * bx + by * by;
            let phase = Complex64::new(0.0, bx * position[0] + by * position[1]).exp();
            let filter = ((k2 - beta2) / four_eta2).exp();
            total += phase * filter / (Complex64::from(beta2) - k2);
        }
        total / self.area
    }

    /// Screened radial series
    /// $S(d, w, p) = \sum_{j=0}^{j_{max}} \frac{(k/2\eta)^{2j}}{j!}
    /// \, E_{j+p}(d^2\eta^2)$.
    ///
    /// # Errors
    /// Domain error at `separation == 0`, where $E_0$ and $E_1$ diverge.
    pub fn radial_integral(
        &self,
        separation: f64,
        frequency: Complex64,
        offset: u32,
    ) -> Result<Complex64, CoreError> {
        let x = separation * separation * self.eta * self.eta;
        let half = self.wavenumber(frequency) / (2.0 * self.eta);
        let ratio2 = half * half;
        let mut coeff = Complex64::from(1.0);
        let mut total = Complex64::default();
        for j in 0..=self.params.j_max {
            if j > 0 {
                coeff = coeff * ratio2 / (j as f64);
            }
            total += coeff * expn(j + offset, x)?;
        }
        Ok(total)
    }

    /// Real-space half of the monopolar Green's function,
    /// $G^{(2)} = \tfrac{1}{4\pi} \sum_\mathbf{R} e^{i\mathbf{q}\cdot
    /// \mathbf{R}} \, S(|\mathbf{r} - \mathbf{R}|, w, 1)$, origin included.
    ///
    /// # Errors
    /// Fails with term context when `position` sits on a lattice point.
    pub fn real_monopolar(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> Result<Complex64, CoreError> {
        let mut total = Complex64::default();
        for &point in &self.real_points {
            let dx = position[0] - point[0];
            let dy = position[1] - point[1];
            let series = self
                .radial_integral(dx.hypot(dy), frequency, 1)
                .map_err(|err| self.term_failure(frequency, q, point, err))?;
            total += Complex64::new(0.0, q[0] * point[0] + q[1] * point[1]).exp() * series;
        }
        Ok(total / (4.0 * std::f64::consts::PI))
    }

    /// Converged monopolar lattice Green's function, both halves combined.
    ///
    /// # Errors
    /// Fails with term context when `position` sits on a lattice point.
    pub fn monopolar(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> Result<Complex64, CoreError> {
        Ok(self.reciprocal_monopolar(frequency, q, position)
            + self.real_monopolar(frequency, q, position)?)
    }

    /// Spectral half of the off-site dyadic, the monopolar terms weighted
    /// by `(k² + βx²)`, `(βx βy)`, `(k² + βy²)`.
    pub fn reciprocal_dyadic(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> DyadicValue {
        let k2 = self.wavenumber(frequency).powu(2);
        let four_eta2 = 4.0 * self.eta * self.eta;
        let mut total = DyadicValue::default();
        for &g in &self.reciprocal_points {
            let bx = q[0] + g[0];
            let by = q[1] + g[1];
            let beta2 = bx * bx + by * by;
            let phase = Complex64::new(0.0, bx * position[0] + by * position[1]).exp();
            let filter = ((k2 - beta2) / four_eta2).exp();
            let base = phase * filter / (Complex64::from(beta2) - k2);
            total += DyadicValue::new(
                base * (k2 + bx * bx),
                base * (bx * by),
                base * (k2 + by * by),
            );
        }
        total * Complex64::from(1.0 / self.area)
    }

    /// One real-space dyadic term: the $\partial_a \partial_b$ image of the
    /// screened radial series. The $j = 0$ term is folded in analytically
    /// (its series form would need $E_{-1}$).
    fn dyadic_radial_series(
        &self,
        rho: [f64; 2],
        frequency: Complex64,
    ) -> Result<DyadicValue, CoreError> {
        let (rx, ry) = (rho[0], rho[1]);
        let rho2 = rx * rx + ry * ry;
        if rho2 == 0.0 {
            return Err(CoreError::Domain {
                function: "dyadic_radial_series",
                argument: 0.0,
            });
        }
        let eta2 = self.eta * self.eta;
        let eta4 = eta2 * eta2;
        let x = rho2 * eta2;

        let gauss = (-x).exp() / rho2;
        let screen = x + 1.0;
        let mut total = DyadicValue::new(
            Complex64::from(gauss * ((4.0 * rx * rx / rho2) * screen - 2.0)),
            Complex64::from(gauss * (4.0 * rx * ry / rho2) * screen),
            Complex64::from(gauss * ((4.0 * ry * ry / rho2) * screen - 2.0)),
        );

        let half = self.wavenumber(frequency) / (2.0 * self.eta);
        let ratio2 = half * half;
        let mut coeff = Complex64::from(1.0);
        for j in 1..=self.params.j_max {
            coeff = coeff * ratio2 / (j as f64);
            let e_lo = expn(j - 1, x)?;
            let e_hi = expn(j, x)?;
            total += DyadicValue::new(
                coeff * (4.0 * rx * rx * eta4 * e_lo - 2.0 * eta2 * e_hi),
                coeff * (4.0 * rx * ry * eta4 * e_lo),
                coeff * (4.0 * ry * ry * eta4 * e_lo - 2.0 * eta2 * e_hi),
            );
        }
        Ok(total)
    }

    /// Real-space half of the off-site dyadic, origin included.
    ///
    /// # Errors
    /// Fails with term context when `position` sits on a lattice point.
    pub fn real_dyadic(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> Result<DyadicValue, CoreError> {
        let mut total = DyadicValue::default();
        for &point in &self.real_points {
            let rho = [position[0] - point[0], position[1] - point[1]];
            let series = self
                .dyadic_radial_series(rho, frequency)
                .map_err(|err| self.term_failure(frequency, q, point, err))?;
            total += series * Complex64::new(0.0, q[0] * point[0] + q[1] * point[1]).exp();
        }
        Ok(total * Complex64::from(1.0 / (4.0 * std::f64::consts::PI)))
    }

    /// Converged off-site dyadic Green's function. The diagonal picks up
    /// `k²·G⁽²⁾`; the spectral weights already carry the matching `k²` for
    /// the reciprocal half, so the in-plane trace satisfies
    /// `tr G = 3k²·G_monopolar`.
    ///
    /// # Errors
    /// Fails with term context when `position` sits on a lattice point.
    pub fn dyadic_offsite(
        &self,
        frequency: Complex64,
        q: [f64; 2],
        position: [f64; 2],
    ) -> Result<DyadicValue, CoreError> {
        let k2 = self.wavenumber(frequency).powu(2);
        let mut total = self.reciprocal_dyadic(frequency, q, position)
            + self.real_dyadic(frequency, q, position)?;
        let trace_term = k2 * self.real_monopolar(frequency, q, position)?;
        total.xx += trace_term;
        total.yy += trace_term;
        Ok(total)
    }

    /// Origin term $t_0 = -1 - \tfrac{i}{\pi}\,\mathrm{Ei}(k^2/4\eta^2)$ of
    /// the zeroth Hankel lattice sum.
    fn origin_correction(&self, frequency: Complex64) -> Complex64 {
        let k2 = self.wavenumber(frequency).powu(2);
        let argument = k2 / (4.0 * self.eta * self.eta);
        -Complex64::from(1.0) - Complex64::i() * expi_complex(argument) / std::f64::consts::PI
    }

    /// Spectral harmonic $t_1(n) = \tfrac{4 i^{n+1}}{A} \sum_\mathbf{G}
    /// \frac{e^{(k^2-\beta^2)/4\eta^2}}{k^2 - \beta^2}
    /// \left(\tfrac{\beta}{k}\right)^n e^{-i n \varphi_\beta}$,
    /// origin included.
    fn reciprocal_harmonic(&self, order: u32, frequency: Complex64, q: [f64; 2]) -> Complex64 {
        let k = self.wavenumber(frequency);
        let k2 = k.powu(2);
        let four_eta2 = 4.0 * self.eta * self.eta;
        let prefactor = 4.0 * Complex64::i().powu(order + 1) / self.area;
        let mut total = Complex64::default();
        for &g in &self.reciprocal_points {
            let bx = q[0] + g[0];
            let by = q[1] + g[1];
            let beta = bx.hypot(by);
            let diff = k2 - beta * beta;
            let mut term = (diff / four_eta2).exp() / diff;
            if order > 0 {
                let angular = Complex64::new(0.0, -(order as f64) * by.atan2(bx)).exp();
                term = term * (Complex64::from(beta) / k).powu(order) * angular;
            }
            total += term;
        }
        prefactor * total
    }

    /// Screened radial moment $I_n(d)$ of the self sums, memoised per
    /// `(distance, frequency, n)`.
    ///
    /// Base cases are $I_0 = \tfrac12 S(d, w, 1)$ and
    /// $I_1 = \tfrac{\eta^2}{2} S(d, w, 0)$; higher orders follow the
    /// recurrence
    /// $I_n = \frac{\eta^{2(n-1)}}{2(n-1)d^2} e^{k^2/4\eta^2 - d^2\eta^2}
    /// + I_{n-1}/d^2 - \frac{k^2}{4d^2} I_{n-2}$,
    /// built iteratively so every intermediate order lands in the cache.
    fn radial_moment(
        &mut self,
        order: u32,
        distance: f64,
        frequency: Complex64,
    ) -> Result<Complex64, CoreError> {
        let key = MomentKey {
            distance: distance.to_bits(),
            frequency_re: frequency.re.to_bits(),
            frequency_im: frequency.im.to_bits(),
            order,
        };
        if let Some(&cached) = self.moments.get(&key) {
            return Ok(cached);
        }
        let value = match order {
            0 => self.radial_integral(distance, frequency, 1)? * 0.5,
            1 => self.radial_integral(distance, frequency, 0)? * (0.5 * self.eta * self.eta),
            _ => {
                let k2 = self.wavenumber(frequency).powu(2);
                let eta2 = self.eta * self.eta;
                let d2 = distance * distance;
                let gauss = (k2 / (4.0 * eta2) - d2 * eta2).exp();
                let mut before = self.radial_moment(0, distance, frequency)?;
                let mut last = self.radial_moment(1, distance, frequency)?;
                for n in 2..=order {
                    let boundary = eta2.powi(n as i32 - 1) / (2.0 * (n as f64 - 1.0) * d2);
                    let current = boundary * gauss + last / d2 - k2 / (4.0 * d2) * before;
                    self.moments.insert(
                        MomentKey {
                            distance: distance.to_bits(),
                            frequency_re: frequency.re.to_bits(),
                            frequency_im: frequency.im.to_bits(),
                            order: n,
                        },
                        current,
                    );
                    before = last;
                    last = current;
                }
                last
            }
        };
        self.moments.insert(key, value);
        Ok(value)
    }

    /// Real-space harmonic $t_2(n) = -\tfrac{2^{n+1} i}{\pi}
    /// \sum_{\mathbf{R} \ne 0} e^{i\mathbf{q}\cdot\mathbf{R}}
    /// e^{-i n \alpha_R} \left(\tfrac{R}{k}\right)^n I_n(R)$.
    fn real_harmonic(
        &mut self,
        order: u32,
        frequency: Complex64,
        q: [f64; 2],
    ) -> Result<Complex64, CoreError> {
        let k = self.wavenumber(frequency);
        let prefactor = -(2.0_f64.powi(order as i32 + 1)) * Complex64::i() / std::f64::consts::PI;
        let mut total = Complex64::default();
        for i in 0..self.punctured_points.len() {
            let point = self.punctured_points[i];
            let r = point[0].hypot(point[1]);
            let moment = self
                .radial_moment(order, r, frequency)
                .map_err(|err| self.term_failure(frequency, q, point, err))?;
            let mut term = Complex64::new(0.0, q[0] * point[0] + q[1] * point[1]).exp() * moment;
            if order > 0 {
                let angular =
                    Complex64::new(0.0, -(order as f64) * point[1].atan2(point[0])).exp();
                term = term * angular * (Complex64::from(r) / k).powu(order);
            }
            total += term;
        }
        Ok(prefactor * total)
    }

    /// Hankel lattice sum $h_n = t_0 \delta_{n0} + t_1(n) + t_2(n)$.
    /// Negative orders are defined through $h_{-n} = -\overline{h_n}$.
    ///
    /// # Errors
    /// Propagates screened-moment failures with term context.
    pub fn hankel_lattice_sum(
        &mut self,
        order: i32,
        frequency: Complex64,
        q: [f64; 2],
    ) -> Result<Complex64, CoreError> {
        if order < 0 {
            let positive = self.hankel_lattice_sum(-order, frequency, q)?;
            return Ok(-positive.conj());
        }
        let n = order as u32;
        let mut total =
            self.reciprocal_harmonic(n, frequency, q) + self.real_harmonic(n, frequency, q)?;
        if n == 0 {
            total += self.origin_correction(frequency);
        }
        Ok(total)
    }

    /// Reduced monopolar self-interaction $-\tfrac{i}{4} h_0$, the
    /// converged value of the origin-punctured scalar lattice sum.
    ///
    /// # Errors
    /// Propagates screened-moment failures with term context.
    pub fn monopolar_self(
        &mut self,
        frequency: Complex64,
        q: [f64; 2],
    ) -> Result<Complex64, CoreError> {
        let h0 = self.hankel_lattice_sum(0, frequency, q)?;
        Ok(Complex64::new(0.0, -0.25) * h0)
    }

    /// Reduced dyadic self-interaction block, assembled from $h_0$ and
    /// $h_{\pm 2}$:
    ///
    /// $$ G^s_{xx,yy} = -\tfrac{i}{8} h_0 \mp \tfrac{i}{16}(h_{-2} + h_2),
    /// \qquad G^s_{xy} = -\tfrac{1}{16}(h_{-2} - h_2). $$
    ///
    /// The result is independent of $\eta$ and of the Bloch phase origin;
    /// the assembler scales it by $-k^2$ for the matrix diagonal.
    ///
    /// # Errors
    /// Propagates screened-moment failures with term context.
    pub fn reduced_dyadic_self(
        &mut self,
        frequency: Complex64,
        q: [f64; 2],
    ) -> Result<DyadicValue, CoreError> {
        let h0 = self.hankel_lattice_sum(0, frequency, q)?;
        let plus = self.hankel_lattice_sum(2, frequency, q)?;
        let minus = -plus.conj();
        let eighth = Complex64::new(0.0, 0.125);
        let sixteenth = Complex64::new(0.0, 0.0625);
        Ok(DyadicValue::new(
            -eighth * h0 - sixteenth * (minus + plus),
            -(minus - plus) * 0.0625,
            -eighth * h0 + sixteenth * (minus + plus),
        ))
    }
}
