//! Core types shared across the Polara framework.
//!
//! This module defines the unit-conversion configuration, the particle
//! description, and the serialisable result containers produced by sweeps.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Unit-conversion configuration.
///
/// All spectral quantities are expressed in electron-volts and all lengths in
/// metres, so the single conversion the physics needs is photon energy to
/// free-space wavenumber. The constant is carried explicitly rather than
/// baked into formulas so that a calculation can be reproduced against data
/// sets that used a slightly different value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Units {
    /// Photon energy (eV) to free-space wavenumber (m⁻¹):
    /// $k = w \cdot 2\pi e / (h c)$. Default ≈ 5.0689 × 10⁶ m⁻¹/eV.
    pub ev_to_wavenumber: f64,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            ev_to_wavenumber: 1.602e-19 * 2.0 * std::f64::consts::PI / (6.626e-34 * 2.997e8),
        }
    }
}

impl Units {
    /// Free-space wavenumber (m⁻¹) for a complex frequency in eV.
    pub fn wavenumber(&self, w: Complex64) -> Complex64 {
        w * self.ev_to_wavenumber
    }

    /// Free-space wavenumber (m⁻¹) for a real frequency in eV.
    pub fn wavenumber_real(&self, w: f64) -> f64 {
        w * self.ev_to_wavenumber
    }
}

/// A metallic nanoparticle, modelled as a 2D disc with a Drude response.
///
/// Every particle in a lattice shares the same material and size; their
/// positions are owned by the unit cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Disc radius (m).
    pub radius: f64,
    /// Drude plasma frequency (eV).
    pub plasma_frequency: f64,
    /// Ohmic loss rate (eV).
    pub loss: f64,
}

impl Particle {
    /// Drude permittivity at a (possibly complex) frequency:
    /// $\varepsilon(w) = 1 - w_p^2 / (w^2 - i \gamma w)$.
    pub fn permittivity(&self, w: Complex64) -> Complex64 {
        let wp2 = self.plasma_frequency * self.plasma_frequency;
        Complex64::from(1.0) - wp2 / (w * w - Complex64::i() * self.loss * w)
    }

    /// Dynamic 2D dipole polarisability with radiative correction.
    ///
    /// The quasistatic disc polarisability $2\pi r^2 \tilde\varepsilon$ with
    /// $\tilde\varepsilon = (\varepsilon - 1)/(\varepsilon + 1)$ is corrected
    /// so that the optical theorem holds for a point scatterer in 2D:
    ///
    /// $\alpha(w) = \dfrac{2\pi r^2 \tilde\varepsilon}
    ///              {1 - \tfrac{i\pi}{4} (k r)^2 \tilde\varepsilon}$
    ///
    /// # Arguments
    /// * `w` - Frequency (eV); complex values are accepted for resonance
    ///   searches off the real axis.
    /// * `units` - Conversion constants used to form $k$.
    pub fn polarisability(&self, w: Complex64, units: &Units) -> Complex64 {
        let k = units.wavenumber(w);
        let perm = self.permittivity(w);
        let eps = (perm - 1.0) / (perm + 1.0);
        let quasistatic = 2.0 * std::f64::consts::PI * self.radius * self.radius * eps;
        let kr2 = (k * self.radius) * (k * self.radius);
        let radiative = Complex64::new(0.0, 0.25 * std::f64::consts::PI) * kr2 * eps;
        quasistatic / (Complex64::from(1.0) - radiative)
    }
}

/// Extinction at a single frequency for a fixed Bloch wavevector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Frequency (eV).
    pub frequency_ev: f64,
    /// Extinction efficiency (dimensionless lattice units).
    pub extinction: f64,
}

/// Extinction at a single (wavevector, frequency) pair of a band map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandPoint {
    /// Index of the wavevector along the Brillouin-zone path.
    pub path_index: usize,
    /// Bloch wavevector x-component (m⁻¹).
    pub qx: f64,
    /// Bloch wavevector y-component (m⁻¹).
    pub qy: f64,
    /// Frequency (eV).
    pub frequency_ev: f64,
    /// Extinction efficiency.
    pub extinction: f64,
    /// Free-photon energy $|q| / (\mathrm{eV\ conversion})$ at this
    /// wavevector (eV), for plotting the light line.
    pub light_line_ev: f64,
}

/// Outcome of a complex-frequency resonance refinement.
///
/// The refinement is best-effort: when the iteration stalls it reports the
/// last iterate with `converged = false` instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonanceRoot {
    /// Complex resonance frequency (eV). The imaginary part is half the
    /// resonance linewidth.
    pub frequency: Complex64,
    /// Determinant magnitude at the returned iterate.
    pub residual: f64,
    /// Newton iterations taken.
    pub iterations: usize,
    /// Whether the step tolerance was met.
    pub converged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn conversion_constant_magnitude() {
        let units = Units::default();
        assert_relative_eq!(units.ev_to_wavenumber, 5.0689e6, max_relative = 1e-3);
        // 4 eV sits in the optical range: wavelength 2*pi/k around 310 nm
        let k = units.wavenumber_real(4.0);
        let wavelength = 2.0 * std::f64::consts::PI / k;
        assert!(wavelength > 300e-9 && wavelength < 320e-9);
    }

    #[test]
    fn drude_permittivity_is_negative_below_plasma_frequency() {
        let p = Particle {
            radius: 5e-9,
            plasma_frequency: 6.18,
            loss: 0.01,
        };
        let eps = p.permittivity(Complex64::from(4.0));
        assert!(eps.re < 0.0);
        assert!(eps.im > 0.0); // lossy metal
    }

    #[test]
    fn polarisability_reference_values() {
        let units = Units::default();
        let p = Particle {
            radius: 5e-9,
            plasma_frequency: 6.18,
            loss: 0.01,
        };
        let a1 = p.polarisability(Complex64::from(4.0), &units);
        assert_relative_eq!(a1.re, 9.674_935_071_6e-16, max_relative = 1e-9);
        assert_relative_eq!(a1.im, 3.566_508_468_7e-17, max_relative = 1e-9);

        // Near the single-particle dipole resonance w_p/sqrt(2) the response
        // turns almost purely imaginary and two orders of magnitude larger.
        let a2 = p.polarisability(Complex64::from(4.3699), &units);
        assert_relative_eq!(a2.re, 2.652_796_043_7e-17, max_relative = 1e-8);
        assert_relative_eq!(a2.im, 2.138_567_035_4e-14, max_relative = 1e-8);
    }
}
