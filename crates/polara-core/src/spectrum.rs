//! Extinction spectra and band maps over frequency and wavevector sweeps.
//!
//! Sweeps share one Ewald engine: the screened radial moments are memoised by
//! separation and frequency, independently of the Bloch wavevector, so a band
//! map pays the moment recursion once per frequency row rather than once per
//! $(w, q)$ sample.

use num_complex::Complex64;

use crate::assembly;
use crate::error::CoreError;
use crate::greens::EwaldSum;
use crate::lattice::brillouin;
use crate::lattice::cells::UnitCell;
use crate::types::{BandPoint, Particle, SpectrumPoint};

/// Endpoint-inclusive frequency grid in eV.
pub fn frequency_grid(start: f64, end: f64, count: usize) -> Vec<f64> {
    brillouin::linspace(start, end, count, true)
}

/// Extinction at every grid frequency for a fixed Bloch wavevector.
///
/// # Errors
/// Fails on the first frequency whose system matrix cannot be assembled or
/// inverted.
pub fn extinction_spectrum(
    engine: &mut EwaldSum,
    frequencies: &[f64],
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
) -> Result<Vec<SpectrumPoint>, CoreError> {
    let mut points = Vec::with_capacity(frequencies.len());
    for &frequency_ev in frequencies {
        let extinction = assembly::extinction(engine, frequency_ev, q, cell, particle)?;
        points.push(SpectrumPoint {
            frequency_ev,
            extinction,
        });
    }
    Ok(points)
}

/// Extinction over the full (wavevector path) x (frequency grid) plane.
///
/// Wavevectors follow the high-symmetry path of the cell family
/// ([`brillouin::path_points`]); each returned point also carries the
/// free-photon energy at its wavevector so band plots can overlay the light
/// line.
///
/// # Errors
/// Fails on the first sample whose system matrix cannot be assembled or
/// inverted.
pub fn band_map(
    engine: &mut EwaldSum,
    cell: &UnitCell,
    path_size: usize,
    frequencies: &[f64],
    particle: &Particle,
) -> Result<Vec<BandPoint>, CoreError> {
    let path = brillouin::path_points(cell, path_size);
    let mut points = Vec::with_capacity(path.len() * frequencies.len());
    for (path_index, &q) in path.iter().enumerate() {
        let light_line_ev = brillouin::light_line_ev(q, engine.units());
        for &frequency_ev in frequencies {
            let extinction = assembly::extinction(engine, frequency_ev, q, cell, particle)?;
            points.push(BandPoint {
                path_index,
                qx: q[0],
                qy: q[1],
                frequency_ev,
                extinction,
                light_line_ev,
            });
        }
    }
    Ok(points)
}

/// Grid point with the largest extinction, if the spectrum is non-empty.
pub fn peak(points: &[SpectrumPoint]) -> Option<&SpectrumPoint> {
    points
        .iter()
        .max_by(|a, b| a.extinction.total_cmp(&b.extinction))
}

/// Interior local maxima of a spectrum, in grid order.
///
/// Endpoints never qualify; a resonance sitting at the edge of the sweep
/// window should widen the window rather than trust the edge sample.
pub fn local_maxima(points: &[SpectrumPoint]) -> Vec<&SpectrumPoint> {
    points
        .windows(3)
        .filter(|w| w[1].extinction > w[0].extinction && w[1].extinction > w[2].extinction)
        .map(|w| &w[1])
        .collect()
}

/// Starting guess for a resonance refinement: the spectrum peak lifted onto
/// the real axis of the complex frequency plane.
pub fn refinement_start(points: &[SpectrumPoint]) -> Option<Complex64> {
    peak(points).map(|point| Complex64::from(point.frequency_ev))
}
