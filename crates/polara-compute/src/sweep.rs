//! Backend-parallel frequency and wavevector sweeps.
//!
//! Every sample of an extinction sweep is independent, so the drivers here
//! fan the grid out through [`ComputeBackend::map_indexed`] and reassemble
//! the typed rows afterwards. Each task clones the shared Ewald engine; the
//! clone carries the memoised radial moments warmed up so far, and per-task
//! growth stays private to the task.

use polara_core::assembly;
use polara_core::greens::EwaldSum;
use polara_core::lattice::brillouin;
use polara_core::lattice::cells::UnitCell;
use polara_core::types::{BandPoint, Particle, SpectrumPoint};

use crate::backend::{ComputeBackend, ComputeError};

/// Extinction at every grid frequency, scheduled by the backend.
///
/// Row order matches `frequencies`, exactly as the sequential
/// [`polara_core::spectrum::extinction_spectrum`] produces it.
///
/// # Errors
/// Maps the first failing sample to [`ComputeError::ItemFailed`] with its
/// grid index.
pub fn extinction_spectrum_parallel(
    backend: &dyn ComputeBackend,
    engine: &EwaldSum,
    frequencies: &[f64],
    q: [f64; 2],
    cell: &UnitCell,
    particle: &Particle,
) -> Result<Vec<SpectrumPoint>, ComputeError> {
    let task = |index: usize| -> Result<f64, ComputeError> {
        let mut sum = engine.clone();
        assembly::extinction(&mut sum, frequencies[index], q, cell, particle).map_err(|err| {
            ComputeError::ItemFailed {
                index,
                message: err.to_string(),
            }
        })
    };
    let values = backend.map_indexed(frequencies.len(), &task)?;
    Ok(frequencies
        .iter()
        .zip(values)
        .map(|(&frequency_ev, extinction)| SpectrumPoint {
            frequency_ev,
            extinction,
        })
        .collect())
}

/// Extinction over the (wavevector path) x (frequency grid) plane,
/// scheduled by the backend.
///
/// Samples are indexed row-major with the path outermost, matching the
/// sequential [`polara_core::spectrum::band_map`] layout.
///
/// # Errors
/// Maps the first failing sample to [`ComputeError::ItemFailed`] with its
/// flattened index.
pub fn band_map_parallel(
    backend: &dyn ComputeBackend,
    engine: &EwaldSum,
    cell: &UnitCell,
    path_size: usize,
    frequencies: &[f64],
    particle: &Particle,
) -> Result<Vec<BandPoint>, ComputeError> {
    let path = brillouin::path_points(cell, path_size);
    let count = path.len() * frequencies.len();

    let task = |index: usize| -> Result<f64, ComputeError> {
        let q = path[index / frequencies.len()];
        let frequency_ev = frequencies[index % frequencies.len()];
        let mut sum = engine.clone();
        assembly::extinction(&mut sum, frequency_ev, q, cell, particle).map_err(|err| {
            ComputeError::ItemFailed {
                index,
                message: err.to_string(),
            }
        })
    };
    let values = backend.map_indexed(count, &task)?;

    let mut points = Vec::with_capacity(count);
    for (path_index, &q) in path.iter().enumerate() {
        let light_line_ev = brillouin::light_line_ev(q, engine.units());
        for (offset, &frequency_ev) in frequencies.iter().enumerate() {
            points.push(BandPoint {
                path_index,
                qx: q[0],
                qy: q[1],
                frequency_ev,
                extinction: values[path_index * frequencies.len() + offset],
                light_line_ev,
            });
        }
    }
    Ok(points)
}
