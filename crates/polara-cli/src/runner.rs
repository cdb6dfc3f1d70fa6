//! Sweep runner: ties together the unit cell, the Ewald engine, and the
//! compute backend, and writes the result files.

use std::path::Path;

use anyhow::{Context, Result};

use polara_compute::{band_map_parallel, extinction_spectrum_parallel, ComputeBackend, CpuBackend};
use polara_core::greens::EwaldSum;
use polara_core::lattice::cells::UnitCell;
use polara_core::types::{BandPoint, ResonanceRoot, SpectrumPoint};
use polara_core::{roots, spectrum};

use crate::config::{FrequencySpec, JobConfig};

/// Rows produced by a sweep, in either of its two shapes.
pub enum SweepResult {
    /// Fixed-wavevector extinction spectrum.
    Spectrum {
        q: [f64; 2],
        points: Vec<SpectrumPoint>,
    },
    /// Extinction over the high-symmetry circuit.
    Band(Vec<BandPoint>),
}

/// Results from a sweep run.
pub struct RunOutput {
    pub result: SweepResult,
    pub resonance: Option<ResonanceRoot>,
}

/// Run a full sweep from a parsed job configuration.
pub fn run_sweep(job: &JobConfig) -> Result<RunOutput> {
    let frequencies = build_frequency_grid(&job.sweep.frequencies);
    let cell = job.lattice.cell.clone();
    let particle = &job.lattice.particle;

    let mut engine = EwaldSum::new(&cell, job.ewald, job.units.clone())
        .context("building the Ewald engine")?;
    log::info!(
        "Ewald engine ready: eta = {:.4e} m^-1, cell area = {:.4e} m^2",
        engine.eta(),
        engine.area()
    );

    let backend = match job.sweep.threads {
        Some(threads) => {
            CpuBackend::with_threads(threads).context("building the compute backend")?
        }
        None => CpuBackend::new(),
    };
    println!("Backend: {}", backend.device_info().name);
    println!(
        "Lattice: {} (pitch {:.3e} m, {} particle(s) per cell)",
        family_label(&cell),
        cell.pitch(),
        cell.cell_size()
    );

    if let Some(path_size) = job.sweep.path_size {
        println!(
            "Band map: {} path samples x {} frequencies",
            path_size,
            frequencies.len()
        );
        let points = band_map_parallel(&backend, &engine, &cell, path_size, &frequencies, particle)
            .context("band sweep failed")?;

        let rows = frequencies.len().max(1);
        let path_count = points.len() / rows;
        for index in 0..path_count {
            if (index + 1) % 10 == 0 || index == 0 || index == path_count - 1 {
                let row = &points[index * rows..(index + 1) * rows];
                if let Some(best) = row
                    .iter()
                    .max_by(|a, b| a.extinction.total_cmp(&b.extinction))
                {
                    println!(
                        "  [{}/{}] q=({:.3e}, {:.3e}) m^-1: peak {:.4} eV (ext {:.3e})",
                        index + 1,
                        path_count,
                        best.qx,
                        best.qy,
                        best.frequency_ev,
                        best.extinction
                    );
                }
            }
        }

        return Ok(RunOutput {
            result: SweepResult::Band(points),
            resonance: None,
        });
    }

    let q = resolve_wavevector(job, &cell);
    println!(
        "Spectrum: {} frequencies at q = ({:.3e}, {:.3e}) m^-1",
        frequencies.len(),
        q[0],
        q[1]
    );
    let points = extinction_spectrum_parallel(&backend, &engine, &frequencies, q, &cell, particle)
        .context("spectrum sweep failed")?;

    for (index, point) in points.iter().enumerate() {
        if (index + 1) % 10 == 0 || index == 0 || index == points.len() - 1 {
            println!(
                "  [{}/{}] w={:.4} eV: ext={:.3e}",
                index + 1,
                points.len(),
                point.frequency_ev,
                point.extinction
            );
        }
    }
    if let Some(peak) = spectrum::peak(&points) {
        println!(
            "Peak: w = {:.6} eV (ext {:.4e})",
            peak.frequency_ev, peak.extinction
        );
    }

    let resonance = if job.sweep.refine {
        match spectrum::refinement_start(&points) {
            Some(start) => {
                let root = roots::refine_resonance(
                    &mut engine,
                    start,
                    q,
                    &cell,
                    particle,
                    job.sweep.newton,
                )
                .context("resonance refinement failed")?;
                if root.converged {
                    println!(
                        "Resonance: w = {:.6} {:+.6}i eV ({} iterations)",
                        root.frequency.re, root.frequency.im, root.iterations
                    );
                } else {
                    println!(
                        "Resonance search stopped after {} iterations (residual {:.3e})",
                        root.iterations, root.residual
                    );
                }
                Some(root)
            }
            None => None,
        }
    } else {
        None
    };

    Ok(RunOutput {
        result: SweepResult::Spectrum { q, points },
        resonance,
    })
}

/// Frequency grid in eV from the configured specification.
fn build_frequency_grid(spec: &FrequencySpec) -> Vec<f64> {
    match spec {
        FrequencySpec::Range { range, points } => {
            spectrum::frequency_grid(range[0], range[1], *points)
        }
        FrequencySpec::List { values } => values.clone(),
    }
}

/// Bloch wavevector (m⁻¹) from the configured multiples of π/pitch.
fn resolve_wavevector(job: &JobConfig, cell: &UnitCell) -> [f64; 2] {
    match job.sweep.wavevector {
        Some([x, y]) => {
            let unit = std::f64::consts::PI / cell.pitch();
            [x * unit, y * unit]
        }
        None => [0.0, 0.0],
    }
}

fn family_label(cell: &UnitCell) -> &'static str {
    match cell {
        UnitCell::Square { .. } => "square",
        UnitCell::Triangle { .. } => "triangle",
        UnitCell::SimpleHoneycomb { .. } => "simple_honeycomb",
        UnitCell::Honeycomb { .. } => "honeycomb",
    }
}

fn write_metadata_header(
    file: &mut std::fs::File,
    title: &str,
    job: &JobConfig,
) -> std::io::Result<()> {
    use std::io::Write;

    writeln!(file, "# Polara {title}")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# lattice: family={}, spacing={:.6e} m, scaling={}",
        family_label(&job.lattice.cell),
        job.lattice.cell.spacing(),
        job.lattice.cell.scaling()
    )?;
    writeln!(
        file,
        "# particle: radius={:.6e} m, plasma_frequency={} eV, loss={} eV",
        job.lattice.particle.radius,
        job.lattice.particle.plasma_frequency,
        job.lattice.particle.loss
    )?;
    writeln!(
        file,
        "# ewald: eta_scale={}, j_max={}, truncation={}",
        job.ewald.eta_scale, job.ewald.j_max, job.ewald.truncation
    )?;
    Ok(())
}

/// Write a fixed-wavevector spectrum to a CSV file with a metadata header.
pub fn write_spectrum_csv(
    points: &[SpectrumPoint],
    q: [f64; 2],
    path: &Path,
    job: &JobConfig,
) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    write_metadata_header(&mut file, "extinction spectrum", job)?;
    writeln!(file, "# q: ({:.6e}, {:.6e}) m^-1", q[0], q[1])?;
    writeln!(file, "#")?;
    writeln!(file, "frequency_ev,extinction")?;
    for point in points {
        writeln!(file, "{:.6},{:.6e}", point.frequency_ev, point.extinction)?;
    }

    println!("Spectrum written to: {}", path.display());
    Ok(())
}

/// Write a band map to a CSV file with a metadata header.
pub fn write_band_csv(points: &[BandPoint], path: &Path, job: &JobConfig) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::File::create(path)?;

    write_metadata_header(&mut file, "band map", job)?;
    writeln!(file, "#")?;
    writeln!(file, "path_index,qx,qy,frequency_ev,extinction,light_line_ev")?;
    for point in points {
        writeln!(
            file,
            "{},{:.6e},{:.6e},{:.6},{:.6e},{:.6}",
            point.path_index,
            point.qx,
            point.qy,
            point.frequency_ev,
            point.extinction,
            point.light_line_ev
        )?;
    }

    println!("Band map written to: {}", path.display());
    Ok(())
}

/// Write sweep rows to a JSON file.
pub fn write_json<T: serde::Serialize>(rows: &[T], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(rows).context("serialising sweep rows to JSON")?;
    std::fs::write(path, json)?;

    println!("JSON written to: {}", path.display());
    Ok(())
}

/// Write a refined resonance to a JSON file.
pub fn write_resonance_json(root: &ResonanceRoot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(root).context("serialising the resonance to JSON")?;
    std::fs::write(path, json)?;

    println!("Resonance written to: {}", path.display());
    Ok(())
}
