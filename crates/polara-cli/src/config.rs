//! TOML configuration deserialisation for sweep jobs.

use anyhow::Context;
use polara_core::greens::EwaldParams;
use polara_core::lattice::cells::UnitCell;
use polara_core::roots::NewtonOptions;
use polara_core::types::{Particle, Units};
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub lattice: LatticeConfig,
    pub sweep: SweepConfig,
    #[serde(default)]
    pub ewald: EwaldParams,
    #[serde(default)]
    pub units: Units,
    #[serde(default)]
    pub output: OutputConfig,
}

impl JobConfig {
    /// Cross-field checks that deserialisation alone cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sweep.wavevector.is_some() && self.sweep.path_size.is_some() {
            anyhow::bail!("sweep: set either 'wavevector' or 'path_size', not both");
        }
        if self.sweep.refine && self.sweep.path_size.is_some() {
            anyhow::bail!("sweep: resonance refinement applies to fixed-wavevector sweeps only");
        }
        if let FrequencySpec::List { values } = &self.sweep.frequencies {
            if values.is_empty() {
                anyhow::bail!("sweep: frequency list is empty");
            }
        }
        if let FrequencySpec::Range { points, .. } = &self.sweep.frequencies {
            if *points == 0 {
                anyhow::bail!("sweep: frequency range needs at least one point");
            }
        }
        Ok(())
    }
}

/// Lattice section: the cell family and the shared particle.
#[derive(Debug, Deserialize)]
pub struct LatticeConfig {
    #[serde(flatten)]
    pub cell: UnitCell,
    pub particle: Particle,
}

/// Sweep parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    pub frequencies: FrequencySpec,
    /// Bloch wavevector in units of π/pitch. Omitted: normal incidence.
    #[serde(default)]
    pub wavevector: Option<[f64; 2]>,
    /// Band-path sample budget along the family's high-symmetry circuit.
    /// Set for a band map instead of a fixed-wavevector spectrum.
    #[serde(default)]
    pub path_size: Option<usize>,
    /// Worker thread cap; omitted means all available threads.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Whether to refine the spectrum peak into a complex resonance.
    #[serde(default)]
    pub refine: bool,
    #[serde(default)]
    pub newton: NewtonOptions,
}

/// Frequency specification: either a range or an explicit list (eV).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    Range { range: [f64; 2], points: usize },
    List { values: Vec<f64> },
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the sweep as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save the sweep as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: JobConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_job_parses_with_defaults() {
        let job: JobConfig = toml::from_str(
            r#"
            [lattice]
            family = "square"
            spacing = 15e-9

            [lattice.particle]
            radius = 5e-9
            plasma_frequency = 6.18
            loss = 0.01

            [sweep]
            frequencies = { range = [3.25, 5.25], points = 90 }
            "#,
        )
        .unwrap();

        assert!(matches!(job.lattice.cell, UnitCell::Square { .. }));
        assert_eq!(job.lattice.cell.scaling(), 1.0);
        assert_eq!(job.ewald.j_max, 5);
        assert_eq!(job.ewald.truncation, 12);
        assert!(job.sweep.wavevector.is_none());
        assert!(!job.sweep.refine);
        assert!(job.output.save_csv);
        assert_eq!(job.output.directory, "./output");
        job.validate().unwrap();
    }

    #[test]
    fn band_job_parses_and_conflicts_are_rejected() {
        let text = r#"
            [lattice]
            family = "honeycomb"
            spacing = 15e-9
            scaling = 2.0

            [lattice.particle]
            radius = 5e-9
            plasma_frequency = 6.18
            loss = 0.01

            [sweep]
            frequencies = { values = [4.0, 4.5] }
            path_size = 90
        "#;
        let job: JobConfig = toml::from_str(text).unwrap();
        assert!(matches!(job.lattice.cell, UnitCell::Honeycomb { .. }));
        assert_eq!(job.sweep.path_size, Some(90));
        job.validate().unwrap();

        let conflicted = format!("{text}\n            wavevector = [0.5, 0.0]\n");
        let job: JobConfig = toml::from_str(&conflicted).unwrap();
        assert!(job.validate().is_err());
    }

    #[test]
    fn newton_section_overrides_defaults() {
        let job: JobConfig = toml::from_str(
            r#"
            [lattice]
            family = "triangle"
            spacing = 20e-9

            [lattice.particle]
            radius = 5e-9
            plasma_frequency = 6.18
            loss = 0.01

            [sweep]
            frequencies = { range = [3.5, 5.0], points = 40 }
            refine = true

            [sweep.newton]
            max_iterations = 60
            "#,
        )
        .unwrap();
        assert!(job.sweep.refine);
        assert_eq!(job.sweep.newton.max_iterations, 60);
        assert_eq!(job.sweep.newton.step_tolerance, 1e-10);
    }
}
