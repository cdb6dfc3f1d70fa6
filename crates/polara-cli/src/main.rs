//! Polara command-line interface.
//!
//! Run lattice sweeps from TOML configuration files:
//! ```sh
//! polara run job.toml
//! polara validate job.toml
//! polara cells
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polara")]
#[command(about = "Polara: plasmonic lattice sweeps via Ewald-summed Green's functions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sweep from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the sweep.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the available lattice families.
    Cells,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Polara Lattice Solver");
            println!("=====================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let run = runner::run_sweep(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            match &run.result {
                runner::SweepResult::Spectrum { q, points } => {
                    if job.output.save_csv {
                        let path = out_dir.join("spectrum.csv");
                        runner::write_spectrum_csv(points, *q, &path, &job)?;
                    }
                    if job.output.save_json {
                        runner::write_json(points, &out_dir.join("spectrum.json"))?;
                    }
                }
                runner::SweepResult::Band(points) => {
                    if job.output.save_csv {
                        runner::write_band_csv(points, &out_dir.join("band.csv"), &job)?;
                    }
                    if job.output.save_json {
                        runner::write_json(points, &out_dir.join("band.json"))?;
                    }
                }
            }

            if let Some(root) = &run.resonance {
                runner::write_resonance_json(root, &out_dir.join("resonance.json"))?;
            }

            println!("Sweep complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Cells => {
            println!("Available lattice families:");
            println!();
            println!("  square           — 1 particle per cell, Γ→X→M→Γ circuit");
            println!("  triangle         — 1 particle per cell, Γ→M→K→Γ circuit");
            println!("  simple_honeycomb — 2 particles per cell, Γ→M→K→Γ circuit");
            println!("  honeycomb        — 6-particle ring supercell, K→Γ→M circuit");
            println!();
            println!("Spacing is the particle separation; scaling multiplies it into");
            println!("the lattice pitch. The honeycomb ring keeps its radius equal to");
            println!("the spacing while the supercell grows with the scaling.");
            Ok(())
        }
    }
}
