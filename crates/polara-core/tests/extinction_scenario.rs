//! End-to-end extinction sweep of the reference square array.
//!
//! A 15 nm square lattice of 5 nm discs (plasma frequency 6.18 eV, loss
//! 0.01 eV) is swept over 90 frequencies between 3.25 and 5.25 eV at normal
//! incidence. The collective lattice resonance sits well above the
//! single-disc quasistatic resonance at $w_p/\sqrt{2}$, its grid position is
//! stable against the depth of the screened radial series, and the
//! brute-force assembly route fails to resolve it at small windows.

use approx::assert_relative_eq;
use polara_core::greens::{EwaldParams, EwaldSum};
use polara_core::lattice::cells::UnitCell;
use polara_core::types::{Particle, SpectrumPoint, Units};
use polara_core::{assembly, spectrum};

const SPACING: f64 = 15e-9;

fn cell() -> UnitCell {
    UnitCell::Square {
        spacing: SPACING,
        scaling: 1.0,
    }
}

fn particle() -> Particle {
    Particle {
        radius: 5e-9,
        plasma_frequency: 6.18,
        loss: 0.01,
    }
}

fn engine(j_max: u32) -> EwaldSum {
    let params = EwaldParams {
        j_max,
        ..EwaldParams::default()
    };
    EwaldSum::new(&cell(), params, Units::default()).unwrap()
}

fn sweep(j_max: u32) -> Vec<SpectrumPoint> {
    let grid = spectrum::frequency_grid(3.25, 5.25, 90);
    let mut sum = engine(j_max);
    spectrum::extinction_spectrum(&mut sum, &grid, [0.0, 0.0], &cell(), &particle()).unwrap()
}

#[test]
fn sweep_peak_sits_above_the_single_disc_resonance() {
    let points = sweep(5);
    assert_eq!(points.len(), 90);

    // Spot values along the sweep.
    for &(index, reference) in &[
        (0, 1.705_798e-10),
        (30, 5.225_447e-10),
        (45, 1.115_162e-9),
        (50, 1.522_016e-9),
        (60, 3.312_813e-9),
        (89, 5.329_911e-8),
    ] {
        assert_relative_eq!(
            points[index as usize].extinction,
            reference,
            max_relative = 1e-5
        );
    }

    let peak = spectrum::peak(&points).unwrap();
    assert_relative_eq!(peak.frequency_ev, 3.25 + 2.0 * 83.0 / 89.0, max_relative = 1e-14);
    assert_relative_eq!(peak.extinction, 3.175_601_171e-5, max_relative = 1e-6);

    // A single interior maximum on this window, and it is the global peak.
    let maxima = spectrum::local_maxima(&points);
    assert_eq!(maxima.len(), 1);
    assert_relative_eq!(maxima[0].frequency_ev, peak.frequency_ev, max_relative = 1e-14);

    // Collective resonance, not the isolated-disc one.
    let quasistatic = 6.18 / 2.0_f64.sqrt();
    assert!(peak.frequency_ev > quasistatic + 0.7);
}

#[test]
fn peak_position_is_stable_against_the_screened_series_depth() {
    let shallow = spectrum::peak(&sweep(5)).unwrap().clone();
    let deep = spectrum::peak(&sweep(10)).unwrap().clone();
    assert_relative_eq!(deep.frequency_ev, shallow.frequency_ev, max_relative = 1e-14);
    assert_relative_eq!(deep.extinction, shallow.extinction, max_relative = 1e-6);
}

#[test]
fn small_window_direct_route_misses_the_resonance() {
    let cell = cell();
    let particle = particle();
    let units = Units::default();
    let grid = spectrum::frequency_grid(3.25, 5.25, 90);

    let points: Vec<SpectrumPoint> = grid
        .iter()
        .map(|&frequency_ev| SpectrumPoint {
            frequency_ev,
            extinction: assembly::direct_extinction(
                &units,
                frequency_ev,
                [0.0, 0.0],
                &cell,
                &particle,
                2,
            )
            .unwrap(),
        })
        .collect();

    // The truncated sum even gets the sign wrong; its largest value sits at
    // the edge of the window instead of on the resonance.
    let peak = spectrum::peak(&points).unwrap();
    assert_relative_eq!(peak.frequency_ev, 3.25);
    assert_relative_eq!(peak.extinction, -4.975_9e-8, max_relative = 1e-4);
    assert!(points.iter().all(|point| point.extinction < 0.0));
}
