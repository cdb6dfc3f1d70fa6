//! # Polara Core
//!
//! The numerical backbone of the Polara framework. This crate computes the
//! collective optical response of two-dimensional periodic arrays of plasmonic
//! nanoparticles through lattice sums of the 2D dyadic Green's function.
//!
//! ## Architecture
//!
//! The central object is the Ewald summation engine
//! ([`greens::ewald::EwaldSum`]), which splits the conditionally convergent
//! Bloch-periodic Green's function sum into a reciprocal-space part and a
//! real-space part, both exponentially convergent. A slow direct summation
//! ([`greens::direct`]) of the same quantities is kept as an independent
//! cross-check. On top of the engine, [`assembly`] builds the per-wavevector
//! interaction matrix of a unit cell, and [`spectrum`] and [`roots`] turn that
//! matrix into extinction spectra, band maps, and complex resonance
//! frequencies.
//!
//! ## Modules
//!
//! - [`types`] - Shared data structures (unit conversion, particles, results).
//! - [`special`] - Cylinder Bessel/Hankel functions and exponential integrals.
//! - [`lattice`] - Bravais lattices, unit-cell families, Brillouin-zone paths.
//! - [`greens`] - Direct and Ewald-accelerated Green's-function lattice sums.
//! - [`assembly`] - Interaction-matrix assembly and spectral functionals.
//! - [`linalg`] - Dense complex determinant and inverse-trace primitives.
//! - [`roots`] - Complex-frequency resonance refinement.
//! - [`spectrum`] - Frequency/wavevector sweep drivers and peak analysis.

pub mod assembly;
pub mod error;
pub mod greens;
pub mod lattice;
pub mod linalg;
pub mod roots;
pub mod special;
pub mod spectrum;
pub mod types;

pub use error::CoreError;
