//! # Twine Solution Thermo
//!
//! Species standard-state and excess-property models for condensed-phase
//! mixtures, built for [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: [`twine_core::Model`] adapters over the property layers.
//! - [`support`]: The property layers themselves (species correlations,
//!   standard states, excess Gibbs energy models) and their supporting utilities.
//!
//! ## Conventions
//!
//! Per-species arrays are nondimensional (`h/RT`, `s/R`, `cp/R`, `g/RT`) and
//! indexed by species position in a caller-owned composition.
//! Dimensional energies use the basis of the injected
//! [`PhysicalConstants`](support::thermo::PhysicalConstants), which defaults
//! to a kmol basis (J/kmol, m³/kmol).
//!
//! Property accessors write into caller-allocated buffers of length equal to
//! the species count, or the species count squared for full Jacobians.

pub mod models;
pub mod support;
