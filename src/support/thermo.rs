//! Thermodynamic property layers for multi-species mixtures.
//!
//! The layers stack from leaf to root:
//!
//! 1. [`species`]: one reference-state correlation per species, evaluated in
//!    bulk by a [`SpeciesThermo`](species::SpeciesThermo) registry.
//! 2. [`standard_state`]: pressure-corrected standard-state properties layered
//!    on the registry output and cached on the last `(T, P)` pair.
//! 3. [`excess`]: composition-dependent excess Gibbs energy models producing
//!    activity coefficients and their derivatives.
//!
//! All per-species quantities are nondimensionalized by the gas constant
//! (`h/RT`, `s/R`, `cp/R`, `g/RT`) and indexed by species position.

mod constants;
mod error;

pub mod excess;
pub mod species;
pub mod standard_state;

pub use constants::PhysicalConstants;
pub use error::{ConfigError, PropertyError};

/// Reference temperature at which tabulated enthalpies are anchored, in kelvin.
pub const T_REF: f64 = 298.15;

/// Checks that a caller-provided buffer has the expected length.
pub(crate) fn check_len(
    context: &'static str,
    buffer: &[f64],
    expected: usize,
) -> Result<(), PropertyError> {
    if buffer.len() == expected {
        Ok(())
    } else {
        Err(PropertyError::Length {
            context,
            expected,
            found: buffer.len(),
        })
    }
}
