//! Margules solution model.
//!
//! [`MargulesSolutionModel`] is the [`twine_core::Model`] adapter. It maps a
//! [`SolutionInput`] to [`SolutionProperties`] using the internal [`core`]
//! computation, which layers a cached constant-volume standard state under a
//! Margules excess Gibbs energy model.

pub(crate) mod core;

use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use twine_core::Model;
use uom::si::{
    electric_potential::volt,
    f64::{ElectricPotential, Pressure, ThermodynamicTemperature},
};

use crate::support::{
    constraint::{Constrained, ConstraintError, UnitInterval},
    thermo::PropertyError,
};

pub use self::core::{MargulesSolution, SMALL_MOLE_FRACTION, SolutionProperties};

/// Thermodynamic state of the solution.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionInput {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub mole_fractions: Vec<Constrained<f64, UnitInterval>>,
    pub electric_potential: ElectricPotential,
}

impl SolutionInput {
    /// Creates an input at zero electric potential.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::MoleFraction`] naming the first mole fraction
    /// outside `[0, 1]`.
    pub fn new(
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        mole_fractions: &[f64],
    ) -> Result<Self, SolutionError> {
        let mole_fractions = mole_fractions
            .iter()
            .enumerate()
            .map(|(index, &x)| {
                UnitInterval::new(x).map_err(|source| SolutionError::MoleFraction { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            temperature,
            pressure,
            mole_fractions,
            electric_potential: ElectricPotential::new::<volt>(0.0),
        })
    }

    /// Returns this input at a different electric potential.
    #[must_use]
    pub fn with_electric_potential(mut self, electric_potential: ElectricPotential) -> Self {
        self.electric_potential = electric_potential;
        self
    }
}

/// Errors returned by [`MargulesSolutionModel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolutionError {
    #[error("mole fraction {index} {source}")]
    MoleFraction {
        index: usize,
        source: ConstraintError,
    },

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("solution mutex poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for SolutionError {
    fn from(_: PoisonError<T>) -> Self {
        SolutionError::Poisoned
    }
}

/// A [`twine_core::Model`] over a [`MargulesSolution`].
///
/// The standard-state cache is mutated on every call, so the solution sits
/// behind a [`Mutex`]. Calls are serialized; consecutive calls at the same
/// `(T, P)` reuse the cached standard state.
#[derive(Debug)]
pub struct MargulesSolutionModel {
    solution: Mutex<MargulesSolution>,
}

impl MargulesSolutionModel {
    #[must_use]
    pub fn new(solution: MargulesSolution) -> Self {
        Self {
            solution: Mutex::new(solution),
        }
    }

    /// Consumes the model and returns the solution.
    ///
    /// # Errors
    ///
    /// Returns [`SolutionError::Poisoned`] if a previous call panicked.
    pub fn into_inner(self) -> Result<MargulesSolution, SolutionError> {
        Ok(self.solution.into_inner()?)
    }
}

impl Model for MargulesSolutionModel {
    type Input = SolutionInput;
    type Output = SolutionProperties;
    type Error = SolutionError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let x: Vec<f64> = input
            .mole_fractions
            .iter()
            .map(Constrained::get)
            .collect();

        let mut solution = self.solution.lock()?;
        Ok(solution.evaluate(
            input.temperature,
            input.pressure,
            &x,
            input.electric_potential,
        )?)
    }
}

// The model is handed to solvers that may move it across threads.
#[allow(dead_code)]
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<MargulesSolutionModel>();
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{pressure::pascal, thermodynamic_temperature::kelvin};

    #[test]
    fn input_rejects_out_of_range_mole_fraction() {
        let error = SolutionInput::new(
            ThermodynamicTemperature::new::<kelvin>(900.0),
            Pressure::new::<pascal>(101_325.0),
            &[0.4, 1.2],
        )
        .unwrap_err();
        assert_eq!(
            error,
            SolutionError::MoleFraction {
                index: 1,
                source: ConstraintError::AboveMaximum
            }
        );
    }

    #[test]
    fn poisoned_lock_maps_to_poisoned() {
        let error: SolutionError = PoisonError::new(()).into();
        assert_eq!(error, SolutionError::Poisoned);
    }
}
