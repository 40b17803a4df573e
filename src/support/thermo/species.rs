//! Per-species reference-state correlations.
//!
//! A [`Correlation`] maps temperature to nondimensional `cp/R`, `h/RT` and
//! `s/R` at the reference pressure for a single species. The set of kinds is
//! closed and dispatched by `match`, so bulk evaluation in
//! [`SpeciesThermo::update`] never pays for dynamic dispatch except for the
//! [`Delegated`] kind, which forwards to an external source by design.
//!
//! Every kind can report the coefficient record it was built from, and
//! rebuilding from that record reproduces the same evaluations.
//!
//! # Extrapolation
//!
//! Evaluating outside `[min_temp, max_temp]` is not an error. Each kind
//! extends its boundary formula; callers that need strict bounds must check
//! [`Correlation::min_temp`] and [`Correlation::max_temp`] themselves.

mod const_cp;
mod delegated;
mod mu0;
mod nasa7;
mod record;
mod registry;

pub use const_cp::ConstantCp;
pub use delegated::{Delegated, ReferenceStateSource, SharedSource};
pub use mu0::PiecewiseMu0;
pub use nasa7::Nasa7;
pub use record::{CorrelationKind, CorrelationRecord};
pub use registry::SpeciesThermo;

#[cfg(test)]
pub(crate) use delegated::tests::{CountingSource, counting_source};

use crate::support::thermo::{ConfigError, PhysicalConstants, PropertyError};

/// Nondimensional reference-state properties of one species at one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceProperties {
    /// Heat capacity, `cp/R`.
    pub cp_r: f64,
    /// Enthalpy, `h/RT`.
    pub h_rt: f64,
    /// Entropy, `s/R`.
    pub s_r: f64,
}

impl ReferenceProperties {
    /// Gibbs energy, `g/RT = h/RT − s/R`.
    #[must_use]
    pub fn g_rt(&self) -> f64 {
        self.h_rt - self.s_r
    }
}

/// A reference-state correlation for one species.
#[derive(Debug, Clone)]
pub enum Correlation {
    PiecewiseMu0(PiecewiseMu0),
    ConstantCp(ConstantCp),
    Nasa7(Nasa7),
    Delegated(Delegated),
}

impl Correlation {
    /// Builds a correlation from a loader-produced record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the record is malformed for its kind, or if
    /// the kind is [`CorrelationKind::Delegated`], which needs a live source
    /// and must be built with [`Delegated::new`].
    pub fn from_record(
        record: &CorrelationRecord,
        constants: &PhysicalConstants,
    ) -> Result<Self, ConfigError> {
        record.validate()?;
        match record.kind {
            CorrelationKind::PiecewiseMu0 => {
                PiecewiseMu0::new(record, constants).map(Self::PiecewiseMu0)
            }
            CorrelationKind::ConstantCp => ConstantCp::new(record, constants).map(Self::ConstantCp),
            CorrelationKind::Nasa7 => Nasa7::new(record).map(Self::Nasa7),
            CorrelationKind::Delegated => Err(ConfigError::UnsupportedKind {
                species: record.species.clone(),
                kind: CorrelationKind::Delegated.name(),
            }),
        }
    }

    /// Evaluates the reference-state properties at temperature `t` (kelvin).
    ///
    /// # Errors
    ///
    /// Only the [`Delegated`] kind can fail, when its source fails or its lock
    /// is poisoned.
    pub fn evaluate(&self, t: f64) -> Result<ReferenceProperties, PropertyError> {
        match self {
            Self::PiecewiseMu0(model) => Ok(model.evaluate(t)),
            Self::ConstantCp(model) => Ok(model.evaluate(t)),
            Self::Nasa7(model) => Ok(model.evaluate(t)),
            Self::Delegated(model) => model.evaluate(t),
        }
    }

    /// Returns the kind tag of this correlation.
    #[must_use]
    pub fn kind(&self) -> CorrelationKind {
        match self {
            Self::PiecewiseMu0(_) => CorrelationKind::PiecewiseMu0,
            Self::ConstantCp(_) => CorrelationKind::ConstantCp,
            Self::Nasa7(_) => CorrelationKind::Nasa7,
            Self::Delegated(_) => CorrelationKind::Delegated,
        }
    }

    /// Returns the species name this correlation was built for.
    #[must_use]
    pub fn species(&self) -> &str {
        match self {
            Self::PiecewiseMu0(model) => model.species(),
            Self::ConstantCp(model) => model.species(),
            Self::Nasa7(model) => model.species(),
            Self::Delegated(model) => model.species(),
        }
    }

    /// Returns the species slot this correlation writes to.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::PiecewiseMu0(model) => model.index(),
            Self::ConstantCp(model) => model.index(),
            Self::Nasa7(model) => model.index(),
            Self::Delegated(model) => model.index(),
        }
    }

    /// Lowest temperature of the declared validity range, in kelvin.
    #[must_use]
    pub fn min_temp(&self) -> f64 {
        match self {
            Self::PiecewiseMu0(model) => model.min_temp(),
            Self::ConstantCp(model) => model.min_temp(),
            Self::Nasa7(model) => model.min_temp(),
            Self::Delegated(model) => model.min_temp(),
        }
    }

    /// Highest temperature of the declared validity range, in kelvin.
    #[must_use]
    pub fn max_temp(&self) -> f64 {
        match self {
            Self::PiecewiseMu0(model) => model.max_temp(),
            Self::ConstantCp(model) => model.max_temp(),
            Self::Nasa7(model) => model.max_temp(),
            Self::Delegated(model) => model.max_temp(),
        }
    }

    /// Reference pressure of the correlation, in pascal.
    #[must_use]
    pub fn ref_pressure(&self) -> f64 {
        match self {
            Self::PiecewiseMu0(model) => model.ref_pressure(),
            Self::ConstantCp(model) => model.ref_pressure(),
            Self::Nasa7(model) => model.ref_pressure(),
            Self::Delegated(model) => model.ref_pressure(),
        }
    }

    /// Reports the record needed to rebuild this correlation.
    ///
    /// Coefficients are re-dimensionalized with `constants`.
    #[must_use]
    pub fn report_parameters(&self, constants: &PhysicalConstants) -> CorrelationRecord {
        match self {
            Self::PiecewiseMu0(model) => model.report_parameters(constants),
            Self::ConstantCp(model) => model.report_parameters(constants),
            Self::Nasa7(model) => model.report_parameters(),
            Self::Delegated(model) => model.report_parameters(),
        }
    }

    /// Replaces the coefficients and re-derives any internal tables.
    ///
    /// A failed modification leaves the correlation unchanged.
    /// The [`Delegated`] kind holds no coefficients and ignores the call.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the new coefficients are malformed.
    pub fn modify_parameters(
        &mut self,
        coefficients: &[f64],
        constants: &PhysicalConstants,
    ) -> Result<(), ConfigError> {
        match self {
            Self::PiecewiseMu0(model) => model.modify_parameters(coefficients, constants),
            Self::ConstantCp(model) => model.modify_parameters(coefficients, constants),
            Self::Nasa7(model) => model.modify_parameters(coefficients),
            Self::Delegated(_) => Ok(()),
        }
    }
}
