use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::ConfigError,
};

/// Tag naming the kind of a reference-state correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorrelationKind {
    /// Piecewise-constant heat capacity fitted to tabulated `mu0(T)`.
    PiecewiseMu0,
    /// Constant heat capacity about a reference temperature.
    ConstantCp,
    /// Two-range NASA 7-coefficient polynomial.
    Nasa7,
    /// Forwarded to an external pressure-dependent standard state.
    Delegated,
}

impl CorrelationKind {
    /// Returns a human-readable name for error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PiecewiseMu0 => "piecewise mu0",
            Self::ConstantCp => "constant cp",
            Self::Nasa7 => "NASA 7-coefficient",
            Self::Delegated => "delegated",
        }
    }
}

/// Structured parameters for one species correlation, as produced by a loader.
///
/// Coefficients are dimensional, in the energy basis of the
/// [`PhysicalConstants`](crate::support::thermo::PhysicalConstants) used to
/// build the correlation. Their layout depends
/// on `kind`:
///
/// - [`CorrelationKind::PiecewiseMu0`]:
///   `[n_points, H298, T_0, mu0_0, T_1, mu0_1, ...]`
/// - [`CorrelationKind::ConstantCp`]: `[T_0, h_0, s_0, cp_0]`
/// - [`CorrelationKind::Nasa7`]:
///   `[T_mid, a1..a7 (low range), a1..a7 (high range)]` (nondimensional)
/// - [`CorrelationKind::Delegated`]: empty
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationRecord {
    pub species: String,
    pub index: usize,
    pub kind: CorrelationKind,
    pub min_temp: f64,
    pub max_temp: f64,
    pub reference_pressure: f64,
    pub coefficients: Vec<f64>,
}

impl CorrelationRecord {
    /// Packs a piecewise mu0 table into a record.
    ///
    /// `h298` and the `mu0` values of `points` are dimensional (J/kmol by default).
    /// The validity range spans the first to the last point.
    #[must_use]
    pub fn piecewise_mu0(
        species: impl Into<String>,
        index: usize,
        h298: f64,
        points: &[(f64, f64)],
        reference_pressure: f64,
    ) -> Self {
        let mut coefficients = Vec::with_capacity(2 + 2 * points.len());
        coefficients.push(points.len() as f64);
        coefficients.push(h298);
        for &(t, mu0) in points {
            coefficients.push(t);
            coefficients.push(mu0);
        }

        Self {
            species: species.into(),
            index,
            kind: CorrelationKind::PiecewiseMu0,
            min_temp: points.first().map_or(0.0, |&(t, _)| t),
            max_temp: points.last().map_or(0.0, |&(t, _)| t),
            reference_pressure,
            coefficients,
        }
    }

    /// Returns this record with a different validity range.
    #[must_use]
    pub fn with_range(mut self, min_temp: f64, max_temp: f64) -> Self {
        self.min_temp = min_temp;
        self.max_temp = max_temp;
        self
    }

    /// Checks the fields shared by every kind.
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |parameter: &'static str, value: f64| ConfigError::InvalidParameter {
            species: self.species.clone(),
            parameter,
            value,
        };

        if StrictlyPositive::check(&self.reference_pressure).is_err() {
            return Err(invalid("reference pressure", self.reference_pressure));
        }
        if StrictlyPositive::check(&self.min_temp).is_err() {
            return Err(invalid("minimum temperature", self.min_temp));
        }
        if self.max_temp.is_nan() || self.max_temp < self.min_temp {
            return Err(invalid("maximum temperature", self.max_temp));
        }
        Ok(())
    }

    /// Checks the coefficient count against what the kind expects.
    pub(super) fn expect_coefficients(
        species: &str,
        kind: CorrelationKind,
        coefficients: &[f64],
        expected: usize,
    ) -> Result<(), ConfigError> {
        if coefficients.len() == expected {
            Ok(())
        } else {
            Err(ConfigError::CoefficientCount {
                species: species.to_string(),
                kind: kind.name(),
                expected,
                found: coefficients.len(),
            })
        }
    }
}
