//! Two-range NASA 7-coefficient polynomials.
//!
//! Each range carries `a1..a7` with
//!
//! ```text
//! cp/R = a1 + a2·T + a3·T² + a4·T³ + a5·T⁴
//! h/RT = a1 + a2·T/2 + a3·T²/3 + a4·T³/4 + a5·T⁴/5 + a6/T
//! s/R  = a1·ln T + a2·T + a3·T²/2 + a4·T³/3 + a5·T⁴/4 + a7
//! ```
//!
//! The coefficients are already nondimensional, so the gas constant never
//! enters.

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::ConfigError,
};

use super::{CorrelationKind, CorrelationRecord, ReferenceProperties};

const KIND: CorrelationKind = CorrelationKind::Nasa7;
const COEFFICIENT_COUNT: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Nasa7 {
    species: String,
    index: usize,
    min_temp: f64,
    max_temp: f64,
    ref_pressure: f64,
    t_mid: f64,
    low: [f64; 7],
    high: [f64; 7],
}

impl Nasa7 {
    /// Builds the correlation from `[T_mid, low a1..a7, high a1..a7]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if there are not exactly 15 coefficients or
    /// `T_mid` is not strictly positive.
    pub fn new(record: &CorrelationRecord) -> Result<Self, ConfigError> {
        let mut model = Self {
            species: record.species.clone(),
            index: record.index,
            min_temp: record.min_temp,
            max_temp: record.max_temp,
            ref_pressure: record.reference_pressure,
            t_mid: 0.0,
            low: [0.0; 7],
            high: [0.0; 7],
        };
        model.modify_parameters(&record.coefficients)?;
        Ok(model)
    }

    /// Evaluates with the low range at or below `T_mid`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> ReferenceProperties {
        let a = if t <= self.t_mid { &self.low } else { &self.high };
        let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);

        ReferenceProperties {
            cp_r: a[0] + a[1] * t + a[2] * t2 + a[3] * t3 + a[4] * t4,
            h_rt: a[0]
                + a[1] * t / 2.0
                + a[2] * t2 / 3.0
                + a[3] * t3 / 4.0
                + a[4] * t4 / 5.0
                + a[5] / t,
            s_r: a[0] * t.ln() + a[1] * t + a[2] * t2 / 2.0 + a[3] * t3 / 3.0 + a[4] * t4 / 4.0
                + a[6],
        }
    }

    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn min_temp(&self) -> f64 {
        self.min_temp
    }

    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.max_temp
    }

    #[must_use]
    pub fn ref_pressure(&self) -> f64 {
        self.ref_pressure
    }

    #[must_use]
    pub fn report_parameters(&self) -> CorrelationRecord {
        let mut coefficients = Vec::with_capacity(COEFFICIENT_COUNT);
        coefficients.push(self.t_mid);
        coefficients.extend_from_slice(&self.low);
        coefficients.extend_from_slice(&self.high);

        CorrelationRecord {
            species: self.species.clone(),
            index: self.index,
            kind: KIND,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            reference_pressure: self.ref_pressure,
            coefficients,
        }
    }

    /// Replaces all 15 coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a wrong count or a non-positive `T_mid`.
    /// The model is unchanged on error.
    pub fn modify_parameters(&mut self, coefficients: &[f64]) -> Result<(), ConfigError> {
        CorrelationRecord::expect_coefficients(
            &self.species,
            KIND,
            coefficients,
            COEFFICIENT_COUNT,
        )?;

        let t_mid = coefficients[0];
        if StrictlyPositive::check(&t_mid).is_err() {
            return Err(ConfigError::InvalidParameter {
                species: self.species.clone(),
                parameter: "midpoint temperature",
                value: t_mid,
            });
        }

        self.t_mid = t_mid;
        self.low.copy_from_slice(&coefficients[1..8]);
        self.high.copy_from_slice(&coefficients[8..15]);
        Ok(())
    }
}
