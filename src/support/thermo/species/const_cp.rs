use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{ConfigError, PhysicalConstants},
};

use super::{CorrelationKind, CorrelationRecord, ReferenceProperties};

const KIND: CorrelationKind = CorrelationKind::ConstantCp;

/// Constant heat capacity about a reference temperature `t0`.
///
/// Coefficients are `[t0, h0, s0, cp0]` with `h0`, `s0` and `cp0` dimensional.
/// Enthalpy is linear in `T` and entropy logarithmic, on either side of `t0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCp {
    species: String,
    index: usize,
    min_temp: f64,
    max_temp: f64,
    ref_pressure: f64,
    t0: f64,
    h0_r: f64,
    s0_r: f64,
    cp0_r: f64,
}

impl ConstantCp {
    /// Builds the correlation from a [`CorrelationKind::ConstantCp`] record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if there are not exactly four coefficients or
    /// `t0` is not strictly positive.
    pub fn new(
        record: &CorrelationRecord,
        constants: &PhysicalConstants,
    ) -> Result<Self, ConfigError> {
        let mut model = Self {
            species: record.species.clone(),
            index: record.index,
            min_temp: record.min_temp,
            max_temp: record.max_temp,
            ref_pressure: record.reference_pressure,
            t0: 0.0,
            h0_r: 0.0,
            s0_r: 0.0,
            cp0_r: 0.0,
        };
        model.modify_parameters(&record.coefficients, constants)?;
        Ok(model)
    }

    #[must_use]
    pub fn evaluate(&self, t: f64) -> ReferenceProperties {
        ReferenceProperties {
            cp_r: self.cp0_r,
            h_rt: (self.h0_r + self.cp0_r * (t - self.t0)) / t,
            s_r: self.s0_r + self.cp0_r * (t / self.t0).ln(),
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
    pub fn report_parameters(&self, constants: &PhysicalConstants) -> CorrelationRecord {
        let r = constants.gas_constant;
        CorrelationRecord {
            species: self.species.clone(),
            index: self.index,
            kind: KIND,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            reference_pressure: self.ref_pressure,
            coefficients: vec![self.t0, self.h0_r * r, self.s0_r * r, self.cp0_r * r],
        }
    }

    /// Replaces `[t0, h0, s0, cp0]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if there are not exactly four coefficients or
    /// `t0` is not strictly positive. The model is unchanged on error.
    pub fn modify_parameters(
        &mut self,
        coefficients: &[f64],
        constants: &PhysicalConstants,
    ) -> Result<(), ConfigError> {
        CorrelationRecord::expect_coefficients(&self.species, KIND, coefficients, 4)?;

        let t0 = coefficients[0];
        if StrictlyPositive::check(&t0).is_err() {
            return Err(ConfigError::InvalidParameter {
                species: self.species.clone(),
                parameter: "t0",
                value: t0,
            });
        }

        let r = constants.gas_constant;
        self.t0 = t0;
        self.h0_r = coefficients[1] / r;
        self.s0_r = coefficients[2] / r;
        self.cp0_r = coefficients[3] / r;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn record(coefficients: Vec<f64>) -> CorrelationRecord {
        CorrelationRecord {
            species: "Ni(s)".into(),
            index: 2,
            kind: KIND,
            min_temp: 250.0,
            max_temp: 1500.0,
            reference_pressure: 101_325.0,
            coefficients,
        }
    }

    #[test]
    fn reproduces_reference_point() {
        let constants = PhysicalConstants::default();
        let r = constants.gas_constant;
        let model = ConstantCp::new(&record(vec![500.0, 2.0e6, 4.0e4, 3.0e4]), &constants).unwrap();

        let props = model.evaluate(500.0);
        assert_relative_eq!(props.cp_r, 3.0e4 / r);
        assert_relative_eq!(props.h_rt, 2.0e6 / (r * 500.0));
        assert_relative_eq!(props.s_r, 4.0e4 / r);
    }

    #[test]
    fn enthalpy_is_linear_and_entropy_logarithmic() {
        let constants = PhysicalConstants::default();
        let r = constants.gas_constant;
        let model = ConstantCp::new(&record(vec![500.0, 0.0, 0.0, 3.0e4]), &constants).unwrap();

        let props = model.evaluate(1000.0);
        assert_relative_eq!(props.h_rt * 1000.0 * r, 3.0e4 * 500.0, max_relative = 1e-12);
        assert_relative_eq!(props.s_r * r, 3.0e4 * 2.0_f64.ln(), max_relative = 1e-12);
    }

    #[test]
    fn report_round_trips() {
        let constants = PhysicalConstants::default();
        let coefficients = vec![298.15, -1.2e8, 5.5e4, 2.9e4];
        let model = ConstantCp::new(&record(coefficients.clone()), &constants).unwrap();

        let reported = model.report_parameters(&constants);
        assert_eq!(reported.kind, KIND);
        for (a, b) in reported.coefficients.iter().zip(&coefficients) {
            assert_relative_eq!(a, b, max_relative = 1e-14);
        }
    }

    #[test]
    fn rejects_bad_coefficients() {
        let constants = PhysicalConstants::default();

        let error = ConstantCp::new(&record(vec![500.0, 0.0, 0.0]), &constants).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::CoefficientCount {
                expected: 4,
                found: 3,
                ..
            }
        ));

        let error = ConstantCp::new(&record(vec![0.0, 0.0, 0.0, 1.0]), &constants).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidParameter {
                parameter: "t0",
                ..
            }
        ));
    }
}
