//! Piecewise-constant heat capacity fitted to tabulated standard chemical potentials.
//!
//! The input is a table of `mu0(T_i)` values plus the enthalpy at 298.15 K.
//! Over each interval the heat capacity is constant and chosen so that the
//! Gibbs energy difference between the endpoints is reproduced exactly:
//!
//! ```text
//! mu2 − mu1 = cp·(ΔT − T2·ln(T2/T1)) − s1·ΔT
//! ```
//!
//! Starting from the anchor point at 298.15 K, where `h = H298` and
//! `s = (H298 − mu0)/T`, the tables are filled upward and then downward.
//! Enthalpy and entropy are continuous across breakpoints while heat capacity
//! jumps.

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{ConfigError, PhysicalConstants, T_REF},
};

use super::{CorrelationKind, CorrelationRecord, ReferenceProperties};

const KIND: CorrelationKind = CorrelationKind::PiecewiseMu0;

/// Piecewise-constant-mu0 correlation for one species.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseMu0 {
    species: String,
    index: usize,
    min_temp: f64,
    max_temp: f64,
    ref_pressure: f64,
    table: Table,
}

/// Derived per-point tables, all divided by the gas constant.
#[derive(Debug, Clone, PartialEq)]
struct Table {
    h298_r: f64,
    temperatures: Vec<f64>,
    mu0_r: Vec<f64>,
    h_r: Vec<f64>,
    s_r: Vec<f64>,
    /// One value per interval.
    cp_r: Vec<f64>,
}

impl PiecewiseMu0 {
    /// Builds the correlation from a [`CorrelationKind::PiecewiseMu0`] record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the point count is inconsistent with the
    /// coefficient vector, fewer than 2 points are given, the temperatures are
    /// not strictly increasing, or no point is exactly 298.15 K.
    pub fn new(
        record: &CorrelationRecord,
        constants: &PhysicalConstants,
    ) -> Result<Self, ConfigError> {
        let table = Table::build(&record.species, &record.coefficients, constants.gas_constant)?;

        tracing::debug!(
            species = %record.species,
            points = table.temperatures.len(),
            "built piecewise mu0 table"
        );

        Ok(Self {
            species: record.species.clone(),
            index: record.index,
            min_temp: record.min_temp,
            max_temp: record.max_temp,
            ref_pressure: record.reference_pressure,
            table,
        })
    }

    /// Evaluates at temperature `t`.
    ///
    /// Uses the first interval whose upper breakpoint is at or above `t`.
    /// Above the last breakpoint the last interval is extended.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> ReferenceProperties {
        let last = self.table.cp_r.len() - 1;
        let j = self.table.temperatures[1..]
            .iter()
            .position(|&upper| t <= upper)
            .unwrap_or(last);
        self.evaluate_interval(j, t)
    }

    fn evaluate_interval(&self, j: usize, t: f64) -> ReferenceProperties {
        let table = &self.table;
        let t1 = table.temperatures[j];
        let cp_r = table.cp_r[j];

        ReferenceProperties {
            cp_r,
            h_rt: (table.h_r[j] + (t - t1) * cp_r) / t,
            s_r: table.s_r[j] + cp_r * (t / t1).ln(),
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

    /// Breakpoint temperatures, in kelvin.
    #[must_use]
    pub fn temperatures(&self) -> &[f64] {
        &self.table.temperatures
    }

    /// Constant `cp/R` of each interval.
    #[must_use]
    pub fn interval_cp_r(&self) -> &[f64] {
        &self.table.cp_r
    }

    /// Reports the record that rebuilds this correlation.
    #[must_use]
    pub fn report_parameters(&self, constants: &PhysicalConstants) -> CorrelationRecord {
        let r = constants.gas_constant;
        let points: Vec<(f64, f64)> = self
            .table
            .temperatures
            .iter()
            .zip(&self.table.mu0_r)
            .map(|(&t, &mu0_r)| (t, mu0_r * r))
            .collect();

        CorrelationRecord::piecewise_mu0(
            self.species.clone(),
            self.index,
            self.table.h298_r * r,
            &points,
            self.ref_pressure,
        )
        .with_range(self.min_temp, self.max_temp)
    }

    /// Rebuilds the tables from a new coefficient vector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as [`PiecewiseMu0::new`].
    pub fn modify_parameters(
        &mut self,
        coefficients: &[f64],
        constants: &PhysicalConstants,
    ) -> Result<(), ConfigError> {
        self.table = Table::build(&self.species, coefficients, constants.gas_constant)?;
        Ok(())
    }
}

impl Table {
    fn build(species: &str, coefficients: &[f64], gas_constant: f64) -> Result<Self, ConfigError> {
        let Some(&declared) = coefficients.first() else {
            return Err(ConfigError::CoefficientCount {
                species: species.to_string(),
                kind: KIND.name(),
                expected: 2,
                found: 0,
            });
        };
        if !declared.is_finite() || declared < 0.0 || declared.fract() != 0.0 {
            return Err(ConfigError::InvalidParameter {
                species: species.to_string(),
                parameter: "point count",
                value: declared,
            });
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n_points = declared as usize;
        if n_points < 2 {
            return Err(ConfigError::TooFewPoints {
                species: species.to_string(),
                found: n_points,
            });
        }
        let expected = n_points.saturating_mul(2).saturating_add(2);
        CorrelationRecord::expect_coefficients(species, KIND, coefficients, expected)?;

        let h298_r = coefficients[1] / gas_constant;
        let (temperatures, mu0_r): (Vec<f64>, Vec<f64>) = coefficients[2..]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1] / gas_constant))
            .unzip();

        if let Some(&t) = temperatures
            .iter()
            .find(|t| StrictlyPositive::check(*t).is_err())
        {
            return Err(ConfigError::InvalidParameter {
                species: species.to_string(),
                parameter: "temperature",
                value: t,
            });
        }
        if let Some(pair) = temperatures.windows(2).find(|pair| pair[1] <= pair[0]) {
            return Err(ConfigError::NonMonotonicTemperatures {
                species: species.to_string(),
                previous: pair[0],
                next: pair[1],
            });
        }
        let anchor = temperatures
            .iter()
            .position(|&t| t == T_REF)
            .ok_or_else(|| ConfigError::MissingAnchor {
                species: species.to_string(),
            })?;

        let n = temperatures.len();
        let mut h_r = vec![0.0; n];
        let mut s_r = vec![0.0; n];
        let mut cp_r = vec![0.0; n - 1];

        h_r[anchor] = h298_r;
        s_r[anchor] = (h298_r - mu0_r[anchor]) / temperatures[anchor];

        // Upward from the anchor, solving from the lower endpoint's entropy.
        for i in anchor..n - 1 {
            let (t1, t2) = (temperatures[i], temperatures[i + 1]);
            let delta_mu = mu0_r[i + 1] - mu0_r[i];
            let delta_t = t2 - t1;
            let ln_ratio = (t2 / t1).ln();

            let cp = (delta_mu + s_r[i] * delta_t) / (delta_t - t2 * ln_ratio);
            cp_r[i] = cp;
            h_r[i + 1] = h_r[i] + cp * delta_t;
            s_r[i + 1] = s_r[i] + cp * ln_ratio;
        }

        // Downward from the anchor, solving from the upper endpoint's entropy.
        for i in (0..anchor).rev() {
            let (t1, t2) = (temperatures[i], temperatures[i + 1]);
            let delta_mu = mu0_r[i + 1] - mu0_r[i];
            let delta_t = t2 - t1;
            let ln_ratio = (t2 / t1).ln();

            let cp = (delta_mu + s_r[i + 1] * delta_t) / (delta_t - t1 * ln_ratio);
            cp_r[i] = cp;
            h_r[i] = h_r[i + 1] - cp * delta_t;
            s_r[i] = s_r[i + 1] - cp * ln_ratio;
        }

        Ok(Self {
            h298_r,
            temperatures,
            mu0_r,
            h_r,
            s_r,
            cp_r,
        })
    }
}
