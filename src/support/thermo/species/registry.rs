use crate::support::thermo::{ConfigError, PhysicalConstants, PropertyError, check_len};

use super::{Correlation, CorrelationRecord, ReferenceProperties};

/// Relative tolerance when comparing reference pressures across species.
const PRESSURE_TOLERANCE: f64 = 1e-9;

/// One reference-state correlation per species, evaluated in bulk.
///
/// Slot `k` holds the correlation for species index `k`. Cloning deep-copies
/// every owned correlation; [`Delegated`](super::Delegated) slots keep sharing
/// their source.
#[derive(Debug, Clone)]
pub struct SpeciesThermo {
    slots: Vec<Correlation>,
    ref_pressure: f64,
}

impl SpeciesThermo {
    /// Assembles a registry for `n_species` species from one correlation each.
    ///
    /// Correlations may arrive in any order; each is placed by its own index.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `n_species` is zero, an index is out of
    /// range or installed twice, a slot is left empty, or the correlations
    /// disagree on the reference pressure.
    pub fn new(n_species: usize, models: Vec<Correlation>) -> Result<Self, ConfigError> {
        if n_species == 0 {
            return Err(ConfigError::MissingSpecies { index: 0 });
        }

        let mut slots: Vec<Option<Correlation>> = vec![None; n_species];
        for model in models {
            let index = model.index();
            let Some(slot) = slots.get_mut(index) else {
                return Err(ConfigError::SpeciesIndex {
                    species: model.species().to_string(),
                    index,
                    count: n_species,
                });
            };
            if slot.is_some() {
                return Err(ConfigError::DuplicateSpecies {
                    species: model.species().to_string(),
                    index,
                });
            }
            *slot = Some(model);
        }

        let slots = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(ConfigError::MissingSpecies { index }))
            .collect::<Result<Vec<_>, _>>()?;

        let ref_pressure = slots[0].ref_pressure();
        for model in &slots[1..] {
            check_ref_pressure(model, ref_pressure)?;
        }

        let registry = Self {
            slots,
            ref_pressure,
        };

        tracing::debug!(
            species = n_species,
            min_temp = registry.min_temp(),
            max_temp = registry.max_temp(),
            ref_pressure,
            "assembled species thermo registry"
        );

        Ok(registry)
    }

    /// Builds every correlation from its record, then assembles the registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] from building a correlation or from
    /// [`SpeciesThermo::new`].
    pub fn from_records(
        n_species: usize,
        records: &[CorrelationRecord],
        constants: &PhysicalConstants,
    ) -> Result<Self, ConfigError> {
        let models = records
            .iter()
            .map(|record| Correlation::from_record(record, constants))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(n_species, models)
    }

    /// Replaces the correlation in slot `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `k` is out of range, the model was built
    /// for a different index, or its reference pressure differs from the
    /// registry's.
    pub fn install(&mut self, k: usize, model: Correlation) -> Result<(), ConfigError> {
        let count = self.slots.len();
        if k >= count || model.index() != k {
            return Err(ConfigError::SpeciesIndex {
                species: model.species().to_string(),
                index: if k >= count { k } else { model.index() },
                count,
            });
        }
        check_ref_pressure(&model, self.ref_pressure)?;

        self.slots[k] = model;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the correlation for species `k`, if any.
    #[must_use]
    pub fn model(&self, k: usize) -> Option<&Correlation> {
        self.slots.get(k)
    }

    /// Evaluates every species at temperature `t` (kelvin) into the output arrays.
    ///
    /// Temperatures outside a species' declared range are extrapolated
    /// silently.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Length`] if a buffer is not one entry per
    /// species, or the error of a failing [`Delegated`](super::Delegated) source.
    /// Outputs may be partially written on error.
    pub fn update(
        &self,
        t: f64,
        cp_r: &mut [f64],
        h_rt: &mut [f64],
        s_r: &mut [f64],
    ) -> Result<(), PropertyError> {
        let n = self.slots.len();
        check_len("cp_r", cp_r, n)?;
        check_len("h_rt", h_rt, n)?;
        check_len("s_r", s_r, n)?;

        for (k, model) in self.slots.iter().enumerate() {
            if tracing::enabled!(tracing::Level::TRACE)
                && (t < model.min_temp() || t > model.max_temp())
            {
                tracing::trace!(
                    species = model.species(),
                    t,
                    min_temp = model.min_temp(),
                    max_temp = model.max_temp(),
                    "extrapolating reference state"
                );
            }

            let props = model.evaluate(t)?;
            cp_r[k] = props.cp_r;
            h_rt[k] = props.h_rt;
            s_r[k] = props.s_r;
        }
        Ok(())
    }

    /// Evaluates only species `k` at temperature `t`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidState`] if `k` is out of range, or the
    /// error of a failing delegated source.
    pub fn update_one(&self, k: usize, t: f64) -> Result<ReferenceProperties, PropertyError> {
        self.slots
            .get(k)
            .ok_or_else(|| PropertyError::InvalidState {
                context: format!("species index {k} out of range for {} species", self.len()),
            })?
            .evaluate(t)
    }

    /// Lowest valid temperature of species `k`.
    #[must_use]
    pub fn species_min_temp(&self, k: usize) -> Option<f64> {
        self.slots.get(k).map(Correlation::min_temp)
    }

    /// Highest valid temperature of species `k`.
    #[must_use]
    pub fn species_max_temp(&self, k: usize) -> Option<f64> {
        self.slots.get(k).map(Correlation::max_temp)
    }

    /// Lowest temperature at which every species is within range.
    #[must_use]
    pub fn min_temp(&self) -> f64 {
        self.slots
            .iter()
            .map(Correlation::min_temp)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Highest temperature at which every species is within range.
    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.slots
            .iter()
            .map(Correlation::max_temp)
            .fold(f64::INFINITY, f64::min)
    }

    /// Reference pressure shared by all species, in pascal.
    #[must_use]
    pub fn ref_pressure(&self) -> f64 {
        self.ref_pressure
    }

    /// Reports the record that rebuilds the correlation of species `k`.
    #[must_use]
    pub fn report_parameters(
        &self,
        k: usize,
        constants: &PhysicalConstants,
    ) -> Option<CorrelationRecord> {
        self.slots.get(k).map(|model| model.report_parameters(constants))
    }

    /// Replaces the coefficients of species `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSpecies`] if `k` is out of range, or the
    /// correlation's own error for malformed coefficients.
    pub fn modify_parameters(
        &mut self,
        k: usize,
        coefficients: &[f64],
        constants: &PhysicalConstants,
    ) -> Result<(), ConfigError> {
        self.slots
            .get_mut(k)
            .ok_or(ConfigError::MissingSpecies { index: k })?
            .modify_parameters(coefficients, constants)
    }
}

fn check_ref_pressure(model: &Correlation, expected: f64) -> Result<(), ConfigError> {
    let found = model.ref_pressure();
    if (found - expected).abs() > PRESSURE_TOLERANCE * expected.abs() {
        return Err(ConfigError::ReferencePressureMismatch {
            species: model.species().to_string(),
            expected,
            found,
        });
    }
    Ok(())
}
