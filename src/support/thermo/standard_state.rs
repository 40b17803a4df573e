//! Pressure-corrected standard-state properties.
//!
//! [`ConstVolStandardState`] layers a constant-molar-volume pressure correction
//! on the reference-state output of a [`SpeciesThermo`] registry:
//!
//! ```text
//! h_ss/RT  = h_ref/RT + (P − P_ref)·V/(R·T)
//! s_ss/R   = s_ref/R
//! cp_ss/R  = cp_ref/R
//! g_ss/RT  = h_ss/RT − s_ss/R
//! ```
//!
//! Results are cached on the last `(T, P)` pair, compared exactly. A new
//! temperature re-evaluates the registry and the pressure layer, a new
//! pressure alone recomputes only the pressure layer, and a repeated pair
//! does nothing.

mod model;
mod storage;

pub use model::{StandardStateModel, StandardStateRecord};
pub use storage::StorageConfig;

use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{ConfigError, PhysicalConstants, PropertyError, check_len, species::SpeciesThermo},
};

/// What [`ConstVolStandardState::set_state`] had to recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// Same `(T, P)` as the cached pair.
    Unchanged,
    /// Only the pressure layer was recomputed.
    Pressure,
    /// The registry and the pressure layer were both re-evaluated.
    Temperature,
}

/// Nondimensional per-species arrays for one layer.
#[derive(Debug, Clone)]
struct Layer {
    cp_r: Vec<f64>,
    h_rt: Vec<f64>,
    s_r: Vec<f64>,
    g_rt: Vec<f64>,
}

impl Layer {
    fn new(n: usize) -> Self {
        Self {
            cp_r: vec![0.0; n],
            h_rt: vec![0.0; n],
            s_r: vec![0.0; n],
            g_rt: vec![0.0; n],
        }
    }
}

/// Constant-molar-volume standard-state manager with a `(T, P)` cache.
///
/// Not safe to share across threads without external synchronization; the
/// cache is mutated by [`set_state`](Self::set_state).
#[derive(Debug, Clone)]
pub struct ConstVolStandardState {
    registry: SpeciesThermo,
    constants: PhysicalConstants,
    storage: StorageConfig,
    molar_volumes: Vec<f64>,
    last_t: f64,
    last_p: f64,
    reference: Layer,
    standard: Layer,
}

impl ConstVolStandardState {
    /// Creates a manager over `registry` with one standard-state record per species.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the record count differs from the registry's
    /// species count, a model tag is unknown, a molar volume is not strictly
    /// positive, or a species slot is out of range, duplicated, or missing.
    pub fn new(
        registry: SpeciesThermo,
        records: &[StandardStateRecord],
        constants: PhysicalConstants,
        storage: StorageConfig,
    ) -> Result<Self, ConfigError> {
        let n = registry.len();
        if records.len() != n {
            return Err(ConfigError::SpeciesCount {
                context: "standard state records",
                expected: n,
                found: records.len(),
            });
        }

        let mut volumes: Vec<Option<f64>> = vec![None; n];
        for record in records {
            record.validate()?;
            let slot = volumes
                .get_mut(record.index)
                .ok_or_else(|| ConfigError::SpeciesIndex {
                    species: record.species.clone(),
                    index: record.index,
                    count: n,
                })?;
            if slot.replace(record.molar_volume).is_some() {
                return Err(ConfigError::DuplicateSpecies {
                    species: record.species.clone(),
                    index: record.index,
                });
            }
        }
        let molar_volumes = volumes
            .into_iter()
            .enumerate()
            .map(|(index, volume)| volume.ok_or(ConfigError::MissingSpecies { index }))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            species = n,
            ref_pressure = registry.ref_pressure(),
            reference_storage = storage.reference_state,
            standard_storage = storage.standard_state,
            "created constant volume standard state"
        );

        Ok(Self {
            registry,
            constants,
            storage,
            molar_volumes,
            last_t: f64::NAN,
            last_p: f64::NAN,
            reference: Layer::new(n),
            standard: Layer::new(n),
        })
    }

    /// Moves the cache to `(t, p)`, recomputing only what changed.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidState`] for a non-positive temperature
    /// or non-finite pressure, or the error of a failing delegated reference
    /// state. A failed temperature update invalidates the cache.
    #[allow(clippy::float_cmp)]
    pub fn set_state(
        &mut self,
        t: ThermodynamicTemperature,
        p: Pressure,
    ) -> Result<StateChange, PropertyError> {
        let t = t.get::<kelvin>();
        let p = p.get::<pascal>();

        if StrictlyPositive::check(&t).is_err() || !t.is_finite() {
            return Err(PropertyError::InvalidState {
                context: format!("temperature must be positive and finite, got {t} K"),
            });
        }
        if !p.is_finite() {
            return Err(PropertyError::InvalidState {
                context: format!("pressure must be finite, got {p} Pa"),
            });
        }

        let same_t = t == self.last_t;
        let same_p = p == self.last_p;

        if same_t && same_p {
            return Ok(StateChange::Unchanged);
        }

        if same_t {
            tracing::trace!(t, p, "recomputing pressure layer");
            self.update_pressure_layer(t, p);
            self.last_p = p;
            return Ok(StateChange::Pressure);
        }

        tracing::trace!(t, p, "recomputing reference and pressure layers");
        if let Err(error) = self.update_reference_layer(t) {
            self.last_t = f64::NAN;
            self.last_p = f64::NAN;
            return Err(error);
        }
        self.update_pressure_layer(t, p);
        self.last_t = t;
        self.last_p = p;
        Ok(StateChange::Temperature)
    }

    fn update_reference_layer(&mut self, t: f64) -> Result<(), PropertyError> {
        let layer = &mut self.reference;
        self.registry
            .update(t, &mut layer.cp_r, &mut layer.h_rt, &mut layer.s_r)?;
        for ((g, h), s) in layer.g_rt.iter_mut().zip(&layer.h_rt).zip(&layer.s_r) {
            *g = h - s;
        }
        Ok(())
    }

    fn update_pressure_layer(&mut self, t: f64, p: f64) {
        let del_p_rt = (p - self.registry.ref_pressure()) / (self.constants.gas_constant * t);
        let (reference, standard) = (&self.reference, &mut self.standard);

        for k in 0..self.molar_volumes.len() {
            standard.h_rt[k] = reference.h_rt[k] + del_p_rt * self.molar_volumes[k];
            standard.s_r[k] = reference.s_r[k];
            standard.cp_r[k] = reference.cp_r[k];
            standard.g_rt[k] = standard.h_rt[k] - standard.s_r[k];
        }
    }

    /// Number of species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.molar_volumes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.molar_volumes.is_empty()
    }

    /// Temperature of the cached state in kelvin, if a state has been set.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        (!self.last_t.is_nan()).then_some(self.last_t)
    }

    /// Pressure of the cached state in pascal, if a state has been set.
    #[must_use]
    pub fn pressure(&self) -> Option<f64> {
        (!self.last_p.is_nan()).then_some(self.last_p)
    }

    #[must_use]
    pub fn registry(&self) -> &SpeciesThermo {
        &self.registry
    }

    #[must_use]
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    #[must_use]
    pub fn storage(&self) -> StorageConfig {
        self.storage
    }

    /// Reference pressure of the underlying registry, in pascal.
    #[must_use]
    pub fn ref_pressure(&self) -> f64 {
        self.registry.ref_pressure()
    }

    /// Standard-state `h/RT` at the cached `(T, P)`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Unsupported`] without standard-state storage,
    /// [`PropertyError::InvalidState`] before the first [`set_state`](Self::set_state),
    /// and [`PropertyError::Length`] for a wrongly sized buffer.
    /// The other accessors fail the same way.
    pub fn enthalpy_rt(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("enthalpy_rt", &self.standard.h_rt, out)
    }

    /// Standard-state `s/R` at the cached `(T, P)`.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn entropy_r(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("entropy_r", &self.standard.s_r, out)
    }

    /// Standard-state `cp/R` at the cached `(T, P)`.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn cp_r(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("cp_r", &self.standard.cp_r, out)
    }

    /// Standard-state `g/RT` at the cached `(T, P)`.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn gibbs_rt(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("gibbs_rt", &self.standard.g_rt, out)
    }

    /// Standard chemical potentials `g_ss`, dimensional.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn standard_chem_potentials(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("standard_chem_potentials", &self.standard.g_rt, out)?;
        let rt = self.constants.gas_constant * self.last_t;
        out.iter_mut().for_each(|mu| *mu *= rt);
        Ok(())
    }

    /// Standard-state molar volumes.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn standard_volumes(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("standard_volumes", &self.molar_volumes, out)
    }

    /// Reference-state `h/RT` at the cached temperature.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn enthalpy_rt_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_reference("enthalpy_rt_ref", &self.reference.h_rt, out)
    }

    /// Reference-state `s/R` at the cached temperature.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn entropy_r_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_reference("entropy_r_ref", &self.reference.s_r, out)
    }

    /// Reference-state `cp/R` at the cached temperature.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn cp_r_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_reference("cp_r_ref", &self.reference.cp_r, out)
    }

    /// Reference-state `g/RT` at the cached temperature.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn gibbs_rt_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_reference("gibbs_rt_ref", &self.reference.g_rt, out)
    }

    /// Reference-state Gibbs energies, dimensional.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn gibbs_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_reference("gibbs_ref", &self.reference.g_rt, out)?;
        let rt = self.constants.gas_constant * self.last_t;
        out.iter_mut().for_each(|g| *g *= rt);
        Ok(())
    }

    /// Molar volumes at the reference pressure.
    ///
    /// Equal to [`standard_volumes`](Self::standard_volumes) for incompressible
    /// species, and gated on standard-state storage like it.
    ///
    /// # Errors
    ///
    /// See [`enthalpy_rt`](Self::enthalpy_rt).
    pub fn standard_volumes_ref(&self, out: &mut [f64]) -> Result<(), PropertyError> {
        self.copy_standard("standard_volumes_ref", &self.molar_volumes, out)
    }

    fn copy_standard(
        &self,
        accessor: &'static str,
        values: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        self.storage.require_standard(accessor)?;
        self.copy_cached(accessor, values, out)
    }

    fn copy_reference(
        &self,
        accessor: &'static str,
        values: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        self.storage.require_reference(accessor)?;
        self.copy_cached(accessor, values, out)
    }

    fn copy_cached(
        &self,
        accessor: &'static str,
        values: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        if self.last_t.is_nan() {
            return Err(PropertyError::InvalidState {
                context: format!("{accessor} called before set_state"),
            });
        }
        check_len(accessor, out, values.len())?;
        out.copy_from_slice(values);
        Ok(())
    }
}
