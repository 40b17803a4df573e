use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::support::thermo::PropertyError;

use super::{CorrelationKind, CorrelationRecord, ReferenceProperties};

/// An external standard state that can report its own reference-state properties.
///
/// Implementors own their temperature; [`Delegated`] sets it before every read.
pub trait ReferenceStateSource: std::fmt::Debug + Send {
    /// Moves the source to temperature `t`, in kelvin.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the source cannot be evaluated at `t`.
    fn set_temperature(&mut self, t: f64) -> Result<(), PropertyError>;

    /// Reference-state `h/RT` at the current temperature.
    fn enthalpy_rt_ref(&self) -> f64;

    /// Reference-state `s/R` at the current temperature.
    fn entropy_r_ref(&self) -> f64;

    /// Reference-state `cp/R` at the current temperature.
    fn cp_r_ref(&self) -> f64;

    fn min_temp(&self) -> f64;

    fn max_temp(&self) -> f64;

    fn ref_pressure(&self) -> f64;
}

/// A source shared between its owner and the registry slot reading it.
pub type SharedSource = Arc<Mutex<dyn ReferenceStateSource>>;

/// Forwards reference-state evaluation to a [`ReferenceStateSource`].
#[derive(Debug, Clone)]
pub struct Delegated {
    species: String,
    index: usize,
    source: SharedSource,
}

impl Delegated {
    #[must_use]
    pub fn new(species: impl Into<String>, index: usize, source: SharedSource) -> Self {
        Self {
            species: species.into(),
            index,
            source,
        }
    }

    /// Sets the source temperature and reads back its properties.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Poisoned`] if the source lock is poisoned, or
    /// whatever the source returns from [`ReferenceStateSource::set_temperature`].
    pub fn evaluate(&self, t: f64) -> Result<ReferenceProperties, PropertyError> {
        let mut source = self.source.lock()?;
        source.set_temperature(t)?;

        Ok(ReferenceProperties {
            cp_r: source.cp_r_ref(),
            h_rt: source.enthalpy_rt_ref(),
            s_r: source.entropy_r_ref(),
        })
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
        self.peek().min_temp()
    }

    #[must_use]
    pub fn max_temp(&self) -> f64 {
        self.peek().max_temp()
    }

    #[must_use]
    pub fn ref_pressure(&self) -> f64 {
        self.peek().ref_pressure()
    }

    /// Reports an empty record; the source owns its parameters.
    #[must_use]
    pub fn report_parameters(&self) -> CorrelationRecord {
        let source = self.peek();
        CorrelationRecord {
            species: self.species.clone(),
            index: self.index,
            kind: CorrelationKind::Delegated,
            min_temp: source.min_temp(),
            max_temp: source.max_temp(),
            reference_pressure: source.ref_pressure(),
            coefficients: Vec::new(),
        }
    }

    /// Locks the source for read-only queries that cannot fail.
    ///
    /// Range and pressure queries do not depend on the state a panicking
    /// holder may have left behind, so a poisoned lock is recovered.
    fn peek(&self) -> MutexGuard<'_, dyn ReferenceStateSource + 'static> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
