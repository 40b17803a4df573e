use std::sync::PoisonError;

use thiserror::Error;

/// Errors raised while building property models from parameter records.
///
/// These occur only at construction, load, or parameter modification time,
/// never while evaluating properties.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A piecewise table has fewer than the two points needed for one interval.
    #[error("{species}: at least 2 temperature points are required, found {found}")]
    TooFewPoints { species: String, found: usize },

    /// Breakpoint temperatures are not strictly increasing.
    #[error("{species}: temperatures are not monotonic increasing ({previous} K then {next} K)")]
    NonMonotonicTemperatures {
        species: String,
        previous: f64,
        next: f64,
    },

    /// No breakpoint sits exactly on the 298.15 K anchor.
    #[error("{species}: one temperature point must be exactly 298.15 K")]
    MissingAnchor { species: String },

    /// The coefficient vector length disagrees with what the kind declares.
    #[error("{species}: {kind} expects {expected} coefficients, found {found}")]
    CoefficientCount {
        species: String,
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    /// A standard-state model name the manager does not recognize.
    #[error("{species}: unknown standard state model `{model}`")]
    UnknownStandardStateModel { species: String, model: String },

    /// A parameter value is non-physical (non-positive volume, NaN, ...).
    #[error("{species}: invalid {parameter}: {value}")]
    InvalidParameter {
        species: String,
        parameter: &'static str,
        value: f64,
    },

    /// A record refers to a species index outside the composition.
    #[error("{species}: species index {index} out of range for {count} species")]
    SpeciesIndex {
        species: String,
        index: usize,
        count: usize,
    },

    /// Two records claim the same species slot.
    #[error("{species}: species index {index} installed twice")]
    DuplicateSpecies { species: String, index: usize },

    /// A species slot was left without a correlation.
    #[error("no reference state correlation installed for species index {index}")]
    MissingSpecies { index: usize },

    /// The number of records disagrees with the declared species count.
    #[error("{context}: expected {expected} species, found {found}")]
    SpeciesCount {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A correlation kind that cannot be built from a coefficient record alone.
    #[error("{species}: {kind} correlations cannot be built from a coefficient record")]
    UnsupportedKind { species: String, kind: &'static str },

    /// Species in one registry disagree on the reference pressure.
    #[error("{species}: reference pressure {found} Pa differs from {expected} Pa")]
    ReferencePressureMismatch {
        species: String,
        expected: f64,
        found: f64,
    },

    /// A binary interaction refers to a species index outside the composition.
    #[error("binary interaction {interaction}: species index {index} out of range for {count} species")]
    InteractionIndex {
        interaction: usize,
        index: usize,
        count: usize,
    },

    /// A binary interaction pairs a species with itself.
    #[error("binary interaction {interaction} pairs species {index} with itself")]
    SelfInteraction { interaction: usize, index: usize },

    /// A binary interaction names a species that carries a charge.
    #[error("binary interaction {interaction}: species {index} has charge {charge}, must be neutral")]
    ChargedInteraction {
        interaction: usize,
        index: usize,
        charge: f64,
    },

    /// A consumer needs a storage layer the standard-state manager does not keep.
    #[error("{context} requires {layer} storage")]
    StorageDisabled {
        context: &'static str,
        layer: &'static str,
    },
}

/// Errors that may occur when evaluating thermodynamic properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The property needs storage that this configuration does not keep.
    #[error("not supported in this mode: {context}")]
    Unsupported { context: String },

    /// A caller-provided buffer has the wrong length.
    #[error("{context}: buffer length {found}, expected {expected}")]
    Length {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// The provided state is invalid or inconsistent.
    #[error("invalid state: {context}")]
    InvalidState { context: String },

    /// A delegated reference-state source failed to produce properties.
    #[error("reference state source failed: {context}")]
    Source { context: String },

    /// A shared reference-state source was poisoned by a panicking holder.
    #[error("reference state source mutex poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for PropertyError {
    fn from(_: PoisonError<T>) -> Self {
        PropertyError::Poisoned
    }
}
