use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::ConfigError,
};

/// Pressure-dependent standard-state formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardStateModel {
    /// Incompressible species with a constant molar volume.
    ConstantVolume,
}

impl StandardStateModel {
    /// Parses a loader model tag for `species`.
    ///
    /// `"constant_incompressible"` and `"constantVolume"` are synonyms.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownStandardStateModel`] naming the species
    /// and the unrecognized tag.
    pub fn from_name(name: &str, species: &str) -> Result<Self, ConfigError> {
        match name {
            "constant_incompressible" | "constantVolume" => Ok(Self::ConstantVolume),
            _ => Err(ConfigError::UnknownStandardStateModel {
                species: species.to_string(),
                model: name.to_string(),
            }),
        }
    }

    /// Canonical tag of this model.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ConstantVolume => "constant_incompressible",
        }
    }
}

/// Standard-state parameters for one species, as produced by a loader.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardStateRecord {
    pub species: String,
    pub index: usize,
    /// Model tag, see [`StandardStateModel::from_name`].
    pub model: String,
    /// Molar volume in m³ per amount of the gas constant's basis (m³/kmol by default).
    pub molar_volume: f64,
}

impl StandardStateRecord {
    #[must_use]
    pub fn constant_volume(species: impl Into<String>, index: usize, molar_volume: f64) -> Self {
        Self {
            species: species.into(),
            index,
            model: StandardStateModel::ConstantVolume.name().to_string(),
            molar_volume,
        }
    }

    /// Checks the model tag and the molar volume.
    pub(super) fn validate(&self) -> Result<StandardStateModel, ConfigError> {
        let model = StandardStateModel::from_name(&self.model, &self.species)?;
        if StrictlyPositive::check(&self.molar_volume).is_err() {
            return Err(ConfigError::InvalidParameter {
                species: self.species.clone(),
                parameter: "molar volume",
                value: self.molar_volume,
            });
        }
        Ok(model)
    }
}
