use crate::support::thermo::PropertyError;

/// Which cached property layers a standard-state manager exposes.
///
/// Both layers are always computed internally. A disabled layer only makes
/// its accessors return [`PropertyError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StorageConfig {
    /// Expose reference-pressure properties.
    pub reference_state: bool,
    /// Expose standard-state properties at the current pressure.
    pub standard_state: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reference_state: true,
            standard_state: true,
        }
    }
}

impl StorageConfig {
    pub(super) fn require_reference(self, accessor: &str) -> Result<(), PropertyError> {
        if self.reference_state {
            Ok(())
        } else {
            Err(PropertyError::Unsupported {
                context: format!("{accessor} without reference state storage"),
            })
        }
    }

    pub(super) fn require_standard(self, accessor: &str) -> Result<(), PropertyError> {
        if self.standard_state {
            Ok(())
        } else {
            Err(PropertyError::Unsupported {
                context: format!("{accessor} without standard state storage"),
            })
        }
    }
}
