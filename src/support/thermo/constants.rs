/// Physical constants injected into every model that dimensionalizes results.
///
/// The default is a kmol basis (J/kmol·K and C/kmol), so energies come out in
/// J/kmol and molar volumes are expected in m³/kmol.
/// Use [`PhysicalConstants::molar`] for a mol basis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalConstants {
    /// Universal gas constant.
    pub gas_constant: f64,
    /// Faraday constant.
    pub faraday: f64,
}

impl PhysicalConstants {
    /// Constants on a mol basis (J/mol·K, C/mol).
    #[must_use]
    pub fn molar() -> Self {
        Self {
            gas_constant: 8.314_462_618,
            faraday: 96_485.332_123_31,
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gas_constant: 8_314.462_618,
            faraday: 9.648_533_212_331e7,
        }
    }
}
