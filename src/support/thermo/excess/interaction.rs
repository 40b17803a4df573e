/// Margules parameters for one binary pair of neutral species.
///
/// Each pair of coefficients is `[b, c]`, the constant and `X_B`-linear terms
/// of the excess expansion `X_A·X_B·(g0 + g1·X_B)`. Energy coefficients are
/// dimensional (J/kmol and J/kmol·K by default); volumetric coefficients are
/// in m³/kmol and m³/kmol·K.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryInteraction {
    pub species_a: usize,
    pub species_b: usize,
    pub excess_enthalpy: [f64; 2],
    pub excess_entropy: [f64; 2],
    pub excess_volume_enthalpy: [f64; 2],
    pub excess_volume_entropy: [f64; 2],
}

impl BinaryInteraction {
    /// An ideal interaction between `species_a` and `species_b`.
    #[must_use]
    pub fn new(species_a: usize, species_b: usize) -> Self {
        Self {
            species_a,
            species_b,
            excess_enthalpy: [0.0; 2],
            excess_entropy: [0.0; 2],
            excess_volume_enthalpy: [0.0; 2],
            excess_volume_entropy: [0.0; 2],
        }
    }

    #[must_use]
    pub fn with_enthalpy(mut self, b: f64, c: f64) -> Self {
        self.excess_enthalpy = [b, c];
        self
    }

    #[must_use]
    pub fn with_entropy(mut self, b: f64, c: f64) -> Self {
        self.excess_entropy = [b, c];
        self
    }

    #[must_use]
    pub fn with_volume_enthalpy(mut self, b: f64, c: f64) -> Self {
        self.excess_volume_enthalpy = [b, c];
        self
    }

    #[must_use]
    pub fn with_volume_entropy(mut self, b: f64, c: f64) -> Self {
        self.excess_volume_entropy = [b, c];
        self
    }

    /// Nondimensional `(g0, g1) = ((H − T·S)/RT)` for the `b` and `c` terms.
    pub(super) fn gibbs_rt(&self, t: f64, rt: f64) -> (f64, f64) {
        let [hb, hc] = self.excess_enthalpy;
        let [sb, sc] = self.excess_entropy;
        ((hb - t * sb) / rt, (hc - t * sc) / rt)
    }

    /// Temperature derivatives of [`gibbs_rt`](Self::gibbs_rt), `−H/(R·T²)`.
    pub(super) fn gibbs_rt_dt(&self, rtt: f64) -> (f64, f64) {
        let [hb, hc] = self.excess_enthalpy;
        (-hb / rtt, -hc / rtt)
    }

    /// Dimensional volumetric `(g0, g1) = (VH − T·VS)`.
    pub(super) fn volume(&self, t: f64) -> (f64, f64) {
        let [vhb, vhc] = self.excess_volume_enthalpy;
        let [vsb, vsc] = self.excess_volume_entropy;
        (vhb - t * vsb, vhc - t * vsc)
    }

    pub(super) fn parameters(&self) -> [(&'static str, f64); 8] {
        [
            ("excess enthalpy b", self.excess_enthalpy[0]),
            ("excess enthalpy c", self.excess_enthalpy[1]),
            ("excess entropy b", self.excess_entropy[0]),
            ("excess entropy c", self.excess_entropy[1]),
            ("excess volume enthalpy b", self.excess_volume_enthalpy[0]),
            ("excess volume enthalpy c", self.excess_volume_enthalpy[1]),
            ("excess volume entropy b", self.excess_volume_entropy[0]),
            ("excess volume entropy c", self.excess_volume_entropy[1]),
        ]
    }
}
