//! Partial molar properties of a Margules solution.
//!
//! Combines a constant-volume standard state with a Margules excess model:
//!
//! ```text
//! mu_k  = RT·(g_ss/RT + ln X_k + ln γ_k)
//! h_k   = RT·h_ss/RT − R·T²·∂lnγ_k/∂T
//! s_k   = R·(s_ss/R − ln X_k − ln γ_k − T·∂lnγ_k/∂T)
//! cp_k  = R·(cp_ss/R − 2T·∂lnγ_k/∂T − T²·∂²lnγ_k/∂T²)
//! v_k   = V_ss + V_ex
//! ```
//!
//! `ln X_k` uses `max(X_k, 1e-300)` so absent species stay finite.

use uom::si::{
    electric_potential::volt,
    f64::{ElectricPotential, Pressure, ThermodynamicTemperature},
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{
    ConfigError, PropertyError, excess::MargulesExcess, standard_state::ConstVolStandardState,
};

/// Floor applied to mole fractions before taking logarithms.
pub const SMALL_MOLE_FRACTION: f64 = 1e-300;

/// Per-species partial molar properties and their mole-weighted mixture values.
///
/// Energies are in the basis of the solution's gas constant (J/kmol by default).
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionProperties {
    pub ln_activity_coefficients: Vec<f64>,
    pub chemical_potentials: Vec<f64>,
    pub electrochemical_potentials: Vec<f64>,
    pub partial_molar_enthalpies: Vec<f64>,
    pub partial_molar_entropies: Vec<f64>,
    pub partial_molar_cp: Vec<f64>,
    pub partial_molar_volumes: Vec<f64>,
    pub enthalpy_mole: f64,
    pub entropy_mole: f64,
    pub cp_mole: f64,
    pub gibbs_mole: f64,
    pub volume_mole: f64,
}

/// A condensed-phase solution of neutral or charged species.
#[derive(Debug, Clone)]
pub struct MargulesSolution {
    standard_state: ConstVolStandardState,
    excess: MargulesExcess,
    charges: Vec<f64>,
}

impl MargulesSolution {
    /// Pairs a standard-state manager with an excess model over the same species.
    ///
    /// All species start neutral.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SpeciesCount`] if the two disagree on the
    /// number of species, or [`ConfigError::StorageDisabled`] if the
    /// standard-state manager does not keep its standard-state layer.
    pub fn new(
        standard_state: ConstVolStandardState,
        excess: MargulesExcess,
    ) -> Result<Self, ConfigError> {
        if !standard_state.storage().standard_state {
            return Err(ConfigError::StorageDisabled {
                context: "Margules solution",
                layer: "standard state",
            });
        }
        let n = standard_state.len();
        if excess.n_species() != n {
            return Err(ConfigError::SpeciesCount {
                context: "excess model",
                expected: n,
                found: excess.n_species(),
            });
        }
        Ok(Self {
            standard_state,
            excess,
            charges: vec![0.0; n],
        })
    }

    /// Sets species charges, in elementary charges.
    ///
    /// Species named by a binary interaction must stay neutral.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SpeciesCount`] for a wrong number of charges, or
    /// [`ConfigError::ChargedInteraction`] for a charged interaction member.
    #[allow(clippy::float_cmp)]
    pub fn with_charges(mut self, charges: Vec<f64>) -> Result<Self, ConfigError> {
        if charges.len() != self.len() {
            return Err(ConfigError::SpeciesCount {
                context: "species charges",
                expected: self.len(),
                found: charges.len(),
            });
        }
        for (interaction, pair) in self.excess.interactions().iter().enumerate() {
            for index in [pair.species_a, pair.species_b] {
                let charge = charges[index];
                if charge != 0.0 {
                    return Err(ConfigError::ChargedInteraction {
                        interaction,
                        index,
                        charge,
                    });
                }
            }
        }
        self.charges = charges;
        Ok(self)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.standard_state.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.standard_state.is_empty()
    }

    #[must_use]
    pub fn standard_state(&self) -> &ConstVolStandardState {
        &self.standard_state
    }

    #[must_use]
    pub fn excess(&self) -> &MargulesExcess {
        &self.excess
    }

    /// Evaluates all partial molar properties at `(t, p, x)`.
    ///
    /// The standard-state cache only recomputes what changed since the
    /// previous call.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] if the state is invalid, `x` has the wrong
    /// length, or a reference-state source fails.
    pub fn evaluate(
        &mut self,
        t: ThermodynamicTemperature,
        p: Pressure,
        x: &[f64],
        phi: ElectricPotential,
    ) -> Result<SolutionProperties, PropertyError> {
        let n = self.len();
        self.standard_state.set_state(t, p)?;

        let mut g_ss = vec![0.0; n];
        let mut h_ss = vec![0.0; n];
        let mut s_ss = vec![0.0; n];
        let mut cp_ss = vec![0.0; n];
        let mut v_ss = vec![0.0; n];
        self.standard_state.gibbs_rt(&mut g_ss)?;
        self.standard_state.enthalpy_rt(&mut h_ss)?;
        self.standard_state.entropy_r(&mut s_ss)?;
        self.standard_state.cp_r(&mut cp_ss)?;
        self.standard_state.standard_volumes(&mut v_ss)?;

        let mut ln_gamma = vec![0.0; n];
        let mut dln_gamma_dt = vec![0.0; n];
        let mut d2ln_gamma_dt2 = vec![0.0; n];
        let mut volumes = vec![0.0; n];
        self.excess.ln_activity_coefficients(t, x, &mut ln_gamma)?;
        self.excess.dln_act_coeff_dt(t, x, &mut dln_gamma_dt)?;
        self.excess.d2ln_act_coeff_dt2(t, x, &mut d2ln_gamma_dt2)?;
        self.excess.partial_molar_volumes(t, x, &v_ss, &mut volumes)?;

        let r = self.standard_state.constants().gas_constant;
        let faraday = self.standard_state.constants().faraday;
        let t = t.get::<kelvin>();
        let rt = r * t;
        let phi = phi.get::<volt>();

        let mut props = SolutionProperties {
            ln_activity_coefficients: Vec::with_capacity(n),
            chemical_potentials: Vec::with_capacity(n),
            electrochemical_potentials: Vec::with_capacity(n),
            partial_molar_enthalpies: Vec::with_capacity(n),
            partial_molar_entropies: Vec::with_capacity(n),
            partial_molar_cp: Vec::with_capacity(n),
            partial_molar_volumes: volumes,
            enthalpy_mole: 0.0,
            entropy_mole: 0.0,
            cp_mole: 0.0,
            gibbs_mole: 0.0,
            volume_mole: 0.0,
        };

        for k in 0..n {
            let ln_x = x[k].max(SMALL_MOLE_FRACTION).ln();
            let mu = rt * (g_ss[k] + ln_x + ln_gamma[k]);

            props.ln_activity_coefficients.push(ln_gamma[k]);
            props.chemical_potentials.push(mu);
            props
                .electrochemical_potentials
                .push(mu + faraday * phi * self.charges[k]);
            props
                .partial_molar_enthalpies
                .push(rt * h_ss[k] - r * t * t * dln_gamma_dt[k]);
            props
                .partial_molar_entropies
                .push(r * (s_ss[k] - ln_gamma[k] - ln_x - t * dln_gamma_dt[k]));
            props.partial_molar_cp.push(
                r * (cp_ss[k] - 2.0 * t * dln_gamma_dt[k] - t * t * d2ln_gamma_dt2[k]),
            );
        }

        props.enthalpy_mole = mole_average(x, &props.partial_molar_enthalpies);
        props.entropy_mole = mole_average(x, &props.partial_molar_entropies);
        props.cp_mole = mole_average(x, &props.partial_molar_cp);
        props.gibbs_mole = mole_average(x, &props.chemical_potentials);
        props.volume_mole = mole_average(x, &props.partial_molar_volumes);

        Ok(props)
    }
}

fn mole_average(x: &[f64], values: &[f64]) -> f64 {
    x.iter().zip(values).map(|(xk, value)| xk * value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::pressure::pascal;

    use crate::support::thermo::{
        PhysicalConstants, T_REF,
        excess::BinaryInteraction,
        species::{CorrelationRecord, SpeciesThermo},
        standard_state::{StandardStateRecord, StorageConfig},
    };

    const P_REF: f64 = 101_325.0;

    fn salts() -> MargulesSolution {
        let constants = PhysicalConstants::default();
        let registry = SpeciesThermo::from_records(
            2,
            &[
                CorrelationRecord::piecewise_mu0(
                    "LiF(L)",
                    0,
                    -6.1e8,
                    &[(T_REF, -6.2e8), (700.0, -6.5e8), (1200.0, -7.1e8)],
                    P_REF,
                ),
                CorrelationRecord::piecewise_mu0(
                    "KCl(L)",
                    1,
                    -4.2e8,
                    &[(T_REF, -4.4e8), (700.0, -4.8e8), (1200.0, -5.4e8)],
                    P_REF,
                ),
            ],
            &constants,
        )
        .unwrap();
        let standard_state = ConstVolStandardState::new(
            registry,
            &[
                StandardStateRecord::constant_volume("LiF(L)", 0, 0.0138),
                StandardStateRecord::constant_volume("KCl(L)", 1, 0.0488),
            ],
            constants,
            StorageConfig::default(),
        )
        .unwrap();
        let excess = MargulesExcess::new(
            2,
            vec![
                BinaryInteraction::new(0, 1)
                    .with_enthalpy(-17_570e3, -377e3)
                    .with_entropy(-7.627e3, 4.958e3),
            ],
            constants,
        )
        .unwrap();
        MargulesSolution::new(standard_state, excess).unwrap()
    }

    fn evaluate(solution: &mut MargulesSolution, t: f64, x: &[f64]) -> SolutionProperties {
        solution
            .evaluate(
                ThermodynamicTemperature::new::<kelvin>(t),
                Pressure::new::<pascal>(P_REF),
                x,
                ElectricPotential::new::<volt>(0.0),
            )
            .unwrap()
    }

    #[test]
    fn chemical_potential_equals_h_minus_ts() {
        let mut solution = salts();
        let t = 900.0;
        let props = evaluate(&mut solution, t, &[0.4, 0.6]);

        for k in 0..2 {
            assert_relative_eq!(
                props.chemical_potentials[k],
                props.partial_molar_enthalpies[k] - t * props.partial_molar_entropies[k],
                max_relative = 1e-10
            );
        }
        assert_relative_eq!(
            props.gibbs_mole,
            props.enthalpy_mole - t * props.entropy_mole,
            max_relative = 1e-10
        );
    }

    #[test]
    fn activity_coefficients_match_molten_salt_scenario() {
        let mut solution = salts();
        let props = evaluate(&mut solution, 900.0, &[0.4, 0.6]);
        assert_relative_eq!(
            props.ln_activity_coefficients[0],
            -0.561_601_659_004_536_3,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            props.ln_activity_coefficients[1],
            -0.353_071_311_652_413_84,
            max_relative = 1e-12
        );
    }

    #[test]
    fn partial_enthalpy_is_temperature_derivative_of_mu_over_t() {
        // h_k = −T²·∂(mu_k/T)/∂T at constant composition.
        let mut solution = salts();
        let x = [0.3, 0.7];
        let (t, dt) = (850.0, 1e-3);

        let center = evaluate(&mut solution, t, &x);
        let up = evaluate(&mut solution, t + dt, &x);
        let down = evaluate(&mut solution, t - dt, &x);

        for k in 0..2 {
            let d_mu_over_t = (up.chemical_potentials[k] / (t + dt)
                - down.chemical_potentials[k] / (t - dt))
                / (2.0 * dt);
            assert_relative_eq!(
                center.partial_molar_enthalpies[k],
                -t * t * d_mu_over_t,
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn partial_cp_is_temperature_derivative_of_enthalpy() {
        let mut solution = salts();
        let x = [0.3, 0.7];
        let (t, dt) = (850.0, 1e-3);

        let center = evaluate(&mut solution, t, &x);
        let up = evaluate(&mut solution, t + dt, &x);
        let down = evaluate(&mut solution, t - dt, &x);

        for k in 0..2 {
            let expected = (up.partial_molar_enthalpies[k] - down.partial_molar_enthalpies[k])
                / (2.0 * dt);
            assert_relative_eq!(center.partial_molar_cp[k], expected, max_relative = 1e-5);
        }
    }

    #[test]
    fn absent_species_stays_finite() {
        let mut solution = salts();
        let props = evaluate(&mut solution, 900.0, &[1.0, 0.0]);
        assert!(props.chemical_potentials.iter().all(|mu| mu.is_finite()));
        assert!(props.partial_molar_entropies.iter().all(|s| s.is_finite()));
    }

    /// LiF–KCl with a dissolved Li+ ion that takes no part in the interaction.
    fn salts_with_ion() -> MargulesSolution {
        let constants = PhysicalConstants::default();
        let registry = SpeciesThermo::from_records(
            3,
            &[
                CorrelationRecord::piecewise_mu0(
                    "LiF(L)",
                    0,
                    -6.1e8,
                    &[(T_REF, -6.2e8), (700.0, -6.5e8), (1200.0, -7.1e8)],
                    P_REF,
                ),
                CorrelationRecord::piecewise_mu0(
                    "KCl(L)",
                    1,
                    -4.2e8,
                    &[(T_REF, -4.4e8), (700.0, -4.8e8), (1200.0, -5.4e8)],
                    P_REF,
                ),
                CorrelationRecord::piecewise_mu0(
                    "Li+",
                    2,
                    -2.8e8,
                    &[(T_REF, -2.9e8), (700.0, -3.1e8), (1200.0, -3.4e8)],
                    P_REF,
                ),
            ],
            &constants,
        )
        .unwrap();
        let standard_state = ConstVolStandardState::new(
            registry,
            &[
                StandardStateRecord::constant_volume("LiF(L)", 0, 0.0138),
                StandardStateRecord::constant_volume("KCl(L)", 1, 0.0488),
                StandardStateRecord::constant_volume("Li+", 2, 0.0100),
            ],
            constants,
            StorageConfig::default(),
        )
        .unwrap();
        let excess = MargulesExcess::new(
            3,
            vec![
                BinaryInteraction::new(0, 1)
                    .with_enthalpy(-17_570e3, -377e3)
                    .with_entropy(-7.627e3, 4.958e3),
            ],
            constants,
        )
        .unwrap();
        MargulesSolution::new(standard_state, excess).unwrap()
    }

    #[test]
    fn electrochemical_potential_adds_charge_term() {
        let constants = PhysicalConstants::default();
        let mut solution = salts_with_ion().with_charges(vec![0.0, 0.0, 1.0]).unwrap();
        let props = solution
            .evaluate(
                ThermodynamicTemperature::new::<kelvin>(900.0),
                Pressure::new::<pascal>(P_REF),
                &[0.45, 0.45, 0.1],
                ElectricPotential::new::<volt>(0.2),
            )
            .unwrap();

        assert_relative_eq!(
            props.electrochemical_potentials[2] - props.chemical_potentials[2],
            constants.faraday * 0.2,
            max_relative = 1e-6
        );
        for k in 0..2 {
            assert_eq!(
                props.electrochemical_potentials[k],
                props.chemical_potentials[k]
            );
        }
    }

    #[test]
    fn rejects_charged_interaction_members() {
        let error = salts_with_ion().with_charges(vec![0.0, -1.0, 1.0]).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::ChargedInteraction {
                interaction: 0,
                index: 1,
                ..
            }
        ));

        let error = salts().with_charges(vec![1.0, 0.0]).unwrap_err();
        assert!(matches!(error, ConfigError::ChargedInteraction { index: 0, .. }));
    }

    #[test]
    fn rejects_standard_state_without_standard_storage() {
        let solution = salts();
        let registry = solution.standard_state().registry().clone();
        let standard_state = ConstVolStandardState::new(
            registry,
            &[
                StandardStateRecord::constant_volume("LiF(L)", 0, 0.0138),
                StandardStateRecord::constant_volume("KCl(L)", 1, 0.0488),
            ],
            PhysicalConstants::default(),
            StorageConfig {
                reference_state: true,
                standard_state: false,
            },
        )
        .unwrap();

        let error =
            MargulesSolution::new(standard_state, solution.excess().clone()).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::StorageDisabled {
                layer: "standard state",
                ..
            }
        ));
    }

    #[test]
    fn rejects_mismatched_species_counts() {
        let solution = salts();
        let excess = MargulesExcess::new(3, Vec::new(), PhysicalConstants::default()).unwrap();
        let error =
            MargulesSolution::new(solution.standard_state().clone(), excess).unwrap_err();
        assert!(matches!(
            error,
            ConfigError::SpeciesCount {
                expected: 2,
                found: 3,
                ..
            }
        ));

        let error = salts().with_charges(vec![0.0]).unwrap_err();
        assert!(matches!(error, ConfigError::SpeciesCount { found: 1, .. }));
    }
}
