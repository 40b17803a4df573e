use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::kelvin};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{ConfigError, PhysicalConstants, PropertyError, check_len},
};

use super::BinaryInteraction;

/// Multicomponent Margules excess Gibbs energy model for neutral species.
///
/// The excess Gibbs energy is a sum over binary interactions,
/// `G_ex/RT = Σ X_A·X_B·(g0 + g1·X_B)`, with `g0` and `g1` linear in
/// temperature through their enthalpy and entropy coefficients.
///
/// Every species receives a contribution from every interaction, including
/// species that are not a member of the pair. Sums run in interaction
/// insertion order, so identical inputs reproduce bit-identical results.
/// Mole fractions are used as given; the model does not normalize them.
#[derive(Debug, Clone)]
pub struct MargulesExcess {
    n_species: usize,
    interactions: Vec<BinaryInteraction>,
    constants: PhysicalConstants,
}

/// Position of species `k` relative to one interaction.
#[derive(Debug, Clone, Copy)]
struct Term {
    delta_a: f64,
    delta_b: f64,
    xa: f64,
    xb: f64,
}

impl Term {
    fn new(k: usize, interaction: &BinaryInteraction, x: &[f64]) -> Self {
        Self {
            delta_a: kronecker(k, interaction.species_a),
            delta_b: kronecker(k, interaction.species_b),
            xa: x[interaction.species_a],
            xb: x[interaction.species_b],
        }
    }

    /// Contribution to the partial molar quantity of species `k`.
    fn value(self, g0: f64, g1: f64) -> f64 {
        let Self {
            delta_a,
            delta_b,
            xa,
            xb,
        } = self;
        (delta_a * xb + xa * delta_b - xa * xb) * (g0 + g1 * xb) + xa * xb * (delta_b - xb) * g1
    }

    /// `∂value/∂X_A` and `∂value/∂X_B`.
    fn gradient(self, g0: f64, g1: f64) -> (f64, f64) {
        let Self {
            delta_a,
            delta_b,
            xa,
            xb,
        } = self;
        let slope = g0 + 2.0 * g1 * xb;
        (
            (delta_b - xb) * slope,
            (delta_a - xa) * slope + (delta_b - xb) * 2.0 * g1 * xa,
        )
    }
}

fn kronecker(i: usize, j: usize) -> f64 {
    if i == j { 1.0 } else { 0.0 }
}

impl MargulesExcess {
    /// Creates a model over `n_species` species.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an interaction refers to a species outside
    /// `0..n_species`, pairs a species with itself, or has a non-finite
    /// coefficient.
    pub fn new(
        n_species: usize,
        interactions: Vec<BinaryInteraction>,
        constants: PhysicalConstants,
    ) -> Result<Self, ConfigError> {
        let mut model = Self {
            n_species,
            interactions: Vec::with_capacity(interactions.len()),
            constants,
        };
        for interaction in interactions {
            model.add_interaction(interaction)?;
        }

        tracing::debug!(
            species = n_species,
            interactions = model.interactions.len(),
            "built Margules excess model"
        );

        Ok(model)
    }

    /// Appends an interaction; it is evaluated after all existing ones.
    ///
    /// # Errors
    ///
    /// See [`MargulesExcess::new`].
    pub fn add_interaction(&mut self, interaction: BinaryInteraction) -> Result<(), ConfigError> {
        let id = self.interactions.len();
        for index in [interaction.species_a, interaction.species_b] {
            if index >= self.n_species {
                return Err(ConfigError::InteractionIndex {
                    interaction: id,
                    index,
                    count: self.n_species,
                });
            }
        }
        if interaction.species_a == interaction.species_b {
            return Err(ConfigError::SelfInteraction {
                interaction: id,
                index: interaction.species_a,
            });
        }
        if let Some((parameter, value)) = interaction
            .parameters()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ConfigError::InvalidParameter {
                species: format!("binary interaction {id}"),
                parameter,
                value,
            });
        }

        self.interactions.push(interaction);
        Ok(())
    }

    #[must_use]
    pub fn n_species(&self) -> usize {
        self.n_species
    }

    #[must_use]
    pub fn interactions(&self) -> &[BinaryInteraction] {
        &self.interactions
    }

    /// Excess Gibbs energy of the mixture, `G_ex/RT`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidState`] for a non-positive temperature
    /// and [`PropertyError::Length`] for a wrongly sized composition.
    pub fn excess_gibbs_rt(&self, t: ThermodynamicTemperature, x: &[f64]) -> Result<f64, PropertyError> {
        let t = self.check_inputs(t, x)?;
        let rt = self.constants.gas_constant * t;
        Ok(self
            .interactions
            .iter()
            .map(|interaction| {
                let (g0, g1) = interaction.gibbs_rt(t, rt);
                let (xa, xb) = (x[interaction.species_a], x[interaction.species_b]);
                xa * xb * (g0 + g1 * xb)
            })
            .sum())
    }

    /// Natural log of the activity coefficient of every species.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidState`] for a non-positive temperature
    /// and [`PropertyError::Length`] for a wrongly sized buffer. The other
    /// per-species evaluators fail the same way.
    pub fn ln_activity_coefficients(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("ln activity coefficients", out, self.n_species)?;

        let rt = self.constants.gas_constant * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt(t, rt));
        self.accumulate(x, &coefficients, out, |value| value);
        Ok(())
    }

    /// Activity coefficients `γ_k`.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn activity_coefficients(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        self.ln_activity_coefficients(t, x, out)?;
        out.iter_mut().for_each(|value| *value = value.exp());
        Ok(())
    }

    /// `∂lnγ_k/∂T` at constant composition.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn dln_act_coeff_dt(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("dln activity coefficients dT", out, self.n_species)?;

        let rtt = self.constants.gas_constant * t * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt_dt(rtt));
        self.accumulate(x, &coefficients, out, |value| value);
        Ok(())
    }

    /// `∂²lnγ_k/∂T²` at constant composition.
    ///
    /// `g0` and `g1` are `a/T + b`, so every first-derivative term scales to
    /// its second derivative by `−2/T`.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn d2ln_act_coeff_dt2(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("d2ln activity coefficients dT2", out, self.n_species)?;

        let rtt = self.constants.gas_constant * t * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt_dt(rtt));
        self.accumulate(x, &coefficients, out, |value| -2.0 * value / t);
        Ok(())
    }

    /// Diagonal `∂lnγ_k/∂ln n_k`, other mole numbers held fixed.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn dln_act_coeff_dln_n_diag(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("dln activity coefficients dln n diagonal", out, self.n_species)?;

        let rt = self.constants.gas_constant * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt(t, rt));

        for (k, value) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (interaction, &(g0, g1)) in self.interactions.iter().zip(&coefficients) {
                let Term {
                    delta_a,
                    delta_b,
                    xa,
                    xb,
                } = Term::new(k, interaction, x);
                let (da, db) = (delta_a - xa, delta_b - xb);
                sum += 2.0 * db * (g0 * da + g1 * (2.0 * da * xb + xa * db));
            }
            *value = x[k] * sum;
        }
        Ok(())
    }

    /// Diagonal `∂lnγ_k/∂ln X_k`, other mole fractions held fixed.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn dln_act_coeff_dln_x_diag(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("dln activity coefficients dln x diagonal", out, self.n_species)?;

        let rt = self.constants.gas_constant * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt(t, rt));

        for (k, value) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (interaction, &(g0, g1)) in self.interactions.iter().zip(&coefficients) {
                let term = Term::new(k, interaction, x);
                let (d_xa, d_xb) = term.gradient(g0, g1);
                sum += term.delta_a * d_xa + term.delta_b * d_xb;
            }
            *value = x[k] * sum;
        }
        Ok(())
    }

    /// Full Jacobian `∂lnγ_k/∂ln n_m`, written row-major as `out[k·n + m]`.
    ///
    /// Each row sums to zero and `Σ_k X_k·J[k][m] = 0` when the mole
    /// fractions sum to one.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients);
    /// `out` must hold `n²` entries.
    pub fn dln_act_coeff_dln_n(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        let n = self.n_species;
        check_len("dln activity coefficients dln n", out, n * n)?;

        let rt = self.constants.gas_constant * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt(t, rt));

        for (k, row) in out.chunks_exact_mut(n).enumerate() {
            for (m, value) in row.iter_mut().enumerate() {
                let mut sum = 0.0;
                for (interaction, &(g0, g1)) in self.interactions.iter().zip(&coefficients) {
                    let at_k = Term::new(k, interaction, x);
                    let at_m = Term::new(m, interaction, x);
                    let (xa, xb) = (at_k.xa, at_k.xb);
                    let (dak, dbk) = (at_k.delta_a - xa, at_k.delta_b - xb);
                    let (dam, dbm) = (at_m.delta_a - xa, at_m.delta_b - xb);

                    sum += g0 * (dam * dbk + dak * dbm);
                    sum += 2.0 * g1 * (dam * dbk * xb + dak * dbm * xb + dbm * dbk * xa);
                }
                *value = x[m] * sum;
            }
        }
        Ok(())
    }

    /// Derivative of `lnγ_k` along a state path `s`.
    ///
    /// `dt_ds` is the temperature slope in K per unit `s` and `dx_ds` the
    /// mole-fraction slopes.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients);
    /// `dx_ds` must hold one entry per species.
    pub fn dln_act_coeff_ds(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        dt_ds: f64,
        dx_ds: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        self.dln_act_coeff_dt(t, x, out)?;
        check_len("mole fraction slopes", dx_ds, self.n_species)?;

        let t = t.get::<kelvin>();
        let rt = self.constants.gas_constant * t;
        let coefficients = self.coefficients(|interaction| interaction.gibbs_rt(t, rt));

        for (k, value) in out.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (interaction, &(g0, g1)) in self.interactions.iter().zip(&coefficients) {
                let (d_xa, d_xb) = Term::new(k, interaction, x).gradient(g0, g1);
                sum += d_xa * dx_ds[interaction.species_a] + d_xb * dx_ds[interaction.species_b];
            }
            *value = sum + *value * dt_ds;
        }
        Ok(())
    }

    /// Excess partial molar volumes, from the volumetric coefficients.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients).
    pub fn excess_volumes(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        let t = self.check_inputs(t, x)?;
        check_len("excess volumes", out, self.n_species)?;

        let coefficients = self.coefficients(|interaction| interaction.volume(t));
        self.accumulate(x, &coefficients, out, |value| value);
        Ok(())
    }

    /// Partial molar volumes, `standard_volumes` plus the excess term.
    ///
    /// # Errors
    ///
    /// See [`ln_activity_coefficients`](Self::ln_activity_coefficients);
    /// `standard_volumes` must hold one entry per species.
    pub fn partial_molar_volumes(
        &self,
        t: ThermodynamicTemperature,
        x: &[f64],
        standard_volumes: &[f64],
        out: &mut [f64],
    ) -> Result<(), PropertyError> {
        check_len("standard volumes", standard_volumes, self.n_species)?;
        self.excess_volumes(t, x, out)?;
        for (volume, standard) in out.iter_mut().zip(standard_volumes) {
            *volume += standard;
        }
        Ok(())
    }

    fn check_inputs(&self, t: ThermodynamicTemperature, x: &[f64]) -> Result<f64, PropertyError> {
        let t = t.get::<kelvin>();
        if StrictlyPositive::check(&t).is_err() || !t.is_finite() {
            return Err(PropertyError::InvalidState {
                context: format!("temperature must be positive and finite, got {t} K"),
            });
        }
        check_len("mole fractions", x, self.n_species)?;
        Ok(t)
    }

    fn coefficients(&self, f: impl Fn(&BinaryInteraction) -> (f64, f64)) -> Vec<(f64, f64)> {
        self.interactions.iter().map(f).collect()
    }

    /// Writes `Σ_i scale(term_i)` for every species into `out`.
    fn accumulate(
        &self,
        x: &[f64],
        coefficients: &[(f64, f64)],
        out: &mut [f64],
        scale: impl Fn(f64) -> f64,
    ) {
        for (k, value) in out.iter_mut().enumerate() {
            *value = 0.0;
            for (interaction, &(g0, g1)) in self.interactions.iter().zip(coefficients) {
                *value += scale(Term::new(k, interaction, x).value(g0, g1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const T: f64 = 900.0;

    fn kelvin_t(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(value)
    }

    fn lif_kcl() -> BinaryInteraction {
        BinaryInteraction::new(0, 1)
            .with_enthalpy(-17_570e3, -377e3)
            .with_entropy(-7.627e3, 4.958e3)
    }

    fn binary() -> MargulesExcess {
        MargulesExcess::new(2, vec![lif_kcl()], PhysicalConstants::default()).unwrap()
    }

    fn ternary() -> MargulesExcess {
        MargulesExcess::new(
            3,
            vec![
                lif_kcl(),
                BinaryInteraction::new(2, 1)
                    .with_enthalpy(4.2e6, -1.1e6)
                    .with_entropy(1.5e3, -0.8e3)
                    .with_volume_enthalpy(1.0e-3, -4.0e-4)
                    .with_volume_entropy(2.0e-7, 1.0e-7),
            ],
            PhysicalConstants::default(),
        )
        .unwrap()
    }

    fn ln_gamma(model: &MargulesExcess, t: f64, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; model.n_species()];
        model
            .ln_activity_coefficients(kelvin_t(t), x, &mut out)
            .unwrap();
        out
    }

    #[test]
    fn molten_salt_scenario() {
        let ln = ln_gamma(&binary(), T, &[0.4, 0.6]);
        assert_relative_eq!(ln[0], -0.561_601_659_004_536_3, max_relative = 1e-12);
        assert_relative_eq!(ln[1], -0.353_071_311_652_413_84, max_relative = 1e-12);
    }

    #[test]
    fn reduces_to_two_parameter_margules_at_equimolar() {
        let model = binary();
        let rt = PhysicalConstants::default().gas_constant * T;
        let (g0, g1) = model.interactions()[0].gibbs_rt(T, rt);

        let ln = ln_gamma(&model, T, &[0.5, 0.5]);
        assert_relative_eq!(ln[0], 0.25 * g0, max_relative = 1e-12);
        assert_relative_eq!(ln[1], 0.25 * (g0 + g1), max_relative = 1e-12);
    }

    #[test]
    fn activity_coefficients_exponentiate() {
        let model = binary();
        let mut gamma = [0.0; 2];
        model
            .activity_coefficients(kelvin_t(T), &[0.4, 0.6], &mut gamma)
            .unwrap();
        assert_relative_eq!(gamma[0], (-0.561_601_659_004_536_3_f64).exp(), max_relative = 1e-12);
    }

    #[test]
    fn mole_weighted_sum_is_excess_gibbs() {
        let model = ternary();
        let x = [0.2, 0.5, 0.3];
        let ln = ln_gamma(&model, T, &x);
        let weighted: f64 = ln.iter().zip(&x).map(|(l, xi)| l * xi).sum();
        assert_relative_eq!(
            weighted,
            model.excess_gibbs_rt(kelvin_t(T), &x).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn ideal_interaction_has_unit_activity() {
        let model =
            MargulesExcess::new(2, vec![BinaryInteraction::new(0, 1)], PhysicalConstants::default())
                .unwrap();
        assert_eq!(ln_gamma(&model, T, &[0.3, 0.7]), vec![0.0, 0.0]);
    }

    #[test]
    fn temperature_derivatives_match_finite_differences() {
        let model = ternary();
        let x = [0.2, 0.5, 0.3];
        let h = 1e-3;

        let mut d1 = [0.0; 3];
        let mut d2 = [0.0; 3];
        model.dln_act_coeff_dt(kelvin_t(T), &x, &mut d1).unwrap();
        model.d2ln_act_coeff_dt2(kelvin_t(T), &x, &mut d2).unwrap();

        let up = ln_gamma(&model, T + h, &x);
        let down = ln_gamma(&model, T - h, &x);
        let mut d1_up = [0.0; 3];
        let mut d1_down = [0.0; 3];
        model.dln_act_coeff_dt(kelvin_t(T + h), &x, &mut d1_up).unwrap();
        model.dln_act_coeff_dt(kelvin_t(T - h), &x, &mut d1_down).unwrap();

        for k in 0..3 {
            assert_relative_eq!(d1[k], (up[k] - down[k]) / (2.0 * h), max_relative = 1e-6);
            assert_relative_eq!(d2[k], (d1_up[k] - d1_down[k]) / (2.0 * h), max_relative = 1e-6);
        }
    }

    #[test]
    fn mole_number_jacobian_matches_finite_differences() {
        let model = ternary();
        let moles = [0.7, 1.9, 1.1];
        let fractions = |n: &[f64]| {
            let total: f64 = n.iter().sum();
            n.iter().map(|ni| ni / total).collect::<Vec<_>>()
        };
        let x = fractions(&moles);

        let mut jacobian = [0.0; 9];
        model.dln_act_coeff_dln_n(kelvin_t(T), &x, &mut jacobian).unwrap();

        let h = 1e-6;
        for m in 0..3 {
            let mut up = moles;
            let mut down = moles;
            up[m] *= 1.0 + h;
            down[m] *= 1.0 - h;
            let ln_up = ln_gamma(&model, T, &fractions(&up));
            let ln_down = ln_gamma(&model, T, &fractions(&down));
            for k in 0..3 {
                let expected = (ln_up[k] - ln_down[k]) / (2.0 * h);
                assert_relative_eq!(jacobian[3 * k + m], expected, epsilon = 1e-7, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn jacobian_diagonal_matches_diag_evaluator() {
        let model = ternary();
        let x = [0.15, 0.45, 0.4];
        let mut jacobian = [0.0; 9];
        let mut diag = [0.0; 3];
        model.dln_act_coeff_dln_n(kelvin_t(T), &x, &mut jacobian).unwrap();
        model.dln_act_coeff_dln_n_diag(kelvin_t(T), &x, &mut diag).unwrap();

        for k in 0..3 {
            assert_relative_eq!(jacobian[4 * k], diag[k], max_relative = 1e-12);
        }
    }

    #[test]
    fn mole_fraction_diagonal_matches_finite_differences() {
        let model = ternary();
        let x = [0.2, 0.5, 0.3];
        let mut diag = [0.0; 3];
        model.dln_act_coeff_dln_x_diag(kelvin_t(T), &x, &mut diag).unwrap();

        let h = 1e-6;
        for k in 0..3 {
            let mut up = x;
            let mut down = x;
            up[k] *= 1.0 + h;
            down[k] *= 1.0 - h;
            let expected = (ln_gamma(&model, T, &up)[k] - ln_gamma(&model, T, &down)[k]) / (2.0 * h);
            assert_relative_eq!(diag[k], expected, epsilon = 1e-7, max_relative = 1e-6);
        }
    }

    #[test]
    fn path_derivative_matches_finite_differences() {
        let model = ternary();
        let x = [0.2, 0.5, 0.3];
        let dx_ds = [0.1, -0.3, 0.2];
        let dt_ds = 40.0;

        let mut ds = [0.0; 3];
        model
            .dln_act_coeff_ds(kelvin_t(T), &x, dt_ds, &dx_ds, &mut ds)
            .unwrap();

        let h = 1e-6;
        let shifted = |sign: f64| {
            let xs: Vec<f64> = x.iter().zip(&dx_ds).map(|(xi, d)| xi + sign * h * d).collect();
            ln_gamma(&model, T + sign * h * dt_ds, &xs)
        };
        let (up, down) = (shifted(1.0), shifted(-1.0));
        for k in 0..3 {
            assert_relative_eq!(ds[k], (up[k] - down[k]) / (2.0 * h), epsilon = 1e-7, max_relative = 1e-6);
        }
    }

    #[test]
    fn partial_volumes_add_excess_to_standard() {
        let model = ternary();
        let x = [0.2, 0.5, 0.3];
        let standard = [0.0276, 0.0377, 0.0181];

        let mut volumes = [0.0; 3];
        model
            .partial_molar_volumes(kelvin_t(T), &x, &standard, &mut volumes)
            .unwrap();

        // Only the (2, 1) pair carries volumetric coefficients.
        let (g0, g1) = model.interactions()[1].volume(T);
        let (xa, xb) = (x[2], x[1]);
        let total_excess = xa * xb * (g0 + g1 * xb);
        let weighted: f64 = volumes
            .iter()
            .zip(&standard)
            .zip(&x)
            .map(|((v, v0), xi)| xi * (v - v0))
            .sum();
        assert_relative_eq!(weighted, total_excess, max_relative = 1e-10);

        let binary_volumes = {
            let mut out = [0.0; 2];
            binary()
                .partial_molar_volumes(kelvin_t(T), &[0.4, 0.6], &standard[..2], &mut out)
                .unwrap();
            out
        };
        assert_eq!(binary_volumes, [0.0276, 0.0377]);
    }

    #[test]
    fn rejects_bad_interactions() {
        let constants = PhysicalConstants::default();

        let error =
            MargulesExcess::new(2, vec![BinaryInteraction::new(0, 2)], constants).unwrap_err();
        assert_eq!(
            error,
            ConfigError::InteractionIndex {
                interaction: 0,
                index: 2,
                count: 2
            }
        );

        let error = MargulesExcess::new(
            2,
            vec![lif_kcl(), BinaryInteraction::new(1, 1)],
            constants,
        )
        .unwrap_err();
        assert_eq!(error, ConfigError::SelfInteraction { interaction: 1, index: 1 });

        let error = MargulesExcess::new(
            2,
            vec![BinaryInteraction::new(0, 1).with_entropy(f64::NAN, 0.0)],
            constants,
        )
        .unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidParameter {
                parameter: "excess entropy b",
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_inputs() {
        let model = binary();
        let mut out = [0.0; 2];

        assert!(matches!(
            model.ln_activity_coefficients(kelvin_t(0.0), &[0.5, 0.5], &mut out),
            Err(PropertyError::InvalidState { .. })
        ));
        assert!(matches!(
            model.ln_activity_coefficients(kelvin_t(T), &[1.0], &mut out),
            Err(PropertyError::Length { expected: 2, found: 1, .. })
        ));

        let mut square = [0.0; 3];
        assert!(matches!(
            model.dln_act_coeff_dln_n(kelvin_t(T), &[0.5, 0.5], &mut square),
            Err(PropertyError::Length { expected: 4, found: 3, .. })
        ));
    }

    proptest! {
        #[test]
        fn jacobian_is_gibbs_duhem_consistent(
            weights in prop::array::uniform3(0.01_f64..1.0),
            t in 500.0_f64..1500.0,
        ) {
            let model = ternary();
            let total: f64 = weights.iter().sum();
            let x: Vec<f64> = weights.iter().map(|w| w / total).collect();

            let mut jacobian = [0.0; 9];
            model.dln_act_coeff_dln_n(kelvin_t(t), &x, &mut jacobian).unwrap();

            for k in 0..3 {
                let row: f64 = jacobian[3 * k..3 * k + 3].iter().sum();
                prop_assert!(row.abs() < 1e-9, "row {k} sums to {row}");
            }
            for m in 0..3 {
                let column: f64 = (0..3).map(|k| x[k] * jacobian[3 * k + m]).sum();
                prop_assert!(column.abs() < 1e-9, "column {m} weighted sum is {column}");
            }
        }

        #[test]
        fn second_derivative_scales_first(
            weights in prop::array::uniform3(0.01_f64..1.0),
            t in 500.0_f64..1500.0,
        ) {
            let model = ternary();
            let total: f64 = weights.iter().sum();
            let x: Vec<f64> = weights.iter().map(|w| w / total).collect();

            let mut d1 = [0.0; 3];
            let mut d2 = [0.0; 3];
            model.dln_act_coeff_dt(kelvin_t(t), &x, &mut d1).unwrap();
            model.d2ln_act_coeff_dt2(kelvin_t(t), &x, &mut d2).unwrap();
            for k in 0..3 {
                prop_assert!((d2[k] + 2.0 * d1[k] / t).abs() <= 1e-15);
            }
        }
    }
}
