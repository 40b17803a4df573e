//! Numeric constraints checked when property data is loaded.
//!
//! Thermodynamic parameter records arrive from an external loader as plain
//! numbers. The markers in this module let constructors state which values must
//! be physically meaningful (a strictly positive molar volume or reference
//! pressure, a mole fraction inside `[0, 1]`) and reject the rest up front,
//! so property evaluation never has to re-check them.
//!
//! # Provided constraints
//!
//! - [`StrictlyPositive`]: Greater than zero
//! - [`UnitInterval`]: Closed unit interval `0 ≤ x ≤ 1`
//!
//! Each marker is used with the generic [`Constrained<T, C>`] wrapper, or
//! directly through [`Constraint::check`] when only validation is needed.

mod strictly_positive;
mod unit_interval;

use std::marker::PhantomData;

use thiserror::Error;

pub use strictly_positive::StrictlyPositive;
pub use unit_interval::UnitInterval;

/// A numeric invariant that a loaded or user-supplied value must satisfy.
pub trait Constraint<T> {
    /// Checks `value` against the invariant.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing how `value` falls outside it.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// How a value violated a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("is negative")]
    Negative,
    #[error("is zero")]
    Zero,
    #[error("is NaN")]
    NotANumber,
    #[error("is below the lower bound")]
    BelowMinimum,
    #[error("is above the upper bound")]
    AboveMaximum,
}

/// A value that passed its [`Constraint`] when it was wrapped.
///
/// ```
/// use twine_solution_thermo::support::constraint::{Constrained, StrictlyPositive};
///
/// let molar_volume = Constrained::<f64, StrictlyPositive>::new(0.0276).unwrap();
/// assert_eq!(molar_volume.get(), 0.0276);
/// assert!(Constrained::<f64, StrictlyPositive>::new(-0.0276).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Wraps `value` after checking it against `C`.
    ///
    /// # Errors
    ///
    /// Returns the violation reported by `C`.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Unwraps the checked value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, C: Constraint<T>> Constrained<T, C> {
    /// Copies out the checked value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
