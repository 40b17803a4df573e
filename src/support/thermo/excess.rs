//! Composition-dependent excess properties.
//!
//! [`MargulesExcess`] evaluates activity coefficients and their temperature,
//! composition and state-path derivatives from a list of
//! [`BinaryInteraction`] records. Species indices refer to positions in a
//! caller-owned mole fraction vector.

mod interaction;
mod margules;

pub use interaction::BinaryInteraction;
pub use margules::MargulesExcess;
