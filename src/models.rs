//! Public Twine models.
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the actual computation lives. The [`twine_core::Model`] implementation
//! is a thin adapter that delegates to that core.

pub mod solution;
