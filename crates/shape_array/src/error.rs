//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, capability mismatches between modifiers and shapes,
//! unknown handles, persistence failures, and generic errors.
use thiserror::Error;

use crate::modifier::ModifierId;
use crate::shape::{Capability, ShapeKind};

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("modifier '{modifier}' requires the {capability:?} capability")]
    MissingCapability {
        modifier: String,
        capability: Capability,
    },

    #[error("unknown modifier '{name}'")]
    UnknownModifier { name: String },

    #[error("modifier {0:?} is not attached")]
    ModifierNotFound(ModifierId),

    #[error("unknown generator")]
    UnknownGenerator,

    #[error("{kind:?} derives its element count from its parameters")]
    DerivedCount { kind: ShapeKind },

    #[error("shape parameters for {got:?} cannot be applied to a {expected:?} generator")]
    KindMismatch { expected: ShapeKind, got: ShapeKind },

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn missing_capability_names_modifier() {
        let err = Error::MissingCapability {
            modifier: "radial_noise".into(),
            capability: Capability::Radial,
        };
        assert_eq!(
            err.to_string(),
            "modifier 'radial_noise' requires the Radial capability"
        );
    }
}
