use thiserror::Error;

use crate::species::Species;

/// Errors raised by the physics components on invalid input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("invalid altitude grid: {0}")]
    InvalidGrid(String),
    #[error("molar mass must be strictly positive, got {0} amu")]
    InvalidMass(f64),
    #[error("heating efficiency must be within [0, 1], got {0}")]
    InvalidEfficiency(f64),
    #[error("solar flux index {name} must be non-negative, got {value}")]
    InvalidSolarIndex { name: &'static str, value: f64 },
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },
    #[error("division by zero: {0}")]
    DivisionByZero(String),
    #[error("temperature must be strictly positive and finite, got {value} K at index {index}")]
    InvalidTemperature { index: usize, value: f64 },
    #[error("scale height must be strictly positive and finite, got {value} km at index {index}")]
    InvalidScaleHeight { index: usize, value: f64 },
    #[error("number density must be non-negative and finite, got {0} /m3")]
    InvalidDensity(f64),
    #[error("solar zenith angle must be within [0, 180] degrees, got {0}")]
    InvalidZenithAngle(f64),
    #[error("specific heat capacity must be positive and finite, got {0} J/kg/K")]
    InvalidHeatCapacity(f64),
    #[error("time step must be non-negative and finite, got {0} s")]
    InvalidTimeStep(f64),
    #[error("no {what} provided for species {species}")]
    MissingSpecies {
        species: Species,
        what: &'static str,
    },
    #[error("at least one species is required")]
    NoSpecies,
}

impl ModelError {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        ModelError::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

/// Convenience type for `Result<T, ModelError>`.
pub type ModelResult<T> = Result<T, ModelError>;

/// Fails with `DimensionMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(what: &str, expected: usize, actual: usize) -> ModelResult<()> {
    if expected != actual {
        return Err(ModelError::mismatch(what, expected, actual));
    }
    Ok(())
}
