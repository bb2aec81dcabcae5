//! Thermospheric heating by solar EUV absorption.
//!
//! A one-dimensional column model: the neutral atmosphere is built in
//! diffusive equilibrium above a boundary altitude, EUVAC fluxes are attenuated
//! along the slant path to the sun, and the absorbed energy is converted into
//! a heating rate and a temperature tendency.

pub mod atmosphere;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod heating;
pub mod model;
pub mod output;
pub mod solar;
pub mod species;

pub use config::{ConfigError, RunConfig};
pub use constants::PhysicalConstants;
pub use error::{ModelError, ModelResult};
pub use grid::AltitudeGrid;
pub use model::runner::{ModelRunner, RunError};
pub use model::{HeatingModel, ModelOutput, SolarConditions};
pub use output::write_outputs;
pub use species::Species;
