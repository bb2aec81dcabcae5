//! EUV absorption and heating
//!
//! Optical depth of the absorbing column, energy deposition per species and
//! the conversion of volumetric heating into a temperature tendency.

mod chapman;
pub mod deposition;
pub mod optical_depth;
pub mod thermal_rate;

pub use chapman::path_factor;
pub use deposition::{HeatingProfile, heating_profile};
pub use optical_depth::{OpticalDepthMatrix, optical_depth};
pub use thermal_rate::{SECONDS_PER_DAY, temperature_rate};
