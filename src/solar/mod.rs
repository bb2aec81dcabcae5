//! Solar input module
//!
//! Spectral table of EUV bins, the EUVAC intensity model and the solar
//! geometry used to derive the zenith angle.

pub mod euvac;
pub mod geometry;
pub mod spectrum;

pub use euvac::{flux_proxy, solar_intensity};
pub use geometry::{SolarGeometry, SolarPosition};
pub use spectrum::{SolarSpectrumTable, SpectralBin, SpectrumError};
