use thiserror::Error;

use crate::species::Species;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid altitude_grid: {0}")]
    Grid(String),
    #[error("{name} should be a non-negative number, got {value}")]
    SolarIndex { name: &'static str, value: f64 },
    #[error("efficiency should be within [0, 1], got {0}")]
    Efficiency(f64),
    #[error("boundary density of {species} should be non-negative, got {value}")]
    BoundaryDensity { species: Species, value: f64 },
    #[error("boundary_densities should name at least one species")]
    NoBoundaryDensities,
    #[error("only one of solar_zenith_angle_deg and solar_geometry can be given")]
    ConflictingZenithSource,
    #[error("one of solar_zenith_angle_deg or solar_geometry is required")]
    MissingZenithSource,
    #[error("solar_zenith_angle_deg should be within [0, 180], got {0}")]
    ZenithAngle(f64),
    #[error("Failed to parse timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
    #[error("latitude should be within [-90, 90], got {0}")]
    Latitude(f64),
    #[error("longitude should be within [-180, 180], got {0}")]
    Longitude(f64),
    #[error("time_step_seconds should be strictly positive, got {0}")]
    TimeStep(f64),
    #[error("specific_heat_capacity should be strictly positive, got {0}")]
    HeatCapacity(f64),
}
