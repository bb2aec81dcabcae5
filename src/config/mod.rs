use chrono::NaiveDateTime;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::atmosphere::TemperatureProfileParams;
use crate::constants::DEFAULT_SPECIFIC_HEAT_CAPACITY;
use crate::grid::{AltitudeGrid, GridDefinition};
use crate::solar::SolarGeometry;
use crate::species::Species;

pub mod error;
pub use error::ConfigError;

/// Where the solar zenith angle of a run comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZenithSource {
    Fixed(f64),
    Geometry(SolarGeometry),
}

impl ZenithSource {
    /// Zenith angle (degrees) at `time`. A fixed angle ignores the time.
    pub fn zenith_angle_deg(&self, time: NaiveDateTime) -> f64 {
        match self {
            ZenithSource::Fixed(angle) => *angle,
            ZenithSource::Geometry(geometry) => geometry.at(time).zenith_angle_deg(),
        }
    }
}

/// Parameters of a model run, read from a JSON file.
#[derive(Debug, Clone)]
pub struct RunConfig {
    f107: f64,
    f107a: f64,
    zenith: ZenithSource,
    efficiency: f64,
    boundary_densities: BTreeMap<Species, f64>,
    grid: AltitudeGrid,
    euv_file: PathBuf,
    specific_heat_capacity: f64,
    temperature_profile: TemperatureProfileParams,
    start_time: NaiveDateTime,
    time_step_seconds: f64,
    num_steps: usize,
    rebalance: bool,
    output_file: Option<PathBuf>,
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ConfigError> {
    value
        .parse::<NaiveDateTime>()
        .map_err(|source| ConfigError::Timestamp {
            value: value.to_string(),
            source,
        })
}

fn default_time_step() -> f64 {
    60.0
}

fn default_rebalance() -> bool {
    true
}

// Deserializes a RunConfig, checking parameter ranges and that exactly one
// source of zenith angle is given.
impl<'de> Deserialize<'de> for RunConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RunConfigHelper {
            f107: f64,
            f107a: f64,
            solar_zenith_angle_deg: Option<f64>,
            solar_geometry: Option<GeometryHelper>,
            efficiency: f64,
            boundary_densities: BTreeMap<Species, f64>,
            altitude_grid: GridDefinition,
            euv_file: PathBuf,
            specific_heat_capacity: Option<f64>,
            #[serde(default)]
            temperature_profile: TemperatureProfileParams,
            start_time: Option<String>,
            #[serde(default = "default_time_step")]
            time_step_seconds: f64,
            #[serde(default)]
            num_steps: usize,
            #[serde(default = "default_rebalance")]
            rebalance: bool,
            output_file: Option<PathBuf>,
        }

        #[derive(Deserialize)]
        struct GeometryHelper {
            time: String,
            latitude: f64,
            longitude: f64,
        }

        let helper = RunConfigHelper::deserialize(deserializer)?;

        // Solar indices
        for (name, value) in [("f107", helper.f107), ("f107a", helper.f107a)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(D::Error::custom(ConfigError::SolarIndex { name, value }));
            }
        }

        if !(0.0..=1.0).contains(&helper.efficiency) {
            return Err(D::Error::custom(ConfigError::Efficiency(helper.efficiency)));
        }

        if helper.boundary_densities.is_empty() {
            return Err(D::Error::custom(ConfigError::NoBoundaryDensities));
        }
        for (&species, &value) in &helper.boundary_densities {
            if !(value.is_finite() && value >= 0.0) {
                return Err(D::Error::custom(ConfigError::BoundaryDensity {
                    species,
                    value,
                }));
            }
        }

        let grid = AltitudeGrid::from_definition(&helper.altitude_grid)
            .map_err(|e| D::Error::custom(ConfigError::Grid(e.to_string())))?;

        let zenith = match (helper.solar_zenith_angle_deg, helper.solar_geometry) {
            (Some(_), Some(_)) => {
                return Err(D::Error::custom(ConfigError::ConflictingZenithSource));
            }
            (None, None) => return Err(D::Error::custom(ConfigError::MissingZenithSource)),
            (Some(angle), None) => {
                if !(angle.is_finite() && (0.0..=180.0).contains(&angle)) {
                    return Err(D::Error::custom(ConfigError::ZenithAngle(angle)));
                }
                ZenithSource::Fixed(angle)
            }
            (None, Some(geometry)) => {
                if !(-90.0..=90.0).contains(&geometry.latitude) {
                    return Err(D::Error::custom(ConfigError::Latitude(geometry.latitude)));
                }
                if !(-180.0..=180.0).contains(&geometry.longitude) {
                    return Err(D::Error::custom(ConfigError::Longitude(geometry.longitude)));
                }
                let time = parse_timestamp(&geometry.time).map_err(D::Error::custom)?;
                ZenithSource::Geometry(SolarGeometry {
                    time,
                    latitude: geometry.latitude,
                    longitude: geometry.longitude,
                })
            }
        };

        let start_time = match (&helper.start_time, &zenith) {
            (Some(value), _) => parse_timestamp(value).map_err(D::Error::custom)?,
            (None, ZenithSource::Geometry(geometry)) => geometry.time,
            (None, ZenithSource::Fixed(_)) => NaiveDateTime::default(),
        };

        if !(helper.time_step_seconds.is_finite() && helper.time_step_seconds > 0.0) {
            return Err(D::Error::custom(ConfigError::TimeStep(
                helper.time_step_seconds,
            )));
        }

        let specific_heat_capacity = helper
            .specific_heat_capacity
            .unwrap_or(DEFAULT_SPECIFIC_HEAT_CAPACITY);
        if !(specific_heat_capacity.is_finite() && specific_heat_capacity > 0.0) {
            return Err(D::Error::custom(ConfigError::HeatCapacity(
                specific_heat_capacity,
            )));
        }

        Ok(RunConfig {
            f107: helper.f107,
            f107a: helper.f107a,
            zenith,
            efficiency: helper.efficiency,
            boundary_densities: helper.boundary_densities,
            grid,
            euv_file: helper.euv_file,
            specific_heat_capacity,
            temperature_profile: helper.temperature_profile,
            start_time,
            time_step_seconds: helper.time_step_seconds,
            num_steps: helper.num_steps,
            rebalance: helper.rebalance,
            output_file: helper.output_file,
        })
    }
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: RunConfig = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    pub fn f107(&self) -> f64 {
        self.f107
    }

    pub fn f107a(&self) -> f64 {
        self.f107a
    }

    pub fn zenith(&self) -> &ZenithSource {
        &self.zenith
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn boundary_densities(&self) -> &BTreeMap<Species, f64> {
        &self.boundary_densities
    }

    pub fn grid(&self) -> &AltitudeGrid {
        &self.grid
    }

    pub fn euv_file(&self) -> &Path {
        &self.euv_file
    }

    pub fn specific_heat_capacity(&self) -> f64 {
        self.specific_heat_capacity
    }

    pub fn temperature_profile(&self) -> &TemperatureProfileParams {
        &self.temperature_profile
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn time_step_seconds(&self) -> f64 {
        self.time_step_seconds
    }

    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn rebalance(&self) -> bool {
        self.rebalance
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}
