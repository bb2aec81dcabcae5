//! Solar position from UTC time and geographic location
//!
//! Declination and hour-angle formulation; good to about a degree, which is
//! plenty for the slant-path factor of the optical depth.
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub zenith_angle_deg: f64,
    pub azimuth_angle_deg: f64,
    pub elevation_angle_deg: f64,
    pub declination_deg: f64,
    pub hour_angle_deg: f64,
}

/// Where and when the sun is observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarGeometry {
    pub time: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}

impl SolarGeometry {
    pub fn at(&self, time: NaiveDateTime) -> Self {
        Self { time, ..*self }
    }

    pub fn zenith_angle_deg(&self) -> f64 {
        SolarPosition::calculate(self.time, self.latitude, self.longitude).zenith_angle_deg
    }
}

impl SolarPosition {
    /// # Arguments
    /// * `time` - UTC time
    /// * `latitude` - decimal degrees, north positive (-90 to +90)
    /// * `longitude` - decimal degrees, east positive (-180 to +180)
    pub fn calculate(time: NaiveDateTime, latitude: f64, longitude: f64) -> Self {
        let day_of_year = time.ordinal() as f64;
        let hour = time.num_seconds_from_midnight() as f64 / 3600.0;

        let declination_deg = 23.45 * (360.0 * (284.0 + day_of_year) / 365.0).to_radians().sin();

        // Local solar time, 15 degrees of longitude per hour
        let solar_time = hour + longitude / 15.0;
        let hour_angle_deg = 15.0 * (solar_time - 12.0);

        let lat = latitude.to_radians();
        let dec = declination_deg.to_radians();
        let ha = hour_angle_deg.to_radians();

        let cos_zenith =
            (lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos()).clamp(-1.0, 1.0);
        let zenith = cos_zenith.acos();
        let zenith_angle_deg = zenith.to_degrees();

        // Azimuth measured from north, clockwise
        let azimuth_angle_deg = if zenith.sin().abs() < 1e-12 {
            0.0
        } else {
            let cos_azimuth = ((dec.sin() - lat.sin() * cos_zenith)
                / (lat.cos() * zenith.sin()))
            .clamp(-1.0, 1.0);
            let azimuth = cos_azimuth.acos().to_degrees();
            if ha.sin() > 0.0 { 360.0 - azimuth } else { azimuth }
        };

        SolarPosition {
            zenith_angle_deg,
            azimuth_angle_deg,
            elevation_angle_deg: 90.0 - zenith_angle_deg,
            declination_deg,
            hour_angle_deg,
        }
    }
}
