use serde::{Deserialize, Serialize};

/// Parameters of the tanh temperature profile
/// `T(z) = base + amplitude * tanh((z - reference_altitude) / width)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureProfileParams {
    pub base_k: f64,
    pub amplitude_k: f64,
    pub reference_altitude_km: f64,
    pub width_km: f64,
}

impl Default for TemperatureProfileParams {
    fn default() -> Self {
        Self {
            base_k: 200.0,
            amplitude_k: 600.0,
            reference_altitude_km: 100.0,
            width_km: 100.0,
        }
    }
}

impl TemperatureProfileParams {
    pub fn temperature_at(&self, altitude_km: f64) -> f64 {
        self.base_k
            + self.amplitude_k * ((altitude_km - self.reference_altitude_km) / self.width_km).tanh()
    }

    /// Temperature (K) at every altitude of the grid.
    pub fn profile(&self, altitudes_km: &[f64]) -> Vec<f64> {
        altitudes_km
            .iter()
            .map(|&z| self.temperature_at(z))
            .collect()
    }
}
