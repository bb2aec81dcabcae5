//! Physical constants
//!
//! The constants are carried by an explicit value instead of module-level
//! globals so that a run can be repeated with another planet's parameters.

use serde::{Deserialize, Serialize};

/// Default specific heat capacity of the neutral gas (J/kg/K)
pub const DEFAULT_SPECIFIC_HEAT_CAPACITY: f64 = 1500.0;

/// Lowest F10.7 average accepted by the EUVAC parameterisation (sfu)
pub const EUVAC_FLUX_FLOOR: f64 = 80.0;

/// Set of physical constants used by every component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Boltzmann constant (J/K)
    pub boltzmann: f64,
    /// Gravitational acceleration at the surface (m/s^2)
    pub surface_gravity: f64,
    /// Planet radius (km)
    pub planet_radius_km: f64,
    /// Atomic mass unit (kg)
    pub atomic_mass_unit: f64,
    /// Planck constant (J s)
    pub planck: f64,
    /// Speed of light (m/s)
    pub speed_of_light: f64,
}

impl PhysicalConstants {
    pub fn earth() -> Self {
        Self {
            boltzmann: 1.38064852e-23,
            surface_gravity: 9.81,
            planet_radius_km: 6371.0,
            atomic_mass_unit: 1.6726219e-27,
            planck: 6.6261e-34,
            speed_of_light: 2.9979e8,
        }
    }

    /// Gravitational acceleration at `altitude_km` (m/s^2).
    pub fn gravity_at(&self, altitude_km: f64) -> f64 {
        let ratio = self.planet_radius_km / (self.planet_radius_km + altitude_km);
        self.surface_gravity * ratio * ratio
    }

    /// Energy of a photon of the given wavelength (J).
    pub fn photon_energy(&self, wavelength_m: f64) -> f64 {
        self.planck * self.speed_of_light / wavelength_m
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::earth()
    }
}
