//! Neutral atmosphere module
//!
//! Temperature initialisation, scale heights, diffusive-equilibrium density
//! profiles, mass density and the state stepper that advances the column in
//! time.

pub mod hydrostatic;
pub mod mass_density;
pub mod scale_height;
pub mod state;
pub mod temperature;

pub use hydrostatic::integrate_hydrostatic;
pub use mass_density::mass_density;
pub use scale_height::scale_height;
pub use state::{AtmosphericState, EulerStepper, StateStepper};
pub use temperature::TemperatureProfileParams;
