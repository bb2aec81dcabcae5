use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::atmosphere::{integrate_hydrostatic, scale_height};
use crate::constants::PhysicalConstants;
use crate::error::{ModelError, ModelResult, ensure_len};
use crate::grid::AltitudeGrid;
use crate::species::Species;

/// Temperature and composition of the column at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtmosphericState {
    pub temperature: Vec<f64>,
    pub densities: BTreeMap<Species, Vec<f64>>,
    pub time: NaiveDateTime,
}

/// Advances an atmospheric state by one time step.
///
/// Implementations return a new state and leave the input untouched.
pub trait StateStepper {
    fn step(
        &self,
        state: &AtmosphericState,
        temperature_rate: &[f64],
        time_step_s: f64,
    ) -> ModelResult<AtmosphericState>;
}

/// Explicit Euler update of the temperature, `T + dT/dt * dt`.
///
/// With `rebalance` set, every species is re-integrated hydrostatically on the
/// new temperature, keeping its density at the lowest grid point.
#[derive(Debug, Clone, Copy)]
pub struct EulerStepper<'a> {
    grid: &'a AltitudeGrid,
    constants: &'a PhysicalConstants,
    rebalance: bool,
}

impl<'a> EulerStepper<'a> {
    pub fn new(grid: &'a AltitudeGrid, constants: &'a PhysicalConstants) -> Self {
        Self {
            grid,
            constants,
            rebalance: false,
        }
    }

    pub fn with_rebalance(mut self, rebalance: bool) -> Self {
        self.rebalance = rebalance;
        self
    }

    fn rebalanced_densities(
        &self,
        state: &AtmosphericState,
        temperature: &[f64],
    ) -> ModelResult<BTreeMap<Species, Vec<f64>>> {
        let altitudes = self.grid.as_slice();

        state
            .densities
            .iter()
            .map(|(&species, profile)| {
                let boundary = *profile
                    .first()
                    .ok_or_else(|| ModelError::mismatch("density profile", altitudes.len(), 0))?;
                let h = scale_height(species.molar_mass(), altitudes, temperature, self.constants)?;
                let density = integrate_hydrostatic(boundary, &h, temperature, altitudes)?;
                Ok((species, density))
            })
            .collect()
    }
}

impl StateStepper for EulerStepper<'_> {
    fn step(
        &self,
        state: &AtmosphericState,
        temperature_rate: &[f64],
        time_step_s: f64,
    ) -> ModelResult<AtmosphericState> {
        if !(time_step_s.is_finite() && time_step_s >= 0.0) {
            return Err(ModelError::InvalidTimeStep(time_step_s));
        }

        let n = self.grid.len();
        ensure_len("temperature profile", n, state.temperature.len())?;
        ensure_len("temperature rate profile", n, temperature_rate.len())?;
        for (species, profile) in &state.densities {
            ensure_len(&format!("{} density profile", species), n, profile.len())?;
        }

        let temperature: Vec<f64> = state
            .temperature
            .iter()
            .zip(temperature_rate)
            .map(|(t, rate)| t + rate * time_step_s)
            .collect();

        let densities = if self.rebalance {
            self.rebalanced_densities(state, &temperature)?
        } else {
            state.densities.clone()
        };

        let delta = step_duration(time_step_s)?;
        let time = state
            .time
            .checked_add_signed(delta)
            .ok_or(ModelError::InvalidTimeStep(time_step_s))?;

        Ok(AtmosphericState {
            temperature,
            densities,
            time,
        })
    }
}

/// Converts a step in seconds to a `TimeDelta`, keeping nanosecond resolution.
fn step_duration(time_step_s: f64) -> ModelResult<TimeDelta> {
    let whole = time_step_s.trunc();
    if whole >= i64::MAX as f64 {
        return Err(ModelError::InvalidTimeStep(time_step_s));
    }
    let nanos = ((time_step_s - whole) * 1.0e9).round() as i64;

    TimeDelta::try_seconds(whole as i64)
        .and_then(|seconds| seconds.checked_add(&TimeDelta::nanoseconds(nanos)))
        .ok_or(ModelError::InvalidTimeStep(time_step_s))
}
