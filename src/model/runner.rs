use thiserror::Error;
use tracing::info;

use crate::atmosphere::{EulerStepper, StateStepper};
use crate::config::{ConfigError, RunConfig};
use crate::error::ModelError;
use crate::model::{HeatingModel, ModelOutput, SolarConditions};
use crate::solar::{SolarSpectrumTable, SpectrumError};

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("EUV table: {0}")]
    Spectrum(#[from] SpectrumError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Drives a configured run: the initial evaluation, then one evaluation per
/// time step.
#[derive(Debug)]
pub struct ModelRunner {
    config: RunConfig,
    model: HeatingModel,
}

impl ModelRunner {
    pub fn new(config: RunConfig, model: HeatingModel) -> Self {
        Self { config, model }
    }

    /// Loads the EUV table named by the configuration and builds the model.
    pub fn from_config(config: RunConfig) -> Result<Self, RunError> {
        let spectrum = SolarSpectrumTable::from_file(config.euv_file())?;

        let model = HeatingModel::new(config.grid().clone(), spectrum)
            .with_temperature_profile(*config.temperature_profile())
            .with_specific_heat_capacity(config.specific_heat_capacity());

        Ok(Self::new(config, model))
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn model(&self) -> &HeatingModel {
        &self.model
    }

    pub fn run(&self) -> Result<Vec<ModelOutput>, RunError> {
        let config = &self.config;
        let stepper = EulerStepper::new(self.model.grid(), self.model.constants())
            .with_rebalance(config.rebalance());

        let mut state = self
            .model
            .initial_state(config.boundary_densities(), config.start_time())?;
        info!(
            "Initial state at {} with {} species on {} altitudes",
            state.time,
            state.densities.len(),
            self.model.grid().len()
        );

        let mut outputs = Vec::with_capacity(config.num_steps() + 1);
        for step in 0..=config.num_steps() {
            let conditions = SolarConditions {
                f107: config.f107(),
                f107a: config.f107a(),
                zenith_angle_deg: config.zenith().zenith_angle_deg(state.time),
                efficiency: config.efficiency(),
            };
            let output = self.model.evaluate(&state, &conditions)?;

            if step < config.num_steps() {
                state = stepper.step(&state, &output.temperature_rate, config.time_step_seconds())?;
                info!("Step {}/{} -> {}", step + 1, config.num_steps(), state.time);
            }
            outputs.push(output);
        }

        Ok(outputs)
    }
}
