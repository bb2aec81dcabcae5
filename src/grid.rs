use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Strictly increasing altitude grid in km.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltitudeGrid {
    altitudes_km: Vec<f64>,
}

/// Evenly spaced grid definition, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridDefinition {
    pub start_km: f64,
    pub end_km: f64,
    pub num_points: usize,
}

impl AltitudeGrid {
    pub fn new(altitudes_km: Vec<f64>) -> ModelResult<Self> {
        validate_altitudes(&altitudes_km)?;
        Ok(Self { altitudes_km })
    }

    pub fn linspace(start_km: f64, end_km: f64, num_points: usize) -> ModelResult<Self> {
        if num_points < 2 {
            return Err(ModelError::InvalidGrid(format!(
                "at least 2 points are required, got {}",
                num_points
            )));
        }

        let step = (end_km - start_km) / (num_points - 1) as f64;
        let mut altitudes_km: Vec<f64> = (0..num_points)
            .map(|i| start_km + step * i as f64)
            .collect();
        // Pin the last point so the upper bound is exact
        altitudes_km[num_points - 1] = end_km;

        Self::new(altitudes_km)
    }

    pub fn from_definition(definition: &GridDefinition) -> ModelResult<Self> {
        Self::linspace(definition.start_km, definition.end_km, definition.num_points)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.altitudes_km
    }

    pub fn len(&self) -> usize {
        self.altitudes_km.len()
    }

    pub fn is_empty(&self) -> bool {
        self.altitudes_km.is_empty()
    }
}

/// Checks that altitudes are finite, strictly increasing and at least two.
pub fn validate_altitudes(altitudes_km: &[f64]) -> ModelResult<()> {
    if altitudes_km.len() < 2 {
        return Err(ModelError::InvalidGrid(format!(
            "at least 2 points are required, got {}",
            altitudes_km.len()
        )));
    }

    if let Some(bad) = altitudes_km.iter().find(|z| !z.is_finite()) {
        return Err(ModelError::InvalidGrid(format!(
            "altitudes must be finite, got {}",
            bad
        )));
    }

    if let Some(i) = altitudes_km.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ModelError::InvalidGrid(format!(
            "altitudes must be strictly increasing, got {} km followed by {} km",
            altitudes_km[i],
            altitudes_km[i + 1]
        )));
    }

    Ok(())
}
