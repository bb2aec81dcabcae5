use rayon::prelude::*;

use crate::error::{ModelError, ModelResult, ensure_len};
use crate::grid::validate_altitudes;

/// Integrates a number-density profile upward from its boundary value.
///
/// Each layer follows the barometric law corrected by the temperature ratio
/// of diffusive equilibrium:
///
/// `rho[i] = rho[i-1] * (T[i] / T[i-1]) * exp(-(z[i] - z[i-1]) / H[i])`
///
/// The temperature ratio and decay of each layer do not depend on each other
/// and are evaluated in parallel. They are then applied in altitude order,
/// left to right, which gives exactly the values of the sequential
/// recurrence.
pub fn integrate_hydrostatic(
    boundary_density: f64,
    scale_heights_km: &[f64],
    temperatures_k: &[f64],
    altitudes_km: &[f64],
) -> ModelResult<Vec<f64>> {
    validate_altitudes(altitudes_km)?;
    ensure_len("scale height profile", altitudes_km.len(), scale_heights_km.len())?;
    ensure_len("temperature profile", altitudes_km.len(), temperatures_k.len())?;

    if !(boundary_density.is_finite() && boundary_density >= 0.0) {
        return Err(ModelError::InvalidDensity(boundary_density));
    }
    validate_profiles(scale_heights_km, temperatures_k)?;

    let factors = layer_factors(scale_heights_km, temperatures_k, altitudes_km);

    let mut density = Vec::with_capacity(altitudes_km.len());
    density.push(boundary_density);
    let mut current = boundary_density;
    for (temperature_ratio, decay) in factors {
        current = current * temperature_ratio * decay;
        density.push(current);
    }

    Ok(density)
}

/// Temperatures and scale heights must be strictly positive and finite.
fn validate_profiles(scale_heights_km: &[f64], temperatures_k: &[f64]) -> ModelResult<()> {
    for (index, (&h, &t)) in scale_heights_km.iter().zip(temperatures_k).enumerate() {
        if t == 0.0 {
            return Err(ModelError::DivisionByZero(format!(
                "temperature is zero at index {}",
                index
            )));
        }
        if !(t.is_finite() && t > 0.0) {
            return Err(ModelError::InvalidTemperature { index, value: t });
        }
        if h == 0.0 {
            return Err(ModelError::DivisionByZero(format!(
                "scale height is zero at index {}",
                index
            )));
        }
        if !(h.is_finite() && h > 0.0) {
            return Err(ModelError::InvalidScaleHeight { index, value: h });
        }
    }
    Ok(())
}

/// Temperature ratio and exponential decay across each layer `i-1 -> i`,
/// for i >= 1.
fn layer_factors(
    scale_heights_km: &[f64],
    temperatures_k: &[f64],
    altitudes_km: &[f64],
) -> Vec<(f64, f64)> {
    (1..altitudes_km.len())
        .into_par_iter()
        .map(|i| {
            let temperature_ratio = temperatures_k[i] / temperatures_k[i - 1];
            let altitude_difference = altitudes_km[i] - altitudes_km[i - 1];
            (temperature_ratio, (-altitude_difference / scale_heights_km[i]).exp())
        })
        .collect()
}
