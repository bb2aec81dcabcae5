use crate::error::{ModelError, ModelResult, ensure_len};

/// Seconds per day, for reporting rates in K/day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Temperature tendency `dT/dt = Q / (rho c_p)` in K/s.
pub fn temperature_rate(
    heating: &[f64],
    mass_density: &[f64],
    specific_heat_capacity: f64,
) -> ModelResult<Vec<f64>> {
    if !specific_heat_capacity.is_finite() || specific_heat_capacity < 0.0 {
        return Err(ModelError::InvalidHeatCapacity(specific_heat_capacity));
    }
    if specific_heat_capacity == 0.0 {
        return Err(ModelError::DivisionByZero(
            "specific heat capacity is zero".to_string(),
        ));
    }
    ensure_len("mass density profile", heating.len(), mass_density.len())?;

    heating
        .iter()
        .zip(mass_density)
        .enumerate()
        .map(|(i, (&q, &rho))| {
            if rho == 0.0 {
                return Err(ModelError::DivisionByZero(format!(
                    "mass density is zero at index {}",
                    i
                )));
            }
            Ok(q / (rho * specific_heat_capacity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate() {
        let rate = temperature_rate(&[3.0e-6, 0.0, -1.5e-9], &[2.0e-9, 1.0e-10, 1.0e-12], 1500.0)
            .unwrap();
        assert_eq!(rate[0], 3.0e-6 / (2.0e-9 * 1500.0));
        assert_eq!(rate[1], 0.0);
        assert!(rate[2] < 0.0);
    }

    #[test]
    fn test_sign_follows_heating() {
        let heating = [1.0e-7, 2.0e-8, 0.0, 5.0e-9];
        let rho = [1.0e-9, 1.0e-10, 1.0e-11, 1.0e-12];
        let rate = temperature_rate(&heating, &rho, 1500.0).unwrap();
        for (q, r) in heating.iter().zip(&rate) {
            assert!(*q == 0.0 || q.signum() == r.signum());
        }
    }

    #[test]
    fn test_zero_denominators() {
        assert!(matches!(
            temperature_rate(&[1.0, 1.0], &[1.0e-9, 0.0], 1500.0),
            Err(ModelError::DivisionByZero(_))
        ));
        assert!(matches!(
            temperature_rate(&[1.0], &[1.0e-9], 0.0),
            Err(ModelError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            temperature_rate(&[1.0], &[1.0], -1500.0),
            Err(ModelError::InvalidHeatCapacity(-1500.0))
        );
        assert!(matches!(
            temperature_rate(&[1.0], &[1.0], f64::INFINITY),
            Err(ModelError::InvalidHeatCapacity(_))
        ));
        assert!(matches!(
            temperature_rate(&[1.0, 2.0], &[1.0], 1500.0),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
