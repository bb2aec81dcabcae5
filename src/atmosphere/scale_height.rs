use crate::constants::PhysicalConstants;
use crate::error::{ModelError, ModelResult, ensure_len};

/// Scale height (km) of a species at every altitude.
///
/// Gravity falls off as `g0 * (R / (R + z))^2` and the scale height is
/// `k_B T / (m g)`, converted from metres to km.
pub fn scale_height(
    mass_amu: f64,
    altitudes_km: &[f64],
    temperatures_k: &[f64],
    constants: &PhysicalConstants,
) -> ModelResult<Vec<f64>> {
    if !(mass_amu.is_finite() && mass_amu > 0.0) {
        return Err(ModelError::InvalidMass(mass_amu));
    }
    ensure_len("temperature profile", altitudes_km.len(), temperatures_k.len())?;

    let mass_kg = mass_amu * constants.atomic_mass_unit;

    altitudes_km
        .iter()
        .zip(temperatures_k)
        .enumerate()
        .map(|(index, (&z, &t))| {
            if !(t.is_finite() && t > 0.0) {
                return Err(ModelError::InvalidTemperature { index, value: t });
            }

            let gravity = constants.gravity_at(z);
            if !(gravity.is_finite() && gravity > 0.0) {
                return Err(ModelError::DivisionByZero(format!(
                    "local gravity is {} m/s^2 at {} km",
                    gravity, z
                )));
            }

            Ok(constants.boltzmann * t / (mass_kg * gravity) / 1000.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;
    use approx::assert_relative_eq;

    #[test]
    fn test_oxygen_scale_height_at_400_km() {
        let constants = PhysicalConstants::earth();
        let h = scale_height(16.0, &[400.0], &[1000.0], &constants).unwrap();

        let g = 9.81 * (6371.0_f64 / 6771.0).powi(2);
        let expected = 1.38064852e-23 * 1000.0 / (16.0 * 1.6726219e-27 * g) / 1000.0;
        assert_relative_eq!(h[0], expected, max_relative = 1e-12);
        // Roughly 58 km for atomic oxygen at 1000 K
        assert!((50.0..65.0).contains(&h[0]), "{}", h[0]);
    }

    #[test]
    fn test_positive_for_positive_inputs() {
        let constants = PhysicalConstants::earth();
        let altitudes: Vec<f64> = (0..50).map(|i| 80.0 + 20.0 * i as f64).collect();
        let temperatures: Vec<f64> = (0..50).map(|i| 150.0 + 37.0 * i as f64).collect();

        for species in Species::ALL {
            let h = scale_height(species.molar_mass(), &altitudes, &temperatures, &constants)
                .unwrap();
            assert!(h.iter().all(|&v| v > 0.0));
        }
        let h = scale_height(1.0e-3, &altitudes, &temperatures, &constants).unwrap();
        assert!(h.iter().all(|&v| v > 0.0 && v.is_finite()));
    }

    #[test]
    fn test_heavier_species_has_smaller_scale_height() {
        let constants = PhysicalConstants::earth();
        let h_o = scale_height(16.0, &[300.0], &[900.0], &constants).unwrap();
        let h_n2 = scale_height(28.0, &[300.0], &[900.0], &constants).unwrap();
        assert_relative_eq!(h_o[0] / h_n2[0], 28.0 / 16.0, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let constants = PhysicalConstants::earth();
        assert_eq!(
            scale_height(0.0, &[100.0], &[200.0], &constants),
            Err(ModelError::InvalidMass(0.0))
        );
        assert!(matches!(
            scale_height(-4.0, &[100.0], &[200.0], &constants),
            Err(ModelError::InvalidMass(_))
        ));
        assert!(matches!(
            scale_height(16.0, &[100.0, 200.0], &[200.0], &constants),
            Err(ModelError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            scale_height(16.0, &[100.0, 200.0], &[200.0, -5.0], &constants),
            Err(ModelError::InvalidTemperature { index: 1, .. })
        ));
    }

    #[test]
    fn test_zero_gravity_is_division_by_zero() {
        let constants = PhysicalConstants {
            surface_gravity: 0.0,
            ..PhysicalConstants::earth()
        };
        assert!(matches!(
            scale_height(16.0, &[100.0], &[200.0], &constants),
            Err(ModelError::DivisionByZero(_))
        ));
    }
}
