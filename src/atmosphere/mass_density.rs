use std::collections::BTreeMap;

use crate::constants::PhysicalConstants;
use crate::error::{ModelError, ModelResult, ensure_len};
use crate::species::Species;

/// Mass density (kg/m^3) summed over all species.
pub fn mass_density(
    densities: &BTreeMap<Species, Vec<f64>>,
    constants: &PhysicalConstants,
) -> ModelResult<Vec<f64>> {
    let Some(first) = densities.values().next() else {
        return Err(ModelError::NoSpecies);
    };
    let num_altitudes = first.len();

    let mut rho = vec![0.0; num_altitudes];
    for (species, number_density) in densities {
        ensure_len(
            &format!("{} density profile", species),
            num_altitudes,
            number_density.len(),
        )?;

        let particle_mass = species.molar_mass() * constants.atomic_mass_unit;
        for (total, n) in rho.iter_mut().zip(number_density) {
            *total += n * particle_mass;
        }
    }

    Ok(rho)
}
