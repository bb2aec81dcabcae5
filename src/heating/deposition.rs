use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult, ensure_len};
use crate::heating::optical_depth::{OpticalDepthMatrix, bin_count};
use crate::species::Species;

/// Volumetric heating rate (W/m3) per altitude, with the contribution of each
/// absorbing species.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatingProfile {
    pub total: Vec<f64>,
    pub by_species: BTreeMap<Species, Vec<f64>>,
}

impl HeatingProfile {
    /// Index and value of the largest total heating rate.
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.total
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, q)| match best {
                Some((_, b)) if b >= q => best,
                _ => Some((i, q)),
            })
    }
}

/// Energy deposited by EUV absorption at every altitude.
///
/// For each bin the reference intensity is attenuated by `exp(-tau)` and
/// absorbed by every species in proportion to `n sigma`; a fraction
/// `efficiency` of the absorbed photon energy goes into heat.
///
/// Bins are evaluated in parallel; the sums over bins and species run in a
/// fixed order, so the result does not depend on the thread count.
pub fn heating_profile(
    densities: &BTreeMap<Species, Vec<f64>>,
    intensities: &[f64],
    optical_depth: &OpticalDepthMatrix,
    cross_sections: &BTreeMap<Species, Vec<f64>>,
    photon_energies: &[f64],
    efficiency: f64,
) -> ModelResult<HeatingProfile> {
    if !(0.0..=1.0).contains(&efficiency) {
        return Err(ModelError::InvalidEfficiency(efficiency));
    }
    if densities.is_empty() {
        return Err(ModelError::NoSpecies);
    }

    let num_bins = bin_count(densities, cross_sections)?;
    ensure_len("solar intensities", num_bins, intensities.len())?;
    ensure_len("photon energies", num_bins, photon_energies.len())?;
    ensure_len("optical depth bins", num_bins, optical_depth.num_bins())?;

    // An empty spectrum carries no altitudes in tau, so count them on the densities
    let num_altitudes = densities.values().next().map_or(0, Vec::len);
    for (species, density) in densities {
        let what = format!("{} density profile", species);
        ensure_len(&what, num_altitudes, density.len())?;
    }
    if num_bins > 0 {
        ensure_len("optical depth altitudes", num_altitudes, optical_depth.num_altitudes())?;
    }

    // [bin][species][altitude]
    let per_bin: Vec<Vec<Vec<f64>>> = (0..num_bins)
        .into_par_iter()
        .map(|bin| {
            let tau = optical_depth.bin(bin);
            let attenuated: Vec<f64> =
                tau.iter().map(|t| intensities[bin] * (-t).exp()).collect();
            let energy = photon_energies[bin];

            densities
                .iter()
                .map(|(species, density)| {
                    let sigma = cross_sections[species][bin];
                    density
                        .iter()
                        .zip(&attenuated)
                        .map(|(&n, &i)| efficiency * n * i * sigma * energy)
                        .collect::<Vec<f64>>()
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let mut by_species: BTreeMap<Species, Vec<f64>> = densities
        .keys()
        .map(|species| (*species, vec![0.0; num_altitudes]))
        .collect();
    for contributions in &per_bin {
        for (sum, contribution) in by_species.values_mut().zip(contributions) {
            for (s, c) in sum.iter_mut().zip(contribution) {
                *s += c;
            }
        }
    }

    let mut total = vec![0.0; num_altitudes];
    for profile in by_species.values() {
        for (t, q) in total.iter_mut().zip(profile) {
            *t += q;
        }
    }

    Ok(HeatingProfile { total, by_species })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PhysicalConstants;
    use crate::heating::optical_depth::optical_depth;
    use approx::assert_relative_eq;

    struct Inputs {
        densities: BTreeMap<Species, Vec<f64>>,
        scale_heights: BTreeMap<Species, Vec<f64>>,
        cross_sections: BTreeMap<Species, Vec<f64>>,
        altitudes: Vec<f64>,
    }

    fn inputs() -> Inputs {
        Inputs {
            densities: BTreeMap::from([
                (Species::Oxygen, vec![5.0e17, 1.0e16, 8.0e14]),
                (Species::Nitrogen2, vec![1.0e19, 2.0e16, 4.0e13]),
            ]),
            scale_heights: BTreeMap::from([
                (Species::Oxygen, vec![10.0, 40.0, 60.0]),
                (Species::Nitrogen2, vec![6.0, 23.0, 35.0]),
            ]),
            cross_sections: BTreeMap::from([
                (Species::Oxygen, vec![1.0e-21, 8.0e-22]),
                (Species::Nitrogen2, vec![1.2e-21, 0.0]),
            ]),
            altitudes: vec![120.0, 250.0, 400.0],
        }
    }

    fn tau(inputs: &Inputs, zenith: f64) -> OpticalDepthMatrix {
        optical_depth(
            zenith,
            &inputs.altitudes,
            &inputs.densities,
            &inputs.scale_heights,
            &inputs.cross_sections,
            &PhysicalConstants::earth(),
        )
        .unwrap()
    }

    #[test]
    fn test_linear_in_efficiency() {
        let inputs = inputs();
        let tau = tau(&inputs, 30.0);
        let intensities = [3.0e13, 1.0e13];
        let energies = [6.5e-18, 1.2e-17];

        let q1 = heating_profile(
            &inputs.densities,
            &intensities,
            &tau,
            &inputs.cross_sections,
            &energies,
            0.3,
        )
        .unwrap();
        let q2 = heating_profile(
            &inputs.densities,
            &intensities,
            &tau,
            &inputs.cross_sections,
            &energies,
            0.6,
        )
        .unwrap();

        for (a, b) in q1.total.iter().zip(&q2.total) {
            assert_eq!(*b, 2.0 * a);
        }
        for species in q1.by_species.keys() {
            for (a, b) in q1.by_species[species].iter().zip(&q2.by_species[species]) {
                assert_eq!(*b, 2.0 * a);
            }
        }
    }

    #[test]
    fn test_total_is_sum_of_species() {
        let inputs = inputs();
        let tau = tau(&inputs, 0.0);
        let q = heating_profile(
            &inputs.densities,
            &[3.0e13, 1.0e13],
            &tau,
            &inputs.cross_sections,
            &[6.5e-18, 1.2e-17],
            0.3,
        )
        .unwrap();

        for z in 0..3 {
            let sum: f64 = q.by_species.values().map(|p| p[z]).sum();
            assert_relative_eq!(q.total[z], sum, max_relative = 1e-15);
            assert!(q.total[z] > 0.0);
        }
    }

    #[test]
    fn test_transparent_bin_uses_reference_intensity() {
        let densities = BTreeMap::from([(Species::Oxygen, vec![5.0e17, 1.0e16])]);
        let scale_heights = BTreeMap::from([(Species::Oxygen, vec![10.0, 40.0])]);
        let transparent = BTreeMap::from([(Species::Oxygen, vec![0.0])]);
        let tau = optical_depth(
            45.0,
            &[120.0, 250.0],
            &densities,
            &scale_heights,
            &transparent,
            &PhysicalConstants::earth(),
        )
        .unwrap();
        assert!(tau.bin(0).iter().all(|&t| t == 0.0));
        assert!(tau.bin(0).iter().all(|t| 2.0e13 * (-t).exp() == 2.0e13));

        // Heating computed against an absorber with the same tau = 0
        let absorbing = BTreeMap::from([(Species::Oxygen, vec![1.0e-21])]);
        let q = heating_profile(&densities, &[2.0e13], &tau, &absorbing, &[1.0e-17], 1.0).unwrap();
        for (z, &n) in [5.0e17, 1.0e16].iter().enumerate() {
            assert_eq!(q.total[z], 1.0 * n * 2.0e13 * 1.0e-21 * 1.0e-17);
        }
    }

    #[test]
    fn test_shadow_gives_zero_heating() {
        let inputs = inputs();
        let tau = tau(&inputs, 160.0);
        let q = heating_profile(
            &inputs.densities,
            &[3.0e13, 1.0e13],
            &tau,
            &inputs.cross_sections,
            &[6.5e-18, 1.2e-17],
            0.3,
        )
        .unwrap();
        assert!(q.total.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_empty_spectrum_gives_zero_heating() {
        let inputs = inputs();
        let no_bins: BTreeMap<Species, Vec<f64>> = inputs
            .densities
            .keys()
            .map(|species| (*species, Vec::new()))
            .collect();
        let tau = optical_depth(
            30.0,
            &inputs.altitudes,
            &inputs.densities,
            &inputs.scale_heights,
            &no_bins,
            &PhysicalConstants::earth(),
        )
        .unwrap();
        assert_eq!(tau.num_bins(), 0);

        let q = heating_profile(&inputs.densities, &[], &tau, &no_bins, &[], 0.3).unwrap();
        assert_eq!(q.total, vec![0.0; 3]);
        for profile in q.by_species.values() {
            assert_eq!(profile, &vec![0.0; 3]);
        }
    }

    #[test]
    fn test_peak() {
        let profile = HeatingProfile {
            total: vec![1.0, 4.0, 2.0],
            by_species: BTreeMap::new(),
        };
        assert_eq!(profile.peak(), Some((1, 4.0)));

        let empty = HeatingProfile {
            total: Vec::new(),
            by_species: BTreeMap::new(),
        };
        assert_eq!(empty.peak(), None);
    }

    #[test]
    fn test_invalid_inputs() {
        let inputs = inputs();
        let tau = tau(&inputs, 0.0);
        let run = |intensities: &[f64], energies: &[f64], efficiency: f64| {
            heating_profile(
                &inputs.densities,
                intensities,
                &tau,
                &inputs.cross_sections,
                energies,
                efficiency,
            )
        };

        assert_eq!(
            run(&[1.0, 1.0], &[1.0, 1.0], 1.5),
            Err(ModelError::InvalidEfficiency(1.5))
        );
        assert!(matches!(
            run(&[1.0, 1.0], &[1.0, 1.0], f64::NAN),
            Err(ModelError::InvalidEfficiency(_))
        ));
        assert!(matches!(
            run(&[1.0], &[1.0, 1.0], 0.3),
            Err(ModelError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            run(&[1.0, 1.0], &[1.0], 0.3),
            Err(ModelError::DimensionMismatch { .. })
        ));
        assert!(run(&[1.0, 1.0], &[1.0, 1.0], 0.0).is_ok());

        let mut short = inputs.densities.clone();
        short.insert(Species::Oxygen, vec![5.0e17, 1.0e16]);
        assert!(matches!(
            heating_profile(&short, &[1.0, 1.0], &tau, &inputs.cross_sections, &[1.0, 1.0], 0.3),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
