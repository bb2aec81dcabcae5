use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::constants::PhysicalConstants;
use crate::error::{ModelError, ModelResult, ensure_len};
use crate::heating::chapman::path_factor;
use crate::species::Species;

/// Optical depth per spectral bin (rows) and altitude (columns).
///
/// Serialised as nested arrays. Points in the planet's shadow have infinite
/// depth and are written as the string `"Infinity"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpticalDepthMatrix {
    #[serde(serialize_with = "serialize_depths")]
    values: Vec<Vec<f64>>,
}

/// One optical depth, with non-finite values spelled out as strings.
struct Depth(f64);

impl Serialize for Depth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            v if v.is_finite() => serializer.serialize_f64(v),
            v if v.is_nan() => serializer.serialize_str("NaN"),
            v if v > 0.0 => serializer.serialize_str("Infinity"),
            _ => serializer.serialize_str("-Infinity"),
        }
    }
}

fn serialize_depths<S: Serializer>(values: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        values
            .iter()
            .map(|row| row.iter().map(|&v| Depth(v)).collect::<Vec<_>>()),
    )
}

impl OpticalDepthMatrix {
    pub fn num_bins(&self) -> usize {
        self.values.len()
    }

    pub fn num_altitudes(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Optical depth of one bin at every altitude.
    pub fn bin(&self, bin: usize) -> &[f64] {
        &self.values[bin]
    }

    pub fn get(&self, bin: usize, altitude_index: usize) -> f64 {
        self.values[bin][altitude_index]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Column optical depth of every bin at every altitude.
///
/// The vertical column of a species above `z` is `n(z) H(z)`. It is stretched
/// along the line of sight by the normalised Chapman factor and weighted by
/// the species cross section; contributions of all species are summed.
pub fn optical_depth(
    solar_zenith_angle_deg: f64,
    altitudes_km: &[f64],
    densities: &BTreeMap<Species, Vec<f64>>,
    scale_heights_km: &BTreeMap<Species, Vec<f64>>,
    cross_sections: &BTreeMap<Species, Vec<f64>>,
    constants: &PhysicalConstants,
) -> ModelResult<OpticalDepthMatrix> {
    if !(solar_zenith_angle_deg.is_finite() && (0.0..=180.0).contains(&solar_zenith_angle_deg)) {
        return Err(ModelError::InvalidZenithAngle(solar_zenith_angle_deg));
    }
    if densities.is_empty() {
        return Err(ModelError::NoSpecies);
    }

    let num_altitudes = altitudes_km.len();
    let num_bins = bin_count(densities, cross_sections)?;

    // Slant column (m^-2) and cross sections of each absorber
    let mut absorbers: Vec<(Vec<f64>, &[f64])> = Vec::with_capacity(densities.len());
    for (species, density) in densities {
        let scale_height = scale_heights_km
            .get(species)
            .ok_or(ModelError::MissingSpecies {
                species: *species,
                what: "scale height profile",
            })?;
        ensure_len(&format!("{} density profile", species), num_altitudes, density.len())?;
        ensure_len(
            &format!("{} scale height profile", species),
            num_altitudes,
            scale_height.len(),
        )?;

        let slant_column: Vec<f64> = altitudes_km
            .iter()
            .zip(density)
            .zip(scale_height)
            .map(|((&z, &n), &h)| {
                let vertical = n * h * 1000.0;
                if vertical == 0.0 {
                    return 0.0;
                }
                vertical
                    * path_factor(solar_zenith_angle_deg, z, h, constants.planet_radius_km)
            })
            .collect();

        absorbers.push((slant_column, cross_sections[species].as_slice()));
    }

    let values = (0..num_bins)
        .into_par_iter()
        .map(|bin| {
            let mut tau = vec![0.0; num_altitudes];
            for (slant_column, sigma) in &absorbers {
                let sigma = sigma[bin];
                if sigma == 0.0 {
                    continue;
                }
                for (t, &column) in tau.iter_mut().zip(slant_column) {
                    if column != 0.0 {
                        *t += column * sigma;
                    }
                }
            }
            tau
        })
        .collect();

    Ok(OpticalDepthMatrix { values })
}

/// Number of spectral bins, checking every density species has a
/// cross-section column of that length.
pub(crate) fn bin_count(
    densities: &BTreeMap<Species, Vec<f64>>,
    cross_sections: &BTreeMap<Species, Vec<f64>>,
) -> ModelResult<usize> {
    let mut num_bins = None;
    for species in densities.keys() {
        let column = cross_sections
            .get(species)
            .ok_or(ModelError::MissingSpecies {
                species: *species,
                what: "cross-section column",
            })?;
        match num_bins {
            None => num_bins = Some(column.len()),
            Some(n) => ensure_len(
                &format!("{} cross-section column", species),
                n,
                column.len(),
            )?,
        }
    }
    num_bins.ok_or(ModelError::NoSpecies)
}
