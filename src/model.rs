use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::atmosphere::{
    AtmosphericState, TemperatureProfileParams, integrate_hydrostatic, mass_density, scale_height,
};
use crate::constants::{DEFAULT_SPECIFIC_HEAT_CAPACITY, PhysicalConstants};
use crate::error::{ModelError, ModelResult};
use crate::grid::AltitudeGrid;
use crate::heating::{
    HeatingProfile, OpticalDepthMatrix, SECONDS_PER_DAY, heating_profile, optical_depth,
    temperature_rate,
};
use crate::solar::{SolarSpectrumTable, solar_intensity};
use crate::species::Species;

pub mod runner;

/// Solar forcing for one model evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarConditions {
    pub f107: f64,
    pub f107a: f64,
    pub zenith_angle_deg: f64,
    pub efficiency: f64,
}

/// Every profile derived from one state, keyed by the altitude grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOutput {
    pub time: NaiveDateTime,
    pub zenith_angle_deg: f64,
    pub altitudes_km: Vec<f64>,
    pub temperature: Vec<f64>,
    pub densities: BTreeMap<Species, Vec<f64>>,
    pub scale_heights: BTreeMap<Species, Vec<f64>>,
    /// Unattenuated intensity per bin (photons/m^2/s)
    pub intensities: Vec<f64>,
    pub optical_depth: OpticalDepthMatrix,
    pub heating: HeatingProfile,
    /// kg/m^3
    pub mass_density: Vec<f64>,
    /// K/s
    pub temperature_rate: Vec<f64>,
}

impl ModelOutput {
    /// Altitude (km) and value (W/m^3) of the peak heating rate.
    pub fn peak_heating(&self) -> Option<(f64, f64)> {
        self.heating
            .peak()
            .map(|(i, q)| (self.altitudes_km[i], q))
    }

    /// Smallest and largest temperature tendency in K/day.
    pub fn temperature_rate_range_k_per_day(&self) -> Option<(f64, f64)> {
        let mut rates = self.temperature_rate.iter().map(|r| r * SECONDS_PER_DAY);
        let first = rates.next()?;
        Some(rates.fold((first, first), |(lo, hi), r| (lo.min(r), hi.max(r))))
    }
}

/// Column heating model: the altitude grid, the EUV spectrum and the
/// parameters shared by every evaluation.
#[derive(Debug, Clone)]
pub struct HeatingModel {
    grid: AltitudeGrid,
    spectrum: SolarSpectrumTable,
    constants: PhysicalConstants,
    temperature_profile: TemperatureProfileParams,
    specific_heat_capacity: f64,
}

impl HeatingModel {
    pub fn new(grid: AltitudeGrid, spectrum: SolarSpectrumTable) -> Self {
        Self {
            grid,
            spectrum,
            constants: PhysicalConstants::earth(),
            temperature_profile: TemperatureProfileParams::default(),
            specific_heat_capacity: DEFAULT_SPECIFIC_HEAT_CAPACITY,
        }
    }

    pub fn with_constants(mut self, constants: PhysicalConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_temperature_profile(mut self, params: TemperatureProfileParams) -> Self {
        self.temperature_profile = params;
        self
    }

    pub fn with_specific_heat_capacity(mut self, specific_heat_capacity: f64) -> Self {
        self.specific_heat_capacity = specific_heat_capacity;
        self
    }

    pub fn grid(&self) -> &AltitudeGrid {
        &self.grid
    }

    pub fn spectrum(&self) -> &SolarSpectrumTable {
        &self.spectrum
    }

    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Starting state: the tanh temperature profile and, for every species,
    /// the diffusive-equilibrium density above its boundary value.
    pub fn initial_state(
        &self,
        boundary_densities: &BTreeMap<Species, f64>,
        time: NaiveDateTime,
    ) -> ModelResult<AtmosphericState> {
        if boundary_densities.is_empty() {
            return Err(ModelError::NoSpecies);
        }

        let altitudes = self.grid.as_slice();
        let temperature = self.temperature_profile.profile(altitudes);

        let densities = boundary_densities
            .iter()
            .map(|(&species, &boundary)| {
                let h =
                    scale_height(species.molar_mass(), altitudes, &temperature, &self.constants)?;
                let density = integrate_hydrostatic(boundary, &h, &temperature, altitudes)?;
                Ok((species, density))
            })
            .collect::<ModelResult<BTreeMap<_, _>>>()?;

        Ok(AtmosphericState {
            temperature,
            densities,
            time,
        })
    }

    /// Heating and temperature tendency of `state` under `conditions`.
    pub fn evaluate(
        &self,
        state: &AtmosphericState,
        conditions: &SolarConditions,
    ) -> ModelResult<ModelOutput> {
        let altitudes = self.grid.as_slice();

        let scale_heights = state
            .densities
            .keys()
            .map(|&species| {
                let h = scale_height(
                    species.molar_mass(),
                    altitudes,
                    &state.temperature,
                    &self.constants,
                )?;
                Ok((species, h))
            })
            .collect::<ModelResult<BTreeMap<_, _>>>()?;

        let intensities = solar_intensity(
            &self.spectrum.f74113(),
            &self.spectrum.afac(),
            conditions.f107,
            conditions.f107a,
        )?;
        let cross_sections = self.spectrum.cross_sections();

        let tau = optical_depth(
            conditions.zenith_angle_deg,
            altitudes,
            &state.densities,
            &scale_heights,
            &cross_sections,
            &self.constants,
        )?;

        let heating = heating_profile(
            &state.densities,
            &intensities,
            &tau,
            &cross_sections,
            &self.spectrum.photon_energies(&self.constants),
            conditions.efficiency,
        )?;

        let rho = mass_density(&state.densities, &self.constants)?;
        let rate = temperature_rate(&heating.total, &rho, self.specific_heat_capacity)?;

        debug!(
            "Evaluated {} altitudes x {} bins at {} (zenith {:.1} deg)",
            altitudes.len(),
            self.spectrum.len(),
            state.time,
            conditions.zenith_angle_deg
        );

        Ok(ModelOutput {
            time: state.time,
            zenith_angle_deg: conditions.zenith_angle_deg,
            altitudes_km: altitudes.to_vec(),
            temperature: state.temperature.clone(),
            densities: state.densities.clone(),
            scale_heights,
            intensities,
            optical_depth: tau,
            heating,
            mass_density: rho,
            temperature_rate: rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::SpectralBin;

    fn single_bin() -> SolarSpectrumTable {
        SolarSpectrumTable::from_bins(vec![SpectralBin {
            short_wavelength_m: 2.5e-8,
            long_wavelength_m: 3.0e-8,
            f74113: 1.0e13,
            afac: 1.0e-2,
            cross_sections: BTreeMap::from([
                (Species::Oxygen, 1.0e-21),
                (Species::Oxygen2, 2.0e-21),
                (Species::Nitrogen2, 1.1e-21),
            ]),
        }])
        .unwrap()
    }

    fn reference_model() -> HeatingModel {
        let grid = AltitudeGrid::new(vec![100.0, 200.0, 300.0, 400.0, 500.0]).unwrap();
        HeatingModel::new(grid, single_bin())
    }

    fn conditions(zenith_angle_deg: f64) -> SolarConditions {
        SolarConditions {
            f107: 100.0,
            f107a: 100.0,
            zenith_angle_deg,
            efficiency: 0.3,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let model = reference_model();
        let boundary = BTreeMap::from([(Species::Oxygen, 5.0e17)]);
        let state = model
            .initial_state(&boundary, NaiveDateTime::default())
            .unwrap();

        let output = model.evaluate(&state, &conditions(0.0)).unwrap();

        let density = &output.densities[&Species::Oxygen];
        assert_eq!(density[0], 5.0e17);
        assert!(density.windows(2).all(|w| w[1] < w[0]), "{density:?}");

        let tau = output.optical_depth.bin(0);
        assert!(tau.iter().all(|&t| t >= 0.0));
        assert!(tau.windows(2).all(|w| w[0] > w[1]), "{tau:?}");

        assert_eq!(output.heating.total.len(), 5);
        for (q, r) in output.heating.total.iter().zip(&output.temperature_rate) {
            assert!(*q > 0.0);
            assert_eq!(q.signum(), r.signum());
        }

        // Proxy (100 + 100) / 2 = 100, 20 sfu above the floor
        assert_eq!(output.intensities, vec![1.0e13 * (1.0 + 1.0e-2 * 20.0)]);
        assert_eq!(output.temperature[0], 200.0);
    }

    #[test]
    fn test_three_species_column() {
        let model = reference_model();
        let boundary = BTreeMap::from([
            (Species::Oxygen, 5.0e17),
            (Species::Oxygen2, 4.0e18),
            (Species::Nitrogen2, 1.7e19),
        ]);
        let state = model
            .initial_state(&boundary, NaiveDateTime::default())
            .unwrap();
        let output = model.evaluate(&state, &conditions(30.0)).unwrap();

        assert_eq!(output.heating.by_species.len(), 3);
        assert_eq!(output.scale_heights.len(), 3);
        // Heavier species fall off faster
        let h_o = &output.scale_heights[&Species::Oxygen];
        let h_n2 = &output.scale_heights[&Species::Nitrogen2];
        assert!(h_o.iter().zip(h_n2).all(|(o, n2)| o > n2));

        let (altitude, peak) = output.peak_heating().unwrap();
        assert!(peak > 0.0);
        assert!(output.altitudes_km.contains(&altitude));

        let (lo, hi) = output.temperature_rate_range_k_per_day().unwrap();
        assert!(lo <= hi);
        assert!(lo > 0.0);
    }

    #[test]
    fn test_night_side_has_no_heating() {
        let model = reference_model();
        let boundary = BTreeMap::from([(Species::Oxygen, 5.0e17)]);
        let state = model
            .initial_state(&boundary, NaiveDateTime::default())
            .unwrap();

        let output = model.evaluate(&state, &conditions(170.0)).unwrap();
        assert!(output.heating.total.iter().all(|&q| q == 0.0));
        assert!(output.temperature_rate.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn test_errors_propagate() {
        let model = reference_model();
        assert_eq!(
            model
                .initial_state(&BTreeMap::new(), NaiveDateTime::default())
                .unwrap_err(),
            ModelError::NoSpecies
        );
        assert_eq!(
            model
                .initial_state(
                    &BTreeMap::from([(Species::Oxygen, -1.0)]),
                    NaiveDateTime::default()
                )
                .unwrap_err(),
            ModelError::InvalidDensity(-1.0)
        );

        let state = model
            .initial_state(
                &BTreeMap::from([(Species::Oxygen, 5.0e17)]),
                NaiveDateTime::default(),
            )
            .unwrap();
        let mut bad = conditions(0.0);
        bad.efficiency = 2.0;
        assert_eq!(
            model.evaluate(&state, &bad).unwrap_err(),
            ModelError::InvalidEfficiency(2.0)
        );

        let mut bad = conditions(0.0);
        bad.f107 = -10.0;
        assert!(matches!(
            model.evaluate(&state, &bad),
            Err(ModelError::InvalidSolarIndex { .. })
        ));

        // A grid reaching below ~65 km yields non-positive temperatures
        let low = HeatingModel::new(AltitudeGrid::new(vec![50.0, 100.0]).unwrap(), single_bin());
        assert!(matches!(
            low.initial_state(
                &BTreeMap::from([(Species::Oxygen, 5.0e17)]),
                NaiveDateTime::default()
            ),
            Err(ModelError::InvalidTemperature { index: 0, .. })
        ));
    }
}
