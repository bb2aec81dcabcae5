use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::PhysicalConstants;
use crate::species::Species;

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("failed to read EUV table: {0}")]
    Io(#[from] std::io::Error),
    #[error("EUV table has no header row")]
    MissingHeader,
    #[error("EUV table is missing column '{0}'")]
    MissingColumn(String),
    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: cannot parse '{value}' in column '{column}'")]
    Parse {
        line: usize,
        column: String,
        value: String,
    },
    #[error("bin {bin}: {reason}")]
    InvalidBin { bin: usize, reason: String },
    #[error("EUV table contains no bins")]
    Empty,
}

/// One EUV wavelength interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralBin {
    /// Short edge of the bin (m)
    pub short_wavelength_m: f64,
    /// Long edge of the bin (m)
    pub long_wavelength_m: f64,
    /// EUVAC reference flux at solar minimum (photons/m^2/s)
    pub f74113: f64,
    /// EUVAC activity scaling coefficient
    pub afac: f64,
    /// Absorption cross section per species (m^2)
    pub cross_sections: BTreeMap<Species, f64>,
}

impl SpectralBin {
    pub fn mean_wavelength_m(&self) -> f64 {
        (self.short_wavelength_m + self.long_wavelength_m) / 2.0
    }

    fn validate(&self, bin: usize) -> Result<(), SpectrumError> {
        let invalid = |reason: String| SpectrumError::InvalidBin { bin, reason };

        if !(self.short_wavelength_m.is_finite() && self.short_wavelength_m > 0.0) {
            return Err(invalid(format!(
                "short wavelength must be positive, got {}",
                self.short_wavelength_m
            )));
        }
        let long = self.long_wavelength_m;
        if !(long.is_finite() && long >= self.short_wavelength_m) {
            return Err(invalid(format!(
                "long wavelength {} is shorter than short wavelength {}",
                self.long_wavelength_m, self.short_wavelength_m
            )));
        }
        if !(self.f74113.is_finite() && self.f74113 >= 0.0) {
            return Err(invalid(format!("F74113 must be non-negative, got {}", self.f74113)));
        }
        if !self.afac.is_finite() {
            return Err(invalid(format!("AFAC must be finite, got {}", self.afac)));
        }
        for (species, sigma) in &self.cross_sections {
            if !(sigma.is_finite() && *sigma >= 0.0) {
                return Err(invalid(format!(
                    "{} cross section must be non-negative, got {}",
                    species, sigma
                )));
            }
        }
        Ok(())
    }
}

/// Immutable set of spectral bins for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolarSpectrumTable {
    bins: Vec<SpectralBin>,
}

const SHORT: &str = "short";
const LONG: &str = "long";
const F74113: &str = "f74113";
const AFAC: &str = "afac";

impl SolarSpectrumTable {
    pub fn from_bins(bins: Vec<SpectralBin>) -> Result<Self, SpectrumError> {
        if bins.is_empty() {
            return Err(SpectrumError::Empty);
        }
        for (i, bin) in bins.iter().enumerate() {
            bin.validate(i)?;
        }
        Ok(Self { bins })
    }

    /// Reads a comma separated table with one row per bin.
    ///
    /// The header names the columns `short`, `long`, `f74113`, `afac` and one
    /// cross-section column per species (`ocross`, `o2cross`, `n2cross`), in
    /// any order. Blank lines and lines starting with `#` are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpectrumError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut header: Option<BTreeMap<String, usize>> = None;
        let mut bins = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();

            let Some(columns) = &header else {
                header = Some(Self::parse_header(&fields)?);
                continue;
            };

            if fields.len() != columns.len() {
                return Err(SpectrumError::FieldCount {
                    line: line_number,
                    expected: columns.len(),
                    actual: fields.len(),
                });
            }

            let value = |column: &str| -> Result<f64, SpectrumError> {
                let raw = fields[columns[column]];
                raw.parse::<f64>().map_err(|_| SpectrumError::Parse {
                    line: line_number,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
            };

            let mut cross_sections = BTreeMap::new();
            for species in Species::ALL {
                cross_sections.insert(species, value(species.cross_section_column())?);
            }

            bins.push(SpectralBin {
                short_wavelength_m: value(SHORT)?,
                long_wavelength_m: value(LONG)?,
                f74113: value(F74113)?,
                afac: value(AFAC)?,
                cross_sections,
            });
        }

        if header.is_none() {
            return Err(SpectrumError::MissingHeader);
        }

        let table = Self::from_bins(bins)?;
        info!(
            "Loaded {} EUV bins from {}",
            table.len(),
            path.display()
        );
        debug!(
            "EUV table spans {:.1} - {:.1} nm",
            table.bins[0].short_wavelength_m * 1e9,
            table.bins[table.len() - 1].long_wavelength_m * 1e9
        );

        Ok(table)
    }

    fn parse_header(fields: &[&str]) -> Result<BTreeMap<String, usize>, SpectrumError> {
        let columns: BTreeMap<String, usize> = fields
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_ascii_lowercase(), i))
            .collect();

        let required = [SHORT, LONG, F74113, AFAC]
            .into_iter()
            .chain(Species::ALL.iter().map(|s| s.cross_section_column()));
        for name in required {
            if !columns.contains_key(name) {
                return Err(SpectrumError::MissingColumn(name.to_string()));
            }
        }

        Ok(columns)
    }

    pub fn bins(&self) -> &[SpectralBin] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn f74113(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.f74113).collect()
    }

    pub fn afac(&self) -> Vec<f64> {
        self.bins.iter().map(|b| b.afac).collect()
    }

    pub fn mean_wavelengths_m(&self) -> Vec<f64> {
        self.bins.iter().map(SpectralBin::mean_wavelength_m).collect()
    }

    /// Photon energy `h c / lambda_mean` of every bin (J).
    pub fn photon_energies(&self, constants: &PhysicalConstants) -> Vec<f64> {
        self.bins
            .iter()
            .map(|b| constants.photon_energy(b.mean_wavelength_m()))
            .collect()
    }

    /// Cross-section column per species, aligned with the bins. Species
    /// missing from a bin get a zero cross section.
    pub fn cross_sections(&self) -> BTreeMap<Species, Vec<f64>> {
        let mut columns: BTreeMap<Species, Vec<f64>> = BTreeMap::new();
        for bin in &self.bins {
            for species in bin.cross_sections.keys() {
                columns.entry(*species).or_default();
            }
        }
        for (species, column) in columns.iter_mut() {
            column.extend(
                self.bins
                    .iter()
                    .map(|b| b.cross_sections.get(species).copied().unwrap_or(0.0)),
            );
        }
        columns
    }
}
