use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Absorbing neutral species of the thermosphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "O")]
    Oxygen,
    #[serde(rename = "O2")]
    Oxygen2,
    #[serde(rename = "N2")]
    Nitrogen2,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Oxygen, Species::Oxygen2, Species::Nitrogen2];

    /// Molar mass in amu.
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::Oxygen => 16.0,
            Species::Oxygen2 => 32.0,
            Species::Nitrogen2 => 28.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Species::Oxygen => "O",
            Species::Oxygen2 => "O2",
            Species::Nitrogen2 => "N2",
        }
    }

    /// Header of the cross-section column in the EUV table.
    pub fn cross_section_column(&self) -> &'static str {
        match self {
            Species::Oxygen => "ocross",
            Species::Oxygen2 => "o2cross",
            Species::Nitrogen2 => "n2cross",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSpecies(pub String);

impl Display for UnknownSpecies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown species '{}'", self.0)
    }
}

impl std::error::Error for UnknownSpecies {}

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|sp| sp.symbol().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSpecies(s.to_string()))
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
