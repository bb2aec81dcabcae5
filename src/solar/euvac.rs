//! EUVAC solar EUV flux model
//!
//! Reference:
//! - Richards, P. G., Fennelly, J. A., & Torr, D. G. (1994). EUVAC: A solar EUV
//!   flux model for aeronomic calculations. *Journal of Geophysical Research*,
//!   99(A5), 8981-8992.

use crate::constants::EUVAC_FLUX_FLOOR;
use crate::error::{ModelError, ModelResult, ensure_len};

/// Activity proxy `P = (F10.7 + F10.7A) / 2`, floored at the solar-minimum value.
pub fn flux_proxy(f107: f64, f107a: f64) -> ModelResult<f64> {
    if !(f107.is_finite() && f107 >= 0.0) {
        return Err(ModelError::InvalidSolarIndex {
            name: "F10.7",
            value: f107,
        });
    }
    if !(f107a.is_finite() && f107a >= 0.0) {
        return Err(ModelError::InvalidSolarIndex {
            name: "F10.7A",
            value: f107a,
        });
    }

    Ok(((f107 + f107a) / 2.0).max(EUVAC_FLUX_FLOOR))
}

/// Solar intensity of every bin above the atmosphere,
/// `I = F74113 * (1 + AFAC * (P - 80))`.
pub fn solar_intensity(
    f74113: &[f64],
    afac: &[f64],
    f107: f64,
    f107a: f64,
) -> ModelResult<Vec<f64>> {
    ensure_len("AFAC column", f74113.len(), afac.len())?;
    let proxy = flux_proxy(f107, f107a)?;

    Ok(f74113
        .iter()
        .zip(afac)
        .map(|(&reference, &scaling)| reference * (1.0 + scaling * (proxy - EUVAC_FLUX_FLOOR)))
        .collect())
}
