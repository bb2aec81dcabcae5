//! Slant-path enhancement of the vertical column
//!
//! The Chapman grazing-incidence function `Ch(X, chi)` gives the ratio of the
//! column along the sun's ray to the vertical column in a spherical,
//! exponentially stratified atmosphere, with `X = (R + z) / H`.
//!
//! References:
//! - Smith, F. L., & Smith, C. (1972). Numerical evaluation of Chapman's
//!   grazing incidence integral ch(X, chi). *Journal of Geophysical Research*,
//!   77(19), 3592-3597.
//! - Rees, M. H. (1989). *Physics and Chemistry of the Upper Atmosphere*.

use std::f64::consts::PI;

/// Scaled complementary error function `exp(y^2) erfc(y)` for `y >= 0`.
///
/// Single rational fit, strictly decreasing in `y`. It drifts low by about a
/// percent for large `y`, which cancels in the normalised path factor.
fn erfcx(y: f64) -> f64 {
    (1.0606963 + 0.55643831 * y) / (1.0619896 + 1.7245609 * y + y * y)
}

/// Chapman function for a zenith angle in degrees. Infinite when the ray to
/// the sun passes through the solid planet.
fn chapman(x: f64, zenith_angle_deg: f64, altitude_km: f64, planet_radius_km: f64) -> f64 {
    let chi = zenith_angle_deg.to_radians();
    let y = (x / 2.0).sqrt() * chi.cos().abs();

    if zenith_angle_deg <= 90.0 {
        return (PI * x / 2.0).sqrt() * erfcx(y);
    }

    let sin_chi = chi.sin();
    if (planet_radius_km + altitude_km) * sin_chi < planet_radius_km {
        return f64::INFINITY;
    }

    (2.0 * PI * x).sqrt() * (sin_chi.sqrt() * (x * (1.0 - sin_chi)).exp() - 0.5 * erfcx(y))
}

/// Ratio of slant to vertical column at `altitude_km` for a species of scale
/// height `scale_height_km`.
///
/// The Chapman function is normalised by its overhead value, so the factor is
/// exactly one for an overhead sun and follows `sec(chi)` with the first-order
/// curvature correction away from it.
pub fn path_factor(
    zenith_angle_deg: f64,
    altitude_km: f64,
    scale_height_km: f64,
    planet_radius_km: f64,
) -> f64 {
    if zenith_angle_deg == 0.0 {
        return 1.0;
    }

    let x = (planet_radius_km + altitude_km) / scale_height_km;
    let overhead = chapman(x, 0.0, altitude_km, planet_radius_km);

    chapman(x, zenith_angle_deg, altitude_km, planet_radius_km) / overhead
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 6371.0;

    #[test]
    fn test_overhead_is_one() {
        assert_eq!(path_factor(0.0, 300.0, 50.0, R), 1.0);
    }

    #[test]
    fn test_close_to_secant_at_moderate_angles() {
        for angle in [10.0_f64, 30.0, 45.0, 60.0] {
            let factor = path_factor(angle, 300.0, 50.0, R);
            let secant = 1.0 / angle.to_radians().cos();
            assert!(
                (factor / secant - 1.0).abs() < 0.03,
                "angle {angle}: factor {factor}, secant {secant}"
            );
        }
    }

    #[test]
    fn test_monotonic_in_zenith_angle() {
        let mut previous = 0.0;
        for step in 0..=200 {
            let angle = step as f64 * 0.5;
            let factor = path_factor(angle, 300.0, 50.0, R);
            assert!(factor.is_finite());
            assert!(factor >= previous, "angle {angle}: {factor} < {previous}");
            previous = factor;
        }
    }

    #[test]
    fn test_finite_at_horizon() {
        // Secant diverges at 90 degrees, the spherical path does not
        let factor = path_factor(90.0, 300.0, 50.0, R);
        assert!(factor.is_finite());
        // Roughly sqrt(pi X / 2) with X = 133
        assert!((10.0..20.0).contains(&factor), "{factor}");
    }

    #[test]
    fn test_shadow() {
        // At 300 km the geometric shadow starts near 107 degrees
        assert!(path_factor(100.0, 300.0, 50.0, R).is_finite());
        assert!(path_factor(120.0, 300.0, 50.0, R).is_infinite());
        assert!(path_factor(180.0, 300.0, 50.0, R).is_infinite());
    }
}
