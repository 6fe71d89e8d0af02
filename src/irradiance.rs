//! Clear-sky and cloud-adjusted irradiance estimates.
//!
//! This is a coarse approximation, not a physical model: a fixed daylight
//! window and a sine bell peaking at solar noon stand in for actual solar
//! geometry.

use std::f64::consts::PI;

use crate::{quantity::{Percent, WattsPerSquareMetre}, weather::CloudCover};

pub const SUNRISE_HOUR: u32 = 6;
pub const SUNSET_HOUR: u32 = 18;

/// Latitude assumed when the caller has no better value. See
/// [`clear_sky_ghi`] for why it currently makes no difference.
pub const DEFAULT_LATITUDE: f64 = 35.0;

/// Peak clear-sky GHI at solar noon.
const CLEAR_SKY_PEAK: f64 = 1000.0;

/// Fraction of the clear-sky irradiance lost under full cloud cover.
const CLOUD_ATTENUATION: f64 = 0.75;

/// Clear-sky GHI for a local hour of day.
///
/// Zero outside `[SUNRISE_HOUR, SUNSET_HOUR)`; inside the window, a
/// symmetric sine bell peaking at hour 12. The latitude argument is accepted
/// but does not scale the result yet, so the estimate is location-invariant,
/// a known limitation of the approximation.
pub fn clear_sky_ghi(hour: u32, _latitude: f64) -> WattsPerSquareMetre {
    if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
        return WattsPerSquareMetre::ZERO;
    }
    let hour_angle = f64::from(hour - SUNRISE_HOUR) / f64::from(SUNSET_HOUR - SUNRISE_HOUR) * PI;
    WattsPerSquareMetre(CLEAR_SKY_PEAK * hour_angle.sin())
}

/// Attenuate a clear-sky estimate by cloud cover:
/// `clear_sky * (1 - 0.75 * cloud_fraction)`.
pub fn cloud_adjusted_ghi(
    cloud_fraction: f64,
    clear_sky: WattsPerSquareMetre,
) -> WattsPerSquareMetre {
    clear_sky * (1.0 - CLOUD_ATTENUATION * cloud_fraction.clamp(0.0, 1.0))
}

/// Ratio of cloud-adjusted to clear-sky GHI for the hour: the fraction of
/// clear-sky generation achieved, and the primary attenuation factor passed
/// to the allocation engine. Zero whenever the clear-sky estimate is zero.
pub fn cloud_scaling(clouds: CloudCover, hour: u32) -> f64 {
    let clear_sky = clear_sky_ghi(hour, DEFAULT_LATITUDE);
    if clear_sky.0 > 0.0 {
        cloud_adjusted_ghi(clouds.fraction(), clear_sky).0 / clear_sky.0
    } else {
        0.0
    }
}

/// The banded cloud-cover efficiency curve used by the standalone
/// per-charger estimate: daylight-gated, stepping down through three cloud
/// bands instead of the continuous attenuation above.
pub fn cloud_band_efficiency(clouds: CloudCover, hour: u32) -> Percent {
    if !(SUNRISE_HOUR..SUNSET_HOUR).contains(&hour) {
        return Percent::ZERO;
    }
    let clouds = clouds.percent();
    let efficiency = if clouds < 25.0 {
        80.0 + 20.0 * (1.0 - clouds / 25.0)
    } else if clouds <= 75.0 {
        40.0 + (75.0 - clouds) / 50.0 * 40.0
    } else {
        (40.0 - (clouds - 75.0) / 25.0 * 40.0).max(0.0)
    };
    Percent(efficiency)
}
