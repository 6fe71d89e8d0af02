//! Standalone per-charger solar estimate from the latest weather reading
//! alone. This is the fallback when a charger has no microgrid profile to
//! allocate from.

use crate::{
    charger::{Charger, ChargerId},
    clock::Clock,
    irradiance::cloud_band_efficiency,
    prelude::*,
    quantity::{Kilowatts, Percent},
    weather::{CloudCover, WeatherSample, latest_per_charger},
};

#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct SnapshotEstimate {
    pub charger_id: ChargerId,
    pub clouds: CloudCover,

    /// Banded cloud-curve efficiency at the sample's local hour.
    pub efficiency: Percent,

    pub solar_power: Kilowatts,
    pub grid_power: Kilowatts,
    pub residual_solar: Kilowatts,
}

/// Estimate every sampled charger's solar/grid mix from its latest weather
/// reading. Chargers without any sample are skipped.
#[instrument(skip_all, fields(n_chargers = chargers.len()))]
pub fn estimate_from_weather(
    clock: &Clock,
    chargers: &[Charger],
    weather: &[WeatherSample],
) -> Vec<SnapshotEstimate> {
    let latest = latest_per_charger(weather);
    chargers
        .iter()
        .filter_map(|charger| {
            let sample = latest.get(&charger.id).copied().or_else(|| {
                debug!(charger_id = %charger.id, "no weather sample, skipping");
                None
            })?;
            let hour = clock.slot(sample.taken_at).hour;
            let efficiency = cloud_band_efficiency(sample.clouds, hour);
            let solar_power = charger.power * (efficiency.0 / 100.0);
            Some(SnapshotEstimate {
                charger_id: charger.id,
                clouds: sample.clouds,
                efficiency,
                solar_power,
                grid_power: (charger.power - solar_power).max(Kilowatts::ZERO),
                residual_solar: (solar_power - charger.power).max(Kilowatts::ZERO),
            })
        })
        .collect()
}
