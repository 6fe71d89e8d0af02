//! Time-shifted counterpart of the live allocation: the caller supplies a
//! hypothetical future instant and a per-charger cloud-cover forecast
//! instead of live weather readings.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::{
    allocation::{DAYS_PER_MONTH, DERATING_FACTOR},
    charger::{Charger, ChargerId, GroupId},
    clock::Clock,
    irradiance::{DEFAULT_LATITUDE, clear_sky_ghi, cloud_adjusted_ghi, cloud_scaling},
    microgrid::ProfileMap,
    prelude::*,
    quantity::{KilowattHours, Kilowatts, Percent},
    weather::CloudCover,
};

/// A charger's forecast solar share at the requested instant.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct ForecastEstimate {
    pub charger_id: ChargerId,
    pub group: GroupId,

    /// Demand-proportional share of the group's forecast generation.
    pub solar_allocated: Kilowatts,

    /// Share of the plant's physically plausible panel output.
    pub pv_share: Kilowatts,

    /// `min(solar_allocated, pv_share)`, the conservative estimate the
    /// percentage is derived from.
    pub solar_power: Kilowatts,

    pub solar_percentage: Percent,
}

/// Same allocation math as the live path, over the decomposed forecast
/// instant and the supplied cloud forecast, with one addition: the
/// demand-relative estimate is capped by the absolute panel output
/// `(cloud_adjusted_ghi / 1000) * capacity_kwp * efficiency`. Both
/// quantities are distributed by demand fraction, so the per-charger
/// minimum equals the group-level minimum distributed.
///
/// Chargers without a group, without a cloud forecast entry, or whose group
/// has no profile degrade exactly like the live path.
#[instrument(skip_all, fields(at = %at))]
pub fn forecast_solar(
    clock: &Clock,
    at: DateTime<Utc>,
    chargers: &[Charger],
    cloud_forecast: &HashMap<ChargerId, CloudCover>,
    profiles: &ProfileMap,
) -> Vec<ForecastEstimate> {
    let slot = clock.slot(at);

    let mut groups: BTreeMap<GroupId, Vec<(&Charger, CloudCover)>> = BTreeMap::new();
    for charger in chargers {
        let Some(group) = charger.group else {
            debug!(charger_id = %charger.id, "no microgrid membership, skipping");
            continue;
        };
        let Some(clouds) = cloud_forecast.get(&charger.id) else {
            debug!(charger_id = %charger.id, "no cloud forecast, skipping");
            continue;
        };
        groups.entry(group).or_default().push((charger, *clouds));
    }

    let mut estimates = Vec::new();
    #[expect(clippy::cast_precision_loss)]
    for (group, members) in &groups {
        let profile = profiles.get(group);
        let monthly = profile.map_or(KilowattHours::ZERO, |profile| profile.monthly(slot.month));
        let efficiency = profile.map_or(1.0, |profile| profile.efficiency);
        let hour_fraction = profile.map_or(0.0, |profile| profile.hour_fraction(slot.hour));
        let capacity_kwp = profile.map_or(0.0, |profile| profile.installed_capacity_kwp);

        let mean_clouds = CloudCover::from(
            members.iter().map(|(_, clouds)| clouds.percent()).sum::<f64>()
                / members.len() as f64,
        );
        let scaling = cloud_scaling(mean_clouds, slot.hour);

        let daily = KilowattHours(monthly.0 * DERATING_FACTOR / DAYS_PER_MONTH);
        let generation = daily * efficiency * hour_fraction * scaling;

        let adjusted =
            cloud_adjusted_ghi(mean_clouds.fraction(), clear_sky_ghi(slot.hour, DEFAULT_LATITUDE));
        let pv_output = Kilowatts(adjusted.0 / 1000.0 * capacity_kwp * efficiency);

        let total_demand: Kilowatts = members.iter().map(|(charger, _)| charger.power).sum();
        for (charger, _) in members {
            let demand = charger.power;
            let demand_fraction = if total_demand.0 > 0.0 {
                demand.0 / total_demand.0
            } else {
                1.0 / members.len() as f64
            };
            let solar_allocated = (generation * demand_fraction).over_one_hour();
            let pv_share = pv_output * demand_fraction;
            let solar_power = solar_allocated.min(pv_share);
            let solar_percentage = if demand.0 > 0.0 {
                Percent::from_capped_ratio(solar_power.0 / demand.0)
            } else {
                Percent::ZERO
            };
            estimates.push(ForecastEstimate {
                charger_id: charger.id,
                group: *group,
                solar_allocated,
                pv_share,
                solar_power,
                solar_percentage,
            });
        }
    }
    estimates
}
