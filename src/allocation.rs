//! Distributes each microgrid group's estimated hourly solar output across
//! the chargers it serves, proportional to their power demand, and
//! classifies every charger's solar/grid power mix.

pub mod history;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::{
    allocation::history::HourlyGenerationRecord,
    charger::{Charger, ChargerId, GroupId},
    clock::{Clock, Slot},
    irradiance::cloud_scaling,
    microgrid::ProfileMap,
    prelude::*,
    quantity::{KilowattHours, Kilowatts, Percent},
    weather::{CloudCover, WeatherSample, latest_per_charger},
};

/// Discount applied to the simulated monthly production to approximate
/// real-world losses.
pub const DERATING_FACTOR: f64 = 0.8;

/// Flat month length used to break monthly production down to a day.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// One charger's share of its group's solar output for the computed hour.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct SolarAllocationResult {
    pub charger_id: ChargerId,
    pub group: GroupId,
    pub power_demand: Kilowatts,

    /// This charger's share of the group's total demand.
    pub demand_fraction: f64,

    pub cloud_scaling: f64,

    /// Share of the group's generation attributed to this charger, before
    /// capping at its own demand.
    pub solar_allocated: Kilowatts,

    pub solar_used: Kilowatts,
    pub grid_used: Kilowatts,
    pub residual_solar: Kilowatts,

    /// `0..=100`, rounded to two decimals.
    pub solar_percentage: Percent,

    /// The whole group's expected generation this hour.
    pub group_generation: KilowattHours,
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct AllocationOutcome {
    pub chargers: Vec<SolarAllocationResult>,

    /// One record per group, keyed for idempotent history upsert.
    pub group_totals: Vec<HourlyGenerationRecord>,
}

impl AllocationOutcome {
    pub fn solar_percentages(&self) -> HashMap<ChargerId, Percent> {
        self.chargers.iter().map(|result| (result.charger_id, result.solar_percentage)).collect()
    }

    /// Annotate a charger snapshot with the computed percentages. Chargers
    /// the allocation skipped (no group, no weather) are credited zero solar
    /// and therefore read as fully grid-powered downstream.
    #[must_use]
    pub fn annotate(&self, chargers: Vec<Charger>) -> Vec<Charger> {
        let percentages = self.solar_percentages();
        chargers
            .into_iter()
            .map(|charger| {
                let percentage =
                    percentages.get(&charger.id).copied().unwrap_or(Percent::ZERO);
                charger.with_solar_percentage(percentage)
            })
            .collect()
    }
}

struct Member<'a> {
    charger: &'a Charger,
    clouds: CloudCover,
}

/// Estimate, per microgrid group, the solar energy generated in the hour of
/// `at`, split it across the group's chargers proportional to demand, and
/// derive each charger's solar/grid mix.
///
/// Chargers without a group mapping or without any weather sample are
/// skipped; a group without a profile degrades to zero generation. Neither
/// case aborts the batch.
#[instrument(skip_all, fields(at = %at, n_chargers = chargers.len()))]
pub fn allocate_solar(
    clock: &Clock,
    at: DateTime<Utc>,
    chargers: &[Charger],
    weather: &[WeatherSample],
    profiles: &ProfileMap,
) -> AllocationOutcome {
    let slot = clock.slot(at);
    let latest = latest_per_charger(weather);

    let mut groups: BTreeMap<GroupId, Vec<Member<'_>>> = BTreeMap::new();
    for charger in chargers {
        let Some(group) = charger.group else {
            debug!(charger_id = %charger.id, "no microgrid membership, skipping");
            continue;
        };
        let Some(sample) = latest.get(&charger.id) else {
            debug!(charger_id = %charger.id, "no weather sample, skipping");
            continue;
        };
        groups.entry(group).or_default().push(Member { charger, clouds: sample.clouds });
    }

    let mut outcome = AllocationOutcome::default();
    for (group, members) in &groups {
        allocate_group(&slot, *group, members, profiles, &mut outcome);
    }
    outcome
}

#[expect(clippy::cast_precision_loss)]
fn allocate_group(
    slot: &Slot,
    group: GroupId,
    members: &[Member<'_>],
    profiles: &ProfileMap,
    outcome: &mut AllocationOutcome,
) {
    let profile = profiles.get(&group);
    if profile.is_none() {
        debug!(group = %group, "no microgrid profile, degrading to zero generation");
    }
    let monthly = profile.map_or(KilowattHours::ZERO, |profile| profile.monthly(slot.month));
    let efficiency = profile.map_or(1.0, |profile| profile.efficiency);
    let hour_fraction = profile.map_or(0.0, |profile| profile.hour_fraction(slot.hour));

    let mean_clouds = CloudCover::from(
        members.iter().map(|member| member.clouds.percent()).sum::<f64>() / members.len() as f64,
    );
    let scaling = cloud_scaling(mean_clouds, slot.hour);

    let daily = KilowattHours(monthly.0 * DERATING_FACTOR / DAYS_PER_MONTH);
    let generation = daily * efficiency * hour_fraction * scaling;

    let total_demand: Kilowatts = members.iter().map(|member| member.charger.power).sum();
    for member in members {
        let demand = member.charger.power;
        let demand_fraction = if total_demand.0 > 0.0 {
            demand.0 / total_demand.0
        } else {
            1.0 / members.len() as f64
        };
        let allocated = (generation * demand_fraction).over_one_hour();
        let solar_used = allocated.min(demand);
        let solar_percentage = if demand.0 > 0.0 {
            Percent::from_capped_ratio(solar_used.0 / demand.0)
        } else {
            Percent::ZERO
        };
        outcome.chargers.push(SolarAllocationResult {
            charger_id: member.charger.id,
            group,
            power_demand: demand,
            demand_fraction,
            cloud_scaling: scaling,
            solar_allocated: allocated,
            solar_used,
            grid_used: (demand - allocated).max(Kilowatts::ZERO),
            residual_solar: (allocated - demand).max(Kilowatts::ZERO),
            solar_percentage,
            group_generation: generation,
        });
    }

    // The demand fractions sum to one, so the members' allocations add up
    // to the group generation:
    outcome.group_totals.push(HourlyGenerationRecord {
        group,
        date: slot.date,
        hour: slot.hour,
        generated: generation,
        cloud_cover: mean_clouds,
    });
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;
    use crate::microgrid::MicrogridProfile;

    fn clock() -> Clock {
        Clock::new(chrono_tz::Europe::Nicosia)
    }

    /// 12:00 local (EEST) on June 2nd.
    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap()
    }

    fn charger(id: u32, group: Option<u32>, power: f64) -> Charger {
        Charger {
            id: ChargerId(id),
            name: format!("Charger {id}"),
            address: None,
            location: None,
            latitude: Some(35.1),
            longitude: Some(33.3),
            power: Kilowatts(power),
            enabled: true,
            plug_types: enumset::EnumSet::empty(),
            group: group.map(GroupId),
            solar_percentage: None,
        }
    }

    fn sample(charger_id: u32, clouds: f64) -> WeatherSample {
        WeatherSample {
            charger_id: ChargerId(charger_id),
            clouds: CloudCover::from(clouds),
            temperature_c: 30.0,
            humidity_pct: 40.0,
            wind_speed_ms: 2.0,
            taken_at: noon(),
        }
    }

    fn profile(monthly_kwh: f64, efficiency: f64, noon_fraction: f64) -> MicrogridProfile {
        MicrogridProfile {
            installed_capacity_kwp: 150.0,
            efficiency,
            monthly_kwh: (1..=12).map(|month| (month, KilowattHours(monthly_kwh))).collect(),
            hourly_fraction: [(12, noon_fraction)].into_iter().collect(),
        }
    }

    #[test]
    fn test_group_hourly_generation_under_clear_sky() {
        let chargers = [charger(1, Some(1), 50.0)];
        let weather = [sample(1, 0.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(3000.0, 0.9, 0.12))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        // (3000 * 0.8 / 30) * 0.9 * 0.12 * 1.0:
        assert_abs_diff_eq!(outcome.group_totals[0].generated.0, 8.64, epsilon = 1e-9);
    }

    #[test]
    fn test_allocations_sum_to_the_group_generation() {
        let chargers =
            [charger(1, Some(1), 22.0), charger(2, Some(1), 50.0), charger(3, Some(1), 7.2)];
        let weather = [sample(1, 20.0), sample(2, 35.0), sample(3, 50.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(3000.0, 0.9, 0.12))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        let allocated: f64 = outcome.chargers.iter().map(|result| result.solar_allocated.0).sum();
        assert_abs_diff_eq!(allocated, outcome.group_totals[0].generated.0, epsilon = 1e-9);
        for result in &outcome.chargers {
            assert!((0.0..=100.0).contains(&result.solar_percentage.0));
        }
    }

    #[test]
    fn test_solar_grid_split() {
        // A profile tuned so the only charger's allocation is exactly 20 kW:
        // (1000 * 0.8 / 30) * 1.0 * 0.75 * 1.0 = 20.
        let chargers = [charger(1, Some(1), 50.0)];
        let weather = [sample(1, 0.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(1000.0, 1.0, 0.75))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        let result = &outcome.chargers[0];
        assert_abs_diff_eq!(result.solar_allocated.0, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.solar_used.0, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.grid_used.0, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.residual_solar.0, 0.0);
        assert_abs_diff_eq!(result.solar_percentage.0, 40.0);
    }

    #[test]
    fn test_zero_demand_charger_reads_zero_percent() {
        let chargers = [charger(1, Some(1), 0.0), charger(2, Some(1), 0.0)];
        let weather = [sample(1, 0.0), sample(2, 0.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(3000.0, 0.9, 0.12))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        for result in &outcome.chargers {
            // Zero total demand splits the generation equally:
            assert_abs_diff_eq!(result.demand_fraction, 0.5);
            assert_abs_diff_eq!(result.solar_percentage.0, 0.0);
        }
    }

    #[test]
    fn test_ungrouped_and_unsampled_chargers_are_skipped() {
        let chargers =
            [charger(1, None, 22.0), charger(2, Some(1), 22.0), charger(3, Some(1), 22.0)];
        // No weather for charger 3:
        let weather = [sample(1, 10.0), sample(2, 10.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(3000.0, 0.9, 0.12))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        assert_eq!(outcome.chargers.len(), 1);
        assert_eq!(outcome.chargers[0].charger_id, ChargerId(2));
    }

    #[test]
    fn test_missing_profile_degrades_to_zero() {
        let chargers = [charger(1, Some(9), 22.0)];
        let weather = [sample(1, 10.0)];

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &ProfileMap::new());
        let result = &outcome.chargers[0];
        assert_abs_diff_eq!(result.solar_allocated.0, 0.0);
        assert_abs_diff_eq!(result.grid_used.0, 22.0);
        assert_abs_diff_eq!(result.solar_percentage.0, 0.0);
    }

    #[test]
    fn test_annotate_credits_skipped_chargers_zero_solar() {
        let chargers = vec![charger(1, Some(1), 50.0), charger(2, None, 22.0)];
        let weather = [sample(1, 0.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(1000.0, 1.0, 0.75))]);

        let outcome = allocate_solar(&clock(), noon(), &chargers, &weather, &profiles);
        let annotated = outcome.annotate(chargers);
        assert_abs_diff_eq!(annotated[0].solar_percentage().0, 40.0);
        assert_abs_diff_eq!(annotated[1].solar_percentage().0, 0.0);
    }

    #[test]
    fn test_night_hour_generates_nothing() {
        let chargers = [charger(1, Some(1), 50.0)];
        let weather = [sample(1, 0.0)];
        let profiles = ProfileMap::from([(GroupId(1), profile(3000.0, 0.9, 0.12))]);
        // 02:00 local:
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 23, 0, 0).unwrap();

        let outcome = allocate_solar(&clock(), at, &chargers, &weather, &profiles);
        assert_abs_diff_eq!(outcome.group_totals[0].generated.0, 0.0);
    }
}
