use std::collections::HashMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde_with::serde_as;

use crate::charger::ChargerId;

/// Cloud cover in percent, clamped into `[0, 100]` on construction.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(from = "f64")]
pub struct CloudCover(f64);

impl CloudCover {
    pub const CLEAR: Self = Self(0.0);
    pub const OVERCAST: Self = Self(100.0);

    pub fn percent(self) -> f64 {
        self.0
    }

    pub fn fraction(self) -> f64 {
        self.0 / 100.0
    }
}

impl From<f64> for CloudCover {
    fn from(percent: f64) -> Self {
        Self(percent.clamp(0.0, 100.0))
    }
}

/// The latest reading the weather collaborator holds for one charger.
///
/// Only the cloud cover and the timestamp feed the allocation math; the rest
/// is carried through for display.
#[serde_as]
#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
pub struct WeatherSample {
    pub charger_id: ChargerId,
    pub clouds: CloudCover,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,

    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub taken_at: DateTime<Utc>,
}

/// Pick the newest sample per charger out of an unordered batch.
pub fn latest_per_charger(samples: &[WeatherSample]) -> HashMap<ChargerId, &WeatherSample> {
    samples
        .iter()
        .map(|sample| (sample.charger_id, sample))
        .into_grouping_map()
        .max_by_key(|_, sample| sample.taken_at)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample(charger_id: u32, clouds: f64, hour: u32) -> WeatherSample {
        WeatherSample {
            charger_id: ChargerId(charger_id),
            clouds: CloudCover::from(clouds),
            temperature_c: 28.0,
            humidity_pct: 55.0,
            wind_speed_ms: 3.2,
            taken_at: Utc.with_ymd_and_hms(2026, 6, 2, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_cloud_cover_is_clamped() {
        assert!((CloudCover::from(130.0).percent() - 100.0).abs() < f64::EPSILON);
        assert!(CloudCover::from(-5.0).percent().abs() < f64::EPSILON);
        assert!((CloudCover::from(42.0).fraction() - 0.42).abs() < f64::EPSILON);
    }

    #[test]
    fn test_latest_per_charger_keeps_the_newest_reading() {
        let samples =
            [sample(1, 10.0, 8), sample(1, 80.0, 11), sample(2, 30.0, 9), sample(1, 50.0, 10)];
        let latest = latest_per_charger(&samples);
        assert_eq!(latest.len(), 2);
        assert!((latest[&ChargerId(1)].clouds.percent() - 80.0).abs() < f64::EPSILON);
        assert!((latest[&ChargerId(2)].clouds.percent() - 30.0).abs() < f64::EPSILON);
    }
}
