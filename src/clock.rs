use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

/// Converts instants into the local hour-of-day, month, and civil date that
/// drive the production profiles.
///
/// Both the live and the forecast paths go through this one derivation, so
/// daylight-saving transitions are handled in a single place instead of a
/// fixed offset scattered around the estimators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Clock {
    pub time_zone: Tz,
}

/// A local calendar slot: everything the allocation math needs to know about
/// "when".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Local hour of day, `0..=23`.
    pub hour: u32,

    /// Local month, `1..=12`.
    pub month: u32,

    /// Local civil date, used to key the hourly generation history.
    pub date: NaiveDate,
}

impl Clock {
    pub const fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    pub fn slot(&self, at: DateTime<Utc>) -> Slot {
        let local = at.with_timezone(&self.time_zone);
        Slot { hour: local.hour(), month: local.month(), date: local.date_naive() }
    }
}
