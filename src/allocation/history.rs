use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{charger::GroupId, quantity::KilowattHours, weather::CloudCover};

/// Upsert key of the hourly generation history: one row per group per local
/// hour per date.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct HourlyGenerationKey {
    pub group: GroupId,
    pub date: NaiveDate,
    pub hour: u32,
}

/// A group's total estimated generation for one hour, with the cloud cover
/// that produced the estimate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HourlyGenerationRecord {
    pub group: GroupId,
    pub date: NaiveDate,
    pub hour: u32,
    pub generated: KilowattHours,
    pub cloud_cover: CloudCover,
}

impl HourlyGenerationRecord {
    pub const fn key(&self) -> HourlyGenerationKey {
        HourlyGenerationKey { group: self.group, date: self.date, hour: self.hour }
    }
}

/// In-memory history sink with last-writer-wins semantics: recomputing the
/// same (group, hour, date) overwrites the previous row instead of
/// appending a duplicate.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: BTreeMap<HourlyGenerationKey, HourlyGenerationRecord>,
}

impl HistoryStore {
    pub fn upsert(&mut self, record: HourlyGenerationRecord) {
        self.records.insert(record.key(), record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = HourlyGenerationRecord>) {
        for record in records {
            self.upsert(record);
        }
    }

    pub fn get(&self, key: &HourlyGenerationKey) -> Option<&HourlyGenerationRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourlyGenerationRecord> {
        self.records.values()
    }
}
