pub mod summary;

use std::collections::{BTreeMap, HashMap};

use crate::{charger::GroupId, quantity::KilowattHours};

/// Production characteristics of one microgrid group, as simulated and
/// stored by the collaborator.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct MicrogridProfile {
    pub installed_capacity_kwp: f64,

    /// System efficiency in `[0, 1]`.
    pub efficiency: f64,

    /// Estimated production per month, keyed `1..=12`. Missing months read
    /// as zero.
    #[serde(default)]
    pub monthly_kwh: BTreeMap<u32, KilowattHours>,

    /// Relative production per local hour of day, keyed `0..=23`. Missing
    /// hours read as zero.
    #[serde(default)]
    pub hourly_fraction: BTreeMap<u32, f64>,
}

impl MicrogridProfile {
    pub fn monthly(&self, month: u32) -> KilowattHours {
        self.monthly_kwh.get(&month).copied().unwrap_or(KilowattHours::ZERO)
    }

    pub fn hour_fraction(&self, hour: u32) -> f64 {
        self.hourly_fraction.get(&hour).copied().unwrap_or(0.0)
    }
}

pub type ProfileMap = HashMap<GroupId, MicrogridProfile>;
