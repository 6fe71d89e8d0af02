use enumset::{EnumSet, EnumSetType};

use crate::{geo::Coordinate, quantity::{Kilowatts, Percent}};

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct ChargerId(pub u32);

/// Microgrid membership produced by the upstream clustering step.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct GroupId(pub u32);

#[derive(Debug, EnumSetType, serde::Deserialize, serde::Serialize)]
#[enumset(serialize_repr = "list")]
#[serde(rename_all = "kebab-case")]
pub enum PlugType {
    Type1,
    Type2,
    Ccs,
    Chademo,
    Tesla,
}

/// A charging station snapshot as supplied by the collaborator store.
///
/// Never mutated by the engines: one value object per computation pass.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct Charger {
    pub id: ChargerId,
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Rated power, used as the demand proxy by the allocation engine.
    pub power: Kilowatts,

    pub enabled: bool,

    #[serde(default)]
    pub plug_types: EnumSet<PlugType>,

    #[serde(default)]
    pub group: Option<GroupId>,

    /// Solar-usage annotation attached between the allocation and the
    /// ranking passes, live or forecast.
    #[serde(default)]
    pub solar_percentage: Option<Percent>,
}

impl Charger {
    /// `None` unless both degrees are present, which excludes the charger
    /// from all geo computations.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    /// Mean of the two availability signals. Both currently derive from the
    /// same enabled flag.
    pub fn availability(&self) -> f64 {
        let signal = if self.enabled { 1.0 } else { 0.0 };
        (signal + signal) / 2.0
    }

    pub fn solar_percentage(&self) -> Percent {
        self.solar_percentage.unwrap_or(Percent::ZERO)
    }

    #[must_use]
    pub fn with_solar_percentage(mut self, percentage: Percent) -> Self {
        self.solar_percentage = Some(percentage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charger() -> Charger {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Makarios Avenue 12",
            "latitude": 35.16,
            "longitude": 33.36,
            "power": 22.0,
            "enabled": true,
            "plug_types": ["type2", "ccs"],
            "group": 3,
        }))
        .unwrap()
    }

    #[test]
    fn test_deserializes_collaborator_shape() {
        let charger = charger();
        assert_eq!(charger.id, ChargerId(7));
        assert_eq!(charger.group, Some(GroupId(3)));
        assert_eq!(charger.plug_types, PlugType::Type2 | PlugType::Ccs);
        assert!(charger.coordinate().is_some());
    }

    #[test]
    fn test_missing_coordinate_side_excludes_the_point() {
        let mut charger = charger();
        charger.longitude = None;
        assert_eq!(charger.coordinate(), None);
    }

    #[test]
    fn test_availability_follows_the_enabled_flag() {
        let mut charger = charger();
        assert!((charger.availability() - 1.0).abs() < f64::EPSILON);
        charger.enabled = false;
        assert!(charger.availability().abs() < f64::EPSILON);
    }
}
