//! Group-level rollups over allocation and ranking outputs.

use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    allocation::AllocationOutcome,
    charger::{Charger, GroupId},
    geo::Coordinate,
    quantity::Percent,
    ranking::RankedCharger,
};

/// Mean allocated solar percentage per group.
pub fn average_solar_by_group(outcome: &AllocationOutcome) -> HashMap<GroupId, Percent> {
    outcome
        .chargers
        .iter()
        .map(|result| (result.group, result.solar_percentage.0))
        .into_group_map()
        .into_iter()
        .map(|(group, percentages)| {
            #[expect(clippy::cast_precision_loss)]
            let mean = percentages.iter().sum::<f64>() / percentages.len() as f64;
            (group, Percent(mean))
        })
        .collect()
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct GroupRanking {
    pub group: GroupId,
    pub average_eco_score: f64,
    pub charger_count: usize,

    /// Mean coordinate of the group's members, when any carry coordinates.
    pub center: Option<Coordinate>,
}

/// Roll a charger ranking up to its microgrid groups: mean eco score per
/// group, best groups first, at most `limit` entries.
pub fn top_groups(
    ranked: &[RankedCharger],
    chargers: &[Charger],
    limit: usize,
) -> Vec<GroupRanking> {
    let group_of: HashMap<_, _> = chargers
        .iter()
        .filter_map(|charger| charger.group.map(|group| (charger.id, group)))
        .collect();

    let mut rankings: Vec<GroupRanking> = ranked
        .iter()
        .filter_map(|entry| group_of.get(&entry.charger_id).map(|group| (*group, entry.eco_score)))
        .into_group_map()
        .into_iter()
        .map(|(group, scores)| {
            #[expect(clippy::cast_precision_loss)]
            let average_eco_score = scores.iter().sum::<f64>() / scores.len() as f64;
            GroupRanking {
                group,
                average_eco_score,
                charger_count: scores.len(),
                center: centroid(chargers, group),
            }
        })
        .collect();
    rankings.sort_by(|a, b| b.average_eco_score.total_cmp(&a.average_eco_score));
    rankings.truncate(limit);
    rankings
}

#[expect(clippy::cast_precision_loss)]
fn centroid(chargers: &[Charger], group: GroupId) -> Option<Coordinate> {
    let coordinates: Vec<Coordinate> = chargers
        .iter()
        .filter(|charger| charger.group == Some(group))
        .filter_map(Charger::coordinate)
        .collect();
    if coordinates.is_empty() {
        return None;
    }
    let n = coordinates.len() as f64;
    Some(Coordinate::new(
        coordinates.iter().map(|point| point.latitude).sum::<f64>() / n,
        coordinates.iter().map(|point| point.longitude).sum::<f64>() / n,
    ))
}
