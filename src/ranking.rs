//! Route-aware eco-score ranking: scores every in-radius charger against
//! every route waypoint and keeps the globally best few.

use std::{cmp::Reverse, collections::HashSet};

use bon::Builder;
use enumset::EnumSet;
use ordered_float::OrderedFloat;

use crate::{
    charger::{Charger, ChargerId, PlugType},
    geo::{Coordinate, distance_km},
    prelude::*,
    quantity::Kilometers,
    route::RouteWaypoint,
};

/// Size of the returned ranking.
pub const TOP_K: usize = 5;

/// ETA penalty steps, in minutes-to-arrive: above each threshold, the solar
/// score is divided by the paired factor.
const ETA_PENALTIES: [(f64, f64); 3] = [(45.0, 4.0), (30.0, 3.0), (15.0, 2.0)];

#[derive(Builder, Clone, Debug)]
pub struct RankingRequest {
    /// The user's current position. All radius filtering is relative to the
    /// origin, not to the individual waypoints.
    pub origin: Coordinate,

    /// Search radius around the origin.
    pub radius: Kilometers,

    /// Weight of the travel (detour) score. The three weights are caller
    /// multipliers and are not required to sum to one.
    pub derouting_weight: f64,

    pub availability_weight: f64,
    pub sustainability_weight: f64,

    /// When non-empty, candidates must offer at least one of these plugs.
    #[builder(default)]
    pub plug_filter: EnumSet<PlugType>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct RankedCharger {
    pub charger_id: ChargerId,
    pub name: String,
    pub coordinate: Coordinate,
    pub eco_score: f64,
    pub travel_score: f64,
    pub solar_score: f64,
    pub availability: f64,
    pub distance: Kilometers,

    /// Travel distance standing in for an arrival estimate.
    pub minutes_to_arrive: f64,
}

struct Candidate<'a> {
    charger: &'a Charger,
    coordinate: Coordinate,
    travel_to: Kilometers,
}

/// Rank the candidate chargers against the route and return the top
/// [`TOP_K`] by eco score, deduplicated by display name.
///
/// The waypoint sweep is O(waypoints × chargers) with no spatial index,
/// which is fine at the intended scale (≤ 15 waypoints, low hundreds of
/// candidates).
#[instrument(
    skip_all,
    fields(radius = %request.radius, n_waypoints = waypoints.len(), n_chargers = chargers.len()),
)]
pub fn rank_chargers(
    request: &RankingRequest,
    waypoints: &[RouteWaypoint],
    chargers: &[Charger],
) -> Result<Vec<RankedCharger>> {
    ensure!(
        request.origin.latitude.is_finite() && request.origin.longitude.is_finite(),
        "the origin coordinate must be finite",
    );
    ensure!(
        request.radius.0.is_finite() && request.radius.0 >= 0.0,
        "the search radius must be non-negative, got {}",
        request.radius,
    );

    // The origin is fixed for the whole call, so the in-radius set and the
    // per-call normalizers do not change between waypoints:
    let candidates: Vec<Candidate<'_>> = chargers
        .iter()
        .filter(|charger| {
            request.plug_filter.is_empty()
                || !(charger.plug_types & request.plug_filter).is_empty()
        })
        .filter_map(|charger| {
            let coordinate = charger.coordinate()?;
            let travel_to = distance_km(request.origin, coordinate);
            (travel_to.0 <= request.radius.0).then_some(Candidate {
                charger,
                coordinate,
                travel_to,
            })
        })
        .collect();

    // Worst-case round trip observed this call:
    let farthest_point =
        candidates.iter().map(|candidate| candidate.travel_to).fold(Kilometers::ZERO, Kilometers::max)
            * 2.0;
    // Best solar percentage available in radius:
    let greenest =
        candidates.iter().map(|candidate| candidate.charger.solar_percentage().0).fold(0.0, f64::max);

    let mut pool = Vec::with_capacity(waypoints.len() * candidates.len());
    for waypoint in waypoints {
        for candidate in &candidates {
            pool.push(score_candidate(request, waypoints, waypoint, candidate, farthest_point, greenest));
        }
    }

    // First occurrence wins: distinct chargers sharing a display name are
    // merged into one listing.
    let mut seen = HashSet::new();
    let mut ranked: Vec<RankedCharger> =
        pool.into_iter().filter(|entry| seen.insert(entry.name.clone())).collect();
    ranked.sort_by_key(|entry| Reverse(OrderedFloat(entry.eco_score)));
    ranked.truncate(TOP_K);

    debug!(n_ranked = ranked.len(), "ranked");
    Ok(ranked)
}

fn score_candidate(
    request: &RankingRequest,
    waypoints: &[RouteWaypoint],
    waypoint: &RouteWaypoint,
    candidate: &Candidate<'_>,
    farthest_point: Kilometers,
    greenest: f64,
) -> RankedCharger {
    let travel_to = candidate.travel_to;

    // The cheapest continuation after the detour: back towards the next
    // waypoint, back towards the previous one, or retracing the approach.
    // A neighbor outside the route bounds contributes half the worst-case
    // round trip instead.
    let no_neighbor = farthest_point * 0.5;
    let towards = |index: Option<usize>| {
        index
            .and_then(|index| waypoints.get(index))
            .map_or(no_neighbor, |neighbor| distance_km(candidate.coordinate, neighbor.coordinate()))
    };
    let travel_back = towards(waypoint.index.checked_add(1))
        .min(towards(waypoint.index.checked_sub(1)))
        .min(travel_to);

    let travel_total = travel_to + travel_back;
    let travel_score = if farthest_point.0 > 0.0 {
        100.0 - travel_total.0 * 100.0 / farthest_point.0
    } else {
        // The only candidates sit exactly at the origin, so there is no
        // detour to penalize:
        100.0
    };

    let minutes_to_arrive = travel_to.0;
    let mut solar_score = if greenest > 0.0 {
        candidate.charger.solar_percentage().0 * 100.0 / greenest
    } else {
        0.0
    };
    if let Some((_, divisor)) =
        ETA_PENALTIES.iter().find(|(threshold, _)| minutes_to_arrive > *threshold)
    {
        solar_score /= divisor;
    }

    let availability = candidate.charger.availability();
    let eco_score = travel_score * request.derouting_weight
        + availability * request.availability_weight
        + solar_score * request.sustainability_weight;

    RankedCharger {
        charger_id: candidate.charger.id,
        name: candidate.charger.name.clone(),
        coordinate: candidate.coordinate,
        eco_score,
        travel_score,
        solar_score,
        availability,
        distance: travel_to,
        minutes_to_arrive,
    }
}
