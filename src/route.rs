use std::str::FromStr;

use crate::{geo::Coordinate, prelude::*};

/// Client paths are reduced to at most this many waypoints before ranking.
pub const MAX_WAYPOINTS: usize = 15;

/// One point of the submitted route, in submitted order.
///
/// The index addresses the *next* and *previous* waypoints during the
/// travel-back cost lookup.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RouteWaypoint {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

impl RouteWaypoint {
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate { latitude: self.latitude, longitude: self.longitude }
    }
}

/// The collaborator convention for a serialized waypoint is a single
/// whitespace-delimited `index latitude longitude` line.
impl FromStr for RouteWaypoint {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let mut next_field = |name: &'static str| {
            fields.next().with_context(|| format!("waypoint line {line:?} is missing {name}"))
        };
        let index = next_field("the index")?
            .parse::<usize>()
            .with_context(|| format!("malformed waypoint index in {line:?}"))?;
        let latitude = next_field("the latitude")?
            .parse::<f64>()
            .with_context(|| format!("malformed waypoint latitude in {line:?}"))?;
        let longitude = next_field("the longitude")?
            .parse::<f64>()
            .with_context(|| format!("malformed waypoint longitude in {line:?}"))?;
        Ok(Self { index, latitude, longitude })
    }
}

/// Parse a serialized route. Any malformed line fails the whole route:
/// silently skipping one would corrupt the neighbor indexing downstream.
pub fn parse_route<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Vec<RouteWaypoint>> {
    lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(RouteWaypoint::from_str)
        .collect()
}

/// Reduce a raw client path to at most [`MAX_WAYPOINTS`] points, preserving
/// order and re-indexing sequentially.
pub fn downsample(path: &[Coordinate]) -> Vec<RouteWaypoint> {
    let stride = if path.len() <= MAX_WAYPOINTS { 1 } else { path.len() / (MAX_WAYPOINTS - 1) };
    path.iter()
        .step_by(stride)
        .take(MAX_WAYPOINTS)
        .enumerate()
        .map(|(index, point)| RouteWaypoint {
            index,
            latitude: point.latitude,
            longitude: point.longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route_ok() {
        let route = parse_route(["0 35.1 33.3", "1 35.2 33.4", ""]).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[1].index, 1);
        assert!((route[1].latitude - 35.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_line_fails_the_whole_route() {
        assert!(parse_route(["0 35.1 33.3", "oops 35.2"]).is_err());
        assert!(parse_route(["0 north 33.3"]).is_err());
        assert!(parse_route(["0 35.1"]).is_err());
    }

    #[test]
    fn test_downsample_keeps_short_paths_intact() {
        let path: Vec<_> = (0..10).map(|i| Coordinate::new(f64::from(i), 0.0)).collect();
        let route = downsample(&path);
        assert_eq!(route.len(), 10);
        assert!((route[9].latitude - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_downsample_caps_long_paths() {
        for n in [16, 29, 100, 500] {
            let path: Vec<_> = (0..n).map(|i| Coordinate::new(f64::from(i), 0.0)).collect();
            let route = downsample(&path);
            assert!(route.len() <= MAX_WAYPOINTS, "{n} points downsampled to {}", route.len());
            // Order preserved and the head retained:
            assert!((route[0].latitude - 0.0).abs() < f64::EPSILON);
            assert!(route.windows(2).all(|pair| pair[0].latitude < pair[1].latitude));
            // Fresh sequential indices:
            assert!(route.iter().enumerate().all(|(i, wp)| wp.index == i));
        }
    }
}
