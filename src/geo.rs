use crate::quantity::Kilometers;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84-ish point, degrees.
#[derive(Clone, Copy, Debug, PartialEq, derive_more::Constructor, serde::Deserialize, serde::Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Great-circle (haversine) distance between two points.
///
/// Invalid coordinates propagate as `NaN`: callers are expected to filter
/// out points with missing coordinates beforehand.
pub fn distance_km(a: Coordinate, b: Coordinate) -> Kilometers {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    Kilometers(EARTH_RADIUS_KM * central_angle)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_zero_for_identical_points() {
        let nicosia = Coordinate::new(35.1856, 33.3823);
        assert_abs_diff_eq!(distance_km(nicosia, nicosia).0, 0.0);
    }

    #[test]
    fn test_symmetric() {
        let nicosia = Coordinate::new(35.1856, 33.3823);
        let limassol = Coordinate::new(34.7071, 33.0226);
        assert_abs_diff_eq!(
            distance_km(nicosia, limassol).0,
            distance_km(limassol, nicosia).0,
        );
    }

    #[test]
    fn test_one_degree_of_longitude_at_the_equator() {
        let origin = Coordinate::new(0.0, 0.0);
        let east = Coordinate::new(0.0, 1.0);
        // One degree of arc on a 6371 km sphere:
        assert_abs_diff_eq!(distance_km(origin, east).0, 111.195, epsilon = 0.001);
    }

    #[test]
    fn test_nan_propagates() {
        let origin = Coordinate::new(0.0, 0.0);
        let broken = Coordinate::new(f64::NAN, 33.0);
        assert!(distance_km(origin, broken).0.is_nan());
    }
}
