//! Reduction of an isochrone polygon to a single search radius.
//!
//! The places provider's search primitive is a disc, not a polygon, so the
//! generally irregular isochrone (longer reach along fast roads) has to be
//! approximated. The mean vertex distance balances over- and under-coverage
//! compared to the max or min.

use geo_types::{Point, Polygon};

use crate::error::ApiError;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two lon/lat points, in meters.
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x() - a.x()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Mean haversine distance from `origin` to every vertex of the isochrone's
/// outer ring, in meters.
pub fn average_radius(origin: Point<f64>, isochrone: &Polygon<f64>) -> Result<f64, ApiError> {
    let mut vertices: Vec<Point<f64>> = isochrone.exterior().points().collect();

    // The closing vertex duplicates the first; don't count it twice.
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    if vertices.len() < 3 {
        return Err(ApiError::InvalidGeometry(format!(
            "isochrone ring has only {} distinct vertices",
            vertices.len()
        )));
    }

    let total: f64 = vertices.iter().map(|v| haversine_m(origin, *v)).sum();
    Ok(total / vertices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::LineString;

    const EIFFEL: (f64, f64) = (2.2945, 48.8584); // lon, lat

    /// Diamond of four vertices offset 0.01° in latitude and 0.015° in
    /// longitude around the Eiffel Tower.
    fn diamond() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (2.2945, 48.8684),
                (2.3095, 48.8584),
                (2.2945, 48.8484),
                (2.2795, 48.8584),
            ]),
            vec![],
        )
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Eiffel Tower to Notre-Dame.
        let d = haversine_m(Point::new(2.2945, 48.8584), Point::new(2.3499, 48.8530));
        assert!((d - 4097.39).abs() < 1.0, "got {d}");
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        let p = Point::new(2.2945, 48.8584);
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn mean_radius_of_diamond_is_exact() {
        // Mean of the four vertex distances, precomputed with the same
        // earth radius: (1111.9508 + 1097.3657 + 1111.9508 + 1097.3657) / 4.
        let origin = Point::new(EIFFEL.0, EIFFEL.1);
        let radius = average_radius(origin, &diamond()).unwrap();
        assert!((radius - 1104.658240927105).abs() < 1.0, "got {radius}");
    }

    #[test]
    fn closing_vertex_is_not_double_counted() {
        // Polygon::new closes the ring; the mean over the open ring must
        // equal the mean over the explicit vertex list.
        let origin = Point::new(EIFFEL.0, EIFFEL.1);
        let radius = average_radius(origin, &diamond()).unwrap();

        let explicit = [
            (2.2945, 48.8684),
            (2.3095, 48.8584),
            (2.2945, 48.8484),
            (2.2795, 48.8584),
        ];
        let mean: f64 = explicit
            .iter()
            .map(|&(lon, lat)| haversine_m(origin, Point::new(lon, lat)))
            .sum::<f64>()
            / explicit.len() as f64;
        assert!((radius - mean).abs() < f64::EPSILON * 1e3);
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let origin = Point::new(EIFFEL.0, EIFFEL.1);
        let line = Polygon::new(
            LineString::from(vec![(2.2945, 48.8684), (2.3095, 48.8584)]),
            vec![],
        );
        assert!(matches!(
            average_radius(origin, &line),
            Err(ApiError::InvalidGeometry(_))
        ));
    }
}
