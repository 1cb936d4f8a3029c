// crates/gazetteer-core/src/geo/point.rs
use serde::{Deserialize, Serialize};

/// Mean earth radius (IUGG), in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS84 position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `(0, 0)` is used by source datasets as the "unknown location" sentinel.
    #[inline]
    pub fn is_null_island(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    /// Great-circle distance to `other` in meters on the mean-radius sphere.
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        haversine_distance(self, other, EARTH_RADIUS_METERS)
    }
}

/// Great-circle distance between `a` and `b`, in meters.
///
/// Uses the haversine formula. The result is symmetric bit-for-bit:
/// swapping the arguments only negates the deltas, which are squared
/// through `sin`, and the cosine product commutes.
///
/// # Examples
///
/// ```rust
/// use gazetteer_core::geo::{haversine_distance, Point, EARTH_RADIUS_METERS};
///
/// let paris = Point::new(48.86667, 2.3333);
/// let bordeaux = Point::new(44.83333, -0.56667);
/// let d = haversine_distance(&paris, &bordeaux, EARTH_RADIUS_METERS);
/// assert!((d - 499_000.0).abs() < 5_000.0);
/// assert_eq!(d, haversine_distance(&bordeaux, &paris, EARTH_RADIUS_METERS));
/// ```
pub fn haversine_distance(a: &Point, b: &Point, radius_meters: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let half_dlat = (b.lat - a.lat).to_radians() / 2.0;
    let half_dlng = (b.lng - a.lng).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlng.sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * radius_meters * h.min(1.0).sqrt().asin()
}

/// Latitude band (in degrees) that can contain points within `radius_meters`
/// of `center`. Used to skip the trigonometry for obviously distant rows.
#[inline]
pub(crate) fn latitude_band(center: &Point, radius_meters: f64, earth_radius: f64) -> (f64, f64) {
    let delta = (radius_meters / earth_radius).to_degrees();
    (center.lat - delta, center.lat + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let paris = Point::new(48.86667, 2.3333);
        let goussainville = Point::new(49.01667, 2.46667);
        assert_eq!(paris.distance_to(&paris), 0.0);
        assert_eq!(
            paris.distance_to(&goussainville),
            goussainville.distance_to(&paris)
        );
        assert!(paris.distance_to(&goussainville) > 0.0);
    }

    #[test]
    fn known_distance_paris_goussainville() {
        let paris = Point::new(48.86667, 2.3333);
        let goussainville = Point::new(49.01667, 2.46667);
        let d = paris.distance_to(&goussainville);
        assert!((19_000.0..20_500.0).contains(&d), "got {d}");
    }

    #[test]
    fn antipodes_do_not_produce_nan() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 180.0);
        let d = a.distance_to(&b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn latitude_band_contains_radius() {
        let c = Point::new(45.0, 3.0);
        let (lo, hi) = latitude_band(&c, 111_000.0, EARTH_RADIUS_METERS);
        assert!(lo < 44.01 && hi > 45.99);
    }

    #[test]
    fn null_island_sentinel() {
        assert!(Point::new(0.0, 0.0).is_null_island());
        assert!(!Point::new(0.0, 0.1).is_null_island());
    }
}
