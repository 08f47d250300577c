//! Coordinate module
//!
//! Provides the [`Coordinate`] value type and great-circle distance
//! computation shared by the bin picker, the live map and the scan gate.
//! Everything that answers "how far is this bin" goes through
//! [`distance_km`] so that no two callers can disagree.

mod types;

pub use types::{Coordinate, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in kilometres used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the great-circle distance between two coordinates.
///
/// Uses the haversine formula with a spherical Earth of radius
/// [`EARTH_RADIUS_KM`].
///
/// # Returns
///
/// Distance in kilometres. Exactly `0.0` when `a == b`.
#[inline]
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1.0 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = coord(28.7, 77.2);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn test_short_distance_north() {
        // 0.0002° of latitude is ~22.2 m
        let user = coord(28.7000, 77.2000);
        let bin = coord(28.7002, 77.2000);
        let d = distance_km(&user, &bin);
        assert!((d - 0.02224).abs() < 0.0005, "Expected ~22 m, got {} km", d);
    }

    #[test]
    fn test_medium_distance_north() {
        // 0.005° of latitude is ~556 m
        let user = coord(28.7000, 77.2000);
        let bin = coord(28.7050, 77.2000);
        let d = distance_km(&user, &bin);
        assert!((d - 0.556).abs() < 0.002, "Expected ~556 m, got {} km", d);
    }

    #[test]
    fn test_connaught_place_to_saket() {
        // Two of the seeded Delhi bins, roughly 12 km apart
        let cp = coord(28.6328, 77.2195);
        let saket = coord(28.5244, 77.2066);
        let d = distance_km(&cp, &saket);
        assert!(d > 11.5 && d < 12.5, "Expected ~12 km, got {}", d);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 180.0);
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance_km(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_method_delegates() {
        let a = coord(10.0, 10.0);
        let b = coord(10.5, 10.5);
        assert_eq!(a.distance_km(&b), distance_km(&a, &b));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_is_symmetric(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let a = Coordinate { latitude: lat1, longitude: lon1 };
                let b = Coordinate { latitude: lat2, longitude: lon2 };
                let ab = distance_km(&a, &b);
                let ba = distance_km(&b, &a);
                prop_assert!(
                    (ab - ba).abs() < 1e-9,
                    "Asymmetric distance: {} vs {}", ab, ba
                );
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                let p = Coordinate { latitude: lat, longitude: lon };
                prop_assert_eq!(distance_km(&p, &p), 0.0);
            }

            #[test]
            fn test_distance_grows_with_separation(
                lat in -60.0..60.0_f64,
                lon in -170.0..170.0_f64,
                step in 0.001..5.0_f64,
            ) {
                let origin = Coordinate { latitude: lat, longitude: lon };
                let near = Coordinate { latitude: lat + step, longitude: lon };
                let far = Coordinate { latitude: lat + step * 2.0, longitude: lon };
                prop_assert!(distance_km(&origin, &near) < distance_km(&origin, &far));
            }

            #[test]
            fn test_distance_bounded_by_half_circumference(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let a = Coordinate { latitude: lat1, longitude: lon1 };
                let b = Coordinate { latitude: lat2, longitude: lon2 };
                let d = distance_km(&a, &b);
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
            }
        }
    }
}
