//! Proximity engine
//!
//! Annotates bins with their distance from a reference point, filters them by
//! radius and resolves the nearest one. The [`gate`] submodule narrows a
//! discovery-radius result down to the bins a user may actually scan against.
//!
//! # Two-radius design
//!
//! ```text
//! registry bins ──► nearby(discovery radius) ──► picker / map context
//!                          │
//!                          └──► scan_eligible(scan radius) ──► gate bins
//! ```
//!
//! The second stage only ever removes bins, so filtering at the discovery
//! radius and then at the scan radius is the same as filtering all bins at
//! the scan radius directly.

mod config;
mod gate;

pub use config::{ProximityConfig, DEFAULT_DISCOVERY_RADIUS_KM, DEFAULT_SCAN_RADIUS_KM};
pub use gate::{scan_eligible, GateError, GateReport, Geofence};

use crate::bins::{AnnotatedBin, Bin};
use crate::coord::{distance_km, Coordinate};

/// Bins within `radius_km` of `point`, annotated with their distance.
///
/// The boundary is inclusive. Input order is preserved; bins are cloned, not
/// modified. Empty input or nothing in range yields an empty vector.
pub fn nearby(bins: &[Bin], point: &Coordinate, radius_km: f64) -> Vec<AnnotatedBin> {
    let annotated: Vec<AnnotatedBin> = bins
        .iter()
        .map(|bin| AnnotatedBin::new(bin.clone(), distance_km(point, &bin.location)))
        .filter(|a| a.distance_km <= radius_km)
        .collect();

    tracing::debug!(
        total = bins.len(),
        in_range = annotated.len(),
        radius_km,
        "Proximity query"
    );

    annotated
}

/// The annotated bin with the smallest distance.
///
/// Ties resolve to the earliest bin in the input, so the result is
/// deterministic regardless of how the slice was produced.
pub fn nearest(annotated: &[AnnotatedBin]) -> Option<&AnnotatedBin> {
    annotated.iter().fold(None, |best: Option<&AnnotatedBin>, candidate| match best {
        Some(current) if current.distance_km <= candidate.distance_km => Some(current),
        _ => Some(candidate),
    })
}

/// Sort annotated bins nearest first. Stable, so equal distances keep input order.
pub fn sort_by_distance(annotated: &mut [AnnotatedBin]) {
    annotated.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn bin(id: &str, lat: f64, lon: f64) -> Bin {
        Bin::new(id, coord(lat, lon)).with_area_name(format!("Area {}", id))
    }

    fn user() -> Coordinate {
        coord(28.7000, 77.2000)
    }

    #[test]
    fn test_nearby_filters_by_radius() {
        let bins = vec![
            bin("near", 28.7002, 77.2000),
            bin("mid", 28.7050, 77.2000),
            bin("far", 28.9000, 77.2000),
        ];
        let result = nearby(&bins, &user(), 3.0);
        let ids: Vec<&str> = result.iter().map(|a| a.bin_id()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
    }

    #[test]
    fn test_nearby_boundary_is_inclusive() {
        let target = bin("edge", 28.7050, 77.2000);
        let exact = distance_km(&user(), &target.location);
        let result = nearby(std::slice::from_ref(&target), &user(), exact);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].distance_km, exact);
    }

    #[test]
    fn test_nearby_empty_inputs() {
        assert!(nearby(&[], &user(), 3.0).is_empty());
        let bins = vec![bin("far", 10.0, 10.0)];
        assert!(nearby(&bins, &user(), 3.0).is_empty());
    }

    #[test]
    fn test_nearby_preserves_bin_fields() {
        let original = bin("near", 28.7002, 77.2000)
            .with_capacity(42.0, 120.0)
            .with_status(crate::bins::BinStatus::Full);
        let result = nearby(std::slice::from_ref(&original), &user(), 3.0);
        assert_eq!(result[0].bin, original);
    }

    #[test]
    fn test_nearest_picks_smallest() {
        let bins = vec![
            bin("mid", 28.7050, 77.2000),
            bin("near", 28.7002, 77.2000),
        ];
        let annotated = nearby(&bins, &user(), 3.0);
        assert_eq!(nearest(&annotated).unwrap().bin_id(), "near");
    }

    #[test]
    fn test_nearest_tie_takes_first() {
        // Mirror images across the user's longitude are equidistant
        let bins = vec![
            bin("east", 28.7000, 77.2001),
            bin("west", 28.7000, 77.1999),
        ];
        let annotated: Vec<AnnotatedBin> = bins
            .into_iter()
            .map(|b| AnnotatedBin::new(b, 0.01))
            .collect();
        assert_eq!(nearest(&annotated).unwrap().bin_id(), "east");

        let reversed: Vec<AnnotatedBin> = annotated.iter().rev().cloned().collect();
        assert_eq!(nearest(&reversed).unwrap().bin_id(), "west");
    }

    #[test]
    fn test_nearest_empty() {
        assert!(nearest(&[]).is_none());
    }

    #[test]
    fn test_sort_by_distance_is_stable() {
        let mut annotated = vec![
            AnnotatedBin::new(bin("c", 0.0, 0.0), 2.0),
            AnnotatedBin::new(bin("a", 0.0, 0.0), 1.0),
            AnnotatedBin::new(bin("b", 0.0, 0.0), 1.0),
        ];
        sort_by_distance(&mut annotated);
        let ids: Vec<&str> = annotated.iter().map(|a| a.bin_id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn bins_strategy() -> impl Strategy<Value = Vec<Bin>> {
            prop::collection::vec((28.6..28.8_f64, 77.1..77.3_f64), 0..20).prop_map(|points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lat, lon))| {
                        Bin::new(format!("BIN-{}", i), Coordinate { latitude: lat, longitude: lon })
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn test_nearby_is_exact_subset(
                bins in bins_strategy(),
                radius in 0.0..20.0_f64,
            ) {
                let point = Coordinate { latitude: 28.7, longitude: 77.2 };
                let result = nearby(&bins, &point, radius);
                let expected: Vec<&str> = bins
                    .iter()
                    .filter(|b| distance_km(&point, &b.location) <= radius)
                    .map(|b| b.bin_id.as_str())
                    .collect();
                let actual: Vec<&str> = result.iter().map(|a| a.bin_id()).collect();
                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn test_two_stage_filter_commutes(
                bins in bins_strategy(),
                strict in 0.0..2.0_f64,
                extra in 0.0..10.0_f64,
            ) {
                let point = Coordinate { latitude: 28.7, longitude: 77.2 };
                let broad = nearby(&bins, &point, strict + extra);
                let staged = scan_eligible(&broad, strict);
                let direct = nearby(&bins, &point, strict);
                prop_assert_eq!(staged, direct);
            }

            #[test]
            fn test_nearest_is_minimum(bins in bins_strategy()) {
                let point = Coordinate { latitude: 28.7, longitude: 77.2 };
                let annotated = nearby(&bins, &point, f64::INFINITY);
                if let Some(best) = nearest(&annotated) {
                    for other in &annotated {
                        prop_assert!(best.distance_km <= other.distance_km);
                    }
                } else {
                    prop_assert!(annotated.is_empty());
                }
            }
        }
    }
}
