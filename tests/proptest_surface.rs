//! Property-based tests for union-of-balls area and volume.
//!
//! - The measures do not depend on the order of the balls
//! - The measures are invariant under translation
//! - The union lies between its largest ball and the sum of its balls

use alphasurf::prelude::*;
use approx::relative_eq;
use proptest::prelude::*;
use std::f64::consts::PI;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

fn ball() -> impl Strategy<Value = (Point, f64)> {
    (prop::array::uniform3(-3.0..3.0_f64), 0.5..1.8_f64).prop_map(|(c, r)| (Point::new(c), r))
}

fn balls() -> impl Strategy<Value = Vec<(Point, f64)>> {
    prop::collection::vec(ball(), 1..=12)
}

fn measures(balls: Vec<(Point, f64)>) -> (f64, f64) {
    let surface = SurfaceModel::new(balls).unwrap();
    (surface.volume().unwrap(), surface.surface_area().unwrap())
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_measures_ignore_ball_order(balls in balls()) {
        let (volume, area) = measures(balls.clone());
        let (rev_volume, rev_area) = measures(balls.into_iter().rev().collect());
        prop_assert!(relative_eq!(volume, rev_volume, max_relative = 1e-8), "{} vs {}", volume, rev_volume);
        prop_assert!(relative_eq!(area, rev_area, max_relative = 1e-8), "{} vs {}", area, rev_area);
    }

    #[test]
    fn prop_measures_ignore_translation(balls in balls(), shift in prop::array::uniform3(-5.0..5.0_f64)) {
        let offset = Vector::from(shift);
        let moved: Vec<(Point, f64)> = balls.iter().map(|&(c, r)| (c + offset, r)).collect();
        let (volume, area) = measures(balls);
        let (moved_volume, moved_area) = measures(moved);
        prop_assert!(relative_eq!(volume, moved_volume, max_relative = 1e-8));
        prop_assert!(relative_eq!(area, moved_area, max_relative = 1e-8));
    }

    #[test]
    fn prop_union_volume_is_bounded(balls in balls()) {
        let ball_volumes: Vec<f64> = balls.iter().map(|&(_, r)| 4.0 / 3.0 * PI * r.powi(3)).collect();
        let largest = ball_volumes.iter().copied().fold(0.0, f64::max);
        let total: f64 = ball_volumes.iter().sum();
        let (volume, area) = measures(balls);

        prop_assert!(volume >= largest * (1.0 - 1e-9), "{} < {}", volume, largest);
        prop_assert!(volume <= total * (1.0 + 1e-9), "{} > {}", volume, total);
        prop_assert!(area > 0.0);
    }
}
