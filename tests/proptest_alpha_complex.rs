//! Property-based tests for triangulations and their alpha complexes.
//!
//! This module uses proptest to verify properties that must hold for any
//! input in general position:
//! - Weighted triangulations are structurally valid and satisfy the power condition
//! - The real complex has Euler characteristic 1
//! - Alpha complexes are closed under taking faces
//! - Alpha complexes grow monotonically with alpha

use alphasurf::prelude::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

/// Strategy for generating finite coordinates in a reasonable range
fn finite_coordinate() -> impl Strategy<Value = f64> {
    (-10.0..10.0).prop_filter("must be finite", |x: &f64| x.is_finite())
}

fn point() -> impl Strategy<Value = Point> {
    prop::array::uniform3(finite_coordinate()).prop_map(Point::new)
}

/// Strategy for a small cloud of weighted points (5-20 points)
fn weighted_cloud() -> impl Strategy<Value = Vec<WeightedPoint>> {
    prop::collection::vec((point(), 0.0..4.0_f64), 5..=20).prop_map(|v| {
        v.into_iter()
            .map(|(p, w)| WeightedPoint::new(p, w))
            .collect()
    })
}

fn simplex_sets(complex: &AlphaComplex) -> (BTreeSet<usize>, BTreeSet<Edge>, BTreeSet<Triangle>, BTreeSet<Tetrahedron>) {
    (
        complex.vertices().iter().copied().collect(),
        complex.edges().iter().copied().collect(),
        complex.triangles().iter().copied().collect(),
        complex.tetrahedra().iter().copied().collect(),
    )
}

// =============================================================================
// TRIANGULATION PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_weighted_triangulation_is_valid(points in weighted_cloud()) {
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        prop_assert!(tri.validate().is_ok(), "{:?}", tri.validate());
        prop_assert!(
            tri.validate_power_condition().is_ok(),
            "{:?}",
            tri.validate_power_condition()
        );
    }

    #[test]
    fn prop_euler_characteristic_is_one(points in prop::collection::vec(point(), 4..=25)) {
        let tri = Triangulation::new(&points).unwrap();
        prop_assert_eq!(euler_characteristic(&tri.f_vector()), 1);
    }

    #[test]
    fn prop_redundant_points_are_not_vertices(points in weighted_cloud()) {
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        let vertices = tri.vertices();
        for i in 0..tri.len() {
            prop_assert_eq!(tri.is_redundant(i), !vertices.contains(&i));
        }
    }
}

// =============================================================================
// ALPHA COMPLEX PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_alpha_complex_is_closed(points in weighted_cloud(), alpha in -2.0..20.0_f64) {
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        let complex = AlphaComplex::new(tri, alpha);
        let (vertices, edges, triangles, tetrahedra) = simplex_sets(&complex);

        for tet in &tetrahedra {
            for face in tet.triangles() {
                prop_assert!(triangles.contains(&face), "missing face {:?} of {:?}", face, tet);
            }
        }
        for triangle in &triangles {
            for edge in triangle.edges() {
                prop_assert!(edges.contains(&edge), "missing edge {:?} of {:?}", edge, triangle);
            }
        }
        for edge in &edges {
            prop_assert!(vertices.contains(&edge.v0()) && vertices.contains(&edge.v1()));
        }
    }

    #[test]
    fn prop_alpha_complex_is_monotone(
        points in weighted_cloud(),
        low in -2.0..10.0_f64,
        step in 0.0..10.0_f64,
    ) {
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        let mut complex = AlphaComplex::new(tri, low);
        let small = simplex_sets(&complex);
        complex.set_alpha(low + step);
        let large = simplex_sets(&complex);

        prop_assert!(small.0.is_subset(&large.0));
        prop_assert!(small.1.is_subset(&large.1));
        prop_assert!(small.2.is_subset(&large.2));
        prop_assert!(small.3.is_subset(&large.3));
    }

    #[test]
    fn prop_alpha_complex_is_a_subcomplex(points in weighted_cloud(), alpha in -2.0..20.0_f64) {
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        let all_edges: BTreeSet<Edge> = tri.edges().iter().copied().collect();
        let all_tets: BTreeSet<Tetrahedron> = tri.tetrahedra().iter().copied().collect();
        let complex = AlphaComplex::new(tri, alpha);

        prop_assert!(complex.edges().iter().all(|e| all_edges.contains(e)));
        prop_assert!(complex.tetrahedra().iter().all(|t| all_tets.contains(t)));
        prop_assert!(complex.volume() <= complex.triangulation().volume() + 1e-9);
    }
}
