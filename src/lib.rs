//! # alphasurf
//!
//! Weighted Delaunay (regular) triangulations in three dimensions, the
//! weighted alpha complexes they support, and exact area and volume of
//! unions of balls such as molecular van der Waals and solvent accessible
//! surfaces.
//!
//! # Features
//!
//! - Incremental Bowyer–Watson insertion of weighted points, with redundant
//!   (hidden) points detected and reported
//! - Vertex, edge, triangle and tetrahedron queries with lazily cached results
//! - Weighted alpha complexes for any `alpha`, including negative values
//! - Analytic union-of-balls area and volume by inclusion–exclusion over the
//!   alpha complex at `alpha = 0`
//! - Cartesian and internal (Z-matrix) coordinate helpers
//! - Serialization/Deserialization of points and options with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use alphasurf::prelude::*;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([1.0, 1.0, 1.0]),
//! ];
//!
//! let tri = Triangulation::new(&points).unwrap();
//! assert_eq!(tri.f_vector(), FVector::new([5, 9, 7, 2]));
//! assert!(tri.validate().is_ok());
//!
//! // Every simplex of the triangulation belongs to a large enough complex.
//! let complex = AlphaComplex::new(tri, 1e6);
//! assert_eq!(complex.tetrahedron_count(), 2);
//! ```
//!
//! # Molecular surfaces
//!
//! ```rust
//! use alphasurf::prelude::*;
//! use approx::assert_relative_eq;
//!
//! let water = vec![
//!     (Point::new([0.0, 0.0, 0.0]), 1.52),
//!     (Point::new([0.757, 0.586, 0.0]), 1.2),
//!     (Point::new([-0.757, 0.586, 0.0]), 1.2),
//! ];
//! let mut surface = SurfaceModel::new(water).unwrap();
//! let vdw = surface.volume().unwrap();
//!
//! surface.set_surface_type(SurfaceType::SolventAccessible);
//! assert!(surface.volume().unwrap() > vdw);
//!
//! // The union never exceeds the sum of its balls.
//! let balls: f64 = (0..3).map(|i| surface.intersection_volume(&[i]).unwrap()).sum();
//! assert!(surface.volume().unwrap() < balls);
//! assert_relative_eq!(surface.radius(0).unwrap(), 1.52 + DEFAULT_PROBE_RADIUS);
//! ```
//!
//! # Triangulation invariants
//!
//! | Invariant | Helper method |
//! |---|---|
//! | Neighbor consistency | [`Triangulation::validate_neighbors`](core::triangulation::Triangulation::validate_neighbors) |
//! | Positive orientation | [`Triangulation::validate_orientation`](core::triangulation::Triangulation::validate_orientation) |
//! | Euler characteristic | [`Triangulation::validate_topology`](core::triangulation::Triangulation::validate_topology) |
//! | Power (weighted Delaunay) condition | [`Triangulation::validate_power_condition`](core::triangulation::Triangulation::validate_power_condition) |
//!
//! ## Limitations
//!
//! 1. **Floating-point predicates** - Orientation and in-sphere tests are
//!    evaluated in plain `f64`. Inputs with many cospherical points may yield
//!    a triangulation that differs from the exact one by flat flips. Insertion
//!    never creates flat tetrahedra, and
//!    [`SurfaceModel`](surface::model::SurfaceModel) refuses to measure a
//!    triangulation that fails validation.
//!
//! 2. **Bounding tetrahedron** - Input coordinates must lie well inside the
//!    synthetic bounding tetrahedron (see
//!    [`TriangulationOptions::bounding_scale`](core::builder::TriangulationOptions)).
//!
//! # References
//!
//! - H. Edelsbrunner, *The union of balls and its dual shape*, Discrete
//!   Comput. Geom. 13 (1995).
//! - H. Edelsbrunner and P. Fu, *Measuring space filling diagrams and voids*,
//!   UIUC-BI-MB-94-01 (1994).

#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// Weighted Delaunay triangulation: points, tetrahedra, insertion and queries.
pub mod core {
    /// Algorithms operating on a triangulation's tetrahedra.
    pub mod algorithms {
        /// Cavity-based insertion of a single weighted point.
        pub mod insertion;
        /// Point location by straight-line walk.
        pub mod locate;
    }
    /// Construction options and their builder.
    pub mod builder;
    /// Lazily built, invalidatable caches.
    pub mod cache;
    /// High-performance collection types.
    pub mod collections;
    pub mod simplex;
    pub mod tetrahedron;
    pub mod triangulation;
    pub mod validation;
}

/// Geometric primitives: points, predicates, orthospheres and coordinates.
pub mod geometry {
    /// Cartesian and internal (Z-matrix) coordinates.
    pub mod coordinates;
    /// Random point generation for tests and benchmarks.
    pub mod generation;
    pub mod measures;
    pub mod orthogonal;
    pub mod point;
    pub mod predicates;
}

/// Combinatorial topology helpers.
pub mod topology {
    /// Simplex counts and the Euler characteristic.
    pub mod euler;
}

/// Weighted alpha complexes.
pub mod alpha {
    pub mod attachment;
    pub mod complex;
}

/// Area and volume of unions of balls.
pub mod surface {
    pub(crate) mod integrals;
    pub mod model;
}

/// A prelude module that re-exports commonly used types and macros.
pub mod prelude {
    pub use crate::alpha::attachment::{edge_attached, triangle_attached, vertex_attached};
    pub use crate::alpha::complex::{AlphaComplex, AlphaError};
    pub use crate::core::algorithms::insertion::{InsertionError, InsertionOutcome};
    pub use crate::core::algorithms::locate::{LocateError, LocateMethod};
    pub use crate::core::builder::{TriangulationOptions, TriangulationOptionsBuilder};
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
        fast_hash_set_with_capacity,
    };
    pub use crate::core::simplex::{Edge, Tetrahedron, Triangle};
    pub use crate::core::tetrahedron::{Cell, Neighbor, TetrahedronKey};
    pub use crate::core::triangulation::{Triangulation, TriangulationError};
    pub use crate::core::validation::ValidationError;
    pub use crate::geometry::coordinates::{
        CartesianCoordinates, CoordinateError, CoordinateSet, DiagramCoordinates,
        InternalCoordinates,
    };
    pub use crate::geometry::generation::{
        PointGenerationError, random_points, random_points_seeded, random_weighted_points_seeded,
    };
    pub use crate::geometry::measures::*;
    pub use crate::geometry::orthogonal::*;
    pub use crate::geometry::point::{Point, Vector, WeightedPoint};
    pub use crate::geometry::predicates::*;
    pub use crate::surface::model::{
        DEFAULT_PROBE_RADIUS, ParticleSource, SurfaceError, SurfaceModel, SurfaceType,
    };
    pub use crate::topology::euler::{FVector, euler_characteristic};

    // Convenience macros
    pub use crate::weighted_point;
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
