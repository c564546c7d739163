//! Construction options for [`Triangulation`](crate::core::triangulation::Triangulation).
//!
//! # Examples
//!
//! ```rust
//! use alphasurf::core::builder::TriangulationOptionsBuilder;
//! use alphasurf::core::triangulation::Triangulation;
//! use alphasurf::geometry::point::Point;
//!
//! let options = TriangulationOptionsBuilder::default()
//!     .bounding_scale(1e6)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.max_walk_steps, 10_000);
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ];
//! let tri = Triangulation::with_options(&points, None, options).unwrap();
//! assert_eq!(tri.tetrahedra().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Default half-width of the synthetic enclosing tetrahedron.
pub const DEFAULT_BOUNDING_SCALE: f64 = 1e10;

/// Default step budget of the point-location walk.
pub const DEFAULT_MAX_WALK_STEPS: usize = 10_000;

/// Tunables for triangulation construction.
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TriangulationOptions {
    /// Distance scale `S` of the four synthetic vertices `(0, S, 0)`,
    /// `(S, -S, S)`, `(-S, -S, S)` and `(0, -S, -S)`. All input points must
    /// lie well inside the tetrahedron they span.
    #[builder(default = "DEFAULT_BOUNDING_SCALE")]
    pub bounding_scale: f64,
    /// Number of walk steps before point location falls back to a linear
    /// scan over all tetrahedra.
    #[builder(default = "DEFAULT_MAX_WALK_STEPS")]
    pub max_walk_steps: usize,
}

impl TriangulationOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(scale) = self.bounding_scale
            && !(scale.is_finite() && scale > 0.0)
        {
            return Err(format!("bounding_scale must be positive and finite, got {scale}"));
        }
        Ok(())
    }
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            bounding_scale: DEFAULT_BOUNDING_SCALE,
            max_walk_steps: DEFAULT_MAX_WALK_STEPS,
        }
    }
}
