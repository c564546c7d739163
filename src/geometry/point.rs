//! Data and operations on 3D points and weighted points.
//!
//! A [`Point`] is an immutable triple of `f64` coordinates. Arithmetic is
//! delegated to [`nalgebra::Vector3`]: subtracting two points yields a vector,
//! and a point can be translated by a vector.
//!
//! A [`WeightedPoint`] pairs a point with a scalar weight. In a regular
//! (weighted Delaunay) triangulation the weight acts as a squared radius, so
//! the power distance from a location `x` is `|x - p|² - w`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Vector type used for all point differences.
pub type Vector = Vector3<f64>;

// =============================================================================
// POINT
// =============================================================================

/// A point in three-dimensional space.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0, 3.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
/// assert_eq!(p.y(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coords: [f64; 3],
}

impl Point {
    /// The origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new([0.0, 0.0, 0.0]);

    /// Creates a point from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [f64; 3]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the coordinate array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[f64; 3] {
        &self.coords
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// The z coordinate.
    #[inline]
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Returns the position vector of this point (its offset from the origin).
    #[inline]
    #[must_use]
    pub fn to_vector(&self) -> Vector {
        Vector::new(self.coords[0], self.coords[1], self.coords[2])
    }

    /// Builds a point from a position vector.
    #[inline]
    #[must_use]
    pub fn from_vector(v: &Vector) -> Self {
        Self::new([v.x, v.y, v.z])
    }

    /// Returns `true` if every coordinate is finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use alphasurf::geometry::point::Point;
    ///
    /// assert!(Point::new([1.0, 2.0, 3.0]).is_finite());
    /// assert!(!Point::new([f64::NAN, 0.0, 0.0]).is_finite());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }
}

impl From<[f64; 3]> for Point {
    #[inline]
    fn from(coords: [f64; 3]) -> Self {
        Self::new(coords)
    }
}

impl From<Point> for [f64; 3] {
    #[inline]
    fn from(p: Point) -> Self {
        p.coords
    }
}

impl Sub for Point {
    type Output = Vector;

    #[inline]
    fn sub(self, rhs: Self) -> Vector {
        Vector::new(
            self.coords[0] - rhs.coords[0],
            self.coords[1] - rhs.coords[1],
            self.coords[2] - rhs.coords[2],
        )
    }
}

impl Add<Vector> for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Vector) -> Self {
        Self::new([
            self.coords[0] + rhs.x,
            self.coords[1] + rhs.y,
            self.coords[2] + rhs.z,
        ])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.coords[0], self.coords[1], self.coords[2])
    }
}

// =============================================================================
// WEIGHTED POINT
// =============================================================================

/// A point carrying a scalar weight, conventionally a squared radius.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::point::{Point, WeightedPoint};
///
/// let wp = WeightedPoint::new(Point::new([0.0, 0.0, 0.0]), 4.0);
/// // power distance of a location two units away is zero
/// assert_eq!(wp.power(&Point::new([2.0, 0.0, 0.0])), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedPoint {
    /// Position of the point.
    pub point: Point,
    /// Weight of the point.
    pub weight: f64,
}

impl WeightedPoint {
    /// Creates a weighted point.
    #[inline]
    #[must_use]
    pub const fn new(point: Point, weight: f64) -> Self {
        Self { point, weight }
    }

    /// Creates a weighted point whose weight is `radius²`.
    #[inline]
    #[must_use]
    pub fn from_radius(point: Point, radius: f64) -> Self {
        Self::new(point, radius * radius)
    }

    /// Creates a point with weight zero.
    #[inline]
    #[must_use]
    pub const fn unweighted(point: Point) -> Self {
        Self::new(point, 0.0)
    }

    /// Power distance `|x - p|² - w` of `x` with respect to this point.
    #[inline]
    #[must_use]
    pub fn power(&self, x: &Point) -> f64 {
        (*x - self.point).norm_squared() - self.weight
    }
}

impl From<Point> for WeightedPoint {
    #[inline]
    fn from(point: Point) -> Self {
        Self::unweighted(point)
    }
}

/// Convenience macro for building a [`WeightedPoint`].
///
/// The weight defaults to zero when omitted.
///
/// # Examples
///
/// ```rust
/// use alphasurf::weighted_point;
///
/// let a = weighted_point!([0.0, 1.0, 2.0]);
/// let b = weighted_point!([0.0, 1.0, 2.0], 2.25);
/// assert_eq!(a.weight, 0.0);
/// assert_eq!(b.weight, 2.25);
/// ```
#[macro_export]
macro_rules! weighted_point {
    ($coords:expr) => {
        $crate::geometry::point::WeightedPoint::unweighted(
            $crate::geometry::point::Point::new($coords),
        )
    };
    ($coords:expr, $weight:expr) => {
        $crate::geometry::point::WeightedPoint::new(
            $crate::geometry::point::Point::new($coords),
            $weight,
        )
    };
}

// =============================================================================
// TESTS
// =============================================================================
