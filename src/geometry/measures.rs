//! Distances, angles, areas and volumes of small point configurations.
//!
//! Angle functions come in two flavours: the plain name returns degrees and
//! the `_radians` suffix returns radians.

use crate::geometry::point::Point;
use crate::geometry::predicates::plane_orientation;
use std::f64::consts::FRAC_PI_2;

// =============================================================================
// DISTANCES
// =============================================================================

/// Euclidean distance between `a` and `b`.
#[inline]
#[must_use]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (*a - *b).norm()
}

/// Squared Euclidean distance between `a` and `b`.
#[inline]
#[must_use]
pub fn distance_squared(a: &Point, b: &Point) -> f64 {
    (*a - *b).norm_squared()
}

/// Midpoint of the segment `ab`.
#[inline]
#[must_use]
pub fn midpoint(a: &Point, b: &Point) -> Point {
    *a + (*b - *a) * 0.5
}

// =============================================================================
// ANGLES
// =============================================================================

/// Angle `abc` at vertex `b`, in degrees.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::measures::angle;
/// use alphasurf::geometry::point::Point;
/// use approx::assert_relative_eq;
///
/// let a = Point::new([1.0, 0.0, 0.0]);
/// let b = Point::new([0.0, 0.0, 0.0]);
/// let c = Point::new([0.0, 1.0, 0.0]);
/// assert_relative_eq!(angle(&a, &b, &c), 90.0);
/// ```
#[must_use]
pub fn angle(a: &Point, b: &Point, c: &Point) -> f64 {
    angle_radians(a, b, c).to_degrees()
}

/// Angle `abc` at vertex `b`, in radians.
#[must_use]
pub fn angle_radians(a: &Point, b: &Point, c: &Point) -> f64 {
    let ba = *b - *a;
    let bc = *b - *c;
    clamped_acos(ba.dot(&bc) / (ba.norm() * bc.norm()))
}

/// Torsion (dihedral) angle of the chain `a-b-c-d`, in degrees.
///
/// The result lies in `(-180, 180]`; the sign follows the right-hand rule
/// around the `bc` axis.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::measures::torsion_angle;
/// use alphasurf::geometry::point::Point;
/// use approx::assert_relative_eq;
///
/// let a = Point::new([1.0, 0.0, 0.0]);
/// let b = Point::new([0.0, 0.0, 0.0]);
/// let c = Point::new([0.0, 0.0, 1.0]);
/// let d = Point::new([0.0, 1.0, 1.0]);
/// assert_relative_eq!(torsion_angle(&a, &b, &c, &d), 90.0, epsilon = 1e-12);
/// ```
#[must_use]
pub fn torsion_angle(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    torsion_angle_radians(a, b, c, d).to_degrees()
}

/// Torsion (dihedral) angle of the chain `a-b-c-d`, in radians.
#[must_use]
pub fn torsion_angle_radians(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    let ab = *b - *a;
    let bc = *c - *b;
    let cd = *d - *c;
    let bc_cd = bc.cross(&cd);
    f64::atan2(bc.norm() * ab.dot(&bc_cd), ab.cross(&bc).dot(&bc_cd))
}

/// Wilson (out-of-plane) angle of `d` against the plane `abc`, in degrees.
///
/// The angle is measured at `b` between the bond `bd` and the plane spanned by
/// `ab` and `bc`.
#[must_use]
pub fn wilson_angle(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    wilson_angle_radians(a, b, c, d).to_degrees()
}

/// Wilson (out-of-plane) angle of `d` against the plane `abc`, in radians.
#[must_use]
pub fn wilson_angle_radians(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    let normal = (*b - *a).cross(&(*c - *b)).normalize();
    let bd = (*d - *b).normalize();
    FRAC_PI_2 - clamped_acos(bd.dot(&normal))
}

fn clamped_acos(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos()
}

// =============================================================================
// AREAS AND VOLUMES
// =============================================================================

/// Area of the triangle `abc`.
#[inline]
#[must_use]
pub fn triangle_area(a: &Point, b: &Point, c: &Point) -> f64 {
    0.5 * (*b - *a).cross(&(*c - *a)).norm()
}

/// Signed volume of the tetrahedron `abcd`.
///
/// Equal to `plane_orientation(a, b, c, d) / 6`; positive for positively
/// oriented tetrahedra.
#[inline]
#[must_use]
pub fn tetrahedron_volume(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    plane_orientation(a, b, c, d) / 6.0
}

// =============================================================================
// TESTS
// =============================================================================
