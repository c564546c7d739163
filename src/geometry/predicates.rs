//! Geometric predicates for 3D (weighted) Delaunay triangulations.
//!
//! This module provides the two determinant predicates the triangulation is
//! built on:
//!
//! - [`plane_orientation`]: which side of an oriented plane a point lies on
//! - [`sphere_orientation`] / [`weighted_sphere_orientation`]: whether a point
//!   lies inside the circumsphere (power sphere) of a tetrahedron
//!
//! plus the enum-valued wrappers [`orientation`] and [`insphere`].
//!
//! # Conditioning
//!
//! Both determinants are invariant under translation, so they can be expanded
//! around any one of their input points. The expansion point is chosen to
//! minimise the product of the difference-row norms. For a tetrahedron with
//! one vertex at `1e10` and three near the origin this keeps the large
//! coordinates in a single row instead of all of them, which is what makes the
//! far-away synthetic vertices of a triangulation usable in plain `f64`.
//!
//! The 4×4 lifted determinant is then expanded by cofactors along the row
//! with the largest entry, recursively. A far vertex's row is expanded first
//! and multiplies minors built from near points only, which stay accurate.
//! Row reduction would instead mix that row's rounding error into every
//! pivot, and two tetrahedra sharing a face could disagree about a point
//! coplanar with it.

use crate::geometry::point::{Point, Vector, WeightedPoint};
use std::fmt;

// =============================================================================
// RESULT ENUMS
// =============================================================================

/// Represents the position of a point relative to a circumsphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InSphere {
    /// The point is outside the sphere
    OUTSIDE,
    /// The point lies exactly on the sphere
    BOUNDARY,
    /// The point is inside the sphere
    INSIDE,
}

impl fmt::Display for InSphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// The tetrahedron has negative orientation (determinant < 0)
    NEGATIVE,
    /// The four points are coplanar (determinant = 0)
    DEGENERATE,
    /// The tetrahedron has positive orientation (determinant > 0)
    POSITIVE,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

// =============================================================================
// DETERMINANT PREDICATES
// =============================================================================

/// Returns six times the signed volume of the tetrahedron `(a, b, c, p)`.
///
/// This is the determinant of the 3×3 matrix with rows `a - p`, `b - p` and
/// `c - p`. A positive value means `p` lies on the positive side of the
/// oriented plane through `a`, `b`, `c`; zero means the four points are
/// coplanar.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::point::Point;
/// use alphasurf::geometry::predicates::plane_orientation;
///
/// let a = Point::new([0.0, 0.0, 0.0]);
/// let b = Point::new([1.0, 0.0, 0.0]);
/// let c = Point::new([0.0, 1.0, 0.0]);
/// let below = Point::new([0.0, 0.0, -1.0]);
/// let above = Point::new([0.0, 0.0, 1.0]);
///
/// assert!(plane_orientation(&a, &b, &c, &below) > 0.0);
/// assert!(plane_orientation(&a, &b, &c, &above) < 0.0);
/// ```
#[must_use]
pub fn plane_orientation(a: &Point, b: &Point, c: &Point, p: &Point) -> f64 {
    let pts = [a, b, c, p];

    let mut base = 3;
    let mut best = f64::INFINITY;
    for k in 0..4 {
        let cost: f64 = (1..4)
            .map(|m| (*pts[(k + m) % 4] - *pts[k]).norm_squared())
            .product();
        if cost < best {
            best = cost;
            base = k;
        }
    }

    let rows: [Vector; 3] = std::array::from_fn(|m| *pts[(base + 1 + m) % 4] - *pts[base]);
    let det = rows[0].dot(&rows[1].cross(&rows[2]));

    // a cyclic shift of four rows is an odd permutation
    if base % 2 == 0 { -det } else { det }
}

/// Returns the lifted in-sphere determinant of `p` against the circumsphere of
/// `a`, `b`, `c`, `d`.
///
/// Positive means `p` is inside the sphere when
/// `plane_orientation(a, b, c, d) > 0`; the sign flips with the orientation
/// of the tetrahedron.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::point::Point;
/// use alphasurf::geometry::predicates::{plane_orientation, sphere_orientation};
///
/// let a = Point::new([1.0, 1.0, 1.0]);
/// let b = Point::new([1.0, -1.0, -1.0]);
/// let c = Point::new([-1.0, 1.0, -1.0]);
/// let d = Point::new([-1.0, -1.0, 1.0]);
/// assert!(plane_orientation(&a, &b, &c, &d) > 0.0);
///
/// let center = Point::new([0.0, 0.0, 0.0]);
/// let far = Point::new([5.0, 5.0, 5.0]);
/// assert!(sphere_orientation(&a, &b, &c, &d, &center) > 0.0);
/// assert!(sphere_orientation(&a, &b, &c, &d, &far) < 0.0);
/// ```
#[must_use]
pub fn sphere_orientation(a: &Point, b: &Point, c: &Point, d: &Point, p: &Point) -> f64 {
    weighted_sphere_orientation(
        &WeightedPoint::unweighted(*a),
        &WeightedPoint::unweighted(*b),
        &WeightedPoint::unweighted(*c),
        &WeightedPoint::unweighted(*d),
        &WeightedPoint::unweighted(*p),
    )
}

/// Returns the lifted power-sphere determinant of `p` against `a`, `b`, `c`,
/// `d`.
///
/// Each row is `(q - p, |q - p|² - (w_q - w_p))`. With all weights zero this
/// is [`sphere_orientation`].
#[must_use]
pub fn weighted_sphere_orientation(
    a: &WeightedPoint,
    b: &WeightedPoint,
    c: &WeightedPoint,
    d: &WeightedPoint,
    p: &WeightedPoint,
) -> f64 {
    let pts = [a, b, c, d, p];

    let lifted_row = |k: usize, q: usize| -> [f64; 4] {
        let t = pts[q].point - pts[k].point;
        [
            t.x,
            t.y,
            t.z,
            t.norm_squared() - (pts[q].weight - pts[k].weight),
        ]
    };

    let mut base = 4;
    let mut best = f64::INFINITY;
    for k in 0..5 {
        let cost: f64 = (1..5)
            .map(|m| lifted_row(k, (k + m) % 5).iter().map(|x| x * x).sum::<f64>())
            .product();
        if cost < best {
            best = cost;
            base = k;
        }
    }

    // a cyclic shift of five rows is an even permutation, no sign fix-up
    let rows: [[f64; 4]; 4] = std::array::from_fn(|m| lifted_row(base, (base + 1 + m) % 5));
    determinant4(&rows)
}

// =============================================================================
// COFACTOR EXPANSION
// =============================================================================

/// Index of the row holding the entry of largest magnitude.
fn dominant_row<const N: usize>(m: &[[f64; N]; N]) -> usize {
    let mut best = 0;
    let mut largest = f64::NEG_INFINITY;
    for (i, row) in m.iter().enumerate() {
        let size = row.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
        if size > largest {
            largest = size;
            best = i;
        }
    }
    best
}

/// `m` without row `row` and column `col`. `M` must be `N - 1`.
fn minor<const N: usize, const M: usize>(
    m: &[[f64; N]; N],
    row: usize,
    col: usize,
) -> [[f64; M]; M] {
    let mut out = [[0.0; M]; M];
    for (oi, i) in (0..N).filter(|&i| i != row).enumerate() {
        for (oj, j) in (0..N).filter(|&j| j != col).enumerate() {
            out[oi][oj] = m[i][j];
        }
    }
    out
}

const fn cofactor_sign(row: usize, col: usize) -> f64 {
    if (row + col) % 2 == 0 { 1.0 } else { -1.0 }
}

fn determinant3(m: &[[f64; 3]; 3]) -> f64 {
    let r = dominant_row(m);
    (0..3)
        .map(|c| {
            let [[a, b], [d, e]] = minor::<3, 2>(m, r, c);
            cofactor_sign(r, c) * m[r][c] * (a * e - b * d)
        })
        .sum()
}

fn determinant4(m: &[[f64; 4]; 4]) -> f64 {
    let r = dominant_row(m);
    (0..4)
        .map(|c| cofactor_sign(r, c) * m[r][c] * determinant3(&minor::<4, 3>(m, r, c)))
        .sum()
}

// =============================================================================
// ENUM-VALUED WRAPPERS
// =============================================================================

/// Classifies the orientation of the tetrahedron `(a, b, c, d)`.
#[must_use]
pub fn orientation(a: &Point, b: &Point, c: &Point, d: &Point) -> Orientation {
    let det = plane_orientation(a, b, c, d);
    if det > 0.0 {
        Orientation::POSITIVE
    } else if det < 0.0 {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Classifies `p` against the power sphere of the tetrahedron `(a, b, c, d)`.
///
/// The result does not depend on the vertex order of the tetrahedron.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::predicates::{InSphere, insphere};
/// use alphasurf::weighted_point;
///
/// let a = weighted_point!([1.0, 1.0, 1.0]);
/// let b = weighted_point!([1.0, -1.0, -1.0]);
/// let c = weighted_point!([-1.0, 1.0, -1.0]);
/// let d = weighted_point!([-1.0, -1.0, 1.0]);
///
/// assert_eq!(insphere(&b, &a, &c, &d, &weighted_point!([0.1, 0.0, 0.0])), InSphere::INSIDE);
/// assert_eq!(insphere(&a, &b, &c, &d, &weighted_point!([3.0, 0.0, 0.0])), InSphere::OUTSIDE);
/// // a heavy enough point conflicts even from outside the circumsphere
/// assert_eq!(insphere(&a, &b, &c, &d, &weighted_point!([3.0, 0.0, 0.0], 20.0)), InSphere::INSIDE);
/// ```
#[must_use]
pub fn insphere(
    a: &WeightedPoint,
    b: &WeightedPoint,
    c: &WeightedPoint,
    d: &WeightedPoint,
    p: &WeightedPoint,
) -> InSphere {
    let orient = plane_orientation(&a.point, &b.point, &c.point, &d.point);
    let det = weighted_sphere_orientation(a, b, c, d, p);
    let signed = if orient < 0.0 { -det } else { det };

    if signed > 0.0 {
        InSphere::INSIDE
    } else if signed < 0.0 {
        InSphere::OUTSIDE
    } else {
        InSphere::BOUNDARY
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted_point;
    use approx::assert_relative_eq;

    fn textbook_orientation(a: &Point, b: &Point, c: &Point, p: &Point) -> f64 {
        let t = *a - *p;
        let u = *b - *p;
        let v = *c - *p;
        t.dot(&u.cross(&v))
    }

    fn regular_tetrahedron() -> [Point; 4] {
        [
            Point::new([1.0, 1.0, 1.0]),
            Point::new([1.0, -1.0, -1.0]),
            Point::new([-1.0, 1.0, -1.0]),
            Point::new([-1.0, -1.0, 1.0]),
        ]
    }

    #[test]
    fn plane_orientation_matches_textbook_determinant() {
        let pts = [
            Point::new([0.3, -1.2, 0.8]),
            Point::new([2.1, 0.4, -0.6]),
            Point::new([-0.7, 1.9, 0.2]),
            Point::new([0.5, 0.5, 2.5]),
        ];
        let expected = textbook_orientation(&pts[0], &pts[1], &pts[2], &pts[3]);
        let actual = plane_orientation(&pts[0], &pts[1], &pts[2], &pts[3]);
        assert_relative_eq!(actual, expected, epsilon = 1e-12);
    }

    #[test]
    fn plane_orientation_is_stable_with_far_vertex() {
        // three points near the origin and one at 1e10
        let a = Point::new([0.054, 0.099, 0.993]);
        let b = Point::new([0.066, 0.756, 0.910]);
        let c = Point::new([0.076, 0.578, 0.408]);
        let far = Point::new([0.0, 1e10, 0.0]);
        let far_other = Point::new([1e10, -1e10, 1e10]);

        // reference values from exact rational arithmetic
        let s1 = plane_orientation(&a, &b, &c, &far);
        let s2 = plane_orientation(&a, &b, &c, &far_other);
        assert_relative_eq!(s1, -51_940_000.026_738_636, max_relative = 1e-9);
        assert_relative_eq!(s2, 3_584_879_999.973_262, max_relative = 1e-9);
    }

    #[test]
    fn orientation_flips_under_swap() {
        let [a, b, c, d] = regular_tetrahedron();
        assert_eq!(orientation(&a, &b, &c, &d), Orientation::POSITIVE);
        assert_eq!(orientation(&b, &a, &c, &d), Orientation::NEGATIVE);
        let e = Point::new([0.5, 0.5, 0.0]);
        let f = Point::new([1.5, 0.5, 0.0]);
        assert_eq!(
            orientation(&Point::ORIGIN, &e, &f, &Point::new([3.0, 1.0, 0.0])),
            Orientation::DEGENERATE
        );
    }

    #[test]
    fn sphere_orientation_sign_convention() {
        let [a, b, c, d] = regular_tetrahedron();
        assert!(plane_orientation(&a, &b, &c, &d) > 0.0);
        assert!(sphere_orientation(&a, &b, &c, &d, &Point::ORIGIN) > 0.0);
        assert!(sphere_orientation(&a, &b, &c, &d, &Point::new([0.0, 0.0, 2.0])) < 0.0);
        // swapping two vertices flips the sign
        assert!(sphere_orientation(&b, &a, &c, &d, &Point::ORIGIN) < 0.0);
    }

    #[test]
    fn sphere_orientation_zero_on_sphere() {
        let [a, b, c, d] = regular_tetrahedron();
        let on = Point::new([3.0_f64.sqrt(), 0.0, 0.0]);
        assert_relative_eq!(sphere_orientation(&a, &b, &c, &d, &on), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn weighted_sphere_reduces_to_unweighted() {
        let [a, b, c, d] = regular_tetrahedron();
        let p = Point::new([0.2, -0.3, 0.4]);
        let unweighted = sphere_orientation(&a, &b, &c, &d, &p);
        let weighted = weighted_sphere_orientation(
            &a.into(),
            &b.into(),
            &c.into(),
            &d.into(),
            &p.into(),
        );
        assert_relative_eq!(unweighted, weighted, epsilon = 1e-12);
    }

    #[test]
    fn insphere_respects_weights() {
        let [a, b, c, d] = regular_tetrahedron().map(WeightedPoint::unweighted);
        let p = weighted_point!([0.0, 0.0, 1.6]);
        assert_eq!(insphere(&a, &b, &c, &d, &p), InSphere::INSIDE);

        // a negative weight shrinks the point below the power sphere
        let light = weighted_point!([0.0, 0.0, 1.0], -5.0);
        assert_eq!(insphere(&a, &b, &c, &d, &light), InSphere::OUTSIDE);

        // lowering the vertices' weights enlarges the power sphere
        let heavy = [a, b, c, d].map(|v| WeightedPoint::new(v.point, -4.0));
        let outside = weighted_point!([0.0, 0.0, 2.5]);
        assert_eq!(insphere(&a, &b, &c, &d, &outside), InSphere::OUTSIDE);
        assert_eq!(
            insphere(&heavy[0], &heavy[1], &heavy[2], &heavy[3], &outside),
            InSphere::INSIDE
        );
    }

    #[test]
    fn cofactor_expansion_matches_row_reduction() {
        let m = [
            [2.0, -1.0, 0.5, 3.0],
            [0.25, 4.0, -2.0, 1.0],
            [1.5, 0.0, 3.0, -1.0],
            [-3.0, 2.0, 1.0, 0.5],
        ];
        let reference = nalgebra::Matrix4::from_fn(|i, j| m[i][j]).determinant();
        assert_relative_eq!(determinant4(&m), reference, max_relative = 1e-12);
        assert_eq!(dominant_row(&m), 1);
    }

    #[test]
    fn tetrahedra_sharing_a_face_agree_on_coplanar_points() {
        // face (a, b, c) lies in z = 0.7, closed off by a far vertex on each side
        let s = 1e10;
        let a = weighted_point!([1.3, 0.2, 0.7]);
        let b = weighted_point!([0.4, 1.1, 0.7]);
        let c = weighted_point!([2.0, 1.5, 0.7]);
        let below = weighted_point!([0.0, -s, -s]);
        let above = weighted_point!([s, -s, s]);

        let outside = weighted_point!([1.1, -1.2, 0.7]);
        assert_eq!(insphere(&below, &a, &b, &c, &outside), InSphere::OUTSIDE);
        assert_eq!(insphere(&a, &above, &b, &c, &outside), InSphere::OUTSIDE);

        let inside = weighted_point!([1.2, 0.9, 0.7]);
        assert_eq!(insphere(&below, &a, &b, &c, &inside), InSphere::INSIDE);
        assert_eq!(insphere(&a, &above, &b, &c, &inside), InSphere::INSIDE);
    }

    #[test]
    fn enum_display() {
        assert_eq!(InSphere::INSIDE.to_string(), "INSIDE");
        assert_eq!(Orientation::DEGENERATE.to_string(), "DEGENERATE");
    }
}
