//! Weighted circumcenters ("orthocenters") and their power values.
//!
//! For weighted points `(p_i, w_i)` the orthocenter is the point `y` in the
//! affine hull of the `p_i` with equal power distance `|y - p_i|² - w_i` to all
//! of them, and the orthoradius is that common power value. With zero weights
//! these are the circumcenter and the *squared* circumradius.
//!
//! The orthoradius can be negative (the weighted points overlap deeply
//! enough that their orthogonal sphere has imaginary radius); the alpha
//! complex compares it directly against `alpha`.

use crate::geometry::point::{Point, Vector, WeightedPoint};
use nalgebra::Matrix3;

// =============================================================================
// TWO POINTS
// =============================================================================

/// Orthocenter of two weighted points: the point of the segment's line lying
/// on their radical plane.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::orthogonal::orthocenter2;
/// use alphasurf::weighted_point;
///
/// let a = weighted_point!([0.0, 0.0, 0.0]);
/// let b = weighted_point!([2.0, 0.0, 0.0]);
/// assert_eq!(orthocenter2(&a, &b).coords(), &[1.0, 0.0, 0.0]);
/// ```
#[must_use]
pub fn orthocenter2(a: &WeightedPoint, b: &WeightedPoint) -> Point {
    let ab = b.point - a.point;
    let lambda = 0.5 - (a.weight - b.weight) / (2.0 * ab.norm_squared());
    a.point + ab * (1.0 - lambda)
}

/// Power value of [`orthocenter2`] with respect to `a` (and `b`).
#[must_use]
pub fn orthoradius2(a: &WeightedPoint, b: &WeightedPoint) -> f64 {
    a.power(&orthocenter2(a, b))
}

// =============================================================================
// THREE POINTS
// =============================================================================

/// Orthocenter of three weighted points, lying in their plane.
///
/// Solved by Cramer's rule in coordinates relative to `a`:
/// `2(b-a)·y = |b-a|² - (w_b - w_a)`, `2(c-a)·y = |c-a|² - (w_c - w_a)` and
/// `n·y = 0` with `n` the plane normal.
#[must_use]
pub fn orthocenter3(a: &WeightedPoint, b: &WeightedPoint, c: &WeightedPoint) -> Point {
    let ab = b.point - a.point;
    let ac = c.point - a.point;
    let normal = ab.cross(&ac);
    let rows = [ab * 2.0, ac * 2.0, normal];
    let rhs = Vector::new(
        ab.norm_squared() - (b.weight - a.weight),
        ac.norm_squared() - (c.weight - a.weight),
        0.0,
    );
    a.point + cramer(&rows, &rhs)
}

/// Power value of [`orthocenter3`].
#[must_use]
pub fn orthoradius3(a: &WeightedPoint, b: &WeightedPoint, c: &WeightedPoint) -> f64 {
    a.power(&orthocenter3(a, b, c))
}

// =============================================================================
// FOUR POINTS
// =============================================================================

/// Orthocenter of four weighted points (the weighted circumcenter of a
/// tetrahedron).
#[must_use]
pub fn orthocenter4(
    a: &WeightedPoint,
    b: &WeightedPoint,
    c: &WeightedPoint,
    d: &WeightedPoint,
) -> Point {
    let ab = b.point - a.point;
    let ac = c.point - a.point;
    let ad = d.point - a.point;
    let rows = [ab * 2.0, ac * 2.0, ad * 2.0];
    let rhs = Vector::new(
        ab.norm_squared() - (b.weight - a.weight),
        ac.norm_squared() - (c.weight - a.weight),
        ad.norm_squared() - (d.weight - a.weight),
    );
    a.point + cramer(&rows, &rhs)
}

/// Power value of [`orthocenter4`].
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::orthogonal::orthoradius4;
/// use alphasurf::weighted_point;
/// use approx::assert_relative_eq;
///
/// // regular tetrahedron with edge length 2
/// let s = 1.0 / 2.0_f64.sqrt();
/// let a = weighted_point!([s, s, s]);
/// let b = weighted_point!([s, -s, -s]);
/// let c = weighted_point!([-s, s, -s]);
/// let d = weighted_point!([-s, -s, s]);
/// assert_relative_eq!(orthoradius4(&a, &b, &c, &d), 1.5, epsilon = 1e-12);
/// ```
#[must_use]
pub fn orthoradius4(
    a: &WeightedPoint,
    b: &WeightedPoint,
    c: &WeightedPoint,
    d: &WeightedPoint,
) -> f64 {
    a.power(&orthocenter4(a, b, c, d))
}

/// Solves `M y = rhs` where `rows` are the rows of `M`.
fn cramer(rows: &[Vector; 3], rhs: &Vector) -> Vector {
    let m = Matrix3::from_rows(&[rows[0].transpose(), rows[1].transpose(), rows[2].transpose()]);
    let det = m.determinant();
    Vector::from_fn(|j, _| {
        let mut mj = m;
        mj.set_column(j, rhs);
        mj.determinant() / det
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::measures::distance;
    use crate::weighted_point;
    use approx::assert_relative_eq;

    #[test]
    fn orthocenter2_shifts_towards_lighter_point() {
        let a = weighted_point!([0.0, 0.0, 0.0], 1.0);
        let b = weighted_point!([2.0, 0.0, 0.0]);
        let y = orthocenter2(&a, &b);
        // |y|² - 1 = (2 - y)²  =>  y = 1.25
        assert_relative_eq!(y.x(), 1.25, epsilon = 1e-12);
        assert_relative_eq!(a.power(&y), b.power(&y), epsilon = 1e-12);
        assert_relative_eq!(orthoradius2(&a, &b), 0.5625, epsilon = 1e-12);
    }

    #[test]
    fn orthoradius2_negative_for_overlapping_balls() {
        let a = WeightedPoint::from_radius(Point::ORIGIN, 1.2);
        let b = WeightedPoint::from_radius(Point::new([1.0, 0.0, 0.0]), 1.2);
        assert!(orthoradius2(&a, &b) < 0.0);
        let far = WeightedPoint::from_radius(Point::new([3.0, 0.0, 0.0]), 1.2);
        assert!(orthoradius2(&a, &far) > 0.0);
    }

    #[test]
    fn orthocenter3_equal_power() {
        let a = weighted_point!([0.0, 0.0, 0.0], 0.4);
        let b = weighted_point!([2.0, 0.1, 0.0], 1.1);
        let c = weighted_point!([0.5, 1.7, 0.3], 0.2);
        let y = orthocenter3(&a, &b, &c);
        let r = orthoradius3(&a, &b, &c);
        for p in [&a, &b, &c] {
            assert_relative_eq!(p.power(&y), r, epsilon = 1e-12);
        }
        // y lies in the plane of the triangle
        let normal = (b.point - a.point).cross(&(c.point - a.point));
        assert_relative_eq!(normal.dot(&(y - a.point)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn orthocenter3_unweighted_is_circumcenter() {
        let a = weighted_point!([0.0, 0.0, 0.0]);
        let b = weighted_point!([4.0, 0.0, 0.0]);
        let c = weighted_point!([0.0, 3.0, 0.0]);
        let y = orthocenter3(&a, &b, &c);
        assert_relative_eq!(y.x(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(y.y(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(orthoradius3(&a, &b, &c), 6.25, epsilon = 1e-12);
    }

    #[test]
    fn orthocenter4_regular_tetrahedron() {
        let a = weighted_point!([1.0, 1.0, 1.0]);
        let b = weighted_point!([1.0, -1.0, -1.0]);
        let c = weighted_point!([-1.0, 1.0, -1.0]);
        let d = weighted_point!([-1.0, -1.0, 1.0]);
        let y = orthocenter4(&a, &b, &c, &d);
        assert_relative_eq!(distance(&y, &Point::ORIGIN), 0.0, epsilon = 1e-12);
        assert_relative_eq!(orthoradius4(&a, &b, &c, &d), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn orthocenter4_equal_power_weighted() {
        let a = weighted_point!([0.1, 0.2, 0.0], 1.0);
        let b = weighted_point!([2.0, 0.0, 0.3], 0.5);
        let c = weighted_point!([0.3, 1.9, 0.1], 2.0);
        let d = weighted_point!([0.4, 0.6, 2.2], 0.1);
        let y = orthocenter4(&a, &b, &c, &d);
        let r = orthoradius4(&a, &b, &c, &d);
        for p in [&a, &b, &c, &d] {
            assert_relative_eq!(p.power(&y), r, epsilon = 1e-10);
        }
    }
}
