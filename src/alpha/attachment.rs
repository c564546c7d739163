//! Attachment predicates for weighted simplices.
//!
//! A simplex σ is *attached* to a weighted point `p` when `p` has negative
//! power with respect to σ's orthosphere. An attached simplex is never the
//! first simplex of its neighborhood to enter the alpha complex on its own:
//! it enters together with a coface, so the classifier skips its own
//! orthoradius.

use crate::geometry::orthogonal::{orthocenter2, orthocenter3, orthoradius2, orthoradius3};
use crate::geometry::point::WeightedPoint;

/// Returns `true` if vertex `a` is attached to `b`: `a`'s center lies inside
/// the power ball of `b`, `|a - b|² + w_a - w_b < 0`.
///
/// # Examples
///
/// ```rust
/// use alphasurf::alpha::attachment::vertex_attached;
/// use alphasurf::weighted_point;
///
/// let small = weighted_point!([0.5, 0.0, 0.0], 0.1);
/// let big = weighted_point!([0.0, 0.0, 0.0], 1.0);
/// assert!(vertex_attached(&small, &big));
/// assert!(!vertex_attached(&big, &small));
/// ```
#[must_use]
pub fn vertex_attached(a: &WeightedPoint, b: &WeightedPoint) -> bool {
    (a.point - b.point).norm_squared() + a.weight - b.weight < 0.0
}

/// Returns `true` if edge `ab` is attached to `c`.
#[must_use]
pub fn edge_attached(a: &WeightedPoint, b: &WeightedPoint, c: &WeightedPoint) -> bool {
    let center = orthocenter2(a, b);
    c.power(&center) - orthoradius2(a, b) < 0.0
}

/// Returns `true` if triangle `abc` is attached to `d`.
#[must_use]
pub fn triangle_attached(
    a: &WeightedPoint,
    b: &WeightedPoint,
    c: &WeightedPoint,
    d: &WeightedPoint,
) -> bool {
    let center = orthocenter3(a, b, c);
    d.power(&center) - orthoradius3(a, b, c) < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted_point;

    #[test]
    fn unweighted_edge_is_attached_to_points_in_its_diametral_ball() {
        let a = weighted_point!([-1.0, 0.0, 0.0]);
        let b = weighted_point!([1.0, 0.0, 0.0]);
        assert!(edge_attached(&a, &b, &weighted_point!([0.0, 0.9, 0.0])));
        assert!(!edge_attached(&a, &b, &weighted_point!([0.0, 1.1, 0.0])));
        // a heavy point reaches further
        assert!(edge_attached(&a, &b, &weighted_point!([0.0, 1.1, 0.0], 0.5)));
    }

    #[test]
    fn obtuse_triangle_is_attached_to_far_side_apex() {
        let a = weighted_point!([-1.0, 0.0, 0.0]);
        let b = weighted_point!([1.0, 0.0, 0.0]);
        let c = weighted_point!([0.0, 0.2, 0.0]);
        // circumcenter of abc sits at y = -2.4, radius 2.6
        assert!(triangle_attached(&a, &b, &c, &weighted_point!([0.0, -2.4, 1.0])));
        assert!(!triangle_attached(&a, &b, &c, &weighted_point!([0.0, -2.4, 3.0])));
    }

    #[test]
    fn equal_balls_are_not_attached() {
        let a = weighted_point!([0.0, 0.0, 0.0], 1.0);
        let b = weighted_point!([0.1, 0.0, 0.0], 1.0);
        assert!(!vertex_attached(&a, &b));
        assert!(!vertex_attached(&b, &a));
    }
}
