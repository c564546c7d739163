//! Closed-form area and volume of a union of balls.
//!
//! The union is decomposed by inclusion–exclusion over the alpha complex of
//! the balls at `alpha = 0` (weights are squared radii):
//!
//! ```text
//! A = Σ_v A(B_v) - Σ_e A(B_i ∩ B_j) + Σ_t A(B_i ∩ B_j ∩ B_k) - Σ_T A(B_i ∩ B_j ∩ B_k ∩ B_l)
//! ```
//!
//! and likewise for the volume. Only simplices of the complex contribute,
//! which keeps every intersection term a simple closed-form expression in
//! caps (two balls), double caps (three balls) and triple caps (four balls)
//! cut from each ball by the radical planes of its neighbors.
//!
//! # References
//!
//! - H. Edelsbrunner and P. Fu, "Measuring Space Filling Diagrams and Voids",
//!   Technical Report UIUC-BI-MB-94-01, 1994.
//! - H. Edelsbrunner, "The Union of Balls and its Dual Shape", Discrete and
//!   Computational Geometry 13, 1995.

use std::f64::consts::PI;

use crate::alpha::attachment::{edge_attached, vertex_attached};
use crate::alpha::complex::AlphaComplex;
use crate::geometry::orthogonal::{orthocenter2, orthocenter3, orthocenter4};
use crate::geometry::point::{Point, WeightedPoint};
use crate::geometry::predicates::plane_orientation;

/// Fraction of a full turn of the dihedral angle between the planes `stu`
/// and `stv` along the line `st`.
fn dihedral_fraction(s: &Point, t: &Point, u: &Point, v: &Point) -> f64 {
    let mu = (*u - *s).cross(&(*u - *t));
    let mv = (*v - *s).cross(&(*v - *t));
    let cos = (mu.dot(&mv) / (mu.norm() * mv.norm())).clamp(-1.0, 1.0);
    cos.acos() / (2.0 * PI)
}

/// Intersection measures of balls `(balls[i].point, radii[i])`, where
/// `balls[i].weight == radii[i]²`.
pub(crate) struct BallUnion<'a> {
    balls: &'a [WeightedPoint],
    radii: &'a [f64],
}

impl<'a> BallUnion<'a> {
    pub(crate) const fn new(balls: &'a [WeightedPoint], radii: &'a [f64]) -> Self {
        Self { balls, radii }
    }

    fn center(&self, i: usize) -> &Point {
        &self.balls[i].point
    }

    // -------------------------------------------------------------------------
    // One ball
    // -------------------------------------------------------------------------

    pub(crate) fn ball_area(&self, i: usize) -> f64 {
        4.0 * PI * self.radii[i].powi(2)
    }

    pub(crate) fn ball_volume(&self, i: usize) -> f64 {
        4.0 / 3.0 * PI * self.radii[i].powi(3)
    }

    // -------------------------------------------------------------------------
    // Two balls: the cap of ball i beyond the radical plane of ij
    // -------------------------------------------------------------------------

    fn cap_height(&self, i: usize, j: usize) -> f64 {
        let r = self.radii[i];
        let offset = (*self.center(i) - orthocenter2(&self.balls[i], &self.balls[j])).norm();
        if vertex_attached(&self.balls[i], &self.balls[j]) {
            r + offset
        } else {
            r - offset
        }
    }

    fn cap_area(&self, i: usize, j: usize) -> f64 {
        2.0 * PI * self.radii[i] * self.cap_height(i, j)
    }

    fn disk_radius(&self, i: usize, j: usize) -> f64 {
        let h = self.cap_height(i, j);
        (h * (2.0 * self.radii[i] - h)).max(0.0).sqrt()
    }

    fn disk_length(&self, i: usize, j: usize) -> f64 {
        2.0 * PI * self.disk_radius(i, j)
    }

    fn disk_area(&self, i: usize, j: usize) -> f64 {
        0.5 * self.disk_radius(i, j) * self.disk_length(i, j)
    }

    fn cap_volume(&self, i: usize, j: usize) -> f64 {
        let r = self.radii[i];
        (r * self.cap_area(i, j) - (r - self.cap_height(i, j)) * self.disk_area(i, j)) / 3.0
    }

    /// Area of the two spheres buried inside the other ball.
    pub(crate) fn intersection2_area(&self, i: usize, j: usize) -> f64 {
        self.cap_area(i, j) + self.cap_area(j, i)
    }

    /// Volume of the lens `B_i ∩ B_j`.
    pub(crate) fn intersection2_volume(&self, i: usize, j: usize) -> f64 {
        self.cap_volume(i, j) + self.cap_volume(j, i)
    }

    // -------------------------------------------------------------------------
    // Three balls
    // -------------------------------------------------------------------------

    /// The corner of sphere `i` where the radical planes of `ij` and `ik`
    /// meet it, on the side of the normal `(t - s) × (u - s)`.
    fn triangle_dual(&self, i: usize, j: usize, k: usize) -> Point {
        let y = orthocenter3(&self.balls[i], &self.balls[j], &self.balls[k]);
        let (s, t, u) = (self.center(i), self.center(j), self.center(k));
        let normal = (*t - *s).cross(&(*u - *s));
        let ys = y - *s;
        let s1 = ys.dot(&normal);
        let s2 = normal.norm_squared();
        let s3 = ys.norm_squared();
        let r = self.radii[i];
        let xi = (-s1 + (s1 * s1 - s3 * s2 + r * r * s2).max(0.0).sqrt()) / s2;
        y + normal * xi
    }

    fn segment_angle(&self, i: usize, j: usize, k: usize) -> f64 {
        let dual = self.triangle_dual(i, j, k);
        2.0 * dihedral_fraction(self.center(i), self.center(j), self.center(k), &dual)
    }

    fn segment_length(&self, i: usize, j: usize, k: usize) -> f64 {
        self.segment_angle(i, j, k) * self.disk_length(i, j)
    }

    fn segment_height(&self, i: usize, j: usize, k: usize) -> f64 {
        let (bi, bj, bk) = (&self.balls[i], &self.balls[j], &self.balls[k]);
        let offset = (orthocenter2(bi, bj) - orthocenter3(bi, bj, bk)).norm();
        if edge_attached(bi, bj, bk) {
            self.disk_radius(i, j) + offset
        } else {
            self.disk_radius(i, j) - offset
        }
    }

    fn segment_area(&self, i: usize, j: usize, k: usize) -> f64 {
        let rij = self.disk_radius(i, j);
        let chord = (self.triangle_dual(i, j, k) - self.triangle_dual(i, k, j)).norm();
        0.5 * rij * self.segment_length(i, j, k)
            - 0.5 * (rij - self.segment_height(i, j, k)) * chord
    }

    fn cap2_area(&self, i: usize, j: usize, k: usize) -> f64 {
        let r = self.radii[i];
        let dual = self.triangle_dual(i, j, k);
        let wedge = 0.5 - dihedral_fraction(self.center(i), &dual, self.center(j), self.center(k));
        self.ball_area(i) * wedge
            - 2.0 * PI * r * self.segment_angle(i, j, k) * (r - self.cap_height(i, j))
            - 2.0 * PI * r * self.segment_angle(i, k, j) * (r - self.cap_height(i, k))
    }

    fn cap2_volume(&self, i: usize, j: usize, k: usize) -> f64 {
        let r = self.radii[i];
        r * self.cap2_area(i, j, k) / 3.0
            - (r - self.cap_height(i, j)) * self.segment_area(i, j, k) / 3.0
            - (r - self.cap_height(i, k)) * self.segment_area(i, k, j) / 3.0
    }

    /// Area of the three spheres buried inside both other balls.
    pub(crate) fn intersection3_area(&self, i: usize, j: usize, k: usize) -> f64 {
        self.cap2_area(i, j, k) + self.cap2_area(j, i, k) + self.cap2_area(k, i, j)
    }

    /// Volume of `B_i ∩ B_j ∩ B_k`.
    pub(crate) fn intersection3_volume(&self, i: usize, j: usize, k: usize) -> f64 {
        self.cap2_volume(i, j, k) + self.cap2_volume(j, i, k) + self.cap2_volume(k, i, j)
    }

    // -------------------------------------------------------------------------
    // Four balls
    // -------------------------------------------------------------------------

    fn is_ccw(&self, i: usize, j: usize, k: usize, l: usize) -> bool {
        plane_orientation(self.center(i), self.center(j), self.center(k), self.center(l)) > 0.0
    }

    fn segment2_angle(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let pkj = self.triangle_dual(i, k, j);
        let pjl = self.triangle_dual(i, j, l);
        let (s, t, u, v) = (self.center(i), self.center(j), self.center(k), self.center(l));
        dihedral_fraction(s, t, u, &pkj) + dihedral_fraction(s, t, v, &pjl)
            - dihedral_fraction(s, t, u, v)
    }

    fn segment2_length(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.segment2_angle(i, j, k, l) * self.disk_length(i, j)
    }

    fn segment2_area(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let (k, l) = if self.is_ccw(i, j, k, l) { (k, l) } else { (l, k) };
        let pkj = self.triangle_dual(i, k, j);
        let pjl = self.triangle_dual(i, j, l);
        let y = orthocenter4(&self.balls[i], &self.balls[j], &self.balls[k], &self.balls[l]);
        let rij = self.disk_radius(i, j);
        0.5 * rij * self.segment2_length(i, j, k, l)
            - 0.5 * (rij - self.segment_height(i, j, k)) * (pkj - y).norm()
            - 0.5 * (rij - self.segment_height(i, j, l)) * (pjl - y).norm()
    }

    fn cap3_area(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let (k, l) = if self.is_ccw(i, j, k, l) { (k, l) } else { (l, k) };
        let (s, t, u, v) = (self.center(i), self.center(j), self.center(k), self.center(l));
        let pkj = self.triangle_dual(i, k, j);
        let plk = self.triangle_dual(i, l, k);
        let pjl = self.triangle_dual(i, j, l);

        let rkj = 0.5 - dihedral_fraction(s, &pkj, u, t);
        let rlk = 0.5 - dihedral_fraction(s, &plk, v, u);
        let rjl = 0.5 - dihedral_fraction(s, &pjl, t, v);

        let r = self.radii[i];
        let arcs = self.segment2_angle(i, j, k, l) * (r - self.cap_height(i, j))
            + self.segment2_angle(i, k, l, j) * (r - self.cap_height(i, k))
            + self.segment2_angle(i, l, j, k) * (r - self.cap_height(i, l));
        0.5 * self.ball_area(i) * (rkj + rlk + rjl - 0.5) - 2.0 * PI * r * arcs
    }

    fn cap3_volume(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        let r = self.radii[i];
        r * self.cap3_area(i, j, k, l) / 3.0
            - (r - self.cap_height(i, j)) * self.segment2_area(i, j, k, l) / 3.0
            - (r - self.cap_height(i, k)) * self.segment2_area(i, k, j, l) / 3.0
            - (r - self.cap_height(i, l)) * self.segment2_area(i, l, j, k) / 3.0
    }

    /// Area of the four spheres buried inside all other balls.
    pub(crate) fn intersection4_area(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.cap3_area(i, j, k, l)
            + self.cap3_area(j, i, k, l)
            + self.cap3_area(k, i, j, l)
            + self.cap3_area(l, i, j, k)
    }

    /// Volume of `B_i ∩ B_j ∩ B_k ∩ B_l`.
    pub(crate) fn intersection4_volume(&self, i: usize, j: usize, k: usize, l: usize) -> f64 {
        self.cap3_volume(i, j, k, l)
            + self.cap3_volume(j, i, k, l)
            + self.cap3_volume(k, i, j, l)
            + self.cap3_volume(l, i, j, k)
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Area of the union, summed over the simplices of `complex`.
    pub(crate) fn total_area(&self, complex: &AlphaComplex) -> f64 {
        let balls: f64 = complex.vertices().iter().map(|&v| self.ball_area(v)).sum();
        let pairs: f64 = complex
            .edges()
            .iter()
            .map(|e| self.intersection2_area(e.v0(), e.v1()))
            .sum();
        let triples: f64 = complex
            .triangles()
            .iter()
            .map(|t| {
                let [i, j, k] = t.vertices();
                self.intersection3_area(i, j, k)
            })
            .sum();
        let quadruples: f64 = complex
            .tetrahedra()
            .iter()
            .map(|t| {
                let [i, j, k, l] = t.vertices();
                self.intersection4_area(i, j, k, l)
            })
            .sum();
        balls - pairs + triples - quadruples
    }

    /// Volume of the union, summed over the simplices of `complex`.
    pub(crate) fn total_volume(&self, complex: &AlphaComplex) -> f64 {
        let balls: f64 = complex.vertices().iter().map(|&v| self.ball_volume(v)).sum();
        let pairs: f64 = complex
            .edges()
            .iter()
            .map(|e| self.intersection2_volume(e.v0(), e.v1()))
            .sum();
        let triples: f64 = complex
            .triangles()
            .iter()
            .map(|t| {
                let [i, j, k] = t.vertices();
                self.intersection3_volume(i, j, k)
            })
            .sum();
        let quadruples: f64 = complex
            .tetrahedra()
            .iter()
            .map(|t| {
                let [i, j, k, l] = t.vertices();
                self.intersection4_volume(i, j, k, l)
            })
            .sum();
        balls - pairs + triples - quadruples
    }
}
