//! Alpha complexes of weighted Delaunay triangulations.
//!
//! For a scalar `alpha`, the alpha complex is the subcomplex of the
//! triangulation made of the simplices whose orthosphere is "small and empty"
//! at that scale. Classification runs top-down:
//!
//! 1. **Tetrahedra**: a non-external tetrahedron is in iff its orthoradius is
//!    below `alpha`.
//! 2. **Triangles**: each face is visited once by a depth-first walk over the
//!    neighbor graph. A face of an included tetrahedron is in. Otherwise a
//!    face attached to a real apex on either side is out, and the remaining
//!    faces are in iff their orthoradius is below `alpha`.
//! 3. **Edges**: every edge of an included triangle is in. Other edges are in
//!    iff they are not attached to the third vertex of any triangle of the
//!    triangulation and their orthoradius is below `alpha`.
//! 4. **Vertices**: every endpoint of an included edge is in. Other vertices
//!    are in iff `-w < alpha` and they are not attached to any neighbor.
//!
//! All comparisons are strict, and raising `alpha` never removes a simplex.
//! Results are computed lazily and cached until `alpha` or the triangulation
//! changes.
//!
//! # Examples
//!
//! ```rust
//! use alphasurf::alpha::complex::AlphaComplex;
//! use alphasurf::geometry::point::Point;
//!
//! let points = [
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ];
//! let mut complex = AlphaComplex::from_points(&points, None, 0.2).unwrap();
//! assert_eq!(complex.f_vector().by_dim, vec![4, 0, 0, 0]);
//!
//! // the axis edges have orthoradius 0.25, the diagonal ones 0.5
//! complex.set_alpha(0.3);
//! assert_eq!(complex.f_vector().by_dim, vec![4, 3, 0, 0]);
//!
//! complex.set_alpha(10.0);
//! assert_eq!(complex.f_vector().by_dim, vec![4, 6, 4, 1]);
//! ```

use std::sync::Arc;

use crate::alpha::attachment::{edge_attached, triangle_attached, vertex_attached};
use crate::core::algorithms::insertion::InsertionOutcome;
use crate::core::cache::LazyCache;
use crate::core::collections::{FastHashMap, FastHashSet, SecondaryMap, SmallBuffer};
use crate::core::simplex::{Edge, Tetrahedron, Triangle};
use crate::core::tetrahedron::{Neighbor, TetrahedronKey};
use crate::core::triangulation::{Triangulation, TriangulationError};
use crate::geometry::measures::{tetrahedron_volume, triangle_area};
use crate::geometry::orthogonal::{
    orthocenter2, orthocenter3, orthocenter4, orthoradius2, orthoradius3, orthoradius4,
};
use crate::geometry::point::{Point, WeightedPoint};
use crate::topology::euler::FVector;

/// Errors from alpha complex queries taking vertex indices.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AlphaError {
    /// A vertex index was invalid, or building the triangulation failed.
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),

    /// Orthocenters exist for one to four vertices.
    #[error("Orthocenter of {len} vertices is undefined (expected 1 to 4)")]
    InvalidSimplexSize {
        /// Number of vertices supplied.
        len: usize,
    },
}

#[derive(Clone, Debug, Default)]
struct AlphaCache {
    flags: LazyCache<SecondaryMap<TetrahedronKey, bool>>,
    vertices: LazyCache<Vec<usize>>,
    edges: LazyCache<Vec<Edge>>,
    triangles: LazyCache<Vec<Triangle>>,
    tetrahedra: LazyCache<Vec<Tetrahedron>>,
}

impl AlphaCache {
    fn invalidate(&self) {
        self.flags.invalidate();
        self.vertices.invalidate();
        self.edges.invalidate();
        self.triangles.invalidate();
        self.tetrahedra.invalidate();
    }
}

/// A triangulation filtered by a scalar `alpha`.
#[derive(Clone, Debug)]
pub struct AlphaComplex {
    triangulation: Triangulation,
    alpha: f64,
    cache: AlphaCache,
}

impl AlphaComplex {
    /// Wraps `triangulation` with the given `alpha`.
    #[must_use]
    pub fn new(triangulation: Triangulation, alpha: f64) -> Self {
        Self {
            triangulation,
            alpha,
            cache: AlphaCache::default(),
        }
    }

    /// Triangulates `points` (with optional `weights`) and wraps the result.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError`] if the triangulation cannot be built.
    pub fn from_points(
        points: &[Point],
        weights: Option<&[f64]>,
        alpha: f64,
    ) -> Result<Self, TriangulationError> {
        let triangulation = match weights {
            Some(weights) => Triangulation::with_weights(points, weights)?,
            None => Triangulation::new(points)?,
        };
        Ok(Self::new(triangulation, alpha))
    }

    /// The current `alpha`.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Changes `alpha` and drops every cached classification.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
        self.cache.invalidate();
    }

    /// The underlying triangulation.
    #[must_use]
    pub const fn triangulation(&self) -> &Triangulation {
        &self.triangulation
    }

    /// Consumes the complex, returning the triangulation.
    #[must_use]
    pub fn into_triangulation(self) -> Triangulation {
        self.triangulation
    }

    /// Inserts a point into the triangulation and drops every cached
    /// classification.
    ///
    /// # Errors
    ///
    /// See [`Triangulation::insert`].
    pub fn insert(
        &mut self,
        point: Point,
        weight: f64,
    ) -> Result<InsertionOutcome, TriangulationError> {
        self.cache.invalidate();
        self.triangulation.insert(point, weight)
    }

    // -------------------------------------------------------------------------
    // Per-simplex geometry
    // -------------------------------------------------------------------------

    fn weighted(&self, vertices: &[usize]) -> Result<SmallBuffer<WeightedPoint, 4>, AlphaError> {
        vertices
            .iter()
            .map(|&v| self.triangulation.weighted_point(v).map_err(AlphaError::from))
            .collect()
    }

    /// Orthocenter of one to four input points; a single point is its own
    /// orthocenter.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::InvalidSimplexSize`] for an empty or too long
    /// slice and [`AlphaError::Triangulation`] for an invalid index.
    pub fn orthocenter(&self, vertices: &[usize]) -> Result<Point, AlphaError> {
        match self.weighted(vertices)?.as_slice() {
            [a] => Ok(a.point),
            [a, b] => Ok(orthocenter2(a, b)),
            [a, b, c] => Ok(orthocenter3(a, b, c)),
            [a, b, c, d] => Ok(orthocenter4(a, b, c, d)),
            _ => Err(AlphaError::InvalidSimplexSize {
                len: vertices.len(),
            }),
        }
    }

    /// Orthoradius (power value) of one to four input points. A single
    /// point's orthoradius is `-w`.
    ///
    /// # Errors
    ///
    /// Same as [`orthocenter`](Self::orthocenter).
    pub fn orthoradius(&self, vertices: &[usize]) -> Result<f64, AlphaError> {
        match self.weighted(vertices)?.as_slice() {
            [a] => Ok(-a.weight),
            [a, b] => Ok(orthoradius2(a, b)),
            [a, b, c] => Ok(orthoradius3(a, b, c)),
            [a, b, c, d] => Ok(orthoradius4(a, b, c, d)),
            _ => Err(AlphaError::InvalidSimplexSize {
                len: vertices.len(),
            }),
        }
    }

    /// Whether input point `i` is attached to `j`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::Triangulation`] for an invalid index.
    pub fn vertex_attached(&self, i: usize, j: usize) -> Result<bool, AlphaError> {
        let tri = &self.triangulation;
        Ok(vertex_attached(
            &tri.weighted_point(i)?,
            &tri.weighted_point(j)?,
        ))
    }

    /// Whether edge `ij` is attached to input point `k`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::Triangulation`] for an invalid index.
    pub fn edge_attached(&self, i: usize, j: usize, k: usize) -> Result<bool, AlphaError> {
        let tri = &self.triangulation;
        Ok(edge_attached(
            &tri.weighted_point(i)?,
            &tri.weighted_point(j)?,
            &tri.weighted_point(k)?,
        ))
    }

    /// Whether triangle `ijk` is attached to input point `l`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::Triangulation`] for an invalid index.
    pub fn triangle_attached(
        &self,
        i: usize,
        j: usize,
        k: usize,
        l: usize,
    ) -> Result<bool, AlphaError> {
        let tri = &self.triangulation;
        Ok(triangle_attached(
            &tri.weighted_point(i)?,
            &tri.weighted_point(j)?,
            &tri.weighted_point(k)?,
            &tri.weighted_point(l)?,
        ))
    }

    /// Whether triangle `ijk` is attached to either apex `l` or `m` (the
    /// opposite vertices of its two incident tetrahedra).
    ///
    /// # Errors
    ///
    /// Returns [`AlphaError::Triangulation`] for an invalid index.
    pub fn triangle_attached_either(
        &self,
        [i, j, k]: [usize; 3],
        l: usize,
        m: usize,
    ) -> Result<bool, AlphaError> {
        Ok(self.triangle_attached(i, j, k, l)? || self.triangle_attached(i, j, k, m)?)
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    fn point(&self, v: usize) -> &WeightedPoint {
        self.triangulation.vertex(v)
    }

    fn flags(&self) -> Arc<SecondaryMap<TetrahedronKey, bool>> {
        self.cache.flags.get_or_build(|| {
            let tri = &self.triangulation;
            let mut flags = SecondaryMap::with_capacity(tri.number_of_cells());
            for (key, cell) in tri.cells() {
                let member = !Triangulation::is_external_cell(cell) && {
                    let [a, b, c, d] = cell.vertices().map(|v| *self.point(v));
                    orthoradius4(&a, &b, &c, &d) < self.alpha
                };
                flags.insert(key, member);
            }
            flags
        })
    }

    fn is_member(flags: &SecondaryMap<TetrahedronKey, bool>, neighbor: Neighbor) -> bool {
        neighbor
            .key()
            .and_then(|k| flags.get(k).copied())
            .unwrap_or(false)
    }

    /// Returns `true` if the tetrahedron under `key` is in the complex.
    #[must_use]
    pub fn contains_tetrahedron(&self, key: TetrahedronKey) -> bool {
        Self::is_member(&self.flags(), Neighbor::Tetrahedron(key))
    }

    /// Tetrahedra of the complex, sorted.
    #[must_use]
    pub fn tetrahedra(&self) -> Arc<Vec<Tetrahedron>> {
        self.cache.tetrahedra.get_or_build(|| {
            let flags = self.flags();
            let mut out: Vec<Tetrahedron> = self
                .triangulation
                .cells()
                .filter(|(key, _)| flags.get(*key).copied().unwrap_or(false))
                .map(|(_, cell)| Tetrahedron::new(*cell.vertices()))
                .collect();
            out.sort_unstable();
            tracing::debug!(alpha = self.alpha, count = out.len(), "classified tetrahedra");
            out
        })
    }

    /// Triangles of the complex, sorted.
    #[must_use]
    pub fn triangles(&self) -> Arc<Vec<Triangle>> {
        self.cache.triangles.get_or_build(|| {
            let flags = self.flags();
            let tri = &self.triangulation;
            let mut out = Vec::new();

            let mut done: SecondaryMap<TetrahedronKey, ()> = SecondaryMap::new();
            let mut seen: SecondaryMap<TetrahedronKey, ()> = SecondaryMap::new();
            let mut stack: Vec<TetrahedronKey> = Vec::new();
            if let Some((start, _)) = tri.cells().next() {
                seen.insert(start, ());
                stack.push(start);
            }

            while let Some(key) = stack.pop() {
                let Some(cell) = tri.cell(key) else {
                    continue;
                };
                done.insert(key, ());

                for i in 0..4 {
                    let neighbor = cell.neighbor(i);
                    if let Some(next) = neighbor.key() {
                        if done.contains_key(next) {
                            continue;
                        }
                        if seen.insert(next, ()).is_none() {
                            stack.push(next);
                        }
                    }

                    let face = cell.face(i);
                    if face.iter().any(|&v| Triangulation::is_synthetic(v)) {
                        continue;
                    }
                    if self.face_is_member(&flags, key, cell.vertex(i), neighbor, face) {
                        out.push(Triangle::new(face));
                    }
                }
            }

            out.sort_unstable();
            tracing::debug!(alpha = self.alpha, count = out.len(), "classified triangles");
            out
        })
    }

    /// Classifies the face opposite `apex` in tetrahedron `key`.
    fn face_is_member(
        &self,
        flags: &SecondaryMap<TetrahedronKey, bool>,
        key: TetrahedronKey,
        apex: usize,
        neighbor: Neighbor,
        face: [usize; 3],
    ) -> bool {
        if Self::is_member(flags, Neighbor::Tetrahedron(key)) || Self::is_member(flags, neighbor) {
            return true;
        }

        let [a, b, c] = face.map(|v| self.point(v));
        let other_apex = neighbor
            .key()
            .and_then(|k| self.triangulation.cell(k))
            .and_then(|n| n.face_index(&face).map(|i| n.vertex(i)));
        let attached = [Some(apex), other_apex]
            .into_iter()
            .flatten()
            .filter(|&v| !Triangulation::is_synthetic(v))
            .any(|v| triangle_attached(a, b, c, self.point(v)));

        !attached && orthoradius3(a, b, c) < self.alpha
    }

    /// Edges of the complex, sorted.
    #[must_use]
    pub fn edges(&self) -> Arc<Vec<Edge>> {
        self.cache.edges.get_or_build(|| {
            let tri = &self.triangulation;
            let mut out: FastHashSet<Edge> = self
                .triangles()
                .iter()
                .flat_map(Triangle::edges)
                .collect();

            let mut attached = FastHashSet::default();
            for triangle in tri.triangles().iter() {
                let [a, b, c] = triangle.vertices();
                for (e, apex) in [([a, b], c), ([a, c], b), ([b, c], a)] {
                    if edge_attached(self.point(e[0]), self.point(e[1]), self.point(apex)) {
                        attached.insert(Edge::new(e));
                    }
                }
            }

            for edge in tri.edges().iter() {
                if out.contains(edge) || attached.contains(edge) {
                    continue;
                }
                let [a, b] = edge.vertices();
                if orthoradius2(self.point(a), self.point(b)) < self.alpha {
                    out.insert(*edge);
                }
            }

            let mut out: Vec<Edge> = out.into_iter().collect();
            out.sort_unstable();
            tracing::debug!(alpha = self.alpha, count = out.len(), "classified edges");
            out
        })
    }

    /// Vertices of the complex, ascending.
    #[must_use]
    pub fn vertices(&self) -> Arc<Vec<usize>> {
        self.cache.vertices.get_or_build(|| {
            let tri = &self.triangulation;
            let mut out: FastHashSet<usize> = self
                .edges()
                .iter()
                .flat_map(|e| e.vertices())
                .collect();

            let mut neighbors: FastHashMap<usize, Vec<usize>> = FastHashMap::default();
            for edge in tri.edges().iter() {
                let [a, b] = edge.vertices();
                neighbors.entry(a).or_default().push(b);
                neighbors.entry(b).or_default().push(a);
            }

            for &v in tri.vertices().iter() {
                if out.contains(&v) || -self.point(v).weight >= self.alpha {
                    continue;
                }
                let hidden = neighbors
                    .get(&v)
                    .is_some_and(|adj| adj.iter().any(|&u| vertex_attached(self.point(v), self.point(u))));
                if !hidden {
                    out.insert(v);
                }
            }

            let mut out: Vec<usize> = out.into_iter().collect();
            out.sort_unstable();
            tracing::debug!(alpha = self.alpha, count = out.len(), "classified vertices");
            out
        })
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges().len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles().len()
    }

    /// Number of tetrahedra.
    #[must_use]
    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra().len()
    }

    /// Simplex counts of the complex.
    #[must_use]
    pub fn f_vector(&self) -> FVector {
        FVector::new([
            self.vertex_count(),
            self.edge_count(),
            self.triangle_count(),
            self.tetrahedron_count(),
        ])
    }

    // -------------------------------------------------------------------------
    // Measures
    // -------------------------------------------------------------------------

    /// Total volume of the tetrahedra of the complex.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.tetrahedra()
            .iter()
            .map(|t| {
                let [a, b, c, d] = t.vertices().map(|v| self.point(v).point);
                tetrahedron_volume(&a, &b, &c, &d).abs()
            })
            .sum()
    }

    /// Area of the boundary of the complex: triangles of the complex that
    /// bound fewer than two of its tetrahedra. Dangling triangles count once.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        let mut cofaces: FastHashMap<Triangle, usize> = FastHashMap::default();
        for tet in self.tetrahedra().iter() {
            for face in tet.triangles() {
                *cofaces.entry(face).or_default() += 1;
            }
        }
        self.triangles()
            .iter()
            .filter(|t| cofaces.get(t).copied().unwrap_or(0) < 2)
            .map(|t| {
                let [a, b, c] = t.vertices().map(|v| self.point(v).point);
                triangle_area(&a, &b, &c)
            })
            .sum()
    }
}
