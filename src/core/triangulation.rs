//! Incremental weighted Delaunay (regular) triangulation in three dimensions.
//!
//! The triangulation owns the input points and a slot-map arena of
//! tetrahedra with full neighbor adjacency. Construction starts from a single
//! tetrahedron spanned by four synthetic vertices placed far outside the data
//! (see [`TriangulationOptions::bounding_scale`]) and inserts the input points
//! one at a time in order:
//!
//! 1. locate the tetrahedron containing the point (walk, then linear scan);
//! 2. grow the conflict cavity breadth-first with the power-sphere test;
//! 3. replace the cavity by a star of tetrahedra around the new vertex.
//!
//! A weighted point whose located tetrahedron is not in conflict is
//! *redundant*: its ball is hidden by its neighbors, it leaves the mesh
//! unchanged and never appears as a vertex. A vertex whose whole star is
//! swallowed by the cavity of a later, heavier point becomes redundant too.
//!
//! Tetrahedra touching a synthetic vertex are *external*. Synthetic vertices
//! never appear in a public query: [`Triangulation::tetrahedra`] lists only
//! non-external tetrahedra, while [`Triangulation::edges`] and
//! [`Triangulation::triangles`] list every all-real simplex of any tetrahedron.
//!
//! # Examples
//!
//! ```rust
//! use alphasurf::core::triangulation::Triangulation;
//! use alphasurf::geometry::point::Point;
//!
//! let points = vec![
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//!     Point::new([1.0, 1.0, 1.0]),
//! ];
//! let tri = Triangulation::new(&points).unwrap();
//!
//! assert_eq!(tri.vertices().len(), 5);
//! assert_eq!(tri.tetrahedra().len(), 2);
//! assert!(tri.validate().is_ok());
//! ```

use std::sync::Arc;

use crate::core::algorithms::insertion::{InsertionError, InsertionOutcome, insert_vertex};
use crate::core::algorithms::locate::{LocateError, LocateMethod, locate};
use crate::core::builder::TriangulationOptions;
use crate::core::cache::LazyCache;
use crate::core::collections::{FastHashSet, StorageMap};
use crate::core::simplex::{Edge, Tetrahedron, Triangle};
use crate::core::tetrahedron::{Cell, Neighbor, TetrahedronKey};
use crate::geometry::measures::{tetrahedron_volume, triangle_area};
use crate::geometry::point::{Point, WeightedPoint};
use crate::geometry::predicates::plane_orientation;
use crate::topology::euler::FVector;

/// Index of the first synthetic vertex. Synthetic vertices use the four
/// largest indices so that input indices stay stable when points are
/// appended.
pub(crate) const FIRST_SYNTHETIC: usize = usize::MAX - 3;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from building or extending a triangulation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TriangulationError {
    /// An input coordinate or weight is NaN or infinite.
    #[error("Point {index} has a non-finite coordinate or weight: {point} (weight {weight})")]
    NonFiniteCoordinate {
        /// Input index of the point.
        index: usize,
        /// The offending position.
        point: Point,
        /// The offending weight.
        weight: f64,
    },

    /// Weights were supplied but their count differs from the point count.
    #[error("Got {weights} weights for {points} points")]
    WeightCountMismatch {
        /// Number of points.
        points: usize,
        /// Number of weights.
        weights: usize,
    },

    /// A caller-supplied vertex index is not an input index.
    #[error("Vertex index {index} out of range for triangulation of {len} points")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of input points.
        len: usize,
    },

    /// Inserting a point failed.
    #[error("Failed to insert point {index}: {source}")]
    Insertion {
        /// Input index of the point.
        index: usize,
        /// The underlying insertion error.
        #[source]
        source: InsertionError,
    },
}

// =============================================================================
// TRIANGULATION
// =============================================================================

#[derive(Clone, Debug, Default)]
struct SimplexCache {
    vertices: LazyCache<Vec<usize>>,
    edges: LazyCache<Vec<Edge>>,
    triangles: LazyCache<Vec<Triangle>>,
    tetrahedra: LazyCache<Vec<Tetrahedron>>,
}

/// A three-dimensional weighted Delaunay triangulation.
#[derive(Clone, Debug)]
pub struct Triangulation {
    points: Vec<WeightedPoint>,
    synthetic: [WeightedPoint; 4],
    cells: StorageMap<TetrahedronKey, Cell>,
    last_created: Option<TetrahedronKey>,
    redundant: FastHashSet<usize>,
    options: TriangulationOptions,
    cache: SimplexCache,
}

impl Triangulation {
    /// Creates an empty triangulation: the single synthetic tetrahedron.
    #[must_use]
    pub fn empty(options: TriangulationOptions) -> Self {
        let s = options.bounding_scale;
        let synthetic = [
            Point::new([0.0, s, 0.0]),
            Point::new([s, -s, s]),
            Point::new([-s, -s, s]),
            Point::new([0.0, -s, -s]),
        ]
        .map(WeightedPoint::unweighted);

        let mut vertices = [
            FIRST_SYNTHETIC,
            FIRST_SYNTHETIC + 1,
            FIRST_SYNTHETIC + 2,
            FIRST_SYNTHETIC + 3,
        ];
        if plane_orientation(
            &synthetic[0].point,
            &synthetic[1].point,
            &synthetic[2].point,
            &synthetic[3].point,
        ) < 0.0
        {
            vertices.swap(0, 1);
        }

        let mut cells = StorageMap::with_key();
        let seed = cells.insert(Cell::new(vertices));

        Self {
            points: Vec::new(),
            synthetic,
            cells,
            last_created: Some(seed),
            redundant: FastHashSet::default(),
            options,
            cache: SimplexCache::default(),
        }
    }

    /// Triangulates unweighted points with default options.
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options).
    pub fn new(points: &[Point]) -> Result<Self, TriangulationError> {
        Self::with_options(points, None, TriangulationOptions::default())
    }

    /// Triangulates points with per-point weights and default options.
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options).
    pub fn with_weights(points: &[Point], weights: &[f64]) -> Result<Self, TriangulationError> {
        Self::with_options(points, Some(weights), TriangulationOptions::default())
    }

    /// Triangulates weighted points with default options.
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options).
    pub fn from_weighted_points(points: &[WeightedPoint]) -> Result<Self, TriangulationError> {
        let mut tri = Self::empty(TriangulationOptions::default());
        tri.extend(points.iter().copied())?;
        Ok(tri)
    }

    /// Triangulates `points` (weight zero when `weights` is `None`).
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::WeightCountMismatch`] if `weights` has the
    ///   wrong length.
    /// - [`TriangulationError::NonFiniteCoordinate`] for a NaN or infinite
    ///   input.
    /// - [`TriangulationError::Insertion`] if a point cannot be located (for
    ///   example because it lies outside the synthetic bounding tetrahedron)
    ///   or the mesh becomes inconsistent.
    pub fn with_options(
        points: &[Point],
        weights: Option<&[f64]>,
        options: TriangulationOptions,
    ) -> Result<Self, TriangulationError> {
        if let Some(weights) = weights
            && weights.len() != points.len()
        {
            return Err(TriangulationError::WeightCountMismatch {
                points: points.len(),
                weights: weights.len(),
            });
        }

        let mut tri = Self::empty(options);
        tri.extend(points.iter().enumerate().map(|(i, &p)| {
            let w = weights.map_or(0.0, |w| w[i]);
            WeightedPoint::new(p, w)
        }))?;
        Ok(tri)
    }

    /// Inserts every point of `points` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing point; see [`insert`](Self::insert).
    pub fn extend(
        &mut self,
        points: impl IntoIterator<Item = WeightedPoint>,
    ) -> Result<(), TriangulationError> {
        let points = points.into_iter();
        self.points.reserve(points.size_hint().0);
        for p in points {
            self.insert_weighted(p)?;
        }
        Ok(())
    }

    /// Appends a point with the given weight and inserts it. The point gets
    /// the next input index, [`len`](Self::len) before the call.
    ///
    /// # Errors
    ///
    /// - [`TriangulationError::NonFiniteCoordinate`] for a NaN or infinite
    ///   input; the point is not appended.
    /// - [`TriangulationError::Insertion`] if location or rewiring fails.
    pub fn insert(
        &mut self,
        point: Point,
        weight: f64,
    ) -> Result<InsertionOutcome, TriangulationError> {
        self.insert_weighted(WeightedPoint::new(point, weight))
    }

    fn insert_weighted(
        &mut self,
        point: WeightedPoint,
    ) -> Result<InsertionOutcome, TriangulationError> {
        let index = self.points.len();
        if !(point.point.is_finite() && point.weight.is_finite()) {
            return Err(TriangulationError::NonFiniteCoordinate {
                index,
                point: point.point,
                weight: point.weight,
            });
        }

        self.points.push(point);
        self.invalidate_caches();

        let outcome = insert_vertex(self, index)
            .map_err(|source| TriangulationError::Insertion { index, source })?;
        if matches!(outcome, InsertionOutcome::Redundant { .. }) {
            self.redundant.insert(index);
        }
        Ok(outcome)
    }

    pub(crate) fn mark_redundant(&mut self, index: usize) {
        self.redundant.insert(index);
    }

    fn invalidate_caches(&self) {
        self.cache.vertices.invalidate();
        self.cache.edges.invalidate();
        self.cache.triangles.invalidate();
        self.cache.tetrahedra.invalidate();
    }

    // -------------------------------------------------------------------------
    // Point access
    // -------------------------------------------------------------------------

    /// Number of input points, including redundant ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points were inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Construction options.
    #[must_use]
    pub const fn options(&self) -> &TriangulationOptions {
        &self.options
    }

    /// Input points with their weights.
    #[must_use]
    pub fn points(&self) -> &[WeightedPoint] {
        &self.points
    }

    /// Position of input point `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::IndexOutOfRange`] for an invalid index.
    pub fn position(&self, index: usize) -> Result<Point, TriangulationError> {
        self.weighted_point(index).map(|wp| wp.point)
    }

    /// Weight of input point `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::IndexOutOfRange`] for an invalid index.
    pub fn weight(&self, index: usize) -> Result<f64, TriangulationError> {
        self.weighted_point(index).map(|wp| wp.weight)
    }

    /// Input point `index` with its weight.
    ///
    /// # Errors
    ///
    /// Returns [`TriangulationError::IndexOutOfRange`] for an invalid index.
    pub fn weighted_point(&self, index: usize) -> Result<WeightedPoint, TriangulationError> {
        self.points
            .get(index)
            .copied()
            .ok_or(TriangulationError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Returns `true` if any input point carries a non-zero weight.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.points.iter().any(|p| p.weight != 0.0)
    }

    /// Returns `true` if input point `index` was hidden by its neighbors and
    /// is not a vertex of the triangulation.
    #[must_use]
    pub fn is_redundant(&self, index: usize) -> bool {
        self.redundant.contains(&index)
    }

    /// Vertex lookup covering the synthetic vertices. Indices come from the
    /// cells, so they are always valid.
    #[inline]
    pub(crate) fn vertex(&self, v: usize) -> &WeightedPoint {
        if v >= FIRST_SYNTHETIC {
            &self.synthetic[v - FIRST_SYNTHETIC]
        } else {
            &self.points[v]
        }
    }

    /// Returns `true` for the four synthetic vertex indices.
    #[inline]
    #[must_use]
    pub const fn is_synthetic(v: usize) -> bool {
        v >= FIRST_SYNTHETIC
    }

    // -------------------------------------------------------------------------
    // Cell access
    // -------------------------------------------------------------------------

    /// Number of live tetrahedra in the arena, external ones included.
    #[must_use]
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// Iterates over all live tetrahedra, external ones included.
    pub fn cells(&self) -> impl Iterator<Item = (TetrahedronKey, &Cell)> {
        self.cells.iter()
    }

    /// The tetrahedron stored under `key`, if it is still live.
    #[must_use]
    pub fn cell(&self, key: TetrahedronKey) -> Option<&Cell> {
        self.cells.get(key)
    }

    pub(crate) const fn cells_mut(&mut self) -> &mut StorageMap<TetrahedronKey, Cell> {
        &mut self.cells
    }

    #[cfg(test)]
    pub(crate) fn points_mut(&mut self) -> &mut [WeightedPoint] {
        &mut self.points
    }

    pub(crate) const fn last_created(&self) -> Option<TetrahedronKey> {
        self.last_created
    }

    pub(crate) const fn set_last_created(&mut self, key: TetrahedronKey) {
        self.last_created = Some(key);
    }

    /// Returns `true` if `cell` references a synthetic vertex.
    #[must_use]
    pub fn is_external_cell(cell: &Cell) -> bool {
        cell.vertices().iter().any(|&v| Self::is_synthetic(v))
    }

    /// Returns `true` if the tetrahedron under `key` references a synthetic
    /// vertex. Unknown keys are reported as external.
    #[must_use]
    pub fn is_external(&self, key: TetrahedronKey) -> bool {
        self.cells.get(key).is_none_or(Self::is_external_cell)
    }

    /// Positions of the four vertices of `cell`.
    #[must_use]
    pub fn cell_points(&self, cell: &Cell) -> [Point; 4] {
        cell.vertices().map(|v| self.vertex(v).point)
    }

    /// Locates the live tetrahedron containing `point`.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError`] if neither the walk nor the scan finds one.
    pub fn locate(&self, point: &Point) -> Result<(TetrahedronKey, LocateMethod), LocateError> {
        locate(self, point)
    }

    // -------------------------------------------------------------------------
    // Simplex queries
    // -------------------------------------------------------------------------

    /// Input indices that are vertices of the triangulation, ascending.
    ///
    /// Redundant points are absent.
    #[must_use]
    pub fn vertices(&self) -> Arc<Vec<usize>> {
        self.cache.vertices.get_or_build(|| {
            let set: FastHashSet<usize> = self
                .cells
                .values()
                .flat_map(|c| c.vertices().iter().copied())
                .filter(|&v| !Self::is_synthetic(v))
                .collect();
            let mut out: Vec<usize> = set.into_iter().collect();
            out.sort_unstable();
            tracing::debug!(count = out.len(), "rebuilt vertex cache");
            out
        })
    }

    /// All edges between real vertices, sorted.
    #[must_use]
    pub fn edges(&self) -> Arc<Vec<Edge>> {
        self.cache.edges.get_or_build(|| {
            let mut set = FastHashSet::default();
            for cell in self.cells.values() {
                let v = cell.vertices();
                for a in 0..4 {
                    for b in (a + 1)..4 {
                        if !Self::is_synthetic(v[a]) && !Self::is_synthetic(v[b]) {
                            set.insert(Edge::new([v[a], v[b]]));
                        }
                    }
                }
            }
            let mut out: Vec<Edge> = set.into_iter().collect();
            out.sort_unstable();
            tracing::debug!(count = out.len(), "rebuilt edge cache");
            out
        })
    }

    /// All triangles between real vertices, sorted.
    #[must_use]
    pub fn triangles(&self) -> Arc<Vec<Triangle>> {
        self.cache.triangles.get_or_build(|| {
            let mut set = FastHashSet::default();
            for cell in self.cells.values() {
                for i in 0..4 {
                    let face = cell.face(i);
                    if !face.iter().any(|&v| Self::is_synthetic(v)) {
                        set.insert(Triangle::new(face));
                    }
                }
            }
            let mut out: Vec<Triangle> = set.into_iter().collect();
            out.sort_unstable();
            tracing::debug!(count = out.len(), "rebuilt triangle cache");
            out
        })
    }

    /// All non-external tetrahedra, sorted.
    #[must_use]
    pub fn tetrahedra(&self) -> Arc<Vec<Tetrahedron>> {
        self.cache.tetrahedra.get_or_build(|| {
            let mut out: Vec<Tetrahedron> = self
                .cells
                .values()
                .filter(|c| !Self::is_external_cell(c))
                .map(|c| Tetrahedron::new(*c.vertices()))
                .collect();
            out.sort_unstable();
            tracing::debug!(count = out.len(), "rebuilt tetrahedron cache");
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

    /// Number of non-external tetrahedra.
    #[must_use]
    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra().len()
    }

    /// Simplex counts of the real complex.
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

    /// Total volume of the non-external tetrahedra (the volume of the
    /// convex hull of the vertices).
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.cells
            .values()
            .filter(|c| !Self::is_external_cell(c))
            .map(|c| {
                let [a, b, c, d] = self.cell_points(c);
                tetrahedron_volume(&a, &b, &c, &d).abs()
            })
            .sum()
    }

    /// Area of the convex hull: the faces of non-external tetrahedra whose
    /// neighbor is external.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;
        for cell in self.cells.values().filter(|c| !Self::is_external_cell(c)) {
            for i in 0..4 {
                let on_hull = match cell.neighbor(i) {
                    Neighbor::Tetrahedron(key) => self.is_external(key),
                    Neighbor::Boundary | Neighbor::Pending => true,
                };
                if on_hull {
                    let [a, b, c] = cell.face(i).map(|v| self.vertex(v).point);
                    area += triangle_area(&a, &b, &c);
                }
            }
        }
        area
    }
}

// =============================================================================
// TESTS
// =============================================================================
