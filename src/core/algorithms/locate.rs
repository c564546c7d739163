//! Point location by walking across faces.
//!
//! The walk starts at the most recently created tetrahedron and repeatedly
//! crosses the first face that separates the current tetrahedron from the
//! query point, comparing the side of the query point with the side of the
//! vertex opposite that face. It stops when no face separates the two.
//!
//! The walk is abandoned when it exceeds
//! [`TriangulationOptions::max_walk_steps`](crate::core::builder::TriangulationOptions::max_walk_steps),
//! revisits a tetrahedron or runs into a boundary face; location then falls
//! back to a linear scan over every live tetrahedron.
//!
//! # References
//!
//! - O. Devillers, S. Pion, and M. Teillaud, "Walking in a Triangulation",
//!   International Journal of Foundations of Computer Science, 2001.

use std::fmt;

use crate::core::collections::FastHashSet;
use crate::core::tetrahedron::{Cell, FACE_VERTICES, Neighbor, TetrahedronKey};
use crate::core::triangulation::Triangulation;
use crate::geometry::point::Point;
use crate::geometry::predicates::plane_orientation;

/// Error during point location.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LocateError {
    /// Neither the walk nor the linear scan found a tetrahedron containing
    /// the point. Usually the point lies outside the synthetic bounding
    /// tetrahedron.
    #[error(
        "No tetrahedron contains {point}: walk abandoned ({reason}), linear scan over {scanned} tetrahedra found none"
    )]
    NotFound {
        /// The query point.
        point: Point,
        /// Why the walk was abandoned.
        reason: WalkFailure,
        /// Number of tetrahedra tested by the scan.
        scanned: usize,
    },
}

/// Which strategy found the containing tetrahedron.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocateMethod {
    /// The face walk succeeded after `steps` tetrahedra.
    Walk {
        /// Number of tetrahedra visited.
        steps: usize,
    },
    /// The walk was abandoned and the linear scan succeeded.
    Scan,
}

impl fmt::Display for LocateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk { steps } => write!(f, "walk ({steps} steps)"),
            Self::Scan => write!(f, "scan"),
        }
    }
}

/// Why a face walk was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkFailure {
    /// No starting tetrahedron was available.
    NoStart,
    /// The step budget ran out.
    StepLimit(usize),
    /// The walk came back to a tetrahedron it had already left.
    Cycle,
    /// The walk tried to cross a boundary face.
    Boundary,
}

impl fmt::Display for WalkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStart => write!(f, "no start tetrahedron"),
            Self::StepLimit(steps) => write!(f, "step limit of {steps} reached"),
            Self::Cycle => write!(f, "cycle detected"),
            Self::Boundary => write!(f, "boundary face reached"),
        }
    }
}

/// Returns `true` if the face opposite vertex `i` separates the opposite
/// vertex from `point`. Points on the face plane are not separated.
fn separates(tri: &Triangulation, cell: &Cell, i: usize, point: &Point) -> bool {
    let [a, b, c] = FACE_VERTICES[i].map(|k| tri.vertex(cell.vertex(k)).point);
    let opposite = tri.vertex(cell.vertex(i)).point;
    let side_opposite = plane_orientation(&a, &b, &c, &opposite);
    let side_point = plane_orientation(&a, &b, &c, point);
    (side_opposite > 0.0 && side_point < 0.0) || (side_opposite < 0.0 && side_point > 0.0)
}

/// Returns `true` if `point` lies inside or on the tetrahedron.
pub(crate) fn contains(tri: &Triangulation, cell: &Cell, point: &Point) -> bool {
    (0..4).all(|i| !separates(tri, cell, i, point))
}

fn walk(tri: &Triangulation, point: &Point) -> Result<(TetrahedronKey, usize), WalkFailure> {
    let max_steps = tri.options().max_walk_steps;
    let mut current = tri
        .last_created()
        .filter(|&k| tri.cell(k).is_some())
        .or_else(|| tri.cells().next().map(|(k, _)| k))
        .ok_or(WalkFailure::NoStart)?;
    let mut visited = FastHashSet::default();

    for step in 0..max_steps {
        if !visited.insert(current) {
            return Err(WalkFailure::Cycle);
        }
        let cell = tri.cell(current).ok_or(WalkFailure::Boundary)?;

        match (0..4).find(|&i| separates(tri, cell, i, point)) {
            None => return Ok((current, step + 1)),
            Some(i) => match cell.neighbor(i) {
                Neighbor::Tetrahedron(next) => current = next,
                Neighbor::Boundary | Neighbor::Pending => return Err(WalkFailure::Boundary),
            },
        }
    }

    Err(WalkFailure::StepLimit(max_steps))
}

/// Finds a live tetrahedron containing `point` (inside or on its boundary).
///
/// # Errors
///
/// Returns [`LocateError::NotFound`] if the walk is abandoned and the linear
/// scan finds no tetrahedron either.
///
/// # Examples
///
/// ```rust
/// use alphasurf::core::algorithms::locate::{LocateMethod, locate};
/// use alphasurf::core::triangulation::Triangulation;
/// use alphasurf::geometry::point::Point;
///
/// let tri = Triangulation::new(&[
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
///     Point::new([0.0, 0.0, 1.0]),
/// ])
/// .unwrap();
///
/// let (key, method) = locate(&tri, &Point::new([0.1, 0.1, 0.1])).unwrap();
/// assert!(!tri.is_external(key));
/// assert!(matches!(method, LocateMethod::Walk { .. }));
/// ```
pub fn locate(
    tri: &Triangulation,
    point: &Point,
) -> Result<(TetrahedronKey, LocateMethod), LocateError> {
    let reason = match walk(tri, point) {
        Ok((key, steps)) => return Ok((key, LocateMethod::Walk { steps })),
        Err(reason) => reason,
    };

    tracing::warn!(%point, %reason, "point location walk abandoned, scanning all tetrahedra");

    tri.cells()
        .find(|(_, cell)| contains(tri, cell, point))
        .map(|(key, _)| (key, LocateMethod::Scan))
        .ok_or(LocateError::NotFound {
            point: *point,
            reason,
            scanned: tri.number_of_cells(),
        })
}
