//! Cavity-based (Bowyer-Watson) insertion of a weighted point.
//!
//! # Algorithm
//!
//! 1. Locate the tetrahedron containing the point. If it is not in conflict
//!    with the point, the point is redundant and the mesh is left untouched.
//! 2. Grow the conflict cavity breadth-first over neighbor links: a
//!    tetrahedron is in the cavity when the point lies strictly inside its
//!    power sphere.
//! 3. Collect the boundary faces of the cavity (faces whose neighbor is not
//!    in the cavity) together with the tetrahedron across each. While the
//!    point fails to see some boundary face strictly from the inside (it is
//!    coplanar with the face, or rounding put it behind), the tetrahedron
//!    across that face joins the cavity. Coning such a face would create a
//!    flat or inverted tetrahedron.
//! 4. Remove the cavity and cone every boundary face to the new vertex. Each
//!    new tetrahedron is positively oriented with the new vertex in slot 3,
//!    so slot 3 faces the old outer neighbor.
//! 5. Point the outer neighbors back at the new tetrahedra and pair the
//!    new tetrahedra with each other by their shared vertex triples.

use std::collections::VecDeque;

use crate::core::algorithms::locate::{LocateError, locate};
use crate::core::collections::{Entry, FastHashMap, FastHashSet, fast_hash_map_with_capacity};
use crate::core::tetrahedron::{Cell, Neighbor, TetrahedronKey};
use crate::core::triangulation::Triangulation;
use crate::geometry::predicates::{InSphere, insphere, plane_orientation};

/// Errors that can occur while inserting a point.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InsertionError {
    /// The point could not be located.
    #[error("Point location failed: {source}")]
    Location {
        /// The underlying location error.
        #[from]
        source: LocateError,
    },

    /// A cavity boundary face was not found in the tetrahedron across it.
    #[error("Tetrahedron {key:?} does not contain cavity boundary face {face:?}")]
    MissingOuterFace {
        /// The outer tetrahedron.
        key: TetrahedronKey,
        /// The boundary face.
        face: [usize; 3],
    },

    /// An interior face of the new star was shared by a number of new
    /// tetrahedra other than two.
    #[error("Face {face:?} of the new star around vertex {vertex} has no partner")]
    UnmatchedFace {
        /// The unmatched face, sorted.
        face: [usize; 3],
        /// The inserted vertex.
        vertex: usize,
    },

    /// The point lies on or behind a cavity boundary face that has no
    /// tetrahedron across it, so the cavity cannot be made star-shaped.
    #[error("Vertex {vertex} does not see hull face {face:?} of its cavity")]
    DegenerateCavity {
        /// The inserted vertex.
        vertex: usize,
        /// The offending face.
        face: [usize; 3],
    },

    /// A neighbor slot was still pending after rewiring.
    #[error("Tetrahedron {key:?} still has a pending neighbor in slot {slot}")]
    PendingNeighbor {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// The pending slot.
        slot: usize,
    },
}

/// Result of inserting one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionOutcome {
    /// The point became a vertex.
    Inserted {
        /// Input index of the point.
        vertex: usize,
        /// Number of tetrahedra created.
        created: usize,
        /// Number of tetrahedra removed (the cavity size).
        removed: usize,
    },
    /// The point is hidden by its neighbors and was not inserted.
    Redundant {
        /// Input index of the point.
        vertex: usize,
    },
}

struct BoundaryFace {
    face: [usize; 3],
    outer: Neighbor,
    /// Orientation of `face` with the inserted point; positive or negative
    /// according to the winding of `face`.
    side: f64,
    /// Whether the point sees `face` strictly from inside the cavity.
    visible: bool,
}

fn in_conflict(tri: &Triangulation, cell: &Cell, vertex: usize) -> bool {
    let [a, b, c, d] = cell.vertices().map(|v| *tri.vertex(v));
    insphere(&a, &b, &c, &d, tri.vertex(vertex)) == InSphere::INSIDE
}

fn find_cavity(tri: &Triangulation, start: TetrahedronKey, vertex: usize) -> Vec<TetrahedronKey> {
    let mut cavity = Vec::new();
    let mut seen = FastHashSet::default();
    let mut queue = VecDeque::from([start]);
    seen.insert(start);

    while let Some(key) = queue.pop_front() {
        let Some(cell) = tri.cell(key) else {
            continue;
        };
        if !in_conflict(tri, cell, vertex) {
            continue;
        }
        cavity.push(key);
        for neighbor in cell.neighbors().iter().filter_map(|n| n.key()) {
            if seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    cavity
}

fn boundary_faces(
    tri: &Triangulation,
    cavity: &[TetrahedronKey],
    vertex: usize,
) -> Vec<BoundaryFace> {
    let point = tri.vertex(vertex).point;
    let members: FastHashSet<TetrahedronKey> = cavity.iter().copied().collect();
    let mut faces = Vec::new();
    for cell in cavity.iter().filter_map(|&k| tri.cell(k)) {
        for i in 0..4 {
            let outer = cell.neighbor(i);
            let interior = outer.key().is_some_and(|k| members.contains(&k));
            if interior {
                continue;
            }
            let face = cell.face(i);
            let [a, b, c] = face.map(|v| tri.vertex(v).point);
            let apex = plane_orientation(&a, &b, &c, &tri.vertex(cell.vertex(i)).point);
            let side = plane_orientation(&a, &b, &c, &point);
            faces.push(BoundaryFace {
                face,
                outer,
                side,
                visible: (apex > 0.0 && side > 0.0) || (apex < 0.0 && side < 0.0),
            });
        }
    }
    faces
}

/// Extends `cavity` across boundary faces the point does not see until it
/// sees all of them, then returns the boundary.
fn star_shaped_boundary(
    tri: &Triangulation,
    cavity: &mut Vec<TetrahedronKey>,
    vertex: usize,
) -> Result<Vec<BoundaryFace>, InsertionError> {
    loop {
        let boundary = boundary_faces(tri, cavity, vertex);
        let Some(unseen) = boundary.iter().find(|b| !b.visible) else {
            return Ok(boundary);
        };
        match unseen.outer {
            Neighbor::Tetrahedron(key) => {
                tracing::debug!(vertex, face = ?unseen.face, "cavity extended across unseen face");
                cavity.push(key);
            }
            Neighbor::Boundary | Neighbor::Pending => {
                return Err(InsertionError::DegenerateCavity {
                    vertex,
                    face: unseen.face,
                });
            }
        }
    }
}

/// Real vertices of the cavity that do not lie on its boundary. Removing the
/// cavity drops them from the mesh.
fn hidden_vertices(
    tri: &Triangulation,
    cavity: &[TetrahedronKey],
    boundary: &[BoundaryFace],
) -> Vec<usize> {
    let on_boundary: FastHashSet<usize> = boundary.iter().flat_map(|b| b.face).collect();
    let mut hidden: Vec<usize> = cavity
        .iter()
        .filter_map(|&k| tri.cell(k))
        .flat_map(|c| *c.vertices())
        .filter(|&v| !Triangulation::is_synthetic(v) && !on_boundary.contains(&v))
        .collect();
    hidden.sort_unstable();
    hidden.dedup();
    hidden
}

/// Inserts input point `vertex` (already stored in the triangulation).
pub(crate) fn insert_vertex(
    tri: &mut Triangulation,
    vertex: usize,
) -> Result<InsertionOutcome, InsertionError> {
    let p = *tri.vertex(vertex);
    let (start, method) = locate(tri, &p.point)?;

    let mut cavity = find_cavity(tri, start, vertex);
    if cavity.is_empty() {
        tracing::warn!(vertex, point = %p.point, weight = p.weight, "redundant point not inserted");
        return Ok(InsertionOutcome::Redundant { vertex });
    }

    let boundary = star_shaped_boundary(tri, &mut cavity, vertex)?;
    let hidden = hidden_vertices(tri, &cavity, &boundary);
    for key in &cavity {
        tri.cells_mut().remove(*key);
    }
    for &v in &hidden {
        tracing::debug!(vertex = v, by = vertex, "vertex hidden by heavier neighbor");
        tri.mark_redundant(v);
    }

    let mut created = Vec::with_capacity(boundary.len());
    for BoundaryFace {
        face, outer, side, ..
    } in boundary
    {
        let [mut a, mut b, c] = face;
        if side < 0.0 {
            std::mem::swap(&mut a, &mut b);
        }

        let cell = Cell::with_neighbors(
            [a, b, c, vertex],
            [Neighbor::Pending, Neighbor::Pending, Neighbor::Pending, outer],
        );
        let key = tri.cells_mut().insert(cell);

        if let Neighbor::Tetrahedron(outer_key) = outer {
            let outer_cell = tri
                .cells_mut()
                .get_mut(outer_key)
                .ok_or(InsertionError::MissingOuterFace { key: outer_key, face })?;
            let slot = outer_cell
                .face_index(&face)
                .ok_or(InsertionError::MissingOuterFace { key: outer_key, face })?;
            outer_cell.set_neighbor(slot, Neighbor::Tetrahedron(key));
        }
        created.push(key);
    }

    link_star(tri, &created, vertex)?;

    if let Some(&last) = created.last() {
        tri.set_last_created(last);
    }

    tracing::debug!(
        vertex,
        %method,
        removed = cavity.len(),
        created = created.len(),
        "inserted point"
    );

    Ok(InsertionOutcome::Inserted {
        vertex,
        created: created.len(),
        removed: cavity.len(),
    })
}

/// Pairs the faces through `vertex` of the new tetrahedra.
fn link_star(
    tri: &mut Triangulation,
    created: &[TetrahedronKey],
    vertex: usize,
) -> Result<(), InsertionError> {
    let mut open: FastHashMap<[usize; 3], (TetrahedronKey, usize)> =
        fast_hash_map_with_capacity(created.len() * 2);

    for &key in created {
        for slot in 0..3 {
            let Some(cell) = tri.cell(key) else {
                continue;
            };
            let mut face = cell.face(slot);
            face.sort_unstable();
            match open.entry(face) {
                Entry::Occupied(entry) => {
                    let (other, other_slot) = entry.remove();
                    let cells = tri.cells_mut();
                    if let Some(c) = cells.get_mut(key) {
                        c.set_neighbor(slot, Neighbor::Tetrahedron(other));
                    }
                    if let Some(c) = cells.get_mut(other) {
                        c.set_neighbor(other_slot, Neighbor::Tetrahedron(key));
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((key, slot));
                }
            }
        }
    }

    if let Some(face) = open.into_keys().next() {
        return Err(InsertionError::UnmatchedFace { face, vertex });
    }

    for &key in created {
        if let Some(slot) = tri
            .cell(key)
            .and_then(|c| c.neighbors().iter().position(|n| *n == Neighbor::Pending))
        {
            return Err(InsertionError::PendingNeighbor { key, slot });
        }
    }
    Ok(())
}
