//! Structural and geometric consistency checks for [`Triangulation`].
//!
//! | Invariant | Helper method |
//! |---|---|
//! | No pending slots, reciprocal neighbors sharing a face | [`Triangulation::validate_neighbors`] |
//! | Positive orientation of every tetrahedron | [`Triangulation::validate_orientation`] |
//! | χ = 1 for the real complex | [`Triangulation::validate_topology`] |
//! | Empty power sphere of every non-external tetrahedron | [`Triangulation::validate_power_condition`] |
//!
//! [`Triangulation::validate`] runs the structural checks (neighbors,
//! orientation, topology) and returns the first failure. The power condition
//! is quadratic in the input size and is only checked on request.

use crate::core::algorithms::locate::{LocateError, locate};
use crate::core::tetrahedron::{Neighbor, TetrahedronKey};
use crate::core::triangulation::Triangulation;
use crate::geometry::orthogonal::{orthocenter4, orthoradius4};
use crate::geometry::predicates::{InSphere, insphere, plane_orientation};
use crate::topology::euler::{FVector, euler_characteristic};

/// Relative slack allowed by [`Triangulation::validate_power_condition`].
pub const POWER_TOLERANCE: f64 = 1e-9;

/// A violated triangulation invariant.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A neighbor slot was left pending by an insertion.
    #[error("Tetrahedron {key:?} has a pending neighbor in slot {slot}")]
    PendingNeighbor {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// The pending slot.
        slot: usize,
    },

    /// A neighbor slot references a retired tetrahedron.
    #[error("Tetrahedron {key:?} references retired neighbor {neighbor:?} in slot {slot}")]
    MissingNeighbor {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// The slot.
        slot: usize,
        /// The retired key.
        neighbor: TetrahedronKey,
    },

    /// The neighbor does not point back.
    #[error("Tetrahedron {key:?} lists {neighbor:?} as a neighbor but not vice versa")]
    NonReciprocal {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// The neighbor.
        neighbor: TetrahedronKey,
    },

    /// Two neighbors do not share the face of the slot that links them.
    #[error("Tetrahedra {key:?} and {neighbor:?} do not share face {face:?}")]
    FaceMismatch {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// The neighbor.
        neighbor: TetrahedronKey,
        /// The face of `key` opposite the linking slot.
        face: [usize; 3],
    },

    /// A tetrahedron is flat or inverted.
    #[error("Tetrahedron {key:?} with vertices {vertices:?} has orientation {orientation}")]
    NonPositiveOrientation {
        /// The tetrahedron.
        key: TetrahedronKey,
        /// Its vertices.
        vertices: [usize; 4],
        /// The orientation determinant.
        orientation: f64,
    },

    /// The real complex does not have Euler characteristic 1.
    #[error("Euler characteristic {chi} of complex {counts} (expected 1)")]
    EulerMismatch {
        /// The computed characteristic.
        chi: isize,
        /// The simplex counts.
        counts: FVector,
    },

    /// An input point lies strictly inside the power sphere of a
    /// non-external tetrahedron.
    #[error(
        "Point {vertex} violates the power condition of tetrahedron {vertices:?} (power {power})"
    )]
    PowerViolation {
        /// The tetrahedron's vertices.
        vertices: [usize; 4],
        /// The offending input point.
        vertex: usize,
        /// Power of the point with respect to the orthosphere.
        power: f64,
    },

    /// A point recorded as redundant lies strictly inside the power sphere
    /// of the tetrahedron containing it, so it should have been a vertex.
    #[error("Redundant point {vertex} conflicts with tetrahedron {vertices:?} containing it")]
    VisibleRedundant {
        /// The redundant point.
        vertex: usize,
        /// The containing tetrahedron's vertices.
        vertices: [usize; 4],
    },

    /// A redundant point could not be located.
    #[error("Redundant point {vertex} could not be located: {source}")]
    Location {
        /// The redundant point.
        vertex: usize,
        /// The underlying location error.
        source: LocateError,
    },
}

impl Triangulation {
    /// Runs the neighbor, orientation and topology checks.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_neighbors()?;
        self.validate_orientation()?;
        self.validate_topology()
    }

    /// Checks that every neighbor slot is resolved, live and reciprocal, and
    /// that linked tetrahedra share the slot's face.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_neighbors(&self) -> Result<(), ValidationError> {
        for (key, cell) in self.cells() {
            for (slot, neighbor) in cell.neighbors().iter().enumerate() {
                let neighbor = match *neighbor {
                    Neighbor::Boundary => continue,
                    Neighbor::Pending => {
                        return Err(ValidationError::PendingNeighbor { key, slot });
                    }
                    Neighbor::Tetrahedron(neighbor) => neighbor,
                };
                let other = self
                    .cell(neighbor)
                    .ok_or(ValidationError::MissingNeighbor {
                        key,
                        slot,
                        neighbor,
                    })?;
                let back = other
                    .neighbor_index(key)
                    .ok_or(ValidationError::NonReciprocal { key, neighbor })?;
                let face = cell.face(slot);
                if other.face_index(&face) != Some(back) {
                    return Err(ValidationError::FaceMismatch {
                        key,
                        neighbor,
                        face,
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every tetrahedron is positively oriented.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveOrientation`] for the first
    /// flat or inverted tetrahedron.
    pub fn validate_orientation(&self) -> Result<(), ValidationError> {
        for (key, cell) in self.cells() {
            let [a, b, c, d] = self.cell_points(cell);
            let orientation = plane_orientation(&a, &b, &c, &d);
            if orientation.is_nan() || orientation <= 0.0 {
                return Err(ValidationError::NonPositiveOrientation {
                    key,
                    vertices: *cell.vertices(),
                    orientation,
                });
            }
        }
        Ok(())
    }

    /// Checks that the real complex has Euler characteristic 1 (it
    /// triangulates the convex hull of the vertices). Vacuous when empty.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EulerMismatch`].
    pub fn validate_topology(&self) -> Result<(), ValidationError> {
        let counts = self.f_vector();
        if counts.is_empty() {
            return Ok(());
        }
        let chi = euler_characteristic(&counts);
        if chi == 1 {
            Ok(())
        } else {
            Err(ValidationError::EulerMismatch { chi, counts })
        }
    }

    /// Checks that no input point has negative power with respect to the
    /// orthosphere of any non-external tetrahedron, up to
    /// [`POWER_TOLERANCE`] relative to the orthosphere's scale.
    ///
    /// Redundant points are checked too: a hidden ball never pierces an
    /// orthosphere, nor the power sphere of the tetrahedron it falls in
    /// (external ones included, which covers inputs without any real
    /// tetrahedron).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PowerViolation`] or
    /// [`ValidationError::VisibleRedundant`] for the first violation.
    pub fn validate_power_condition(&self) -> Result<(), ValidationError> {
        self.validate_redundant()?;

        for (_, cell) in self.cells() {
            if Self::is_external_cell(cell) {
                continue;
            }
            let [a, b, c, d] = cell.vertices().map(|v| *self.vertex(v));
            let center = orthocenter4(&a, &b, &c, &d);
            let radius = orthoradius4(&a, &b, &c, &d);
            let slack = POWER_TOLERANCE * (1.0 + radius.abs() + center.to_vector().norm_squared());

            for (vertex, p) in self.points().iter().enumerate() {
                if cell.contains_vertex(vertex) {
                    continue;
                }
                let power = p.power(&center) - radius;
                if power < -slack {
                    return Err(ValidationError::PowerViolation {
                        vertices: *cell.vertices(),
                        vertex,
                        power,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_redundant(&self) -> Result<(), ValidationError> {
        for vertex in (0..self.len()).filter(|&i| self.is_redundant(i)) {
            let p = self.points()[vertex];
            let (key, _) = locate(self, &p.point)
                .map_err(|source| ValidationError::Location { vertex, source })?;
            let Some(cell) = self.cell(key) else {
                continue;
            };
            let [a, b, c, d] = cell.vertices().map(|v| *self.vertex(v));
            if insphere(&a, &b, &c, &d, &p) == InSphere::INSIDE {
                return Err(ValidationError::VisibleRedundant {
                    vertex,
                    vertices: *cell.vertices(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::generation::{random_points_seeded, random_weighted_points_seeded};
    use crate::geometry::point::{Point, WeightedPoint};

    fn simplex() -> Triangulation {
        Triangulation::new(&[
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ])
        .unwrap()
    }

    // =============================================================================
    // VALID TRIANGULATIONS
    // =============================================================================

    #[test]
    fn random_triangulations_are_valid() {
        for seed in 0..5 {
            let points = random_points_seeded(40, (-5.0, 5.0), seed).unwrap();
            let tri = Triangulation::new(&points).unwrap();
            assert_eq!(tri.validate(), Ok(()));
            assert_eq!(tri.validate_power_condition(), Ok(()));
        }
    }

    #[test]
    fn weighted_triangulations_are_valid() {
        let points = random_weighted_points_seeded(50, (0.0, 4.0), (0.5, 2.0), 8).unwrap();
        let tri = Triangulation::from_weighted_points(&points).unwrap();
        assert_eq!(tri.validate(), Ok(()));
        assert_eq!(tri.validate_power_condition(), Ok(()));
    }

    #[test]
    fn empty_triangulation_is_valid() {
        let tri = Triangulation::new(&[]).unwrap();
        assert_eq!(tri.validate(), Ok(()));
        assert_eq!(tri.validate_power_condition(), Ok(()));
    }

    // =============================================================================
    // CORRUPTED TRIANGULATIONS
    // =============================================================================

    #[test]
    fn detects_pending_slot() {
        let mut tri = simplex();
        let key = tri.cells().next().map(|(k, _)| k).unwrap();
        tri.cells_mut()[key].set_neighbor(2, Neighbor::Pending);
        assert_eq!(
            tri.validate(),
            Err(ValidationError::PendingNeighbor { key, slot: 2 })
        );
    }

    #[test]
    fn detects_one_sided_link() {
        let mut tri = simplex();
        let (key, slot) = tri
            .cells()
            .find_map(|(k, c)| {
                c.neighbors()
                    .iter()
                    .position(|n| n.key().is_some())
                    .map(|slot| (k, slot))
            })
            .unwrap();
        let neighbor = tri.cell(key).unwrap().neighbor(slot).key().unwrap();
        let back = tri.cell(neighbor).unwrap().neighbor_index(key).unwrap();
        tri.cells_mut()[neighbor].set_neighbor(back, Neighbor::Boundary);

        assert!(matches!(
            tri.validate_neighbors(),
            Err(ValidationError::NonReciprocal { .. })
        ));
    }

    #[test]
    fn detects_visible_redundant_point() {
        let pts = [
            Point::new([0.0, 0.0, 0.0]),
            Point::new([3.0, 0.1, 0.0]),
            Point::new([0.2, 3.0, 0.1]),
            Point::new([0.1, 0.3, 3.0]),
            Point::new([0.2, 0.2, 0.2]),
        ];
        let mut tri = Triangulation::with_weights(&pts, &[4.0, 1.0, 1.0, 1.0, 0.01]).unwrap();
        assert!(tri.is_redundant(4));
        assert_eq!(tri.validate_power_condition(), Ok(()));

        // a redundant ball grown past its neighbors should have been a vertex
        tri.points_mut()[4].weight = 10.0;
        assert!(matches!(
            tri.validate_power_condition(),
            Err(ValidationError::VisibleRedundant { vertex: 4, .. })
        ));
    }

    #[test]
    fn planar_redundant_points_are_checked() {
        let mut pts: Vec<Point> = (0..6)
            .map(|k| {
                let t = std::f64::consts::TAU * f64::from(k) / 6.0;
                Point::new([1.4 * t.cos(), 1.4 * t.sin(), 0.0])
            })
            .collect();
        pts.push(pts[2]);
        let mut tri = Triangulation::new(&pts).unwrap();
        assert_eq!(tri.tetrahedron_count(), 0);
        assert!(tri.is_redundant(6));
        assert_eq!(tri.validate_power_condition(), Ok(()));

        tri.points_mut()[6] = WeightedPoint::new(Point::new([0.0, 0.0, 0.0]), 0.0);
        assert!(matches!(
            tri.validate_power_condition(),
            Err(ValidationError::VisibleRedundant { vertex: 6, .. })
        ));
    }

    #[test]
    fn detects_inverted_tetrahedron() {
        let mut tri = simplex();
        let key = tri
            .cells()
            .find(|(_, c)| !Triangulation::is_external_cell(c))
            .map(|(k, _)| k)
            .unwrap();
        let cell = tri.cell(key).copied().unwrap();
        let [a, b, c, d] = *cell.vertices();
        tri.cells_mut()[key] = crate::core::tetrahedron::Cell::with_neighbors(
            [b, a, c, d],
            *cell.neighbors(),
        );
        assert!(matches!(
            tri.validate_orientation(),
            Err(ValidationError::NonPositiveOrientation { .. })
        ));
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ValidationError::EulerMismatch {
            chi: 2,
            counts: FVector::new([2, 0, 0, 0]),
        };
        assert_eq!(
            err.to_string(),
            "Euler characteristic 2 of complex V=2 E=0 F=0 T=0 (expected 1)"
        );
    }
}
