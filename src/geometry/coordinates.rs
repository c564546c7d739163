//! Coordinate sets: Cartesian, internal (z-matrix) and 2D diagram coordinates.
//!
//! All three representations convert to [`CartesianCoordinates`], which is the
//! form consumed by the triangulation and the surface integrator.
//! [`CoordinateSet`] is the sum type over the three.

use crate::geometry::measures;
use crate::geometry::point::{Point, Vector};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Errors raised by coordinate-set accessors and conversions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    /// An index is past the end of the coordinate set.
    #[error("Index {index} out of range for coordinate set of size {len}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of entries in the set.
        len: usize,
    },

    /// An internal-coordinate row references an atom that is not placed
    /// before it.
    #[error("Row {row} references atom {reference}, which is not an earlier row")]
    InvalidConnection {
        /// The row holding the connection.
        row: usize,
        /// The referenced atom.
        reference: usize,
    },

    /// A per-point weight list does not match the number of points.
    #[error("Got {actual} weights for {expected} points")]
    WeightCountMismatch {
        /// Number of points.
        expected: usize,
        /// Number of weights supplied.
        actual: usize,
    },
}

// =============================================================================
// CARTESIAN COORDINATES
// =============================================================================

/// An ordered list of 3D positions.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::coordinates::CartesianCoordinates;
/// use alphasurf::geometry::point::Point;
/// use approx::assert_relative_eq;
///
/// let coords = CartesianCoordinates::new(vec![
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
/// ]);
/// assert_relative_eq!(coords.angle(0, 1, 2).unwrap(), 90.0);
/// assert_relative_eq!(coords.distance(0, 2).unwrap(), 2.0_f64.sqrt());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartesianCoordinates {
    positions: Vec<Point>,
}

impl CartesianCoordinates {
    /// Creates a coordinate set from a list of positions.
    #[must_use]
    pub const fn new(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    /// Creates `len` positions, all at the origin.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::new(vec![Point::ORIGIN; len])
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the set holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All positions in order.
    #[must_use]
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Position at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] if `index >= len()`.
    pub fn position(&self, index: usize) -> Result<Point, CoordinateError> {
        self.positions
            .get(index)
            .copied()
            .ok_or(CoordinateError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Replaces the position at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_position(&mut self, index: usize, position: Point) -> Result<(), CoordinateError> {
        let len = self.len();
        let slot = self
            .positions
            .get_mut(index)
            .ok_or(CoordinateError::IndexOutOfRange { index, len })?;
        *slot = position;
        Ok(())
    }

    /// Appends a position and returns its index.
    pub fn push(&mut self, position: Point) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    fn points<const N: usize>(&self, indices: [usize; N]) -> Result<[Point; N], CoordinateError> {
        let mut out = [Point::ORIGIN; N];
        for (slot, index) in out.iter_mut().zip(indices) {
            *slot = self.position(index)?;
        }
        Ok(out)
    }

    /// Distance between the positions at `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn distance(&self, a: usize, b: usize) -> Result<f64, CoordinateError> {
        let [pa, pb] = self.points([a, b])?;
        Ok(measures::distance(&pa, &pb))
    }

    /// Angle `a-b-c` in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn angle(&self, a: usize, b: usize, c: usize) -> Result<f64, CoordinateError> {
        self.angle_radians(a, b, c).map(f64::to_degrees)
    }

    /// Angle `a-b-c` in radians.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn angle_radians(&self, a: usize, b: usize, c: usize) -> Result<f64, CoordinateError> {
        let [pa, pb, pc] = self.points([a, b, c])?;
        Ok(measures::angle_radians(&pa, &pb, &pc))
    }

    /// Torsion angle `a-b-c-d` in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn torsion_angle(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
    ) -> Result<f64, CoordinateError> {
        self.torsion_angle_radians(a, b, c, d).map(f64::to_degrees)
    }

    /// Torsion angle `a-b-c-d` in radians.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn torsion_angle_radians(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
    ) -> Result<f64, CoordinateError> {
        let [pa, pb, pc, pd] = self.points([a, b, c, d])?;
        Ok(measures::torsion_angle_radians(&pa, &pb, &pc, &pd))
    }

    /// Wilson angle of `d` against the plane `a-b-c`, in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn wilson_angle(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
    ) -> Result<f64, CoordinateError> {
        self.wilson_angle_radians(a, b, c, d).map(f64::to_degrees)
    }

    /// Wilson angle of `d` against the plane `a-b-c`, in radians.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn wilson_angle_radians(
        &self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
    ) -> Result<f64, CoordinateError> {
        let [pa, pb, pc, pd] = self.points([a, b, c, d])?;
        Ok(measures::wilson_angle_radians(&pa, &pb, &pc, &pd))
    }

    /// Arithmetic mean of all positions; the origin for an empty set.
    #[must_use]
    pub fn center(&self) -> Point {
        if self.is_empty() {
            return Point::ORIGIN;
        }
        let sum: Vector = self.positions.iter().map(Point::to_vector).sum();
        #[allow(clippy::cast_precision_loss)]
        let n = self.len() as f64;
        Point::from_vector(&(sum / n))
    }

    /// Weighted mean of all positions (for example a center of mass).
    ///
    /// Returns the origin when the weights sum to zero.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::WeightCountMismatch`] if `weights` and the
    /// positions differ in length.
    pub fn weighted_center(&self, weights: &[f64]) -> Result<Point, CoordinateError> {
        if weights.len() != self.len() {
            return Err(CoordinateError::WeightCountMismatch {
                expected: self.len(),
                actual: weights.len(),
            });
        }
        let total: f64 = weights.iter().sum();
        if total == 0.0 {
            return Ok(Point::ORIGIN);
        }
        let sum: Vector = self
            .positions
            .iter()
            .zip(weights)
            .map(|(p, w)| p.to_vector() * *w)
            .sum();
        Ok(Point::from_vector(&(sum / total)))
    }

    /// Translates every position by `offset`.
    pub fn move_by(&mut self, offset: &Vector) {
        for p in &mut self.positions {
            *p = *p + *offset;
        }
    }
}

impl From<Vec<Point>> for CartesianCoordinates {
    fn from(positions: Vec<Point>) -> Self {
        Self::new(positions)
    }
}

// =============================================================================
// INTERNAL COORDINATES
// =============================================================================

/// One z-matrix row: a bond length, a bond angle and a torsion angle (both in
/// degrees) measured against up to three previously placed atoms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
struct InternalRow {
    connections: [usize; 3],
    values: [f64; 3],
}

/// Internal coordinates (a z-matrix).
///
/// Row `i` places atom `i` at distance `r` from `connections[0]`, with angle
/// `theta` at `connections[0]` towards `connections[1]` and torsion `phi`
/// around the `connections[0]`–`connections[1]` axis relative to
/// `connections[2]`. The first three rows use a fixed frame: atom 0 at the
/// origin, atom 1 on the x axis, atom 2 in the xy plane.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::coordinates::InternalCoordinates;
/// use approx::assert_relative_eq;
///
/// let mut z = InternalCoordinates::new(4);
/// z.set_coordinates(1, 1.0, 0.0, 0.0).unwrap();
/// z.set_coordinates(2, 1.0, 90.0, 0.0).unwrap();
/// z.set_connections(3, 2, 1, 0).unwrap();
/// z.set_coordinates(3, 1.0, 90.0, 180.0).unwrap();
///
/// let cartesian = z.to_cartesian().unwrap();
/// assert_relative_eq!(cartesian.distance(2, 3).unwrap(), 1.0, epsilon = 1e-12);
/// assert_relative_eq!(cartesian.torsion_angle(0, 1, 2, 3).unwrap().abs(), 180.0, epsilon = 1e-9);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InternalCoordinates {
    rows: Vec<InternalRow>,
}

impl InternalCoordinates {
    /// Creates `len` zeroed rows.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            rows: vec![InternalRow::default(); len],
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn row(&self, row: usize) -> Result<&InternalRow, CoordinateError> {
        self.rows.get(row).ok_or(CoordinateError::IndexOutOfRange {
            index: row,
            len: self.len(),
        })
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut InternalRow, CoordinateError> {
        let len = self.len();
        self.rows
            .get_mut(row)
            .ok_or(CoordinateError::IndexOutOfRange { index: row, len })
    }

    /// Sets the distance, angle and torsion of `row`; angles in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn set_coordinates(
        &mut self,
        row: usize,
        r: f64,
        theta: f64,
        phi: f64,
    ) -> Result<(), CoordinateError> {
        self.row_mut(row)?.values = [r, theta, phi];
        Ok(())
    }

    /// Sets the distance, angle and torsion of `row`; angles in radians.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn set_coordinates_radians(
        &mut self,
        row: usize,
        r: f64,
        theta: f64,
        phi: f64,
    ) -> Result<(), CoordinateError> {
        self.set_coordinates(row, r, theta.to_degrees(), phi.to_degrees())
    }

    /// `[r, theta, phi]` of `row` with angles in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn coordinates(&self, row: usize) -> Result<[f64; 3], CoordinateError> {
        Ok(self.row(row)?.values)
    }

    /// `[r, theta, phi]` of `row` with angles in radians.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn coordinates_radians(&self, row: usize) -> Result<[f64; 3], CoordinateError> {
        let [r, theta, phi] = self.coordinates(row)?;
        Ok([r, theta.to_radians(), phi.to_radians()])
    }

    /// Sets the three reference atoms of `row`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn set_connections(
        &mut self,
        row: usize,
        a: usize,
        b: usize,
        c: usize,
    ) -> Result<(), CoordinateError> {
        self.row_mut(row)?.connections = [a, b, c];
        Ok(())
    }

    /// The three reference atoms of `row`.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid row.
    pub fn connections(&self, row: usize) -> Result<[usize; 3], CoordinateError> {
        Ok(self.row(row)?.connections)
    }

    /// Converts to Cartesian coordinates with the natural extension
    /// reference frame (NeRF) construction.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::InvalidConnection`] if a row from the fourth
    /// on references an atom that is not placed before it.
    pub fn to_cartesian(&self) -> Result<CartesianCoordinates, CoordinateError> {
        let mut positions = Vec::with_capacity(self.len());

        if !self.rows.is_empty() {
            positions.push(Point::ORIGIN);
        }
        if self.rows.len() > 1 {
            positions.push(Point::new([self.rows[1].values[0], 0.0, 0.0]));
        }
        if self.rows.len() > 2 {
            let r1 = self.rows[1].values[0];
            let [r2, theta, _] = self.rows[2].values;
            let supplement = (180.0 - theta).to_radians();
            positions.push(Point::new([
                r1 + r2 * supplement.cos(),
                r2 * supplement.sin(),
                0.0,
            ]));
        }

        for (i, row) in self.rows.iter().enumerate().skip(3) {
            if let Some(&reference) = row.connections.iter().find(|&&c| c >= i) {
                return Err(CoordinateError::InvalidConnection { row: i, reference });
            }
            let [r, theta, phi] = row.values;
            let (sin_theta, cos_theta) = theta.to_radians().sin_cos();
            let (sin_phi, cos_phi) = phi.to_radians().sin_cos();
            let local = Vector::new(
                -r * cos_theta,
                r * cos_phi * sin_theta,
                r * sin_phi * sin_theta,
            );

            let a = positions[row.connections[2]];
            let b = positions[row.connections[1]];
            let c = positions[row.connections[0]];

            let bc = (c - b).normalize();
            let n = (b - a).cross(&bc).normalize();
            let frame = Matrix3::from_columns(&[bc, n.cross(&bc), n]);
            positions.push(c + frame * local);
        }

        Ok(CartesianCoordinates::new(positions))
    }
}

// =============================================================================
// DIAGRAM COORDINATES
// =============================================================================

/// Two-dimensional coordinates for structure diagrams; lifted to `z = 0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramCoordinates {
    positions: Vec<[f64; 2]>,
}

impl DiagramCoordinates {
    /// Creates diagram coordinates from `(x, y)` pairs.
    #[must_use]
    pub const fn new(positions: Vec<[f64; 2]>) -> Self {
        Self { positions }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position at `index` in the `z = 0` plane.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index.
    pub fn position(&self, index: usize) -> Result<Point, CoordinateError> {
        self.positions
            .get(index)
            .map(|&[x, y]| Point::new([x, y, 0.0]))
            .ok_or(CoordinateError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Lifts every position to `z = 0`.
    #[must_use]
    pub fn to_cartesian(&self) -> CartesianCoordinates {
        self.positions
            .iter()
            .map(|&[x, y]| Point::new([x, y, 0.0]))
            .collect::<Vec<_>>()
            .into()
    }
}

// =============================================================================
// COORDINATE SET
// =============================================================================

/// Any of the supported coordinate representations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoordinateSet {
    /// Plain 3D positions.
    Cartesian(CartesianCoordinates),
    /// A z-matrix.
    Internal(InternalCoordinates),
    /// 2D diagram positions.
    Diagram(DiagramCoordinates),
}

impl CoordinateSet {
    /// Number of positions described by the set.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Cartesian(c) => c.len(),
            Self::Internal(c) => c.len(),
            Self::Diagram(c) => c.len(),
        }
    }

    /// Returns `true` if the set describes no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts the set to Cartesian coordinates.
    ///
    /// # Errors
    ///
    /// Propagates [`InternalCoordinates::to_cartesian`] errors.
    pub fn to_cartesian(&self) -> Result<CartesianCoordinates, CoordinateError> {
        match self {
            Self::Cartesian(c) => Ok(c.clone()),
            Self::Internal(c) => c.to_cartesian(),
            Self::Diagram(c) => Ok(c.to_cartesian()),
        }
    }

    /// Cartesian position at `index`.
    ///
    /// Internal coordinates are converted in full first, since each row
    /// depends on earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::IndexOutOfRange`] for an invalid index, or a
    /// conversion error for malformed internal coordinates.
    pub fn position(&self, index: usize) -> Result<Point, CoordinateError> {
        match self {
            Self::Cartesian(c) => c.position(index),
            Self::Internal(c) => c.to_cartesian()?.position(index),
            Self::Diagram(c) => c.position(index),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zmatrix_chain() -> InternalCoordinates {
        let mut z = InternalCoordinates::new(5);
        z.set_coordinates(1, 1.0, 0.0, 0.0).unwrap();
        z.set_connections(2, 1, 0, 0).unwrap();
        z.set_coordinates(2, 1.2, 100.0, 0.0).unwrap();
        z.set_connections(3, 2, 1, 0).unwrap();
        z.set_coordinates(3, 1.5, 109.5, 60.0).unwrap();
        z.set_connections(4, 3, 2, 1).unwrap();
        z.set_coordinates(4, 0.9, 120.0, -120.0).unwrap();
        z
    }

    #[test]
    fn cartesian_index_errors() {
        let coords = CartesianCoordinates::with_len(2);
        assert_eq!(
            coords.distance(0, 2),
            Err(CoordinateError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert!(coords.position(1).is_ok());
    }

    #[test]
    fn cartesian_center_and_move() {
        let mut coords = CartesianCoordinates::new(vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([2.0, 0.0, 0.0]),
            Point::new([1.0, 3.0, 0.0]),
        ]);
        assert_eq!(coords.center(), Point::new([1.0, 1.0, 0.0]));

        let heavy_first = coords.weighted_center(&[2.0, 1.0, 1.0]).unwrap();
        assert_relative_eq!(heavy_first.x(), 0.75);
        assert_relative_eq!(heavy_first.y(), 0.75);
        assert!(coords.weighted_center(&[1.0]).is_err());

        coords.move_by(&Vector::new(0.0, 0.0, 5.0));
        assert_eq!(coords.center(), Point::new([1.0, 1.0, 5.0]));
        assert_relative_eq!(coords.distance(0, 1).unwrap(), 2.0);
    }

    #[test]
    fn empty_center_is_origin() {
        assert_eq!(CartesianCoordinates::default().center(), Point::ORIGIN);
    }

    #[test]
    fn zmatrix_first_three_atoms() {
        let cartesian = zmatrix_chain().to_cartesian().unwrap();
        assert_eq!(cartesian.position(0).unwrap(), Point::ORIGIN);
        assert_eq!(cartesian.position(1).unwrap(), Point::new([1.0, 0.0, 0.0]));
        let p2 = cartesian.position(2).unwrap();
        assert_relative_eq!(p2.z(), 0.0);
        assert_relative_eq!(cartesian.distance(1, 2).unwrap(), 1.2, epsilon = 1e-12);
        assert_relative_eq!(cartesian.angle(0, 1, 2).unwrap(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn zmatrix_recovers_internal_values() {
        let cartesian = zmatrix_chain().to_cartesian().unwrap();

        assert_relative_eq!(cartesian.distance(2, 3).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(cartesian.angle(3, 2, 1).unwrap(), 109.5, epsilon = 1e-9);
        assert_relative_eq!(cartesian.torsion_angle(0, 1, 2, 3).unwrap(), 60.0, epsilon = 1e-9);

        assert_relative_eq!(cartesian.distance(3, 4).unwrap(), 0.9, epsilon = 1e-12);
        assert_relative_eq!(cartesian.angle(4, 3, 2).unwrap(), 120.0, epsilon = 1e-9);
        assert_relative_eq!(
            cartesian.torsion_angle(1, 2, 3, 4).unwrap(),
            -120.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn zmatrix_radians_round_trip() {
        let mut z = InternalCoordinates::new(4);
        z.set_coordinates_radians(3, 1.1, std::f64::consts::FRAC_PI_2, std::f64::consts::PI)
            .unwrap();
        let [r, theta, phi] = z.coordinates(3).unwrap();
        assert_relative_eq!(r, 1.1);
        assert_relative_eq!(theta, 90.0);
        assert_relative_eq!(phi, 180.0);
        let radians = z.coordinates_radians(3).unwrap();
        assert_relative_eq!(radians[1], std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn zmatrix_forward_reference_is_rejected() {
        let mut z = zmatrix_chain();
        z.set_connections(3, 4, 1, 0).unwrap();
        assert_eq!(
            z.to_cartesian(),
            Err(CoordinateError::InvalidConnection {
                row: 3,
                reference: 4
            })
        );
    }

    #[test]
    fn diagram_lifts_to_plane() {
        let diagram = DiagramCoordinates::new(vec![[1.0, 2.0], [3.0, -1.0]]);
        let set = CoordinateSet::Diagram(diagram);
        assert_eq!(set.len(), 2);
        assert_eq!(set.position(1).unwrap(), Point::new([3.0, -1.0, 0.0]));
        let cartesian = set.to_cartesian().unwrap();
        assert!(cartesian.positions().iter().all(|p| p.z() == 0.0));
    }

    #[test]
    fn coordinate_set_internal_position() {
        let set = CoordinateSet::Internal(zmatrix_chain());
        let direct = zmatrix_chain().to_cartesian().unwrap();
        assert_eq!(set.position(4).unwrap(), direct.position(4).unwrap());
        assert!(set.position(5).is_err());
    }

    #[test]
    fn coordinate_set_serde_round_trip() {
        let set = CoordinateSet::Internal(zmatrix_chain());
        let json = serde_json::to_string(&set).unwrap();
        let back: CoordinateSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
