//! Tetrahedral cells of the triangulation arena.
//!
//! A [`Cell`] stores four vertex indices and four neighbor slots. Slot `i`
//! refers to the cell sharing the face *opposite* vertex `i`, i.e. the face
//! made of the other three vertices in the order given by [`FACE_VERTICES`].
//!
//! Cells live in a slot map keyed by [`TetrahedronKey`]. Removing a cell
//! retires its key for good: the generational key of a replaced cell never
//! resolves again, even after its slot is reused.

use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Key of a tetrahedron in the triangulation arena.
    ///
    /// Keys stay valid until the tetrahedron is replaced by an insertion.
    pub struct TetrahedronKey;
}

/// Local vertex positions of the face opposite each vertex.
pub const FACE_VERTICES: [[usize; 3]; 4] = [[1, 2, 3], [0, 2, 3], [0, 1, 3], [0, 1, 2]];

/// What lies across one face of a tetrahedron.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Neighbor {
    /// The face is on the outer hull of the synthetic enclosing tetrahedron.
    #[default]
    Boundary,
    /// The neighbor has not been resolved yet. Only exists while an insertion
    /// is rewiring the mesh.
    Pending,
    /// The tetrahedron across the face.
    Tetrahedron(TetrahedronKey),
}

impl Neighbor {
    /// The neighboring tetrahedron's key, if there is one.
    #[inline]
    #[must_use]
    pub const fn key(self) -> Option<TetrahedronKey> {
        match self {
            Self::Tetrahedron(key) => Some(key),
            Self::Boundary | Self::Pending => None,
        }
    }
}

impl From<TetrahedronKey> for Neighbor {
    fn from(key: TetrahedronKey) -> Self {
        Self::Tetrahedron(key)
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boundary => write!(f, "boundary"),
            Self::Pending => write!(f, "pending"),
            Self::Tetrahedron(key) => write!(f, "{key:?}"),
        }
    }
}

/// A tetrahedron: four vertex indices with their opposite neighbors.
///
/// # Examples
///
/// ```rust
/// use alphasurf::core::tetrahedron::{Cell, Neighbor};
///
/// let cell = Cell::new([4, 7, 1, 9]);
/// assert_eq!(cell.face(1), [4, 1, 9]);
/// assert_eq!(cell.neighbor(1), Neighbor::Boundary);
/// assert_eq!(cell.index_of(9), Some(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    vertices: [usize; 4],
    neighbors: [Neighbor; 4],
}

impl Cell {
    /// Creates a cell whose faces are all on the boundary.
    #[must_use]
    pub const fn new(vertices: [usize; 4]) -> Self {
        Self {
            vertices,
            neighbors: [Neighbor::Boundary; 4],
        }
    }

    /// Creates a cell with the given neighbor slots.
    #[must_use]
    pub const fn with_neighbors(vertices: [usize; 4], neighbors: [Neighbor; 4]) -> Self {
        Self {
            vertices,
            neighbors,
        }
    }

    /// The four vertex indices.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[usize; 4] {
        &self.vertices
    }

    /// Vertex at local position `i`.
    #[inline]
    #[must_use]
    pub const fn vertex(&self, i: usize) -> usize {
        self.vertices[i]
    }

    /// The four neighbor slots.
    #[inline]
    #[must_use]
    pub const fn neighbors(&self) -> &[Neighbor; 4] {
        &self.neighbors
    }

    /// Neighbor across the face opposite vertex `i`.
    #[inline]
    #[must_use]
    pub const fn neighbor(&self, i: usize) -> Neighbor {
        self.neighbors[i]
    }

    pub(crate) const fn set_neighbor(&mut self, i: usize, neighbor: Neighbor) {
        self.neighbors[i] = neighbor;
    }

    /// Vertices of the face opposite vertex `i`.
    #[inline]
    #[must_use]
    pub const fn face(&self, i: usize) -> [usize; 3] {
        let [a, b, c] = FACE_VERTICES[i];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Local position of `vertex`, if the cell contains it.
    #[must_use]
    pub fn index_of(&self, vertex: usize) -> Option<usize> {
        self.vertices.iter().position(|&v| v == vertex)
    }

    /// Returns `true` if `vertex` is one of the cell's vertices.
    #[must_use]
    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Local index of the face made of exactly the vertices in `face`
    /// (any order), i.e. the position of the one vertex not in `face`.
    #[must_use]
    pub fn face_index(&self, face: &[usize; 3]) -> Option<usize> {
        if !face.iter().all(|v| self.contains_vertex(*v)) {
            return None;
        }
        self.vertices.iter().position(|v| !face.contains(v))
    }

    /// Local index of the face shared with `key`.
    #[must_use]
    pub fn neighbor_index(&self, key: TetrahedronKey) -> Option<usize> {
        self.neighbors
            .iter()
            .position(|&n| n == Neighbor::Tetrahedron(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn faces_exclude_their_opposite_vertex() {
        let cell = Cell::new([10, 11, 12, 13]);
        for i in 0..4 {
            let face = cell.face(i);
            assert!(!face.contains(&cell.vertex(i)));
            assert_eq!(cell.face_index(&face), Some(i));
        }
        assert_eq!(cell.face_index(&[10, 11, 99]), None);
    }

    #[test]
    fn neighbor_slots() {
        let mut arena: SlotMap<TetrahedronKey, Cell> = SlotMap::with_key();
        let a = arena.insert(Cell::new([0, 1, 2, 3]));
        let b = arena.insert(Cell::new([1, 2, 3, 4]));

        arena[a].set_neighbor(0, b.into());
        arena[b].set_neighbor(3, Neighbor::Tetrahedron(a));

        assert_eq!(arena[a].neighbor(0).key(), Some(b));
        assert_eq!(arena[a].neighbor_index(b), Some(0));
        assert_eq!(arena[b].neighbor_index(a), Some(3));
        assert_eq!(arena[a].neighbor(1).key(), None);
        assert_eq!(Neighbor::Pending.key(), None);
    }

    #[test]
    fn removed_key_does_not_resolve() {
        let mut arena: SlotMap<TetrahedronKey, Cell> = SlotMap::with_key();
        let a = arena.insert(Cell::new([0, 1, 2, 3]));
        arena.remove(a);
        let b = arena.insert(Cell::new([4, 5, 6, 7]));
        assert!(arena.get(a).is_none());
        assert!(arena.contains_key(b));
    }

    #[test]
    fn neighbor_display() {
        assert_eq!(Neighbor::Boundary.to_string(), "boundary");
        assert_eq!(Neighbor::Pending.to_string(), "pending");
    }
}
