//! Canonical identifiers for the simplices exposed by queries.
//!
//! Lower-dimensional simplices are not stored explicitly; they are inferred
//! from tetrahedra. [`Edge`], [`Triangle`] and [`Tetrahedron`] identify a
//! simplex purely by its vertex indices, sorted ascending so that every
//! permutation of the same vertices maps to the same value. They are
//! `Copy`/`Hash`/`Ord` for use as set and map keys.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! canonical_simplex {
    ($(#[$meta:meta])* $name:ident, $n:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            vertices: [usize; $n],
        }

        impl $name {
            /// Creates the simplex; the indices are sorted.
            #[must_use]
            pub fn new(mut vertices: [usize; $n]) -> Self {
                vertices.sort_unstable();
                Self { vertices }
            }

            /// Sorted vertex indices.
            #[inline]
            #[must_use]
            pub const fn vertices(&self) -> [usize; $n] {
                self.vertices
            }

            /// Returns `true` if `vertex` is one of the simplex's vertices.
            #[inline]
            #[must_use]
            pub fn contains(&self, vertex: usize) -> bool {
                self.vertices.contains(&vertex)
            }
        }

        impl From<[usize; $n]> for $name {
            fn from(vertices: [usize; $n]) -> Self {
                Self::new(vertices)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:?}", self.vertices)
            }
        }
    };
}

canonical_simplex!(
    /// An undirected edge.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use alphasurf::core::simplex::Edge;
    ///
    /// assert_eq!(Edge::new([4, 1]), Edge::new([1, 4]));
    /// assert_eq!(Edge::new([4, 1]).vertices(), [1, 4]);
    /// ```
    Edge,
    2
);

canonical_simplex!(
    /// An unoriented triangle.
    Triangle,
    3
);

canonical_simplex!(
    /// An unoriented tetrahedron.
    Tetrahedron,
    4
);

impl Edge {
    /// Endpoint with the smaller index.
    #[inline]
    #[must_use]
    pub const fn v0(&self) -> usize {
        self.vertices[0]
    }

    /// Endpoint with the larger index.
    #[inline]
    #[must_use]
    pub const fn v1(&self) -> usize {
        self.vertices[1]
    }
}

impl Triangle {
    /// The three edges of the triangle.
    #[must_use]
    pub const fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.vertices;
        [
            Edge { vertices: [a, b] },
            Edge { vertices: [a, c] },
            Edge { vertices: [b, c] },
        ]
    }

    /// The vertex of the triangle not on `edge`, if `edge` belongs to it.
    #[must_use]
    pub fn opposite(&self, edge: &Edge) -> Option<usize> {
        if !(self.contains(edge.v0()) && self.contains(edge.v1())) {
            return None;
        }
        self.vertices
            .iter()
            .copied()
            .find(|&v| v != edge.v0() && v != edge.v1())
    }
}

impl Tetrahedron {
    /// The four faces of the tetrahedron; face `i` omits vertex `i`.
    #[must_use]
    pub const fn triangles(&self) -> [Triangle; 4] {
        let [a, b, c, d] = self.vertices;
        [
            Triangle { vertices: [b, c, d] },
            Triangle { vertices: [a, c, d] },
            Triangle { vertices: [a, b, d] },
            Triangle { vertices: [a, b, c] },
        ]
    }

    /// The six edges of the tetrahedron.
    #[must_use]
    pub const fn edges(&self) -> [Edge; 6] {
        let [a, b, c, d] = self.vertices;
        [
            Edge { vertices: [a, b] },
            Edge { vertices: [a, c] },
            Edge { vertices: [a, d] },
            Edge { vertices: [b, c] },
            Edge { vertices: [b, d] },
            Edge { vertices: [c, d] },
        ]
    }
}
