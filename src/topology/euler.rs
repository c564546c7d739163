//! Euler characteristic of simplicial complexes.
//!
//! The Euler characteristic is χ = Σ(-1)^k · `f_k` where `f_k` is the number
//! of `k`-simplices. The real part of a triangulation (and every alpha
//! complex of a point set in general position) is contractible or a union of
//! contractible pieces, so χ counts connected components minus tunnels plus
//! voids.
//!
//! # Examples
//!
//! ```rust
//! use alphasurf::core::triangulation::Triangulation;
//! use alphasurf::geometry::point::Point;
//! use alphasurf::topology::euler::euler_characteristic;
//!
//! let tri = Triangulation::new(&[
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([1.0, 0.0, 0.0]),
//!     Point::new([0.0, 1.0, 0.0]),
//!     Point::new([0.0, 0.0, 1.0]),
//! ])
//! .unwrap();
//!
//! assert_eq!(euler_characteristic(&tri.f_vector()), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts of k-simplices for 0 ≤ k ≤ 3.
///
/// In the topology literature this is commonly called the **f-vector**:
/// - `f₀` = vertices
/// - `f₁` = edges
/// - `f₂` = triangles
/// - `f₃` = tetrahedra
///
/// # Examples
///
/// ```rust
/// use alphasurf::topology::euler::FVector;
///
/// let counts = FVector::new([3, 3, 1, 0]);
/// assert_eq!(counts.count(1), 3);
/// assert_eq!(counts.count(7), 0);
/// assert_eq!(counts.dimension(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FVector {
    /// `by_dim[k]` = `f_k` = number of `k`-simplices
    pub by_dim: Vec<usize>,
}

impl FVector {
    /// Creates the f-vector of a three-dimensional complex.
    #[must_use]
    pub fn new(counts: [usize; 4]) -> Self {
        Self {
            by_dim: counts.to_vec(),
        }
    }

    /// Get the number of `k`-simplices.
    ///
    /// Returns 0 if `k` is out of range.
    #[must_use]
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.by_dim.get(k).copied().unwrap_or(0)
    }

    /// The largest `k` with `f_k > 0`, or `None` for the empty complex.
    #[must_use]
    pub fn dimension(&self) -> Option<usize> {
        self.by_dim.iter().rposition(|&f| f > 0)
    }

    /// Returns `true` if the complex has no simplices at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimension().is_none()
    }
}

impl fmt::Display for FVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V={} E={} F={} T={}",
            self.count(0),
            self.count(1),
            self.count(2),
            self.count(3)
        )
    }
}

/// Calculate the Euler characteristic from simplex counts.
///
/// # Examples
///
/// ```rust
/// use alphasurf::topology::euler::{FVector, euler_characteristic};
///
/// // tetrahedron: V=4, E=6, F=4, T=1 → χ = 4-6+4-1 = 1
/// assert_eq!(euler_characteristic(&FVector::new([4, 6, 4, 1])), 1);
///
/// // two disjoint points
/// assert_eq!(euler_characteristic(&FVector::new([2, 0, 0, 0])), 2);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Simplex counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &FVector) -> isize {
    counts
        .by_dim
        .iter()
        .enumerate()
        .map(|(k, &f_k)| {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            sign * (f_k as isize)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplex_counts() {
        let counts = FVector::new([3, 3, 1, 0]);

        assert_eq!(counts.count(0), 3);
        assert_eq!(counts.count(1), 3);
        assert_eq!(counts.count(2), 1);
        assert_eq!(counts.count(3), 0);
        assert_eq!(counts.count(4), 0); // out of range
        assert_eq!(counts.dimension(), Some(2));
        assert!(!counts.is_empty());
    }

    #[test]
    fn test_empty_complex() {
        let counts = FVector::new([0; 4]);
        assert!(counts.is_empty());
        assert_eq!(counts.dimension(), None);
        assert_eq!(euler_characteristic(&counts), 0);
    }

    #[test]
    fn test_euler_characteristic() {
        // triangle: V=3, E=3, F=1 → χ = 1
        assert_eq!(euler_characteristic(&FVector::new([3, 3, 1, 0])), 1);
        // hollow triangle (a loop) → χ = 0
        assert_eq!(euler_characteristic(&FVector::new([3, 3, 0, 0])), 0);
        // two tetrahedra glued on a face: V=5, E=9, F=7, T=2 → χ = 1
        assert_eq!(euler_characteristic(&FVector::new([5, 9, 7, 2])), 1);
    }

    #[test]
    fn test_display_and_serde() {
        let counts = FVector::new([4, 6, 4, 1]);
        assert_eq!(counts.to_string(), "V=4 E=6 F=4 T=1");

        let json = serde_json::to_string(&counts).unwrap();
        let back: FVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }
}
