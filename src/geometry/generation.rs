//! Random point generation for tests, benchmarks and examples.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::point::{Point, WeightedPoint};

/// Errors from point generation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PointGenerationError {
    /// The sampling range is empty or not finite.
    #[error("Invalid range: min {min} must be finite and less than max {max}")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

fn check_range(range: (f64, f64)) -> Result<(), PointGenerationError> {
    let (min, max) = range;
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(PointGenerationError::InvalidRange { min, max });
    }
    Ok(())
}

fn sample_points<R: Rng>(rng: &mut R, n_points: usize, range: (f64, f64)) -> Vec<Point> {
    (0..n_points)
        .map(|_| Point::new([0.0; 3].map(|_| rng.random_range(range.0..range.1))))
        .collect()
}

/// Generates `n_points` uniformly distributed in the cube `range³` using the
/// thread-local RNG.
///
/// # Errors
///
/// Returns [`PointGenerationError::InvalidRange`] if `range.0 >= range.1`.
pub fn random_points(
    n_points: usize,
    range: (f64, f64),
) -> Result<Vec<Point>, PointGenerationError> {
    check_range(range)?;
    Ok(sample_points(&mut rand::rng(), n_points, range))
}

/// Generates reproducible random points from `seed`.
///
/// # Errors
///
/// Returns [`PointGenerationError::InvalidRange`] if `range.0 >= range.1`.
///
/// # Examples
///
/// ```rust
/// use alphasurf::geometry::generation::random_points_seeded;
///
/// let a = random_points_seeded(20, (-5.0, 5.0), 42).unwrap();
/// let b = random_points_seeded(20, (-5.0, 5.0), 42).unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a, random_points_seeded(20, (-5.0, 5.0), 7).unwrap());
/// ```
pub fn random_points_seeded(
    n_points: usize,
    range: (f64, f64),
    seed: u64,
) -> Result<Vec<Point>, PointGenerationError> {
    check_range(range)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(sample_points(&mut rng, n_points, range))
}

/// Generates reproducible random weighted points; weights are uniform in
/// `weight_range`.
///
/// # Errors
///
/// Returns [`PointGenerationError::InvalidRange`] if either range is empty.
pub fn random_weighted_points_seeded(
    n_points: usize,
    range: (f64, f64),
    weight_range: (f64, f64),
    seed: u64,
) -> Result<Vec<WeightedPoint>, PointGenerationError> {
    check_range(range)?;
    check_range(weight_range)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let points = sample_points(&mut rng, n_points, range);
    Ok(points
        .into_iter()
        .map(|p| WeightedPoint::new(p, rng.random_range(weight_range.0..weight_range.1)))
        .collect())
}
