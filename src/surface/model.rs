//! Molecular surfaces as unions of balls.
//!
//! A [`SurfaceModel`] snapshots particle positions and base radii from a
//! [`ParticleSource`], inflates the radii according to its [`SurfaceType`]
//! and measures the union of the resulting balls exactly with the
//! inclusion–exclusion sums over its weighted alpha complex.
//!
//! The weighted alpha complex (weights are squared effective radii,
//! `alpha = 0`) and both measures are built lazily and cached. Every setter
//! drops the caches; the next query rebuilds from scratch.
//!
//! # Examples
//!
//! ```rust
//! use alphasurf::geometry::point::Point;
//! use alphasurf::surface::model::{SurfaceModel, SurfaceType};
//! use approx::assert_relative_eq;
//! use std::f64::consts::PI;
//!
//! let mut surface = SurfaceModel::new(vec![(Point::new([0.0, 0.0, 0.0]), 1.2)]).unwrap();
//! assert_relative_eq!(surface.surface_area().unwrap(), 4.0 * PI * 1.44, epsilon = 1e-12);
//!
//! // solvent accessible: the radius grows by the probe radius
//! surface.set_surface_type(SurfaceType::SolventAccessible);
//! assert_relative_eq!(surface.radius(0).unwrap(), 2.6, epsilon = 1e-12);
//! assert_relative_eq!(
//!     surface.volume().unwrap(),
//!     4.0 / 3.0 * PI * 2.6_f64.powi(3),
//!     epsilon = 1e-9
//! );
//! ```

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::alpha::complex::AlphaComplex;
use crate::core::cache::LazyCache;
use crate::core::triangulation::{Triangulation, TriangulationError};
use crate::core::validation::ValidationError;
use crate::geometry::point::{Point, WeightedPoint};
use crate::surface::integrals::BallUnion;

/// Default probe radius, approximating a water molecule (in ångström).
pub const DEFAULT_PROBE_RADIUS: f64 = 1.4;

/// Which radius each particle contributes to the union.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    /// The base radius.
    #[default]
    VanDerWaals,
    /// Base radius plus probe radius: the surface traced by the probe center.
    SolventAccessible,
    /// Base radius plus probe radius, as for [`SolventAccessible`](Self::SolventAccessible).
    SolventExcluded,
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VanDerWaals => write!(f, "van der Waals"),
            Self::SolventAccessible => write!(f, "solvent accessible"),
            Self::SolventExcluded => write!(f, "solvent excluded"),
        }
    }
}

/// Errors from building or measuring a surface.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// A particle's radius is negative or not finite.
    #[error("Particle {index} has invalid radius {radius}")]
    InvalidRadius {
        /// Particle index.
        index: usize,
        /// The offending radius.
        radius: f64,
    },

    /// The probe radius is negative or not finite.
    #[error("Invalid probe radius {radius}")]
    InvalidProbeRadius {
        /// The offending radius.
        radius: f64,
    },

    /// A caller-supplied particle index is out of range.
    #[error("Particle index {index} out of range for {len} particles")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of particles.
        len: usize,
    },

    /// Intersections are defined for one to four balls.
    #[error("Intersection of {count} balls is not supported (expected 1 to 4)")]
    InvalidBallCount {
        /// Number of balls supplied.
        count: usize,
    },

    /// Building the weighted triangulation failed.
    #[error("Failed to triangulate particles: {0}")]
    Triangulation(#[from] TriangulationError),

    /// The weighted triangulation was built but fails its consistency
    /// checks; measuring it would give wrong results.
    #[error("Triangulation of particles is inconsistent: {0}")]
    Validation(#[from] ValidationError),
}

/// One to four particle indices.
#[derive(Clone, Copy, Debug)]
enum BallGroup {
    One(usize),
    Two(usize, usize),
    Three(usize, usize, usize),
    Four(usize, usize, usize, usize),
}

impl BallGroup {
    fn new(balls: &[usize]) -> Result<Self, SurfaceError> {
        match *balls {
            [i] => Ok(Self::One(i)),
            [i, j] => Ok(Self::Two(i, j)),
            [i, j, k] => Ok(Self::Three(i, j, k)),
            [i, j, k, l] => Ok(Self::Four(i, j, k, l)),
            _ => Err(SurfaceError::InvalidBallCount { count: balls.len() }),
        }
    }
}

/// A read-only provider of particles (atoms): positions and base radii,
/// indexed `0..len`.
pub trait ParticleSource {
    /// Number of particles.
    fn len(&self) -> usize;

    /// Returns `true` if there are no particles.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of particle `index`.
    fn position(&self, index: usize) -> Point;

    /// Base radius of particle `index`.
    fn radius(&self, index: usize) -> f64;
}

impl ParticleSource for [(Point, f64)] {
    fn len(&self) -> usize {
        <[(Point, f64)]>::len(self)
    }

    fn position(&self, index: usize) -> Point {
        self[index].0
    }

    fn radius(&self, index: usize) -> f64 {
        self[index].1
    }
}

/// The union of one ball per particle, with cached area and volume.
#[derive(Clone, Debug)]
pub struct SurfaceModel {
    particles: Vec<(Point, f64)>,
    probe_radius: f64,
    surface_type: SurfaceType,
    complex: LazyCache<AlphaComplex>,
    volume: LazyCache<f64>,
    surface_area: LazyCache<f64>,
}

fn check_radii(particles: &[(Point, f64)]) -> Result<(), SurfaceError> {
    match particles
        .iter()
        .enumerate()
        .find(|(_, (_, r))| !(r.is_finite() && *r >= 0.0))
    {
        Some((index, &(_, radius))) => Err(SurfaceError::InvalidRadius { index, radius }),
        None => Ok(()),
    }
}

impl SurfaceModel {
    /// Creates a van der Waals surface with the default probe radius.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidRadius`] for a negative or non-finite
    /// radius.
    pub fn new(particles: Vec<(Point, f64)>) -> Result<Self, SurfaceError> {
        check_radii(&particles)?;
        Ok(Self {
            particles,
            probe_radius: DEFAULT_PROBE_RADIUS,
            surface_type: SurfaceType::default(),
            complex: LazyCache::new(),
            volume: LazyCache::new(),
            surface_area: LazyCache::new(),
        })
    }

    /// Snapshots every particle of `source`.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_source<S: ParticleSource + ?Sized>(source: &S) -> Result<Self, SurfaceError> {
        Self::new(snapshot(source))
    }

    fn invalidate(&self) {
        self.complex.invalidate();
        self.volume.invalidate();
        self.surface_area.invalidate();
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replaces the particles with a fresh snapshot of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidRadius`]; the model is unchanged.
    pub fn set_source<S: ParticleSource + ?Sized>(&mut self, source: &S) -> Result<(), SurfaceError> {
        self.set_particles(snapshot(source))
    }

    /// Replaces the particles.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidRadius`]; the model is unchanged.
    pub fn set_particles(&mut self, particles: Vec<(Point, f64)>) -> Result<(), SurfaceError> {
        check_radii(&particles)?;
        self.particles = particles;
        self.invalidate();
        Ok(())
    }

    /// The particles (positions and base radii).
    #[must_use]
    pub fn particles(&self) -> &[(Point, f64)] {
        &self.particles
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Returns `true` if there are no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Sets the probe radius.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidProbeRadius`] for a negative or
    /// non-finite radius; the model is unchanged.
    pub fn set_probe_radius(&mut self, radius: f64) -> Result<(), SurfaceError> {
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SurfaceError::InvalidProbeRadius { radius });
        }
        self.probe_radius = radius;
        self.invalidate();
        Ok(())
    }

    /// The probe radius.
    #[must_use]
    pub const fn probe_radius(&self) -> f64 {
        self.probe_radius
    }

    /// Sets the surface type.
    pub fn set_surface_type(&mut self, surface_type: SurfaceType) {
        self.surface_type = surface_type;
        self.invalidate();
    }

    /// The surface type.
    #[must_use]
    pub const fn surface_type(&self) -> SurfaceType {
        self.surface_type
    }

    // -------------------------------------------------------------------------
    // Balls
    // -------------------------------------------------------------------------

    fn check_index(&self, index: usize) -> Result<(), SurfaceError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(SurfaceError::IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    fn effective_radius(&self, base: f64) -> f64 {
        match self.surface_type {
            SurfaceType::VanDerWaals => base,
            SurfaceType::SolventAccessible | SurfaceType::SolventExcluded => {
                base + self.probe_radius
            }
        }
    }

    fn radii(&self) -> Vec<f64> {
        self.particles
            .iter()
            .map(|&(_, r)| self.effective_radius(r))
            .collect()
    }

    /// Position of particle `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::IndexOutOfRange`].
    pub fn position(&self, index: usize) -> Result<Point, SurfaceError> {
        self.check_index(index)?;
        Ok(self.particles[index].0)
    }

    /// Effective radius of particle `index` under the current surface type.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::IndexOutOfRange`].
    pub fn radius(&self, index: usize) -> Result<f64, SurfaceError> {
        self.check_index(index)?;
        Ok(self.effective_radius(self.particles[index].1))
    }

    /// The weighted alpha complex of the balls at `alpha = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Triangulation`] if the balls cannot be
    /// triangulated and [`SurfaceError::Validation`] if the triangulation
    /// fails its structural or power-condition checks.
    pub fn alpha_complex(&self) -> Result<Arc<AlphaComplex>, SurfaceError> {
        self.complex.get_or_try_build(|| {
            let balls: Vec<WeightedPoint> = self
                .particles
                .iter()
                .map(|&(p, r)| WeightedPoint::from_radius(p, self.effective_radius(r)))
                .collect();
            let triangulation = Triangulation::from_weighted_points(&balls)?;
            triangulation.validate()?;
            triangulation.validate_power_condition()?;
            tracing::debug!(
                particles = balls.len(),
                surface_type = %self.surface_type,
                tetrahedra = triangulation.tetrahedron_count(),
                "built surface alpha complex"
            );
            Ok(AlphaComplex::new(triangulation, 0.0))
        })
    }

    fn measure<T>(
        &self,
        f: impl FnOnce(&BallUnion<'_>, &AlphaComplex) -> T,
    ) -> Result<T, SurfaceError> {
        let complex = self.alpha_complex()?;
        let radii = self.radii();
        let union = BallUnion::new(complex.triangulation().points(), &radii);
        Ok(f(&union, &complex))
    }

    /// Area of the sphere of particle `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::IndexOutOfRange`].
    pub fn ball_area(&self, index: usize) -> Result<f64, SurfaceError> {
        Ok(4.0 * std::f64::consts::PI * self.radius(index)?.powi(2))
    }

    /// Area of the spheres of `balls` (one to four particle indices) lying
    /// inside all the other balls of the group. For a single ball this is
    /// its full sphere.
    ///
    /// The value is the inclusion–exclusion term of the group and is only
    /// meaningful when the group is a simplex of [`alpha_complex`](Self::alpha_complex).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidBallCount`] or
    /// [`SurfaceError::IndexOutOfRange`].
    pub fn intersection_area(&self, balls: &[usize]) -> Result<f64, SurfaceError> {
        self.intersection(balls, |u, group| match group {
            BallGroup::One(i) => u.ball_area(i),
            BallGroup::Two(i, j) => u.intersection2_area(i, j),
            BallGroup::Three(i, j, k) => u.intersection3_area(i, j, k),
            BallGroup::Four(i, j, k, l) => u.intersection4_area(i, j, k, l),
        })
    }

    /// Volume of the intersection of `balls` (one to four particle indices).
    ///
    /// Same conditions as [`intersection_area`](Self::intersection_area).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidBallCount`] or
    /// [`SurfaceError::IndexOutOfRange`].
    pub fn intersection_volume(&self, balls: &[usize]) -> Result<f64, SurfaceError> {
        self.intersection(balls, |u, group| match group {
            BallGroup::One(i) => u.ball_volume(i),
            BallGroup::Two(i, j) => u.intersection2_volume(i, j),
            BallGroup::Three(i, j, k) => u.intersection3_volume(i, j, k),
            BallGroup::Four(i, j, k, l) => u.intersection4_volume(i, j, k, l),
        })
    }

    fn intersection(
        &self,
        balls: &[usize],
        f: impl FnOnce(&BallUnion<'_>, BallGroup) -> f64,
    ) -> Result<f64, SurfaceError> {
        let group = BallGroup::new(balls)?;
        for &index in balls {
            self.check_index(index)?;
        }
        let weighted: Vec<WeightedPoint> = self
            .particles
            .iter()
            .map(|&(p, r)| WeightedPoint::from_radius(p, self.effective_radius(r)))
            .collect();
        let radii = self.radii();
        Ok(f(&BallUnion::new(&weighted, &radii), group))
    }

    // -------------------------------------------------------------------------
    // Totals
    // -------------------------------------------------------------------------

    /// Volume enclosed by the surface.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`alpha_complex`](Self::alpha_complex).
    pub fn volume(&self) -> Result<f64, SurfaceError> {
        self.volume
            .get_or_try_build(|| self.measure(|union, complex| union.total_volume(complex)))
            .map(|v| *v)
    }

    /// Area of the surface.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`alpha_complex`](Self::alpha_complex).
    pub fn surface_area(&self) -> Result<f64, SurfaceError> {
        self.surface_area
            .get_or_try_build(|| self.measure(|union, complex| union.total_area(complex)))
            .map(|a| *a)
    }

    /// Computes [`volume`](Self::volume) on a background thread working on
    /// a snapshot of the model. The result is not written back into this
    /// model's cache.
    #[must_use = "join the handle to obtain the volume"]
    pub fn volume_async(&self) -> JoinHandle<Result<f64, SurfaceError>> {
        let snapshot = self.clone();
        thread::spawn(move || snapshot.volume())
    }

    /// Computes [`surface_area`](Self::surface_area) on a background thread
    /// working on a snapshot of the model.
    #[must_use = "join the handle to obtain the surface area"]
    pub fn surface_area_async(&self) -> JoinHandle<Result<f64, SurfaceError>> {
        let snapshot = self.clone();
        thread::spawn(move || snapshot.surface_area())
    }
}

fn snapshot<S: ParticleSource + ?Sized>(source: &S) -> Vec<(Point, f64)> {
    (0..source.len())
        .map(|i| (source.position(i), source.radius(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn hydrogen(x: f64) -> (Point, f64) {
        (Point::new([x, 0.0, 0.0]), 1.2)
    }

    // =============================================================================
    // CLOSED-FORM CASES
    // =============================================================================

    #[test]
    fn single_ball() {
        let surface = SurfaceModel::new(vec![hydrogen(0.0)]).unwrap();
        assert_relative_eq!(surface.volume().unwrap(), 7.238_229_473_870_882, epsilon = 1e-12);
        assert_relative_eq!(surface.surface_area().unwrap(), 18.095_573_684_677_21, epsilon = 1e-12);
    }

    #[test]
    fn disjoint_balls_add_up() {
        let surface = SurfaceModel::new(vec![hydrogen(0.0), hydrogen(2.4)]).unwrap();
        assert_relative_eq!(surface.volume().unwrap(), 14.476_458_947_741_763, epsilon = 1e-9);
        assert_relative_eq!(surface.surface_area().unwrap(), 36.191_147_369_354_42, epsilon = 1e-9);
    }

    #[test]
    fn overlapping_pair_is_a_lens_union() {
        let surface = SurfaceModel::new(vec![hydrogen(0.0), hydrogen(1.0)]).unwrap();
        let (r, d) = (1.2_f64, 1.0_f64);
        let lens = PI * (4.0 * r + d) * (2.0 * r - d).powi(2) / 12.0;
        assert_relative_eq!(
            surface.volume().unwrap(),
            2.0 * 4.0 / 3.0 * PI * r.powi(3) - lens,
            epsilon = 1e-9
        );
        assert_relative_eq!(surface.volume().unwrap(), 11.500_323_507_241_033, epsilon = 1e-9);
        assert_relative_eq!(surface.surface_area().unwrap(), 25.635_396_053_292_716, epsilon = 1e-9);
    }

    #[test]
    fn empty_model_measures_zero() {
        let surface = SurfaceModel::new(Vec::new()).unwrap();
        assert!(surface.is_empty());
        assert_eq!(surface.volume().unwrap(), 0.0);
        assert_eq!(surface.surface_area().unwrap(), 0.0);
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    #[test]
    fn setters_invalidate_cached_results() {
        let mut surface = SurfaceModel::new(vec![hydrogen(0.0)]).unwrap();
        let vdw = surface.volume().unwrap();

        surface.set_surface_type(SurfaceType::SolventAccessible);
        assert_relative_eq!(surface.volume().unwrap(), 73.622_176_639_325_6, epsilon = 1e-9);
        assert_relative_eq!(surface.surface_area().unwrap(), 84.948_665_353_068_01, epsilon = 1e-9);

        surface.set_probe_radius(0.0).unwrap();
        assert_relative_eq!(surface.volume().unwrap(), vdw, epsilon = 1e-12);

        surface.set_particles(vec![hydrogen(0.0), hydrogen(5.0)]).unwrap();
        assert_relative_eq!(surface.volume().unwrap(), 2.0 * vdw, epsilon = 1e-9);
    }

    #[test]
    fn solvent_excluded_uses_inflated_radii() {
        let mut surface = SurfaceModel::new(vec![hydrogen(0.0)]).unwrap();
        surface.set_surface_type(SurfaceType::SolventExcluded);
        assert_relative_eq!(surface.radius(0).unwrap(), 1.2 + DEFAULT_PROBE_RADIUS);
        assert_eq!(surface.surface_type().to_string(), "solvent excluded");
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            SurfaceModel::new(vec![hydrogen(0.0), (Point::ORIGIN, -1.0)]).unwrap_err(),
            SurfaceError::InvalidRadius {
                index: 1,
                radius: -1.0
            }
        );

        let mut surface = SurfaceModel::new(vec![hydrogen(0.0)]).unwrap();
        assert!(matches!(
            surface.set_probe_radius(f64::NAN),
            Err(SurfaceError::InvalidProbeRadius { .. })
        ));
        assert_relative_eq!(surface.probe_radius(), DEFAULT_PROBE_RADIUS);
        assert_eq!(
            surface.radius(3),
            Err(SurfaceError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            surface.intersection_area(&[0, 0, 0, 0, 0]),
            Err(SurfaceError::InvalidBallCount { count: 5 })
        );
        assert_eq!(
            surface.intersection_volume(&[]),
            Err(SurfaceError::InvalidBallCount { count: 0 })
        );
    }

    #[test]
    fn validation_failures_are_reported() {
        let err = SurfaceError::from(ValidationError::VisibleRedundant {
            vertex: 6,
            vertices: [0, 1, 2, 3],
        });
        assert!(matches!(err, SurfaceError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Triangulation of particles is inconsistent: Redundant point 6 conflicts with tetrahedron [0, 1, 2, 3] containing it"
        );
    }

    #[test]
    fn planar_rings_are_measured_on_valid_meshes() {
        let ring = |z: f64| -> Vec<(Point, f64)> {
            (0..6)
                .map(|k| {
                    let t = std::f64::consts::PI * f64::from(k) / 3.0;
                    (Point::new([1.39 * t.cos(), 1.39 * t.sin(), z]), 1.7)
                })
                .collect()
        };
        let flat = SurfaceModel::new(ring(0.0)).unwrap();
        let lifted = SurfaceModel::new(ring(0.7)).unwrap();

        let complex = flat.alpha_complex().unwrap();
        assert_eq!(complex.triangulation().validate(), Ok(()));
        assert_eq!(complex.vertex_count(), 6);
        assert_eq!(complex.tetrahedron_count(), 0);
        assert_relative_eq!(flat.volume().unwrap(), lifted.volume().unwrap(), max_relative = 1e-12);
        assert_relative_eq!(
            flat.surface_area().unwrap(),
            lifted.surface_area().unwrap(),
            max_relative = 1e-12
        );
    }

    // =============================================================================
    // PARTICLE SOURCES AND PER-GROUP TERMS
    // =============================================================================

    #[test]
    fn from_slice_source() {
        let atoms = [hydrogen(0.0), hydrogen(1.0)];
        let surface = SurfaceModel::from_source(&atoms[..]).unwrap();
        assert_eq!(surface.len(), 2);
        assert_eq!(surface.position(1).unwrap(), Point::new([1.0, 0.0, 0.0]));
        assert_eq!(surface.particles(), &atoms);
    }

    #[test]
    fn intersection_terms_of_a_pair() {
        let surface = SurfaceModel::new(vec![hydrogen(0.0), hydrogen(1.0)]).unwrap();
        let balls = surface.intersection_volume(&[0]).unwrap() + surface.intersection_volume(&[1]).unwrap();
        let lens = surface.intersection_volume(&[0, 1]).unwrap();
        assert_relative_eq!(balls - lens, surface.volume().unwrap(), epsilon = 1e-12);
        assert_relative_eq!(surface.ball_area(0).unwrap(), surface.intersection_area(&[0]).unwrap());
    }

    // =============================================================================
    // ASYNC
    // =============================================================================

    #[test]
    fn async_results_match_sync() {
        let surface = SurfaceModel::new(vec![hydrogen(0.0), hydrogen(1.0), hydrogen(1.8)]).unwrap();
        let volume = surface.volume_async();
        let area = surface.surface_area_async();
        assert_relative_eq!(volume.join().unwrap().unwrap(), surface.volume().unwrap());
        assert_relative_eq!(area.join().unwrap().unwrap(), surface.surface_area().unwrap());
    }
}
