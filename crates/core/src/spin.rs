use ndarray::Array2;
use thiserror::Error;

use crate::lattice::{Lattice, LatticeError, Site};

/// Tolerance on `|s| - 1` accepted for a unit spin.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// A planar unit spin vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub x: f64,
    pub y: f64,
}

/// Errors that can occur when building spins and spin configurations.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SpinError {
    #[error("spin ({x}, {y}) is not a unit vector")]
    NotUnit { x: f64, y: f64 },

    #[error("spin at site ({x}, {y}) is not a unit vector")]
    NotUnitAt { x: usize, y: usize },

    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

impl Spin {
    /// The reference direction every spin points along in the aligned state.
    pub const ALIGNED: Spin = Spin { x: 0.0, y: 1.0 };

    /// Creates a spin from its components.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::NotUnit`] unless the vector has unit norm within
    /// [`NORM_TOLERANCE`].
    pub fn new(x: f64, y: f64) -> Result<Self, SpinError> {
        let spin = Self { x, y };
        if spin.is_unit() {
            Ok(spin)
        } else {
            Err(SpinError::NotUnit { x, y })
        }
    }

    /// Creates the spin `(cos θ, sin θ)`.
    #[must_use]
    pub fn from_angle(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { x: cos, y: sin }
    }

    /// Returns the angle of this spin in `(-π, π]`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns the dot product, the cosine of the relative angle.
    #[must_use]
    pub fn dot(&self, other: &Spin) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the z component of the cross product, the signed sine of the
    /// relative angle from `self` to `other`.
    #[must_use]
    pub fn cross(&self, other: &Spin) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        let norm = self.x.hypot(self.y);
        norm.is_finite() && (norm - 1.0).abs() <= NORM_TOLERANCE
    }
}

/// A unit spin on every site of a periodic lattice.
///
/// Configurations are immutable once built; consumers only read, copy, or
/// select them.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinConfiguration {
    lattice: Lattice,
    spins: Array2<Spin>,
}

impl SpinConfiguration {
    /// Wraps a `(dim_x, dim_y)` array of spins.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is smaller than the minimum lattice or
    /// any spin is not a unit vector.
    pub fn new(spins: Array2<Spin>) -> Result<Self, SpinError> {
        let (dim_x, dim_y) = spins.dim();
        let lattice = Lattice::new(dim_x, dim_y)?;

        if let Some(((x, y), _)) = spins.indexed_iter().find(|(_, s)| !s.is_unit()) {
            return Err(SpinError::NotUnitAt { x, y });
        }

        Ok(Self { lattice, spins })
    }

    /// Builds a configuration from spin angles.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is smaller than the minimum lattice or
    /// any angle is not finite.
    pub fn from_angles(angles: &Array2<f64>) -> Result<Self, SpinError> {
        Self::new(angles.mapv(Spin::from_angle))
    }

    /// Returns the uniform state with every spin along [`Spin::ALIGNED`].
    #[must_use]
    pub fn aligned(lattice: Lattice) -> Self {
        Self {
            lattice,
            spins: Array2::from_elem(lattice.shape(), Spin::ALIGNED),
        }
    }

    #[must_use]
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    /// Returns the spin at `site`.
    ///
    /// # Panics
    ///
    /// Panics if `site` lies outside the lattice.
    #[must_use]
    pub fn get(&self, site: Site) -> Spin {
        self.spins[[site.0, site.1]]
    }

    #[must_use]
    pub fn spins(&self) -> &Array2<Spin> {
        &self.spins
    }

    /// Returns the spin angles in `(-π, π]`.
    #[must_use]
    pub fn angles(&self) -> Array2<f64> {
        self.spins.mapv(|s| s.angle())
    }

    /// Returns a copy with the spin at `site` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::NotUnit`] if `spin` is not a unit vector.
    ///
    /// # Panics
    ///
    /// Panics if `site` lies outside the lattice.
    pub fn with_spin(&self, site: Site, spin: Spin) -> Result<Self, SpinError> {
        let spin = Spin::new(spin.x, spin.y)?;
        let mut spins = self.spins.clone();
        spins[[site.0, site.1]] = spin;
        Ok(Self {
            lattice: self.lattice,
            spins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn angle_round_trips_through_vector() {
        let spin = Spin::from_angle(2.0);
        assert_relative_eq!(spin.angle(), 2.0, epsilon = 1e-12);
        assert!(spin.is_unit());
    }

    #[test]
    fn dot_and_cross_of_quarter_turn() {
        let a = Spin::from_angle(0.0);
        let b = Spin::from_angle(FRAC_PI_2);

        assert_relative_eq!(a.dot(&b), 0.0, epsilon = 1e-12);
        assert_relative_eq!(a.cross(&b), 1.0, epsilon = 1e-12);
        assert_relative_eq!(b.cross(&a), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_non_unit_spins() {
        assert_eq!(
            Spin::new(1.0, 1.0),
            Err(SpinError::NotUnit { x: 1.0, y: 1.0 })
        );
        assert!(Spin::new(f64::NAN, 0.0).is_err());
        assert!(Spin::new(0.6, 0.8).is_ok());
    }

    #[test]
    fn configuration_reports_offending_site() {
        let mut spins = Array2::from_elem((3, 3), Spin::ALIGNED);
        spins[[1, 2]] = Spin { x: 0.5, y: 0.5 };

        assert_eq!(
            SpinConfiguration::new(spins),
            Err(SpinError::NotUnitAt { x: 1, y: 2 })
        );
    }

    #[test]
    fn configuration_rejects_single_row() {
        let spins = Array2::from_elem((1, 4), Spin::ALIGNED);
        assert!(matches!(
            SpinConfiguration::new(spins),
            Err(SpinError::Lattice(_))
        ));
    }

    #[test]
    fn aligned_state_points_along_reference() {
        let lattice = Lattice::new(3, 2).unwrap();
        let config = SpinConfiguration::aligned(lattice);

        assert_eq!(config.lattice(), lattice);
        assert!(config.spins().iter().all(|s| *s == Spin::ALIGNED));
    }

    #[test]
    fn from_angles_preserves_layout() {
        let angles = array![[0.0, FRAC_PI_2], [PI / 4.0, -FRAC_PI_2]];
        let config = SpinConfiguration::from_angles(&angles).unwrap();

        assert_relative_eq!(config.get((0, 1)).y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(config.angles()[[1, 1]], -FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn with_spin_copies() {
        let lattice = Lattice::square(2).unwrap();
        let original = SpinConfiguration::aligned(lattice);
        let flipped = original
            .with_spin((1, 0), Spin::from_angle(PI))
            .unwrap();

        assert_eq!(original.get((1, 0)), Spin::ALIGNED);
        assert_relative_eq!(flipped.get((1, 0)).x, -1.0, epsilon = 1e-12);
    }
}
