//! Vortex detection on periodic spin lattices.
//!
//! # Algorithm
//!
//! Each site anchors one elementary plaquette (see [`xy_core::Lattice::plaquette`]).
//! Walking its four edges in loop order, the signed shortest angle across an
//! edge from spin `a` to spin `b` is
//!
//! ```text
//! acos(clamp(a · b, -1, 1)) * sign(a × b)
//! ```
//!
//! where `sign(0) = 0`, so an edge whose cross product is exactly zero
//! contributes no angle. The four edge angles sum to the plaquette's winding,
//! which is close to `2πk` for integer winding number `k`.
//!
//! # Chirality
//!
//! A plaquette counts as a vortex when its winding is strictly greater than
//! the threshold (π by default). The comparison is one-sided on the signed
//! winding: antivortices (winding near `-2π`) are not counted. Use
//! [`VortexDetector::winding_field`] to inspect both chiralities.

use std::f64::consts::PI;

use ndarray::Array2;
use thiserror::Error;
use xy_core::{Site, Spin, SpinConfiguration};

/// Error returned for an unusable vortex threshold.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("vortex threshold must be finite and positive, got {0}")]
pub struct ThresholdError(pub f64);

/// Counts vortices in spin configurations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VortexDetector {
    threshold: f64,
}

impl Default for VortexDetector {
    fn default() -> Self {
        Self { threshold: PI }
    }
}

impl VortexDetector {
    /// Creates a detector with a custom winding threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError`] unless `threshold` is finite and positive.
    pub fn new(threshold: f64) -> Result<Self, ThresholdError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ThresholdError(threshold));
        }
        Ok(Self { threshold })
    }

    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` if a plaquette with this winding hosts a vortex.
    #[must_use]
    pub fn is_vortex(&self, winding: f64) -> bool {
        winding > self.threshold
    }

    /// Returns the winding of the plaquette anchored at `site`.
    #[must_use]
    pub fn plaquette_winding(&self, config: &SpinConfiguration, site: Site) -> f64 {
        let corners = config.lattice().plaquette(site).map(|s| config.get(s));
        (0..corners.len())
            .map(|i| {
                let from = &corners[(i + corners.len() - 1) % corners.len()];
                edge_angle(from, &corners[i])
            })
            .sum()
    }

    /// Returns the winding of every plaquette, indexed by anchor site.
    #[must_use]
    pub fn winding_field(&self, config: &SpinConfiguration) -> Array2<f64> {
        let lattice = config.lattice();
        Array2::from_shape_fn(lattice.shape(), |site| self.plaquette_winding(config, site))
    }

    /// Counts the vortices in one configuration.
    #[must_use]
    pub fn count(&self, config: &SpinConfiguration) -> usize {
        config
            .lattice()
            .sites()
            .filter(|&site| self.is_vortex(self.plaquette_winding(config, site)))
            .count()
    }

    /// Counts the vortices in each configuration, preserving input order.
    pub fn count_batch<'a, I>(&self, configs: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a SpinConfiguration>,
    {
        configs.into_iter().map(|c| self.count(c)).collect()
    }
}

/// Returns the signed shortest angle rotating spin `from` onto spin `to`.
#[must_use]
pub fn edge_angle(from: &Spin, to: &Spin) -> f64 {
    from.dot(to).clamp(-1.0, 1.0).acos() * sign(from.cross(to))
}

/// Like `f64::signum`, but maps both zeros to zero.
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
