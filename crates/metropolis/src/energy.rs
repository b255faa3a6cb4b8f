//! XY Hamiltonian on a periodic lattice.
//!
//! With unit coupling,
//!
//! ```text
//! H = -Σ_sites [cos(θ - θ_right) + cos(θ - θ_down)]
//! ```
//!
//! which equals `-Σ (s·s_right + s·s_down)` for unit spin vectors.

use ndarray::Array2;
use xy_core::{Lattice, Site};

/// Total energy of the configuration given by `angles`.
#[must_use]
pub fn total_energy(lattice: &Lattice, angles: &Array2<f64>) -> f64 {
    lattice
        .sites()
        .map(|site| {
            let theta = angle(angles, site);
            lattice
                .forward_neighbors(site)
                .iter()
                .map(|&n| -(theta - angle(angles, n)).cos())
                .sum::<f64>()
        })
        .sum()
}

/// Energy change from rotating the spin at `site` to `proposed`.
#[must_use]
pub fn delta_energy(lattice: &Lattice, angles: &Array2<f64>, site: Site, proposed: f64) -> f64 {
    let current = angle(angles, site);
    lattice
        .neighbors(site)
        .iter()
        .map(|&n| {
            let other = angle(angles, n);
            (current - other).cos() - (proposed - other).cos()
        })
        .sum()
}

fn angle(angles: &Array2<f64>, (x, y): Site) -> f64 {
    angles[[x, y]]
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    #[test]
    fn aligned_ground_state_is_minus_two_per_site() {
        for (dim_x, dim_y) in [(2, 2), (4, 4), (3, 5)] {
            let lattice = Lattice::new(dim_x, dim_y).unwrap();
            let angles = Array2::from_elem(lattice.shape(), 0.3);

            assert_relative_eq!(
                total_energy(&lattice, &angles),
                -2.0 * lattice.site_count() as f64,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn checkerboard_is_the_highest_energy_state() {
        let lattice = Lattice::square(4).unwrap();
        let angles = Array2::from_shape_fn((4, 4), |(x, y)| if (x + y) % 2 == 0 { 0.0 } else { PI });

        assert_relative_eq!(total_energy(&lattice, &angles), 32.0, epsilon = 1e-12);
    }

    #[test]
    fn delta_matches_recomputed_total() {
        let lattice = Lattice::new(3, 4).unwrap();
        let angles = Array2::from_shape_fn((3, 4), |(x, y)| 0.7 * x as f64 - 1.3 * y as f64);

        for site in [(0, 0), (2, 3), (1, 2)] {
            let proposed = 2.1;
            let mut moved = angles.clone();
            moved[[site.0, site.1]] = proposed;

            let expected = total_energy(&lattice, &moved) - total_energy(&lattice, &angles);
            assert_relative_eq!(
                delta_energy(&lattice, &angles, site, proposed),
                expected,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn delta_counts_doubled_bonds_on_two_wide_lattices() {
        let lattice = Lattice::square(2).unwrap();
        let angles = Array2::zeros((2, 2));
        let mut moved = angles.clone();
        moved[[0, 0]] = 1.0;

        assert_relative_eq!(
            delta_energy(&lattice, &angles, (0, 0), 1.0),
            total_energy(&lattice, &moved) - total_energy(&lattice, &angles),
            epsilon = 1e-12
        );
    }
}
