use thiserror::Error;

/// Smallest extent along either axis for which periodic wrap is meaningful.
pub const MIN_DIM: usize = 2;

/// A site on the lattice, addressed as `(x, y)`.
pub type Site = (usize, usize);

/// Error returned when a lattice is too small to wrap.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("lattice must be at least {MIN_DIM}x{MIN_DIM}, got {dim_x}x{dim_y}")]
pub struct LatticeError {
    pub dim_x: usize,
    pub dim_y: usize,
}

/// A periodic (toroidal) two-dimensional square lattice.
///
/// Both axes wrap, so every site has a full plaquette of neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lattice {
    dim_x: usize,
    dim_y: usize,
}

/// One corner of the elementary plaquette anchored at a site.
///
/// Corners are listed in loop order: walking `Origin → Row → Diagonal →
/// Column → Origin` traverses the plaquette once. Each corner is the site one
/// step back along the named axis (with wrap), which is the site a periodic
/// roll by one aligns with the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    /// The anchor site itself.
    Origin,

    /// One step back along the row (`x`) axis.
    Row,

    /// One step back along both axes.
    Diagonal,

    /// One step back along the column (`y`) axis.
    Column,
}

impl Corner {
    /// All corners in loop order.
    pub const LOOP: [Corner; 4] = [Corner::Origin, Corner::Row, Corner::Diagonal, Corner::Column];

    fn offset(self) -> (bool, bool) {
        match self {
            Corner::Origin => (false, false),
            Corner::Row => (true, false),
            Corner::Diagonal => (true, true),
            Corner::Column => (false, true),
        }
    }
}

impl Lattice {
    /// Creates a lattice with the given extents.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError`] if either extent is below [`MIN_DIM`].
    pub fn new(dim_x: usize, dim_y: usize) -> Result<Self, LatticeError> {
        if dim_x < MIN_DIM || dim_y < MIN_DIM {
            return Err(LatticeError { dim_x, dim_y });
        }
        Ok(Self { dim_x, dim_y })
    }

    /// Creates an `n x n` lattice.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError`] if `n` is below [`MIN_DIM`].
    pub fn square(n: usize) -> Result<Self, LatticeError> {
        Self::new(n, n)
    }

    #[must_use]
    pub fn dim_x(&self) -> usize {
        self.dim_x
    }

    #[must_use]
    pub fn dim_y(&self) -> usize {
        self.dim_y
    }

    /// Returns the `(dim_x, dim_y)` shape.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.dim_x, self.dim_y)
    }

    /// Returns the number of lattice sites.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.dim_x * self.dim_y
    }

    /// Iterates over all sites in row-major order.
    pub fn sites(&self) -> impl Iterator<Item = Site> + '_ {
        (0..self.dim_x).flat_map(move |x| (0..self.dim_y).map(move |y| (x, y)))
    }

    /// Returns the given corner of the plaquette anchored at `site`.
    ///
    /// Indices wrap modulo the lattice extents, so `site` may lie anywhere
    /// on the lattice including its edges.
    #[must_use]
    pub fn corner(&self, site: Site, corner: Corner) -> Site {
        let (back_x, back_y) = corner.offset();
        let (x, y) = site;
        let x = if back_x { wrap_back(x, self.dim_x) } else { x % self.dim_x };
        let y = if back_y { wrap_back(y, self.dim_y) } else { y % self.dim_y };
        (x, y)
    }

    /// Returns the four corners of the plaquette anchored at `site`, in loop order.
    #[must_use]
    pub fn plaquette(&self, site: Site) -> [Site; 4] {
        Corner::LOOP.map(|corner| self.corner(site, corner))
    }

    /// Returns the forward neighbors `(x+1, y)` and `(x, y+1)` of `site`.
    ///
    /// Summing a pair interaction over each site's forward neighbors counts
    /// every bond of the torus exactly once.
    #[must_use]
    pub fn forward_neighbors(&self, site: Site) -> [Site; 2] {
        let (x, y) = site;
        [((x + 1) % self.dim_x, y), (x, (y + 1) % self.dim_y)]
    }

    /// Returns the four nearest neighbors of `site`.
    #[must_use]
    pub fn neighbors(&self, site: Site) -> [Site; 4] {
        let (x, y) = site;
        [
            (wrap_back(x, self.dim_x), y),
            ((x + 1) % self.dim_x, y),
            (x, wrap_back(y, self.dim_y)),
            (x, (y + 1) % self.dim_y),
        ]
    }
}

fn wrap_back(i: usize, dim: usize) -> usize {
    (i % dim + dim - 1) % dim
}
