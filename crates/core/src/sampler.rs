use crate::{lattice::Lattice, output::SamplerOutput, warm_start::WarmStart};

/// Sampler tuning parameters.
///
/// Backends interpret these as far as they apply to their algorithm; a
/// backend without tree-building ignores `max_tree_depth`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Target acceptance rate during adaptation, in `(0, 1)`.
    pub adapt_delta: f64,

    /// Maximum tree depth for tree-building integrators.
    pub max_tree_depth: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            adapt_delta: 0.7,
            max_tree_depth: 15,
        }
    }
}

/// A request to sample the XY model at one temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub lattice: Lattice,
    pub temperature: f64,
    pub chain_count: usize,

    /// Total iterations per chain, warmup included.
    pub iteration_count: usize,

    /// Initial configuration of every chain.
    pub initial_state: WarmStart,

    pub tuning: Tuning,
    pub seed: u64,
}

/// A Monte Carlo engine that samples spin configurations of the XY model.
///
/// Samplers must be deterministic: the same request always yields the same
/// output. Randomness is drawn from generators seeded by
/// [`SampleRequest::seed`].
///
/// A call blocks until sampling completes. Parallelism across chains is up
/// to the implementation.
pub trait Sampler {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the sampler.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the request is infeasible or sampling fails.
    fn run(&self, request: &SampleRequest) -> Result<SamplerOutput, Self::Error>;
}

impl<S: Sampler + ?Sized> Sampler for &S {
    type Error = S::Error;

    fn run(&self, request: &SampleRequest) -> Result<SamplerOutput, Self::Error> {
        (**self).run(request)
    }
}
