use thiserror::Error;

use crate::{draws::Draws, lattice::Lattice, spin::SpinConfiguration};

/// Errors that can occur when assembling a warm start.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WarmStartError {
    #[error("a warm start needs at least one chain")]
    NoChains,

    #[error("chain {chain} is on a {found:?} lattice, expected {expected:?}")]
    MixedLattices {
        chain: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// The initial spin configuration of every chain for one sampler run.
///
/// The first temperature starts from [`WarmStart::aligned`]. Every later
/// temperature starts from the final draw of each chain of the previous run,
/// obtained with [`WarmStart::from_final_draws`].
#[derive(Debug, Clone, PartialEq)]
pub struct WarmStart {
    lattice: Lattice,
    chains: Vec<SpinConfiguration>,
}

impl WarmStart {
    /// Returns `chain_count` copies of the aligned configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WarmStartError::NoChains`] if `chain_count` is zero.
    pub fn aligned(lattice: Lattice, chain_count: usize) -> Result<Self, WarmStartError> {
        Self::new(vec![SpinConfiguration::aligned(lattice); chain_count])
    }

    /// Wraps one configuration per chain.
    ///
    /// # Errors
    ///
    /// Returns an error if `chains` is empty or the configurations do not all
    /// share one lattice.
    pub fn new(chains: Vec<SpinConfiguration>) -> Result<Self, WarmStartError> {
        let Some(first) = chains.first() else {
            return Err(WarmStartError::NoChains);
        };
        let lattice = first.lattice();

        if let Some((chain, config)) = chains
            .iter()
            .enumerate()
            .find(|(_, c)| c.lattice() != lattice)
        {
            return Err(WarmStartError::MixedLattices {
                chain,
                expected: lattice.shape(),
                found: config.lattice().shape(),
            });
        }

        Ok(Self { lattice, chains })
    }

    /// Takes the final draw of every chain.
    ///
    /// # Errors
    ///
    /// Returns [`WarmStartError::MixedLattices`] if the draws mix lattices.
    pub fn from_final_draws(spins: &Draws<SpinConfiguration>) -> Result<Self, WarmStartError> {
        Self::new(spins.last_per_chain_cloned())
    }

    #[must_use]
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    #[must_use]
    pub fn configurations(&self) -> &[SpinConfiguration] {
        &self.chains
    }

    #[must_use]
    pub fn into_configurations(self) -> Vec<SpinConfiguration> {
        self.chains
    }
}
