use thiserror::Error;

/// Errors that can occur when grouping draws by chain.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DrawsError {
    #[error("at least one chain is required")]
    NoChains,

    #[error("chain {chain} has no draws")]
    EmptyChain { chain: usize },

    #[error("chain {chain} has {found} draws, expected {expected}")]
    RaggedChains {
        chain: usize,
        expected: usize,
        found: usize,
    },
}

/// Monte Carlo draws grouped by chain.
///
/// Every chain holds the same, non-zero number of draws, stored in the order
/// they were sampled. Two views are provided:
///
/// - **grouped**: [`chain`](Self::chain) and [`last_per_chain`](Self::last_per_chain)
///   address draws within a chain, where draw order matters.
/// - **flattened**: [`flattened`](Self::flattened) merges all chains
///   draw-major (draw 0 of every chain, then draw 1 of every chain, ...), so
///   any prefix samples the chains evenly.
#[derive(Debug, Clone, PartialEq)]
pub struct Draws<T> {
    chains: Vec<Vec<T>>,
}

impl<T> Draws<T> {
    /// Groups per-chain draw sequences.
    ///
    /// # Errors
    ///
    /// Returns a [`DrawsError`] if there are no chains, a chain is empty, or
    /// the chains differ in length.
    pub fn from_chains(chains: Vec<Vec<T>>) -> Result<Self, DrawsError> {
        let Some(first) = chains.first() else {
            return Err(DrawsError::NoChains);
        };

        let expected = first.len();
        if expected == 0 {
            return Err(DrawsError::EmptyChain { chain: 0 });
        }

        if let Some((chain, found)) = chains
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(DrawsError::RaggedChains {
                chain,
                expected,
                found,
            });
        }

        Ok(Self { chains })
    }

    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    #[must_use]
    pub fn draws_per_chain(&self) -> usize {
        self.chains[0].len()
    }

    /// Returns the total number of draws across all chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chain_count() * self.draws_per_chain()
    }

    /// Always `false`: construction rejects empty draws.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the draws of one chain in sampling order.
    #[must_use]
    pub fn chain(&self, index: usize) -> Option<&[T]> {
        self.chains.get(index).map(Vec::as_slice)
    }

    /// Iterates over chains in chain order.
    pub fn chains(&self) -> impl ExactSizeIterator<Item = &[T]> {
        self.chains.iter().map(Vec::as_slice)
    }

    /// Returns the final draw of every chain.
    #[must_use]
    pub fn last_per_chain(&self) -> Vec<&T> {
        self.chains
            .iter()
            .filter_map(|chain| chain.last())
            .collect()
    }

    /// Iterates over all draws, interleaving chains draw-major.
    pub fn flattened(&self) -> impl Iterator<Item = &T> {
        let chains = &self.chains;
        (0..self.draws_per_chain()).flat_map(move |draw| chains.iter().map(move |c| &c[draw]))
    }

    /// Consumes the draws, returning the per-chain sequences.
    #[must_use]
    pub fn into_chains(self) -> Vec<Vec<T>> {
        self.chains
    }
}

impl<T: Clone> Draws<T> {
    /// Returns an owned copy of the final draw of every chain.
    #[must_use]
    pub fn last_per_chain_cloned(&self) -> Vec<T> {
        self.last_per_chain().into_iter().cloned().collect()
    }
}

impl Draws<f64> {
    /// Collects all draws into a flat vector, interleaved draw-major.
    #[must_use]
    pub fn to_flat_vec(&self) -> Vec<f64> {
        self.flattened().copied().collect()
    }
}
