use std::{collections::BTreeMap, fmt, str::FromStr};

use thiserror::Error;

use crate::{draws::Draws, spin::SpinConfiguration};

/// A named quantity reported by a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Observable {
    /// Total lattice energy of a draw.
    Energy,

    /// Lattice energy divided by the number of sites.
    EnergyPerSpin,

    /// The spin configuration itself.
    Spin,
}

/// Error returned when parsing an unknown observable name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown observable `{0}`")]
pub struct UnknownObservable(pub String);

impl Observable {
    /// Returns the observable's canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Observable::Energy => "energy",
            Observable::EnergyPerSpin => "energy_per_spin",
            Observable::Spin => "spin",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Observable {
    type Err = UnknownObservable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "energy" => Ok(Observable::Energy),
            "energy_per_spin" => Ok(Observable::EnergyPerSpin),
            "spin" => Ok(Observable::Spin),
            other => Err(UnknownObservable(other.to_owned())),
        }
    }
}

/// Posterior summary and convergence diagnostics for one observable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub sd: f64,

    /// Potential scale reduction; values near 1.0 indicate converged chains.
    pub r_hat: f64,

    /// Effective number of independent draws.
    pub effective_sample_size: f64,
}

/// Diagnostics table keyed by observable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: BTreeMap<Observable, Summary>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the summary for `observable`.
    pub fn insert(&mut self, observable: Observable, summary: Summary) {
        self.entries.insert(observable, summary);
    }

    #[must_use]
    pub fn get(&self, observable: Observable) -> Option<&Summary> {
        self.entries.get(&observable)
    }

    /// Looks up a summary by observable name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Summary> {
        name.parse().ok().and_then(|o| self.get(o))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Observable, &Summary)> {
        self.entries.iter().map(|(o, s)| (*o, s))
    }
}

impl FromIterator<(Observable, Summary)> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = (Observable, Summary)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything a sampler returns for one run.
#[derive(Debug, Clone)]
pub struct SamplerOutput {
    pub energy: Draws<f64>,
    pub energy_per_spin: Draws<f64>,
    pub spins: Draws<SpinConfiguration>,
    pub diagnostics: Diagnostics,
}

impl SamplerOutput {
    /// Returns the scalar series for `observable`, if it has one.
    #[must_use]
    pub fn series(&self, observable: Observable) -> Option<&Draws<f64>> {
        match observable {
            Observable::Energy => Some(&self.energy),
            Observable::EnergyPerSpin => Some(&self.energy_per_spin),
            Observable::Spin => None,
        }
    }
}
