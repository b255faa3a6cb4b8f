//! Convergence diagnostics over multiple chains.
//!
//! Both estimators work on split chains: each chain is cut into a first and a
//! second half (dropping the middle draw of odd-length chains), so a chain
//! that drifts shows up as disagreement between its own halves.
//!
//! - [`split_r_hat`] is the Gelman-Rubin potential scale reduction.
//! - [`effective_sample_size`] combines the chains' autocorrelations and
//!   truncates their sum with Geyer's initial positive sequence.

use xy_core::Summary;

/// Summarizes scalar draws grouped by chain.
///
/// # Panics
///
/// Panics if `chains` is empty or a chain has fewer than four draws.
#[must_use]
pub fn summarize(chains: &[&[f64]]) -> Summary {
    let all: Vec<f64> = chains.iter().flat_map(|c| c.iter().copied()).collect();
    let mean = mean(&all);
    Summary {
        mean,
        sd: variance(&all, mean).sqrt(),
        r_hat: split_r_hat(chains),
        effective_sample_size: effective_sample_size(chains),
    }
}

/// Returns the split-R̂ of `chains`.
///
/// Values near 1 indicate that all half-chains sample the same distribution.
/// Returns NaN when every half-chain is constant.
///
/// # Panics
///
/// Panics if `chains` is empty or a chain has fewer than four draws.
#[must_use]
pub fn split_r_hat(chains: &[&[f64]]) -> f64 {
    let halves = split(chains);
    let n = halves[0].len() as f64;

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let within = halves
        .iter()
        .zip(&means)
        .map(|(h, &m)| variance(h, m))
        .sum::<f64>()
        / halves.len() as f64;
    let between_over_n = variance(&means, mean(&means));

    let var_plus = (n - 1.0) / n * within + between_over_n;
    (var_plus / within).sqrt()
}

/// Returns the multi-chain effective sample size of `chains`.
///
/// # Panics
///
/// Panics if `chains` is empty or a chain has fewer than four draws.
#[must_use]
pub fn effective_sample_size(chains: &[&[f64]]) -> f64 {
    let halves = split(chains);
    let m = halves.len() as f64;
    let n = halves[0].len();
    let total = m * n as f64;

    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let acov = |lag: usize| -> f64 {
        halves
            .iter()
            .zip(&means)
            .map(|(h, &mu)| autocovariance(h, mu, lag))
            .sum::<f64>()
            / m
    };

    let acov_0 = acov(0);
    let within = acov_0 * n as f64 / (n as f64 - 1.0);
    let between_over_n = if halves.len() > 1 {
        variance(&means, mean(&means))
    } else {
        0.0
    };
    let var_plus = within * (n as f64 - 1.0) / n as f64 + between_over_n;
    if var_plus <= 0.0 || !var_plus.is_finite() {
        return f64::NAN;
    }
    let rho = |lag: usize| 1.0 - (within - acov(lag)) / var_plus;

    // Sum of autocorrelation pairs (ρ[2k] + ρ[2k+1]) while positive, forced
    // to be non-increasing.
    let mut sum = 0.0;
    let mut previous = f64::INFINITY;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = if lag == 0 { 1.0 } else { rho(lag) } + rho(lag + 1);
        if pair <= 0.0 {
            break;
        }
        let pair = pair.min(previous);
        sum += pair;
        previous = pair;
        lag += 2;
    }

    let tau = (2.0 * sum - 1.0).max(1.0 / total.log10());
    total / tau
}

fn split<'a>(chains: &[&'a [f64]]) -> Vec<&'a [f64]> {
    chains
        .iter()
        .flat_map(|chain| {
            let half = chain.len() / 2;
            [&chain[..half], &chain[chain.len() - half..]]
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected variance around a known mean.
fn variance(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() as f64 - 1.0)
}

/// Biased autocovariance at `lag`.
fn autocovariance(values: &[f64], mean: f64, lag: usize) -> f64 {
    let n = values.len();
    values[..n - lag]
        .iter()
        .zip(&values[lag..])
        .map(|(a, b)| (a - mean) * (b - mean))
        .sum::<f64>()
        / n as f64
}
