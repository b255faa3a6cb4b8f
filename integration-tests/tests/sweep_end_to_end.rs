use std::fs;

use integration_tests::{small_config, temp_csv};
use xy_core::TemperatureResult;
use xy_metropolis::MetropolisSampler;
use xy_observers::{CsvSink, StopOnWarning, csv::HEADER};
use xy_sweep::{Status, run, run_unobserved};

#[test]
fn sweep_writes_one_row_per_temperature() {
    let path = temp_csv("rows");
    let config = small_config(&[0.5, 1.0, 1.5], 3);

    let mut sink = CsvSink::open(&path).expect("should open");
    let solution =
        run_unobserved(&MetropolisSampler::new(), &mut sink, &config).expect("should sweep");

    let contents = fs::read_to_string(&path).expect("should read");
    fs::remove_file(&path).ok();

    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.iters, 3);

    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
    for (line, temperature) in lines[1..].iter().zip(["0.5", "1", "1.5"]) {
        assert!(line.starts_with(&format!("{temperature},4,4,")), "row: {line}");
    }

    for result in &solution.results {
        assert!(result.mean_energy_per_spin >= -2.0 && result.mean_energy_per_spin < 0.0);
        assert!(result.specific_heat.is_finite() && result.specific_heat >= 0.0);
        assert!((0.0..=1.0).contains(&result.vortex_density));
        assert!(result.effective_sample_size > 0.0);
    }

    // Energy rises with temperature.
    let energies: Vec<f64> = solution
        .results
        .iter()
        .map(|r| r.mean_energy_per_spin)
        .collect();
    assert!(energies[0] < energies[2], "energies: {energies:?}");
}

#[test]
fn second_run_appends_below_the_first() {
    let path = temp_csv("append");
    let sampler = MetropolisSampler::new();

    for seed in [1, 2] {
        let config = small_config(&[0.8, 1.2], seed);
        let mut sink = CsvSink::open(&path).expect("should open");
        run_unobserved(&sampler, &mut sink, &config).expect("should sweep");
        assert_eq!(sink.rows(), 2);
    }

    let contents = fs::read_to_string(&path).expect("should read");
    fs::remove_file(&path).ok();

    assert_eq!(contents.lines().filter(|l| *l == HEADER).count(), 1);
    assert_eq!(contents.lines().count(), 5);
}

#[test]
fn same_seed_reproduces_the_sweep() {
    let sampler = MetropolisSampler::new();
    let config = small_config(&[0.6, 1.1], 11);

    let mut first: Vec<TemperatureResult> = Vec::new();
    let mut second: Vec<TemperatureResult> = Vec::new();
    let a = run_unobserved(&sampler, &mut first, &config).expect("should sweep");
    let b = run_unobserved(&sampler, &mut second, &config).expect("should sweep");

    assert_eq!(first, second);
    assert_eq!(a.warm_start, b.warm_start);
}

#[test]
fn cold_sweep_stays_near_the_ground_state() {
    let sampler = MetropolisSampler::new();
    let config = small_config(&[0.05, 0.1], 5);

    let mut rows: Vec<TemperatureResult> = Vec::new();
    run_unobserved(&sampler, &mut rows, &config).expect("should sweep");

    for row in &rows {
        assert!(row.mean_energy_per_spin < -1.9, "row: {row:?}");
        assert!(row.vortex_density < 0.05, "row: {row:?}");
    }
}

#[test]
fn stop_on_warning_keeps_the_offending_row() {
    let path = temp_csv("stop");
    // No real chain gets its R̂ under this threshold.
    let config = small_config(&[0.5, 1.0, 1.5], 9)
        .with_r_hat_threshold(1e-6)
        .expect("positive threshold");

    let mut sink = CsvSink::open(&path).expect("should open");
    let solution = run(
        &MetropolisSampler::new(),
        &mut sink,
        &config,
        StopOnWarning::new(1),
    )
    .expect("should sweep");

    let contents = fs::read_to_string(&path).expect("should read");
    fs::remove_file(&path).ok();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.results.len(), 1);
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.ends_with(",false\n"));
}
