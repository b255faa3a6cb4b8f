use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use xy_core::{Lattice, Tuning};
use xy_sweep::{ConfigError, Schedule, SweepConfig};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Overrides for a sweep, as read from a settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub seed: u64,

    /// Output CSV path. The command line takes precedence.
    pub output: Option<PathBuf>,

    pub lattice: LatticeSettings,
    pub sampling: SamplingSettings,
    pub schedule: ScheduleSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatticeSettings {
    pub dim_x: usize,
    pub dim_y: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingSettings {
    pub chain_count: usize,
    pub iteration_count: usize,
    pub vorticity_sample_cap: usize,
    pub r_hat_threshold: f64,

    /// Plaquette winding above which a vortex is counted.
    pub vortex_threshold: f64,

    pub tuning: TuningSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningSettings {
    pub adapt_delta: f64,
    pub max_tree_depth: u32,
}

/// Either `count` evenly spaced temperatures `step, 2·step, …` or an
/// explicit list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSettings {
    pub step: f64,
    pub count: usize,
    pub temperatures: Option<Vec<f64>>,
}

impl Default for Settings {
    fn default() -> Self {
        let config = SweepConfig::default();
        Self {
            seed: config.seed(),
            output: None,
            lattice: LatticeSettings::default(),
            sampling: SamplingSettings::default(),
            schedule: ScheduleSettings::default(),
        }
    }
}

impl Default for LatticeSettings {
    fn default() -> Self {
        let (dim_x, dim_y) = SweepConfig::default().lattice().shape();
        Self { dim_x, dim_y }
    }
}

impl Default for SamplingSettings {
    fn default() -> Self {
        let config = SweepConfig::default();
        Self {
            chain_count: config.chain_count(),
            iteration_count: config.iteration_count(),
            vorticity_sample_cap: config.vorticity_sample_cap(),
            r_hat_threshold: config.r_hat_threshold(),
            vortex_threshold: config.vortex_threshold(),
            tuning: TuningSettings::default(),
        }
    }
}

impl Default for TuningSettings {
    fn default() -> Self {
        let Tuning {
            adapt_delta,
            max_tree_depth,
        } = Tuning::default();
        Self {
            adapt_delta,
            max_tree_depth,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            step: 0.1,
            count: 20,
            temperatures: None,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed TOML, unknown keys or
    /// values of the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the validated sweep config these settings describe.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Config`] if any value is rejected by
    /// [`SweepConfig`].
    pub fn to_config(&self) -> Result<SweepConfig, SettingsError> {
        let lattice = Lattice::new(self.lattice.dim_x, self.lattice.dim_y)
            .map_err(ConfigError::from)?;
        let schedule = self.schedule.to_schedule()?;
        let sampling = &self.sampling;

        let config = SweepConfig::new(lattice, schedule)
            .with_chains(sampling.chain_count, sampling.iteration_count)?
            .with_vorticity_sample_cap(sampling.vorticity_sample_cap)?
            .with_r_hat_threshold(sampling.r_hat_threshold)?
            .with_vortex_threshold(sampling.vortex_threshold)?
            .with_tuning(Tuning {
                adapt_delta: sampling.tuning.adapt_delta,
                max_tree_depth: sampling.tuning.max_tree_depth,
            })?
            .with_seed(self.seed);
        Ok(config)
    }
}

impl ScheduleSettings {
    fn to_schedule(&self) -> Result<Schedule, ConfigError> {
        match &self.temperatures {
            Some(temperatures) => Schedule::new(temperatures.clone()),
            None => Schedule::linear(self.step, self.count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn empty_file_gives_default_config() {
        let config = Settings::from_toml_str("")
            .and_then(|s| s.to_config())
            .expect("should build");

        assert_eq!(config, SweepConfig::default());
    }

    #[test]
    fn full_file_overrides_everything() {
        let text = r#"
            seed = 7
            output = "runs/sweep.csv"

            [lattice]
            dim_x = 8
            dim_y = 6

            [sampling]
            chain_count = 2
            iteration_count = 400
            vorticity_sample_cap = 50
            r_hat_threshold = 1.05
            vortex_threshold = 3.0

            [sampling.tuning]
            adapt_delta = 0.5
            max_tree_depth = 10

            [schedule]
            step = 0.25
            count = 4
        "#;

        let settings = Settings::from_toml_str(text).expect("should parse");
        assert_eq!(settings.output, Some(PathBuf::from("runs/sweep.csv")));

        let config = settings.to_config().expect("should build");
        assert_eq!(config.lattice().shape(), (8, 6));
        assert_eq!(config.chain_count(), 2);
        assert_eq!(config.iteration_count(), 400);
        assert_eq!(config.vorticity_sample_cap(), 50);
        assert_relative_eq!(config.r_hat_threshold(), 1.05);
        assert_relative_eq!(config.vortex_threshold(), 3.0);
        assert_relative_eq!(config.tuning().adapt_delta, 0.5);
        assert_eq!(config.tuning().max_tree_depth, 10);
        assert_eq!(config.seed(), 7);
        assert_eq!(config.schedule().temperatures(), &[0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn partial_tables_keep_their_other_defaults() {
        let text = r#"
            [sampling]
            iteration_count = 100

            [lattice]
            dim_y = 2
        "#;

        let config = Settings::from_toml_str(text)
            .and_then(|s| s.to_config())
            .expect("should build");

        assert_eq!(config.iteration_count(), 100);
        assert_eq!(config.chain_count(), 4);
        assert_eq!(config.lattice().shape(), (4, 2));
        assert_eq!(config.schedule().len(), 20);
    }

    #[test]
    fn explicit_temperatures_replace_the_linear_schedule() {
        let text = r#"
            [schedule]
            step = 0.5
            temperatures = [0.5, 0.9, 1.3]
        "#;

        let config = Settings::from_toml_str(text)
            .and_then(|s| s.to_config())
            .expect("should build");

        assert_eq!(config.schedule().temperatures(), &[0.5, 0.9, 1.3]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = Settings::from_toml_str("[sampling]\nchains = 3\n").expect_err("typo");
        assert!(matches!(error, SettingsError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let tiny = Settings::from_toml_str("[lattice]\ndim_x = 1\n").expect("should parse");
        assert!(matches!(
            tiny.to_config(),
            Err(SettingsError::Config(ConfigError::LatticeTooSmall {
                dim_x: 1,
                dim_y: 4
            }))
        ));

        let short = Settings::from_toml_str("[sampling]\niteration_count = 5\n").expect("should parse");
        assert!(matches!(
            short.to_config(),
            Err(SettingsError::Config(ConfigError::TooFewIterations {
                iterations: 5,
                draws: 3
            }))
        ));

        let flat = Settings::from_toml_str("[sampling]\nvortex_threshold = 0.0\n").expect("should parse");
        assert!(matches!(
            flat.to_config(),
            Err(SettingsError::Config(ConfigError::InvalidThreshold {
                name: "vortex_threshold",
                ..
            }))
        ));

        let descending =
            Settings::from_toml_str("[schedule]\ntemperatures = [1.0, 0.5]\n").expect("should parse");
        assert!(matches!(
            descending.to_config(),
            Err(SettingsError::Config(ConfigError::NonAscendingSchedule { index: 1 }))
        ));
    }

    #[test]
    fn missing_file_names_its_path() {
        let path = std::env::temp_dir().join("xy_settings_missing.toml");
        std::fs::remove_file(&path).ok();

        let error = Settings::load(&path).expect_err("no such file");
        assert!(error.to_string().contains("xy_settings_missing.toml"));
    }
}
