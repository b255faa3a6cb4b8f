use super::ConfigError;

/// An ascending list of positive temperatures.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    temperatures: Vec<f64>,
}

impl Default for Schedule {
    /// Twenty temperatures from 0.1 to 2.0.
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::linear(0.1, 20).unwrap()
    }
}

impl Schedule {
    /// Creates a schedule from explicit temperatures.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, any temperature is not finite
    /// and positive, or the list is not strictly ascending.
    pub fn new(temperatures: Vec<f64>) -> Result<Self, ConfigError> {
        if temperatures.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        for (index, &temperature) in temperatures.iter().enumerate() {
            if !temperature.is_finite() || temperature <= 0.0 {
                return Err(ConfigError::NonPositiveTemperature { index, temperature });
            }
        }
        if let Some(index) = temperatures
            .windows(2)
            .position(|pair| pair[1] <= pair[0])
        {
            return Err(ConfigError::NonAscendingSchedule { index: index + 1 });
        }
        Ok(Self { temperatures })
    }

    /// Creates the schedule `step, 2·step, ..., count·step`.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero or `step` is not finite and positive.
    pub fn linear(step: f64, count: usize) -> Result<Self, ConfigError> {
        Self::new((1..=count).map(|i| i as f64 * step).collect())
    }

    #[must_use]
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    /// Always `false`: construction rejects empty schedules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.temperatures.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_spans_point_one_to_two() {
        let schedule = Schedule::default();

        assert_eq!(schedule.len(), 20);
        assert_relative_eq!(schedule.temperatures()[0], 0.1);
        assert_relative_eq!(schedule.temperatures()[19], 2.0);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Schedule::new(vec![]), Err(ConfigError::EmptySchedule));
        assert_eq!(Schedule::linear(0.1, 0), Err(ConfigError::EmptySchedule));
    }

    #[test]
    fn rejects_zero_and_negative_temperatures() {
        assert_eq!(
            Schedule::new(vec![0.0, 0.1]),
            Err(ConfigError::NonPositiveTemperature {
                index: 0,
                temperature: 0.0
            })
        );
        assert_eq!(
            Schedule::linear(-0.1, 3),
            Err(ConfigError::NonPositiveTemperature {
                index: 0,
                temperature: -0.1
            })
        );
        assert!(matches!(
            Schedule::new(vec![0.5, f64::INFINITY]),
            Err(ConfigError::NonPositiveTemperature { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_repeats_and_descents() {
        assert_eq!(
            Schedule::new(vec![0.5, 0.5]),
            Err(ConfigError::NonAscendingSchedule { index: 1 })
        );
        assert_eq!(
            Schedule::new(vec![0.1, 0.3, 0.2]),
            Err(ConfigError::NonAscendingSchedule { index: 2 })
        );
    }
}
