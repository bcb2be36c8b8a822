//! Defines **configurations** of multi-body systems and related operations.

use approx::{AbsDiffEq, RelativeEq};
use nalgebra::DVector;
use rand::Rng;
use std::ops::{Add, Index, IndexMut, Mul};

#[derive(Clone, Debug, PartialEq)]
/// Configuration of a multi-body system, represented as a vector of joint positions.
pub struct Configuration(pub(crate) DVector<f64>);

impl Configuration {
    /// Creates a new [`Configuration`] with the given size, initialized to zeros.
    #[must_use]
    pub fn zeros(size: usize) -> Self {
        Configuration(DVector::zeros(size))
    }

    /// Creates a new [`Configuration`] with the given size, initialized to ones.
    #[must_use]
    pub fn ones(size: usize) -> Self {
        Configuration(DVector::from_element(size, 1.0))
    }

    /// Creates a new [`Configuration`] with the given size, every entry set to `value`.
    #[must_use]
    pub fn from_element(size: usize, value: f64) -> Self {
        Configuration(DVector::from_element(size, value))
    }

    /// Draws a configuration of `size` entries, each sampled uniformly in `[min, max]`.
    #[must_use]
    pub fn random(size: usize, rng: &mut impl Rng, min: f64, max: f64) -> Self {
        Configuration(DVector::from_fn(size, |_, _| rng.random_range(min..=max)))
    }

    /// Draws a configuration with each entry `i` sampled uniformly in `[min[i], max[i]]`.
    /// Entries where the bound is infinite fall back to `[-1, 1]`, since a joint with
    /// unbounded limits still needs a representative random configuration.
    #[must_use]
    pub fn random_between(rng: &mut impl Rng, min: &Configuration, max: &Configuration) -> Self {
        assert_eq!(min.len(), max.len(), "mismatched bounds in random_between");
        Configuration(DVector::from_fn(min.len(), |i, _| {
            let (lo, hi) = (min[i], max[i]);
            if lo.is_finite() && hi.is_finite() {
                rng.random_range(lo..=hi)
            } else {
                rng.random_range(-1.0..=1.0)
            }
        }))
    }

    /// Returns the length of the configuration vector.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the configuration vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a slice of the configuration vector from `start` to `start + nrows - 1` (inclusive).
    #[must_use]
    pub fn rows(&self, start: usize, nrows: usize) -> Configuration {
        Configuration(self.0.rows(start, nrows).into_owned())
    }

    /// Updates a slice of the configuration vector starting from `start` with the values
    /// from another configuration.
    pub fn update_rows(&mut self, start: usize, values: &Configuration) {
        assert_eq!(
            self.0.rows(start, values.len()),
            values.0,
            "Mismatched sizes when updating configuration rows."
        );
        self.0.rows_mut(start, values.len()).copy_from(&values.0);
    }

    /// Creates a new [`Configuration`] from a slice of scalar values.
    #[must_use]
    pub fn from_row_slice(data: &[f64]) -> Self {
        Configuration(DVector::from_row_slice(data))
    }

    /// Returns the configuration as a plain slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    /// Concatenates multiple [`Configuration`] objects into a single configuration.
    #[must_use]
    pub fn concat(configs: &[Configuration]) -> Configuration {
        let mut all_values = Vec::new();
        for config in configs {
            all_values.extend_from_slice(config.0.as_slice());
        }
        Configuration::from_row_slice(&all_values)
    }

    /// Checks that this configuration has the expected size, under the name `name`
    /// (used to build a descriptive [`ConfigurationError`]).
    pub fn check_size(&self, name: &str, expected: usize) -> Result<(), ConfigurationError> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidSize(name.to_string(), expected, self.len()))
        }
    }
}

impl Index<usize> for Configuration {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for Configuration {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl AbsDiffEq for Configuration {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for Configuration {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}

impl Add for Configuration {
    type Output = Configuration;

    fn add(self, rhs: Self) -> Self::Output {
        Configuration(self.0 + rhs.0)
    }
}

impl Add for &Configuration {
    type Output = Configuration;

    fn add(self, rhs: Self) -> Self::Output {
        Configuration(&self.0 + &rhs.0)
    }
}

impl Mul<f64> for &Configuration {
    type Output = Configuration;

    fn mul(self, rhs: f64) -> Self::Output {
        Configuration(&self.0 * rhs)
    }
}

/// Errors that can occur when working with configurations.
pub enum ConfigurationError {
    InvalidSize(String, usize, usize),
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigurationError::InvalidSize(name, expected, actual) => {
                write!(
                    f,
                    "parameter '{name}' expected configuration size {expected}, but got {actual}"
                )
            }
        }
    }
}

impl std::fmt::Debug for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_len() {
        let c = Configuration::zeros(5);
        assert_eq!(c.len(), 5);
        assert_eq!(c[0], 0.0);
    }

    #[test]
    fn check_size_reports_mismatch() {
        let c = Configuration::zeros(3);
        assert!(c.check_size("q", 3).is_ok());
        assert!(c.check_size("q", 4).is_err());
    }

    #[test]
    fn random_stays_in_bounds() {
        let mut rng = rand::rng();
        let c = Configuration::random(20, &mut rng, -1.0, 1.0);
        for i in 0..c.len() {
            assert!(c[i] >= -1.0 && c[i] <= 1.0);
        }
    }
}
