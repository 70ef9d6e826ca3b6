//! Run configuration for an epsilon sweep
use crate::bounds::Bounds1;
use crate::error::FgsmError;
use crate::NNFloat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Which attacked samples are kept as illustrative examples
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleSelection {
    /// The first attacked samples, whatever the attack's outcome
    Any,
    /// Only samples the attack flipped, except at epsilon 0 where every attacked sample qualifies
    Adversarial,
}

impl Default for ExampleSelection {
    fn default() -> Self {
        Self::Any
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttackConfig {
    pub epsilons: Vec<NNFloat>,
    pub max_examples: usize,
    /// Valid `(lower, upper)` value of every sample element
    pub input_range: (NNFloat, NNFloat),
    pub example_selection: ExampleSelection,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            epsilons: vec![0., 0.05, 0.1, 0.15, 0.2, 0.25, 0.3],
            max_examples: 5,
            input_range: (0., 1.),
            example_selection: ExampleSelection::default(),
        }
    }
}

/// # Errors
/// `InvalidEpsilon` unless `epsilon` is finite and non-negative
pub fn check_epsilon(epsilon: NNFloat) -> Result<(), FgsmError> {
    if epsilon.is_finite() && epsilon >= 0. {
        Ok(())
    } else {
        Err(FgsmError::InvalidEpsilon { epsilon })
    }
}

impl AttackConfig {
    /// Replaces the configured epsilons, unless `epsilons` is empty
    #[must_use]
    pub fn with_epsilons(mut self, epsilons: Vec<NNFloat>) -> Self {
        if !epsilons.is_empty() {
            self.epsilons = epsilons;
        }
        self
    }

    /// # Errors
    /// `InvalidEpsilon` for a negative or non-finite epsilon,
    /// `InvalidInputRange` if the range is empty or not finite
    pub fn validate(&self) -> Result<(), FgsmError> {
        self.validate_input_range()?;
        self.epsilons.iter().copied().try_for_each(check_epsilon)
    }

    /// # Errors
    /// `InvalidInputRange` if the range is empty or not finite
    pub fn validate_input_range(&self) -> Result<(), FgsmError> {
        let (lower, upper) = self.input_range;
        if lower.is_finite() && upper.is_finite() && lower <= upper {
            Ok(())
        } else {
            Err(FgsmError::InvalidInputRange { lower, upper })
        }
    }

    /// The input range expanded over `ndim` elements
    pub fn input_bounds(&self, ndim: usize) -> Bounds1 {
        Bounds1::uniform(ndim, self.input_range.0, self.input_range.1)
    }

    /// # Errors
    /// On malformed JSON or an invalid configuration
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, FgsmError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// See [`AttackConfig::from_json_reader`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FgsmError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AttackConfig::default();
        assert_eq!(config.epsilons.len(), 7);
        assert_eq!(config.max_examples, 5);
        assert_eq!(config.example_selection, ExampleSelection::Any);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"epsilons": [0.0, 0.1], "example_selection": "adversarial"}"#;
        let config = AttackConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(config.epsilons, vec![0., 0.1]);
        assert_eq!(config.max_examples, 5);
        assert_eq!(config.input_range, (0., 1.));
        assert_eq!(config.example_selection, ExampleSelection::Adversarial);
    }

    #[test]
    fn test_negative_epsilon_rejected() {
        let config = AttackConfig {
            epsilons: vec![0.1, -0.1],
            ..AttackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FgsmError::InvalidEpsilon { .. })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = AttackConfig {
            input_range: (1., 0.),
            ..AttackConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FgsmError::InvalidInputRange { .. })
        ));
    }

    #[test]
    fn test_with_epsilons_overrides_configured_list() {
        let json = r#"{"epsilons": [0.0, 0.1], "max_examples": 2}"#;
        let config = AttackConfig::from_json_reader(json.as_bytes()).unwrap();

        let kept = config.clone().with_epsilons(vec![]);
        assert_eq!(kept.epsilons, vec![0., 0.1]);

        let replaced = config.with_epsilons(vec![0.3, 0.05]);
        assert_eq!(replaced.epsilons, vec![0.3, 0.05]);
        assert_eq!(replaced.max_examples, 2);
    }

    #[test]
    fn test_with_epsilons_result_is_validated_separately() {
        let config = AttackConfig::default().with_epsilons(vec![f64::NAN]);
        assert!(matches!(
            config.validate(),
            Err(FgsmError::InvalidEpsilon { .. })
        ));
    }

    #[test]
    fn test_check_epsilon() {
        assert!(check_epsilon(0.).is_ok());
        assert!(check_epsilon(0.3).is_ok());
        assert!(check_epsilon(-0.01).is_err());
        assert!(check_epsilon(f64::INFINITY).is_err());
    }
}
