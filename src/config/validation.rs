//! Validation run configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::ValidationRunConfig;

/// Validation run settings
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// Upper bound on findings one run may produce
    #[serde(default = "default_max_findings_per_run")]
    pub max_findings_per_run: usize,

    /// Serialise runs for the same project
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_findings_per_run == 0 {
            return Err(ValidationError::InvalidFindingLimit);
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_findings_per_run: default_max_findings_per_run(),
            single_flight: default_single_flight(),
        }
    }
}

impl From<&ValidationConfig> for ValidationRunConfig {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            max_findings_per_run: config.max_findings_per_run,
            single_flight: config.single_flight,
        }
    }
}

fn default_max_findings_per_run() -> usize {
    5000
}

fn default_single_flight() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_run_config() {
        let run: ValidationRunConfig = (&ValidationConfig::default()).into();
        assert_eq!(run.max_findings_per_run, 5000);
        assert!(run.single_flight);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let config = ValidationConfig {
            max_findings_per_run: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFindingLimit));
    }
}
