//! Optional per-attribute constraint configuration.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Value constraints attached to an attribute.
///
/// All bounds are optional. Serialized in camelCase because the same
/// document is stored verbatim as JSON next to the attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_max: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,
}

impl ConstraintConfig {
    /// Returns true when no bound is set.
    pub fn is_empty(&self) -> bool {
        self.length_min.is_none()
            && self.length_max.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.pattern.is_none()
            && self.scale.is_none()
            && self.precision.is_none()
    }

    /// Validates the bounds and trims the pattern.
    ///
    /// Returns `None` for a configuration with no bounds, so that "no
    /// constraints" has a single representation.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` for negative or inverted bounds
    /// - `EmptyField` for a blank pattern
    pub fn normalize(mut self) -> Result<Option<Self>, ValidationError> {
        if let Some(length_min) = self.length_min {
            if length_min < 0 {
                return Err(ValidationError::invalid_format(
                    "lengthMin",
                    "must be greater than or equal to 0",
                ));
            }
        }
        if let Some(length_max) = self.length_max {
            if length_max <= 0 {
                return Err(ValidationError::invalid_format(
                    "lengthMax",
                    "must be greater than 0",
                ));
            }
        }
        if let (Some(lo), Some(hi)) = (self.length_min, self.length_max) {
            if lo > hi {
                return Err(ValidationError::invalid_format(
                    "lengthMin",
                    "must not exceed lengthMax",
                ));
            }
        }
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            if lo > hi {
                return Err(ValidationError::invalid_format("min", "must not exceed max"));
            }
        }
        if let Some(scale) = self.scale {
            if scale < 0 {
                return Err(ValidationError::invalid_format(
                    "scale",
                    "must be greater than or equal to 0",
                ));
            }
        }
        if let Some(precision) = self.precision {
            if precision <= 0 {
                return Err(ValidationError::invalid_format(
                    "precision",
                    "must be greater than 0",
                ));
            }
        }
        if let Some(pattern) = self.pattern.take() {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::empty_field("pattern"));
            }
            self.pattern = Some(trimmed.to_string());
        }

        if self.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_normalizes_to_none() {
        assert_eq!(ConstraintConfig::default().normalize(), Ok(None));
    }

    #[test]
    fn accepts_consistent_bounds_and_trims_pattern() {
        let config = ConstraintConfig {
            length_min: Some(0),
            length_max: Some(10),
            pattern: Some("  ^[a-z]+$ ".to_string()),
            ..Default::default()
        };
        let normalized = config.normalize().unwrap().unwrap();
        assert_eq!(normalized.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(normalized.length_max, Some(10));
    }

    #[test]
    fn rejects_negative_length_min() {
        let config = ConstraintConfig {
            length_min: Some(-1),
            ..Default::default()
        };
        assert_eq!(config.normalize().unwrap_err().field(), "lengthMin");
    }

    #[test]
    fn rejects_zero_length_max() {
        let config = ConstraintConfig {
            length_max: Some(0),
            ..Default::default()
        };
        assert_eq!(config.normalize().unwrap_err().field(), "lengthMax");
    }

    #[test]
    fn rejects_inverted_length_bounds() {
        let config = ConstraintConfig {
            length_min: Some(5),
            length_max: Some(2),
            ..Default::default()
        };
        assert!(config.normalize().is_err());
    }

    #[test]
    fn rejects_inverted_numeric_bounds() {
        let config = ConstraintConfig {
            min: Some(10.5),
            max: Some(1.0),
            ..Default::default()
        };
        assert_eq!(config.normalize().unwrap_err().field(), "min");
    }

    #[test]
    fn rejects_bad_scale_and_precision() {
        let scale = ConstraintConfig {
            scale: Some(-2),
            ..Default::default()
        };
        let precision = ConstraintConfig {
            precision: Some(0),
            ..Default::default()
        };
        assert_eq!(scale.normalize().unwrap_err().field(), "scale");
        assert_eq!(precision.normalize().unwrap_err().field(), "precision");
    }

    #[test]
    fn rejects_blank_pattern() {
        let config = ConstraintConfig {
            pattern: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.normalize(),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn serializes_camel_case_without_absent_bounds() {
        let config = ConstraintConfig {
            length_max: Some(40),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            serde_json::json!({ "lengthMax": 40 })
        );
    }
}
