//! Severity and category of a rule and of the findings it produces.
//!
//! Variant order is significance order; the derived `Ord` is what the
//! listing sort relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(ValidationError::unsupported_value("severity", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Syntax,
    Integrity,
    Normalization,
    AntiPattern,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::Integrity => "integrity",
            Category::Normalization => "normalization",
            Category::AntiPattern => "anti-pattern",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "syntax" => Ok(Category::Syntax),
            "integrity" => Ok(Category::Integrity),
            "normalization" => Ok(Category::Normalization),
            "anti-pattern" => Ok(Category::AntiPattern),
            _ => Err(ValidationError::unsupported_value("category", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_significance() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
    }

    #[test]
    fn category_order_matches_listing_contract() {
        let mut categories = vec![
            Category::AntiPattern,
            Category::Normalization,
            Category::Syntax,
            Category::Integrity,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                Category::Syntax,
                Category::Integrity,
                Category::Normalization,
                Category::AntiPattern
            ]
        );
    }

    #[test]
    fn parse_round_trips_storage_names() {
        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            assert_eq!(severity.as_str().parse(), Ok(severity));
        }
        assert_eq!("ANTI_PATTERN".parse(), Ok(Category::AntiPattern));
        assert!("style".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Category::AntiPattern).unwrap(),
            "\"anti-pattern\""
        );
    }
}
