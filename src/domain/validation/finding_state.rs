//! Lifecycle of a persisted finding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// State of a persisted finding.
///
/// ```text
/// open ──ignore──▶ ignored ──reopen──▶ open
///   │                 │
///   └──── absent from latest run ────▶ resolved ──recurs──▶ open
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingState {
    Open,
    Ignored,
    Resolved,
}

impl FindingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingState::Open => "open",
            FindingState::Ignored => "ignored",
            FindingState::Resolved => "resolved",
        }
    }

    /// Open and ignored findings still describe a present condition.
    pub fn is_active(&self) -> bool {
        !matches!(self, FindingState::Resolved)
    }
}

impl StateMachine for FindingState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            FindingState::Open => vec![FindingState::Ignored, FindingState::Resolved],
            FindingState::Ignored => vec![FindingState::Open, FindingState::Resolved],
            FindingState::Resolved => vec![FindingState::Open],
        }
    }
}

impl fmt::Display for FindingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FindingState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(FindingState::Open),
            "ignored" => Ok(FindingState::Ignored),
            "resolved" => Ok(FindingState::Resolved),
            _ => Err(ValidationError::unsupported_value("state", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_can_be_ignored_or_resolved() {
        assert!(FindingState::Open.can_transition_to(&FindingState::Ignored));
        assert!(FindingState::Open.can_transition_to(&FindingState::Resolved));
    }

    #[test]
    fn ignored_can_be_reopened_or_resolved() {
        assert!(FindingState::Ignored.can_transition_to(&FindingState::Open));
        assert!(FindingState::Ignored.can_transition_to(&FindingState::Resolved));
    }

    #[test]
    fn resolved_only_reopens() {
        assert_eq!(
            FindingState::Resolved.valid_transitions(),
            vec![FindingState::Open]
        );
        assert!(FindingState::Resolved
            .transition_to(FindingState::Ignored)
            .is_err());
    }

    #[test]
    fn no_state_is_terminal() {
        for state in [FindingState::Open, FindingState::Ignored, FindingState::Resolved] {
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn state_orders_open_ignored_resolved() {
        assert!(FindingState::Open < FindingState::Ignored);
        assert!(FindingState::Ignored < FindingState::Resolved);
    }
}
