//! Orchestration of a rule run: evaluate, fill defaults, deduplicate.

use std::collections::HashMap;

use crate::domain::model::ModelSnapshot;

use super::rule::catalogue;
use super::{RuleCode, RuleDefinition, ValidationFinding};

/// Result of evaluating the rule set against one snapshot; handed to the
/// ledger as one atomic sync request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub rules: &'static [RuleDefinition],
    pub findings: Vec<ValidationFinding>,
}

/// Runs every rule, concatenates the output and deduplicates it.
///
/// Findings without a suggestion inherit their rule's default.
pub fn evaluate(snapshot: &ModelSnapshot) -> Evaluation {
    let mut raw = Vec::new();
    for code in RuleCode::ALL {
        let definition = code.definition();
        let findings = code.evaluate(snapshot);
        tracing::debug!(rule = %code, count = findings.len(), "Rule evaluated");
        raw.extend(findings.into_iter().map(|mut finding| {
            if finding.suggestion.is_none() {
                finding.suggestion = definition.suggestion.map(str::to_string);
            }
            finding
        }));
    }

    Evaluation {
        rules: catalogue(),
        findings: deduplicate(raw),
    }
}

/// Collapses findings sharing a `ruleCode::elementPath` key.
///
/// The last finding for a key wins; it takes the position where the key
/// was first seen.
pub fn deduplicate(findings: Vec<ValidationFinding>) -> Vec<ValidationFinding> {
    let mut positions = HashMap::with_capacity(findings.len());
    let mut unique: Vec<ValidationFinding> = Vec::with_capacity(findings.len());
    for finding in findings {
        match positions.get(&finding.key()) {
            Some(&index) => unique[index] = finding,
            None => {
                positions.insert(finding.key(), unique.len());
                unique.push(finding);
            }
        }
    }
    unique
}
