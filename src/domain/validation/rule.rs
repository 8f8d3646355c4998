//! The fixed rule set and its catalogue.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::model::ModelSnapshot;

use super::{rules, Category, Severity, ValidationFinding};

/// Closed set of validation rules.
///
/// Each variant dispatches to one pure evaluator in [`rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleCode {
    #[serde(rename = "DM_CLASS_NO_IDENTITY")]
    ClassWithoutIdentity,
    #[serde(rename = "DM_RELATION_MANY_TO_MANY")]
    ManyToManyRelation,
    #[serde(rename = "DM_RELATION_AMBIGUOUS_ROLE")]
    AmbiguousRelationRole,
    #[serde(rename = "DM_ATTRIBUTE_DUPLICATED_NAME")]
    DuplicatedAttributeName,
    #[serde(rename = "DM_IDENTITY_WITHOUT_ATTRIBUTES")]
    IdentityWithoutAttributes,
    #[serde(rename = "DM_ATTRIBUTE_SUSPECT_MULTIVALUE")]
    SuspectMultivalueAttribute,
}

impl RuleCode {
    /// Evaluation order of the rule set.
    pub const ALL: [RuleCode; 6] = [
        RuleCode::ClassWithoutIdentity,
        RuleCode::ManyToManyRelation,
        RuleCode::AmbiguousRelationRole,
        RuleCode::DuplicatedAttributeName,
        RuleCode::IdentityWithoutAttributes,
        RuleCode::SuspectMultivalueAttribute,
    ];

    /// Stable, globally unique code.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::ClassWithoutIdentity => "DM_CLASS_NO_IDENTITY",
            RuleCode::ManyToManyRelation => "DM_RELATION_MANY_TO_MANY",
            RuleCode::AmbiguousRelationRole => "DM_RELATION_AMBIGUOUS_ROLE",
            RuleCode::DuplicatedAttributeName => "DM_ATTRIBUTE_DUPLICATED_NAME",
            RuleCode::IdentityWithoutAttributes => "DM_IDENTITY_WITHOUT_ATTRIBUTES",
            RuleCode::SuspectMultivalueAttribute => "DM_ATTRIBUTE_SUSPECT_MULTIVALUE",
        }
    }

    pub fn definition(&self) -> RuleDefinition {
        match self {
            RuleCode::ClassWithoutIdentity => RuleDefinition {
                code: *self,
                name: "Class without identity",
                description: "Every class needs at least one primary identity that defines its unique key.",
                category: Category::Integrity,
                severity: Severity::Error,
                suggestion: Some(
                    "Define a primary identity for the class by adding a unique key or marking the corresponding attributes.",
                ),
            },
            RuleCode::ManyToManyRelation => RuleDefinition {
                code: *self,
                name: "Potential many-to-many relation",
                description: "Relations whose source and target both allow more than one element may need an explicit bridge entity.",
                category: Category::AntiPattern,
                severity: Severity::Warning,
                suggestion: Some(
                    "Consider modelling an intermediate entity that materialises the relation and can hold extra attributes.",
                ),
            },
            RuleCode::AmbiguousRelationRole => RuleDefinition {
                code: *self,
                name: "Relation without roles or name",
                description: "Relations without a name or roles make the model harder to read and may be ambiguous.",
                category: Category::Syntax,
                severity: Severity::Warning,
                suggestion: Some("Give the relation a name or descriptive roles."),
            },
            RuleCode::DuplicatedAttributeName => RuleDefinition {
                code: *self,
                name: "Duplicated attribute in a class",
                description: "Attributes need unique names within their class to avoid ambiguity.",
                category: Category::Syntax,
                severity: Severity::Error,
                suggestion: Some("Rename or remove the duplicated attributes of the class."),
            },
            RuleCode::IdentityWithoutAttributes => RuleDefinition {
                code: *self,
                name: "Identity without attributes",
                description: "Identities need at least one attribute acting as key.",
                category: Category::Integrity,
                severity: Severity::Error,
                suggestion: Some("Add attributes to the identity or remove it if it does not apply."),
            },
            RuleCode::SuspectMultivalueAttribute => RuleDefinition {
                code: *self,
                name: "Potentially multi-valued attribute",
                description: "Attributes that seem to hold several values may break first normal form.",
                category: Category::Normalization,
                severity: Severity::Warning,
                suggestion: Some(
                    "Consider normalising the attribute into a separate entity or relation.",
                ),
            },
        }
    }

    /// Runs this rule against a snapshot.
    pub fn evaluate(&self, snapshot: &ModelSnapshot) -> Vec<ValidationFinding> {
        let definition = self.definition();
        match self {
            RuleCode::ClassWithoutIdentity => rules::class_without_identity(&definition, snapshot),
            RuleCode::ManyToManyRelation => rules::many_to_many_relation(&definition, snapshot),
            RuleCode::AmbiguousRelationRole => {
                rules::ambiguous_relation_role(&definition, snapshot)
            }
            RuleCode::DuplicatedAttributeName => {
                rules::duplicated_attribute_name(&definition, snapshot)
            }
            RuleCode::IdentityWithoutAttributes => {
                rules::identity_without_attributes(&definition, snapshot)
            }
            RuleCode::SuspectMultivalueAttribute => {
                rules::suspect_multivalue_attribute(&definition, snapshot)
            }
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s.trim())
            .ok_or_else(|| ValidationError::unsupported_value("rule_code", s))
    }
}

/// Metadata of a rule, upserted into the ledger's catalogue on every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDefinition {
    pub code: RuleCode,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub severity: Severity,
    /// Default suggestion for findings that carry none.
    pub suggestion: Option<&'static str>,
}

static CATALOGUE: Lazy<Vec<RuleDefinition>> =
    Lazy::new(|| RuleCode::ALL.iter().map(RuleCode::definition).collect());

/// Definitions of every rule, in evaluation order.
pub fn catalogue() -> &'static [RuleDefinition] {
    &CATALOGUE
}
