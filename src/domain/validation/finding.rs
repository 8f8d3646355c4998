//! Findings: the ephemeral output of a rule run and its persisted form.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{
    ActorId, DomainError, ErrorCode, FindingId, ProjectId, StateMachine, Timestamp,
    ValidationError,
};

use super::{Category, ElementPath, ElementType, FindingState, RuleCode, Severity};

/// Maximum length of an ignore justification.
pub const MAX_JUSTIFICATION_LENGTH: usize = 500;

/// One occurrence of a rule firing against one model element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    pub rule_code: RuleCode,
    pub rule_name: String,
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub element_type: ElementType,
    pub element_id: Option<Uuid>,
    pub element_name: Option<String>,
    pub element_path: ElementPath,
    pub suggestion: Option<String>,
}

impl ValidationFinding {
    pub fn key(&self) -> FindingKey {
        FindingKey {
            rule_code: self.rule_code,
            element_path: self.element_path.clone(),
        }
    }
}

/// Identity of a finding across runs, scoped to a project.
///
/// Displays as `ruleCode::elementPath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FindingKey {
    pub rule_code: RuleCode,
    pub element_path: ElementPath,
}

impl fmt::Display for FindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.rule_code, self.element_path)
    }
}

/// A finding stored in the project's ledger, carrying the user's decision.
///
/// # Invariants
///
/// - `(project_id, rule_code, element_path)` is unique in the ledger
/// - `justification` is present whenever `state` is `Ignored`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedFinding {
    pub id: FindingId,
    pub project_id: ProjectId,
    #[serde(flatten)]
    pub finding: ValidationFinding,
    pub state: FindingState,
    pub justification: Option<String>,
    /// Actor behind the last state change.
    pub last_actor_id: Option<ActorId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PersistedFinding {
    /// A brand-new ledger row in `Open` state.
    pub fn open(
        project_id: ProjectId,
        finding: ValidationFinding,
        actor_id: ActorId,
        now: Timestamp,
    ) -> Self {
        Self {
            id: FindingId::new(),
            project_id,
            finding,
            state: FindingState::Open,
            justification: None,
            last_actor_id: Some(actor_id),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> FindingKey {
        self.finding.key()
    }

    /// Marks the finding as ignored with a justification.
    ///
    /// Ignoring an already ignored finding replaces its justification.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` / `EmptyField` for a blank or oversized justification
    /// - `InvalidStateTransition` if the finding is resolved
    pub fn ignore(
        &mut self,
        justification: &str,
        actor_id: ActorId,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let justification = justification.trim();
        if justification.is_empty() {
            return Err(ValidationError::empty_field("justification").into());
        }
        let length = justification.chars().count();
        if length > MAX_JUSTIFICATION_LENGTH {
            return Err(
                ValidationError::too_long("justification", MAX_JUSTIFICATION_LENGTH, length).into(),
            );
        }
        if self.state != FindingState::Ignored {
            self.state = self.state.transition_to(FindingState::Ignored)?;
        }

        self.justification = Some(justification.to_string());
        self.last_actor_id = Some(actor_id);
        self.updated_at = now;
        Ok(())
    }

    /// Reopens an ignored finding and clears its justification.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the finding is ignored
    pub fn reopen(&mut self, actor_id: ActorId, now: Timestamp) -> Result<(), DomainError> {
        if self.state != FindingState::Ignored {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Only ignored findings can be reopened; this one is {}", self.state),
            ));
        }

        self.state = self.state.transition_to(FindingState::Open)?;
        self.justification = None;
        self.last_actor_id = Some(actor_id);
        self.updated_at = now;
        Ok(())
    }

    /// Applies a recurrence of this finding's key from a fresh run.
    ///
    /// Descriptive fields are replaced. An ignored row keeps its state,
    /// justification and last actor. Any other row becomes `Open`; its
    /// stored justification is left as it was, so a resolved row that had
    /// been ignored comes back open still carrying the old text.
    pub(crate) fn refresh(&mut self, finding: ValidationFinding, actor_id: ActorId, now: Timestamp) {
        self.finding = finding;
        match self.state {
            FindingState::Ignored => {}
            FindingState::Open | FindingState::Resolved => {
                self.state = FindingState::Open;
                self.last_actor_id = Some(actor_id);
            }
        }
        self.updated_at = now;
    }

    /// Closes a finding whose key is absent from the latest run.
    /// The justification is kept.
    pub(crate) fn resolve(&mut self, actor_id: ActorId, now: Timestamp) {
        self.state = FindingState::Resolved;
        self.last_actor_id = Some(actor_id);
        self.updated_at = now;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::foundation::ClassId;

    pub fn class_finding(rule_code: RuleCode, class_id: &ClassId) -> ValidationFinding {
        let definition = rule_code.definition();
        ValidationFinding {
            rule_code,
            rule_name: definition.name.to_string(),
            category: definition.category,
            severity: definition.severity,
            message: format!("{} fired", rule_code),
            element_type: ElementType::Class,
            element_id: Some(*class_id.as_uuid()),
            element_name: Some("Cliente".to_string()),
            element_path: ElementPath::class(class_id),
            suggestion: None,
        }
    }

    pub fn persisted(state: FindingState, justification: Option<&str>) -> PersistedFinding {
        let mut row = PersistedFinding::open(
            ProjectId::new(),
            class_finding(RuleCode::ClassWithoutIdentity, &ClassId::new()),
            ActorId::new(),
            Timestamp::now(),
        );
        row.state = state;
        row.justification = justification.map(str::to_string);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::domain::foundation::ErrorKind;

    #[test]
    fn key_displays_rule_code_and_path() {
        let row = persisted(FindingState::Open, None);
        assert_eq!(
            row.key().to_string(),
            format!("DM_CLASS_NO_IDENTITY::{}", row.finding.element_path)
        );
    }

    #[test]
    fn ignore_requires_justification() {
        let mut row = persisted(FindingState::Open, None);
        let err = row.ignore("   ", ActorId::new(), Timestamp::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(row.state, FindingState::Open);
    }

    #[test]
    fn ignore_stores_trimmed_justification_and_actor() {
        let mut row = persisted(FindingState::Open, None);
        let actor = ActorId::new();
        row.ignore("  legacy table ", actor, Timestamp::now()).unwrap();
        assert_eq!(row.state, FindingState::Ignored);
        assert_eq!(row.justification.as_deref(), Some("legacy table"));
        assert_eq!(row.last_actor_id, Some(actor));
    }

    #[test]
    fn ignore_rejects_overlong_justification() {
        let mut row = persisted(FindingState::Open, None);
        let text = "x".repeat(MAX_JUSTIFICATION_LENGTH + 1);
        assert!(row.ignore(&text, ActorId::new(), Timestamp::now()).is_err());
    }

    #[test]
    fn ignore_again_replaces_justification() {
        let mut row = persisted(FindingState::Ignored, Some("old"));
        row.ignore("new", ActorId::new(), Timestamp::now()).unwrap();
        assert_eq!(row.justification.as_deref(), Some("new"));
    }

    #[test]
    fn resolved_finding_cannot_be_ignored() {
        let mut row = persisted(FindingState::Resolved, None);
        let err = row.ignore("why", ActorId::new(), Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn reopen_clears_justification() {
        let mut row = persisted(FindingState::Ignored, Some("accepted risk"));
        row.reopen(ActorId::new(), Timestamp::now()).unwrap();
        assert_eq!(row.state, FindingState::Open);
        assert_eq!(row.justification, None);
    }

    #[test]
    fn reopen_requires_ignored_state() {
        for state in [FindingState::Open, FindingState::Resolved] {
            let mut row = persisted(state, None);
            let err = row.reopen(ActorId::new(), Timestamp::now()).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        }
    }

    #[test]
    fn refresh_keeps_ignored_decision() {
        let mut row = persisted(FindingState::Ignored, Some("J"));
        let original_actor = row.last_actor_id;
        let mut fresh = row.finding.clone();
        fresh.message = "updated message".to_string();

        row.refresh(fresh, ActorId::new(), Timestamp::now());

        assert_eq!(row.state, FindingState::Ignored);
        assert_eq!(row.justification.as_deref(), Some("J"));
        assert_eq!(row.last_actor_id, original_actor);
        assert_eq!(row.finding.message, "updated message");
    }

    // Recurrence reopens a resolved row without clearing its old
    // justification. Pins the current rule; clearing it is the alternative.
    #[test]
    fn refresh_reopens_resolved_row_and_keeps_its_justification() {
        let mut row = persisted(FindingState::Resolved, Some("accepted risk"));
        let actor = ActorId::new();

        row.refresh(row.finding.clone(), actor, Timestamp::now());

        assert_eq!(row.state, FindingState::Open);
        assert_eq!(row.justification.as_deref(), Some("accepted risk"));
        assert_eq!(row.last_actor_id, Some(actor));
    }

    #[test]
    fn persisted_finding_serializes_flat() {
        let row = persisted(FindingState::Open, None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["rule_code"], "DM_CLASS_NO_IDENTITY");
        assert_eq!(json["state"], "open");
        assert_eq!(json["element_type"], "CLASS");
    }
}
