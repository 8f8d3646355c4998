//! Application handlers.
//!
//! One handler per operation. Each checks project access first, then
//! delegates to the ports.

pub mod domain_model;
pub mod validation;

use tracing::{error, warn};

use crate::domain::foundation::{DomainError, ErrorKind, ProjectId};

/// Logs a failed operation: `error!` for infrastructure failures,
/// `warn!` for rejected input or invariants.
pub(crate) fn report_rejection(
    operation: &'static str,
    project_id: ProjectId,
) -> impl Fn(&DomainError) {
    move |err| match err.kind() {
        ErrorKind::Internal => {
            error!(operation, project_id = %project_id, error = %err, "Operation failed")
        }
        ErrorKind::Forbidden
        | ErrorKind::NotFound
        | ErrorKind::BadRequest
        | ErrorKind::Conflict => {
            warn!(operation, project_id = %project_id, code = %err.code, "Operation rejected")
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::adapters::memory::{
        InMemoryAccessGuard, InMemoryDomainModelStore, InMemoryFindingLedger,
    };
    use crate::domain::foundation::{ActorId, ClassId, ProjectId};
    use crate::domain::model::{DomainAttribute, DomainClass, ModelSnapshot, NewAttribute, NewClass};
    use crate::domain::validation::PersistedFinding;
    use crate::ports::{AccessGuard, AuditLog, DomainModelStore, FindingLedger, ProjectRole};

    use super::validation::{
        ProjectLocks, RunValidationsCommand, RunValidationsHandler, ValidationRunConfig,
    };

    /// One project with an editor and a viewer, backed by memory adapters.
    pub struct Fixture {
        pub project_id: ProjectId,
        pub editor: ActorId,
        pub viewer: ActorId,
        pub memory_store: Arc<InMemoryDomainModelStore>,
        pub memory_ledger: InMemoryFindingLedger,
        guard: Arc<InMemoryAccessGuard>,
    }

    impl Fixture {
        pub fn new() -> Self {
            let (project_id, editor, viewer) = (ProjectId::new(), ActorId::new(), ActorId::new());
            let guard = InMemoryAccessGuard::new()
                .with_member(project_id, editor, ProjectRole::Editor)
                .with_member(project_id, viewer, ProjectRole::Viewer);
            Self {
                project_id,
                editor,
                viewer,
                memory_store: Arc::new(InMemoryDomainModelStore::new()),
                memory_ledger: InMemoryFindingLedger::new(),
                guard: Arc::new(guard),
            }
        }

        pub fn access(&self) -> Arc<dyn AccessGuard> {
            self.guard.clone()
        }

        pub fn store(&self) -> Arc<dyn DomainModelStore> {
            self.memory_store.clone()
        }

        pub fn audit(&self) -> Arc<dyn AuditLog> {
            self.memory_store.clone()
        }

        pub fn ledger(&self) -> Arc<dyn FindingLedger> {
            Arc::new(self.memory_ledger.clone())
        }

        pub async fn model(&self) -> ModelSnapshot {
            self.memory_store.get_model(&self.project_id).await.unwrap()
        }

        pub async fn ledger_rows(&self) -> Vec<PersistedFinding> {
            self.memory_ledger.rows(&self.project_id).await
        }

        pub async fn class(&self, name: &str) -> DomainClass {
            self.memory_store
                .create_class(
                    &self.project_id,
                    &self.editor,
                    NewClass {
                        name: name.to_string(),
                        description: None,
                    },
                )
                .await
                .unwrap()
        }

        pub async fn attribute(&self, class_id: &ClassId, name: &str, attribute_type: &str) -> DomainAttribute {
            self.memory_store
                .create_attribute(
                    &self.project_id,
                    &self.editor,
                    NewAttribute {
                        class_id: *class_id,
                        name: name.to_string(),
                        attribute_type: attribute_type.parse().unwrap(),
                        required: false,
                        config: None,
                    },
                )
                .await
                .unwrap()
        }

        pub async fn run_validations(&self) -> Vec<PersistedFinding> {
            RunValidationsHandler::new(
                self.access(),
                self.store(),
                self.ledger(),
                Arc::new(ProjectLocks::new()),
                ValidationRunConfig::default(),
            )
            .handle(RunValidationsCommand {
                project_id: self.project_id,
                actor_id: self.editor,
            })
            .await
            .unwrap()
            .findings
        }
    }
}
