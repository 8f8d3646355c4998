//! Read-only view of a project's model, the input of every rule.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClassId, ProjectId};

use super::{DomainClass, DomainRelation};

/// Full, consistently ordered read of a project's model.
///
/// Classes are ordered by name, relations by creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub project_id: ProjectId,
    pub classes: Vec<DomainClass>,
    pub relations: Vec<DomainRelation>,
}

impl ModelSnapshot {
    pub fn class(&self, id: &ClassId) -> Option<&DomainClass> {
        self.classes.iter().find(|c| &c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relations.is_empty()
    }
}
