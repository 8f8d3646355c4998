//! HTTP DTOs for domain model endpoints.
//!
//! Responses reuse the domain types' serde form; requests carry enum
//! values as strings so parsing errors come back as `UNSUPPORTED_VALUE`.

use serde::{Deserialize, Deserializer};

use crate::domain::foundation::{AttributeId, ClassId, IdentityId};
use crate::domain::model::ConstraintConfig;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ════════════════════════════════════════════════════════════════════════════
// Classes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassLookupParams {
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Attributes
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAttributeRequest {
    pub class_id: ClassId,
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub config: Option<ConstraintConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttributeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub attribute_type: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub config: Option<Option<ConstraintConfig>>,
}

// ════════════════════════════════════════════════════════════════════════════
// Relations
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelationRequest {
    pub source_class_id: ClassId,
    pub target_class_id: ClassId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub source_role: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    pub source_multiplicity: String,
    pub target_multiplicity: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRelationRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub source_role: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_role: Option<Option<String>>,
    #[serde(default)]
    pub source_multiplicity: Option<String>,
    #[serde(default)]
    pub target_multiplicity: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Identities and audit
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct DefineIdentityRequest {
    pub class_id: ClassId,
    #[serde(default)]
    pub identity_id: Option<IdentityId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub attribute_ids: Vec<AttributeId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditParams {
    #[serde(default = "default_audit_limit")]
    pub limit: u32,
}

fn default_audit_limit() -> u32 {
    50
}
