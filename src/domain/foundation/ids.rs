//! Strongly-typed identifier value objects.
//!
//! Every entity in the workbench is keyed by a UUID. Each key gets its own
//! newtype so a `ClassId` can never be passed where an `AttributeId` is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype with the standard API
/// (`new`, `from_uuid`, `as_uuid`, `Display`, `FromStr`, `Default`).
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random ", stringify!($name), ".")]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Creates a ", stringify!($name), " from an existing UUID.")]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Identifier of a project (the scope of one domain model).
    ProjectId
);
uuid_id!(
    /// Identifier of the user performing an operation.
    ActorId
);
uuid_id!(
    /// Identifier of an actor's membership in a project.
    MembershipId
);
uuid_id!(
    /// Identifier of a domain class.
    ClassId
);
uuid_id!(
    /// Identifier of an attribute within a class.
    AttributeId
);
uuid_id!(
    /// Identifier of an identity (candidate key) within a class.
    IdentityId
);
uuid_id!(
    /// Identifier of a relation between two classes.
    RelationId
);
uuid_id!(
    /// Identifier of a persisted validation finding.
    FindingId
);
uuid_id!(
    /// Identifier of an audit trail record.
    AuditRecordId
);
