//! Domain model - classes, attributes, identities and relations of a project.
//!
//! [`DomainModel`] is the aggregate; every accepted write comes back as a
//! [`ModelChange`] for the adapters to persist and audit.

mod aggregate;
mod attribute_type;
mod change;
mod commands;
mod constraint;
mod entities;
mod multiplicity;
pub mod naming;
mod snapshot;

pub use aggregate::DomainModel;
pub use attribute_type::AttributeType;
pub use change::ModelChange;
pub use commands::{
    AttributeChanges, ClassChanges, IdentityDefinition, NewAttribute, NewClass, NewRelation,
    RelationChanges,
};
pub use constraint::ConstraintConfig;
pub use entities::{DomainAttribute, DomainClass, DomainIdentity, DomainRelation};
pub use multiplicity::Multiplicity;
pub use snapshot::ModelSnapshot;
