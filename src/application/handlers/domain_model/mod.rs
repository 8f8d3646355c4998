//! Domain model command and query handlers.

mod attribute_commands;
mod class_commands;
mod identity_commands;
mod queries;
mod relation_commands;

pub use attribute_commands::{
    CreateAttributeCommand, CreateAttributeHandler, DeleteAttributeCommand,
    DeleteAttributeHandler, UpdateAttributeCommand, UpdateAttributeHandler,
};
pub use class_commands::{
    CreateClassCommand, CreateClassHandler, DeleteClassCommand, DeleteClassHandler,
    UpdateClassCommand, UpdateClassHandler,
};
pub use identity_commands::{
    DefineIdentityCommand, DefineIdentityHandler, RemoveIdentityCommand, RemoveIdentityHandler,
};
pub use queries::{
    ClassLookup, FindClassHandler, FindClassQuery, GetDomainModelHandler, GetDomainModelQuery,
    ListAuditHandler, ListAuditQuery, MAX_AUDIT_LIMIT,
};
pub use relation_commands::{
    CreateRelationCommand, CreateRelationHandler, DeleteRelationCommand, DeleteRelationHandler,
    UpdateRelationCommand, UpdateRelationHandler,
};
