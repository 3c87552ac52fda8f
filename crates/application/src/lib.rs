//! Application services and ports.

#![forbid(unsafe_code)]

mod effective_permission_service;
mod permission_assignment_service;
mod permission_editor;
mod permission_ports;
mod permission_resolver;

pub use effective_permission_service::{EffectivePermissionService, PermissionLoadOutcome};
pub use permission_assignment_service::PermissionAssignmentService;
pub use permission_editor::{PermissionSetEditor, PermissionSetObserver, PermissionSetSummary};
pub use permission_ports::{
    AssignmentTarget, EffectivePermissionSource, PermissionAssignmentRepository,
    PermissionCatalogSource,
};
pub use permission_resolver::PermissionResolver;
