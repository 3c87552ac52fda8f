//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod catalog;
mod effective;
mod permission;
mod role;
mod section;

pub use catalog::PermissionCatalog;
pub use effective::EffectivePermissionSet;
pub use permission::{PermissionCheck, PermissionRecord, action, dedup_by_resource, merge_grants};
pub use role::Role;
pub use section::ConsoleSection;
