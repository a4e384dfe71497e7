//! Opt fields constants for Asana API requests.
//!
//! Only the fields the provider reads back into state are requested.

/// Fields to request for project resources.
pub const PROJECT_FIELDS: &str = "gid,name,notes,color,workspace";

/// Fields to request for task resources.
pub const TASK_FIELDS: &str = "gid,name,notes,workspace,projects";
