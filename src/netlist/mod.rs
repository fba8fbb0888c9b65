//! Graph-side stages: role classification, netlist assembly and external
//! marker classification.

pub mod assemble;
pub mod external;
pub mod roles;

pub use assemble::{assemble, AssemblyParams, WireIdGenerator};
pub use external::{classify_external, external_kind};
pub use roles::{assign_roles, GapSearch, RoleAssignment, RoleIssue};
