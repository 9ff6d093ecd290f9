#![forbid(unsafe_code)]

//! Core data model for composing user-conduct notices: the escalation
//! scale, the warning template catalog, and the level reassignment policy.

pub mod catalog;
pub mod level;
pub mod policy;
pub mod warning;

pub use catalog::{CatalogError, WarningCatalog};
pub use level::{LevelSet, WarningLevel};
pub use policy::resolve_level;
pub use warning::{Warning, WarningCategory, WarningKind};
