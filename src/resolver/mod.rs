//! Module graph resolution.
//!
//! The resolver is pure and deterministic: all I/O happens before
//! resolution, and the same registry, entries and flags always produce the
//! same plan.

pub mod errors;
pub mod plan;
pub mod resolve;

pub use errors::{ConfigError, MissingDependency};
pub use plan::{ModulePlan, PlanEdge, PlanReport, PlannedDependency, PlannedModule};
pub use resolve::resolve;
