//! Command implementations

pub mod catalog;
pub mod check;
pub mod completions;
pub mod explain;
pub mod plan;
pub mod tree;
