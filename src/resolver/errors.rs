//! Configuration error types and diagnostics.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// A reference to a module that is neither registered nor a built-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// Module declaring the dependency
    pub module: String,
    /// Name that could not be found
    pub missing_name: String,
    /// Known module with the same name in a different case
    pub suggestion: Option<String>,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` requires `{}`", self.module, self.missing_name)
    }
}

/// Error while registering or resolving modules.
///
/// Every variant is fatal to the current build invocation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("module `{name}` is already registered")]
    #[diagnostic(code(modgraph::registry::duplicate))]
    DuplicateModule { name: String },

    #[error("{}", summarize_missing(.missing))]
    #[diagnostic(code(modgraph::resolve::unresolved))]
    UnresolvedDependency { missing: Vec<MissingDependency> },

    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(modgraph::resolve::cycle),
        help("Break the cycle by moving shared code into a lower-level module")
    )]
    CyclicDependency { cycle: Vec<String> },

    #[error("invalid build option `{option}` on module `{module}`: {reason}")]
    #[diagnostic(code(modgraph::registry::build_option))]
    InvalidBuildOption {
        module: String,
        option: String,
        reason: String,
    },

    #[error("entry module `{name}` is not registered")]
    #[diagnostic(code(modgraph::resolve::unknown_entry))]
    UnknownEntryModule { name: String },
}

fn summarize_missing(missing: &[MissingDependency]) -> String {
    let Some(first) = missing.first() else {
        return "unresolved dependency".to_string();
    };

    let mut msg = format!(
        "unresolved dependency `{}` required by `{}`",
        first.missing_name, first.module
    );
    if missing.len() > 1 {
        msg.push_str(&format!(" (and {} more)", missing.len() - 1));
    }
    msg
}

impl ConfigError {
    /// The unresolved names, if this is an unresolved-dependency error.
    pub fn missing_names(&self) -> Vec<&str> {
        match self {
            ConfigError::UnresolvedDependency { missing } => {
                missing.iter().map(|m| m.missing_name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::DuplicateModule { name } => {
                Diagnostic::error(format!("module `{}` is declared more than once", name))
                    .with_context("module names must be unique across the manifest and built-ins")
                    .with_suggestion(format!(
                        "Rename one of the `{}` declarations or drop it from `externals`",
                        name
                    ))
            }

            ConfigError::UnresolvedDependency { missing } => {
                let mut diag = Diagnostic::error(format!(
                    "{} unresolved module reference{}",
                    missing.len(),
                    if missing.len() == 1 { "" } else { "s" }
                ));

                for m in missing {
                    diag = match &m.suggestion {
                        Some(s) => diag.with_context(format!("{} (did you mean `{}`?)", m, s)),
                        None => diag.with_context(m.to_string()),
                    };
                }

                diag.with_suggestion("Declare the missing modules in Modules.toml")
                    .with_suggestion(
                        "Add engine modules to `externals` under [plugin] or [resolve]",
                    )
            }

            ConfigError::CyclicDependency { cycle } => {
                Diagnostic::error("cycle detected in module graph")
                    .with_context(format!("cycle: {}", cycle.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing or restructuring dependencies".to_string(),
                    )
                    .with_suggestion(
                        "Check conditional dependencies enabled by the current flags".to_string(),
                    )
            }

            ConfigError::InvalidBuildOption {
                module,
                option,
                reason,
            } => Diagnostic::error(format!("invalid build option on `{}`", module))
                .with_context(format!("{}: {}", option, reason))
                .with_suggestion(format!(
                    "Fix `{}` in the [module.build] table of `{}`",
                    option, module
                )),

            ConfigError::UnknownEntryModule { name } => {
                Diagnostic::error(format!("entry module `{}` is not registered", name))
                    .with_suggestion("Run `modgraph plan` without arguments to use every module")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(module: &str, name: &str) -> MissingDependency {
        MissingDependency {
            module: module.to_string(),
            missing_name: name.to_string(),
            suggestion: None,
        }
    }

    #[test]
    fn test_unresolved_message_counts_rest() {
        let err = ConfigError::UnresolvedDependency {
            missing: vec![
                missing("VoxelGraphEditor", "GraphEditr"),
                missing("VoxelLandscape", "Landscpe"),
            ],
        };

        assert_eq!(
            err.to_string(),
            "unresolved dependency `GraphEditr` required by `VoxelGraphEditor` (and 1 more)"
        );
        assert_eq!(err.missing_names(), vec!["GraphEditr", "Landscpe"]);
    }

    #[test]
    fn test_unresolved_diagnostic_lists_all() {
        let mut first = missing("VoxelCore", "physicscore");
        first.suggestion = Some("PhysicsCore".to_string());
        let err = ConfigError::UnresolvedDependency {
            missing: vec![first, missing("VoxelCore", "Nope")],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("2 unresolved module references"));
        assert!(output.contains("did you mean `PhysicsCore`?"));
        assert!(output.contains("`VoxelCore` requires `Nope`"));
    }

    #[test]
    fn test_cycle_diagnostic() {
        let err = ConfigError::CyclicDependency {
            cycle: vec!["A".into(), "B".into(), "A".into()],
        };

        assert_eq!(err.to_string(), "cyclic dependency: A -> B -> A");
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("cycle: A -> B -> A"));
        assert!(output.contains("help: consider:"));
    }
}
