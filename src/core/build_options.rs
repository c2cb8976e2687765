//! Per-module build options.
//!
//! Options are declared statically in the manifest and checked once when the
//! module is registered. The settings a module is actually compiled with
//! depend on the build flags and are computed by [`BuildOptions::effective`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::flags::{BuildFlags, IncludeHygiene};

/// Precompiled-header strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PchUsage {
    /// Follow the build's include-hygiene mode.
    #[default]
    Default,
    /// Use shared PCHs provided by dependencies.
    Shared,
    /// Use the module's own PCH if it has one, shared ones otherwise.
    ExplicitOrShared,
    /// Never use shared PCHs.
    NoShared,
    /// No precompiled headers at all.
    None,
}

impl fmt::Display for PchUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PchUsage::Default => "default",
            PchUsage::Shared => "shared",
            PchUsage::ExplicitOrShared => "explicit-or-shared",
            PchUsage::NoShared => "no-shared",
            PchUsage::None => "none",
        };
        f.write_str(s)
    }
}

/// Include-what-you-use support level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IwyuSupport {
    #[default]
    Full,
    KeepAsIs,
    None,
}

impl fmt::Display for IwyuSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IwyuSupport::Full => f.write_str("full"),
            IwyuSupport::KeepAsIs => f.write_str("keep-as-is"),
            IwyuSupport::None => f.write_str("none"),
        }
    }
}

/// Build options declared by a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildOptions {
    pub pch: PchUsage,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_pch_header: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_pch_header: Option<PathBuf>,

    /// Exported to every module that can see this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub public_include_paths: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub private_include_paths: Vec<PathBuf>,

    /// Unity-build override; unset follows the hygiene mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unity: Option<bool>,

    pub iwyu: IwyuSupport,
}

/// A statically invalid option combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptionError {
    pub option: &'static str,
    pub reason: String,
}

impl BuildOptions {
    /// Check option combinations that can never be valid.
    pub fn validate(&self) -> Result<(), BuildOptionError> {
        if self.pch == PchUsage::None {
            if let Some(header) = &self.private_pch_header {
                return Err(BuildOptionError {
                    option: "private-pch-header",
                    reason: format!(
                        "`{}` is set but `pch = \"none\"` disables precompiled headers",
                        header.display()
                    ),
                });
            }
        }

        if let Some(header) = &self.shared_pch_header {
            if matches!(self.pch, PchUsage::None | PchUsage::NoShared) {
                return Err(BuildOptionError {
                    option: "shared-pch-header",
                    reason: format!(
                        "`{}` is exported but `pch = \"{}\"` disables shared PCHs",
                        header.display(),
                        self.pch
                    ),
                });
            }
        }

        for (option, paths) in [
            ("public-include-paths", &self.public_include_paths),
            ("private-include-paths", &self.private_include_paths),
        ] {
            if paths.iter().any(|p| p.as_os_str().is_empty()) {
                return Err(BuildOptionError {
                    option,
                    reason: "include paths must not be empty".to_string(),
                });
            }
        }

        if let Some(path) = self
            .public_include_paths
            .iter()
            .find(|p| self.private_include_paths.contains(p))
        {
            return Err(BuildOptionError {
                option: "private-include-paths",
                reason: format!("`{}` is listed as both public and private", path.display()),
            });
        }

        if self.unity == Some(true) && self.iwyu == IwyuSupport::Full {
            return Err(BuildOptionError {
                option: "unity",
                reason: "`unity = true` conflicts with `iwyu = \"full\"`".to_string(),
            });
        }

        Ok(())
    }

    /// Settings for this module under the given flags.
    pub fn effective(&self, flags: &BuildFlags) -> EffectiveSettings {
        let pch = match self.pch {
            PchUsage::Default => match flags.hygiene {
                IncludeHygiene::Iwyu => PchUsage::ExplicitOrShared,
                IncludeHygiene::Unity => PchUsage::Shared,
            },
            other => other,
        };

        let unity = self
            .unity
            .unwrap_or(flags.hygiene == IncludeHygiene::Unity);

        let private_pch_header = match pch {
            PchUsage::ExplicitOrShared => self.private_pch_header.clone(),
            _ => None,
        };

        EffectiveSettings {
            pch,
            private_pch_header,
            shared_pch_header: self.shared_pch_header.clone(),
            unity,
            iwyu: self.iwyu,
        }
    }
}

/// Resolved compile settings for one module in one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveSettings {
    pub pch: PchUsage,

    /// Only kept when the strategy actually uses the module's own PCH.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_pch_header: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_pch_header: Option<PathBuf>,

    pub unity: bool,
    pub iwyu: IwyuSupport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_are_valid() {
        assert!(BuildOptions::default().validate().is_ok());
    }

    #[test]
    fn test_pch_none_with_header() {
        let opts = BuildOptions {
            pch: PchUsage::None,
            private_pch_header: Some("Public/VoxelMinimal.h".into()),
            ..Default::default()
        };

        let err = opts.validate().unwrap_err();
        assert_eq!(err.option, "private-pch-header");
        assert!(err.reason.contains("VoxelMinimal.h"));
    }

    #[test]
    fn test_no_shared_with_shared_header() {
        let opts = BuildOptions {
            pch: PchUsage::NoShared,
            shared_pch_header: Some("Public/VoxelCoreShared.h".into()),
            ..Default::default()
        };

        assert_eq!(opts.validate().unwrap_err().option, "shared-pch-header");
    }

    #[test]
    fn test_include_path_conflicts() {
        let opts = BuildOptions {
            public_include_paths: vec!["Public".into()],
            private_include_paths: vec!["Public".into()],
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().option, "private-include-paths");

        let opts = BuildOptions {
            public_include_paths: vec![PathBuf::new()],
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().option, "public-include-paths");
    }

    #[test]
    fn test_unity_with_full_iwyu() {
        let opts = BuildOptions {
            unity: Some(true),
            ..Default::default()
        };
        assert_eq!(opts.validate().unwrap_err().option, "unity");

        let opts = BuildOptions {
            unity: Some(true),
            iwyu: IwyuSupport::KeepAsIs,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_effective_follows_hygiene() {
        let opts = BuildOptions {
            private_pch_header: Some("Public/VoxelMinimal.h".into()),
            ..Default::default()
        };

        let unity = opts.effective(&BuildFlags::default());
        assert_eq!(unity.pch, PchUsage::Shared);
        assert!(unity.unity);
        assert!(unity.private_pch_header.is_none());

        let iwyu = opts.effective(&BuildFlags::default().with_hygiene(IncludeHygiene::Iwyu));
        assert_eq!(iwyu.pch, PchUsage::ExplicitOrShared);
        assert!(!iwyu.unity);
        assert_eq!(
            iwyu.private_pch_header,
            Some(PathBuf::from("Public/VoxelMinimal.h"))
        );
    }

    #[test]
    fn test_explicit_choice_wins() {
        let opts = BuildOptions {
            pch: PchUsage::NoShared,
            unity: Some(false),
            ..Default::default()
        };

        let eff = opts.effective(&BuildFlags::default());
        assert_eq!(eff.pch, PchUsage::NoShared);
        assert!(!eff.unity);
    }
}
