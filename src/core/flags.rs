//! Build flags and the capability set derived from them.
//!
//! Flags describe the build being configured (editor or not, include-hygiene
//! mode, configuration). Conditional dependencies never look at flags
//! directly; they test a [`CapabilitySet`] computed once per resolution.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Include-hygiene mode for the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeHygiene {
    /// Unity builds with shared precompiled headers.
    #[default]
    Unity,
    /// Include-what-you-use: non-unity, explicit PCHs.
    Iwyu,
}

impl FromStr for IncludeHygiene {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unity" => Ok(IncludeHygiene::Unity),
            "iwyu" => Ok(IncludeHygiene::Iwyu),
            other => Err(format!(
                "unknown include-hygiene mode `{}` (expected `unity` or `iwyu`)",
                other
            )),
        }
    }
}

impl fmt::Display for IncludeHygiene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeHygiene::Unity => f.write_str("unity"),
            IncludeHygiene::Iwyu => f.write_str("iwyu"),
        }
    }
}

/// Build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
    Debug,
    #[default]
    Development,
    Shipping,
}

impl FromStr for Configuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Configuration::Debug),
            "development" => Ok(Configuration::Development),
            "shipping" => Ok(Configuration::Shipping),
            other => Err(format!(
                "unknown configuration `{}` (expected `debug`, `development` or `shipping`)",
                other
            )),
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::Debug => f.write_str("debug"),
            Configuration::Development => f.write_str("development"),
            Configuration::Shipping => f.write_str("shipping"),
        }
    }
}

/// Flags for one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildFlags {
    /// Building with editor support.
    pub editor: bool,

    /// Include-hygiene / unity mode.
    pub hygiene: IncludeHygiene,

    /// Build configuration.
    pub configuration: Configuration,
}

impl BuildFlags {
    /// Flags for an editor build with everything else at defaults.
    pub fn editor() -> Self {
        BuildFlags {
            editor: true,
            ..Default::default()
        }
    }

    pub fn with_hygiene(mut self, hygiene: IncludeHygiene) -> Self {
        self.hygiene = hygiene;
        self
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Evaluate the flags into a capability set.
    pub fn capabilities(&self) -> CapabilitySet {
        let mut caps = match self.hygiene {
            IncludeHygiene::Unity => CapabilitySet::UNITY,
            IncludeHygiene::Iwyu => CapabilitySet::IWYU,
        };

        caps |= match self.configuration {
            Configuration::Debug => CapabilitySet::DEBUG,
            Configuration::Development => CapabilitySet::DEVELOPMENT,
            Configuration::Shipping => CapabilitySet::SHIPPING,
        };

        caps.set(CapabilitySet::EDITOR, self.editor);
        caps
    }
}

/// A single capability a predicate can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Editor = 0,
    Unity = 1,
    Iwyu = 2,
    Debug = 3,
    Development = 4,
    Shipping = 5,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Capability::Editor,
        Capability::Unity,
        Capability::Iwyu,
        Capability::Debug,
        Capability::Development,
        Capability::Shipping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Editor => "editor",
            Capability::Unity => "unity",
            Capability::Iwyu => "iwyu",
            Capability::Debug => "debug",
            Capability::Development => "development",
            Capability::Shipping => "shipping",
        }
    }

    /// The single-bit set holding this capability.
    pub fn flag(self) -> CapabilitySet {
        match self {
            Capability::Editor => CapabilitySet::EDITOR,
            Capability::Unity => CapabilitySet::UNITY,
            Capability::Iwyu => CapabilitySet::IWYU,
            Capability::Debug => CapabilitySet::DEBUG,
            Capability::Development => CapabilitySet::DEVELOPMENT,
            Capability::Shipping => CapabilitySet::SHIPPING,
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .copied()
            .find(|cap| cap.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = Capability::ALL.iter().map(|c| c.as_str()).collect();
                format!("unknown capability `{}` (known: {})", s, known.join(", "))
            })
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Set of active capabilities, one bit each.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u8 {
        const EDITOR      = 1 << 0;
        const UNITY       = 1 << 1;
        const IWYU        = 1 << 2;
        const DEBUG       = 1 << 3;
        const DEVELOPMENT = 1 << 4;
        const SHIPPING    = 1 << 5;
    }
}

impl CapabilitySet {
    pub fn has(&self, cap: Capability) -> bool {
        self.contains(cap.flag())
    }

    /// Active capabilities in declaration order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(|cap| self.has(*cap))
    }
}

impl Serialize for CapabilitySet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.capabilities().map(|cap| cap.as_str()))
    }
}
