//! Interned module identifiers.
//!
//! Module names are compared and hashed constantly during resolution, so
//! every name is interned once and a `ModuleId` is just a pointer to the
//! shared copy.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Process-wide name table. Only ever grows.
static NAMES: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// The name of a module, interned.
///
/// Two ids with the same text share one allocation, so equality works on the
/// pointer. Hashing and ordering use the text: hashing must agree with `str`
/// for `Borrow<str>` lookups, and sorted ids come out alphabetical.
#[derive(Clone, Copy)]
pub struct ModuleId {
    name: &'static str,
}

impl ModuleId {
    /// Intern `name` and return its id.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();

        if let Some(&known) = NAMES
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return ModuleId { name: known };
        }

        let mut names = NAMES.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&known) = names.get(name) {
            return ModuleId { name: known };
        }

        let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
        names.insert(leaked);
        ModuleId { name: leaked }
    }

    /// The module name.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.name
    }

    /// Case-insensitive comparison, used for "did you mean" hints.
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

impl Deref for ModuleId {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.name
    }
}

impl AsRef<str> for ModuleId {
    #[inline]
    fn as_ref(&self) -> &str {
        self.name
    }
}

impl Borrow<str> for ModuleId {
    #[inline]
    fn borrow(&self) -> &str {
        self.name
    }
}

impl PartialEq for ModuleId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.name, other.name)
    }
}

impl Eq for ModuleId {}

impl PartialOrd for ModuleId {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ModuleId {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name)
    }
}

impl Hash for ModuleId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.name, f)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        ModuleId::new(s)
    }
}

impl From<String> for ModuleId {
    fn from(s: String) -> Self {
        ModuleId::new(s)
    }
}

impl From<&String> for ModuleId {
    fn from(s: &String) -> Self {
        ModuleId::new(s)
    }
}

impl Serialize for ModuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ModuleId::new(s))
    }
}
