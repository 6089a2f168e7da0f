//! Build-time variable mapping and path localization.
//!
//! `BuildVars` holds the sysconfig-style configuration captured on the
//! original build machine. Key order is preserved across load, localize and
//! re-serialize so that converted files diff cleanly against their sources.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConvertError, ConvertResult};

/// A single build-time variable value.
///
/// Sysconfig data only ever carries strings, integers and booleans; any
/// other JSON type in a config document is rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl VarValue {
    /// The string contents, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VarValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Str(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Str(s)
    }
}

impl From<i64> for VarValue {
    fn from(i: i64) -> Self {
        VarValue::Int(i)
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

/// An order-preserving mapping of build-time variable names to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildVars {
    entries: Vec<(String, VarValue)>,
}

impl BuildVars {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<VarValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&VarValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a string value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(VarValue::as_str)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, VarValue)> for BuildVars {
    fn from_iter<I: IntoIterator<Item = (String, VarValue)>>(iter: I) -> Self {
        let mut vars = BuildVars::new();
        for (key, value) in iter {
            vars.insert(key, value);
        }
        vars
    }
}

impl Serialize for BuildVars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BuildVars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BuildVarsVisitor;

        impl<'de> Visitor<'de> for BuildVarsVisitor {
            type Value = BuildVars;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of build-time variables")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut vars = BuildVars::new();
                while let Some((key, value)) = access.next_entry::<String, VarValue>()? {
                    vars.insert(key, value);
                }
                Ok(vars)
            }
        }

        deserializer.deserialize_map(BuildVarsVisitor)
    }
}

/// Rewrite build-machine paths to the consuming host's install location.
///
/// Every occurrence of the original build prefix (the `prefix` variable) in
/// a string value is replaced with `new_base`, and the build-time framework
/// search flag `-F .` is rewritten to point at `new_base`. Non-string values
/// pass through unchanged. The input mapping is not modified.
pub fn localize(vars: &BuildVars, new_base: &Path) -> ConvertResult<BuildVars> {
    let orig_prefix = vars
        .get_str("prefix")
        .ok_or_else(|| ConvertError::MissingRequiredVar("prefix".to_string()))?
        .to_string();
    let base = new_base.to_string_lossy();

    let localized = vars
        .iter()
        .map(|(key, value)| {
            let value = match value {
                VarValue::Str(s) => {
                    let s = s.replace(&orig_prefix, &base);
                    let s = s.replace("-F .", &format!("-F {}", base));
                    VarValue::Str(s)
                }
                other => other.clone(),
            };
            (key.to_string(), value)
        })
        .collect();

    Ok(localized)
}
