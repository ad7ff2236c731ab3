// src/params/hypers.rs
// Hyperparameter metadata kept in parallel with operative parameter values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ParamsError, Result};

/// Key holding the operative value (mirrors the value in `Params`)
pub const VAL: &str = "Val";
/// Lower search bound
pub const MIN: &str = "Min";
/// Upper search bound
pub const MAX: &str = "Max";
/// Standard deviation for Gaussian exploration
pub const STD_DEV: &str = "StdDev";
/// Tweak policy: `log`, `incr`, both, or a literal `[v1, v2]` list
pub const TWEAK: &str = "Tweak";

/// String-keyed metadata record for one parameter path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperValues(BTreeMap<String, String>);

impl HyperValues {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns the entry for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets `key` to `value`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrites entries with those from `other`, keeping the rest.
    pub fn copy_from(&mut self, other: &HyperValues) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Compact JSON form, e.g. `{"Min":"0.5","Val":"1.8"}`
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replaces the contents from a JSON object string
    pub fn set_json_string(&mut self, text: &str) -> Result<()> {
        *self = serde_json::from_str(text)?;
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for HyperValues {
    fn from(entries: [(K, V); N]) -> Self {
        HyperValues(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Path → metadata map, parallel in shape to [`Params`](super::Params).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hypers(BTreeMap<String, HyperValues>);

impl Hypers {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, path: impl Into<String>, values: HyperValues) -> Self {
        self.0.insert(path.into(), values);
        self
    }

    /// Target type of these paths (first segment of the first path)
    pub fn target_type(&self) -> Option<&str> {
        self.0.keys().next().map(|p| super::target_type_of(p))
    }

    /// Returns the record for `path`, or a logged `TargetNotFound`.
    pub fn param_by_name(&self, path: &str) -> Result<&HyperValues> {
        self.0.get(path).ok_or_else(|| {
            ParamsError::TargetNotFound {
                kind: "Hyper parameter",
                name: path.to_string(),
            }
            .logged()
        })
    }

    /// Returns the record for `path`
    pub fn get(&self, path: &str) -> Option<&HyperValues> {
        self.0.get(path)
    }

    /// Mutable record for `path`, created empty if missing
    pub fn entry(&mut self, path: &str) -> &mut HyperValues {
        self.0.entry(path.to_string()).or_default()
    }

    /// Sets the record for `path`
    pub fn set_by_name(&mut self, path: impl Into<String>, values: HyperValues) {
        self.0.insert(path.into(), values);
    }

    /// Records in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &HyperValues)> {
        self.0.iter()
    }

    /// Number of paths
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no paths are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges all records from `other` into this map, entry by entry.
    pub fn copy_from(&mut self, other: &Hypers) {
        for (path, values) in &other.0 {
            self.entry(path).copy_from(values);
        }
    }

    /// Drops records holding nothing but a `Val`.
    ///
    /// Applying a sheet to `Flex` values writes a `Val` for every parameter
    /// touched; this leaves only the paths that carry real search metadata.
    pub fn delete_val_only(&mut self) {
        self.0
            .retain(|_, hv| !(hv.len() == 1 && hv.get(VAL).is_some()));
    }
}

impl<K: Into<String>, const N: usize> From<[(K, HyperValues); N]> for Hypers {
    fn from(entries: [(K, HyperValues); N]) -> Self {
        Hypers(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
