// src/search/flex.rs
// Registry of named objects carrying hyperparameter metadata and their apply history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::apply::{Applied, ApplyTarget, History, HistoryLog, ParamTarget};
use crate::params::Hypers;
use crate::sheet::Sheet;
use crate::styler::Styler;

/// One simulation object's hyperparameter surface.
///
/// Sheets applied to a `FlexValue` write into its [`Hypers`] instead of
/// a live object, and every matching selector is appended to its history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlexValue {
    /// Instance name, matched by `#Name` selectors
    pub name: String,
    /// Target type, matched by bare selectors and parameter paths
    #[serde(rename = "type")]
    pub type_name: String,
    /// Space-separated class tags, matched by `.Class` selectors
    #[serde(default)]
    pub class: String,
    /// Collected metadata
    #[serde(default)]
    pub object: Hypers,
    /// Selectors applied since the last reset
    #[serde(skip)]
    pub history: HistoryLog,
}

impl FlexValue {
    /// Creates an entry with empty metadata
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, class: impl Into<String>) -> Self {
        FlexValue {
            name: name.into(),
            type_name: type_name.into(),
            class: class.into(),
            ..Default::default()
        }
    }

    /// Takes identity from `other` and merges its metadata into this one.
    /// History is left alone.
    pub fn copy_from(&mut self, other: &FlexValue) {
        self.name.clone_from(&other.name);
        self.type_name.clone_from(&other.type_name);
        self.class.clone_from(&other.class);
        self.object.copy_from(&other.object);
    }
}

impl Styler for FlexValue {
    fn style_class(&self) -> &str {
        &self.class
    }

    fn style_name(&self) -> &str {
        &self.name
    }
}

impl ParamTarget for FlexValue {
    fn style_type(&self) -> &str {
        &self.type_name
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn styler(&self) -> Option<&dyn Styler> {
        Some(self)
    }

    fn apply_target(&mut self) -> ApplyTarget<'_> {
        ApplyTarget::Hypers(&mut self.object)
    }

    fn history(&mut self) -> Option<&mut dyn History> {
        Some(&mut self.history)
    }
}

/// Name -> [`FlexValue`] registry.
///
/// Entries must exist before a sheet is applied: application merges into
/// each entry's metadata and never creates entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flex(BTreeMap<String, FlexValue>);

impl Flex {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all entries, keyed by name
    pub fn init(&mut self, vals: impl IntoIterator<Item = FlexValue>) {
        self.0 = vals.into_iter().map(|v| (v.name.clone(), v)).collect();
    }

    /// Adds or replaces one entry
    pub fn insert(&mut self, val: FlexValue) {
        self.0.insert(val.name.clone(), val);
    }

    /// Entry by name
    pub fn get(&self, name: &str) -> Option<&FlexValue> {
        self.0.get(name)
    }

    /// Mutable entry by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut FlexValue> {
        self.0.get_mut(name)
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlexValue)> {
        self.0.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies `sheet` to every entry, in name order.
    ///
    /// Matching selectors are appended to each entry's history when
    /// `record_history` is set.
    pub fn apply_sheet(&mut self, sheet: &mut Sheet, record_history: bool) -> Applied {
        let mut outcome = Applied::default();
        for val in self.0.values_mut() {
            outcome.merge(sheet.apply_with(val, false, record_history));
        }
        outcome
    }

    /// Merges entries from `other`, creating any that are missing.
    pub fn copy_from(&mut self, other: &Flex) {
        for (name, val) in &other.0 {
            self.0.entry(name.clone()).or_default().copy_from(val);
        }
    }

    /// Clears every entry's history before a fresh configuration pass
    pub fn reset_history(&mut self) {
        for val in self.0.values_mut() {
            val.history.params_history_reset();
        }
    }
}
