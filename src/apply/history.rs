// src/apply/history.rs
// Record of the selectors applied to an object, in application order.

use std::collections::BTreeMap;

use crate::params::{ParamValue, Sel};

/// Receives a notification for every selector that is applied to an object.
pub trait History {
    /// Clears the record before a fresh configuration pass
    fn params_history_reset(&mut self);

    /// Called once per selector that matched and was applied
    fn params_applied(&mut self, sel: &Sel);
}

/// Append-only log of applied selectors.
///
/// Entries are snapshots taken at application time; the last entry touching
/// a path is the one whose value won.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    applied: Vec<Sel>,
}

impl HistoryLog {
    /// Creates an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Applied selectors, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Sel> {
        self.applied.iter()
    }

    /// Number of applied selectors
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// True if nothing has been applied
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Copy of the log
    pub fn snapshot(&self) -> Vec<Sel> {
        self.applied.clone()
    }

    /// Most recent selector that assigned `value` to `path`.
    pub fn origin_of(&self, path: &str, value: &ParamValue) -> Option<&Sel> {
        self.applied
            .iter()
            .rev()
            .find(|sel| sel.assigned_value(path).as_ref() == Some(value))
    }

    /// Per-path summary of every value applied, most recent first:
    /// `Base:#Output: 1.4 | Layer: 1.8`.
    ///
    /// The set name prefixes an entry whenever it differs from the previous
    /// entry's set.
    pub fn params_history(&self) -> BTreeMap<String, String> {
        let mut summary: BTreeMap<String, String> = BTreeMap::new();
        let mut last_set = "";
        for sel in &self.applied {
            let show_set = sel.set_name != last_set;
            last_set = &sel.set_name;
            for (path, value) in sel.params.iter() {
                let mut entry = format!("{}: {}", sel.sel, value);
                if show_set {
                    entry = format!("{}:{}", sel.set_name, entry);
                }
                summary
                    .entry(path.clone())
                    .and_modify(|prev| *prev = format!("{} | {}", entry, prev))
                    .or_insert(entry);
            }
        }
        summary
    }
}

impl History for HistoryLog {
    fn params_history_reset(&mut self) {
        self.applied.clear();
    }

    fn params_applied(&mut self, sel: &Sel) {
        self.applied.push(sel.clone());
    }
}
