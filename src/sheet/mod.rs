//! Sheets and alternative configuration sets
//!
//! A [`Sheet`] is an ordered list of selectors; later selectors override
//! earlier ones on the same path. [`Sheets`] groups sheets by functional
//! area, and [`Sets`] / [`SheetSets`] hold named alternative
//! configurations, chosen among by the caller.
pub mod diff;

pub use diff::{Conflict, DiffReport};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::params::{ParamValue, Sel};
use crate::{ParamsError, Result};

/// Name of the reference configuration: applied first, and compared
/// against by `diffs_first`
pub const BASE: &str = "Base";

/// Ordered selectors forming one coherent configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet(Vec<Sel>);

impl Sheet {
    /// Creates an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a selector after all existing ones
    pub fn push(&mut self, sel: Sel) {
        self.0.push(sel);
    }

    /// Selectors in application order
    pub fn iter(&self) -> std::slice::Iter<'_, Sel> {
        self.0.iter()
    }

    /// Mutable selectors in application order
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Sel> {
        self.0.iter_mut()
    }

    /// Number of selectors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no selectors
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First selector with the given pattern, or a logged `TargetNotFound`.
    pub fn sel_by_name(&self, sel: &str) -> Result<&Sel> {
        self.0
            .iter()
            .find(|s| s.sel == sel)
            .ok_or_else(|| sel_not_found(sel))
    }

    /// Mutable version of [`sel_by_name`](Sheet::sel_by_name)
    pub fn sel_by_name_mut(&mut self, sel: &str) -> Result<&mut Sel> {
        self.0
            .iter_mut()
            .find(|s| s.sel == sel)
            .ok_or_else(|| sel_not_found(sel))
    }

    /// Sets a float parameter in the named selector
    pub fn set_float(&mut self, sel: &str, path: &str, value: f64) -> Result<()> {
        self.sel_by_name_mut(sel)?.set_float(path, value);
        Ok(())
    }

    /// Sets a parameter from text in the named selector
    pub fn set_string(&mut self, sel: &str, path: &str, value: &str) -> Result<()> {
        self.sel_by_name_mut(sel)?.set_string(path, value);
        Ok(())
    }

    /// Value of a parameter in the named selector
    pub fn param_value(&self, sel: &str, path: &str) -> Result<&ParamValue> {
        self.sel_by_name(sel)?.param_value(path)
    }

    /// Zeroes every match counter and tags selectors with the set being
    /// applied. Call once before applying to a whole population.
    pub fn sel_match_reset(&mut self, set_name: &str) {
        for sel in &mut self.0 {
            sel.n_match = 0;
            sel.set_name = set_name.to_string();
        }
    }

    /// Patterns of selectors that matched nothing since the last reset
    pub fn unmatched(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|s| s.n_match == 0)
            .map(|s| s.sel.clone())
            .collect()
    }

    /// Logs a warning listing every selector that matched nothing since the
    /// last [`sel_match_reset`](Sheet::sel_match_reset), and returns their
    /// patterns.
    pub fn sel_no_match_warn(&self, set_name: &str, obj_name: &str) -> Vec<String> {
        let unmatched = self.unmatched();
        if !unmatched.is_empty() {
            log::warn!(
                "Sheet from set: {} for object: {} had non-matching selectors: {}",
                set_name,
                obj_name,
                unmatched.join(", ")
            );
        }
        unmatched
    }

    /// Checks every selector names a single target type.
    pub fn validate(&self) -> Result<()> {
        let errors = self.0.iter().filter_map(|s| s.validate().err()).collect();
        ParamsError::from_errors(errors)
    }
}

fn sel_not_found(sel: &str) -> ParamsError {
    ParamsError::TargetNotFound {
        kind: "Sel",
        name: sel.to_string(),
    }
    .logged()
}

fn sheet_not_found(name: &str) -> ParamsError {
    ParamsError::TargetNotFound {
        kind: "Sheet",
        name: name.to_string(),
    }
    .logged()
}

impl From<Vec<Sel>> for Sheet {
    fn from(sels: Vec<Sel>) -> Self {
        Sheet(sels)
    }
}

impl<'a> IntoIterator for &'a Sheet {
    type Item = &'a Sel;
    type IntoIter = std::slice::Iter<'a, Sel>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sheets grouped by functional area, e.g. `Network` and `Sim`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheets(BTreeMap<String, Sheet>);

impl Sheets {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a sheet
    pub fn insert(&mut self, name: impl Into<String>, sheet: Sheet) {
        self.0.insert(name.into(), sheet);
    }

    /// Sheet by name, or a logged `TargetNotFound`.
    pub fn sheet_by_name(&self, name: &str) -> Result<&Sheet> {
        self.0.get(name).ok_or_else(|| sheet_not_found(name))
    }

    /// Mutable sheet by name, or a logged `TargetNotFound`.
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.0.get_mut(name).ok_or_else(|| sheet_not_found(name))
    }

    /// Sheets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Sheet)> {
        self.0.iter()
    }

    /// Number of sheets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no sheets
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Sheet); N]> for Sheets {
    fn from(entries: [(K, Sheet); N]) -> Self {
        Sheets(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One alternative configuration: a description plus its sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Set {
    /// What this configuration is for
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    /// Sheets by functional area
    #[serde(default)]
    pub sheets: Sheets,
}

impl Set {
    /// Creates a set
    pub fn new(desc: impl Into<String>, sheets: Sheets) -> Self {
        Set {
            desc: desc.into(),
            sheets,
        }
    }
}

/// Named alternative configurations, each a [`Set`] of sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sets(BTreeMap<String, Set>);

impl Sets {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a set
    pub fn insert(&mut self, name: impl Into<String>, set: Set) {
        self.0.insert(name.into(), set);
    }

    /// Set by name, or a logged `TargetNotFound`.
    pub fn set_by_name(&self, name: &str) -> Result<&Set> {
        self.0.get(name).ok_or_else(|| set_not_found(name))
    }

    /// Mutable set by name, or a logged `TargetNotFound`.
    pub fn set_by_name_mut(&mut self, name: &str) -> Result<&mut Set> {
        self.0.get_mut(name).ok_or_else(|| set_not_found(name))
    }

    /// Sheet within a set
    pub fn sheet_by_name(&self, set: &str, sheet: &str) -> Result<&Sheet> {
        self.set_by_name(set)?.sheets.sheet_by_name(sheet)
    }

    /// Mutable sheet within a set
    pub fn sheet_by_name_mut(&mut self, set: &str, sheet: &str) -> Result<&mut Sheet> {
        self.set_by_name_mut(set)?.sheets.sheet_by_name_mut(sheet)
    }

    /// Sets a float parameter in `set` / `sheet` / `sel`
    pub fn set_float(&mut self, set: &str, sheet: &str, sel: &str, path: &str, value: f64) -> Result<()> {
        self.sheet_by_name_mut(set, sheet)?.set_float(sel, path, value)
    }

    /// Sets a parameter from text in `set` / `sheet` / `sel`
    pub fn set_string(&mut self, set: &str, sheet: &str, sel: &str, path: &str, value: &str) -> Result<()> {
        self.sheet_by_name_mut(set, sheet)?.set_string(sel, path, value)
    }

    /// Value of a parameter in `set` / `sheet` / `sel`
    pub fn param_value(&self, set: &str, sheet: &str, sel: &str, path: &str) -> Result<&ParamValue> {
        self.sheet_by_name(set, sheet)?.param_value(sel, path)
    }

    /// Sets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Set)> {
        self.0.iter()
    }

    /// Number of sets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no sets
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn set_not_found(name: &str) -> ParamsError {
    ParamsError::TargetNotFound {
        kind: "Set",
        name: name.to_string(),
    }
    .logged()
}

impl<K: Into<String>, const N: usize> From<[(K, Set); N]> for Sets {
    fn from(entries: [(K, Set); N]) -> Self {
        Sets(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Named alternative configurations, each a single sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetSets(BTreeMap<String, Sheet>);

impl SheetSets {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a sheet
    pub fn insert(&mut self, name: impl Into<String>, sheet: Sheet) {
        self.0.insert(name.into(), sheet);
    }

    /// Sheet by name, or a logged `TargetNotFound`.
    pub fn sheet_by_name(&self, name: &str) -> Result<&Sheet> {
        self.0.get(name).ok_or_else(|| sheet_not_found(name))
    }

    /// Mutable sheet by name, or a logged `TargetNotFound`.
    pub fn sheet_by_name_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.0.get_mut(name).ok_or_else(|| sheet_not_found(name))
    }

    /// Sets a float parameter in `sheet` / `sel`
    pub fn set_float(&mut self, sheet: &str, sel: &str, path: &str, value: f64) -> Result<()> {
        self.sheet_by_name_mut(sheet)?.set_float(sel, path, value)
    }

    /// Sets a parameter from text in `sheet` / `sel`
    pub fn set_string(&mut self, sheet: &str, sel: &str, path: &str, value: &str) -> Result<()> {
        self.sheet_by_name_mut(sheet)?.set_string(sel, path, value)
    }

    /// Value of a parameter in `sheet` / `sel`
    pub fn param_value(&self, sheet: &str, sel: &str, path: &str) -> Result<&ParamValue> {
        self.sheet_by_name(sheet)?.param_value(sel, path)
    }

    /// Sheets in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Sheet)> {
        self.0.iter()
    }

    /// Number of sheets
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no sheets
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, const N: usize> From<[(K, Sheet); N]> for SheetSets {
    fn from(entries: [(K, Sheet); N]) -> Self {
        SheetSets(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_sheet() -> Sheet {
        Sheet::from(vec![
            Sel::new("Layer", "generic layer params").param("Layer.Inhib.Layer.Gi", "1.8"),
            Sel::new("#Output", "output inhibition").param("Layer.Inhib.Layer.Gi", "1.4"),
        ])
    }

    #[test]
    fn test_sheet_lookup_and_edit() {
        let mut sheet = base_sheet();
        sheet.set_float("#Output", "Layer.Inhib.Layer.Gi", 1.3).unwrap();
        assert_eq!(
            sheet.param_value("#Output", "Layer.Inhib.Layer.Gi").unwrap(),
            &ParamValue::from(1.3)
        );
        assert!(matches!(
            sheet.set_string("#Missing", "Layer.Act.Gain", "100"),
            Err(ParamsError::TargetNotFound { kind: "Sel", .. })
        ));
    }

    #[test]
    fn test_match_reset_and_warn() {
        let mut sheet = base_sheet();
        sheet.iter_mut().next().unwrap().n_match = 3;
        assert_eq!(sheet.unmatched(), vec!["#Output".to_string()]);
        sheet.sel_match_reset("Base");
        assert!(sheet.iter().all(|s| s.n_match == 0 && s.set_name == "Base"));
        assert_eq!(sheet.sel_no_match_warn("Base", "Network").len(), 2);
    }

    #[test]
    fn test_sheet_validate() {
        let mut sheet = base_sheet();
        assert!(sheet.validate().is_ok());
        sheet.push(Sel::new(".Back", "").param("Prjn.WtScale.Rel", "0.2").param("Layer.Act.Gain", "80"));
        assert!(sheet.validate().is_err());
    }

    #[test]
    fn test_nested_lookups() {
        let mut sets = Sets::from([(
            "Base",
            Set::new("defaults", Sheets::from([("Network", base_sheet())])),
        )]);
        sets.set_string("Base", "Network", "Layer", "Layer.Inhib.Layer.Gi", "2")
            .unwrap();
        assert_eq!(
            sets.param_value("Base", "Network", "Layer", "Layer.Inhib.Layer.Gi").unwrap(),
            &ParamValue::from(2)
        );
        assert!(sets.sheet_by_name("Base", "Sim").is_err());
        assert!(sets.set_by_name("NoMomentum").is_err());

        let mut sheet_sets = SheetSets::from([("Base", base_sheet())]);
        sheet_sets.set_float("Base", "Layer", "Layer.Inhib.Layer.Gi", 1.6).unwrap();
        assert_eq!(
            sheet_sets.param_value("Base", "Layer", "Layer.Inhib.Layer.Gi").unwrap(),
            &ParamValue::from(1.6)
        );
    }
}
