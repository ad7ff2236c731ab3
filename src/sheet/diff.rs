// src/sheet/diff.rs
// Finds paths set to different values across selectors, sheets and sets.

use std::fmt;

use super::{Set, Sets, Sheet, SheetSets, Sheets, BASE};
use crate::params::{ParamValue, Params};
use crate::Result;

/// One path assigned different values by two sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Parameter path
    pub path: String,
    /// Label of the first source, e.g. `Base:#Output`
    pub left_label: String,
    /// Value from the first source
    pub left: ParamValue,
    /// Label of the second source
    pub right_label: String,
    /// Value from the second source
    pub right: ParamValue,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}={} | {}={}",
            self.path, self.left_label, self.left, self.right_label, self.right
        )
    }
}

/// Collected conflicts, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    /// Every conflict found
    pub conflicts: Vec<Conflict>,
}

impl DiffReport {
    /// True if nothing conflicts
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Number of conflicts
    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// Conflicting paths, sorted and deduplicated
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.conflicts.iter().map(|c| c.path.as_str()).collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }

    fn extend(&mut self, conflicts: Vec<Conflict>) {
        self.conflicts.extend(conflicts);
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.conflicts {
            writeln!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl Params {
    /// Paths present in both maps with different values.
    pub fn diffs(&self, other: &Params, label: &str, other_label: &str) -> Vec<Conflict> {
        self.iter()
            .filter_map(|(path, value)| {
                let ov = other.get(path)?;
                (ov != value).then(|| Conflict {
                    path: path.clone(),
                    left_label: label.to_string(),
                    left: value.clone(),
                    right_label: other_label.to_string(),
                    right: ov.clone(),
                })
            })
            .collect()
    }
}

impl Sheet {
    /// Conflicts between every selector here and every selector in `other`.
    pub fn diffs(&self, other: &Sheet, name: &str, other_name: &str) -> Vec<Conflict> {
        let mut out = Vec::new();
        for sel in self {
            for osel in other {
                out.extend(sel.params.diffs(
                    &osel.params,
                    &format!("{}:{}", name, sel.sel),
                    &format!("{}:{}", other_name, osel.sel),
                ));
            }
        }
        out
    }

    /// Conflicts between selectors of this one sheet: an earlier selector
    /// overridden by a later one.
    pub fn diffs_within(&self, name: &str) -> Vec<Conflict> {
        let sels: Vec<_> = self.iter().collect();
        let mut out = Vec::new();
        for (i, sel) in sels.iter().enumerate() {
            for osel in &sels[i + 1..] {
                out.extend(sel.params.diffs(
                    &osel.params,
                    &format!("{}:{}", name, sel.sel),
                    &format!("{}:{}", name, osel.sel),
                ));
            }
        }
        out
    }
}

impl Sheets {
    /// Conflicts inside each sheet, then between each pair of sheets.
    pub fn diffs_within(&self) -> DiffReport {
        let mut report = DiffReport::default();
        for (name, sheet) in self.iter() {
            report.extend(sheet.diffs_within(name));
        }
        let sheets: Vec<_> = self.iter().collect();
        for (i, (name, sheet)) in sheets.iter().enumerate() {
            for (oname, osheet) in &sheets[i + 1..] {
                report.extend(sheet.diffs(osheet, name, oname));
            }
        }
        report
    }
}

impl Set {
    /// Conflicts between every sheet of this set and every sheet of `other`,
    /// labelled `set.sheet`.
    pub fn diffs(&self, name: &str, other: &Set, other_name: &str) -> Vec<Conflict> {
        let mut out = Vec::new();
        for (sname, sheet) in self.sheets.iter() {
            for (osname, osheet) in other.sheets.iter() {
                out.extend(sheet.diffs(
                    osheet,
                    &format!("{}.{}", name, sname),
                    &format!("{}.{}", other_name, osname),
                ));
            }
        }
        out
    }

    /// Conflicts among the sheets of this set
    pub fn diffs_within(&self) -> DiffReport {
        self.sheets.diffs_within()
    }
}

impl Sets {
    /// Conflicts between every pair of sets.
    pub fn diffs_all(&self) -> DiffReport {
        let sets: Vec<_> = self.iter().collect();
        let mut report = DiffReport::default();
        for (i, (name, set)) in sets.iter().enumerate() {
            for (oname, oset) in &sets[i + 1..] {
                report.extend(set.diffs(name, oset, oname));
            }
        }
        report
    }

    /// Conflicts between the `Base` set and each other set.
    pub fn diffs_first(&self) -> Result<DiffReport> {
        let base = self.set_by_name(BASE)?;
        let mut report = DiffReport::default();
        for (name, set) in self.iter().filter(|(name, _)| name.as_str() != BASE) {
            report.extend(base.diffs(BASE, set, name));
        }
        Ok(report)
    }

    /// Conflicts among the sheets of the named set.
    pub fn diffs_within(&self, set_name: &str) -> Result<DiffReport> {
        Ok(self.set_by_name(set_name)?.diffs_within())
    }
}

impl SheetSets {
    /// Conflicts between every pair of sheets.
    pub fn diffs_all(&self) -> DiffReport {
        let sheets: Vec<_> = self.iter().collect();
        let mut report = DiffReport::default();
        for (i, (name, sheet)) in sheets.iter().enumerate() {
            for (oname, osheet) in &sheets[i + 1..] {
                report.extend(sheet.diffs(osheet, name, oname));
            }
        }
        report
    }

    /// Conflicts between the `Base` sheet and each other sheet.
    pub fn diffs_first(&self) -> Result<DiffReport> {
        let base = self.sheet_by_name(BASE)?;
        let mut report = DiffReport::default();
        for (name, sheet) in self.iter().filter(|(name, _)| name.as_str() != BASE) {
            report.extend(base.diffs(sheet, BASE, name));
        }
        Ok(report)
    }

    /// Conflicts between selectors of the named sheet.
    pub fn diffs_within(&self, name: &str) -> Result<DiffReport> {
        Ok(DiffReport {
            conflicts: self.sheet_by_name(name)?.diffs_within(name),
        })
    }
}
