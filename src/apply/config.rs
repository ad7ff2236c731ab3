// src/apply/config.rs
// Settings for a configuration pass and the driver that runs one over a population.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use super::{Applied, ParamTarget};
use crate::sheet::{Sheet, SheetSets, BASE};
use crate::Result;

/// How a configuration pass behaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Log every parameter that is set
    pub set_msg: bool,
    /// Append matched selectors to each object's history
    pub record_history: bool,
    /// Warn about selectors that matched nothing in the pass
    pub warn_no_match: bool,
    /// Space-separated sheet names applied after `Base`
    pub extra_sheets: String,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        ApplyConfig {
            set_msg: false,
            record_history: true,
            warn_no_match: true,
            extra_sheets: String::new(),
        }
    }
}

impl ApplyConfig {
    /// Loads settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: ApplyConfig = serde_yaml::from_reader(file)?;
        Ok(config)
    }

    /// Saves settings to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    /// Sheet names to apply after `Base`, in order
    pub fn extra_sheet_names(&self) -> impl Iterator<Item = &str> {
        self.extra_sheets
            .split_whitespace()
            .filter(|name| *name != BASE)
    }
}

/// Runs configuration passes over a population of objects.
#[derive(Debug, Clone, Default)]
pub struct Applier {
    /// Pass settings
    pub config: ApplyConfig,
}

impl Applier {
    /// Creates an applier with the given settings
    pub fn new(config: ApplyConfig) -> Self {
        Applier { config }
    }

    /// Applies one sheet to every object in order.
    ///
    /// Match counters are reset first; selectors still at zero afterwards
    /// are reported in [`Applied::unmatched`] and, if configured, logged.
    pub fn apply_sheet(
        &self,
        sheet: &mut Sheet,
        set_name: &str,
        objs: &mut [&mut dyn ParamTarget],
    ) -> Applied {
        sheet.sel_match_reset(set_name);
        let mut outcome = Applied::default();
        for obj in objs.iter_mut() {
            outcome.merge(sheet.apply_with(&mut **obj, self.config.set_msg, self.config.record_history));
        }
        outcome.unmatched = if self.config.warn_no_match {
            sheet.sel_no_match_warn(set_name, "population")
        } else {
            sheet.unmatched()
        };
        outcome
    }

    /// Full pass: clears histories, applies `Base`, then each extra sheet.
    ///
    /// A missing `Base` or extra sheet is a `TargetNotFound` error; errors
    /// raised while applying are returned in the outcome.
    pub fn apply_all(&self, sheets: &mut SheetSets, objs: &mut [&mut dyn ParamTarget]) -> Result<Applied> {
        if self.config.record_history {
            for obj in objs.iter_mut() {
                if let Some(history) = obj.history() {
                    history.params_history_reset();
                }
            }
        }
        let mut outcome = self.apply_sheet(sheets.sheet_by_name_mut(BASE)?, BASE, objs);
        for name in self.config.extra_sheet_names() {
            let sheet = sheets.sheet_by_name_mut(name)?;
            outcome.merge(self.apply_sheet(sheet, name, objs));
        }
        Ok(outcome)
    }
}
