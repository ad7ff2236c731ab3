// src/apply/map.rs
// Direct path -> value application, and "Selector:Path" maps turned into sheets.

use std::collections::BTreeMap;

use crate::fields::{self, Fields};
use crate::params::{ParamValue, Sel};
use crate::sheet::Sheet;
use crate::{ParamsError, Result};

/// Set name given to selectors built by [`map_to_sheet`]
pub const APPLY_MAP: &str = "ApplyMap";

/// Applies path -> value pairs straight to a field graph.
///
/// Paths are relative to `obj` (no target-type segment). Every pair is
/// attempted; all failures are returned together.
pub fn apply_map(obj: &mut dyn Fields, vals: &BTreeMap<String, ParamValue>, set_msg: bool) -> Result<()> {
    let mut errors = Vec::new();
    for (path, value) in vals {
        match fields::set_param(obj, path, value) {
            Ok(()) if set_msg => log::info!("ApplyMap: set field: {} = {}", path, value),
            Ok(()) => {}
            Err(e) => errors.push(e),
        }
    }
    ParamsError::from_errors(errors)
}

/// Builds a sheet from `Selector:Path` keys, one selector per key.
///
/// Keys that do not split into exactly two parts are skipped and reported.
pub fn map_to_sheet(vals: &BTreeMap<String, ParamValue>) -> Result<Sheet> {
    let mut sheet = Sheet::new();
    let mut errors = Vec::new();
    for (key, value) in vals {
        let parts: Vec<&str> = key.split(':').collect();
        let [sel, path] = parts.as_slice() else {
            errors.push(ParamsError::InvalidMapKey(key.clone()).logged());
            continue;
        };
        let mut sel = Sel::new(*sel, "").param(*path, value.clone());
        sel.set_name = APPLY_MAP.to_string();
        sheet.push(sel);
    }
    ParamsError::from_errors(errors).map(|_| sheet)
}
