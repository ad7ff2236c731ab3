// src/io/file.rs
// A configuration file holding either nested sets or flat sheet sets.

use std::path::Path;

use super::{Format, Persist, WriteCode};
use crate::sheet::{DiffReport, Sets, SheetSets};
use crate::{ParamsError, Result};

/// Either shape of configuration file
#[derive(Debug, Clone, PartialEq)]
pub enum SetsFile {
    /// Named sets of named sheets
    Sets(Sets),
    /// Named sheets
    SheetSets(SheetSets),
}

impl SetsFile {
    /// Decodes whichever shape the text holds. When neither parses, both
    /// errors are returned.
    pub fn from_format_str(text: &str, format: Format) -> Result<Self> {
        // a Sets document never parses as sheets, so try the narrower shape first
        let sheets_err = match SheetSets::from_format_str(text, format) {
            Ok(sheets) => return Ok(SetsFile::SheetSets(sheets)),
            Err(e) => e,
        };
        log::debug!("not a sheet sets document ({}), reading as sets", sheets_err);
        match Sets::from_format_str(text, format) {
            Ok(sets) => Ok(SetsFile::Sets(sets)),
            Err(sets_err) => Err(ParamsError::Multiple(vec![sheets_err, sets_err]).logged()),
        }
    }

    /// Reads a file, choosing the format by extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|e| {
            log::error!("cannot read {}: {}", path.display(), e);
            ParamsError::from(e)
        })?;
        Self::from_format_str(&text, format)
    }

    /// Conflicts between every pair of sets
    pub fn diffs_all(&self) -> DiffReport {
        match self {
            SetsFile::Sets(s) => s.diffs_all(),
            SetsFile::SheetSets(s) => s.diffs_all(),
        }
    }

    /// Conflicts between `Base` and each other set
    pub fn diffs_first(&self) -> Result<DiffReport> {
        match self {
            SetsFile::Sets(s) => s.diffs_first(),
            SetsFile::SheetSets(s) => s.diffs_first(),
        }
    }

    /// Conflicts within one set
    pub fn diffs_within(&self, name: &str) -> Result<DiffReport> {
        match self {
            SetsFile::Sets(s) => s.diffs_within(name),
            SetsFile::SheetSets(s) => s.diffs_within(name),
        }
    }

    /// Checks that every selector addresses a single target type
    pub fn validate(&self) -> Result<()> {
        match self {
            SetsFile::Sets(s) => {
                for (_, set) in s.iter() {
                    for (_, sheet) in set.sheets.iter() {
                        sheet.validate()?;
                    }
                }
            }
            SetsFile::SheetSets(s) => {
                for (_, sheet) in s.iter() {
                    sheet.validate()?;
                }
            }
        }
        Ok(())
    }

    /// Writes the file, choosing the format by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        match self {
            SetsFile::Sets(s) => s.save(path),
            SetsFile::SheetSets(s) => s.save(path),
        }
    }

    /// Rust code that rebuilds the file's contents
    pub fn write_code(&self) -> String {
        match self {
            SetsFile::Sets(s) => s.write_code(0),
            SetsFile::SheetSets(s) => s.write_code(0),
        }
    }
}
