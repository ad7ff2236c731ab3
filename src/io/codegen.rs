// src/io/codegen.rs
// Rust source generation: rebuilds a collection with the crate's builder API.

use crate::params::{HyperValues, Hypers, Params, Sel};
use crate::sheet::{Set, Sets, Sheet, SheetSets, Sheets};

/// Emits a Rust expression that rebuilds the value.
///
/// Map entries come out in key order so the output is stable. `depth` is
/// the indentation level (four spaces each) of the line the expression
/// starts on.
pub trait WriteCode {
    /// Rust expression for this value
    fn write_code(&self, depth: usize) -> String;
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn lit(text: &str) -> String {
    format!("{:?}", text)
}

/// Joins `(key, expr)` entries into a `Type::from([...])` block, or
/// `Type::new()` when empty.
fn map_block<'a>(ty: &str, depth: usize, entries: impl Iterator<Item = (&'a str, String)>) -> String {
    let pad = indent(depth + 1);
    let body: String = entries
        .map(|(key, expr)| format!("{}({}, {}),\n", pad, lit(key), expr))
        .collect();
    if body.is_empty() {
        format!("{}::new()", ty)
    } else {
        format!("{}::from([\n{}{}])", ty, body, indent(depth))
    }
}

impl WriteCode for Params {
    fn write_code(&self, _depth: usize) -> String {
        if self.is_empty() {
            return "Params::new()".to_string();
        }
        let entries: Vec<String> = self
            .iter()
            .map(|(path, value)| format!("({}, {})", lit(path), lit(&value.to_string())))
            .collect();
        format!("Params::from([{}])", entries.join(", "))
    }
}

impl WriteCode for HyperValues {
    fn write_code(&self, _depth: usize) -> String {
        if self.is_empty() {
            return "HyperValues::new()".to_string();
        }
        let entries: Vec<String> = self
            .iter()
            .map(|(k, v)| format!("({}, {})", lit(k), lit(v)))
            .collect();
        format!("HyperValues::from([{}])", entries.join(", "))
    }
}

impl WriteCode for Hypers {
    fn write_code(&self, depth: usize) -> String {
        map_block(
            "Hypers",
            depth,
            self.iter().map(|(path, hv)| (path.as_str(), hv.write_code(depth + 1))),
        )
    }
}

impl WriteCode for Sel {
    fn write_code(&self, depth: usize) -> String {
        let pad = indent(depth + 1);
        let mut out = format!("Sel::new({}, {})", lit(&self.sel), lit(&self.desc));
        for (path, value) in self.params.iter() {
            out.push_str(&format!("\n{}.param({}, {})", pad, lit(path), lit(&value.to_string())));
        }
        for (path, hv) in self.hypers.iter() {
            out.push_str(&format!("\n{}.hyper({}, {})", pad, lit(path), hv.write_code(depth + 1)));
        }
        out
    }
}

impl WriteCode for Sheet {
    fn write_code(&self, depth: usize) -> String {
        if self.is_empty() {
            return "Sheet::new()".to_string();
        }
        let pad = indent(depth + 1);
        let body: String = self
            .iter()
            .map(|sel| format!("{}{},\n", pad, sel.write_code(depth + 1)))
            .collect();
        format!("Sheet::from(vec![\n{}{}])", body, indent(depth))
    }
}

impl WriteCode for Sheets {
    fn write_code(&self, depth: usize) -> String {
        map_block(
            "Sheets",
            depth,
            self.iter().map(|(name, sheet)| (name.as_str(), sheet.write_code(depth + 1))),
        )
    }
}

impl WriteCode for Set {
    fn write_code(&self, depth: usize) -> String {
        format!("Set::new({}, {})", lit(&self.desc), self.sheets.write_code(depth))
    }
}

impl WriteCode for Sets {
    fn write_code(&self, depth: usize) -> String {
        map_block(
            "Sets",
            depth,
            self.iter().map(|(name, set)| (name.as_str(), set.write_code(depth + 1))),
        )
    }
}

impl WriteCode for SheetSets {
    fn write_code(&self, depth: usize) -> String {
        map_block(
            "SheetSets",
            depth,
            self.iter().map(|(name, sheet)| (name.as_str(), sheet.write_code(depth + 1))),
        )
    }
}
