// src/fields/print.rs
// Indented text dump of a field graph, for logging current parameter values.

use super::{FieldRef, Fields};
use crate::params::ParamValue;

/// Filter deciding whether a leaf is printed, given its full dotted path
/// and current value.
pub type PrintFilter<'f> = &'f dyn Fn(&str, &ParamValue) -> bool;

/// Renders `obj` as indented `Name value` lines, two spaces per level.
///
/// Nested structs print as `Name {` ... `}` blocks and are skipped when the
/// filter leaves them empty. Names within a block are padded to a common
/// width.
pub fn print_struct(obj: &dyn Fields, indent: usize, filter: Option<PrintFilter<'_>>) -> String {
    print_level("", indent, obj, filter)
}

fn add_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

fn print_level(parent: &str, indent: usize, obj: &dyn Fields, filter: Option<PrintFilter<'_>>) -> String {
    let pad = "  ".repeat(indent);
    let mut rows: Vec<(&str, String)> = Vec::new();
    for &name in obj.field_names() {
        let Some(field) = obj.field(name) else {
            continue;
        };
        let path = add_path(parent, name);
        match field {
            FieldRef::Struct(inner) => {
                let body = print_level(&path, indent + 1, inner, filter);
                if !body.is_empty() {
                    rows.push((name, format!("{{\n{}{}}}", body, pad)));
                }
            }
            FieldRef::Leaf(leaf) => {
                let value = leaf.value();
                if filter.is_none_or(|keep| keep(path.as_str(), &value)) {
                    rows.push((name, value.to_string()));
                }
            }
        }
    }
    let width = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (name, text) in rows {
        out.push_str(&format!("{}{:<width$} {}\n", pad, name, text, width = width));
    }
    out
}
