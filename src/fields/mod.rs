//! Path-addressable fields
//!
//! Target objects expose their parameters through the [`Fields`] trait: a
//! list of member names plus by-name access to each member, which is either
//! a nested [`Fields`] value or a settable [`Leaf`]. The [`impl_fields!`],
//! [`param_enum!`] and [`param_flags!`] macros generate these accessors, so
//! dotted paths resolve without any runtime type information.
//!
//! [`impl_fields!`]: crate::impl_fields
//! [`param_enum!`]: crate::param_enum
//! [`param_flags!`]: crate::param_flags
pub mod leaf;
pub mod macros;
pub mod print;

pub use print::print_struct;

use crate::params::ParamValue;
use crate::{ParamsError, Result};

/// Kind of a settable leaf field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// `bool`
    Bool,
    /// Any integer width
    Int,
    /// `f32` / `f64`
    Float,
    /// `String`
    Text,
    /// Named enumerant or flag combination
    Enum,
}

/// A primitive field that can be read and written as a [`ParamValue`].
pub trait Leaf {
    /// Kind of this leaf
    fn kind(&self) -> LeafKind;

    /// Current value
    fn value(&self) -> ParamValue;

    /// Coerces `value` into this leaf. The error string says why it was rejected.
    fn set_value(&mut self, value: &ParamValue) -> std::result::Result<(), String>;
}

/// A struct whose members can be looked up by name.
pub trait Fields {
    /// Names of the addressable members, in declaration order
    fn field_names(&self) -> &'static [&'static str];

    /// Member by name
    fn field(&self, name: &str) -> Option<FieldRef<'_>>;

    /// Mutable member by name
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// Shared handle on a member
pub enum FieldRef<'a> {
    /// Nested composite
    Struct(&'a dyn Fields),
    /// Primitive value
    Leaf(&'a dyn Leaf),
}

/// Mutable handle on a member
pub enum FieldMut<'a> {
    /// Nested composite
    Struct(&'a mut dyn Fields),
    /// Primitive value
    Leaf(&'a mut dyn Leaf),
}

/// Converts a member into a field handle; implemented by the macros for
/// structs and leaves alike.
pub trait Field {
    /// Shared handle
    fn as_field(&self) -> FieldRef<'_>;

    /// Mutable handle
    fn as_field_mut(&mut self) -> FieldMut<'_>;
}

fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

fn not_found(path: &str, segment: &str) -> ParamsError {
    ParamsError::PathNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
    .logged()
}

/// Resolves a dotted path (relative to `root`) to a member.
pub fn find_field<'a>(root: &'a dyn Fields, path: &str) -> Result<FieldRef<'a>> {
    find_field_from(root, path, path)
}

fn find_field_from<'a>(root: &'a dyn Fields, rest: &str, full: &str) -> Result<FieldRef<'a>> {
    let (head, tail) = split_path(rest);
    let field = root.field(head).ok_or_else(|| not_found(full, head))?;
    match (field, tail) {
        (field, None) => Ok(field),
        (FieldRef::Struct(inner), Some(tail)) => find_field_from(inner, tail, full),
        (FieldRef::Leaf(_), Some(tail)) => Err(not_found(full, split_path(tail).0)),
    }
}

/// Resolves a dotted path (relative to `root`) to a mutable member.
pub fn find_field_mut<'a>(root: &'a mut dyn Fields, path: &str) -> Result<FieldMut<'a>> {
    find_field_mut_from(root, path, path)
}

fn find_field_mut_from<'a>(
    root: &'a mut dyn Fields,
    rest: &str,
    full: &str,
) -> Result<FieldMut<'a>> {
    let (head, tail) = split_path(rest);
    let field = root.field_mut(head).ok_or_else(|| not_found(full, head))?;
    match (field, tail) {
        (field, None) => Ok(field),
        (FieldMut::Struct(inner), Some(tail)) => find_field_mut_from(inner, tail, full),
        (FieldMut::Leaf(_), Some(tail)) => Err(not_found(full, split_path(tail).0)),
    }
}

/// Coerces `value` into the resolved member.
///
/// Fails with `Coercion` if the member is a composite or rejects the value.
pub fn set_field(field: FieldMut<'_>, path: &str, value: &ParamValue) -> Result<()> {
    let coercion = |reason: String| {
        ParamsError::Coercion {
            path: path.to_string(),
            value: value.to_string(),
            reason,
        }
        .logged()
    };
    match field {
        FieldMut::Struct(_) => Err(coercion(
            "field is a composite, only primitive fields can be set".to_string(),
        )),
        FieldMut::Leaf(leaf) => leaf.set_value(value).map_err(coercion),
    }
}

/// Sets the member at `path` on `obj` to `value`.
pub fn set_param(obj: &mut dyn Fields, path: &str, value: &ParamValue) -> Result<()> {
    let field = find_field_mut(obj, path)?;
    set_field(field, path, value)
}

/// Reads the member at `path` as a number; bools read as 0 / 1.
pub fn get_param(obj: &dyn Fields, path: &str) -> Result<f64> {
    let not_numeric = |what: String| {
        ParamsError::Coercion {
            path: path.to_string(),
            value: what,
            reason: "field is not numeric".to_string(),
        }
        .logged()
    };
    match find_field(obj, path)? {
        FieldRef::Struct(_) => Err(not_numeric("<struct>".to_string())),
        FieldRef::Leaf(leaf) => match leaf.value() {
            ParamValue::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            v => v.as_f64().ok_or_else(|| not_numeric(v.to_string())),
        },
    }
}
