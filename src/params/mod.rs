//! Parameter maps and selectors
//!
//! A [`Params`] map assigns values to dotted paths such as
//! `Layer.Inhib.Layer.Gi`. The first segment of every path is the target
//! type the map applies to. A [`Sel`] pairs a map with the CSS-style selector
//! deciding which objects receive it.
pub mod hypers;
pub mod value;

pub use hypers::{HyperValues, Hypers};
pub use value::ParamValue;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ParamsError, Result};

/// Returns the first segment of a path: `Layer.Acts.Kir.Gbar` -> `Layer`
pub fn target_type_of(path: &str) -> &str {
    path.split('.').next().unwrap_or("")
}

/// Returns the portion of a path after the target type:
/// `Layer.Acts.Kir.Gbar` -> `Acts.Kir.Gbar`
pub fn path_after_type(path: &str) -> &str {
    path.split_once('.').map(|(_, rest)| rest).unwrap_or("")
}

/// Path → value map for one selector.
///
/// All paths in one map must share the same first segment, because only
/// one of them is used to check the target type of an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value at `path`, or a logged `TargetNotFound`.
    pub fn param_by_name(&self, path: &str) -> Result<&ParamValue> {
        self.0.get(path).ok_or_else(|| {
            ParamsError::TargetNotFound {
                kind: "Parameter",
                name: path.to_string(),
            }
            .logged()
        })
    }

    /// Sets `path` to `value`
    pub fn set_by_name(&mut self, path: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(path.into(), value.into());
    }

    /// Returns the value at `path`
    pub fn get(&self, path: &str) -> Option<&ParamValue> {
        self.0.get(path)
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Target type of this map, taken from its first path.
    pub fn target_type(&self) -> Option<&str> {
        self.0.keys().next().map(|p| target_type_of(p))
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A selector plus the parameters it applies.
///
/// `sel` uses CSS syntax: `.Back` targets objects with class tag `Back`,
/// `#Output` the object named `Output`, and a bare `Layer` anything of type
/// `Layer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sel {
    /// Selector pattern
    pub sel: String,
    /// What these values do and what range was explored
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    /// Values applied to whatever matches
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    /// Search metadata for the same paths
    #[serde(default, skip_serializing_if = "Hypers::is_empty")]
    pub hypers: Hypers,
    /// Matches during the last apply pass
    #[serde(skip)]
    pub n_match: usize,
    /// Name of the set being applied
    #[serde(skip)]
    pub set_name: String,
}

impl Sel {
    /// Creates a selector with a description and no parameters
    pub fn new(sel: impl Into<String>, desc: impl Into<String>) -> Self {
        Sel {
            sel: sel.into(),
            desc: desc.into(),
            ..Default::default()
        }
    }

    /// Adds one parameter
    pub fn param(mut self, path: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.set_by_name(path, value);
        self
    }

    /// Adds hyperparameter metadata for one path
    pub fn hyper(mut self, path: impl Into<String>, values: HyperValues) -> Self {
        self.hypers.set_by_name(path, values);
        self
    }

    /// Replaces the parameter map
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Replaces the hyperparameter map
    pub fn with_hypers(mut self, hypers: Hypers) -> Self {
        self.hypers = hypers;
        self
    }

    /// Sets a float parameter
    pub fn set_float(&mut self, path: &str, value: f64) {
        self.params.set_by_name(path, value);
    }

    /// Sets a parameter from text
    pub fn set_string(&mut self, path: &str, value: &str) {
        self.params.set_by_name(path, value);
    }

    /// Returns the value of a parameter
    pub fn param_value(&self, path: &str) -> Result<&ParamValue> {
        self.params.param_by_name(path)
    }

    /// Target type, from the parameter paths or else the hyper paths
    pub fn target_type(&self) -> Option<&str> {
        self.params.target_type().or_else(|| self.hypers.target_type())
    }

    /// Checks that every path of this selector names the same target type.
    pub fn validate(&self) -> Result<()> {
        let mut paths = self
            .params
            .iter()
            .map(|(p, _)| p)
            .chain(self.hypers.iter().map(|(p, _)| p));
        let Some(first) = paths.next().map(|p| target_type_of(p)) else {
            return Ok(());
        };
        for path in paths {
            let other = target_type_of(path);
            if other != first {
                return Err(ParamsError::MixedTargetTypes {
                    sel: self.sel.clone(),
                    first: first.to_string(),
                    other: other.to_string(),
                }
                .logged());
            }
        }
        Ok(())
    }

    /// The value this selector assigns to `path`, from its parameters or a
    /// `Val` entry in its hypers.
    pub fn assigned_value(&self, path: &str) -> Option<ParamValue> {
        if let Some(v) = self.params.get(path) {
            return Some(v.clone());
        }
        self.hypers
            .get(path)
            .and_then(|hv| hv.get(hypers::VAL))
            .map(ParamValue::parse)
    }
}

// match bookkeeping is runtime-only and not part of a selector's identity
impl PartialEq for Sel {
    fn eq(&self, other: &Self) -> bool {
        self.sel == other.sel
            && self.desc == other.desc
            && self.params == other.params
            && self.hypers == other.hypers
    }
}
