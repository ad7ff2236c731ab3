//! Paramstyle - parameter styling for neural network simulations
//!
//! This library provides a CSS-like cascading override system for simulation
//! parameters: defaults declared by type, narrowed by `.class` tags and
//! overridden by `#name`. Sheets of selectors are applied to live object
//! graphs through dotted field paths, compared against each other to find
//! conflicting overrides, and turned into hyperparameter search grids.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod apply;
pub mod fields;
pub mod io;
pub mod params;
pub mod search;
pub mod sheet;
pub mod styler;

// Re-export commonly used items for easier access
pub use apply::{Applied, ApplyConfig, ApplyTarget, Applier, History, HistoryLog, ParamTarget};
pub use fields::{Field, FieldMut, FieldRef, Fields, Leaf, LeafKind};
pub use params::{HyperValues, Hypers, ParamValue, Params, Sel};
pub use search::{Flex, FlexValue, SearchValues, TweakPolicy, Tweaks, tweak, tweaks_from_hypers};
pub use sheet::{Conflict, DiffReport, Set, Sets, Sheet, SheetSets, Sheets};
pub use styler::Styler;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ParamsError>;

/// Paramstyle error types
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    /// A path segment does not resolve on the target shape
    #[error("path `{path}` not found: no field named `{segment}`")]
    PathNotFound {
        /// Full dotted path being resolved
        path: String,
        /// Segment that failed to resolve
        segment: String,
    },
    /// A value does not parse into the leaf's kind, or the leaf is not settable
    #[error("cannot set `{path}` to `{value}`: {reason}")]
    Coercion {
        /// Path of the field being set
        path: String,
        /// Offending value, as text
        value: String,
        /// Why the value was rejected
        reason: String,
    },
    /// A lookup by sheet, selector, set or object name failed
    #[error("{kind} named `{name}` not found")]
    TargetNotFound {
        /// What was being looked up (e.g. "Sheet", "Sel")
        kind: &'static str,
        /// Name that was asked for
        name: String,
    },
    /// Parameter paths within one selector name different target types
    #[error("selector `{sel}` mixes target types `{first}` and `{other}`")]
    MixedTargetTypes {
        /// Selector pattern
        sel: String,
        /// Target type of the first path
        first: String,
        /// Conflicting target type
        other: String,
    },
    /// A `Selector:Path` map key could not be split
    #[error("map key `{0}` must be a colon-separated Selector:Path")]
    InvalidMapKey(String),
    /// Several errors collected during one batch operation
    #[error("{} errors: {}", .0.len(), join_errors(.0))]
    Multiple(Vec<ParamsError>),
    /// File system error
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON encode/decode error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// YAML encode/decode error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    /// TOML decode error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
    /// TOML encode error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl ParamsError {
    /// Logs the error at the point where it is raised and hands it back.
    pub(crate) fn logged(self) -> Self {
        log::error!("{}", self);
        self
    }

    /// Replaces the path carried by a path or coercion error, e.g. with the
    /// full path including its target type.
    pub(crate) fn with_path(self, full: &str) -> Self {
        match self {
            ParamsError::PathNotFound { segment, .. } => ParamsError::PathNotFound {
                path: full.to_string(),
                segment,
            },
            ParamsError::Coercion { value, reason, .. } => ParamsError::Coercion {
                path: full.to_string(),
                value,
                reason,
            },
            other => other,
        }
    }

    /// Collapses a list of errors: none is `Ok`, one is itself, more is `Multiple`.
    pub fn from_errors(mut errors: Vec<ParamsError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ParamsError::Multiple(errors)),
        }
    }
}

fn join_errors(errors: &[ParamsError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
