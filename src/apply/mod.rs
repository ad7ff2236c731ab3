//! Applying parameters to live objects
//!
//! This module gates selectors on target type, matches them against styled
//! objects and writes their values through dotted field paths. Failures are
//! collected rather than aborting, so one mistyped path never blocks the
//! unrelated valid ones in the same sheet.
pub mod config;
pub mod history;
pub mod map;

pub use config::{Applier, ApplyConfig};
pub use history::{History, HistoryLog};
pub use map::{apply_map, map_to_sheet};

use crate::fields::{self, Fields};
use crate::params::{hypers, path_after_type, Hypers, ParamValue, Params, Sel};
use crate::sheet::Sheet;
use crate::styler::{self, Styler};
use crate::{ParamsError, Result};

/// Where a target receives parameter values
pub enum ApplyTarget<'a> {
    /// A field graph, written through dotted paths
    Fields(&'a mut dyn Fields),
    /// A hyperparameter map; values land in each path's `Val` entry
    Hypers(&'a mut Hypers),
}

/// An object sheets can be applied to.
///
/// Only [`apply_target`](ParamTarget::apply_target) is required. Objects
/// without a [`Styler`] match every selector of their target type.
pub trait ParamTarget {
    /// Declared target type, compared with the first path segment of a
    /// selector's parameters (e.g. `Layer`). Defaults to the type name.
    fn style_type(&self) -> &str {
        self.type_name()
    }

    /// Implementation type name, without module path or generics
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// Class and name accessors, if this object has them
    fn styler(&self) -> Option<&dyn Styler> {
        None
    }

    /// The representation parameter values are written into
    fn apply_target(&mut self) -> ApplyTarget<'_>;

    /// Receiver for applied-selector notifications, if this object keeps one
    fn history(&mut self) -> Option<&mut dyn History> {
        None
    }

    /// Label for log messages
    fn label(&self) -> String {
        match self.styler() {
            Some(s) if !s.style_name().is_empty() => s.style_name().to_string(),
            _ => self.style_type().to_string(),
        }
    }
}

/// `crate::net::Layer<f32>` -> `Layer`
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Implements [`ParamTarget`] for an unstyled struct that already has
/// [`Fields`](crate::fields::Fields), optionally declaring its target type.
///
/// ```
/// use paramstyle::{impl_fields, impl_target};
///
/// #[derive(Default)]
/// struct SimConfig {
///     max_epcs: usize,
/// }
/// impl_fields!(SimConfig { max_epcs as "MaxEpcs" });
/// impl_target!(SimConfig as "Sim");
/// ```
#[macro_export]
macro_rules! impl_target {
    ($ty:ty) => {
        impl $crate::apply::ParamTarget for $ty {
            fn apply_target(&mut self) -> $crate::apply::ApplyTarget<'_> {
                $crate::apply::ApplyTarget::Fields(self)
            }
        }
    };
    ($ty:ty as $style:literal) => {
        impl $crate::apply::ParamTarget for $ty {
            fn style_type(&self) -> &str {
                $style
            }

            fn apply_target(&mut self) -> $crate::apply::ApplyTarget<'_> {
                $crate::apply::ApplyTarget::Fields(self)
            }
        }
    };
}

/// Outcome of a best-effort apply.
#[derive(Debug, Default)]
pub struct Applied {
    /// True if any selector matched
    pub matched: bool,
    /// Every error met along the way, in order
    pub errors: Vec<ParamsError>,
    /// Selectors that matched nothing during a population pass
    pub unmatched: Vec<String>,
}

impl Applied {
    /// True if no errors were collected
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Folds another outcome into this one
    pub fn merge(&mut self, other: Applied) {
        self.matched |= other.matched;
        self.errors.extend(other.errors);
        self.unmatched.extend(other.unmatched);
    }

    /// `Ok(matched)` when error-free, otherwise the collected errors.
    pub fn into_result(self) -> Result<bool> {
        ParamsError::from_errors(self.errors).map(|_| self.matched)
    }
}

impl Params {
    /// Applies every value to `target`.
    ///
    /// For a field graph, each path minus its type segment is set on the
    /// object. For a hypers map, the value is stored under the full path's
    /// `Val` entry. If `set_msg` is set, each successful set is logged.
    pub fn apply(&self, target: ApplyTarget<'_>, label: &str, set_msg: bool) -> Vec<ParamsError> {
        let mut errors = Vec::new();
        match target {
            ApplyTarget::Hypers(hv) => {
                for (path, value) in self.iter() {
                    hv.entry(path).insert(hypers::VAL, value.to_string());
                }
            }
            ApplyTarget::Fields(obj) => {
                for (path, value) in self.iter() {
                    match fields::set_param(obj, path_after_type(path), value) {
                        Ok(()) if set_msg => {
                            log::info!("{} set param path: {} to value: {}", label, path, value)
                        }
                        Ok(()) => {}
                        Err(e) => errors.push(e.with_path(path)),
                    }
                }
            }
        }
        errors
    }
}

impl Hypers {
    /// Applies this metadata to `target`.
    ///
    /// A hypers target gets every record merged in. A field graph gets the
    /// `Val` entry of each record, where present.
    pub fn apply(&self, target: ApplyTarget<'_>, label: &str, set_msg: bool) -> Vec<ParamsError> {
        let mut errors = Vec::new();
        match target {
            ApplyTarget::Hypers(hv) => hv.copy_from(self),
            ApplyTarget::Fields(obj) => {
                for (path, record) in self.iter() {
                    let Some(val) = record.get(hypers::VAL) else {
                        continue;
                    };
                    let value = ParamValue::parse(val);
                    match fields::set_param(obj, path_after_type(path), &value) {
                        Ok(()) if set_msg => {
                            log::info!("{} set hypers path: {} to value: {}", label, path, value)
                        }
                        Ok(()) => {}
                        Err(e) => errors.push(e.with_path(path)),
                    }
                }
            }
        }
        errors
    }
}

impl Sel {
    /// True if this selector's target type is the object's declared type or
    /// its implementation type.
    pub fn target_type_match(&self, obj: &dyn ParamTarget) -> bool {
        let types = [self.params.target_type(), self.hypers.target_type()];
        types
            .into_iter()
            .flatten()
            .any(|t| t == obj.style_type() || t == obj.type_name())
    }

    /// True if the selector pattern matches the object.
    pub fn sel_match(&self, obj: &dyn ParamTarget) -> bool {
        styler::styler_matches(&self.sel, obj.styler(), obj.style_type(), obj.type_name())
    }

    /// Applies this selector's parameters and hypers to `obj` if it matches.
    ///
    /// The target type is checked first; a selector for another type is
    /// skipped whatever its pattern.
    pub fn apply(&self, obj: &mut dyn ParamTarget, set_msg: bool) -> Applied {
        if !self.target_type_match(obj) || !self.sel_match(obj) {
            return Applied::default();
        }
        let label = obj.label();
        let mut errors = self.params.apply(obj.apply_target(), &label, set_msg);
        errors.extend(self.hypers.apply(obj.apply_target(), &label, set_msg));
        Applied {
            matched: true,
            errors,
            unmatched: Vec::new(),
        }
    }
}

impl Sheet {
    /// Applies the sheet to `obj`, selector by selector in declared order,
    /// recording matches in the object's history.
    pub fn apply(&mut self, obj: &mut dyn ParamTarget, set_msg: bool) -> Applied {
        self.apply_with(obj, set_msg, true)
    }

    /// As [`apply`](Sheet::apply), with history recording optional.
    ///
    /// Every selector that matches has its `n_match` counter bumped.
    pub fn apply_with(
        &mut self,
        obj: &mut dyn ParamTarget,
        set_msg: bool,
        record_history: bool,
    ) -> Applied {
        let mut outcome = Applied::default();
        for sel in self.iter_mut() {
            let applied = sel.apply(obj, set_msg);
            if applied.matched {
                sel.n_match += 1;
                if record_history {
                    if let Some(history) = obj.history() {
                        history.params_applied(sel);
                    }
                }
            }
            outcome.merge(applied);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Learn {
        lrate: f32,
        momentum: bool,
    }
    crate::impl_fields!(Learn { lrate as "Lrate", momentum as "Momentum" });

    struct Prjn {
        name: String,
        class: String,
        learn: Learn,
        history: HistoryLog,
    }

    impl Styler for Prjn {
        fn style_class(&self) -> &str {
            &self.class
        }

        fn style_name(&self) -> &str {
            &self.name
        }
    }

    impl ParamTarget for Prjn {
        fn style_type(&self) -> &str {
            "Prjn"
        }

        fn styler(&self) -> Option<&dyn Styler> {
            Some(self)
        }

        fn apply_target(&mut self) -> ApplyTarget<'_> {
            ApplyTarget::Fields(&mut self.learn)
        }

        fn history(&mut self) -> Option<&mut dyn History> {
            Some(&mut self.history)
        }
    }

    fn prjn(name: &str, class: &str) -> Prjn {
        Prjn {
            name: name.to_string(),
            class: class.to_string(),
            learn: Learn::default(),
            history: HistoryLog::new(),
        }
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("paramstyle::net::Layer<f32>"), "Layer");
        assert_eq!(short_type_name("Sim"), "Sim");
        assert_eq!(prjn("a", "").type_name(), "Prjn");
    }

    #[test]
    fn test_sheet_applies_in_order() {
        let mut sheet = Sheet::from(vec![
            Sel::new("Prjn", "").param("Prjn.Lrate", "0.04"),
            Sel::new(".Back", "").param("Prjn.Lrate", "0.02"),
            Sel::new("#HidToOut", "").param("Prjn.Lrate", "0.01"),
        ]);
        let mut back = prjn("HidToOut", "Back");
        let applied = sheet.apply(&mut back, false);
        assert!(applied.matched && applied.is_ok());
        assert_eq!(back.learn.lrate, 0.01);
        assert_eq!(back.history.len(), 3);

        let mut fwd = prjn("InToHid", "Forward");
        sheet.apply(&mut fwd, false);
        assert_eq!(fwd.learn.lrate, 0.04);
        assert_eq!(sheet.iter().map(|s| s.n_match).collect::<Vec<_>>(), vec![2, 1, 1]);
    }

    #[test]
    fn test_errors_do_not_block_other_paths() {
        let mut sheet = Sheet::from(vec![Sel::new("Prjn", "")
            .param("Prjn.Lrate", "0.5")
            .param("Prjn.Momentum", "sometimes")
            .param("Prjn.Nope", "1")]);
        let mut p = prjn("A", "");
        let applied = sheet.apply(&mut p, true);
        assert!(applied.matched);
        assert_eq!(applied.errors.len(), 2);
        assert_eq!(p.learn.lrate, 0.5);
        assert!(matches!(applied.into_result(), Err(ParamsError::Multiple(_))));
    }

    #[test]
    fn test_hypers_target_collects_values() {
        let mut hv = Hypers::new();
        let sel = Sel::new("Layer", "")
            .param("Layer.Inhib.Layer.Gi", "1.8")
            .hyper(
                "Layer.Inhib.Layer.Gi",
                crate::params::HyperValues::from([("Min", "0.5")]),
            );
        assert!(sel.params.apply(ApplyTarget::Hypers(&mut hv), "flex", false).is_empty());
        assert!(sel.hypers.apply(ApplyTarget::Hypers(&mut hv), "flex", false).is_empty());
        let record = hv.get("Layer.Inhib.Layer.Gi").unwrap();
        assert_eq!(record.get("Val"), Some("1.8"));
        assert_eq!(record.get("Min"), Some("0.5"));
    }

    #[test]
    fn test_hypers_val_sets_fields() {
        let mut learn = Learn::default();
        let hv = Hypers::new().with(
            "Prjn.Lrate",
            crate::params::HyperValues::from([("Val", "0.2"), ("Tweak", "log")]),
        );
        assert!(hv.apply(ApplyTarget::Fields(&mut learn), "prjn", false).is_empty());
        assert_eq!(learn.lrate, 0.2);
    }
}
