//! Hyperparameter search plans
//!
//! A [`Flex`] registry records, per object, the metadata and history left by
//! applying sheets. [`tweaks_from_hypers`] turns that record into search
//! plans: for every path declaring a `Tweak` policy, objects are grouped by
//! the selector that actually set their current value, and neighbor values
//! are generated with [`tweak`].
pub mod flex;
pub mod tweak;

pub use flex::{Flex, FlexValue};
pub use tweak::{tweak, TweakPolicy};

use serde::{Deserialize, Serialize};

use crate::params::{hypers, ParamValue, Sel};

/// Values to search for one parameter of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchValues {
    /// Object name
    pub name: String,
    /// Object target type, e.g. `Layer`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parameter path
    pub path: String,
    /// Current value, restored after searching this parameter
    pub start: f64,
    /// Candidate values
    pub values: Vec<f64>,
}

/// Search plan for one parameter path under one originating selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweaks {
    /// Parameter path
    pub param: String,
    /// Selector whose value is being perturbed
    pub sel: Sel,
    /// One entry per object that selector governs, in name order
    pub search: Vec<SearchValues>,
}

/// Builds search plans from every `Tweak` entry in the registry.
///
/// For each object and tweakable path, the object's history is walked
/// backwards to find the latest selector assigning the current value; the
/// object's entry is filed under that selector. Paths with no current
/// value, an unreadable policy or no originating selector are skipped.
///
/// Plans are sorted by selector pattern, then path.
pub fn tweaks_from_hypers(flex: &Flex) -> Vec<Tweaks> {
    let mut plans: Vec<Tweaks> = Vec::new();
    for (name, fv) in flex.iter() {
        for (path, hv) in fv.object.iter() {
            let Some(policy) = hv.get(hypers::TWEAK) else {
                continue;
            };
            let Some(val) = hv.get(hypers::VAL) else {
                log::warn!("{}: {} has a Tweak but no current value", name, path);
                continue;
            };
            let current = ParamValue::parse(val);
            let Some(start) = current.as_f64() else {
                log::warn!("{}: {} value {} is not numeric", name, path, current);
                continue;
            };
            let Ok(policy) = policy.parse::<TweakPolicy>() else {
                continue;
            };
            let Some(sel) = fv.history.origin_of(path, &current) else {
                log::debug!("{}: no applied selector set {} to {}", name, path, current);
                continue;
            };
            let search = SearchValues {
                name: fv.name.clone(),
                type_name: fv.type_name.clone(),
                path: path.clone(),
                start,
                values: policy.values(start),
            };
            match plans.iter_mut().find(|t| t.param == *path && t.sel == *sel) {
                Some(plan) => plan.search.push(search),
                None => plans.push(Tweaks {
                    param: path.clone(),
                    sel: sel.clone(),
                    search: vec![search],
                }),
            }
        }
    }
    plans.sort_by(|a, b| a.sel.sel.cmp(&b.sel.sel).then_with(|| a.param.cmp(&b.param)));
    plans
}
