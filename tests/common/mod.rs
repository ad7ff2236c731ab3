// tests/common/mod.rs
// Small network fixtures shared by the integration tests.
#![allow(dead_code)]

use paramstyle::{
    impl_fields, impl_target, param_enum, param_flags, ApplyTarget, History, HistoryLog, ParamTarget, Sel,
    Sheet, Styler,
};

/// Routes log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Default)]
pub struct GiParams {
    pub on: bool,
    pub gi: f32,
}
impl_fields!(GiParams { on as "On", gi as "Gi" });

#[derive(Debug, Default)]
pub struct InhibParams {
    pub layer: GiParams,
    pub avg_tau: f32,
}
impl_fields!(InhibParams { layer as "Layer", avg_tau as "AvgTau" });

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActFun {
    #[default]
    Rate,
    Spike,
}
param_enum!(ActFun { Rate, Spike });

#[derive(Debug, Default)]
pub struct ActParams {
    pub gain: f32,
    pub dt: f64,
    pub clamp: bool,
    pub fun: ActFun,
}
impl_fields!(ActParams { gain as "Gain", dt as "Dt", clamp as "Clamp", fun as "Fun" });

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerFlags(u32);
param_flags!(LayerFlags: u32 { ACTIVE = 1, CLAMPED = 2, TARGET = 4 });

#[derive(Debug, Default)]
pub struct LayerParams {
    pub inhib: InhibParams,
    pub act: ActParams,
    pub flags: LayerFlags,
}
impl_fields!(LayerParams { inhib as "Inhib", act as "Act", flags as "Flags" });

/// Layer implementation whose type name differs from its target type
#[derive(Debug)]
pub struct LeabraLayer {
    pub name: String,
    pub class: String,
    pub params: LayerParams,
    pub history: HistoryLog,
}

impl LeabraLayer {
    pub fn new(name: &str, class: &str) -> Self {
        LeabraLayer {
            name: name.to_string(),
            class: class.to_string(),
            params: LayerParams::default(),
            history: HistoryLog::new(),
        }
    }
}

impl Styler for LeabraLayer {
    fn style_class(&self) -> &str {
        &self.class
    }

    fn style_name(&self) -> &str {
        &self.name
    }
}

impl ParamTarget for LeabraLayer {
    fn style_type(&self) -> &str {
        "Layer"
    }

    fn styler(&self) -> Option<&dyn Styler> {
        Some(self)
    }

    fn apply_target(&mut self) -> ApplyTarget<'_> {
        ApplyTarget::Fields(&mut self.params)
    }

    fn history(&mut self) -> Option<&mut dyn History> {
        Some(&mut self.history)
    }
}

#[derive(Debug, Default)]
pub struct MomentumParams {
    pub on: bool,
    pub mom_fact: f32,
}
impl_fields!(MomentumParams { on as "On", mom_fact as "MomFact" });

#[derive(Debug, Default)]
pub struct LearnParams {
    pub lrate: f32,
    pub momentum: MomentumParams,
}
impl_fields!(LearnParams { lrate as "Lrate", momentum as "Momentum" });

#[derive(Debug, Default)]
pub struct WtScaleParams {
    pub abs: f32,
    pub rel: f32,
}
impl_fields!(WtScaleParams { abs as "Abs", rel as "Rel" });

#[derive(Debug, Default)]
pub struct PrjnParams {
    pub learn: LearnParams,
    pub wt_scale: WtScaleParams,
}
impl_fields!(PrjnParams { learn as "Learn", wt_scale as "WtScale" });

#[derive(Debug)]
pub struct Prjn {
    pub name: String,
    pub class: String,
    pub params: PrjnParams,
    pub history: HistoryLog,
}

impl Prjn {
    pub fn new(name: &str, class: &str) -> Self {
        Prjn {
            name: name.to_string(),
            class: class.to_string(),
            params: PrjnParams::default(),
            history: HistoryLog::new(),
        }
    }
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
    fn styler(&self) -> Option<&dyn Styler> {
        Some(self)
    }

    fn apply_target(&mut self) -> ApplyTarget<'_> {
        ApplyTarget::Fields(&mut self.params)
    }

    fn history(&mut self) -> Option<&mut dyn History> {
        Some(&mut self.history)
    }
}

/// Plain run configuration, styled by type alone
#[derive(Debug, Default)]
pub struct SimConfig {
    pub max_epcs: usize,
    pub n_trials: i32,
    pub tag: String,
}
impl_fields!(SimConfig { max_epcs as "MaxEpcs", n_trials as "NTrials", tag as "Tag" });
impl_target!(SimConfig as "Sim");

/// Input -> Hidden -> Output with one feedback projection
pub struct Network {
    pub layers: Vec<LeabraLayer>,
    pub prjns: Vec<Prjn>,
}

impl Network {
    pub fn new() -> Self {
        Network {
            layers: vec![
                LeabraLayer::new("Input", "Input"),
                LeabraLayer::new("Hidden", "Hidden"),
                LeabraLayer::new("Output", "Target"),
            ],
            prjns: vec![
                Prjn::new("InputToHidden", "Forward"),
                Prjn::new("HiddenToOutput", "Forward"),
                Prjn::new("OutputToHidden", "Back"),
            ],
        }
    }

    pub fn layer(&self, name: &str) -> &LeabraLayer {
        self.layers.iter().find(|l| l.name == name).unwrap()
    }

    pub fn prjn(&self, name: &str) -> &Prjn {
        self.prjns.iter().find(|p| p.name == name).unwrap()
    }

    /// Every layer and projection, layers first
    pub fn targets(&mut self) -> Vec<&mut dyn ParamTarget> {
        let mut targets: Vec<&mut dyn ParamTarget> = Vec::new();
        for layer in &mut self.layers {
            targets.push(layer);
        }
        for prjn in &mut self.prjns {
            targets.push(prjn);
        }
        targets
    }
}

/// Type defaults, a class override and a name override
pub fn base_sheet() -> Sheet {
    Sheet::from(vec![
        Sel::new("Layer", "generic layer params")
            .param("Layer.Inhib.Layer.Gi", "1.8")
            .param("Layer.Act.Gain", "100"),
        Sel::new("#Output", "output needs lower inhibition").param("Layer.Inhib.Layer.Gi", "1.4"),
        Sel::new("Prjn", "learning defaults")
            .param("Prjn.Learn.Lrate", "0.04")
            .param("Prjn.Learn.Momentum.On", "true"),
        Sel::new(".Back", "feedback must be weaker").param("Prjn.WtScale.Rel", "0.2"),
    ])
}
