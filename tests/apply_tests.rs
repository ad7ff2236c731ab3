mod common;

#[cfg(test)]
mod tests {
    use super::common::*;
    use paramstyle::apply::map_to_sheet;
    use paramstyle::fields::{get_param, print_struct};
    use paramstyle::{Applier, ApplyConfig, ParamTarget, ParamValue, ParamsError, Sel, Sheet, SheetSets};
    use std::collections::BTreeMap;

    // Type, class and name selectors applied in order: the name override wins
    #[test]
    fn test_selector_specificity() {
        init_logging();
        let mut net = Network::new();
        let mut sheet = base_sheet();
        let applier = Applier::default();
        let applied = applier.apply_sheet(&mut sheet, "Base", &mut net.targets());
        assert!(applied.is_ok());

        assert_eq!(net.layer("Input").params.inhib.layer.gi, 1.8);
        assert_eq!(net.layer("Output").params.inhib.layer.gi, 1.4);
        assert_eq!(net.layer("Hidden").params.act.gain, 100.0);
        assert_eq!(net.prjn("OutputToHidden").params.wt_scale.rel, 0.2);
        assert_eq!(net.prjn("InputToHidden").params.wt_scale.rel, 0.0);
        assert!(net.prjn("HiddenToOutput").params.learn.momentum.on);
    }

    // Reversing the order lets the type default clobber the override
    #[test]
    fn test_order_is_load_bearing() {
        let mut out = LeabraLayer::new("Output", "Target");
        let mut sheet = Sheet::from(vec![
            Sel::new("#Output", "").param("Layer.Inhib.Layer.Gi", "1.4"),
            Sel::new("Layer", "").param("Layer.Inhib.Layer.Gi", "1.8"),
        ]);
        sheet.apply(&mut out, false);
        assert_eq!(out.params.inhib.layer.gi, 1.8);
    }

    // A Prjn selector never applies to a Layer, whatever its pattern
    #[test]
    fn test_target_type_gating() {
        let mut hidden = LeabraLayer::new("Hidden", "Hidden");
        let mut sheet = Sheet::from(vec![
            Sel::new("#Hidden", "").param("Prjn.Learn.Lrate", "0.1"),
            Sel::new("Layer", "").param("Prjn.Learn.Lrate", "0.1"),
        ]);
        let applied = sheet.apply(&mut hidden, false);
        assert!(!applied.matched);
        assert!(applied.is_ok());
        assert!(sheet.iter().all(|s| s.n_match == 0));
        assert!(hidden.history.is_empty());
    }

    // Bare selectors match the declared type and the implementation type
    #[test]
    fn test_bare_selector_matches_either_type() {
        let mut hidden = LeabraLayer::new("Hidden", "Hidden");
        assert_eq!(hidden.style_type(), "Layer");
        assert_eq!(hidden.type_name(), "LeabraLayer");
        let mut sheet = Sheet::from(vec![Sel::new("LeabraLayer", "").param("Layer.Act.Dt", "0.3")]);
        assert!(sheet.apply(&mut hidden, false).matched);
        assert_eq!(hidden.params.act.dt, 0.3);
    }

    // A selector nobody matches keeps n_match at zero and is reported
    #[test]
    fn test_dead_selector_detection() {
        init_logging();
        let mut net = Network::new();
        let mut sheet = base_sheet();
        sheet.push(Sel::new("#Hiden", "typo").param("Layer.Inhib.Layer.Gi", "2.0"));
        let applied = Applier::default().apply_sheet(&mut sheet, "Base", &mut net.targets());
        assert_eq!(applied.unmatched, vec!["#Hiden".to_string()]);
        assert_eq!(sheet.sel_by_name("#Hiden").unwrap().n_match, 0);
        assert_eq!(sheet.sel_by_name("Layer").unwrap().n_match, 3);
        assert_eq!(sheet.sel_by_name(".Back").unwrap().n_match, 1);
    }

    // One bad path is reported but does not block the rest of the sheet
    #[test]
    fn test_errors_are_collected() {
        init_logging();
        let mut net = Network::new();
        let mut sheet = Sheet::from(vec![
            Sel::new("Layer", "")
                .param("Layer.Inhib.Layer.Gii", "1.8")
                .param("Layer.Act.Gain", "80"),
            Sel::new("#Output", "").param("Layer.Act.Fun", "Tanh"),
            Sel::new("#Output", "").param("Layer.Inhib", "1"),
        ]);
        let applied = Applier::default().apply_sheet(&mut sheet, "Base", &mut net.targets());
        assert!(applied.matched);
        assert_eq!(applied.errors.len(), 5);
        assert!(applied.errors.iter().any(|e| matches!(e, ParamsError::PathNotFound { segment, .. } if segment == "Gii")));
        assert!(applied.errors.iter().any(|e| matches!(e, ParamsError::Coercion { path, .. } if path == "Layer.Inhib")));
        assert!(net.layers.iter().all(|l| l.params.act.gain == 80.0));
        assert!(matches!(applied.into_result(), Err(ParamsError::Multiple(v)) if v.len() == 5));
    }

    // Enum and flag leaves parse their symbolic names
    #[test]
    fn test_enum_and_flag_leaves() {
        let mut out = LeabraLayer::new("Output", "Target");
        let mut sheet = Sheet::from(vec![Sel::new("#Output", "")
            .param("Layer.Act.Fun", "Spike")
            .param("Layer.Flags", "ACTIVE|TARGET")
            .param("Layer.Act.Clamp", "true")]);
        assert!(sheet.apply(&mut out, true).is_ok());
        assert_eq!(out.params.act.fun, ActFun::Spike);
        assert_eq!(out.params.flags, LayerFlags::ACTIVE | LayerFlags::TARGET);
        assert!(out.params.act.clamp);
    }

    // Plain config structs are styled by type alone
    #[test]
    fn test_unstyled_config_object() {
        let mut sim = SimConfig::default();
        let mut sheet = Sheet::from(vec![
            Sel::new("Sim", "").param("Sim.MaxEpcs", "50").param("Sim.Tag", "base"),
            Sel::new("#Anything", "").param("Sim.NTrials", "-3"),
            Sel::new("Sim", "").param("Sim.MaxEpcs", "-1"),
        ]);
        let applied = sheet.apply(&mut sim, false);
        assert_eq!(sim.max_epcs, 50);
        assert_eq!(sim.n_trials, -3);
        assert_eq!(sim.tag, "base");
        assert_eq!(applied.errors.len(), 1);
    }

    // String fields take numeric-looking values exactly as written
    #[test]
    fn test_string_field_keeps_number_text() {
        for text in ["007", "1.50", "1e3"] {
            let mut sim = SimConfig::default();
            let mut sheet = Sheet::from(vec![Sel::new("Sim", "").param("Sim.Tag", text)]);
            let yaml = serde_yaml::to_string(&sheet).unwrap();
            let mut reread: Sheet = serde_yaml::from_str(&yaml).unwrap();
            assert!(sheet.apply(&mut sim, false).is_ok());
            assert_eq!(sim.tag, text);
            assert!(reread.apply(&mut sim, false).is_ok());
            assert_eq!(sim.tag, text);
        }
    }

    // Integral floats beyond the field's range are rejected, not clamped
    #[test]
    fn test_int_field_out_of_range() {
        let mut sim = SimConfig::default();
        let mut sheet = Sheet::from(vec![
            Sel::new("Sim", "").param("Sim.MaxEpcs", "1e20").param("Sim.NTrials", "1e10"),
        ]);
        let applied = sheet.apply(&mut sim, false);
        assert_eq!(applied.errors.len(), 2);
        assert!(applied.errors.iter().all(|e| matches!(e, ParamsError::Coercion { .. })));
        assert_eq!(sim.max_epcs, SimConfig::default().max_epcs);
        assert_eq!(sim.n_trials, SimConfig::default().n_trials);
    }

    // Full pass: Base then the extra sheets named in the config
    #[test]
    fn test_apply_all_with_extra_sheets() {
        init_logging();
        let mut net = Network::new();
        let mut sets = SheetSets::from([
            ("Base", base_sheet()),
            (
                "NoMomentum",
                Sheet::from(vec![Sel::new("Prjn", "").param("Prjn.Learn.Momentum.On", "false")]),
            ),
        ]);
        let config: ApplyConfig = serde_yaml::from_str("extra_sheets: NoMomentum\n").unwrap();
        let applier = Applier::new(config);
        let applied = applier.apply_all(&mut sets, &mut net.targets()).unwrap();
        assert!(applied.is_ok());
        assert!(applied.unmatched.is_empty());
        assert!(net.prjns.iter().all(|p| !p.params.learn.momentum.on));
        assert_eq!(net.prjn("InputToHidden").params.learn.lrate, 0.04);

        let history = net.prjn("InputToHidden").history.params_history();
        assert_eq!(
            history.get("Prjn.Learn.Momentum.On").map(String::as_str),
            Some("NoMomentum:Prjn: false | Base:Prjn: true")
        );

        // running again starts from a fresh history
        applier.apply_all(&mut sets, &mut net.targets()).unwrap();
        assert_eq!(net.prjn("InputToHidden").history.len(), 2);

        let mut missing = SheetSets::from([("Other", base_sheet())]);
        assert!(matches!(
            applier.apply_all(&mut missing, &mut net.targets()),
            Err(ParamsError::TargetNotFound { kind: "Sheet", .. })
        ));
    }

    // Selector:Path maps become one-selector-per-key sheets
    #[test]
    fn test_map_to_sheet_applies_to_network() {
        let mut net = Network::new();
        let vals = BTreeMap::from([
            ("#Hidden:Layer.Inhib.Layer.Gi".to_string(), ParamValue::from(1.6)),
            (".Forward:Prjn.Learn.Lrate".to_string(), ParamValue::from(0.02)),
        ]);
        let mut sheet = map_to_sheet(&vals).unwrap();
        Applier::default().apply_sheet(&mut sheet, "ApplyMap", &mut net.targets());
        assert_eq!(net.layer("Hidden").params.inhib.layer.gi, 1.6);
        assert_eq!(net.prjn("HiddenToOutput").params.learn.lrate, 0.02);
        assert_eq!(net.prjn("OutputToHidden").params.learn.lrate, 0.0);
    }

    // Reading back and printing applied values
    #[test]
    fn test_get_and_print() {
        let mut hidden = LeabraLayer::new("Hidden", "Hidden");
        let mut sheet = base_sheet();
        sheet.apply(&mut hidden, false);
        assert_eq!(get_param(&hidden.params, "Act.Gain").unwrap(), 100.0);
        assert!(get_param(&hidden.params, "Act.Nope").is_err());

        let only_changed = |_: &str, v: &ParamValue| v.as_f64().is_some_and(|f| f != 0.0);
        let text = print_struct(&hidden.params, 0, Some(&only_changed));
        assert!(text.contains("Gi 1.8"));
        assert!(text.contains("Gain 100"));
        assert!(!text.contains("Dt"));
    }
}
