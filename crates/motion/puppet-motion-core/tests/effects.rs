use std::sync::Arc;

use puppet_motion_core::{
    CurveMotion, Motion, MotionData, MotionDataBuilder, ParameterTable, PlaybackEntry,
    MAX_EFFECT_TARGETS,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn constant(builder: MotionDataBuilder, value: f32) -> MotionDataBuilder {
    builder.start(0.0, value).linear(2.0, value)
}

fn effect_motion() -> CurveMotion {
    let b = MotionData::builder(2.0, 30.0);
    let b = constant(b.model_curve("EyeBlink"), 0.5);
    let b = constant(b.model_curve("LipSync"), 0.2);
    let b = constant(b.parameter_curve("ParamEyeLOpen"), 0.8);
    let b = constant(b.parameter_curve("ParamMouthForm"), 0.3);
    let b = constant(b.part_opacity_curve("PartArmA"), 0.25);
    CurveMotion::new(Arc::new(b.build().unwrap()))
}

fn rig() -> ParameterTable {
    ParameterTable::new()
        .with_parameter("ParamEyeLOpen", 1.0)
        .with_parameter("ParamEyeROpen", 1.0)
        .with_parameter("ParamMouthOpenY", 0.0)
        .with_parameter("ParamMouthForm", 0.0)
        .with_parameter("PartArmA", 1.0)
}

/// it should let curves suppress effects on the parameters they drive
#[test]
fn driven_parameters_suppress_effect_pass() {
    let mut motion = effect_motion();
    motion.set_effect_ids(
        ["ParamEyeLOpen", "ParamEyeROpen"],
        ["ParamMouthOpenY", "ParamMouthForm"],
    );
    motion.lifecycle_mut().set_weight(0.5);
    let mut model = rig();
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);

    // Curve value scaled by the blink signal, then blended: 1 + (0.4 - 1) * 0.5.
    approx(model.value("ParamEyeLOpen").unwrap(), 0.7, 1e-5);
    // Curve value plus the lip-sync signal: 0 + (0.5 - 0) * 0.5.
    approx(model.value("ParamMouthForm").unwrap(), 0.25, 1e-5);
    // Undriven targets follow the raw signals.
    approx(model.value("ParamEyeROpen").unwrap(), 0.75, 1e-5);
    approx(model.value("ParamMouthOpenY").unwrap(), 0.1, 1e-5);
    // Part opacity ignores the weight.
    approx(model.value("PartArmA").unwrap(), 0.25, 1e-5);
}

/// it should apply effects past the tracked range unconditionally
#[test]
fn effect_targets_past_limit_are_never_suppressed() {
    let mut motion = effect_motion();
    let mut blink: Vec<String> = (0..MAX_EFFECT_TARGETS).map(|i| format!("Unused{i}")).collect();
    blink.push("ParamEyeLOpen".to_string());
    motion.set_effect_ids(blink, Vec::<String>::new());
    let mut model = rig();
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);

    // The curve writes 0.8 unscaled, then the effect pass overrides it.
    approx(model.value("ParamEyeLOpen").unwrap(), 0.5, 1e-5);
    // Without lip-sync targets the mouth curve is plain.
    approx(model.value("ParamMouthForm").unwrap(), 0.3, 1e-5);
}

#[test]
fn without_effect_curves_targets_are_untouched() {
    let data = MotionData::builder(1.0, 30.0)
        .parameter_curve("ParamMouthForm")
        .start(0.0, 0.3)
        .linear(1.0, 0.3)
        .parameter_curve("ParamNotInRig")
        .start(0.0, 5.0)
        .linear(1.0, 5.0)
        .build()
        .unwrap();
    let mut motion = CurveMotion::new(Arc::new(data));
    motion.set_effect_ids(["ParamEyeROpen"], ["ParamMouthOpenY"]);
    let mut model = rig();
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);

    assert_eq!(model.value("ParamEyeROpen"), Some(1.0));
    assert_eq!(model.value("ParamMouthOpenY"), Some(0.0));
    approx(model.value("ParamMouthForm").unwrap(), 0.3, 1e-6);
    assert_eq!(model.value("ParamNotInRig"), None);
}

/// it should fade curves with their own fade times independently
#[test]
fn per_parameter_fades_override_motion_fade() {
    let data = MotionData::builder(2.0, 30.0)
        .parameter_curve("ParamEyeLOpen")
        .fade_in(1.0)
        .start(0.0, 0.0)
        .linear(2.0, 0.0)
        .parameter_curve("ParamMouthForm")
        .start(0.0, 1.0)
        .linear(2.0, 1.0)
        .build()
        .unwrap();
    let mut motion = CurveMotion::new(Arc::new(data));
    motion.lifecycle_mut().set_fade_in_seconds(0.0);
    let mut model = rig();
    let mut entry = PlaybackEntry::new();

    motion.update_parameters(&mut model, &mut entry, 0.0);
    model.reset();
    motion.update_parameters(&mut model, &mut entry, 0.5);

    // Own fade-in of 1 s: ease(0.5) = 0.7071, blend from 1 toward 0.
    approx(
        model.value("ParamEyeLOpen").unwrap(),
        1.0 - std::f32::consts::FRAC_1_SQRT_2,
        1e-4,
    );
    // Motion-level fade-in of 0 s: fully applied.
    approx(model.value("ParamMouthForm").unwrap(), 1.0, 1e-6);
}
