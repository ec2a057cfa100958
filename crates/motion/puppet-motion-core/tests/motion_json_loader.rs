use puppet_motion_core::{
    parse_motion_json, BezierEvaluation, Config, CurveMotion, CurveTarget, Motion, MotionBehavior,
    ParameterTable, PlaybackEntry,
};
use puppet_test_fixtures::{models, motions, ModelFixture};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn rig(fixture: &ModelFixture) -> ParameterTable {
    fixture
        .parameters
        .iter()
        .fold(ParameterTable::new(), |table, p| {
            table.with_parameter(p.id.as_str(), p.default)
        })
}

#[test]
fn every_fixture_motion_loads() {
    for name in motions::keys() {
        let json = motions::json(&name).unwrap();
        let asset = parse_motion_json(&json, &Config::default())
            .unwrap_or_else(|e| panic!("fixture {name} failed to load: {e}"));
        assert!(!asset.data.curves.is_empty(), "{name} has no curves");
        asset.data.validate_basic().unwrap();
    }
}

#[test]
fn idle_loop_meta_and_groups() {
    let json = motions::json("idle_loop").unwrap();
    let asset = parse_motion_json(&json, &Config::default()).unwrap();
    let data = &asset.data;
    assert!(data.loop_hint);
    assert_eq!(data.fps, 30.0);
    assert_eq!(asset.fade_in_seconds, 0.5);
    assert_eq!(asset.fade_out_seconds, 0.5);
    assert_eq!(data.segments.len(), 7);
    assert_eq!(data.points.len(), 15);
    assert_eq!(data.group_bounds(), (1, 3));
    assert_eq!(data.curves[3].target, CurveTarget::PartOpacity);
    assert_eq!(data.curves[2].fade_in_time, 0.0);
}

#[test]
fn config_overrides_bezier_solver() {
    let json = motions::json("idle_loop").unwrap();
    let cfg = Config {
        force_restricted_beziers: true,
        ..Config::default()
    };
    let asset = parse_motion_json(&json, &cfg).unwrap();
    assert_eq!(asset.data.bezier, BezierEvaluation::Restricted);

    // The asset flag alone also forces the restricted kernel.
    let wave = motions::json("wave").unwrap();
    let asset = parse_motion_json(&wave, &Config::default()).unwrap();
    assert_eq!(asset.data.bezier, BezierEvaluation::Restricted);
    // Wave omits fade times: the config defaults apply.
    assert_eq!(asset.fade_in_seconds, 1.0);
}

/// it should drive the fixture rig from the loaded motion
#[test]
fn wave_plays_on_fixture_rig() {
    let fixture = models::load("basic_rig").unwrap();
    let mut model = rig(&fixture);
    let cfg = Config {
        behavior: MotionBehavior::V1,
        ..Config::default()
    };
    let mut motion = CurveMotion::from_json(&motions::json("wave").unwrap(), &cfg).unwrap();
    assert_eq!(motion.behavior(), MotionBehavior::V1);
    motion.set_effect_ids(fixture.eye_blink.clone(), fixture.lip_sync.clone());
    assert!(motion.exists_model_opacity());

    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);
    motion.update_parameters(&mut model, &mut entry, 0.75);
    // Opacity ramps 1 -> 0.5 over 1.5 s.
    approx(model.opacity(), 0.75, 1e-4);
    assert_eq!(motion.fired_events_for_entry(&mut entry, 0.75), vec!["raise"]);

    motion.update_parameters(&mut model, &mut entry, 1.5);
    assert!(entry.is_finished());
    assert_eq!(motion.fired_events_for_entry(&mut entry, 1.5), vec!["done"]);
}

#[test]
fn idle_loop_part_opacity_is_unblended() {
    let fixture = models::load("basic_rig").unwrap();
    let mut model = rig(&fixture);
    let mut motion =
        CurveMotion::from_json(&motions::json("idle_loop").unwrap(), &Config::default()).unwrap();
    motion.lifecycle_mut().set_loop(true);

    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);
    // Fade weight is still 0 on the first frame, the part opacity is not.
    assert_eq!(entry.state_weight(), 0.0);
    assert_eq!(model.value("PartArmA"), Some(1.0));
    assert_eq!(model.value("ParamAngleX"), Some(0.0));

    motion.update_parameters(&mut model, &mut entry, 1.2);
    assert_eq!(model.value("PartArmA"), Some(0.5));
}
