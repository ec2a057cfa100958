use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use puppet_motion_core::{
    CurveMotion, Motion, MotionBehavior, MotionData, MotionPhase, ParameterTable, PlaybackEntry,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn looping_ramp(behavior: MotionBehavior) -> CurveMotion {
    let data = MotionData::builder(2.0, 10.0)
        .parameter_curve("ParamA")
        .start(0.0, 0.0)
        .linear(2.0, 10.0)
        .build()
        .unwrap();
    let mut motion = CurveMotion::new(Arc::new(data));
    motion.set_behavior(behavior);
    motion.lifecycle_mut().set_loop(true);
    motion
}

fn sample_at(motion: &mut CurveMotion, now: f32) -> f32 {
    let mut model = ParameterTable::new().with_parameter("ParamA", 0.0);
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);
    motion.update_parameters(&mut model, &mut entry, now);
    model.value("ParamA").unwrap()
}

/// it should produce the same output one or more periods later
#[test]
fn looping_output_is_periodic() {
    let mut motion = looping_ramp(MotionBehavior::V2);
    let period = 2.0 + 1.0 / 10.0;
    for t in [0.3f32, 1.1, 1.9] {
        let base = sample_at(&mut motion, t);
        for k in 1..=3 {
            let later = sample_at(&mut motion, t + k as f32 * period);
            approx(later, base, 1e-3);
        }
    }
}

#[test]
fn rebase_preserves_remapped_offset() {
    let mut motion = looping_ramp(MotionBehavior::V2);
    let mut model = ParameterTable::new().with_parameter("ParamA", 0.0);
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);

    motion.update_parameters(&mut model, &mut entry, 2.5);
    let before = model.value("ParamA").unwrap();
    approx(entry.start_time(), 2.1, 1e-4);

    // Same host time after the rebase samples the same point on the curve.
    motion.update_parameters(&mut model, &mut entry, 2.5);
    approx(model.value("ParamA").unwrap(), before, 1e-4);
    approx(before, 2.0, 1e-3);
}

/// it should reset to the current time and notify on every loop boundary
#[test]
fn legacy_restart_notifies_each_loop() {
    let mut motion = looping_ramp(MotionBehavior::V1);
    let finished = Rc::new(Cell::new(0));
    let counter = finished.clone();
    motion
        .lifecycle_mut()
        .set_finished_callback(move |_| counter.set(counter.get() + 1));
    let mut model = ParameterTable::new().with_parameter("ParamA", 0.0);
    let mut entry = PlaybackEntry::new();

    motion.update_parameters(&mut model, &mut entry, 0.0);
    motion.update_parameters(&mut model, &mut entry, 2.0);
    assert_eq!(finished.get(), 1);
    assert_eq!(entry.start_time(), 2.0);
    assert_eq!(entry.fade_in_start_time(), 2.0);
    // No tail correction: the boundary frame pins to the last key.
    approx(model.value("ParamA").unwrap(), 10.0, 1e-5);

    motion.update_parameters(&mut model, &mut entry, 4.5);
    assert_eq!(finished.get(), 2);
    assert_eq!(entry.start_time(), 4.5);
    approx(model.value("ParamA").unwrap(), 2.5, 1e-4);
    assert!(!entry.is_finished());
}

/// it should recompute the end time when looping is switched off mid-play
#[test]
fn toggling_loop_off_restores_end_time() {
    let mut motion = looping_ramp(MotionBehavior::V2);
    let mut model = ParameterTable::new().with_parameter("ParamA", 0.0);
    let mut entry = PlaybackEntry::new();

    motion.update_parameters(&mut model, &mut entry, 0.0);
    motion.update_parameters(&mut model, &mut entry, 1.0);
    assert_eq!(entry.end_time(), -1.0);

    motion.lifecycle_mut().set_loop(false);
    motion.update_parameters(&mut model, &mut entry, 1.5);
    assert_eq!(entry.end_time(), 2.0);
    assert_eq!(motion.phase(&entry), MotionPhase::ActiveNonLooping);

    motion.update_parameters(&mut model, &mut entry, 2.0);
    assert!(entry.is_finished());

    // And back on: a looping motion is open ended again.
    let mut entry = PlaybackEntry::new();
    motion.update_parameters(&mut model, &mut entry, 0.0);
    assert_eq!(entry.end_time(), 2.0);
    motion.lifecycle_mut().set_loop(true);
    motion.update_parameters(&mut model, &mut entry, 0.5);
    assert_eq!(entry.end_time(), -1.0);
}
