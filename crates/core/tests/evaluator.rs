//! Word evaluator behavior, one concern per test.

mod common;

use common::{after, diag_codes, find_diag, one, run, suppressing};
use gcode_toolchain_core::state::{
    ACTIVE_COORDINATE_SYSTEM, AXIS_OFFSETS, Coolant, DistanceMode, G28_HOME, MotionMode, Spindle,
    Stopping, ToolChange, Units,
};
use gcode_toolchain_core::{Axis, FatalKind, MachineState, Settings, Severity, codes};

// ─── Tokenization equivalence ────────────────────────────────────────────────

#[test]
fn spacing_does_not_change_words() {
    let packed = one("G1X1Y2Z3");
    let spaced = one("G1 X1 Y2 Z3");
    let lower = one("g1 x 1 y 2 z 3");
    assert_eq!(packed.words, spaced.words);
    assert_eq!(packed.words, lower.words);
    assert_eq!(packed.canonical, "G1 X1 Y2 Z3");
    assert_eq!(spaced.canonical, packed.canonical);
    assert_eq!(lower.canonical, packed.canonical);
}

#[test]
fn canonical_letter_order() {
    let b = one("Z-1 X2 F300 G1 N10 M8 S500");
    assert_eq!(b.canonical, "M8 G1 F300 N10 S500 X2 Z-1");
}

#[test]
fn comment_and_program_marker_pass_through() {
    assert_eq!(one("%").canonical, "%");
    assert_eq!(one("G0 X1 (Move Here) ").canonical, "G0 X1 (Move Here)");
    assert_eq!(one("(only a comment)").canonical, "(only a comment)");
    assert_eq!(one("; semicolon note").canonical, "; semicolon note");
    assert_eq!(one("").canonical, "");
}

// ─── Axis words ──────────────────────────────────────────────────────────────

#[test]
fn absolute_repeat_keeps_position() {
    let p = run(&["G0 X10", "X10"], Settings::default());
    assert_eq!(p.last_state().position(Axis::X), 10.0);
    assert_eq!(p.blocks()[1].canonical, "X10");
}

#[test]
fn absolute_repeat_is_dropped_with_suppression() {
    let p = run(&["G0 X10", "X10"], suppressing());
    assert_eq!(p.last_state().position(Axis::X), 10.0);
    let b = &p.blocks()[1];
    assert_eq!(b.canonical, "");
    let d = find_diag(b, codes::NOOP_MOVE);
    assert_eq!(d.severity, Severity::Info);
}

#[test]
fn incremental_repeat_accumulates() {
    let p = run(&["G91 G0 X10", "X10"], suppressing());
    assert_eq!(p.last_state().position(Axis::X), 20.0);
    assert_eq!(p.blocks()[0].canonical, "G91 G0 X10");
    assert_eq!(p.blocks()[1].canonical, "X10");
}

#[test]
fn last_linear_and_rapid_record_commanded_values() {
    let p = run(&["G0 X5", "G1 X7 F100", "G91 G0 X1"], Settings::default());
    let x = p.last_state().axes[Axis::X];
    assert_eq!(x.position, 13.0);
    assert_eq!(x.last_linear, 7.0);
    assert_eq!(x.last_rapid, 1.0);
}

#[test]
fn linear_axis_without_motion_mode_is_fatal() {
    let b = one("X5");
    assert_eq!(b.fatal, FatalKind::Syntax);
    assert_eq!(b.state.position(Axis::X), 0.0);
    assert!(find_diag(&b, codes::AXIS_WITHOUT_MOTION_MODE).is_error());
}

#[test]
fn rotary_axis_without_motion_mode_warns() {
    let b = one("A90");
    assert_eq!(b.fatal, FatalKind::None);
    assert_eq!(
        find_diag(&b, codes::AXIS_WITHOUT_MOTION_MODE).severity,
        Severity::Warn
    );
}

#[test]
fn axis_after_cycle_cancel_is_fatal() {
    let p = run(&["G80", "Y1"], Settings::default());
    assert_eq!(p.blocks()[1].fatal, FatalKind::Syntax);
}

// ─── Motion modes ────────────────────────────────────────────────────────────

#[test]
fn arc_is_unimplemented_but_chain_continues() {
    let p = run(&["G2 X1 Y1", "G0 X5"], Settings::default());
    assert_eq!(p.blocks().len(), 2);
    assert_eq!(p.blocks()[0].fatal, FatalKind::Unimplemented);
    assert_eq!(p.blocks()[1].fatal, FatalKind::None);
    assert_eq!(p.last_state().position(Axis::X), 5.0);
    assert_eq!(p.first_fatal().map(|b| b.index), Some(0));
    assert!(p.has_fatal());
}

#[test]
fn canned_cycle_and_probe_are_unimplemented() {
    for line in ["G81 Z-1", "G38.2 Z-5", "G3 X1"] {
        let b = one(line);
        assert_eq!(b.fatal, FatalKind::Unimplemented, "{line}");
        assert!(diag_codes(&b).contains(&codes::UNIMPLEMENTED_MOTION.to_string()));
    }
    assert_eq!(one("G83").state.modes.motion, MotionMode::CannedCycle(83));
}

#[test]
fn first_fatal_classification_wins() {
    let p = run(&["G93", "G2 X1"], Settings::default());
    let b = &p.blocks()[1];
    assert_eq!(b.fatal, FatalKind::Unimplemented);
    let codes_seen = diag_codes(b);
    assert!(codes_seen.contains(&codes::UNIMPLEMENTED_MOTION.to_string()));
    assert!(codes_seen.contains(&codes::MISSING_INVERSE_TIME_FEED.to_string()));
}

#[test]
fn redundant_motion_mode_dropped_with_suppression() {
    let p = run(&["G0 X1", "G0 X2"], suppressing());
    let b = &p.blocks()[1];
    assert_eq!(b.canonical, "X2");
    assert_eq!(
        find_diag(b, codes::REDUNDANT_MOTION_MODE).severity,
        Severity::Info
    );
}

#[test]
fn redundant_motion_mode_kept_without_suppression() {
    let p = run(&["G0 X1", "G0 X2"], Settings::default());
    assert_eq!(p.blocks()[1].canonical, "G0 X2");
}

#[test]
fn unmodeled_motion_modes_are_never_suppressed() {
    let p = run(&["G2", "G2"], suppressing());
    assert_eq!(p.blocks()[1].canonical, "G2");
}

// ─── Inverse-time feed ───────────────────────────────────────────────────────

#[test]
fn inverse_time_feed_move_needs_f() {
    assert_eq!(one("G93 G1 X1").fatal, FatalKind::Syntax);
    assert_eq!(one("G93 G1").fatal, FatalKind::Syntax);
    assert_eq!(one("G93 G1 X1 F2").fatal, FatalKind::None);
    assert_eq!(one("G93 G0 X1").fatal, FatalKind::None);
}

#[test]
fn inverse_time_needs_f_on_every_block() {
    let p = run(&["G93 G1 X1 F2", "X2"], Settings::default());
    assert_eq!(p.blocks()[0].fatal, FatalKind::None);
    assert_eq!(p.blocks()[1].fatal, FatalKind::Syntax);
    let p = run(&["G93 G1 X1 F2", "G94", "X2"], Settings::default());
    assert_eq!(p.blocks()[2].fatal, FatalKind::None);
}

#[test]
fn inverse_time_check_ignores_suppression() {
    let lines = ["G1 X1 F1", "G93", "G1 X2 F3", "G1"];
    for settings in [Settings::default(), suppressing()] {
        let p = run(&lines, settings);
        assert_eq!(p.blocks()[3].fatal, FatalKind::Syntax);
        assert!(find_diag(&p.blocks()[3], codes::MISSING_INVERSE_TIME_FEED).is_error());
    }
    assert_eq!(one("G1 G93").fatal, FatalKind::Syntax);
}

// ─── G53, G10, G92, G28 ──────────────────────────────────────────────────────

#[test]
fn machine_coordinates_are_absolute_for_the_block() {
    let p = run(&["G91 G0 X1", "G53 X5", "X1"], Settings::default());
    assert_eq!(p.blocks()[1].fatal, FatalKind::None);
    assert_eq!(p.blocks()[1].state.position(Axis::X), 5.0);
    assert_eq!(p.last_state().position(Axis::X), 6.0);
    assert_eq!(p.last_state().modes.distance, DistanceMode::Incremental);
}

#[test]
fn machine_coordinates_need_rapid_or_linear_without_compensation() {
    assert_eq!(one("G53 G0 X1").fatal, FatalKind::None);
    let p = run(&["G1 G41 F100", "G53 X1"], Settings::default());
    let b = &p.blocks()[1];
    assert_eq!(b.fatal, FatalKind::Syntax);
    assert!(find_diag(b, codes::INVALID_MACHINE_COORDINATES).is_error());
}

#[test]
fn coordinate_system_data_set() {
    let b = one("G10 L2 P2 X1 Y-2");
    assert_eq!(b.fatal, FatalKind::None);
    let origin = b.state.coordinate_systems.get(2).copied().unwrap_or_default();
    assert_eq!(origin[Axis::X], 1.0);
    assert_eq!(origin[Axis::Y], -2.0);
    assert_eq!(b.state.parameters.get(5241), 1.0);
    assert_eq!(b.state.parameters.get(5242), -2.0);
    assert_eq!(b.state.position(Axis::X), 0.0);
    // L2 is recorded but has no modeled effect.
    assert!(diag_codes(&b).contains(&codes::UNMODELED_PARAMETER.to_string()));
}

#[test]
fn coordinate_slot_out_of_range_is_ignored() {
    let b = one("G10 L2 P12 X1");
    assert_eq!(b.fatal, FatalKind::None);
    assert_eq!(
        find_diag(&b, codes::COORDINATE_SLOT_OUT_OF_RANGE).severity,
        Severity::Warn
    );
    assert_eq!(b.state.parameters.get(5221), 0.0);
}

#[test]
fn coordinate_data_without_slot_is_fatal() {
    let b = one("G10 L2 X1");
    assert_eq!(b.fatal, FatalKind::Syntax);
    assert!(find_diag(&b, codes::COORDINATE_DATA_WITHOUT_SLOT).is_error());
}

#[test]
fn block_mode_does_not_leak_into_next_block() {
    let p = run(&["G0 X1", "G92 X5", "X2"], Settings::default());
    assert_eq!(p.last_state().position(Axis::X), 2.0);
    assert_eq!(p.last_state().axis_offsets[Axis::X], 5.0);
}

#[test]
fn axis_offsets_set_zero_and_restore() {
    let p = run(&["G92 X5 Z-1", "G92.2"], Settings::default());
    let s = &p.blocks()[0].state;
    assert_eq!(s.axis_offsets[Axis::X], 5.0);
    assert_eq!(s.parameters.get(AXIS_OFFSETS), 5.0);
    assert_eq!(s.parameters.get(AXIS_OFFSETS + 2), -1.0);

    let s = p.last_state();
    assert_eq!(s.axis_offsets[Axis::X], 0.0);
    assert_eq!(s.parameters.get(AXIS_OFFSETS), 5.0);

    let p = run(&["G92 X5", "G92.2", "G92.3"], Settings::default());
    assert_eq!(p.last_state().axis_offsets[Axis::X], 5.0);

    let p = run(&["G92 X5", "G92.1", "G92.3"], Settings::default());
    assert_eq!(p.last_state().axis_offsets[Axis::X], 0.0);
    assert_eq!(p.last_state().parameters.get(AXIS_OFFSETS), 0.0);
}

#[test]
fn go_home_uses_stored_position() {
    let mut state = MachineState::power_on();
    state.parameters.set(G28_HOME + 2, 10.0);
    state.axes[Axis::X].position = 4.0;
    let b = after(&state, "G28", &Settings::default());
    assert_eq!(b.state.position(Axis::X), 0.0);
    assert_eq!(b.state.position(Axis::Z), 10.0);
    assert_eq!(b.state.modes.motion, MotionMode::Rapid);
    assert_eq!(b.canonical, "G28");
}

#[test]
fn coordinate_system_selection_updates_parameter() {
    let b = one("G59.2");
    assert_eq!(b.state.modes.coordinate_system.slot(), 8);
    assert_eq!(b.state.parameters.get(ACTIVE_COORDINATE_SYSTEM), 8.0);
    let b = one("G55");
    assert_eq!(b.state.modes.coordinate_system.code(), "G55");
}

// ─── M words ─────────────────────────────────────────────────────────────────

#[test]
fn program_end_resets_modes() {
    let p = run(
        &[
            "G20 G91 G1 X1 F100",
            "M3 S1000 M8",
            "G55 G41",
            "G92 Y2",
            "M2",
        ],
        Settings::default(),
    );
    let s = p.last_state();
    assert_eq!(s.modes.motion, MotionMode::None);
    assert_eq!(s.modes.distance, DistanceMode::Absolute);
    assert_eq!(s.modes.spindle, Spindle::Stopped);
    assert_eq!(s.modes.coolant, Coolant::Off);
    assert_eq!(s.modes.coordinate_system.slot(), 1);
    assert_eq!(s.modes.stopping, Stopping::ProgramEnd);
    assert_eq!(s.modes.units, Units::Inches);
    assert_eq!(s.axis_offsets[Axis::Y], 0.0);
    assert_eq!(s.parameters.get(ACTIVE_COORDINATE_SYSTEM), 1.0);
}

#[test]
fn program_end_resets_modes_set_in_the_same_block() {
    let b = one("G0 Z5 M30");
    assert_eq!(b.state.position(Axis::Z), 5.0);
    assert_eq!(b.state.modes.motion, MotionMode::None);
    assert_eq!(b.state.modes.stopping, Stopping::ProgramEndRewind);

    let b = one("G91 M2");
    assert_eq!(b.state.modes.distance, DistanceMode::Absolute);

    let b = one("G55 G92 X3 M2");
    assert_eq!(b.state.modes.coordinate_system.slot(), 1);
    assert_eq!(b.state.axis_offsets[Axis::X], 0.0);
    assert_eq!(b.state.parameters.get(ACTIVE_COORDINATE_SYSTEM), 1.0);
}

#[test]
fn coolant_composite_state() {
    let p = run(&["M7", "M8"], Settings::default());
    assert_eq!(p.last_state().modes.coolant, Coolant::MistAndFlood);
    let p = run(&["M8", "M7", "M7"], Settings::default());
    assert_eq!(p.last_state().modes.coolant, Coolant::MistAndFlood);
    assert_eq!(one("M7 M8 M9").state.modes.coolant, Coolant::Off);
}

#[test]
fn tool_change_stops_spindle() {
    let p = run(&["M3 S100", "T1 M6"], Settings::default());
    let s = p.last_state();
    assert_eq!(s.modes.spindle, Spindle::Stopped);
    assert_eq!(s.modes.tool_change, ToolChange::Requested);
    assert_eq!(s.tool, Some(1.0));
}

#[test]
fn unknown_codes_are_kept_with_warnings() {
    let b = one("G7");
    assert_eq!(b.canonical, "G7");
    assert_eq!(find_diag(&b, codes::UNKNOWN_G_CODE).severity, Severity::Warn);
    let b = one("M100");
    assert_eq!(b.canonical, "M100");
    assert_eq!(find_diag(&b, codes::UNKNOWN_M_CODE).severity, Severity::Warn);
    assert_eq!(b.fatal, FatalKind::None);
}

// ─── Scalar words ────────────────────────────────────────────────────────────

#[test]
fn redundant_tool_is_dropped() {
    let p = run(&["T5", "T5"], Settings::default());
    let b = &p.blocks()[1];
    assert_eq!(b.canonical, "");
    assert_eq!(find_diag(b, codes::REDUNDANT_TOOL).severity, Severity::Warn);
    assert_eq!(p.last_state().tool, Some(5.0));
    assert_eq!(b.fatal, FatalKind::None);
}

#[test]
fn negative_spindle_speed_is_dropped() {
    let p = run(&["S1000", "S-5"], Settings::default());
    assert_eq!(p.blocks()[1].canonical, "");
    assert_eq!(p.last_state().spindle_speed, 1000.0);
    assert!(diag_codes(&p.blocks()[1]).contains(&codes::NEGATIVE_SPINDLE_SPEED.to_string()));
}

#[test]
fn parameter_words_are_recorded_only() {
    let b = one("G0 X1 I2 Q0.5");
    assert_eq!(b.canonical, "G0 I2 Q0.5 X1");
    let infos = b
        .diagnostics
        .iter()
        .filter(|d| &*d.id == codes::UNMODELED_PARAMETER)
        .count();
    assert_eq!(infos, 2);
}

#[test]
fn line_numbers_are_tracked() {
    assert_eq!(one("N120 G0").state.line_number, Some(120.0));
}

#[test]
fn dwell_time() {
    assert_eq!(one("G4 P1.5").dwell, Some(1.5));
    let b = one("G4");
    assert_eq!(b.dwell, None);
    assert_eq!(find_diag(&b, codes::DWELL_WITHOUT_P).severity, Severity::Warn);
}

#[test]
fn unknown_letters_are_kept_after_z() {
    let b = one("E5 G0 X1");
    assert_eq!(b.canonical, "G0 X1 E5");
    assert_eq!(diag_codes(&b), [codes::UNKNOWN_WORD.to_string()]);
}

#[test]
fn letterless_unknowns_stay_ahead_of_words() {
    let b = one("#1=2 G0 X5");
    assert_eq!(b.canonical, "#1=2 G0 X5");
    assert_eq!(b.state.position(Axis::X), 5.0);
    assert_eq!(diag_codes(&b), [codes::UNKNOWN_WORD.to_string()]);

    let b = one("12 G0");
    assert_eq!(b.canonical, "12 G0");
    assert_eq!(b.state.modes.motion, MotionMode::Rapid);

    let b = one("% 7 g1 f5");
    assert_eq!(b.canonical, "% 7 G1 F5");
}

#[test]
fn letterless_unknown_behind_stray_slash_stays_there() {
    let b = one("G0 / 7 X1");
    assert_eq!(b.canonical, "G0 X1 / 7");
    let again = one(&b.canonical);
    assert_eq!(again.canonical, b.canonical);
    assert_eq!(again.state.position(Axis::X), 1.0);
}

#[test]
fn non_finite_value_is_fatal_unknown() {
    let line = format!("G0 X{}", "9".repeat(400));
    let b = one(&line);
    assert_eq!(b.fatal, FatalKind::Unknown);
    assert!(find_diag(&b, codes::NON_FINITE_VALUE).is_error());
}

// ─── Block delete ────────────────────────────────────────────────────────────

#[test]
fn block_delete_switch_skips_evaluation() {
    let settings = Settings {
        block_delete: true,
        ..Settings::default()
    };
    let p = run(&["/G0 X5 (skip me)"], settings);
    let b = &p.blocks()[0];
    assert!(b.deleted);
    assert_eq!(b.canonical, "/G0 X5 (skip me)");
    assert_eq!(b.state.position(Axis::X), 0.0);
    assert_eq!(find_diag(b, codes::BLOCK_DELETED).severity, Severity::Info);
}

#[test]
fn block_delete_marker_without_switch_evaluates() {
    let b = one("/ g0 x5");
    assert!(!b.deleted);
    assert_eq!(b.canonical, "/G0 X5");
    assert_eq!(b.state.position(Axis::X), 5.0);
}

#[test]
fn slash_after_first_token_is_unknown() {
    let b = one("G0 / X5");
    assert!(!b.words.block_delete);
    assert_eq!(b.canonical, "G0 X5 /");
    assert!(diag_codes(&b).contains(&codes::UNKNOWN_WORD.to_string()));
}

// ─── Spans ───────────────────────────────────────────────────────────────────

#[test]
fn diagnostics_point_at_their_word() {
    let p = run(&["T5", "G0   T5"], Settings::default());
    let d = find_diag(&p.blocks()[1], codes::REDUNDANT_TOOL);
    let span = d.span.expect("span");
    assert_eq!((span.start, span.end), (5, 7));
}
