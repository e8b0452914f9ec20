//! Program chain: state threading, segment and layer counters, and the
//! envelope.

mod common;

use common::{final_position, outputs, run};
use gcode_toolchain_core::state::{DistanceMode, MotionMode, Units};
use gcode_toolchain_core::{
    Axis, BlockOrigin, LineIndex, MachineState, Program, Settings, codes,
};

#[test]
fn modal_groups_persist_until_changed() {
    let p = run(&["G20", "G91", "G0 X1", "M3", "G90"], Settings::default());
    let blocks = p.blocks();
    for block in &blocks[..4] {
        assert_eq!(block.state.modes.units, Units::Inches);
    }
    assert_eq!(blocks[3].state.modes.distance, DistanceMode::Incremental);
    assert_eq!(blocks[4].state.modes.distance, DistanceMode::Absolute);
    assert_eq!(blocks[4].state.modes.motion, MotionMode::Rapid);
}

#[test]
fn each_block_starts_from_its_predecessor() {
    let p = run(&["G0 X1", "G1 Y2 F50", "Z-1"], Settings::default());
    assert_eq!(p.state_before(0), &MachineState::power_on());
    for i in 1..p.blocks().len() {
        assert_eq!(p.state_before(i), &p.blocks()[i - 1].state);
    }
}

#[test]
fn blocks_are_indexed_and_tagged_with_source_lines() {
    let p = Program::from_str("G0 X1\n\nG0 X2\n", Settings::default());
    assert_eq!(p.lines_read(), 3);
    for (i, block) in p.blocks().iter().enumerate() {
        assert_eq!(block.index, i);
        assert_eq!(block.origin, BlockOrigin::Source { line: i });
    }
    assert_eq!(p.blocks()[1].canonical, "");
    assert_eq!(final_position(&p, Axis::X), 2.0);
}

#[test]
fn empty_program_has_power_on_state() {
    let p = Program::from_str("", Settings::default());
    assert!(p.blocks().is_empty());
    assert_eq!(p.last_state(), &MachineState::power_on());
    assert!(!p.has_fatal());
}

#[test]
fn earlier_blocks_are_unchanged_by_later_ones() {
    let mut p = run(&["G0 X1"], Settings::default());
    let first = p.blocks()[0].clone();
    assert_eq!(p.push_line("G1 X5 F10"), 1);
    assert_eq!(p.blocks()[0], first);
}

// ─── Segments and layers ─────────────────────────────────────────────────────

fn counters(p: &Program) -> Vec<(u32, u32, u32)> {
    p.blocks()
        .iter()
        .map(|b| (b.segment(), b.segment_next(), b.layer()))
        .collect()
}

#[test]
fn segments_advance_after_retract_and_layers_on_new_depth() {
    let p = run(
        &[
            "G0 Z5",
            "G1 Z-1 F100",
            "G1 X10",
            "G0 Z5",
            "G1 Z-2",
            "G0 Z5",
        ],
        Settings::default(),
    );
    assert_eq!(
        counters(&p),
        [
            (0, 0, 1),
            (0, 0, 2),
            (0, 0, 2),
            (0, 1, 2),
            (1, 1, 3),
            (1, 2, 3),
        ]
    );
    assert_eq!(p.last_state().progress.deepest_cut, Some(-2.0));
}

#[test]
fn revisiting_a_depth_is_not_a_new_layer() {
    let p = run(
        &["G0 Z1", "G1 Z-1 F100", "G0 Z1", "G1 Z-1", "G1 Z-0.5"],
        Settings::default(),
    );
    let layers: Vec<u32> = p.blocks().iter().map(|b| b.layer()).collect();
    assert_eq!(layers, [1, 2, 2, 2, 2]);
}

#[test]
fn reference_plane_moves_the_retract_threshold() {
    let settings = Settings {
        reference_plane: 2.0,
        ..Settings::default()
    };
    let p = run(&["G0 Z1", "G1 Z-1 F100", "G0 Z1.5", "G0 Z2"], settings);
    let next: Vec<u32> = p.blocks().iter().map(|b| b.segment_next()).collect();
    assert_eq!(next, [0, 0, 0, 1]);
}

#[test]
fn annotation_carries_counters() {
    let settings = Settings {
        annotate: true,
        ..Settings::default()
    };
    let p = run(&["G0 Z5", "G1 Z-1.5 F100"], settings);
    assert_eq!(
        outputs(&p),
        [
            "G0 Z5 (seg 0 layer 1 depth 5)",
            "G1 F100 Z-1.5 (seg 0 layer 2 depth -1.5)",
        ]
    );
    assert_eq!(p.blocks()[1].canonical, "G1 F100 Z-1.5");
}

// ─── Envelope ────────────────────────────────────────────────────────────────

#[test]
fn envelope_includes_origin_and_every_position() {
    let p = run(
        &["G0 X10 Y-5", "G1 Z-2 F100", "G0 Z3 X4"],
        Settings::default(),
    );
    let env = p.envelope();
    assert_eq!(env.min[Axis::X], 0.0);
    assert_eq!(env.max[Axis::X], 10.0);
    assert_eq!(env.min[Axis::Y], -5.0);
    assert_eq!(env.max[Axis::Y], 0.0);
    assert_eq!(env.min[Axis::Z], -2.0);
    assert_eq!(env.max[Axis::Z], 3.0);
}

// ─── Source diagnostics ──────────────────────────────────────────────────────

#[test]
fn source_diagnostics_are_rebased_to_the_input() {
    let input = "G0 X1\nT5\nT5\n";
    let p = Program::from_str(input, Settings::default());
    let index = LineIndex::new(input);
    let diags = p.source_diagnostics(&index);
    let redundant = diags
        .iter()
        .find(|d| &*d.id == codes::REDUNDANT_TOOL)
        .expect("redundant tool diagnostic");
    let span = redundant.span.expect("span");
    assert_eq!((span.start, span.end), (9, 11));
    assert_eq!(&input[span.start..span.end], "T5");
}
