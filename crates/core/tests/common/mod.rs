//! Shared test helpers for `gcode_toolchain_core` integration tests.

#![allow(unreachable_pub)]

use gcode_toolchain_core::{
    Axis, Block, BlockOrigin, Diagnostic, MachineState, Program, Settings, process_block,
};

// ─── Settings fixtures ───────────────────────────────────────────────────────

/// Settings with redundant-motion suppression on.
#[allow(dead_code)]
pub fn suppressing() -> Settings {
    Settings {
        suppress_redundant_motion: true,
        ..Settings::default()
    }
}

/// Settings with retract optimization on.
#[allow(dead_code)]
pub fn optimizing() -> Settings {
    Settings {
        optimize_retracts: true,
        ..Settings::default()
    }
}

// ─── Program helpers ─────────────────────────────────────────────────────────

/// Process `lines` as one program.
#[allow(dead_code)]
pub fn run(lines: &[&str], settings: Settings) -> Program {
    let mut program = Program::new(settings);
    for line in lines {
        program.push_line(line);
    }
    program
}

/// Process a single line from the power-on state with default settings.
#[allow(dead_code)]
pub fn one(line: &str) -> Block {
    process_block(
        &MachineState::power_on(),
        line,
        &Settings::default(),
        BlockOrigin::Source { line: 0 },
    )
    .block
}

/// Process a single line from `state` with `settings`.
#[allow(dead_code)]
pub fn after(state: &MachineState, line: &str, settings: &Settings) -> Block {
    process_block(state, line, settings, BlockOrigin::Source { line: 0 }).block
}

/// Output text of every block.
#[allow(dead_code)]
pub fn outputs(program: &Program) -> Vec<String> {
    program.blocks().iter().map(|b| b.output.clone()).collect()
}

/// Final position of `axis`.
#[allow(dead_code)]
pub fn final_position(program: &Program, axis: Axis) -> f64 {
    program.last_state().position(axis)
}

// ─── Diagnostic helpers ──────────────────────────────────────────────────────

/// Collect diagnostic codes from a block.
#[allow(dead_code)]
pub fn diag_codes(block: &Block) -> Vec<String> {
    block.diagnostics.iter().map(|d| d.id.to_string()).collect()
}

/// Find the first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(block: &'a Block, code: &str) -> &'a Diagnostic {
    block
        .diagnostics
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code} in {:?}", block.diagnostics))
}

/// Assert that `block` carries no diagnostic with `code`.
#[allow(dead_code)]
pub fn assert_no_diag(block: &Block, code: &str) {
    assert!(
        !block.diagnostics.iter().any(|d| &*d.id == code),
        "unexpected diagnostic {code}: {:?}",
        block.diagnostics
    );
}

// ─── Samples ─────────────────────────────────────────────────────────────────

/// Repository `samples/` directory.
#[allow(dead_code)]
pub fn samples_dir() -> std::path::PathBuf {
    let mut root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/core -> repo root
    root.pop();
    root.pop();
    root.join("samples")
}
