//! G-code toolchain core library.
//!
//! Replays G-code blocks through a persistent machine-state model and
//! re-emits each one in canonical form, optionally dropping redundant words
//! and rewriting retract/plunge sequences. The main entry points are
//! [`Program::from_str`] for whole programs, [`process_block`] for a single
//! block, and [`emit_program`] for output.

#![warn(missing_docs)]

/// Block processor: one line in, one immutable [`Block`] out.
pub mod block;
mod eval;
/// Tokenizer, words, emitter, and related utilities.
pub mod grammar;
/// Retract/plunge rewriting.
pub mod optimize;
/// Program chain.
pub mod program;
/// Machine state threaded from block to block.
pub mod state;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Blocks and programs
pub use block::{Block, BlockOrigin, Evaluation, FatalKind, process_block};
pub use program::{Envelope, Program};

// State
pub use state::{Axis, MachineState, ModalGroups, MotionMode};

// Emitter
pub use grammar::emit::{EmitConfig, TextKind, emit_block, emit_program};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, LineIndex, Severity, Span, codes};

// Settings (re-exported from the settings crate)
pub use gcode_toolchain_settings::{Settings, SettingsError, load_settings_from_str};

// Serialization helpers
pub use grammar::dump::{BlockTrace, to_pretty_json, trace};
