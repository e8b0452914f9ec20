use crate::block::{Block, BlockOrigin, FatalKind};
use crate::program::Program;
use crate::state::{Axis, AxisValues};
use gcode_toolchain_diagnostics::Diagnostic;
use serde::Serialize;

/// Per-block trace: source and result text, counters, and axis tracking.
#[derive(Debug, Clone, Serialize)]
pub struct BlockTrace<'a> {
    /// Position in the program chain.
    pub index: usize,
    /// Where the block came from.
    pub origin: BlockOrigin,
    /// Source text.
    pub source: &'a str,
    /// Output text.
    pub output: &'a str,
    /// Segment number.
    pub segment: u32,
    /// Layer counter.
    pub layer: u32,
    /// Deepest Z so far.
    pub deepest_cut: Option<f64>,
    /// Positions after the block.
    pub position: AxisValues,
    /// Last G1 targets.
    pub last_linear: AxisValues,
    /// Last G0 targets.
    pub last_rapid: AxisValues,
    /// Fatal classification.
    pub fatal: FatalKind,
    /// Diagnostics, spans relative to `source`.
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> BlockTrace<'a> {
    /// Build the trace of one block.
    pub fn new(block: &'a Block) -> Self {
        let axes = &block.state.axes;
        let mut last_linear = AxisValues::default();
        let mut last_rapid = AxisValues::default();
        for axis in Axis::ALL {
            last_linear[axis] = axes[axis].last_linear;
            last_rapid[axis] = axes[axis].last_rapid;
        }
        Self {
            index: block.index,
            origin: block.origin,
            source: &block.source,
            output: &block.output,
            segment: block.segment(),
            layer: block.layer(),
            deepest_cut: block.state.progress.deepest_cut,
            position: axes.positions(),
            last_linear,
            last_rapid,
            fatal: block.fatal,
            diagnostics: &block.diagnostics,
        }
    }
}

/// Traces for every block of `program`.
pub fn trace(program: &Program) -> Vec<BlockTrace<'_>> {
    program.blocks().iter().map(BlockTrace::new).collect()
}

/// Serialize a value (a [`Program`], [`Block`], or traces) to pretty JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
