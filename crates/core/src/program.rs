//! Program chain: the ordered, append-only history of processed blocks.

use crate::block::{Block, BlockOrigin, process_block};
use crate::grammar::diag::{Diagnostic, LineIndex};
use crate::state::{Axis, AxisValues, MachineState};
use gcode_toolchain_settings::Settings;
use serde::Serialize;

/// Per-axis extent of every position the program visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Envelope {
    /// Smallest position per axis.
    pub min: AxisValues,
    /// Largest position per axis.
    pub max: AxisValues,
}

impl Envelope {
    fn include(&mut self, position: &AxisValues) {
        for axis in Axis::ALL {
            self.min[axis] = self.min[axis].min(position[axis]);
            self.max[axis] = self.max[axis].max(position[axis]);
        }
    }
}

/// A processed program.
///
/// Block `i` is built from block `i - 1`'s final state (or the power-on
/// state for block 0) plus one line of text. Blocks are never modified
/// once appended.
#[derive(Debug, Clone, Serialize)]
pub struct Program {
    settings: Settings,
    initial: MachineState,
    blocks: Vec<Block>,
    lines_read: usize,
}

impl Program {
    /// An empty program starting from the power-on state.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            initial: MachineState::power_on(),
            blocks: Vec::new(),
            lines_read: 0,
        }
    }

    /// Process every line of `input`.
    pub fn from_str(input: &str, settings: Settings) -> Self {
        let mut program = Self::new(settings);
        for line in input.lines() {
            program.push_line(line);
        }
        program
    }

    /// Process one input line and append its block, followed by any blocks
    /// an optimization inserts after it. Returns the number of blocks
    /// appended.
    pub fn push_line(&mut self, line: &str) -> usize {
        let source_line = self.lines_read;
        self.lines_read += 1;
        let before = self.blocks.len();

        let evaluation = process_block(
            self.last_state(),
            line,
            &self.settings,
            BlockOrigin::Source { line: source_line },
        );
        self.append(evaluation.block);
        for text in evaluation.follow_on {
            let synthetic = process_block(
                self.last_state(),
                &text,
                &self.settings,
                BlockOrigin::Synthetic { after: source_line },
            );
            self.append(synthetic.block);
        }
        self.blocks.len() - before
    }

    fn append(&mut self, mut block: Block) {
        block.index = self.blocks.len();
        log::debug!("block {}: {:?}", block.index, block.canonical);
        if block.fatal.is_fatal() && !self.has_fatal() {
            log::debug!(
                "block {} is fatal ({:?}); later state is advisory",
                block.index,
                block.fatal
            );
        }
        self.blocks.push(block);
    }

    /// Settings the program was processed with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at position `index`.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Number of input lines consumed.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// The state block `index` started from.
    pub fn state_before(&self, index: usize) -> &MachineState {
        match index.checked_sub(1).and_then(|i| self.blocks.get(i)) {
            Some(block) => &block.state,
            None => &self.initial,
        }
    }

    /// State after the most recent block, or the power-on state.
    pub fn last_state(&self) -> &MachineState {
        self.blocks.last().map_or(&self.initial, |b| &b.state)
    }

    /// `true` if any block is fatal.
    pub fn has_fatal(&self) -> bool {
        self.blocks.iter().any(|b| b.fatal.is_fatal())
    }

    /// The first fatal block.
    pub fn first_fatal(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.fatal.is_fatal())
    }

    /// Extent of all positions, including the power-on origin.
    pub fn envelope(&self) -> Envelope {
        let mut envelope = Envelope::default();
        for block in &self.blocks {
            envelope.include(&block.state.axes.positions());
        }
        envelope
    }

    /// Every diagnostic, with spans re-based from block-relative offsets to
    /// offsets in the text the program was read from.
    ///
    /// Synthetic blocks have no source text; their diagnostics carry no span.
    pub fn source_diagnostics(&self, index: &LineIndex) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for block in &self.blocks {
            for diag in &block.diagnostics {
                let mut diag = diag.clone();
                diag.span = match block.origin {
                    BlockOrigin::Source { line } => {
                        diag.span.and_then(|span| index.rebase(line, span))
                    }
                    BlockOrigin::Synthetic { .. } => None,
                };
                out.push(diag);
            }
        }
        out
    }
}
