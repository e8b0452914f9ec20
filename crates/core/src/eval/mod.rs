//! Word evaluator: per-letter handlers that update the machine state and
//! decide, word by word, whether the word is retained.
//!
//! G4, G10, G53, and G92 change how later words in the same block are read.
//! That cross-word state lives in [`BlockMode`], which is owned by the
//! evaluator and therefore discarded with it at block end.

macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

mod axis;
mod gcode;
mod mcode;

use crate::block::{BlockOrigin, FatalKind};
use crate::grammar::diag::{Diagnostic, Severity, Span, codes};
use crate::grammar::word::{BlockWords, Letter, format_value};
use crate::optimize::PlungeRewrite;
use crate::state::{Axis, CutterCompensation, FeedMode, MachineState, MotionMode};
use gcode_toolchain_settings::Settings;

/// How words after a G4, G10, G53, or G92 in the same block are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockMode {
    Normal,
    /// G4: the next P is the dwell time.
    Dwell,
    /// G10 before its P word.
    AwaitingSlot,
    /// G10 with a valid slot: axis words set that slot's origin.
    CoordinateData { slot: u8 },
    /// G10 with an invalid slot: axis words are ignored.
    DiscardCoordinateData,
    /// G92: axis words set axis offsets.
    AxisOffset,
    /// G53: axis words are absolute machine positions.
    MachineCoordinates,
}

/// Whether a word is re-emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Keep,
    Drop,
}

pub(crate) struct Evaluator<'a> {
    pub(crate) state: MachineState,
    pub(crate) words: BlockWords,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) fatal: FatalKind,
    pub(crate) dwell: Option<f64>,
    pub(crate) plunge: Option<PlungeRewrite>,
    settings: &'a Settings,
    origin: BlockOrigin,
    mode: BlockMode,
    dwell_requested: bool,
    machine_coordinates: bool,
    feed_required: bool,
    feed_seen: bool,
    program_end: bool,
    retracted: bool,
    axis_letters: [bool; 6],
    span: Span,
}

impl<'a> Evaluator<'a> {
    /// Start a block from a copy of the previous block's final state.
    pub(crate) fn new(prior: &MachineState, settings: &'a Settings, origin: BlockOrigin) -> Self {
        let mut state = prior.clone();
        state.progress.segment = prior.progress.segment_next;
        Self {
            state,
            words: BlockWords::default(),
            diagnostics: Vec::new(),
            fatal: FatalKind::None,
            dwell: None,
            plunge: None,
            settings,
            origin,
            mode: BlockMode::Normal,
            dwell_requested: false,
            machine_coordinates: false,
            feed_required: false,
            feed_seen: false,
            program_end: false,
            retracted: false,
            axis_letters: [false; 6],
            span: Span::empty(0),
        }
    }

    /// Record which axis letters appear anywhere in the block, before any
    /// word is evaluated.
    pub(crate) fn note_axis_letter(&mut self, axis: Axis) {
        self.axis_letters[axis.index()] = true;
    }

    /// Evaluate one recognized word and retain it unless a handler drops it.
    pub(crate) fn evaluate(&mut self, letter: Letter, value: f64, span: Span) {
        self.span = span;
        if !value.is_finite() {
            self.fatal(
                FatalKind::Unknown,
                codes::NON_FINITE_VALUE,
                format!("{letter} value is not a finite number"),
            );
            self.words.push(letter, value);
            return;
        }
        if self.dispatch(letter, value) == Disposition::Keep {
            self.words.push(letter, value);
        }
    }

    fn dispatch(&mut self, letter: Letter, value: f64) -> Disposition {
        if let Some(axis) = Axis::from_letter(letter) {
            return self.apply_axis(axis, value);
        }
        match letter {
            Letter::G => self.apply_g(value),
            Letter::M => self.apply_m(value),
            Letter::F => self.apply_feed(value),
            Letter::S => self.apply_spindle_speed(value),
            Letter::T => self.apply_tool(value),
            Letter::P => self.apply_p(value),
            Letter::N => {
                self.state.line_number = Some(value);
                Disposition::Keep
            }
            _ => {
                self.note(
                    Severity::Info,
                    codes::UNMODELED_PARAMETER,
                    format!("{letter}{} has no modeled effect", format_value(value)),
                );
                Disposition::Keep
            }
        }
    }

    // ── Scalar words ────────────────────────────────────────────────────

    fn apply_feed(&mut self, value: f64) -> Disposition {
        self.state.feed = value;
        self.feed_seen = true;
        Disposition::Keep
    }

    fn apply_spindle_speed(&mut self, value: f64) -> Disposition {
        if value < 0.0 {
            self.note(
                Severity::Warn,
                codes::NEGATIVE_SPINDLE_SPEED,
                format!(
                    "negative spindle speed S{} dropped; S{} remains in effect",
                    format_value(value),
                    format_value(self.state.spindle_speed)
                ),
            );
            return Disposition::Drop;
        }
        self.state.spindle_speed = value;
        Disposition::Keep
    }

    fn apply_tool(&mut self, value: f64) -> Disposition {
        if self.state.tool == Some(value) {
            self.note(
                Severity::Warn,
                codes::REDUNDANT_TOOL,
                format!("tool T{} is already selected", format_value(value)),
            );
            return Disposition::Drop;
        }
        self.state.tool = Some(value);
        Disposition::Keep
    }

    fn apply_p(&mut self, value: f64) -> Disposition {
        match self.mode {
            BlockMode::Dwell => {
                self.dwell = Some(value);
                self.mode = BlockMode::Normal;
            }
            BlockMode::AwaitingSlot => {
                let slot = value.trunc();
                if (1.0..=9.0).contains(&slot) {
                    self.mode = BlockMode::CoordinateData { slot: slot as u8 };
                } else {
                    self.mode = BlockMode::DiscardCoordinateData;
                    let diag = Diagnostic::warn(
                        codes::COORDINATE_SLOT_OUT_OF_RANGE,
                        format!(
                            "coordinate system P{} is out of range (1-9); axis data ignored",
                            format_value(value)
                        ),
                        Some(self.span),
                    )
                    .with_context(ctx!("slot" => format_value(value), "min" => "1", "max" => "9"));
                    self.diagnostics.push(diag);
                }
            }
            _ => {}
        }
        Disposition::Keep
    }

    // ── Diagnostics ─────────────────────────────────────────────────────

    pub(crate) fn note(&mut self, severity: Severity, id: &'static str, message: String) {
        self.diagnostics
            .push(Diagnostic::new(id, severity, message, Some(self.span)));
    }

    /// Record an error. The first fatal classification in a block wins.
    pub(crate) fn fatal(&mut self, kind: FatalKind, id: &'static str, message: String) {
        if self.fatal == FatalKind::None {
            self.fatal = kind;
        }
        self.note(Severity::Error, id, message);
    }

    // ── End of block ────────────────────────────────────────────────────

    /// Block-level checks once every word has been evaluated.
    pub(crate) fn finish_block(&mut self, end: usize) {
        self.span = Span::empty(end);
        self.mode = BlockMode::Normal;

        if self.machine_coordinates {
            let modes = &self.state.modes;
            let valid = matches!(modes.motion, MotionMode::Rapid | MotionMode::Linear)
                && modes.cutter_compensation == CutterCompensation::Off;
            if !valid {
                let message = format!(
                    "G53 needs G0 or G1 with cutter compensation off (motion is {})",
                    modes.motion
                );
                self.fatal(
                    FatalKind::Syntax,
                    codes::INVALID_MACHINE_COORDINATES,
                    message,
                );
            }
        }

        if self.feed_required && !self.feed_seen && self.state.modes.feed == FeedMode::InverseTime
        {
            self.fatal(
                FatalKind::Syntax,
                codes::MISSING_INVERSE_TIME_FEED,
                "feed move under inverse-time mode (G93) has no F word".into(),
            );
        }

        if self.dwell_requested && self.dwell.is_none() {
            self.note(
                Severity::Warn,
                codes::DWELL_WITHOUT_P,
                "G4 dwell has no P word".into(),
            );
        }

        let progress = &mut self.state.progress;
        progress.segment_next = if self.retracted {
            progress.segment + 1
        } else {
            progress.segment
        };

        if self.program_end {
            self.end_program();
        }
    }

    pub(crate) fn is_synthetic(&self) -> bool {
        matches!(self.origin, BlockOrigin::Synthetic { .. })
    }
}
