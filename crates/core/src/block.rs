//! Block processor: one source line in, one immutable [`Block`] out.

use crate::eval::Evaluator;
use crate::grammar::diag::{Diagnostic, Span, codes};
use crate::grammar::emit::{annotate, emit_block};
use crate::grammar::lexer::{TokKind, Token, tokenize};
use crate::grammar::word::{BlockWords, Letter, parse_value};
use crate::state::{Axis, MachineState};
use gcode_toolchain_settings::Settings;
use serde::Serialize;

/// Fatal classification of a block.
///
/// Anything other than [`FatalKind::None`] means the machine state after
/// the block cannot be trusted. Later blocks are still processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FatalKind {
    /// No fatal problem.
    #[default]
    None,
    /// The block uses a feature that is not modeled (arcs, probing, canned cycles).
    Unimplemented,
    /// The block violates a cross-word rule.
    Syntax,
    /// The block could not be classified (non-finite values).
    Unknown,
}

impl FatalKind {
    /// `true` for anything but [`FatalKind::None`].
    pub fn is_fatal(self) -> bool {
        self != FatalKind::None
    }
}

/// Where a block's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BlockOrigin {
    /// Line `line` (0-based) of the input.
    Source {
        /// 0-based input line.
        line: usize,
    },
    /// Inserted by an optimization after input line `after`.
    Synthetic {
        /// 0-based input line whose block produced this one.
        after: usize,
    },
}

impl BlockOrigin {
    /// The input line this block came from, or followed.
    pub fn line(self) -> usize {
        match self {
            BlockOrigin::Source { line } | BlockOrigin::Synthetic { after: line } => line,
        }
    }
}

/// One processed block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// Position in the program chain (set when appended).
    pub index: usize,
    /// Where the text came from.
    pub origin: BlockOrigin,
    /// Source text as given.
    pub source: String,
    /// Retained words.
    pub words: BlockWords,
    /// Canonical re-emission of the retained words.
    pub canonical: String,
    /// Text to output: `canonical`, annotated when enabled.
    pub output: String,
    /// Diagnostics with spans relative to `source`.
    pub diagnostics: Vec<Diagnostic>,
    /// Fatal classification.
    pub fatal: FatalKind,
    /// Dwell time from G4 P.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwell: Option<f64>,
    /// The block was skipped by the block-delete switch.
    pub deleted: bool,
    /// Machine state after this block.
    pub state: MachineState,
}

impl Block {
    /// `true` if the block was inserted by an optimization.
    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, BlockOrigin::Synthetic { .. })
    }

    /// Segment this block belongs to.
    pub fn segment(&self) -> u32 {
        self.state.progress.segment
    }

    /// Segment the next block starts in.
    pub fn segment_next(&self) -> u32 {
        self.state.progress.segment_next
    }

    /// Layer counter after this block.
    pub fn layer(&self) -> u32 {
        self.state.progress.layer
    }
}

/// A processed block plus any lines an optimization wants inserted after it.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The processed block.
    pub block: Block,
    /// Lines to process next, with optimization disabled.
    pub follow_on: Vec<String>,
}

/// Process one line starting from `prior`.
///
/// Never fails: problems are reported as diagnostics and a fatal
/// classification on the returned block. `prior` is cloned, never modified.
pub fn process_block(
    prior: &MachineState,
    line: &str,
    settings: &Settings,
    origin: BlockOrigin,
) -> Evaluation {
    let tokens = tokenize(line);
    let mut eval = Evaluator::new(prior, settings, origin);
    let mut deleted = false;

    let mut words: Vec<(Letter, f64, Span)> = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        // Letterless tokens lex apart only at line start or behind a marker,
        // so they are written first unless a stray `/` still precedes them.
        let after_stray_slash = i > 1 && tokens[i - 1].kind == TokKind::BlockDelete;
        match tok.kind {
            TokKind::Comment => eval.words.comment = Some(tok.normalized()),
            TokKind::ProgramMarker if !deleted => eval.words.program_marker = true,
            TokKind::BlockDelete if i == 0 => {
                eval.words.block_delete = true;
                if settings.block_delete {
                    deleted = true;
                    eval.diagnostics.push(Diagnostic::info(
                        codes::BLOCK_DELETED,
                        "block skipped by block delete",
                        Some(span_of(tok)),
                    ));
                }
            }
            _ if deleted => eval.words.skipped.push(tok.normalized()),
            TokKind::Word => match tok.letter().and_then(Letter::from_char) {
                Some(letter) => {
                    let text = tok.normalized();
                    words.push((letter, parse_value(&text[1..]), span_of(tok)));
                }
                None => {
                    let text = unknown_word(&mut eval.diagnostics, tok);
                    eval.words.unknown.push(text);
                }
            },
            TokKind::Unknown if !after_stray_slash => {
                let text = unknown_word(&mut eval.diagnostics, tok);
                eval.words.leading.push(text);
            }
            _ => {
                let text = unknown_word(&mut eval.diagnostics, tok);
                eval.words.unknown.push(text);
            }
        }
    }

    // Evaluation order depends only on letters, so re-evaluating the
    // canonical text reproduces it. Axis words run last so that G10 P and
    // G4 P are read before any axis data.
    words.sort_by_key(|(letter, _, _)| (Axis::from_letter(*letter).is_some(), *letter));
    for (letter, _, _) in &words {
        if let Some(axis) = Axis::from_letter(*letter) {
            eval.note_axis_letter(axis);
        }
    }
    for (letter, value, span) in words {
        eval.evaluate(letter, value, span);
    }
    if !deleted {
        eval.finish_block(line.trim_end().len());
    }

    let canonical = emit_block(&eval.words);
    let output = if settings.annotate {
        annotate(&canonical, &eval.state.progress)
    } else {
        canonical.clone()
    };
    let follow_on = eval
        .plunge
        .map(|plan| plan.follow_on(eval.state.feed))
        .unwrap_or_default();

    Evaluation {
        block: Block {
            index: 0,
            origin,
            source: line.to_string(),
            words: eval.words,
            canonical,
            output,
            diagnostics: eval.diagnostics,
            fatal: eval.fatal,
            dwell: eval.dwell,
            deleted,
            state: eval.state,
        },
        follow_on,
    }
}

fn span_of(tok: &Token<'_>) -> Span {
    Span::new(tok.start, tok.end)
}

fn unknown_word(diagnostics: &mut Vec<Diagnostic>, tok: &Token<'_>) -> String {
    let text = tok.normalized();
    diagnostics.push(Diagnostic::warn(
        codes::UNKNOWN_WORD,
        format!("unknown word '{text}' kept without effect"),
        Some(span_of(tok)),
    ));
    text
}
