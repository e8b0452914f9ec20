//! Canonical emitter: retained words back to text.
//!
//! Letter order is fixed (`%`, M, G, F, A..Z as declared by [`Letter`]).
//! Unknown tokens without a letter go right after `%`, other unknown words
//! and echoed deleted words after Z, then the comment. Values use
//! [`format_value`]. Re-tokenizing the output yields the same words.
//!
//! [`Letter`]: crate::grammar::word::Letter

use crate::grammar::word::{BlockWords, format_value};
use crate::program::Program;
use crate::state::Progress;

// ── Configuration ───────────────────────────────────────────────────────

/// Which text of each block to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextKind {
    /// The block output, annotated when annotation is enabled.
    #[default]
    Output,
    /// The canonical text without annotation.
    Canonical,
}

/// Configuration for [`emit_program`].
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Which text to write per block.
    pub text: TextKind,
    /// Stop after this many blocks.
    pub limit: Option<usize>,
}

// ── Public API ──────────────────────────────────────────────────────────

/// Canonical text for one block's retained words.
pub fn emit_block(words: &BlockWords) -> String {
    let mut parts: Vec<String> = Vec::new();
    if words.program_marker {
        parts.push("%".to_string());
    }
    parts.extend(words.leading.iter().cloned());
    for (letter, values) in &words.values {
        for value in values {
            parts.push(format!("{letter}{}", format_value(*value)));
        }
    }
    parts.extend(words.unknown.iter().cloned());
    parts.extend(words.skipped.iter().cloned());
    if let Some(comment) = &words.comment {
        parts.push(comment.clone());
    }
    let body = parts.join(" ");
    if words.block_delete {
        format!("/{body}")
    } else {
        body
    }
}

/// Append a `(seg N layer L depth D)` comment to `canonical`.
pub fn annotate(canonical: &str, progress: &Progress) -> String {
    let depth = progress
        .deepest_cut
        .map_or_else(|| "none".to_string(), format_value);
    let note = format!(
        "(seg {} layer {} depth {})",
        progress.segment, progress.layer, depth
    );
    if canonical.is_empty() {
        note
    } else {
        format!("{canonical} {note}")
    }
}

/// Write every block of `program`, one per line, with a trailing newline.
pub fn emit_program(program: &Program, config: &EmitConfig) -> String {
    let limit = config.limit.unwrap_or(usize::MAX);
    let mut out = String::new();
    for block in program.blocks().iter().take(limit) {
        out.push_str(match config.text {
            TextKind::Output => &block.output,
            TextKind::Canonical => &block.canonical,
        });
        out.push('\n');
    }
    out
}
