//! Diagnostics for the G-code toolchain.
//!
//! Every block carries its own [`Diagnostic`]s with spans measured inside
//! that block's line. [`LineIndex`] moves those spans onto the full input
//! for rendering. Codes live in [`codes`].

#![warn(missing_docs)]

/// Diagnostic ID constants (`GCxxxx`).
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

// ── LineIndex ────────────────────────────────────────────────────────────

/// Byte offset of every line start in a program text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Index the line starts of `text`. Line 0 always starts at 0.
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { line_starts }
    }

    /// Move a span measured inside 0-based `line` onto the whole text.
    ///
    /// Returns `None` when the text has no such line.
    pub fn rebase(&self, line: usize, span: Span) -> Option<Span> {
        self.line_starts.get(line).map(|&start| span.shifted(start))
    }
}

// ── Severity / Span ──────────────────────────────────────────────────────

/// How much a diagnostic matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Fatal: machine state after this block is unreliable.
    Error,
    /// The word was rejected or may produce unexpected results.
    Warn,
    /// Informational note (suppressed or rewritten words).
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
        })
    }
}

/// Half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for end-of-block problems.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The same span `offset` bytes further right.
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

// ── Diagnostic ───────────────────────────────────────────────────────────

/// One finding about a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Code from [`codes`], e.g. `"GC1101"`.
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// The word or position the finding is about. Blocks inserted by the
    /// retract optimizer have no source text and leave this empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Structured details (`"axis"`, `"mode"`, `"slot"`, ...), sorted by key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic without context.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Info, message, span)
    }

    /// Attach structured context.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Long-form explanation of this diagnostic's code.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }

    /// `true` for [`Severity::Error`], which only fatal blocks produce.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Long-form explanation for a diagnostic code. Every constant in
/// [`codes`] has one.
pub fn explain(id: &str) -> Option<&'static str> {
    codes::describe(id)
}
