//! Terminal rendering of block diagnostics with ariadne.
//!
//! A block is one source line, so each block with findings becomes one
//! report with a label per word. Blocks inserted by the retract optimizer
//! have no text of their own and are listed against the line they follow.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use gcode_toolchain_core::grammar::word::format_value;
use gcode_toolchain_core::{Axis, Block, BlockOrigin, Envelope, LineIndex, Program};
use gcode_toolchain_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stdout is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Severity styling ────────────────────────────────────────────────────

fn rank(severity: &Severity) -> u8 {
    match severity {
        Severity::Error => 2,
        Severity::Info => 0,
        _ => 1,
    }
}

fn style(severity: &Severity) -> (ReportKind<'static>, Color) {
    match severity {
        Severity::Error => (ReportKind::Error, Color::Red),
        Severity::Info => (ReportKind::Advice, Color::Blue),
        _ => (ReportKind::Warning, Color::Yellow),
    }
}

fn label_text(diag: &Diagnostic) -> String {
    match diag.context.as_ref().filter(|ctx| !ctx.is_empty()) {
        Some(ctx) => {
            let pairs: Vec<String> = ctx.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{} ({})", diag.message, pairs.join(", "))
        }
        None => diag.message.clone(),
    }
}

// ── Counts ──────────────────────────────────────────────────────────────

/// Rendered diagnostics by severity.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counts {
    errors: usize,
    warnings: usize,
    infos: usize,
}

impl Counts {
    fn add(&mut self, severity: &Severity) {
        match rank(severity) {
            2 => self.errors += 1,
            0 => self.infos += 1,
            _ => self.warnings += 1,
        }
    }

    /// `2 errors, 1 warning, 3 info` on stderr; nothing when all are zero.
    pub(crate) fn print(&self) {
        let plural = |n: usize| if n == 1 { "" } else { "s" };
        let mut parts = Vec::new();
        if self.errors > 0 {
            let text = format!("{} error{}", self.errors, plural(self.errors));
            parts.push(text.fg(Color::Red).to_string());
        }
        if self.warnings > 0 {
            let text = format!("{} warning{}", self.warnings, plural(self.warnings));
            parts.push(text.fg(Color::Yellow).to_string());
        }
        if self.infos > 0 {
            parts.push(format!("{} info", self.infos).fg(Color::Blue).to_string());
        }
        if !parts.is_empty() {
            eprintln!("{}", parts.join(", "));
        }
    }
}

// ── Block reports ───────────────────────────────────────────────────────

/// Render every block's diagnostics to stderr, skipping `Info` unless
/// `with_info` is set.
pub(crate) fn render_blocks(
    source: &str,
    filename: &str,
    program: &Program,
    with_info: bool,
) -> Counts {
    let index = LineIndex::new(source);
    let mut cache = (filename, Source::from(source));
    let mut counts = Counts::default();

    for block in program.blocks() {
        let shown: Vec<&Diagnostic> = block
            .diagnostics
            .iter()
            .filter(|d| with_info || rank(&d.severity) > 0)
            .collect();
        let Some(worst) = shown.iter().copied().max_by_key(|d| rank(&d.severity)) else {
            continue;
        };
        for diag in &shown {
            counts.add(&diag.severity);
        }

        match block.origin {
            BlockOrigin::Source { line } => {
                let report = block_report(source.len(), filename, &index, line, worst, &shown);
                report.eprint(&mut cache).ok();
            }
            BlockOrigin::Synthetic { after } => print_synthetic(block, after, &shown),
        }
    }
    counts
}

fn block_report<'a>(
    source_len: usize,
    filename: &'a str,
    index: &LineIndex,
    line: usize,
    worst: &Diagnostic,
    shown: &[&Diagnostic],
) -> Report<'static, (&'a str, std::ops::Range<usize>)> {
    // Clamp so a span past the end of the text cannot panic ariadne.
    let range = |diag: &Diagnostic| {
        let span = diag.span.and_then(|s| index.rebase(line, s));
        let start = span.map_or(0, |s| s.start).min(source_len);
        let end = span.map_or(start, |s| s.end).clamp(start, source_len);
        start..end
    };

    let (kind, _) = style(&worst.severity);
    let mut builder = Report::build(kind, (filename, range(worst)))
        .with_code(worst.id.as_ref())
        .with_message(format!("line {}: {}", line + 1, worst.message))
        .with_config(Config::default().with_compact(false));
    for diag in shown {
        let (_, color) = style(&diag.severity);
        builder = builder.with_label(
            Label::new((filename, range(diag)))
                .with_message(format!("{}: {}", diag.id, label_text(diag)))
                .with_color(color),
        );
    }
    if let Some(explanation) = worst.explain() {
        builder = builder.with_help(explanation);
    }
    builder.finish()
}

fn print_synthetic(block: &Block, after: usize, shown: &[&Diagnostic]) {
    eprintln!(
        "{} (inserted after line {})",
        block.canonical.as_str().fg(Color::Cyan),
        after + 1
    );
    for diag in shown {
        eprintln!("  {}[{}]: {}", diag.severity, diag.id, label_text(diag));
    }
}

// ── Envelope ────────────────────────────────────────────────────────────

/// Print the per-axis travel range to stderr, one axis per line.
///
/// Axes that never leave zero are omitted.
pub(crate) fn print_envelope(envelope: &Envelope) {
    for axis in Axis::ALL {
        let (min, max) = (envelope.min[axis], envelope.max[axis]);
        if min == 0.0 && max == 0.0 {
            continue;
        }
        eprintln!(
            "{}: {} .. {}",
            axis.to_string().fg(Color::Cyan),
            format_value(min),
            format_value(max)
        );
    }
}
