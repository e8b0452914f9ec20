mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use gcode_toolchain_core::{
    EmitConfig, LineIndex, Program, TextKind, emit_program, to_pretty_json, trace,
};
use gcode_toolchain_diagnostics as diag;
use gcode_toolchain_settings::{Settings, load_settings_from_str};

use crate::render::{Format, print_envelope, render_blocks};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "gcode",
    version,
    about = "G-code toolchain: replay machining programs through a modal state model and re-emit them in canonical form"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the reinterpreted program, one canonical block per line.
    Reflow {
        /// Input file, or `-` for stdin.
        file: String,
        #[command(flatten)]
        settings: SettingsArgs,
        /// Only output the first N blocks.
        #[arg(long, value_name = "N")]
        trim: Option<usize>,
        /// Write the result back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check if the file is already canonical (exit 1 if not). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
    },

    /// Report diagnostics, a summary, and the motion envelope. Exits 1 when
    /// any block is fatal.
    Check {
        /// Input file, or `-` for stdin.
        file: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print a per-block JSON trace: text, counters, and axis tracking.
    Dump {
        /// Input file, or `-` for stdin.
        file: String,
        #[command(flatten)]
        settings: SettingsArgs,
        /// Only trace the first N blocks.
        #[arg(long, value_name = "N")]
        trim: Option<usize>,
    },

    /// Explain a diagnostic ID (e.g. GC1103).
    Explain { id: String },
}

/// Flags shared by every command that processes a program.
#[derive(Args, Debug)]
struct SettingsArgs {
    /// Settings JSON file. Flags below override its fields.
    #[arg(long, value_name = "PATH")]
    settings: Option<String>,
    /// Drop redundant motion-mode words and no-op absolute moves.
    #[arg(long, short)]
    suppress: bool,
    /// Rewrite plunges after a retract into a rapid approach plus a feed.
    #[arg(long, short)]
    retract: bool,
    /// Feed rate for rewritten plunges (default depends on units).
    #[arg(long, short, value_name = "FEED")]
    zfeed: Option<f64>,
    /// Skip blocks that start with `/`.
    #[arg(long)]
    block_delete: bool,
    /// Append segment, layer, and depth comments to each output line.
    #[arg(long, short)]
    annotate: bool,
    /// Z height separating cutting from clearance moves.
    #[arg(long, value_name = "Z", allow_hyphen_values = true)]
    reference_plane: Option<f64>,
}

impl SettingsArgs {
    /// Settings from `--settings` (or defaults) with flag overrides applied.
    fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings file '{path}'"))?;
                load_settings_from_str(&text)
                    .with_context(|| format!("failed to load settings file '{path}'"))?
            }
            None => Settings::default(),
        };
        settings.suppress_redundant_motion |= self.suppress;
        settings.optimize_retracts |= self.retract;
        settings.block_delete |= self.block_delete;
        settings.annotate |= self.annotate;
        if let Some(feed) = self.zfeed {
            settings.plunge_feed_override = feed;
        }
        if let Some(z) = self.reference_plane {
            settings.reference_plane = z;
        }
        settings.validate().context("invalid settings")?;
        log::debug!("settings: {settings:?}");
        Ok(settings)
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Reflow {
            file,
            settings,
            trim,
            write,
            check,
        } => cmd_reflow(&file, &settings.resolve()?, trim, write, check, format)?,
        Cmd::Check { file, settings } => cmd_check(&file, &settings.resolve()?, format)?,
        Cmd::Dump {
            file,
            settings,
            trim,
        } => cmd_dump(&file, &settings.resolve()?, trim, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_reflow(
    file: &str,
    settings: &Settings,
    trim: Option<usize>,
    write: bool,
    check: bool,
    format: Format,
) -> Result<()> {
    let input = read_input(file)?;
    let program = Program::from_str(&input, settings.clone());
    warn_if_fatal(&program);

    // Surface problems on stderr so the reflowed text on stdout stays clean.
    if format == Format::Pretty {
        render_blocks(&input, display_name(file), &program, false).print();
    }

    let config = EmitConfig {
        text: TextKind::Output,
        limit: trim,
    };
    let reflowed = emit_program(&program, &config);
    let already_canonical = reflowed == input;

    if check {
        status_message(
            format,
            already_canonical,
            "already canonical",
            "not canonical",
            file,
        )?;
        if !already_canonical {
            process::exit(1);
        }
    } else if write {
        if file == "-" {
            bail!("--write needs a file path, not stdin");
        }
        if !already_canonical {
            fs::write(file, &reflowed).with_context(|| format!("failed to write '{file}'"))?;
        }
        status_message(
            format,
            !already_canonical,
            "reflowed",
            "already canonical",
            file,
        )?;
    } else {
        print!("{reflowed}");
    }

    Ok(())
}

fn cmd_check(file: &str, settings: &Settings, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let program = Program::from_str(&input, settings.clone());
    let envelope = program.envelope();
    let last = program.last_state();
    let ok = !program.has_fatal();

    match format {
        Format::Json => {
            let diagnostics = program.source_diagnostics(&LineIndex::new(&input));
            let out = serde_json::json!({
                "ok": ok,
                "blocks": program.blocks().len(),
                "first_fatal_block": program.first_fatal().map(|b| b.index),
                "segments": last.progress.segment_next + 1,
                "layers": last.progress.layer,
                "deepest_cut": last.progress.deepest_cut,
                "envelope": envelope,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_blocks(&input, display_name(file), &program, true).print();
            print_envelope(&envelope);
            if ok {
                eprintln!("check ok");
            }
        }
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

fn cmd_dump(file: &str, settings: &Settings, trim: Option<usize>, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let program = Program::from_str(&input, settings.clone());
    let mut traces = trace(&program);
    if let Some(n) = trim {
        traces.truncate(n);
    }

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "blocks": traces,
                "envelope": program.envelope(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Trace to stdout, diagnostics to stderr.
            println!("{}", to_pretty_json(&traces)?);
            render_blocks(&input, display_name(file), &program, true).print();
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read a whole file, or stdin for `-`.
fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
    }
}

fn display_name(file: &str) -> &str {
    if file == "-" { "<stdin>" } else { file }
}

fn warn_if_fatal(program: &Program) {
    if let Some(block) = program.first_fatal() {
        log::warn!(
            "block {} (line {}) is fatal ({:?}); machine state after it is unreliable",
            block.index,
            block.origin.line() + 1,
            block.fatal
        );
        if let Some(diag) = block.diagnostics.iter().find(|d| d.is_error()) {
            log::warn!("first fatal problem: {diag}");
        }
    }
}

/// Emit a status message for --check / --write in the appropriate format.
fn status_message(
    format: Format,
    condition: bool,
    if_true: &str,
    if_false: &str,
    file: &str,
) -> Result<()> {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "status": msg, "file": file });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!("{msg}: {file}");
        }
    }
    Ok(())
}
