//! Lightweight reinterpret/emit benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p gcode_toolchain_core --example reflow_benchmark --release`

use std::fs;
use std::time::Instant;

use gcode_toolchain_core::{EmitConfig, Program, Settings, emit_program};

fn run_benchmark(label: &str, input: &str, settings: &Settings, iterations: usize) {
    let reflow_start = Instant::now();
    for _ in 0..iterations {
        let _ = Program::from_str(input, settings.clone());
    }
    let reflow_elapsed = reflow_start.elapsed();

    let program = Program::from_str(input, settings.clone());

    let emit_start = Instant::now();
    for _ in 0..iterations {
        let _ = emit_program(&program, &EmitConfig::default());
    }
    let emit_elapsed = emit_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!("  blocks:      {}", program.blocks().len());
    println!(
        "  reflow: total={:?}, per_iter={:.3} ms",
        reflow_elapsed,
        reflow_elapsed.as_secs_f64() * 1000.0 / iterations as f64
    );
    println!(
        "  emit:   total={:?}, per_iter={:.3} ms",
        emit_elapsed,
        emit_elapsed.as_secs_f64() * 1000.0 / iterations as f64
    );
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("GCODE_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(500);

    let settings = Settings {
        suppress_redundant_motion: true,
        optimize_retracts: true,
        ..Settings::default()
    };

    let sample_paths = [
        ("pocket", "samples/pocket.ngc"),
        ("facing_inch", "samples/facing_inch.ngc"),
    ];

    for (label, path) in sample_paths {
        let input = fs::read_to_string(path)
            .map_err(|e| format!("failed to read sample '{}': {e}", path))?;
        run_benchmark(label, &input, &settings, iterations);
    }

    Ok(())
}
