/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers and per-block traces.
pub mod dump;
/// Canonical emitter: retained words back to text.
pub mod emit;
/// Block tokenizer: splits one line into borrowed tokens.
pub mod lexer;
/// Command letters, numeric values, and the per-block word record.
pub mod word;
