pub use gcode_toolchain_diagnostics::{Diagnostic, LineIndex, Severity, Span, codes};
