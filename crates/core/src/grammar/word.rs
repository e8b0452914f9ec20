//! Command letters, numeric values, and the per-block word record.

use serde::Serialize;
use std::collections::BTreeMap;

/// A command letter the evaluator understands.
///
/// Variants are declared in canonical emission order, so the derived `Ord`
/// (and therefore `BTreeMap<Letter, _>` iteration) yields M, G, F, then
/// A through Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Letter {
    /// Miscellaneous function.
    M,
    /// Preparatory function.
    G,
    /// Feed rate.
    F,
    /// Rotary axis about X.
    A,
    /// Rotary axis about Y.
    B,
    /// Rotary axis about Z.
    C,
    /// Cutter radius compensation register.
    D,
    /// Tool length offset register.
    H,
    /// Arc center X offset.
    I,
    /// Arc center Y offset.
    J,
    /// Arc center Z offset.
    K,
    /// Repeat count / G10 sub-mode.
    L,
    /// Line number.
    N,
    /// Dwell time or G10 slot.
    P,
    /// Peck increment.
    Q,
    /// Arc radius / canned-cycle retract plane.
    R,
    /// Spindle speed.
    S,
    /// Tool select.
    T,
    /// Linear axis.
    X,
    /// Linear axis.
    Y,
    /// Linear axis.
    Z,
}

impl Letter {
    /// Map an uppercase ASCII letter to a command letter.
    ///
    /// Letters outside the command set (E, O, U, V, W) return `None`.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'M' => Letter::M,
            'G' => Letter::G,
            'F' => Letter::F,
            'A' => Letter::A,
            'B' => Letter::B,
            'C' => Letter::C,
            'D' => Letter::D,
            'H' => Letter::H,
            'I' => Letter::I,
            'J' => Letter::J,
            'K' => Letter::K,
            'L' => Letter::L,
            'N' => Letter::N,
            'P' => Letter::P,
            'Q' => Letter::Q,
            'R' => Letter::R,
            'S' => Letter::S,
            'T' => Letter::T,
            'X' => Letter::X,
            'Y' => Letter::Y,
            'Z' => Letter::Z,
            _ => return None,
        })
    }

    /// The uppercase character for this letter.
    pub fn as_char(self) -> char {
        match self {
            Letter::M => 'M',
            Letter::G => 'G',
            Letter::F => 'F',
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::H => 'H',
            Letter::I => 'I',
            Letter::J => 'J',
            Letter::K => 'K',
            Letter::L => 'L',
            Letter::N => 'N',
            Letter::P => 'P',
            Letter::Q => 'Q',
            Letter::R => 'R',
            Letter::S => 'S',
            Letter::T => 'T',
            Letter::X => 'X',
            Letter::Y => 'Y',
            Letter::Z => 'Z',
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Parse the numeric part of a word.
///
/// Reads the longest prefix shaped like `[+-]digits[.digits]` and ignores
/// anything after it. Text with no usable prefix yields `0.0`. Finite values
/// are rounded to the six decimals [`format_value`] writes, so the tracked
/// state matches the emitted text.
pub fn parse_value(text: &str) -> f64 {
    let b = text.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i < b.len() && b[i] == b'.' {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
    }
    let value = text[..i].parse::<f64>().unwrap_or(0.0);
    if value.is_finite() {
        format!("{value:.6}").parse().unwrap_or(value)
    } else {
        value
    }
}

/// Format a value with at most six decimals and no trailing zeros.
///
/// `1.500000` becomes `1.5`, `2.000000` becomes `2`, and negative zero
/// prints as `0`.
pub fn format_value(n: f64) -> String {
    let s = format!("{:.6}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "" | "-" | "-0" => "0".to_string(),
        _ => s.to_string(),
    }
}

/// Tenths code of a G or M value: `59.1` becomes `591`.
///
/// Returns `None` for negative values and values that are not a whole
/// number of tenths.
pub(crate) fn tenths(value: f64) -> Option<u32> {
    if !(0.0..=10_000.0).contains(&value) {
        return None;
    }
    let scaled = (value * 10.0).round();
    ((value * 10.0 - scaled).abs() < 1e-6).then_some(scaled as u32)
}

/// Words retained for re-emission, grouped by letter.
///
/// A letter may repeat within a block (`G0 G90`, `M3 M8`); its values keep
/// source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockWords {
    /// A `%` marker appeared in the block.
    pub program_marker: bool,
    /// The block started with `/`.
    pub block_delete: bool,
    /// Retained command words by letter.
    pub values: BTreeMap<Letter, Vec<f64>>,
    /// Unknown tokens that do not start with a letter, written ahead of the
    /// command words so they cannot run into one.
    pub leading: Vec<String>,
    /// Other unknown words, normalized, in source order.
    pub unknown: Vec<String>,
    /// Words echoed without evaluation because the block was deleted.
    pub skipped: Vec<String>,
    /// Trailing comment, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl BlockWords {
    /// Retain a word.
    pub fn push(&mut self, letter: Letter, value: f64) {
        self.values.entry(letter).or_default().push(value);
    }

    /// `true` if at least one word with `letter` was retained.
    pub fn has(&self, letter: Letter) -> bool {
        self.values.contains_key(&letter)
    }

    /// First retained value for `letter`.
    pub fn first(&self, letter: Letter) -> Option<f64> {
        self.values.get(&letter).and_then(|v| v.first().copied())
    }

    /// All retained values for `letter`, in source order.
    pub fn all(&self, letter: Letter) -> &[f64] {
        self.values.get(&letter).map_or(&[], Vec::as_slice)
    }

    /// `true` if nothing at all would be emitted.
    pub fn is_empty(&self) -> bool {
        !self.program_marker
            && !self.block_delete
            && self.values.is_empty()
            && self.leading.is_empty()
            && self.unknown.is_empty()
            && self.skipped.is_empty()
            && self.comment.is_none()
    }
}
