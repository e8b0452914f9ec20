// ── Word recognition (GC10xx) ───────────────────────────────────────────

/// A word whose letter (or leading character) is not part of the command set.
pub const UNKNOWN_WORD: &str = "GC1001";

/// A G word whose value does not name a supported code.
pub const UNKNOWN_G_CODE: &str = "GC1002";

/// An M word whose value does not name a supported code.
pub const UNKNOWN_M_CODE: &str = "GC1003";

// ── Evaluation notes and warnings (GC11xx) ──────────────────────────────

/// A motion-mode word that re-selects the already active mode was dropped.
pub const REDUNDANT_MOTION_MODE: &str = "GC1101";

/// An absolute axis word targeting the current position was dropped.
pub const NOOP_MOVE: &str = "GC1102";

/// A T word re-selecting the active tool was dropped.
pub const REDUNDANT_TOOL: &str = "GC1103";

/// A negative S word was rejected and dropped.
pub const NEGATIVE_SPINDLE_SPEED: &str = "GC1104";

/// A parameter word (D, H, I, J, K, L, Q, R) with no modeled machine effect.
pub const UNMODELED_PARAMETER: &str = "GC1105";

/// G4 appeared without a P word giving the dwell time.
pub const DWELL_WITHOUT_P: &str = "GC1106";

/// G10 named a coordinate-system slot outside 1..=9.
pub const COORDINATE_SLOT_OUT_OF_RANGE: &str = "GC1107";

/// The block carried a delete marker and the delete switch was on.
pub const BLOCK_DELETED: &str = "GC1108";

/// A plunge was rewritten into a rapid approach plus a feed move.
pub const PLUNGE_REWRITTEN: &str = "GC1109";

// ── Fatal classifications (GC2xxx) ──────────────────────────────────────

/// A motion mode (arc, probe, canned cycle) that is not modeled.
pub const UNIMPLEMENTED_MOTION: &str = "GC2001";

/// An axis word appeared with no active motion mode.
pub const AXIS_WITHOUT_MOTION_MODE: &str = "GC2101";

/// Inverse-time feed mode required an F word that never appeared.
pub const MISSING_INVERSE_TIME_FEED: &str = "GC2102";

/// G53 used outside rapid or linear motion, or with cutter compensation on.
pub const INVALID_MACHINE_COORDINATES: &str = "GC2103";

/// G10 axis data appeared before the P word naming the slot.
pub const COORDINATE_DATA_WITHOUT_SLOT: &str = "GC2104";

/// A numeric value overflowed to a non-finite number.
pub const NON_FINITE_VALUE: &str = "GC2901";

/// Every diagnostic code, in numeric order.
pub const ALL: &[&str] = &[
    UNKNOWN_WORD,
    UNKNOWN_G_CODE,
    UNKNOWN_M_CODE,
    REDUNDANT_MOTION_MODE,
    NOOP_MOVE,
    REDUNDANT_TOOL,
    NEGATIVE_SPINDLE_SPEED,
    UNMODELED_PARAMETER,
    DWELL_WITHOUT_P,
    COORDINATE_SLOT_OUT_OF_RANGE,
    BLOCK_DELETED,
    PLUNGE_REWRITTEN,
    UNIMPLEMENTED_MOTION,
    AXIS_WITHOUT_MOTION_MODE,
    MISSING_INVERSE_TIME_FEED,
    INVALID_MACHINE_COORDINATES,
    COORDINATE_DATA_WITHOUT_SLOT,
    NON_FINITE_VALUE,
];

pub(crate) fn describe(id: &str) -> Option<&'static str> {
    let text = match id {
        UNKNOWN_WORD => {
            "The block contains a word whose letter is not part of the supported command set \
             (for example E, O, U, V, W, or a token that does not start with a letter). \
             The word is kept verbatim after the Z word in the output but has no effect on the machine state."
        }
        UNKNOWN_G_CODE => {
            "The G word's value does not name a supported preparatory code. \
             The word is kept in the output but does not change any modal group."
        }
        UNKNOWN_M_CODE => {
            "The M word's value does not name a supported miscellaneous code. \
             The word is kept in the output but does not change any modal group."
        }
        REDUNDANT_MOTION_MODE => {
            "Redundant-motion suppression is on and the block re-selects the motion mode \
             (G0, G1, or G80) that is already active. The word is dropped from the output."
        }
        NOOP_MOVE => {
            "Redundant-motion suppression is on, positioning is absolute, and the axis word targets \
             exactly the axis's current position. The word is dropped and the axis is not touched."
        }
        REDUNDANT_TOOL => {
            "The T word selects the tool that is already selected. The word is dropped."
        }
        NEGATIVE_SPINDLE_SPEED => {
            "Spindle speeds cannot be negative. The S word is dropped and the previous speed remains in effect."
        }
        UNMODELED_PARAMETER => {
            "The word is a parameter (D, H, I, J, K, L, Q, or R) whose machine effect is not modeled. \
             It is kept in the output unchanged."
        }
        DWELL_WITHOUT_P => {
            "G4 requests a dwell, but no P word in the same block gives the dwell time."
        }
        COORDINATE_SLOT_OUT_OF_RANGE => {
            "G10 coordinate-system data must name a slot with P1 through P9. \
             Axis words that follow in the block are ignored."
        }
        BLOCK_DELETED => {
            "The block starts with '/' and the block-delete switch is on. The rest of the block is \
             echoed to the output but not evaluated."
        }
        PLUNGE_REWRITTEN => {
            "Retract optimization replaced a feed plunge from above the reference plane with a rapid \
             move to just above the deepest previous cut, followed by a feed move to the target depth."
        }
        UNIMPLEMENTED_MOTION => {
            "Circular interpolation (G2, G3), probing (G38.2), and canned cycles (G81 to G89) are not \
             modeled. Axis positions after this block are unreliable, so the block is classified as fatal. \
             Processing continues so that later diagnostics are still reported."
        }
        AXIS_WITHOUT_MOTION_MODE => {
            "An axis word appeared while no motion mode was active (power-on, or after G80). \
             For X, Y, and Z this is a fatal syntax violation; for rotary axes it is a warning."
        }
        MISSING_INVERSE_TIME_FEED => {
            "Inverse-time feed mode (G93) is active and the block commands feed motion, \
             but no F word appears in the block. Every feed move under G93 needs its own F word."
        }
        INVALID_MACHINE_COORDINATES => {
            "G53 (move in machine coordinates) is only valid with G0 or G1 motion while cutter \
             compensation is off (G40)."
        }
        COORDINATE_DATA_WITHOUT_SLOT => {
            "A G10 block supplied axis values before the P word that names the coordinate-system slot."
        }
        NON_FINITE_VALUE => {
            "The word's numeric value is too large to represent. The block is classified as fatal."
        }
        _ => return None,
    };
    Some(text)
}
