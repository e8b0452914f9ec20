//! Machine state threaded from block to block.
//!
//! A [`MachineState`] is a plain value: every block starts from a clone of
//! its predecessor's state and records the result as its own snapshot. No
//! block ever shares state with another.

mod modal;
mod params;

pub use modal::{
    CannedReturn, Coolant, CoordinateSystem, CutterCompensation, DistanceMode, FeedMode,
    FeedOverride, ModalGroups, MotionMode, PathControl, Plane, Spindle, Stopping, ToolChange,
    ToolLengthOffset, Units,
};
pub use params::{
    ACTIVE_COORDINATE_SYSTEM, AXIS_OFFSETS, COORDINATE_SYSTEM_BASE, COORDINATE_SYSTEM_STRIDE,
    CoordinateSystemTable, G28_HOME, G30_HOME, MAX_ADDRESS, ParameterStore, axis_address,
    coordinate_system_address,
};

use crate::grammar::word::Letter;
use serde::Serialize;
use std::ops::{Index, IndexMut};

// ── Axes ────────────────────────────────────────────────────────────────

/// One of the six controlled axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Axis {
    /// Linear X.
    X,
    /// Linear Y.
    Y,
    /// Linear Z.
    Z,
    /// Rotary about X.
    A,
    /// Rotary about Y.
    B,
    /// Rotary about Z.
    C,
}

impl Axis {
    /// All axes in parameter-store order.
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::A, Axis::B, Axis::C];

    /// Position within [`Axis::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// `true` for X, Y, and Z.
    pub fn is_linear(self) -> bool {
        matches!(self, Axis::X | Axis::Y | Axis::Z)
    }

    /// The axis addressed by a command letter.
    pub fn from_letter(letter: Letter) -> Option<Self> {
        Some(match letter {
            Letter::X => Axis::X,
            Letter::Y => Axis::Y,
            Letter::Z => Axis::Z,
            Letter::A => Axis::A,
            Letter::B => Axis::B,
            Letter::C => Axis::C,
            _ => return None,
        })
    }

    /// The command letter for this axis.
    pub fn letter(self) -> Letter {
        match self {
            Axis::X => Letter::X,
            Axis::Y => Letter::Y,
            Axis::Z => Letter::Z,
            Axis::A => Letter::A,
            Axis::B => Letter::B,
            Axis::C => Letter::C,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A value per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisValues([f64; 6]);

impl AxisValues {
    /// Iterate `(axis, value)` pairs in [`Axis::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.into_iter().map(|a| (a, self.0[a.index()]))
    }
}

impl Index<Axis> for AxisValues {
    type Output = f64;

    fn index(&self, axis: Axis) -> &f64 {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for AxisValues {
    fn index_mut(&mut self, axis: Axis) -> &mut f64 {
        &mut self.0[axis.index()]
    }
}

/// Tracking for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisChannel {
    /// Position after the most recent move.
    pub position: f64,
    /// Most recent value commanded under G1, as written (absolute or incremental).
    pub last_linear: f64,
    /// Most recent value commanded under G0, as written (absolute or incremental).
    pub last_rapid: f64,
}

/// All six axis channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AxisSet([AxisChannel; 6]);

impl AxisSet {
    /// Current positions of all axes.
    pub fn positions(&self) -> AxisValues {
        let mut out = AxisValues::default();
        for axis in Axis::ALL {
            out[axis] = self[axis].position;
        }
        out
    }
}

impl Index<Axis> for AxisSet {
    type Output = AxisChannel;

    fn index(&self, axis: Axis) -> &AxisChannel {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for AxisSet {
    fn index_mut(&mut self, axis: Axis) -> &mut AxisChannel {
        &mut self.0[axis.index()]
    }
}

// ── Progress ────────────────────────────────────────────────────────────

/// Segment and layer counters derived from Z motion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Progress {
    /// Segment this block belongs to.
    pub segment: u32,
    /// Segment the next block starts in. Exceeds `segment` when this block
    /// retracted from below the reference plane to at or above it.
    pub segment_next: u32,
    /// Number of times Z reached a new minimum.
    pub layer: u32,
    /// Lowest Z reached so far. `None` until the first Z move.
    pub deepest_cut: Option<f64>,
}

// ── MachineState ────────────────────────────────────────────────────────

/// Everything the machine remembers between blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MachineState {
    /// Axis positions and last commanded targets.
    pub axes: AxisSet,
    /// Active modal groups.
    pub modes: ModalGroups,
    /// Work coordinate system origins (G10 L2).
    pub coordinate_systems: CoordinateSystemTable,
    /// Active G92 axis offsets.
    pub axis_offsets: AxisValues,
    /// Numbered parameters.
    pub parameters: ParameterStore,
    /// Feed rate (F).
    pub feed: f64,
    /// Spindle speed (S).
    pub spindle_speed: f64,
    /// Selected tool (T), `None` until the first T word.
    pub tool: Option<f64>,
    /// Most recent line number (N).
    pub line_number: Option<f64>,
    /// Segment and layer counters.
    pub progress: Progress,
}

impl MachineState {
    /// Power-on state: all axes at zero, default modal groups, empty
    /// parameter store apart from the active coordinate system.
    pub fn power_on() -> Self {
        Self::default()
    }

    /// Current position of `axis`.
    pub fn position(&self, axis: Axis) -> f64 {
        self.axes[axis].position
    }
}
