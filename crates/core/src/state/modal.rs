//! Modal groups: one active variant per group, persisting across blocks.

use serde::Serialize;

/// Motion group (G0, G1, G2, G3, G38.2, G80, G81..G89).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionMode {
    /// No motion mode selected yet (power-on, or reset by M2/M30).
    #[default]
    None,
    /// G0.
    Rapid,
    /// G1.
    Linear,
    /// G2.
    ClockwiseArc,
    /// G3.
    CounterClockwiseArc,
    /// G38.2.
    Probe,
    /// G80.
    CycleCancel,
    /// G81 through G89; the payload is the G number.
    CannedCycle(u8),
}

impl MotionMode {
    /// Modes whose interpolation is not modeled. Axis positions under these
    /// modes cannot be tracked.
    pub fn is_unimplemented(self) -> bool {
        matches!(
            self,
            MotionMode::ClockwiseArc
                | MotionMode::CounterClockwiseArc
                | MotionMode::Probe
                | MotionMode::CannedCycle(_)
        )
    }

    /// Modes that move at the programmed feed rate.
    pub fn is_feed_motion(self) -> bool {
        matches!(
            self,
            MotionMode::Linear | MotionMode::ClockwiseArc | MotionMode::CounterClockwiseArc
        )
    }

    /// G-code text for this mode, or `None` for [`MotionMode::None`].
    pub fn code(self) -> Option<String> {
        Some(match self {
            MotionMode::None => return None,
            MotionMode::Rapid => "G0".into(),
            MotionMode::Linear => "G1".into(),
            MotionMode::ClockwiseArc => "G2".into(),
            MotionMode::CounterClockwiseArc => "G3".into(),
            MotionMode::Probe => "G38.2".into(),
            MotionMode::CycleCancel => "G80".into(),
            MotionMode::CannedCycle(n) => format!("G{n}"),
        })
    }
}

impl std::fmt::Display for MotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code() {
            Some(code) => f.write_str(&code),
            None => f.write_str("none"),
        }
    }
}

/// Plane selection (G17, G18, G19).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    /// G17.
    #[default]
    Xy,
    /// G18.
    Zx,
    /// G19.
    Yz,
}

/// Distance mode (G90, G91).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// G90: axis words are positions.
    #[default]
    Absolute,
    /// G91: axis words are offsets from the current position.
    Incremental,
}

/// Feed rate mode (G93, G94).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// G93: each feed move carries its own F word (1/minutes).
    InverseTime,
    /// G94.
    #[default]
    UnitsPerMinute,
}

/// Length units (G20, G21).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    /// G20.
    Inches,
    /// G21.
    #[default]
    Millimeters,
}

/// Cutter radius compensation (G40, G41, G42).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CutterCompensation {
    /// G40.
    #[default]
    Off,
    /// G41.
    Left,
    /// G42.
    Right,
}

/// Tool length offset (G43, G49).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolLengthOffset {
    /// G43.
    Applied,
    /// G49.
    #[default]
    Cancelled,
}

/// Canned-cycle return level (G98, G99).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CannedReturn {
    /// G98.
    #[default]
    InitialLevel,
    /// G99.
    RPlane,
}

/// Active work coordinate system, slot 1 through 9.
///
/// Slots 1..=6 are G54..G59; slots 7..=9 are G59.1, G59.2, G59.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoordinateSystem(u8);

impl CoordinateSystem {
    /// Number of selectable coordinate systems.
    pub const COUNT: usize = 9;

    /// Slot `1..=9`, or `None` when out of range.
    pub fn new(slot: u8) -> Option<Self> {
        (1..=9).contains(&slot).then_some(Self(slot))
    }

    /// The slot number, `1..=9`.
    pub fn slot(self) -> u8 {
        self.0
    }

    /// G-code text selecting this system.
    pub fn code(self) -> &'static str {
        const CODES: [&str; 9] = [
            "G54", "G55", "G56", "G57", "G58", "G59", "G59.1", "G59.2", "G59.3",
        ];
        CODES[usize::from(self.0 - 1)]
    }
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self(1)
    }
}

/// Path control (G61, G61.1, G64).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathControl {
    /// G61.
    ExactPath,
    /// G61.1.
    ExactStop,
    /// G64.
    #[default]
    Continuous,
}

/// Program stopping (M0, M1, M2, M30, M60).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stopping {
    /// No stop requested.
    #[default]
    Running,
    /// M0.
    ProgramStop,
    /// M1.
    OptionalStop,
    /// M2.
    ProgramEnd,
    /// M30.
    ProgramEndRewind,
    /// M60.
    PalletShuttle,
}

/// Tool change (M6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChange {
    /// No change requested.
    #[default]
    Idle,
    /// M6.
    Requested,
}

/// Spindle (M3, M4, M5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spindle {
    /// M3.
    Clockwise,
    /// M4.
    CounterClockwise,
    /// M5.
    #[default]
    Stopped,
}

/// Coolant (M7, M8, M9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coolant {
    /// M9.
    #[default]
    Off,
    /// M7.
    Mist,
    /// M8.
    Flood,
    /// M7 and M8 both on.
    MistAndFlood,
}

impl Coolant {
    /// Coolant after turning mist on.
    pub fn with_mist(self) -> Self {
        match self {
            Coolant::Flood | Coolant::MistAndFlood => Coolant::MistAndFlood,
            Coolant::Off | Coolant::Mist => Coolant::Mist,
        }
    }

    /// Coolant after turning flood on.
    pub fn with_flood(self) -> Self {
        match self {
            Coolant::Mist | Coolant::MistAndFlood => Coolant::MistAndFlood,
            Coolant::Off | Coolant::Flood => Coolant::Flood,
        }
    }
}

/// Feed and speed override switches (M48, M49).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedOverride {
    /// M48.
    #[default]
    Enabled,
    /// M49.
    Disabled,
}

/// The full set of modal groups.
///
/// `Default` is the power-on state: no motion, G17 G90 G94 G21 G40 G49 G98
/// G54 G64, running, M5 M9 M48.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModalGroups {
    /// Motion group.
    pub motion: MotionMode,
    /// Plane selection.
    pub plane: Plane,
    /// Distance mode.
    pub distance: DistanceMode,
    /// Feed rate mode.
    pub feed: FeedMode,
    /// Length units.
    pub units: Units,
    /// Cutter radius compensation.
    pub cutter_compensation: CutterCompensation,
    /// Tool length offset.
    pub tool_length_offset: ToolLengthOffset,
    /// Canned-cycle return level.
    pub canned_return: CannedReturn,
    /// Active work coordinate system.
    pub coordinate_system: CoordinateSystem,
    /// Path control.
    pub path_control: PathControl,
    /// Program stopping.
    pub stopping: Stopping,
    /// Tool change.
    pub tool_change: ToolChange,
    /// Spindle.
    pub spindle: Spindle,
    /// Coolant.
    pub coolant: Coolant,
    /// Feed and speed override switches.
    pub feed_override: FeedOverride,
}

impl ModalGroups {
    /// Apply the M2/M30 program-end reset.
    ///
    /// Motion, plane, distance, feed mode, feed override, cutter
    /// compensation, spindle, coolant, and coordinate system return to their
    /// power-on values. Units, tool length offset, canned return, path
    /// control, and stopping are left alone.
    pub fn reset_for_program_end(&mut self) {
        let power_on = ModalGroups::default();
        self.motion = power_on.motion;
        self.plane = power_on.plane;
        self.distance = power_on.distance;
        self.feed = power_on.feed;
        self.feed_override = power_on.feed_override;
        self.cutter_compensation = power_on.cutter_compensation;
        self.spindle = power_on.spindle;
        self.coolant = power_on.coolant;
        self.coordinate_system = power_on.coordinate_system;
    }
}
