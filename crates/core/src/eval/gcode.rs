use super::{BlockMode, Disposition, Evaluator};
use crate::block::FatalKind;
use crate::grammar::diag::{Diagnostic, Severity, codes};
use crate::grammar::word::{format_value, tenths};
use crate::state::{
    ACTIVE_COORDINATE_SYSTEM, AXIS_OFFSETS, Axis, AxisValues, CannedReturn, CoordinateSystem,
    CutterCompensation, DistanceMode, FeedMode, G28_HOME, G30_HOME, MotionMode, PathControl,
    Plane, ToolLengthOffset, Units,
};

impl Evaluator<'_> {
    /// Dispatch a G word by its tenths code (`G59.1` is `591`).
    pub(super) fn apply_g(&mut self, value: f64) -> Disposition {
        let Some(code) = tenths(value) else {
            return self.unknown_g(value);
        };
        let modes = &mut self.state.modes;
        match code {
            0 => return self.select_motion(MotionMode::Rapid),
            10 => return self.select_motion(MotionMode::Linear),
            20 => return self.select_motion(MotionMode::ClockwiseArc),
            30 => return self.select_motion(MotionMode::CounterClockwiseArc),
            382 => return self.select_motion(MotionMode::Probe),
            800 => return self.select_motion(MotionMode::CycleCancel),
            810 | 820 | 830 | 840 | 850 | 860 | 870 | 880 | 890 => {
                return self.select_motion(MotionMode::CannedCycle((code / 10) as u8));
            }
            40 => {
                self.mode = BlockMode::Dwell;
                self.dwell_requested = true;
            }
            100 => self.mode = BlockMode::AwaitingSlot,
            170 => modes.plane = Plane::Xy,
            180 => modes.plane = Plane::Zx,
            190 => modes.plane = Plane::Yz,
            200 => modes.units = Units::Inches,
            210 => modes.units = Units::Millimeters,
            280 => self.go_home(G28_HOME),
            300 => self.go_home(G30_HOME),
            400 => modes.cutter_compensation = CutterCompensation::Off,
            410 => modes.cutter_compensation = CutterCompensation::Left,
            420 => modes.cutter_compensation = CutterCompensation::Right,
            430 => modes.tool_length_offset = ToolLengthOffset::Applied,
            490 => modes.tool_length_offset = ToolLengthOffset::Cancelled,
            530 => {
                self.mode = BlockMode::MachineCoordinates;
                self.machine_coordinates = true;
            }
            540 | 550 | 560 | 570 | 580 | 590 => self.select_coordinate_system((code / 10 - 53) as u8),
            591 | 592 | 593 => self.select_coordinate_system((code - 591 + 7) as u8),
            610 => modes.path_control = PathControl::ExactPath,
            611 => modes.path_control = PathControl::ExactStop,
            640 => modes.path_control = PathControl::Continuous,
            900 => modes.distance = DistanceMode::Absolute,
            910 => modes.distance = DistanceMode::Incremental,
            920 => self.mode = BlockMode::AxisOffset,
            921 => {
                self.state.axis_offsets = AxisValues::default();
                self.state
                    .parameters
                    .set_axes(AXIS_OFFSETS, &AxisValues::default());
            }
            922 => self.state.axis_offsets = AxisValues::default(),
            923 => self.state.axis_offsets = self.state.parameters.axes(AXIS_OFFSETS),
            930 => modes.feed = FeedMode::InverseTime,
            940 => modes.feed = FeedMode::UnitsPerMinute,
            980 => modes.canned_return = CannedReturn::InitialLevel,
            990 => modes.canned_return = CannedReturn::RPlane,
            _ => return self.unknown_g(value),
        }
        Disposition::Keep
    }

    fn unknown_g(&mut self, value: f64) -> Disposition {
        self.note(
            Severity::Warn,
            codes::UNKNOWN_G_CODE,
            format!("G{} is not a supported G code", format_value(value)),
        );
        Disposition::Keep
    }

    /// Select a motion mode, dropping G0/G1/G80 when it is already active
    /// and suppression is on. A feed motion needs F under G93 whether or not
    /// its word is kept; the mode is checked at block end.
    fn select_motion(&mut self, mode: MotionMode) -> Disposition {
        if mode.is_feed_motion() {
            self.feed_required = true;
        }
        let active = self.state.modes.motion;
        if self.settings.suppress_redundant_motion
            && mode == active
            && matches!(
                mode,
                MotionMode::Rapid | MotionMode::Linear | MotionMode::CycleCancel
            )
        {
            let diag = Diagnostic::info(
                codes::REDUNDANT_MOTION_MODE,
                format!("{mode} is already the active motion mode"),
                Some(self.span),
            )
            .with_context(ctx!("mode" => mode.to_string()));
            self.diagnostics.push(diag);
            return Disposition::Drop;
        }
        self.state.modes.motion = mode;
        if mode.is_unimplemented() {
            self.fatal(
                FatalKind::Unimplemented,
                codes::UNIMPLEMENTED_MOTION,
                format!("{mode} motion is not modeled; later positions are unreliable"),
            );
        }
        Disposition::Keep
    }

    /// G28/G30: switch to rapid and move every axis to the stored home.
    fn go_home(&mut self, base: u16) {
        self.state.modes.motion = MotionMode::Rapid;
        let home = self.state.parameters.axes(base);
        for axis in Axis::ALL {
            self.move_axis(axis, home[axis], true, true);
        }
    }

    fn select_coordinate_system(&mut self, slot: u8) {
        if let Some(system) = CoordinateSystem::new(slot) {
            self.state.modes.coordinate_system = system;
            self.state
                .parameters
                .set(ACTIVE_COORDINATE_SYSTEM, f64::from(slot));
        }
    }
}
