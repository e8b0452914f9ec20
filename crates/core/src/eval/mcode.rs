use super::{Disposition, Evaluator};
use crate::grammar::diag::{Severity, codes};
use crate::grammar::word::{format_value, tenths};
use crate::state::{
    ACTIVE_COORDINATE_SYSTEM, AxisValues, Coolant, FeedOverride, Spindle, Stopping, ToolChange,
};

impl Evaluator<'_> {
    /// Dispatch an M word. Only whole numbers are M codes.
    pub(super) fn apply_m(&mut self, value: f64) -> Disposition {
        let code = tenths(value).filter(|t| t % 10 == 0).map(|t| t / 10);
        let modes = &mut self.state.modes;
        match code {
            Some(0) => modes.stopping = Stopping::ProgramStop,
            Some(1) => modes.stopping = Stopping::OptionalStop,
            Some(2) => {
                modes.stopping = Stopping::ProgramEnd;
                self.program_end = true;
            }
            Some(30) => {
                modes.stopping = Stopping::ProgramEndRewind;
                self.program_end = true;
            }
            Some(60) => modes.stopping = Stopping::PalletShuttle,
            Some(3) => modes.spindle = Spindle::Clockwise,
            Some(4) => modes.spindle = Spindle::CounterClockwise,
            Some(5) => modes.spindle = Spindle::Stopped,
            Some(6) => {
                modes.tool_change = ToolChange::Requested;
                modes.spindle = Spindle::Stopped;
            }
            Some(7) => modes.coolant = modes.coolant.with_mist(),
            Some(8) => modes.coolant = modes.coolant.with_flood(),
            Some(9) => modes.coolant = Coolant::Off,
            Some(48) => modes.feed_override = FeedOverride::Enabled,
            Some(49) => modes.feed_override = FeedOverride::Disabled,
            _ => {
                self.note(
                    Severity::Warn,
                    codes::UNKNOWN_M_CODE,
                    format!("M{} is not a supported M code", format_value(value)),
                );
            }
        }
        Disposition::Keep
    }

    /// M2/M30: modal reset plus G92.2. Runs after every other word of the
    /// block, so G words sharing the block cannot outlive the reset.
    pub(super) fn end_program(&mut self) {
        self.state.modes.reset_for_program_end();
        let slot = self.state.modes.coordinate_system.slot();
        self.state
            .parameters
            .set(ACTIVE_COORDINATE_SYSTEM, f64::from(slot));
        self.state.axis_offsets = AxisValues::default();
    }
}
