use super::{BlockMode, Disposition, Evaluator};
use crate::block::FatalKind;
use crate::grammar::diag::{Diagnostic, Severity, codes};
use crate::grammar::word::format_value;
use crate::optimize::plan_plunge;
use crate::state::{
    AXIS_OFFSETS, Axis, DistanceMode, FeedMode, MotionMode, axis_address,
    coordinate_system_address,
};

impl Evaluator<'_> {
    /// X, Y, Z, A, B, C.
    ///
    /// Pending G10 or G92 data takes priority over motion.
    pub(super) fn apply_axis(&mut self, axis: Axis, value: f64) -> Disposition {
        match self.mode {
            BlockMode::CoordinateData { slot } => {
                self.state.coordinate_systems.set(slot, axis, value);
                self.state
                    .parameters
                    .set(coordinate_system_address(slot, axis), value);
                return Disposition::Keep;
            }
            BlockMode::DiscardCoordinateData => return Disposition::Keep,
            BlockMode::AwaitingSlot => {
                self.fatal(
                    FatalKind::Syntax,
                    codes::COORDINATE_DATA_WITHOUT_SLOT,
                    format!("G10 axis value {axis}{} has no P slot", format_value(value)),
                );
                return Disposition::Keep;
            }
            BlockMode::AxisOffset => {
                self.state
                    .parameters
                    .set(axis_address(AXIS_OFFSETS, axis), value);
                self.state.axis_offsets[axis] = value;
                return Disposition::Keep;
            }
            BlockMode::Normal | BlockMode::Dwell | BlockMode::MachineCoordinates => {}
        }

        let motion = self.state.modes.motion;
        let rapid = match motion {
            MotionMode::Rapid => true,
            MotionMode::Linear => false,
            MotionMode::None | MotionMode::CycleCancel => {
                let message = format!(
                    "{axis}{} has no active motion mode",
                    format_value(value)
                );
                if axis.is_linear() {
                    self.fatal(FatalKind::Syntax, codes::AXIS_WITHOUT_MOTION_MODE, message);
                } else {
                    self.note(Severity::Warn, codes::AXIS_WITHOUT_MOTION_MODE, message);
                }
                return Disposition::Keep;
            }
            _ => {
                self.fatal(
                    FatalKind::Unimplemented,
                    codes::UNIMPLEMENTED_MOTION,
                    format!("{axis} motion under {motion} is not modeled"),
                );
                return Disposition::Keep;
            }
        };

        let absolute = self.mode == BlockMode::MachineCoordinates
            || self.state.modes.distance == DistanceMode::Absolute;
        let current = self.state.position(axis);
        if absolute && self.settings.suppress_redundant_motion && value == current {
            let diag = Diagnostic::info(
                codes::NOOP_MOVE,
                format!("{axis} is already at {}", format_value(value)),
                Some(self.span),
            )
            .with_context(ctx!("axis" => axis.to_string(), "position" => format_value(current)));
            self.diagnostics.push(diag);
            return Disposition::Drop;
        }

        if axis == Axis::Z
            && !rapid
            && self.mode == BlockMode::Normal
            && self.settings.optimize_retracts
            && !self.is_synthetic()
            && !self.has_other_axes(Axis::Z)
            && let Some(plan) = plan_plunge(&self.state, value, self.settings)
        {
            self.note(
                Severity::Info,
                codes::PLUNGE_REWRITTEN,
                format!(
                    "plunge to Z{} rewritten: rapid to Z{}, then feed at F{}",
                    format_value(plan.target),
                    format_value(plan.approach),
                    format_value(plan.feed)
                ),
            );
            log::info!(
                "rewriting plunge from Z{} to Z{}",
                format_value(current),
                format_value(plan.target)
            );
            self.plunge = Some(plan);
            return Disposition::Drop;
        }

        if !rapid && self.state.modes.feed == FeedMode::InverseTime {
            self.feed_required = true;
        }
        self.move_axis(axis, value, rapid, absolute);
        Disposition::Keep
    }

    /// Move one axis and update Z depth tracking.
    pub(super) fn move_axis(&mut self, axis: Axis, value: f64, rapid: bool, absolute: bool) {
        let channel = &mut self.state.axes[axis];
        let before = channel.position;
        if rapid {
            channel.last_rapid = value;
        } else {
            channel.last_linear = value;
        }
        channel.position = if absolute { value } else { before + value };
        let after = channel.position;
        if axis == Axis::Z {
            self.track_depth(before, after);
        }
    }

    fn track_depth(&mut self, before: f64, after: f64) {
        let reference = self.settings.reference_plane;
        if after >= reference && before < reference {
            self.retracted = true;
        }
        let progress = &mut self.state.progress;
        match progress.deepest_cut {
            Some(deepest) if after >= deepest => {}
            _ => {
                progress.deepest_cut = Some(after);
                progress.layer += 1;
            }
        }
    }

    fn has_other_axes(&self, axis: Axis) -> bool {
        Axis::ALL
            .into_iter()
            .any(|a| a != axis && self.axis_letters[a.index()])
    }
}
