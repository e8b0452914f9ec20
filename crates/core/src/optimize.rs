//! Retract/plunge rewriting.
//!
//! CAM output often retracts to a clearance height between passes and then
//! feeds all the way back down. Everything above the deepest previous cut
//! is air, so the descent down to just above that depth can be a rapid move.
//! [`plan_plunge`] decides whether a Z move qualifies. [`PlungeRewrite::follow_on`]
//! produces the replacement blocks.

use crate::grammar::word::format_value;
use crate::state::{Axis, DistanceMode, FeedMode, MachineState, MotionMode, Units};
use gcode_toolchain_settings::Settings;
use serde::Serialize;

/// Clearance and feed used when rewriting a plunge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlungeDefaults {
    /// Height above the deepest cut where the rapid approach stops.
    pub clearance: f64,
    /// Feed rate for the final approach.
    pub feed: f64,
}

impl PlungeDefaults {
    /// Defaults for the active units: 0.02 in at 10 in/min, or 0.5 mm at 250 mm/min.
    pub fn for_units(units: Units) -> Self {
        match units {
            Units::Inches => Self {
                clearance: 0.02,
                feed: 10.0,
            },
            Units::Millimeters => Self {
                clearance: 0.5,
                feed: 250.0,
            },
        }
    }
}

/// A planned plunge replacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlungeRewrite {
    /// Z reached by the rapid approach.
    pub approach: f64,
    /// Final Z, as originally programmed.
    pub target: f64,
    /// Feed rate for the move from `approach` to `target`.
    pub feed: f64,
}

impl PlungeRewrite {
    /// Lines that replace the dropped Z word.
    ///
    /// `restore_feed` is the feed in effect at the end of the rewritten
    /// block; an `F` line restores it when it differs from the plunge feed.
    pub fn follow_on(&self, restore_feed: f64) -> Vec<String> {
        let mut lines = vec![
            format!("G0 Z{}", format_value(self.approach)),
            format!(
                "G1 Z{} F{}",
                format_value(self.target),
                format_value(self.feed)
            ),
        ];
        if restore_feed > 0.0 && restore_feed != self.feed {
            lines.push(format!("F{}", format_value(restore_feed)));
        }
        lines
    }
}

/// Decide whether a Z-only feed move to `target` can be rewritten.
///
/// Requires G1 motion in absolute, units-per-minute mode; the current Z at
/// or above the reference plane; a previous cut below the reference plane;
/// a target at or below that cut; and room for a rapid above it.
pub fn plan_plunge(state: &MachineState, target: f64, settings: &Settings) -> Option<PlungeRewrite> {
    let modes = &state.modes;
    if modes.motion != MotionMode::Linear
        || modes.distance != DistanceMode::Absolute
        || modes.feed != FeedMode::UnitsPerMinute
    {
        return None;
    }
    let start = state.axes[Axis::Z].position;
    let deepest = state.progress.deepest_cut?;
    if start < settings.reference_plane || deepest >= settings.reference_plane || target > deepest
    {
        return None;
    }
    let defaults = PlungeDefaults::for_units(modes.units);
    let approach = deepest + defaults.clearance;
    if approach >= start {
        return None;
    }
    Some(PlungeRewrite {
        approach,
        target,
        feed: settings.plunge_feed().unwrap_or(defaults.feed),
    })
}
