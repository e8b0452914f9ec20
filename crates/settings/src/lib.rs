//! Reinterpreter settings for the G-code toolchain.
//!
//! [`Settings`] selects which optimizations the block evaluator applies and
//! where the reference plane sits. Settings are plain data: the CLI builds
//! them from flags or loads them from JSON with [`load_settings_from_str`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// JSON deserialization failed.
    #[error("invalid settings JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Options controlling how blocks are evaluated and re-emitted.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a
/// valid settings document.
///
/// # Example
/// ```
/// let settings = gcode_toolchain_settings::Settings {
///     suppress_redundant_motion: true,
///     optimize_retracts: true,
///     plunge_feed_override: 120.0,
///     ..Default::default()
/// };
/// assert_eq!(settings.plunge_feed(), Some(120.0));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Drop motion-mode words that re-select the active mode, and absolute
    /// axis words that target the current position.
    pub suppress_redundant_motion: bool,
    /// Rewrite feed plunges from above the reference plane into a rapid
    /// approach followed by a feed move.
    pub optimize_retracts: bool,
    /// Feed rate for rewritten plunges. `0` selects the unit default.
    pub plunge_feed_override: f64,
    /// Block-delete switch: blocks starting with `/` are echoed but not evaluated.
    pub block_delete: bool,
    /// Append a `(seg N layer L depth D)` comment to each output line.
    pub annotate: bool,
    /// Z height separating cutting moves from clearance moves.
    pub reference_plane: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            suppress_redundant_motion: false,
            optimize_retracts: false,
            plunge_feed_override: 0.0,
            block_delete: false,
            annotate: false,
            reference_plane: 0.0,
        }
    }
}

impl Settings {
    /// The plunge feed override, if one is configured.
    pub fn plunge_feed(&self) -> Option<f64> {
        (self.plunge_feed_override > 0.0).then_some(self.plunge_feed_override)
    }

    /// Check field ranges.
    ///
    /// - `plunge_feed_override` must be finite and `>= 0`
    /// - `reference_plane` must be finite
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.plunge_feed_override.is_finite() {
            return Err(SettingsError::InvalidField {
                field: "plunge_feed_override".into(),
                reason: "must be a finite number".into(),
            });
        }
        if self.plunge_feed_override < 0.0 {
            return Err(SettingsError::InvalidField {
                field: "plunge_feed_override".into(),
                reason: format!("{} is negative", self.plunge_feed_override),
            });
        }
        if !self.reference_plane.is_finite() {
            return Err(SettingsError::InvalidField {
                field: "reference_plane".into(),
                reason: "must be a finite number".into(),
            });
        }
        Ok(())
    }
}

/// Load and validate [`Settings`] from a JSON string.
///
/// Missing fields take their defaults; see [`Settings::validate`] for the
/// range checks applied afterwards.
pub fn load_settings_from_str(s: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = serde_json::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}
