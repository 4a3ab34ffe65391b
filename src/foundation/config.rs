use std::path::Path;

use crate::{
    animation::ease::Ease,
    foundation::core::Size2,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
};

/// Tunable engine parameters.
///
/// Every pixel tolerance and duration here was tuned by eye; none of them is a behavioral
/// contract. Missing JSON fields fall back to [`EngineConfig::default`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum per-axis drift (px) before the sync controller re-issues a position command.
    pub sync_tolerance_px: f64,
    /// Duration of the eased position command issued while the scroll trigger is active.
    pub sync_ease_ms: f64,
    /// Curve used by the eased position command.
    pub sync_ease: Ease,
    /// Quiet period after the last resize event before re-measuring.
    pub resize_quiet_ms: f64,
    /// Scroll slack around trigger bounds within which updates are still emitted.
    pub boundary_epsilon_px: f64,
    /// Smoothed scrub progress snaps to the raw value once closer than this.
    pub scrub_settle_epsilon: f64,
    /// Layout breakpoints (ascending viewport widths). Crossing one recomposes everything.
    pub breakpoints_px: Vec<f64>,
    /// Docked navigation button size the hero pill shrinks to.
    pub nav_pill_size: Size2,
    /// Layout anchor naming the navigation row.
    pub nav_row_anchor: String,
    /// Layout anchor naming the slot the pill centers on once docked.
    pub pill_dock_anchor: String,
    /// Fraction of the viewport height the cover parallax blocks travel.
    pub parallax_shift_ratio: f64,
    /// Playback rate of the one-shot intro (1.0 = authored timing).
    pub intro_speed: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sync_tolerance_px: 0.5,
            sync_ease_ms: 180.0,
            sync_ease: Ease::OutCubic,
            resize_quiet_ms: 150.0,
            boundary_epsilon_px: 1.0,
            scrub_settle_epsilon: 1e-4,
            breakpoints_px: vec![768.0, 1024.0],
            nav_pill_size: Size2 {
                width: 148.0,
                height: 44.0,
            },
            nav_row_anchor: "nav-row".to_owned(),
            pill_dock_anchor: "nav-pill-dock".to_owned(),
            parallax_shift_ratio: 0.25,
            intro_speed: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> ScrollweaveResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_path(path: impl AsRef<Path>) -> ScrollweaveResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            ScrollweaveError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Validate numeric invariants.
    pub fn validate(&self) -> ScrollweaveResult<()> {
        let non_negative = [
            ("sync_tolerance_px", self.sync_tolerance_px),
            ("sync_ease_ms", self.sync_ease_ms),
            ("resize_quiet_ms", self.resize_quiet_ms),
            ("boundary_epsilon_px", self.boundary_epsilon_px),
            ("scrub_settle_epsilon", self.scrub_settle_epsilon),
            ("parallax_shift_ratio", self.parallax_shift_ratio),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(ScrollweaveError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.intro_speed.is_finite() || self.intro_speed <= 0.0 {
            return Err(ScrollweaveError::validation("intro_speed must be > 0"));
        }
        if self.nav_pill_size.width <= 0.0 || self.nav_pill_size.height <= 0.0 {
            return Err(ScrollweaveError::validation(
                "nav_pill_size width/height must be > 0",
            ));
        }
        if !self.breakpoints_px.windows(2).all(|w| w[0] < w[1]) {
            return Err(ScrollweaveError::validation(
                "breakpoints_px must be strictly ascending",
            ));
        }
        if self.nav_row_anchor.trim().is_empty() || self.pill_dock_anchor.trim().is_empty() {
            return Err(ScrollweaveError::validation("anchor names must be non-empty"));
        }
        Ok(())
    }

    /// Index of the breakpoint band a viewport width falls into.
    pub fn breakpoint_band(&self, width: f64) -> usize {
        self.breakpoints_px.partition_point(|&bp| bp <= width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
