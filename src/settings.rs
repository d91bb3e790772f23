//! Game settings and physics tuning
//!
//! Serialized as JSON; unreadable settings fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Simulation speed presets offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeScalePreset {
    #[default]
    Normal,
    Half,
    SlowMotion,
    SuperSlowMotion,
    DontEvenBother,
}

impl TimeScalePreset {
    pub const ALL: [TimeScalePreset; 5] = [
        TimeScalePreset::Normal,
        TimeScalePreset::Half,
        TimeScalePreset::SlowMotion,
        TimeScalePreset::SuperSlowMotion,
        TimeScalePreset::DontEvenBother,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScalePreset::Normal => "Normal Speed",
            TimeScalePreset::Half => "Half Speed",
            TimeScalePreset::SlowMotion => "Slow-Motion",
            TimeScalePreset::SuperSlowMotion => "Super-Slow-Motion",
            TimeScalePreset::DontEvenBother => "Don't even bother",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "normal speed" | "1" => Some(TimeScalePreset::Normal),
            "half" | "half speed" => Some(TimeScalePreset::Half),
            "slow" | "slow-motion" => Some(TimeScalePreset::SlowMotion),
            "super-slow" | "super-slow-motion" => Some(TimeScalePreset::SuperSlowMotion),
            "crawl" | "don't even bother" => Some(TimeScalePreset::DontEvenBother),
            _ => None,
        }
    }

    /// Multiplier applied to the measured frame duration
    pub fn factor(&self) -> f64 {
        match self {
            TimeScalePreset::Normal => 1.0,
            TimeScalePreset::Half => 0.5,
            TimeScalePreset::SlowMotion => 0.1,
            TimeScalePreset::SuperSlowMotion => 0.05,
            TimeScalePreset::DontEvenBother => 0.01,
        }
    }
}

/// Tuning values read by the physics tick
///
/// Units are tiles and reference frames (1/60 s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    /// Ceiling on downward velocity
    pub terminal_velocity: f64,
    pub player_speed: f64,
    pub jump_impulse: f64,
    pub collision_margin: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            terminal_velocity: MAX_GRAVITY,
            player_speed: PLAYER_SPEED,
            jump_impulse: JUMP_HEIGHT,
            collision_margin: COLLISION_MARGIN,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation speed multiplier
    pub time_scale: f64,
    pub physics: PhysicsConfig,
    /// Seed for the death message picker
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_scale: TimeScalePreset::Normal.factor(),
            physics: PhysicsConfig::default(),
            seed: 0x1d3a_7e55,
        }
    }
}

impl Settings {
    /// Create settings running at a preset speed
    pub fn from_preset(preset: TimeScalePreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    pub fn apply_preset(&mut self, preset: TimeScalePreset) {
        self.time_scale = preset.factor();
    }

    /// Time scale with degenerate values replaced by normal speed
    pub fn effective_time_scale(&self) -> f64 {
        if self.time_scale.is_finite() && self.time_scale >= 0.0 {
            self.time_scale
        } else {
            1.0
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path)
            .map_err(|e| Error::io(path, e))
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_parse() {
        assert_eq!(TimeScalePreset::from_str("HALF"), Some(TimeScalePreset::Half));
        assert_eq!(TimeScalePreset::from_str("slow"), Some(TimeScalePreset::SlowMotion));
        assert_eq!(TimeScalePreset::from_str("warp"), None);
        for preset in TimeScalePreset::ALL {
            assert_eq!(TimeScalePreset::from_str(preset.as_str()), Some(preset));
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"time_scale": 0.5, "physics": {"gravity": 0.02}}"#)
            .unwrap();
        assert_eq!(settings.time_scale, 0.5);
        assert_eq!(settings.physics.gravity, 0.02);
        assert_eq!(settings.physics.terminal_velocity, MAX_GRAVITY);
        assert_eq!(settings.seed, Settings::default().seed);
    }

    #[test]
    fn test_bad_json_is_an_error_and_load_falls_back() {
        assert!(Settings::from_json("{not json").is_err());
        let settings = Settings::load(Path::new("/nonexistent/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_effective_time_scale() {
        let mut settings = Settings::from_preset(TimeScalePreset::SuperSlowMotion);
        assert_eq!(settings.effective_time_scale(), 0.05);
        settings.time_scale = f64::NAN;
        assert_eq!(settings.effective_time_scale(), 1.0);
    }
}
