//! I Wanna Be The Nathan - a tile-based platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, geometry, physics tick, replay)
//! - `level`: Level authoring format and load-time validation
//! - `session`: Host-loop driver owning all simulation state
//! - `input`: Key edge tracking (held vs. pressed this frame)
//! - `settings`: Physics tuning and time-scale presets
//! - `save`: Persisted progress record

pub mod error;
pub mod input;
pub mod level;
pub mod save;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use input::{Action, Controls, InputTracker};
pub use level::Level;
pub use save::SaveData;
pub use session::SimulationContext;
pub use settings::{PhysicsConfig, Settings, TimeScalePreset};

/// Game configuration constants
pub mod consts {
    /// Frame rate the per-frame tuning values were authored against
    pub const REFERENCE_FPS: f64 = 60.0;

    /// Map dimensions (tiles)
    pub const MAP_WIDTH: u32 = 30;
    pub const MAP_HEIGHT: u32 = 25;

    /// Downward acceleration (tiles/frame²)
    pub const GRAVITY: f64 = 0.015;
    /// Terminal falling speed (tiles/frame)
    pub const MAX_GRAVITY: f64 = 0.2;
    /// Horizontal speed scale
    pub const PLAYER_SPEED: f64 = 0.2;
    /// Upward impulse applied by a jump
    pub const JUMP_HEIGHT: f64 = 0.2;
    /// Jumps restored on landing
    pub const MAX_JUMPS: u8 = 2;
    /// One-step low-pass factor for left/right input
    pub const INPUT_BLEND: f64 = 0.5;

    /// Buffer added to collision clamps to avoid re-collision
    pub const COLLISION_MARGIN: f64 = 0.001;
    /// Player body: 0.5 wide, 0.5 tall, anchored at bottom-center
    pub const PLAYER_HALF_WIDTH: f64 = 0.25;
    pub const PLAYER_HEIGHT: f64 = 0.5;
    /// Half-size of the coarse window tiles must fall in to be tested
    pub const BROAD_PHASE_REACH: f64 = 2.0;

    /// Frames dropped by one rewind while recording
    pub const REWIND_FRAMES: usize = 30;
}

/// Linear interpolation, `amt = 0` gives `start`
#[inline]
pub fn lerp(start: f64, stop: f64, amt: f64) -> f64 {
    amt * (stop - start) + start
}

/// Sign of `v` as -1, 0 or 1 (zero maps to zero, unlike `f64::signum`)
#[inline]
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
