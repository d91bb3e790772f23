//! Player state and per-tick button state
//!
//! Everything the replay log needs to reproduce a frame lives in
//! [`PlayerState`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_JUMPS;

/// Kinematic state of the single player body
///
/// `pos` is the bottom-center of a 0.5 × 0.5 body. Replaced wholesale on
/// restart; only the physics tick mutates it in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Smoothed left input in [0, 1]
    pub input_vel_left: f64,
    /// Smoothed right input in [0, 1]
    pub input_vel_right: f64,
    /// Jumps left before landing again (0..=2)
    pub remaining_jumps: u8,
    /// Stays set until a new life starts
    pub is_dead: bool,
    /// Simulation time this state belongs to
    pub sim_time: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            input_vel_left: 0.0,
            input_vel_right: 0.0,
            remaining_jumps: MAX_JUMPS,
            is_dead: false,
            sim_time: 0.0,
        }
    }
}

impl PlayerState {
    /// Fresh life at a spawn point
    pub fn spawn_at(pos: DVec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    /// Bit patterns of every field, for exact determinism comparisons
    pub fn bits(&self) -> [u64; 9] {
        [
            self.pos.x.to_bits(),
            self.pos.y.to_bits(),
            self.vel.x.to_bits(),
            self.vel.y.to_bits(),
            self.input_vel_left.to_bits(),
            self.input_vel_right.to_bits(),
            u64::from(self.remaining_jumps),
            u64::from(self.is_dead),
            self.sim_time.to_bits(),
        ]
    }
}

/// State of one button for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonState {
    /// Button is down this frame
    pub held: bool,
    /// Button went down this frame (implies `held`)
    pub pressed: bool,
}

impl ButtonState {
    pub const RELEASED: Self = Self {
        held: false,
        pressed: false,
    };
    pub const HELD: Self = Self {
        held: true,
        pressed: false,
    };
    pub const PRESSED: Self = Self {
        held: true,
        pressed: true,
    };

    /// Merge two bindings for the same action (e.g. Space and Z)
    pub fn or(self, other: Self) -> Self {
        Self {
            held: self.held || other.held,
            pressed: self.pressed || other.pressed,
        }
    }
}
