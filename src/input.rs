//! Key edge tracking
//!
//! The host forwards raw key-down/key-up events; once per frame the tracker
//! turns them into held/pressed state for every action.

use serde::{Deserialize, Serialize};

use crate::sim::{ButtonState, TickInput};

/// Everything the simulation can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Restart,
    StartRecording,
    StartPlaying,
    StopRecording,
    StopPlaying,
    Rewind,
}

impl Action {
    pub const COUNT: usize = 9;

    pub const ALL: [Action; Self::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Restart,
        Action::StartRecording,
        Action::StartPlaying,
        Action::StopRecording,
        Action::StopPlaying,
        Action::Rewind,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame button state for all actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    buttons: [ButtonState; Action::COUNT],
}

impl Controls {
    pub fn get(&self, action: Action) -> ButtonState {
        self.buttons[action.index()]
    }

    pub fn set(&mut self, action: Action, state: ButtonState) {
        self.buttons[action.index()] = state;
    }

    /// Builder form of [`Controls::set`]
    pub fn with(mut self, action: Action, state: ButtonState) -> Self {
        self.set(action, state);
        self
    }

    pub fn pressed(&self, action: Action) -> bool {
        self.get(action).pressed
    }

    pub fn held(&self, action: Action) -> bool {
        self.get(action).held
    }

    /// Movement subset consumed by the physics tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.get(Action::MoveLeft),
            right: self.get(Action::MoveRight),
            jump: self.get(Action::Jump),
        }
    }
}

/// Converts key events into per-frame edges
///
/// Each action counts the frames it has been down: `None` while up, 0 right
/// after the key-down event, and `pressed` only on the frame the count
/// reaches 1.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    frames_down: [Option<u32>; Action::COUNT],
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, action: Action) {
        // Key repeat must not re-trigger the edge
        let slot = &mut self.frames_down[action.index()];
        if slot.is_none() {
            *slot = Some(0);
        }
    }

    pub fn key_up(&mut self, action: Action) {
        self.frames_down[action.index()] = None;
    }

    /// Release everything (e.g. on focus loss)
    pub fn release_all(&mut self) {
        self.frames_down = [None; Action::COUNT];
    }

    /// Advance one frame and report the resulting state
    pub fn advance(&mut self) -> Controls {
        let mut controls = Controls::default();
        for action in Action::ALL {
            let slot = &mut self.frames_down[action.index()];
            if let Some(frames) = slot {
                *frames = frames.saturating_add(1);
                controls.set(
                    action,
                    ButtonState {
                        held: true,
                        pressed: *frames == 1,
                    },
                );
            }
        }
        controls
    }
}
