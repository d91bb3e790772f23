//! Replay recording and playback
//!
//! Recording appends one player snapshot per frame; playback looks snapshots
//! up by an independent replay clock instead of running the physics tick.
//! Both rely on the tick being deterministic.

use serde::{Deserialize, Serialize};

use super::state::PlayerState;

/// What the recorder is doing; the states are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplayMode {
    #[default]
    Idle,
    Recording,
    Playing,
}

/// A player snapshot keyed by the simulation time it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub sim_time: f64,
    pub player: PlayerState,
}

/// Recorder/player for a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub mode: ReplayMode,
    /// Time scale active when recording started
    pub time_scale: f64,
    /// Playback clock
    pub clock: f64,
    /// Frames in insertion order (expected to be time order)
    frames: Vec<ReplayFrame>,
}

impl Default for Replay {
    fn default() -> Self {
        Self {
            mode: ReplayMode::Idle,
            time_scale: 1.0,
            clock: 0.0,
            frames: Vec::new(),
        }
    }
}

impl Replay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[ReplayFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_recording(&self) -> bool {
        self.mode == ReplayMode::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.mode == ReplayMode::Playing
    }

    /// Begin a fresh recording; any previous log is discarded
    pub fn start_recording(&mut self, time_scale: f64) {
        self.frames.clear();
        self.time_scale = time_scale;
        self.mode = ReplayMode::Recording;
        log::info!("Replay recording started (time scale {time_scale})");
    }

    /// Begin playback of the current log from time zero
    pub fn start_playing(&mut self) {
        self.clock = 0.0;
        self.mode = ReplayMode::Playing;
        log::info!("Replay playback started ({} frames)", self.frames.len());
    }

    pub fn stop_recording(&mut self) {
        if self.mode == ReplayMode::Recording {
            self.mode = ReplayMode::Idle;
            log::info!("Replay recording stopped ({} frames)", self.frames.len());
        }
    }

    pub fn stop_playing(&mut self) {
        if self.mode == ReplayMode::Playing {
            self.mode = ReplayMode::Idle;
            log::info!("Replay playback stopped");
        }
    }

    /// Return to idle, keeping the log
    pub fn stop(&mut self) {
        self.mode = ReplayMode::Idle;
    }

    /// Drop the log and rewind the playback clock; the mode is kept
    pub fn clear(&mut self) {
        self.frames.clear();
        self.clock = 0.0;
    }

    /// Append a snapshot while recording; ignored otherwise
    pub fn record(&mut self, player: &PlayerState) {
        if self.mode != ReplayMode::Recording {
            return;
        }
        self.frames.push(ReplayFrame {
            sim_time: player.sim_time,
            player: *player,
        });
    }

    /// Drop up to `count` frames, always keeping the first
    ///
    /// Returns the snapshot the live player should be reset to, or `None`
    /// when nothing has been recorded.
    pub fn rewind(&mut self, count: usize) -> Option<PlayerState> {
        let keep = self.frames.len().saturating_sub(count).max(1);
        self.frames.truncate(keep);
        let last = self.frames.last()?;
        log::debug!("Rewound replay to {} frames (t = {})", self.frames.len(), last.sim_time);
        Some(last.player)
    }

    /// Latest frame at or before `time`, by linear scan
    ///
    /// `None` when `time` precedes the first frame or the log is empty.
    pub fn frame_at(&self, time: f64) -> Option<&ReplayFrame> {
        self.frames.iter().take_while(|f| f.sim_time <= time).last()
    }

    /// Look up the snapshot for the current clock, then advance the clock
    ///
    /// Returns `None` (keep the current player) when the clock precedes the
    /// first frame.
    pub fn advance_playback(&mut self, dt: f64) -> Option<PlayerState> {
        let snapshot = self.frame_at(self.clock).map(|f| f.player);
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        snapshot
    }
}
