//! Host-loop driver
//!
//! [`SimulationContext`] owns everything the game mutates between frames:
//! the level, runtime tiles, player, replay and progress. The host calls
//! [`SimulationContext::step`] once per frame with the measured frame
//! duration and the frame's controls.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{REFERENCE_FPS, REWIND_FRAMES};
use crate::input::{Action, Controls};
use crate::level::Level;
use crate::save::SaveData;
use crate::settings::{Settings, TimeScalePreset};
use crate::sim::{PlayerState, Replay, RuntimeTile, apply_death_bounce, death_fall, tick};

/// Shown when the player dies; one is picked at random per death
pub const DEATH_MESSAGES: [&str; 27] = [
    "So soon?",
    "That was close!",
    "So close, yet so very far.",
    "Maybe if you just tried not dying?",
    "Just jump better!",
    "I got it on my first try.",
    "Why is this such a struggle for you?",
    "You seem angry. Is that just me?",
    "This might be too hard for you.",
    "C'mon, this is so easy!",
    "Get better.",
    "Soooo bad.",
    "A monkey could play better than you.",
    "Are these messages annoying?",
    "You know you're not supposed to die, right?",
    "Helpful tip: press Z or space to jump!",
    "Maybe it's time for a break?",
    "Stop dying so much!",
    "I don't see how this is so hard.",
    "You'll get it next time! /s",
    "Is this your first time on a computer?",
    "This is hard to watch.",
    "Don't get mad, it's just a game bro.",
    "Oooh, that was pretty bad.",
    "You suck.",
    "You'll never be THE NATHAN at this rate...",
    "Don't even try anymore.",
];

/// All mutable simulation state, owned by the host loop
#[derive(Debug, Clone)]
pub struct SimulationContext {
    level: Level,
    tiles: Vec<RuntimeTile>,
    player: PlayerState,
    replay: Replay,
    save: SaveData,
    settings: Settings,
    rng: Pcg32,
    death_message: Option<usize>,
}

impl SimulationContext {
    pub fn new(level: Level, settings: Settings, save: SaveData) -> Self {
        let tiles = level.runtime_tiles();
        let rng = Pcg32::seed_from_u64(settings.seed);
        Self {
            level,
            tiles,
            player: PlayerState::default(),
            replay: Replay::new(),
            save,
            settings,
            rng,
            death_message: None,
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn tiles(&self) -> &[RuntimeTile] {
        &self.tiles
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_time_scale(&mut self, preset: TimeScalePreset) {
        self.settings.apply_preset(preset);
        log::info!("Time scale set to {} ({})", preset.as_str(), preset.factor());
    }

    /// Message for the current death, if the player is dead
    pub fn death_message(&self) -> Option<&'static str> {
        self.death_message.map(|i| DEATH_MESSAGES[i])
    }

    /// Replace the level, rebuild runtime tiles and start a new life
    pub fn load_level(&mut self, level: Level) {
        self.level = level;
        self.tiles = self.level.runtime_tiles();
        self.replay.stop();
        self.restart();
        log::info!("Level loaded ({} tiles)", self.level.tiles.len());
    }

    /// Start a new life; counts as a death
    pub fn restart(&mut self) {
        self.player = PlayerState::default();
        self.death_message = None;
        self.save.record_death();
    }

    /// Restart with progress wiped and the level rebuilt
    pub fn reset(&mut self) {
        self.restart();
        self.save = SaveData::new();
        self.tiles = self.level.runtime_tiles();
    }

    /// Drop the last frames of the recording and resume from the new end
    ///
    /// Returns false when nothing is being recorded.
    pub fn rewind(&mut self) -> bool {
        if !self.replay.is_recording() {
            return false;
        }
        match self.replay.rewind(REWIND_FRAMES) {
            Some(snapshot) => {
                self.player = snapshot;
                self.death_message = None;
                true
            }
            None => false,
        }
    }

    /// Throw away the recorded log and reset the playback clock
    pub fn clear_replay(&mut self) {
        self.replay.clear();
        log::info!("Replay log cleared");
    }

    /// Simulation time covered by a frame of `frame_seconds` wall time
    pub fn frame_dt(&self, frame_seconds: f64) -> f64 {
        frame_seconds * REFERENCE_FPS * self.settings.effective_time_scale()
    }

    /// Run one host frame
    ///
    /// A frame whose duration is zero, negative or not finite is dropped
    /// whole: neither its VCR presses nor its movement take effect.
    pub fn step(&mut self, frame_seconds: f64, controls: &Controls) {
        if !(frame_seconds.is_finite() && frame_seconds > 0.0) {
            return;
        }
        let dt = self.frame_dt(frame_seconds);

        self.apply_vcr_controls(controls);

        if self.replay.is_recording() {
            self.replay.record(&self.player);
            if controls.pressed(Action::Rewind) {
                self.rewind();
            }
        }

        if self.player.is_dead {
            self.player = death_fall(&self.player, dt, &self.settings.physics);
            return;
        }

        if self.replay.is_playing() {
            if let Some(snapshot) = self.replay.advance_playback(dt) {
                self.player = snapshot;
            }
        } else {
            self.player = tick(
                dt,
                &self.player,
                &controls.tick_input(),
                &mut self.tiles,
                &self.settings.physics,
            );
        }

        if self.player.is_dead {
            self.on_death();
        }
    }

    fn apply_vcr_controls(&mut self, controls: &Controls) {
        if controls.pressed(Action::Restart) {
            self.replay.stop();
            self.restart();
        }
        if controls.pressed(Action::StartRecording) {
            self.replay.start_recording(self.settings.time_scale);
            self.restart();
        }
        if controls.pressed(Action::StartPlaying) {
            self.replay.start_playing();
            self.restart();
        }
        if controls.pressed(Action::StopRecording) {
            self.replay.stop_recording();
        }
        if controls.pressed(Action::StopPlaying) {
            self.replay.stop_playing();
        }
    }

    fn on_death(&mut self) {
        apply_death_bounce(&mut self.player);
        let index = self.rng.random_range(0..DEATH_MESSAGES.len());
        self.death_message = Some(index);
        log::info!(
            "Player died at ({:.3}, {:.3}), t = {:.2}: {}",
            self.player.pos.x,
            self.player.pos.y,
            self.player.sim_time,
            DEATH_MESSAGES[index]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::COLLISION_MARGIN;
    use crate::sim::{ButtonState, PlacedTile, TileDefinition, TileType};

    const FRAME: f64 = 1.0 / 60.0;

    fn pressed(action: Action) -> Controls {
        Controls::default().with(action, ButtonState::PRESSED)
    }

    fn context() -> SimulationContext {
        SimulationContext::new(Level::starter(), Settings::default(), SaveData::new())
    }

    #[test]
    fn test_player_lands_on_starter_floor() {
        let mut ctx = context();
        for _ in 0..200 {
            ctx.step(FRAME, &Controls::default());
        }
        assert!((ctx.player().pos.y - (10.0 - COLLISION_MARGIN)).abs() < 1e-12);
        assert_eq!(ctx.player().vel.y, 0.0);
        assert!(!ctx.player().is_dead);
    }

    #[test]
    fn test_time_scale_shrinks_step() {
        let mut ctx = context();
        ctx.set_time_scale(TimeScalePreset::Half);
        assert!((ctx.frame_dt(FRAME) - 0.5).abs() < 1e-12);
        ctx.step(FRAME, &Controls::default());
        assert!((ctx.player().sim_time - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_frame_is_skipped() {
        let mut ctx = context();
        ctx.step(0.0, &Controls::default());
        ctx.step(-1.0, &Controls::default());
        ctx.step(f64::INFINITY, &Controls::default());
        assert_eq!(*ctx.player(), PlayerState::default());
    }

    #[test]
    fn test_record_and_rewind() {
        let mut ctx = context();
        ctx.step(FRAME, &pressed(Action::StartRecording));
        for _ in 1..100 {
            ctx.step(FRAME, &Controls::default());
        }
        assert_eq!(ctx.replay().len(), 100);

        assert!(ctx.rewind());
        assert_eq!(ctx.replay().len(), 70);
        let last = ctx.replay().frames().last().unwrap();
        assert_eq!(ctx.player().bits(), last.player.bits());
    }

    #[test]
    fn test_rewind_button_resumes_from_kept_frame() {
        for recorded in [100, 10] {
            let mut ctx = context();
            ctx.step(FRAME, &pressed(Action::StartRecording));
            for _ in 1..recorded {
                ctx.step(FRAME, &Controls::default());
            }
            assert_eq!(ctx.replay().len(), recorded);

            // The rewind frame appends its own snapshot before truncating
            let rewind = pressed(Action::Rewind);
            let mut tiles = ctx.tiles().to_vec();
            ctx.step(FRAME, &rewind);
            let kept = (recorded + 1).saturating_sub(REWIND_FRAMES).max(1);
            assert_eq!(ctx.replay().len(), kept);

            let restored = ctx.replay().frames()[kept - 1].player;
            let expected = tick(
                ctx.frame_dt(FRAME),
                &restored,
                &rewind.tick_input(),
                &mut tiles,
                &ctx.settings().physics,
            );
            assert_eq!(ctx.player().bits(), expected.bits());
        }
    }

    #[test]
    fn test_rewind_button_revives_dead_player() {
        let mut level = Level::starter();
        level.tiles.push(PlacedTile::new(
            TileDefinition::preset(TileType::Spike),
            -0.5,
            9.0,
        ));
        let mut ctx = SimulationContext::new(level, Settings::default(), SaveData::new());
        ctx.step(FRAME, &pressed(Action::StartRecording));
        for _ in 0..200 {
            if ctx.player().is_dead {
                break;
            }
            ctx.step(FRAME, &Controls::default());
        }
        assert!(ctx.player().is_dead);
        assert!(ctx.death_message().is_some());

        ctx.step(FRAME, &pressed(Action::Rewind));
        assert!(!ctx.player().is_dead);
        assert_eq!(ctx.death_message(), None);
        assert!(ctx.replay().frames().iter().all(|f| !f.player.is_dead));
    }

    #[test]
    fn test_clear_replay_resets_clock() {
        let mut ctx = context();
        ctx.step(FRAME, &pressed(Action::StartRecording));
        for _ in 0..20 {
            ctx.step(FRAME, &Controls::default());
        }
        ctx.step(FRAME, &pressed(Action::StartPlaying));
        ctx.step(FRAME, &Controls::default());
        assert!(ctx.replay().clock > 0.0);

        ctx.clear_replay();
        assert!(ctx.replay().is_empty());
        assert_eq!(ctx.replay().clock, 0.0);
        // An empty log holds the player in place
        let before = *ctx.player();
        ctx.step(FRAME, &Controls::default());
        assert_eq!(ctx.player().bits(), before.bits());
    }

    #[test]
    fn test_vcr_press_in_dropped_frame_is_ignored() {
        let mut ctx = context();
        ctx.step(0.0, &pressed(Action::StartRecording));
        assert!(!ctx.replay().is_recording());
        assert_eq!(ctx.save_data().deaths, 0);
    }

    #[test]
    fn test_rewind_requires_recording() {
        let mut ctx = context();
        ctx.step(FRAME, &Controls::default());
        assert!(!ctx.rewind());
    }

    #[test]
    fn test_playback_reproduces_recording() {
        let mut ctx = context();
        let right = Controls::default().with(Action::MoveRight, ButtonState::HELD);
        ctx.step(FRAME, &pressed(Action::StartRecording).with(Action::MoveRight, ButtonState::HELD));
        for _ in 1..120 {
            ctx.step(FRAME, &right);
        }
        ctx.step(FRAME, &pressed(Action::StopRecording));
        let recorded = ctx.replay().frames().to_vec();

        ctx.step(FRAME, &pressed(Action::StartPlaying));
        // The first playback frame shows the first recorded snapshot
        assert_eq!(ctx.player().bits(), recorded[0].player.bits());
        for frame in recorded.iter().skip(1).take(60) {
            ctx.step(FRAME, &Controls::default());
            assert_eq!(ctx.player().bits(), frame.player.bits());
        }
    }

    #[test]
    fn test_restart_counts_deaths_and_reset_clears() {
        let mut ctx = context();
        ctx.step(FRAME, &pressed(Action::Restart));
        ctx.step(FRAME, &pressed(Action::Restart));
        assert_eq!(ctx.save_data().deaths, 2);
        ctx.reset();
        assert_eq!(*ctx.save_data(), SaveData::new());
    }

    #[test]
    fn test_spike_death_bounces_then_falls() {
        let mut level = Level::starter();
        level.tiles.push(PlacedTile::new(
            TileDefinition::preset(TileType::Spike),
            -0.5,
            9.0,
        ));
        let mut ctx = SimulationContext::new(level, Settings::default(), SaveData::new());
        let mut died_at = None;
        for i in 0..200 {
            ctx.step(FRAME, &Controls::default());
            if ctx.player().is_dead {
                died_at = Some(i);
                break;
            }
        }
        assert!(died_at.is_some());
        assert!(ctx.death_message().is_some());
        // Bounce sends the player upward
        assert!(ctx.player().vel.y < 0.0);

        let before = *ctx.player();
        ctx.step(FRAME, &Controls::default());
        assert!(ctx.player().is_dead);
        assert_eq!(ctx.player().pos, before.pos + before.vel * ctx.frame_dt(FRAME));
        // Falling after death does not advance simulation time
        assert_eq!(ctx.player().sim_time, before.sim_time);
    }

    #[test]
    fn test_load_level_restarts() {
        let mut ctx = context();
        for _ in 0..10 {
            ctx.step(FRAME, &Controls::default());
        }
        ctx.load_level(Level::default());
        assert!(ctx.tiles().is_empty());
        assert_eq!(ctx.player().sim_time, 0.0);
    }
}
