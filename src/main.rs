//! Headless runner
//!
//! Drives the simulation with scripted input, for replay capture and
//! physics debugging without a renderer.

use std::path::PathBuf;

use clap::Parser;

use nathan_platformer::sim::ButtonState;
use nathan_platformer::{
    Action, Controls, Level, SaveData, Settings, SimulationContext, TimeScalePreset,
};

/// Run the platformer simulation without a window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level JSON (editor format); the starter level when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,
    /// Settings JSON
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,
    /// Host frame rate the frames are measured at
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Speed preset (normal, half, slow, super-slow, crawl)
    #[arg(long)]
    speed: Option<String>,
    #[arg(long)]
    hold_right: bool,
    #[arg(long)]
    hold_left: bool,
    /// Press jump every K frames (0 disables)
    #[arg(long, default_value_t = 0)]
    jump_every: u32,
    /// Record the run
    #[arg(long)]
    record: bool,
    /// Write the recorded frames here as JSON (implies --record)
    #[arg(long)]
    replay_out: Option<PathBuf>,
}

fn main() -> nathan_platformer::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("I Wanna Be The Nathan (headless) starting...");

    let level = match &args.level {
        Some(path) => Level::load(path)?,
        None => Level::starter(),
    };
    let mut settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();
    if let Some(name) = &args.speed {
        match TimeScalePreset::from_str(name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown speed preset '{name}', keeping {}", settings.time_scale),
        }
    }

    let mut ctx = SimulationContext::new(level, settings, SaveData::new());
    let frame_seconds = if args.fps > 0.0 { 1.0 / args.fps } else { 1.0 / 60.0 };
    let record = args.record || args.replay_out.is_some();

    for frame in 0..args.frames {
        let controls = scripted_controls(&args, frame, record);
        ctx.step(frame_seconds, &controls);
        if frame % 60 == 0 {
            let p = ctx.player();
            log::debug!(
                "frame {frame}: pos ({:.3}, {:.3}) vel ({:.3}, {:.3}) jumps {}",
                p.pos.x,
                p.pos.y,
                p.vel.x,
                p.vel.y,
                p.remaining_jumps
            );
        }
    }

    let p = ctx.player();
    log::info!(
        "Finished {} frames: pos ({:.3}, {:.3}), t = {:.2}, dead = {}",
        args.frames,
        p.pos.x,
        p.pos.y,
        p.sim_time,
        p.is_dead
    );
    if let Some(message) = ctx.death_message() {
        log::info!("{message}");
    }

    if let Some(path) = &args.replay_out {
        let json = serde_json::to_string(ctx.replay().frames())?;
        std::fs::write(path, json).map_err(|e| nathan_platformer::Error::io(path, e))?;
        log::info!("Wrote {} replay frames to {}", ctx.replay().len(), path.display());
    }

    Ok(())
}

fn scripted_controls(args: &Args, frame: u32, record: bool) -> Controls {
    let held = |on: bool| if on { ButtonState::HELD } else { ButtonState::RELEASED };
    let mut controls = Controls::default()
        .with(Action::MoveLeft, held(args.hold_left))
        .with(Action::MoveRight, held(args.hold_right));
    if args.jump_every > 0 && frame % args.jump_every == 0 {
        controls.set(Action::Jump, ButtonState::PRESSED);
    }
    if record && frame == 0 {
        controls.set(Action::StartRecording, ButtonState::PRESSED);
    }
    controls
}
