//! Variable timestep simulation tick
//!
//! Maps (previous player state, input, tiles, dt) to the next player state.
//! The tick keeps no state of its own, so identical input streams replay
//! bit-identically.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, intersect_rect, is_within, tile_displacement, within_tile};
use super::state::{ButtonState, PlayerState};
use super::tile::{RuntimeTile, TileShape};
use crate::consts::*;
use crate::settings::PhysicsConfig;
use crate::{lerp, sign};

/// Movement input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: ButtonState,
    pub right: ButtonState,
    /// `pressed` fires the impulse, `held` softens gravity while rising
    pub jump: ButtonState,
}

/// Points sampled against spikes, relative to the player's bottom-center
const BODY_CORNERS: [DVec2; 4] = [
    DVec2::new(-PLAYER_HALF_WIDTH, -PLAYER_HEIGHT),
    DVec2::new(PLAYER_HALF_WIDTH, -PLAYER_HEIGHT),
    DVec2::new(-PLAYER_HALF_WIDTH, 0.0),
    DVec2::new(PLAYER_HALF_WIDTH, 0.0),
];

/// Death bounce: vertical velocity is reflected, scaled and kicked upward
const DEATH_BOUNCE_DAMPING: f64 = 0.25;
const DEATH_BOUNCE_KICK: f64 = 0.05;

/// Position, velocity and jumps as collision passes refine them
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    pos: DVec2,
    vel: DVec2,
    jumps: u8,
}

/// Values fixed for the whole tick that every collision pass reads
struct Sweep<'a> {
    tiles: &'a [RuntimeTile],
    /// Position before integration
    prev_pos: DVec2,
    /// Sign of integrated displacement per axis (-1, 0, 1)
    dir: DVec2,
    dt: f64,
    margin: f64,
}

/// Advance the player by `dt` and refresh moving-tile offsets
///
/// `prev` is read in full before anything is written; the new state is
/// returned. Tile offsets are recomputed in place for the end of the tick.
/// A negative or non-finite `dt` is treated as zero.
pub fn tick(
    dt: f64,
    prev: &PlayerState,
    input: &TickInput,
    tiles: &mut [RuntimeTile],
    config: &PhysicsConfig,
) -> PlayerState {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    // Input smoothing (one-step low-pass toward the held target)
    let input_vel_left = lerp(prev.input_vel_left, held_target(input.left), INPUT_BLEND);
    let input_vel_right = lerp(prev.input_vel_right, held_target(input.right), INPUT_BLEND);

    // Accelerations
    let input_speed = (input_vel_right - input_vel_left) * config.player_speed * 0.5;
    let acc_x = input_speed - drag_force(prev.vel.x, config.player_speed);
    let rising_with_jump_held = prev.vel.y < 0.0 && input.jump.held;
    let acc_y = config.gravity * if rising_with_jump_held { 0.5 } else { 1.0 };

    // Velocity integration
    let mut vel = DVec2::new(prev.vel.x + acc_x * dt, prev.vel.y + acc_y * dt);
    vel.y = vel.y.min(config.terminal_velocity);

    // Jump on the rising edge; the impulse cancels the current fall first
    let mut jumps = prev.remaining_jumps;
    if input.jump.pressed && jumps > 0 {
        vel.y -= config.jump_impulse + prev.vel.y;
        vel.y = vel.y.min(config.terminal_velocity);
        jumps -= 1;
    }

    // Trapezoidal position integration
    let pos = prev.pos + (prev.vel + vel) / 2.0 * dt;
    let dir = DVec2::new(sign(pos.x - prev.pos.x), sign(pos.y - prev.pos.y));

    let end_time = prev.sim_time + dt;
    refresh_tiles(tiles, prev.sim_time, end_time);

    let sweep = Sweep {
        tiles,
        prev_pos: prev.pos,
        dir,
        dt,
        margin: config.collision_margin,
    };
    let motion = resolve_x(&sweep, Motion { pos, vel, jumps });
    let motion = resolve_y(&sweep, motion);

    let is_dead = prev.is_dead || touches_hazard(tiles, motion.pos);

    PlayerState {
        pos: motion.pos,
        vel: motion.vel,
        input_vel_left,
        input_vel_right,
        remaining_jumps: motion.jumps,
        is_dead,
        sim_time: end_time,
    }
}

#[inline]
fn held_target(button: ButtonState) -> f64 {
    if button.held { 1.0 } else { 0.0 }
}

/// Deceleration opposing `vel_x`, never larger than `|vel_x|`
pub fn drag_force(vel_x: f64, player_speed: f64) -> f64 {
    let ratio = vel_x / player_speed;
    sign(vel_x) * (ratio * ratio).max(0.0).min(vel_x.abs())
}

/// Recompute every tile's offset for `end` and record the change since `start`
fn refresh_tiles(tiles: &mut [RuntimeTile], start: f64, end: f64) {
    for tile in tiles.iter_mut() {
        let before = tile_displacement(tile.shape(), start);
        tile.offset = tile_displacement(tile.shape(), end);
        tile.delta = tile.offset - before;
    }
}

/// Coarse 4×4 window around the player a tile origin must fall in
#[inline]
fn in_reach(origin: DVec2, pos: DVec2) -> bool {
    let window = Rect::new(
        pos.x - BROAD_PHASE_REACH,
        pos.y - BROAD_PHASE_REACH,
        2.0 * BROAD_PHASE_REACH,
        2.0 * BROAD_PHASE_REACH,
    );
    is_within(origin, window)
}

/// Horizontal pass against blocks, tested at the pre-tick height
///
/// Tiles resolve in level order; a later block overrides an earlier clamp.
fn resolve_x(sweep: &Sweep<'_>, mut m: Motion) -> Motion {
    for tile in sweep.tiles {
        if !matches!(tile.shape(), TileShape::Block) {
            continue;
        }
        let origin = tile.origin();
        if !in_reach(origin, m.pos) {
            continue;
        }

        let body = Rect::new(
            m.pos.x - PLAYER_HALF_WIDTH,
            sweep.prev_pos.y - PLAYER_HEIGHT,
            2.0 * PLAYER_HALF_WIDTH,
            PLAYER_HEIGHT,
        );
        let bounds = Rect::new(origin.x - sweep.margin, origin.y, 1.0 + 2.0 * sweep.margin, 1.0);
        if !intersect_rect(body, bounds) {
            continue;
        }

        if sweep.dir.x > 0.0 {
            m.pos.x = origin.x - PLAYER_HALF_WIDTH - sweep.margin;
            m.vel.x = 0.0;
        } else if sweep.dir.x < 0.0 {
            m.pos.x = origin.x + 1.0 + PLAYER_HALF_WIDTH + sweep.margin;
            m.vel.x = 0.0;
        }
    }
    m
}

/// Vertical pass: solid blocks plus one-way half blocks and platforms
///
/// Landing on a moving platform carries the player with it and re-runs the
/// horizontal pass once. `resolve_x` never calls back here, so the re-entry
/// depth is bounded at one.
fn resolve_y(sweep: &Sweep<'_>, mut m: Motion) -> Motion {
    for tile in sweep.tiles {
        let origin = tile.origin();
        if !in_reach(origin, m.pos) {
            continue;
        }

        match tile.shape() {
            TileShape::Block => {
                let body = Rect::new(
                    m.pos.x - PLAYER_HALF_WIDTH,
                    m.pos.y - PLAYER_HEIGHT,
                    2.0 * PLAYER_HALF_WIDTH,
                    PLAYER_HEIGHT,
                );
                if !intersect_rect(body, Rect::new(origin.x, origin.y, 1.0, 1.0)) {
                    continue;
                }
                if sweep.dir.y > 0.0 {
                    m.pos.y = origin.y - sweep.margin;
                    m.vel.y = 0.0;
                    m.jumps = MAX_JUMPS;
                } else if sweep.dir.y < 0.0 {
                    m.pos.y = origin.y + 1.0 + PLAYER_HEIGHT + sweep.margin;
                    m.vel.y = 0.0;
                }
            }
            shape @ (TileShape::HalfBlock | TileShape::MovingPlatform { .. }) => {
                let top = origin.y;
                let crossed_top = sweep.prev_pos.y < top && m.pos.y > top;
                let overlaps_x = m.pos.x + PLAYER_HALF_WIDTH > origin.x
                    && m.pos.x - PLAYER_HALF_WIDTH < origin.x + 1.0;
                if !(m.vel.y >= 0.0 && crossed_top && overlaps_x) {
                    continue;
                }

                m.pos.y = top - sweep.margin;
                m.vel.y = 0.0;
                m.jumps = MAX_JUMPS;

                if matches!(shape, TileShape::MovingPlatform { .. }) {
                    m.pos.x += platform_carry(tile, sweep.dt);
                    m = resolve_x(sweep, m);
                }
            }
            TileShape::Spike { .. } | TileShape::None => {}
        }
    }
    m
}

/// Horizontal carry from a platform's last-tick displacement, per unit time
fn platform_carry(tile: &RuntimeTile, dt: f64) -> f64 {
    if dt > 0.0 { tile.delta.x / dt } else { 0.0 }
}

/// Whether any body corner at `pos` lies inside a spike
///
/// Spikes are tested at their placed position, ignoring any offset.
pub fn touches_hazard(tiles: &[RuntimeTile], pos: DVec2) -> bool {
    tiles
        .iter()
        .filter(|t| matches!(t.shape(), TileShape::Spike { .. }))
        .filter(|t| in_reach(t.tile.pos, pos))
        .any(|t| {
            BODY_CORNERS
                .iter()
                .any(|c| within_tile(&t.tile, pos.x + c.x, pos.y + c.y))
        })
}

/// Reflect and damp velocity on the tick the player dies
pub fn apply_death_bounce(player: &mut PlayerState) {
    player.vel.y *= -DEATH_BOUNCE_DAMPING;
    player.vel.y -= DEATH_BOUNCE_KICK;
    player.vel.x *= -1.0;
}

/// Collision-free fall used after death until restart
pub fn death_fall(player: &PlayerState, dt: f64, config: &PhysicsConfig) -> PlayerState {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
    let mut next = *player;
    next.pos += player.vel * dt;
    next.vel.y += config.gravity / 4.0 * dt;
    next
}
