//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - No hidden state: every tick is a function of its inputs
//! - Stable iteration order (level order)
//! - No rendering or platform dependencies

pub mod geometry;
pub mod replay;
pub mod state;
pub mod tick;
pub mod tile;

pub use geometry::{intersect_rect, is_within, platform_offset, within_tile};
pub use replay::{Replay, ReplayFrame, ReplayMode};
pub use state::{ButtonState, PlayerState};
pub use tick::{TickInput, apply_death_bounce, death_fall, tick, touches_hazard};
pub use tile::{PlacedTile, Rotation, RuntimeTile, TileDefinition, TileShape, TileType};
