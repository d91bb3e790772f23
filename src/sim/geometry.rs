//! Tile geometry: point containment, rectangle tests and platform motion
//!
//! All functions are pure. Degenerate inputs (zero period, NaN) resolve to a
//! neutral answer instead of dividing by zero.

use glam::DVec2;

use super::tile::{PlacedTile, Rotation, TileShape};
use crate::lerp;

/// Axis-aligned rectangle in tile units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }
}

/// Inclusive point-in-rectangle test
#[inline]
pub fn is_within(p: DVec2, rect: Rect) -> bool {
    let max = rect.max();
    p.x >= rect.min.x && p.x <= max.x && p.y >= rect.min.y && p.y <= max.y
}

/// Open rectangle overlap; touching edges do not intersect
#[inline]
pub fn intersect_rect(a: Rect, b: Rect) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    !(b.min.x >= a_max.x || b_max.x <= a.min.x || b.min.y >= a_max.y || b_max.y <= a.min.y)
}

/// Whether `(x, y)` lies strictly inside the solid part of a tile
///
/// Blocks are the open unit square. Spikes carve a triangular dead zone out
/// of that square; the dead zone's width shrinks linearly from 0.5 at the tip
/// edge to 0 at the base edge. Half blocks and moving platforms only collide
/// from above and never contain points.
pub fn within_tile(tile: &PlacedTile, x: f64, y: f64) -> bool {
    let ox = tile.pos.x;
    let oy = tile.pos.y;
    let in_x = x > ox && x < ox + 1.0;
    let in_y = y > oy && y < oy + 1.0;

    match tile.shape() {
        TileShape::Block => in_x && in_y,
        TileShape::Spike { direction } => match direction {
            Rotation::Deg0 => {
                let inset = lerp(0.5, 0.0, y - oy);
                x > ox + inset && x < ox + 1.0 - inset && in_y
            }
            Rotation::Deg90 => {
                let inset = lerp(0.0, 0.5, x - ox);
                in_x && y > oy + inset && y < oy + 1.0 - inset
            }
            Rotation::Deg180 => {
                let inset = lerp(0.0, 0.5, y - oy);
                x > ox + inset && x < ox + 1.0 - inset && in_y
            }
            Rotation::Deg270 => {
                let inset = lerp(0.5, 0.0, x - ox);
                in_x && y > oy + inset && y < oy + 1.0 - inset
            }
        },
        TileShape::None | TileShape::HalfBlock | TileShape::MovingPlatform { .. } => false,
    }
}

/// Triangle-wave displacement of a moving platform at `time`
///
/// Rises from 0 to `amplitude` over the first `period`, falls back over the
/// next, and repeats with period `2 * period`. A non-positive or non-finite
/// period means the platform does not move.
pub fn platform_offset(time: f64, period: f64, amplitude: f64) -> f64 {
    if !(period > 0.0) || !period.is_finite() || !time.is_finite() {
        return 0.0;
    }
    // Phase and progress come from the same quotient so the wave cannot jump
    // when the division rounds onto a leg boundary.
    let legs = time / period;
    let phase = legs.floor();
    let progress = legs - phase;
    if phase % 2.0 == 0.0 {
        progress * amplitude
    } else {
        (1.0 - progress) * amplitude
    }
}

/// Displacement vector of a tile at `time`; zero for anything but platforms
pub fn tile_displacement(shape: &TileShape, time: f64) -> DVec2 {
    match *shape {
        TileShape::MovingPlatform {
            period,
            amplitude,
            direction,
        } => direction.axis() * platform_offset(time, period, amplitude),
        _ => DVec2::ZERO,
    }
}
