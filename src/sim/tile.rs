//! Tile definitions and placements
//!
//! A level is an ordered list of [`PlacedTile`]s. Each tick works on
//! [`RuntimeTile`]s, which add the moving-platform displacement derived from
//! simulation time.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Tile kinds the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    None,
    Block,
    Spike,
    HalfBlock,
    MovingPlatform,
}

impl TileType {
    /// Numeric code used by the level authoring format
    pub fn code(self) -> i64 {
        match self {
            TileType::None => -1,
            TileType::Block => 0,
            TileType::Spike => 1,
            TileType::HalfBlock => 2,
            TileType::MovingPlatform => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(TileType::None),
            0 => Some(TileType::Block),
            1 => Some(TileType::Spike),
            2 => Some(TileType::HalfBlock),
            3 => Some(TileType::MovingPlatform),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TileType::None => "None",
            TileType::Block => "Block",
            TileType::Spike => "Spike",
            TileType::HalfBlock => "HalfBlock",
            TileType::MovingPlatform => "MovingPlatform",
        }
    }
}

/// Clockwise quarter turns (screen space, y grows downward)
///
/// For spikes this names the edge the base sits on: `Deg0` bottom, `Deg90`
/// left, `Deg180` top, `Deg270` right. For moving platforms it is the
/// direction of travel: `Deg0` +x, `Deg90` +y, `Deg180` -x, `Deg270` -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Rotation::Deg0),
            1 => Some(Rotation::Deg90),
            2 => Some(Rotation::Deg180),
            3 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Next quarter turn clockwise
    pub fn rotated(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Unit axis a moving platform travels along
    pub fn axis(self) -> DVec2 {
        match self {
            Rotation::Deg0 => DVec2::X,
            Rotation::Deg90 => DVec2::Y,
            Rotation::Deg180 => DVec2::NEG_X,
            Rotation::Deg270 => DVec2::NEG_Y,
        }
    }
}

/// Per-type tile properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TileShape {
    None,
    /// Solid unit square
    Block,
    /// Unit square minus a triangular dead zone
    Spike { direction: Rotation },
    /// One-way platform, collides on its top surface only
    HalfBlock,
    /// One-way platform sliding back and forth
    MovingPlatform {
        /// Time for one leg of the trip (> 0)
        period: f64,
        /// Distance covered by one leg
        amplitude: f64,
        direction: Rotation,
    },
}

impl TileShape {
    pub fn tile_type(&self) -> TileType {
        match self {
            TileShape::None => TileType::None,
            TileShape::Block => TileType::Block,
            TileShape::Spike { .. } => TileType::Spike,
            TileShape::HalfBlock => TileType::HalfBlock,
            TileShape::MovingPlatform { .. } => TileType::MovingPlatform,
        }
    }

    /// Top-surface-only collision
    pub fn is_one_way(&self) -> bool {
        matches!(self, TileShape::HalfBlock | TileShape::MovingPlatform { .. })
    }
}

/// Default moving platform leg duration
pub const DEFAULT_PLATFORM_PERIOD: f64 = 80.0;
/// Default moving platform travel distance
pub const DEFAULT_PLATFORM_AMPLITUDE: f64 = 5.0;

/// A tile template: shape, layer and trigger bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDefinition {
    pub shape: TileShape,
    /// Baked into the non-animated background layer
    pub is_static: bool,
    /// Reserved for triggers; the simulation never reads it
    #[serde(default)]
    pub events: BTreeMap<String, serde_json::Value>,
}

impl TileDefinition {
    pub fn new(shape: TileShape, is_static: bool) -> Self {
        Self {
            shape,
            is_static,
            events: BTreeMap::new(),
        }
    }

    /// Brush preset for a tile type
    pub fn preset(tile_type: TileType) -> Self {
        match tile_type {
            TileType::None => Self::new(TileShape::None, false),
            TileType::Block => Self::new(TileShape::Block, true),
            TileType::Spike => Self::new(
                TileShape::Spike {
                    direction: Rotation::Deg0,
                },
                true,
            ),
            TileType::HalfBlock => Self::new(TileShape::HalfBlock, true),
            TileType::MovingPlatform => Self::new(
                TileShape::MovingPlatform {
                    period: DEFAULT_PLATFORM_PERIOD,
                    amplitude: DEFAULT_PLATFORM_AMPLITUDE,
                    direction: Rotation::Deg0,
                },
                false,
            ),
        }
    }

    pub fn tile_type(&self) -> TileType {
        self.shape.tile_type()
    }
}

/// A tile placed in the level at grid coordinates
///
/// Coordinates are multiples of 0.5; the tile covers `[x, x+1] × [y, y+1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub definition: TileDefinition,
    pub pos: DVec2,
}

impl PlacedTile {
    pub fn new(definition: TileDefinition, x: f64, y: f64) -> Self {
        Self {
            definition,
            pos: DVec2::new(x, y),
        }
    }

    #[inline]
    pub fn shape(&self) -> &TileShape {
        &self.definition.shape
    }
}

/// Per-tick view of a placed tile
///
/// Rebuilt from the placed list on level load. Offsets are recomputed from
/// simulation time every tick, never accumulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeTile {
    pub tile: PlacedTile,
    /// Current displacement from the placed position
    pub offset: DVec2,
    /// Offset change across the last tick
    pub delta: DVec2,
}

impl RuntimeTile {
    pub fn new(tile: PlacedTile) -> Self {
        Self {
            tile,
            offset: DVec2::ZERO,
            delta: DVec2::ZERO,
        }
    }

    /// Effective top-left corner (placed position plus offset)
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.tile.pos + self.offset
    }

    #[inline]
    pub fn shape(&self) -> &TileShape {
        self.tile.shape()
    }
}

impl From<PlacedTile> for RuntimeTile {
    fn from(tile: PlacedTile) -> Self {
        Self::new(tile)
    }
}

/// Build the runtime list for a level, preserving order
pub fn build_runtime(tiles: &[PlacedTile]) -> Vec<RuntimeTile> {
    tiles.iter().cloned().map(RuntimeTile::new).collect()
}
