//! Level authoring format and load-time validation
//!
//! Levels are stored the way the editor writes them: a JSON array of tiles
//! with a numeric type code and a free-form property bag. Loading turns each
//! bag into a typed [`TileShape`] once, so the tick never has to look up
//! properties. Bad properties degrade to defaults instead of failing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::sim::tile::{
    DEFAULT_PLATFORM_AMPLITUDE, DEFAULT_PLATFORM_PERIOD, PlacedTile, Rotation, RuntimeTile,
    TileDefinition, TileShape, TileType, build_runtime,
};

/// Tile data as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTileData {
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(rename = "isStatic", default)]
    pub is_static: bool,
    #[serde(default)]
    pub prop: Map<String, Value>,
    #[serde(default)]
    pub events: Map<String, Value>,
}

/// A placed tile as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTile {
    pub data: RawTileData,
    pub x: f64,
    pub y: f64,
}

/// An ordered list of placed tiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Level {
    pub tiles: Vec<PlacedTile>,
}

impl Level {
    pub fn new(tiles: Vec<PlacedTile>) -> Self {
        Self { tiles }
    }

    /// Starter level: a ten-block floor at row 10
    pub fn starter() -> Self {
        let tiles = (0..10)
            .map(|x| PlacedTile::new(TileDefinition::preset(TileType::Block), x as f64, 10.0))
            .collect();
        Self { tiles }
    }

    pub fn from_raw(raw: &[RawTile]) -> Self {
        let tiles = raw
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| validate_tile(index, tile))
            .collect::<Vec<_>>();
        log::debug!("Validated level: {} of {} tiles kept", tiles.len(), raw.len());
        Self { tiles }
    }

    pub fn to_raw(&self) -> Vec<RawTile> {
        self.tiles.iter().map(export_tile).collect()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawTile> = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level {} ({} tiles)", path.display(), level.tiles.len());
        Ok(level)
    }

    /// Fresh runtime list in level order
    pub fn runtime_tiles(&self) -> Vec<RuntimeTile> {
        build_runtime(&self.tiles)
    }
}

/// Convert one authored tile, or drop it if its position is unusable
fn validate_tile(index: usize, raw: &RawTile) -> Option<PlacedTile> {
    if !raw.x.is_finite() || !raw.y.is_finite() {
        log::warn!("Tile {index}: non-finite position, dropped");
        return None;
    }

    let tile_type = TileType::from_code(raw.data.kind).unwrap_or_else(|| {
        log::warn!("Tile {index}: unknown type {}, treated as None", raw.data.kind);
        TileType::None
    });

    let prop = &raw.data.prop;
    let shape = match tile_type {
        TileType::None => TileShape::None,
        TileType::Block => TileShape::Block,
        TileType::HalfBlock => TileShape::HalfBlock,
        TileType::Spike => TileShape::Spike {
            direction: read_direction(index, prop),
        },
        TileType::MovingPlatform => TileShape::MovingPlatform {
            period: read_positive(index, prop, "time", DEFAULT_PLATFORM_PERIOD),
            amplitude: read_finite(index, prop, "distance", DEFAULT_PLATFORM_AMPLITUDE),
            direction: read_direction(index, prop),
        },
    };

    let events: BTreeMap<String, Value> = raw
        .data
        .events
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(PlacedTile::new(
        TileDefinition {
            shape,
            is_static: raw.data.is_static,
            events,
        },
        raw.x,
        raw.y,
    ))
}

fn read_direction(index: usize, prop: &Map<String, Value>) -> Rotation {
    match prop.get("dir") {
        None => Rotation::default(),
        Some(v) => v.as_i64().and_then(Rotation::from_index).unwrap_or_else(|| {
            log::warn!("Tile {index}: bad dir {v}, using 0");
            Rotation::default()
        }),
    }
}

fn read_finite(index: usize, prop: &Map<String, Value>, key: &str, default: f64) -> f64 {
    match prop.get(key) {
        None => default,
        Some(v) => match v.as_f64() {
            Some(n) if n.is_finite() => n,
            _ => {
                log::warn!("Tile {index}: bad {key} {v}, using {default}");
                default
            }
        },
    }
}

fn read_positive(index: usize, prop: &Map<String, Value>, key: &str, default: f64) -> f64 {
    let value = read_finite(index, prop, key, default);
    if value > 0.0 {
        value
    } else {
        log::warn!("Tile {index}: {key} must be positive, using {default}");
        default
    }
}

fn export_tile(tile: &PlacedTile) -> RawTile {
    let mut prop = Map::new();
    match tile.definition.shape {
        TileShape::Spike { direction } => {
            prop.insert("dir".into(), direction.index().into());
        }
        TileShape::MovingPlatform {
            period,
            amplitude,
            direction,
        } => {
            prop.insert("time".into(), period.into());
            prop.insert("distance".into(), amplitude.into());
            prop.insert("dir".into(), direction.index().into());
        }
        TileShape::None | TileShape::Block | TileShape::HalfBlock => {}
    }

    RawTile {
        data: RawTileData {
            kind: tile.definition.tile_type().code(),
            is_static: tile.definition.is_static,
            prop,
            events: tile
                .definition
                .events
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        },
        x: tile.pos.x,
        y: tile.pos.y,
    }
}
