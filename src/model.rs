//! Parsed map data consumed by the resolver and the compositor.
//!
//! These are plain owned values. They are usually produced by
//! [`Map::from_tiled`](crate::Map::from_tiled), but a caller can also assemble them by hand.

use std::path::{Path, PathBuf};

/// Global tile id. `0` means "no tile".
pub type Gid = u32;

#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    /// Path of the map file. Tileset images are resolved against its directory.
    pub path: PathBuf,
    /// Ordered by `first_gid`; later entries win when ranges overlap.
    pub tilesets: Vec<Tileset>,
    /// Painter's order: later layers draw on top.
    pub layers: Vec<Layer>,
}

impl Map {
    pub fn new(path: impl Into<PathBuf>, tilesets: Vec<Tileset>, layers: Vec<Layer>) -> Self {
        Self {
            path: path.into(),
            tilesets,
            layers,
        }
    }

    /// Directory the map lives in, or an empty path for a bare file name.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub first_gid: Gid,
    pub image: TilesetImage,
    pub tile_width: u32,
    pub tile_height: u32,
}

/// A single spritesheet. `source` is relative to the map's directory.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesetImage {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Dense grid; tile positions are the top-left corner of a cell.
    Tiles,
    /// Free placement; tile positions are the bottom-left corner.
    Objects,
}

/// Where a layer sits in the draw order relative to caller content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayerSlot {
    #[default]
    Ordinary,
    /// Caller content is drawn here instead of the layer's own tiles.
    ForegroundSlot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub kind: LayerKind,
    pub slot: LayerSlot,
    pub tiles: Vec<Tile>,
}

impl Layer {
    /// Builds a layer and classifies it once: a layer named `foreground_name` becomes the
    /// foreground slot.
    pub fn new(
        name: impl Into<String>,
        kind: LayerKind,
        tiles: Vec<Tile>,
        foreground_name: &str,
    ) -> Self {
        let name = name.into();
        let slot = if name == foreground_name {
            LayerSlot::ForegroundSlot
        } else {
            LayerSlot::Ordinary
        };

        Self {
            name,
            kind,
            slot,
            tiles,
        }
    }

    pub fn is_foreground(&self) -> bool {
        self.slot == LayerSlot::ForegroundSlot
    }
}

/// A tile reference placed in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub gid: Gid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Tile {
    pub fn new(gid: Gid, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            gid,
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gid == 0
    }
}
