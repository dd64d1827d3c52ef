//! Resolves parsed Tiled maps into positioned texture regions and draws them with macroquad.
//!
//! The core ([`tileset`], [`compositor`], [`tilemap`]) is pure: it maps a [`Map`] and some caller
//! content to an ordered list of sprites. [`render`] is the macroquad side that loads the
//! tileset images and draws that list.

pub mod compositor;
pub mod config;
pub mod error;
mod map;
pub mod model;
pub mod render;
pub mod tilemap;
pub mod tileset;

pub use compositor::{compose_layers, has_foreground, layer_elements, Element};
pub use config::TilemapConfig;
pub use error::{Error, Result};
pub use model::{Gid, Layer, LayerKind, LayerSlot, Map, Tile, Tileset, TilesetImage};
pub use render::{draw_tilemap, Overlay, TextureCache, TextureSource};
pub use tilemap::{tilemap, Container, TilemapCache, TilemapProps};
pub use tileset::{
    resolve_tileset, texture_region, tile_drawable, Drawable, DrawableKey, TextureRegion,
    TileResolver,
};
