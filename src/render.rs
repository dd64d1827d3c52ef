//! Drawing composed tilemaps with macroquad.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use macroquad::color::WHITE;
use macroquad::logging::{debug, info};
use macroquad::math::{Rect, Vec2};
use macroquad::texture::{draw_texture_ex, load_texture, DrawTextureParams, FilterMode, Texture2D};

use crate::compositor::Element;
use crate::error::{Error, Result};
use crate::model::Map;
use crate::tilemap::{Container, TilemapProps};
use crate::tileset::Drawable;

/// Looks up a loaded image by its resolved path.
pub trait TextureSource {
    fn texture(&self, path: &Path) -> Option<&Texture2D>;
}

/// Caller content drawn at its place in the tilemap's draw order.
pub trait Overlay {
    fn draw(&self, props: &TilemapProps);
}

impl Overlay for () {
    fn draw(&self, _props: &TilemapProps) {}
}

impl<T: Overlay + ?Sized> Overlay for &T {
    fn draw(&self, props: &TilemapProps) {
        (**self).draw(props)
    }
}

impl<T: Overlay> Overlay for [T] {
    fn draw(&self, props: &TilemapProps) {
        for item in self {
            item.draw(props);
        }
    }
}

impl<T: Overlay> Overlay for Vec<T> {
    fn draw(&self, props: &TilemapProps) {
        self.as_slice().draw(props)
    }
}

/// Tileset images, one texture per distinct path.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: HashMap<PathBuf, Texture2D>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every tileset image referenced by `map`.
    pub async fn load(map: &Map) -> Result<Self> {
        let mut cache = Self::new();
        cache.load_map(map).await?;
        Ok(cache)
    }

    /// Loads the images of `map` that are not cached yet.
    pub async fn load_map(&mut self, map: &Map) -> Result<()> {
        for tileset in &map.tilesets {
            let path = map.directory().join(&tileset.image.source);
            if self.textures.contains_key(&path) {
                continue;
            }

            let texture = load_texture(&path.to_string_lossy())
                .await
                .map_err(|e| Error::texture(path.clone(), e))?;

            // Pixel-perfect tiles.
            texture.set_filter(FilterMode::Nearest);

            info!("Loaded tileset {} from {:?}", tileset.name, path);
            self.textures.insert(path, texture);
        }
        Ok(())
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, texture: Texture2D) {
        self.textures.insert(path.into(), texture);
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureSource for TextureCache {
    fn texture(&self, path: &Path) -> Option<&Texture2D> {
        self.textures.get(path)
    }
}

impl TextureSource for HashMap<PathBuf, Texture2D> {
    fn texture(&self, path: &Path) -> Option<&Texture2D> {
        self.get(path)
    }
}

/// Translate world pixel coordinates into screen pixels.
#[inline]
pub fn world_to_screen(world_px: Vec2, props: &TilemapProps) -> Vec2 {
    world_px * props.scale + props.position
}

/// Screen rectangle covered by a sprite.
pub fn screen_rect(sprite: &Drawable, props: &TilemapProps) -> Rect {
    let pos = world_to_screen(sprite.dest.point(), props);
    let size = sprite.dest.size() * props.scale;
    Rect::new(pos.x, pos.y, size.x, size.y)
}

pub fn draw_sprite(sprite: &Drawable, texture: &Texture2D, props: &TilemapProps) {
    let dest = screen_rect(sprite, props);
    draw_texture_ex(
        texture,
        dest.x,
        dest.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(dest.size()),
            source: Some(sprite.region.rect),
            ..Default::default()
        },
    );
}

/// Draws the container's children in order. Sprites whose image is not in `textures` are
/// skipped; returns how many were.
pub fn draw_tilemap<C: Overlay>(
    container: &Container<C>,
    textures: &impl TextureSource,
) -> usize {
    let mut missing = 0;
    for child in container.children.iter() {
        match child {
            Element::Sprite(sprite) => match textures.texture(&sprite.region.source) {
                Some(texture) => draw_sprite(sprite, texture, &container.props),
                None => missing += 1,
            },
            Element::Content(content) => content.draw(&container.props),
        }
    }

    if missing > 0 {
        debug!("{} sprites skipped, their textures are not loaded", missing);
    }
    missing
}
