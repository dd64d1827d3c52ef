//! Normalization of maps parsed by the `tiled` crate.

use std::path::{Path, PathBuf};

use macroquad::logging::{debug, warn};
use tiled::{LayerType, Loader, ObjectShape, TileLayer, TilesetLocation};

use crate::config::TilemapConfig;
use crate::error::{Error, Result};
use crate::model::{Gid, Layer, LayerKind, Map, Tile, Tileset, TilesetImage};

impl Map {
    /// Parses a TMX file and normalizes it.
    pub fn load_tmx(path: impl AsRef<Path>, config: &TilemapConfig) -> Result<Self> {
        let map = Loader::new().load_tmx_map(path.as_ref())?;
        Self::from_tiled(&map, config)
    }

    /// Converts a parsed `tiled` map. Gids are assigned to tilesets in order, starting at 1.
    /// Foreground slots are resolved here, once.
    pub fn from_tiled(map: &tiled::Map, config: &TilemapConfig) -> Result<Self> {
        let directory = map.source.parent().unwrap_or_else(|| Path::new(""));

        let mut tilesets = Vec::with_capacity(map.tilesets().len());
        // Indexed like `map.tilesets()`; `None` for tilesets that were skipped.
        let mut first_gids = Vec::with_capacity(map.tilesets().len());
        let mut next_gid: Option<Gid> = Some(1);
        for tileset in map.tilesets().iter() {
            let first_gid = next_gid.ok_or_else(|| Error::GidOverflow {
                tileset: tileset.name.clone(),
            })?;
            next_gid = first_gid.checked_add(tileset.tilecount);

            let Some(image) = tileset.image.as_ref() else {
                warn!(
                    "Tileset {} is an image collection, its tiles will not be drawn",
                    tileset.name
                );
                first_gids.push(None);
                continue;
            };

            first_gids.push(Some(first_gid));
            tilesets.push(Tileset {
                name: tileset.name.clone(),
                first_gid,
                image: TilesetImage {
                    source: relative_to(&image.source, directory),
                    width: image.width.max(0) as u32,
                    height: image.height.max(0) as u32,
                },
                tile_width: tileset.tile_width,
                tile_height: tileset.tile_height,
            });
        }

        let normalizer = Normalizer {
            map,
            config,
            first_gids: &first_gids,
        };

        let mut layers = Vec::new();
        for layer in map.layers() {
            normalizer.push_layer(layer, &mut layers);
        }

        debug!(
            "Normalized {:?}: {} tilesets, {} layers",
            map.source,
            tilesets.len(),
            layers.len()
        );

        Ok(Map {
            path: map.source.clone(),
            tilesets,
            layers,
        })
    }
}

struct Normalizer<'a> {
    map: &'a tiled::Map,
    config: &'a TilemapConfig,
    first_gids: &'a [Option<Gid>],
}

impl Normalizer<'_> {
    fn push_layer(&self, layer: tiled::Layer, out: &mut Vec<Layer>) {
        let name = layer.name.clone();

        match layer.layer_type() {
            LayerType::Tiles(TileLayer::Finite(tiles)) => {
                let tile_width = self.map.tile_width as f32;
                let tile_height = self.map.tile_height as f32;

                let mut result = Vec::new();
                for y in 0..tiles.height() {
                    for x in 0..tiles.width() {
                        if let Some(tile) = tiles.get_tile(x as i32, y as i32) {
                            result.push(Tile::new(
                                self.gid(tile.tileset_index(), tile.id()),
                                x as f32 * tile_width,
                                y as f32 * tile_height,
                                tile_width,
                                tile_height,
                            ));
                        }
                    }
                }
                out.push(self.layer(name, LayerKind::Tiles, result));
            }
            LayerType::Tiles(TileLayer::Infinite(_)) => {
                warn!("Layer {}: infinite tile layers are not supported", name);
            }
            LayerType::Objects(objects) => {
                let tiles = objects
                    .objects()
                    .map(|object| {
                        let (width, height) = match object.shape {
                            ObjectShape::Rect { width, height }
                            | ObjectShape::Ellipse { width, height } => (width, height),
                            _ => (0.0, 0.0),
                        };

                        let gid = match object.tile_data() {
                            Some(data) => match data.tileset_location() {
                                TilesetLocation::Map(index) => self.gid(*index, data.id()),
                                TilesetLocation::Template(_) => {
                                    warn!(
                                        "Layer {}: object {} has a template tileset",
                                        name,
                                        object.id()
                                    );
                                    0
                                }
                            },
                            None => 0,
                        };

                        Tile::new(gid, object.x, object.y, width, height)
                    })
                    .collect();
                out.push(self.layer(name, LayerKind::Objects, tiles));
            }
            LayerType::Group(group) => {
                if self.config.flatten_groups {
                    for child in group.layers() {
                        self.push_layer(child, out);
                    }
                } else {
                    debug!("Layer {}: group layers are disabled, skipping", name);
                }
            }
            LayerType::Image(_) => {
                warn!("Layer {}: image layers are not supported, skipping", name);
            }
        }
    }

    fn layer(&self, name: String, kind: LayerKind, tiles: Vec<Tile>) -> Layer {
        Layer::new(name, kind, tiles, &self.config.foreground_layer)
    }

    fn gid(&self, tileset_index: usize, id: u32) -> Gid {
        match self.first_gids.get(tileset_index) {
            Some(Some(first_gid)) => first_gid.checked_add(id).unwrap_or(0),
            _ => 0,
        }
    }
}

/// `tiled` joins image paths with the tileset location; make them relative to the map again.
fn relative_to(source: &Path, directory: &Path) -> PathBuf {
    source
        .strip_prefix(directory)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| source.to_path_buf())
}
