use std::fmt;
use std::path::Path;
use std::sync::Arc;

use macroquad::math::Rect;

use crate::model::{Gid, LayerKind, Map, Tile, Tileset};

/// A rectangle of pixels inside a tileset image.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRegion {
    /// Image path, already joined with the map's directory.
    pub source: Arc<Path>,
    pub rect: Rect,
}

/// Identity of a sprite among its siblings, used to reconcile sprite lists between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawableKey {
    pub x: f32,
    pub y: f32,
}

impl fmt::Display for DrawableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A positioned texture region, in world pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub key: DrawableKey,
    pub region: TextureRegion,
    pub dest: Rect,
}

/// Finds the tileset owning `gid`.
///
/// Every tileset is visited and the last one with `first_gid <= gid` wins, so positional order
/// decides between overlapping ranges. Returns `None` for `gid == 0` (as long as no tileset
/// claims gid 0) and for gids below every range.
pub fn resolve_tileset(gid: Gid, tilesets: &[Tileset]) -> Option<&Tileset> {
    resolve_tileset_index(gid, tilesets)
        .map(|index| &tilesets[index])
}

/// Same as [`resolve_tileset`], returning the tileset's position.
pub fn resolve_tileset_index(gid: Gid, tilesets: &[Tileset]) -> Option<usize> {
    let mut found = None;
    for (index, tileset) in tilesets.iter().enumerate() {
        if gid >= tileset.first_gid {
            found = Some(index);
        }
    }
    found
}

/// Computes the region of `tileset`'s image that holds `tile`.
///
/// The image is treated as a grid of `tile_width` x `tile_height` cells. The column wraps on the
/// number of columns, the row divides by the number of rows. The region's width and height are
/// taken from `tile_height` and `tile_width` respectively; existing maps are laid out for that.
///
/// Tile dimensions must be non-zero.
pub fn texture_region(tile: &Tile, map: &Map, tileset: &Tileset) -> TextureRegion {
    TextureRegion {
        source: image_path(map, tileset),
        rect: region_rect(tile, tileset),
    }
}

fn image_path(map: &Map, tileset: &Tileset) -> Arc<Path> {
    map.directory().join(&tileset.image.source).into()
}

fn region_rect(tile: &Tile, tileset: &Tileset) -> Rect {
    let tile_width = tileset.tile_width as f64;
    let tile_height = tileset.tile_height as f64;
    let sprite_index = tile.gid as f64 - tileset.first_gid as f64;

    let columns = tileset.image.width as f64 / tile_width;
    let rows = tileset.image.height as f64 / tile_height;

    let x = (sprite_index % columns) * tile_width;
    let y = (sprite_index / rows).floor() * tile_height;

    Rect::new(x as f32, y as f32, tile_height as f32, tile_width as f32)
}

/// Builds the sprite for a single tile reference, or `None` when no tileset owns its gid.
///
/// Object tiles are anchored at their bottom-left corner; they are moved up by their height so
/// that every sprite is anchored top-left.
pub fn tile_drawable(kind: LayerKind, tile: &Tile, map: &Map) -> Option<Drawable> {
    let tileset = resolve_tileset(tile.gid, &map.tilesets)?;
    Some(place(kind, tile, texture_region(tile, map, tileset)))
}

fn place(kind: LayerKind, tile: &Tile, region: TextureRegion) -> Drawable {
    let y = match kind {
        LayerKind::Tiles => tile.y,
        LayerKind::Objects => tile.y - tile.height,
    };

    Drawable {
        key: DrawableKey { x: tile.x, y },
        region,
        dest: Rect::new(tile.x, y, tile.width, tile.height),
    }
}

/// Resolves many tiles of one map. Image paths are joined once per tileset and shared by every
/// sprite cut from it.
#[derive(Debug)]
pub struct TileResolver<'a> {
    map: &'a Map,
    sources: Vec<Arc<Path>>,
}

impl<'a> TileResolver<'a> {
    pub fn new(map: &'a Map) -> Self {
        let sources = map
            .tilesets
            .iter()
            .map(|tileset| image_path(map, tileset))
            .collect();
        Self { map, sources }
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    /// Same result as [`tile_drawable`].
    pub fn drawable(&self, kind: LayerKind, tile: &Tile) -> Option<Drawable> {
        let index = resolve_tileset_index(tile.gid, &self.map.tilesets)?;
        let region = TextureRegion {
            source: Arc::clone(&self.sources[index]),
            rect: region_rect(tile, &self.map.tilesets[index]),
        };
        Some(place(kind, tile, region))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::TilesetImage;

    fn tileset(name: &str, first_gid: Gid) -> Tileset {
        Tileset {
            name: name.to_string(),
            first_gid,
            image: TilesetImage {
                source: PathBuf::from(format!("{}.png", name)),
                width: 256,
                height: 256,
            },
            tile_width: 32,
            tile_height: 32,
        }
    }

    fn map_with(tilesets: Vec<Tileset>) -> Map {
        Map::new("assets/stages/map.tmx", tilesets, vec![])
    }

    #[test]
    fn nothing_below_first_range() {
        let tilesets = vec![tileset("a", 5), tileset("b", 20)];
        for gid in 0..5 {
            assert!(resolve_tileset(gid, &tilesets).is_none(), "gid {}", gid);
        }
        assert!(resolve_tileset(1, &[]).is_none());
        assert!(resolve_tileset(0, &[tileset("a", 1)]).is_none());
    }

    #[test]
    fn greatest_first_gid_wins() {
        let tilesets = vec![tileset("a", 1), tileset("b", 65), tileset("c", 129)];
        let name = |gid| resolve_tileset(gid, &tilesets).map(|t| t.name.as_str());

        assert_eq!(name(1), Some("a"));
        assert_eq!(name(64), Some("a"));
        assert_eq!(name(65), Some("b"));
        assert_eq!(name(128), Some("b"));
        assert_eq!(name(129), Some("c"));
        assert_eq!(name(100_000), Some("c"));
    }

    #[test]
    fn positional_order_beats_numeric_order() {
        // Not sorted: the scan keeps the last match rather than the largest first_gid.
        let tilesets = vec![tileset("a", 1), tileset("b", 50), tileset("c", 10)];
        let found = resolve_tileset(60, &tilesets).unwrap();
        assert_eq!(found.name, "c");

        let found = resolve_tileset(5, &tilesets).unwrap();
        assert_eq!(found.name, "a");
    }

    #[test]
    fn sprite_index_to_cell() {
        let ts = tileset("terrain", 1);
        let map = map_with(vec![ts.clone()]);
        let tile = Tile::new(11, 0.0, 0.0, 32.0, 32.0);

        let region = texture_region(&tile, &map, &ts);
        // index 10 on an 8x8 sheet: column 2, row 1.
        assert_eq!(region.rect, Rect::new(64.0, 32.0, 32.0, 32.0));
    }

    #[test]
    fn region_size_swaps_width_and_height() {
        let ts = Tileset {
            tile_width: 16,
            tile_height: 32,
            ..tileset("tall", 1)
        };
        let map = map_with(vec![ts.clone()]);
        let tile = Tile::new(1, 0.0, 0.0, 16.0, 32.0);

        let region = texture_region(&tile, &map, &ts);
        assert_eq!(region.rect.w, 32.0);
        assert_eq!(region.rect.h, 16.0);
    }

    #[test]
    fn region_is_deterministic() {
        let ts = tileset("terrain", 1);
        let map = map_with(vec![ts.clone()]);
        let tile = Tile::new(42, 96.0, 64.0, 32.0, 32.0);

        assert_eq!(
            texture_region(&tile, &map, &ts),
            texture_region(&tile, &map, &ts)
        );
    }

    #[test]
    fn image_resolved_against_map_directory() {
        let ts = Tileset {
            image: TilesetImage {
                source: PathBuf::from("../tiles/grass.png"),
                width: 256,
                height: 256,
            },
            ..tileset("grass", 1)
        };
        let map = map_with(vec![ts.clone()]);
        let region = texture_region(&Tile::new(1, 0.0, 0.0, 32.0, 32.0), &map, &ts);

        let expected = Path::new("assets/stages/../tiles/grass.png");
        assert_eq!(&*region.source, expected);
    }

    #[test]
    fn empty_cells_have_no_drawable() {
        let map = map_with(vec![tileset("a", 1)]);
        let tile = Tile::new(0, 32.0, 32.0, 32.0, 32.0);
        assert!(tile_drawable(LayerKind::Tiles, &tile, &map).is_none());
        assert!(tile_drawable(LayerKind::Objects, &tile, &map).is_none());
    }

    #[test]
    fn object_tiles_are_moved_up_by_height() {
        let map = map_with(vec![tileset("a", 1)]);
        let tile = Tile::new(3, 100.0, 200.0, 32.0, 48.0);

        let grid = tile_drawable(LayerKind::Tiles, &tile, &map).unwrap();
        let object = tile_drawable(LayerKind::Objects, &tile, &map).unwrap();

        assert_eq!(grid.dest, Rect::new(100.0, 200.0, 32.0, 48.0));
        assert_eq!(object.dest, Rect::new(100.0, 152.0, 32.0, 48.0));
        assert_eq!(grid.dest.y - object.dest.y, tile.height);
        assert_eq!(grid.region, object.region);
    }

    #[test]
    fn key_follows_placement() {
        let map = map_with(vec![tileset("a", 1)]);
        let tile = Tile::new(3, 64.0, 96.0, 32.0, 32.0);

        let object = tile_drawable(LayerKind::Objects, &tile, &map).unwrap();
        assert_eq!(object.key, DrawableKey { x: 64.0, y: 64.0 });
        assert_eq!(object.key.to_string(), "(64,64)");
    }

    #[test]
    fn resolver_matches_single_tile_path() {
        let map = map_with(vec![tileset("a", 1), tileset("b", 65)]);
        let resolver = TileResolver::new(&map);

        for gid in [0, 1, 10, 64, 65, 70] {
            for kind in [LayerKind::Tiles, LayerKind::Objects] {
                let tile = Tile::new(gid, 32.0, 64.0, 32.0, 32.0);
                assert_eq!(
                    resolver.drawable(kind, &tile),
                    tile_drawable(kind, &tile, &map),
                    "gid {}",
                    gid
                );
            }
        }
    }

    #[test]
    fn resolver_shares_image_paths_per_tileset() {
        let map = map_with(vec![tileset("a", 1), tileset("b", 65)]);
        let resolver = TileResolver::new(&map);

        let sprite = |gid| {
            let tile = Tile::new(gid, 0.0, 0.0, 32.0, 32.0);
            resolver.drawable(LayerKind::Tiles, &tile).unwrap()
        };
        let (a1, a2, b) = (sprite(1), sprite(9), sprite(66));

        assert!(Arc::ptr_eq(&a1.region.source, &a2.region.source));
        assert!(!Arc::ptr_eq(&a1.region.source, &b.region.source));
    }
}
