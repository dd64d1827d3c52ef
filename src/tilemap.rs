use std::sync::Arc;

use macroquad::math::{vec2, Vec2};

use crate::compositor::{compose_layers, Element};
use crate::model::Map;

/// Spatial transform of the whole tilemap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilemapProps {
    pub scale: Vec2,
    /// Screen position of the map's origin.
    pub position: Vec2,
}

impl Default for TilemapProps {
    fn default() -> Self {
        Self {
            scale: Vec2::ONE,
            position: Vec2::ZERO,
        }
    }
}

impl TilemapProps {
    pub fn scaled(scale: f32) -> Self {
        Self {
            scale: vec2(scale, scale),
            ..Default::default()
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }
}

/// The composed tree: a transform and the draw order under it.
///
/// Children are shared, so cloning a container or taking one from [`TilemapCache`] does not copy
/// the sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct Container<C> {
    pub props: TilemapProps,
    pub children: Arc<[Element<C>]>,
}

/// Builds the tilemap node. A map that has not finished loading yet produces no node.
pub fn tilemap<C: Clone>(
    map: Option<&Map>,
    children: C,
    props: TilemapProps,
) -> Option<Container<C>> {
    let map = map?;
    Some(Container {
        props,
        children: compose_layers(map, children).into(),
    })
}

struct Composed<C> {
    map: Arc<Map>,
    content: C,
    elements: Arc<[Element<C>]>,
}

/// Keeps the last composition and recomputes it only when the map (by identity) or the content
/// (by value) changes.
pub struct TilemapCache<C> {
    composed: Option<Composed<C>>,
    computations: usize,
}

impl<C> Default for TilemapCache<C> {
    fn default() -> Self {
        Self {
            composed: None,
            computations: 0,
        }
    }
}

impl<C: Clone + PartialEq> TilemapCache<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&mut self, map: &Arc<Map>, content: &C) -> &Arc<[Element<C>]> {
        let stale = match &self.composed {
            Some(composed) => !Arc::ptr_eq(&composed.map, map) || composed.content != *content,
            None => true,
        };
        if stale {
            self.composed = None;
        }

        let computations = &mut self.computations;
        let composed = self.composed.get_or_insert_with(|| {
            *computations += 1;
            Composed {
                map: Arc::clone(map),
                content: content.clone(),
                elements: compose_layers(map, content.clone()).into(),
            }
        });
        &composed.elements
    }

    /// Same as [`tilemap`], going through the cache.
    pub fn tilemap(
        &mut self,
        map: Option<&Arc<Map>>,
        children: &C,
        props: TilemapProps,
    ) -> Option<Container<C>> {
        let map = map?;
        Some(Container {
            props,
            children: Arc::clone(self.elements(map, children)),
        })
    }

    pub fn clear(&mut self) {
        self.composed = None;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::{Layer, LayerKind, Tile, Tileset, TilesetImage};

    fn level() -> Map {
        let tileset = Tileset {
            name: "terrain".to_string(),
            first_gid: 1,
            image: TilesetImage {
                source: PathBuf::from("terrain.png"),
                width: 64,
                height: 64,
            },
            tile_width: 32,
            tile_height: 32,
        };
        let ground = Layer::new(
            "Ground",
            LayerKind::Tiles,
            vec![Tile::new(1, 0.0, 0.0, 32.0, 32.0)],
            "Foreground",
        );
        Map::new("level.tmx", vec![tileset], vec![ground])
    }

    #[test]
    fn nothing_until_the_map_is_loaded() {
        assert!(tilemap(None, "player", TilemapProps::default()).is_none());

        let mut cache = TilemapCache::new();
        let props = TilemapProps::default();
        assert!(cache.tilemap(None, &"player", props).is_none());
        assert_eq!(cache.computations, 0);
    }

    #[test]
    fn container_carries_props_and_children() {
        let map = level();
        let props = TilemapProps::scaled(0.75).at(vec2(10.0, 20.0));

        let container = tilemap(Some(&map), "player", props).unwrap();
        assert_eq!(container.props.scale, vec2(0.75, 0.75));
        assert_eq!(container.props.position, vec2(10.0, 20.0));
        assert_eq!(container.children.len(), 2);
        assert_eq!(container.children[1], Element::Content("player"));
    }

    #[test]
    fn cache_recomputes_on_change_only() {
        let map = Arc::new(level());
        let mut cache = TilemapCache::new();

        let first = cache.elements(&map, &"player").to_vec();
        let again = cache.elements(&map, &"player").to_vec();
        assert_eq!(first, again);
        assert_eq!(cache.computations, 1);

        // Equal but distinct map: identity decides.
        let copy = Arc::new(level());
        cache.elements(&copy, &"player");
        assert_eq!(cache.computations, 2);

        cache.elements(&copy, &"enemy");
        assert_eq!(cache.computations, 3);

        cache.clear();
        cache.elements(&copy, &"enemy");
        assert_eq!(cache.computations, 4);
    }

    #[test]
    fn cache_hits_share_the_sprites() {
        let map = Arc::new(level());
        let mut cache = TilemapCache::new();
        let props = TilemapProps::default();

        let first = cache.tilemap(Some(&map), &"player", props).unwrap();
        let second = cache.tilemap(Some(&map), &"player", props).unwrap();

        assert_eq!(cache.computations, 1);
        assert!(Arc::ptr_eq(&first.children, &second.children));

        let first_source = &first.children[0].as_sprite().unwrap().region.source;
        let second_source = &second.children[0].as_sprite().unwrap().region.source;
        assert!(Arc::ptr_eq(first_source, second_source));
    }
}
