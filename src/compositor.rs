//! Turns a map's layer list into a flat draw order.
//!
//! Two independent computations over the same map: [`layer_elements`] expands the layers, and
//! [`has_foreground`] tells whether caller content already got a slot among them.
//! [`compose_layers`] combines the two.

use crate::model::{Layer, LayerSlot, Map};
use crate::tileset::{Drawable, TileResolver};

/// One entry of the draw order.
#[derive(Clone, Debug, PartialEq)]
pub enum Element<C> {
    Sprite(Drawable),
    /// Caller-supplied content, drawn as a whole.
    Content(C),
}

impl<C> Element<C> {
    pub fn as_sprite(&self) -> Option<&Drawable> {
        match self {
            Element::Sprite(drawable) => Some(drawable),
            Element::Content(_) => None,
        }
    }

    pub fn as_content(&self) -> Option<&C> {
        match self {
            Element::Sprite(_) => None,
            Element::Content(content) => Some(content),
        }
    }
}

/// Sprites of a single layer, in the layer's own tile order. Empty cells are skipped.
pub fn layer_sprites<'a>(
    layer: &'a Layer,
    resolver: &'a TileResolver<'a>,
) -> impl Iterator<Item = Drawable> + 'a {
    layer
        .tiles
        .iter()
        .filter_map(move |tile| resolver.drawable(layer.kind, tile))
}

/// Expands every layer in order. Foreground slots get a copy of `content` instead of their
/// own tiles.
pub fn layer_elements<C: Clone>(map: &Map, content: &C) -> Vec<Element<C>> {
    let resolver = TileResolver::new(map);
    let mut elements = Vec::new();
    for layer in &map.layers {
        match layer.slot {
            LayerSlot::ForegroundSlot => elements.push(Element::Content(content.clone())),
            LayerSlot::Ordinary => {
                elements.extend(layer_sprites(layer, &resolver).map(Element::Sprite))
            }
        }
    }
    elements
}

pub fn has_foreground(map: &Map) -> bool {
    map.layers.iter().any(Layer::is_foreground)
}

/// Full draw order: the expanded layers, followed by `content` when no layer reserved a slot
/// for it. Content is therefore always drawn at least once.
pub fn compose_layers<C: Clone>(map: &Map, content: C) -> Vec<Element<C>> {
    let mut elements = layer_elements(map, &content);
    if !has_foreground(map) {
        elements.push(Element::Content(content));
    }
    elements
}
