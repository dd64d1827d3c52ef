use std::sync::Arc;

use macroquad::color::{LIGHTGRAY, WHITE};
use macroquad::input::{is_key_down, KeyCode};
use macroquad::math::Rect;
use macroquad::shapes::draw_rectangle;
use macroquad::window::{clear_background, next_frame};

use macroquad_tilemap::render::world_to_screen;
use macroquad_tilemap::{
    draw_tilemap, Map, Overlay, TextureCache, TilemapCache, TilemapConfig, TilemapProps,
};

/// A plain white square, to show where caller content lands in the layer order.
#[derive(Clone, PartialEq)]
struct Square(Rect);

impl Overlay for Square {
    fn draw(&self, props: &TilemapProps) {
        let pos = world_to_screen(self.0.point(), props);
        let size = self.0.size() * props.scale;
        draw_rectangle(pos.x, pos.y, size.x, size.y, WHITE);
    }
}

#[macroquad::main("Tilemap")]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/stages/map.tmx".to_string());

    let map = Map::load_tmx(&path, &TilemapConfig::default()).expect("Error loading map");
    let textures = TextureCache::load(&map).await.expect("Error loading textures");
    let map = Arc::new(map);

    let squares = vec![
        Square(Rect::new(120.0, 380.0, 64.0, 64.0)),
        Square(Rect::new(700.0, 420.0, 64.0, 64.0)),
        Square(Rect::new(500.0, 700.0, 64.0, 64.0)),
    ];

    let mut cache = TilemapCache::new();

    loop {
        clear_background(LIGHTGRAY);

        if let Some(container) = cache.tilemap(Some(&map), &squares, TilemapProps::scaled(0.75)) {
            draw_tilemap(&container, &textures);
        }

        if is_key_down(KeyCode::Q) {
            break;
        }

        next_frame().await
    }
}
