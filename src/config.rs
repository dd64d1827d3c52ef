/// Options applied when a `tiled` map is normalized into a [`Map`](crate::Map).
#[derive(Clone, Debug, PartialEq)]
pub struct TilemapConfig {
    /// Name of the layer that marks where caller content is drawn.
    pub foreground_layer: String,
    /// Expand group layers in place. When off, groups and everything in them are skipped.
    pub flatten_groups: bool,
}

impl Default for TilemapConfig {
    fn default() -> Self {
        Self {
            foreground_layer: "Foreground".to_string(),
            flatten_groups: true,
        }
    }
}

impl TilemapConfig {
    pub fn with_foreground_layer(mut self, name: impl Into<String>) -> Self {
        self.foreground_layer = name.into();
        self
    }

    pub fn with_flatten_groups(mut self, flatten: bool) -> Self {
        self.flatten_groups = flatten;
        self
    }
}
