//! Tunables for the wheel widget. Every field has a default, so a partial settings file is fine.

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Smallest swatch pane width, in points. Wins over `max_left_fraction`.
    pub min_left_width: f32,
    /// Largest swatch pane width, as a fraction of the whole widget.
    pub max_left_fraction: f32,
    pub min_wheel_ratio: f32,
    pub max_wheel_ratio: f32,
    pub min_wheel_width: f32,
    pub min_editors_width: f32,
    pub splitter_width: f32,
    /// Radius of the node drawn for each color on the disk.
    pub node_radius: f32,
    /// Extra grab distance around a node.
    pub hit_slop: f32,
    /// Minimum time between screen samples while picking.
    pub sample_interval_ms: u64,
    /// Offset of the preview from the cursor, both axes.
    pub preview_offset: i32,
    /// Number of wedges used to paint the disk.
    pub disk_segments: usize,
}
impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_left_width: 120.0,
            max_left_fraction: 0.6,
            min_wheel_ratio: 0.2,
            max_wheel_ratio: 0.8,
            min_wheel_width: 160.0,
            min_editors_width: 120.0,
            splitter_width: 6.0,
            node_radius: 8.0,
            hit_slop: 4.0,
            sample_interval_ms: 33,
            preview_offset: 16,
            disk_segments: 128,
        }
    }
}
impl WheelConfig {
    #[must_use]
    pub fn sample_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sample_interval_ms)
    }
}
