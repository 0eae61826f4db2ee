use serde::{Deserialize, Serialize};

/// Graph-wide geometry of nodes and ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphStyle {
    pub port_width: f32,
    pub port_height: f32,
    /// Horizontal gap between two ports of the same direction
    pub port_gap: f32,
    /// Padding on both sides of the widest of label, inputs and outputs
    pub node_padding: f32,
    pub node_height: f32,
    pub edge_stroke_width: f32,
    /// Width estimate for one label character
    pub char_width: f32,
}

impl Default for GraphStyle {
    fn default() -> Self {
        Self {
            port_width: 15.0,
            port_height: 15.0,
            port_gap: 5.0,
            node_padding: 10.0,
            node_height: 40.0,
            edge_stroke_width: 4.0,
            char_width: 10.0,
        }
    }
}

impl GraphStyle {
    /// Width taken by `count` ports laid side by side
    pub fn ports_width(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.port_width + (count - 1) as f32 * self.port_gap
    }
}
