use crate::{Graph, NodeIndex, Point};
use tracing::trace;

/// Assign coordinates to nodes based on their layer structure and widths
pub(crate) fn assign_coordinates(
    graph: &mut Graph,
    layers: &[Vec<NodeIndex>],
    node_spacing: f32,
    layer_spacing: f32,
    viewport_width: f32,
) {
    // First pass: left to right inside each layer
    assign_positions(graph, layers, node_spacing, layer_spacing);

    // Second pass: center each layer on its own
    center_layers(graph, layers, viewport_width);
}

fn assign_positions(
    graph: &mut Graph,
    layers: &[Vec<NodeIndex>],
    node_spacing: f32,
    layer_spacing: f32,
) {
    let layer_height = graph.style().node_height + layer_spacing;

    for (layer_index, layer) in layers.iter().enumerate() {
        let y = layer_index as f32 * layer_height;
        let mut x = node_spacing;
        for (order, &node) in layer.iter().enumerate() {
            let width = graph.node(node).width();
            let node = graph.node_mut(node);
            node.order = order;
            node.position = Point::new(x, y);
            x += width + node_spacing;
        }
    }
}

/// Shift every layer so it is horizontally centered in the viewport
fn center_layers(graph: &mut Graph, layers: &[Vec<NodeIndex>], viewport_width: f32) {
    for (layer_index, layer) in layers.iter().enumerate() {
        let Some(min_x) = layer
            .iter()
            .map(|&node| graph.node(node).x())
            .min_by(f32::total_cmp)
        else {
            continue;
        };
        let max_x = layer
            .iter()
            .map(|&node| graph.node(node).x() + graph.node(node).width())
            .fold(min_x, f32::max);

        let offset = (viewport_width - (max_x - min_x)) / 2.0 - min_x;
        trace!("Shifting layer {layer_index} by {offset}");
        for &node in layer {
            graph.node_mut(node).position.x += offset;
        }
    }
}
