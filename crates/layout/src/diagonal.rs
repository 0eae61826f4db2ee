use crate::{
    Graph, LayoutEngine, LayoutError, LayoutReport, NodeIndex, PathData, Point, PortDirection,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Staircase layout: one node per layer, each step down and to the right
///
/// Nodes producing more than they consume come first. Useful as a quick
/// preview and as a baseline for the layered layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagonalLayout {
    /// Position of the first node
    pub origin: Point,
    /// Horizontal shift between consecutive nodes
    pub step: f32,
    /// Vertical gap between consecutive nodes
    pub gap: f32,
}

impl Default for DiagonalLayout {
    fn default() -> Self {
        Self {
            origin: Point::new(100.0, 100.0),
            step: 50.0,
            gap: 100.0,
        }
    }
}

impl LayoutEngine for DiagonalLayout {
    fn layout(&self, graph: &mut Graph) -> Result<LayoutReport, LayoutError> {
        let mut order: Vec<NodeIndex> = graph.node_indices().collect();
        order.sort_by_key(|&index| {
            let node = graph.node(index);
            node.inputs().len() as isize - node.outputs().len() as isize
        });

        let style = graph.style().clone();
        let row_height = style.node_height + style.port_height + self.gap;
        for (layer, &index) in order.iter().enumerate() {
            let node = graph.node_mut(index);
            node.layer = layer;
            node.order = 0;
            node.position = Point::new(
                self.origin.x + layer as f32 * self.step,
                self.origin.y + layer as f32 * row_height,
            );
        }

        for edge in graph.edge_indices().collect::<Vec<_>>() {
            let (from, to) = graph.endpoints(edge)?;
            if from.direction != PortDirection::Output || to.direction != PortDirection::Input {
                let edge = graph.edge(edge);
                return Err(LayoutError::InvalidEdgeDirection {
                    edge_id: edge.id().to_string(),
                    from: edge.from().clone(),
                    to: edge.to().clone(),
                });
            }

            let start = graph.port_anchor(from);
            let end = graph.port_anchor(to);
            let source_layer = graph.node(from.node).layer();
            let target_layer = graph.node(to.node).layer();

            let path = if source_layer < target_layer {
                let middle = (start.y + end.y) / 2.0;
                PathData::new()
                    .move_to(start)
                    .line_to(Point::new(start.x, middle))
                    .line_to(Point::new(end.x, middle))
                    .line_to(end)
            } else {
                let left = source_layer.max(target_layer) as f32 * self.step;
                let below = start.y + style.port_height;
                let above = end.y - style.port_height;
                PathData::new()
                    .move_to(start)
                    .line_to(Point::new(start.x, below))
                    .line_to(Point::new(start.x - left, below))
                    .line_to(Point::new(start.x - left, above))
                    .line_to(Point::new(end.x, above))
                    .line_to(end)
            };
            graph.edge_mut(edge).path = path;
        }

        debug!("Diagonal layout of {} nodes", order.len());
        Ok(LayoutReport {
            layers: order.len(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EdgeIndex, GraphStyle, PathCommand};
    use portlay_definition::{GraphDefinition, NodeDefinition};
    use test_log::test;

    #[test]
    fn sources_come_first() {
        let definition = GraphDefinition::new()
            .node(NodeDefinition::new("sink").with_inputs(["in"]))
            .node(NodeDefinition::new("source").with_outputs(["out"]))
            .edge(("source", "out"), ("sink", "in"));
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();

        let report = DiagonalLayout::default().layout(&mut graph).unwrap();
        assert_eq!(report.layers, 2);

        let source = graph.node_by_id("source").unwrap();
        let sink = graph.node_by_id("sink").unwrap();
        assert_eq!(source.layer(), 0);
        assert_eq!(source.position(), Point::new(100.0, 100.0));
        assert_eq!(sink.layer(), 1);
        // 40 + 15 + 100 below, one step to the right
        assert_eq!(sink.position(), Point::new(150.0, 255.0));

        let path = graph.edge(EdgeIndex(0)).path();
        assert_eq!(path.commands().len(), 4);
        let (from, to) = graph.endpoints(EdgeIndex(0)).unwrap();
        assert_eq!(path.commands()[0], PathCommand::MoveTo(graph.port_anchor(from)));
        assert_eq!(path.commands()[3], PathCommand::LineTo(graph.port_anchor(to)));
    }

    #[test]
    fn upward_edges_go_around() {
        let definition = GraphDefinition::new()
            .node(NodeDefinition::new("a").with_inputs(["in"]).with_outputs(["out"]))
            .edge(("a", "out"), ("a", "in"));
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();

        DiagonalLayout::default().layout(&mut graph).unwrap();
        // a single node sits on layer 0, so the detour has no horizontal reach
        let path = graph.edge(EdgeIndex(0)).path();
        assert_eq!(path.commands().len(), 6);
        assert_eq!(
            path.to_string(),
            "M 117.5 155 L 117.5 170 L 117.5 170 L 117.5 70 L 117.5 70 L 117.5 85"
        );
    }
}
