use super::{Graph, Node, Port};
use crate::Rect;
use portlay_definition::{Metadata, PortRef};
use serde::Serialize;

/// Serializable view of a laid-out graph, as read by renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub bounds: Rect,
    pub view_box: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: String,
    pub label: String,
    pub layer: usize,
    pub order: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    pub inputs: Vec<PortSnapshot>,
    pub outputs: Vec<PortSnapshot>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortSnapshot {
    pub name: String,
    pub label: String,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSnapshot {
    pub id: String,
    pub from: PortRef,
    pub to: PortRef,
    pub label: String,
    pub path: String,
    pub stroke_width: f32,
    pub split: bool,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Graph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let bounds = self.bounds();
        GraphSnapshot {
            nodes: self.nodes().iter().map(|node| self.node_snapshot(node)).collect(),
            edges: self
                .edges()
                .iter()
                .map(|edge| EdgeSnapshot {
                    id: edge.id().to_string(),
                    from: edge.from().clone(),
                    to: edge.to().clone(),
                    label: edge.label().to_string(),
                    path: edge.path_definition(),
                    stroke_width: self.style().edge_stroke_width,
                    split: edge.is_split(),
                    metadata: edge.metadata().clone(),
                })
                .collect(),
            bounds,
            view_box: bounds.view_box(),
        }
    }

    fn node_snapshot(&self, node: &Node) -> NodeSnapshot {
        let ports = |ports: &[Port]| {
            ports
                .iter()
                .map(|port| PortSnapshot {
                    name: port.name().to_string(),
                    label: port.label().to_string(),
                    bounds: self.port_rect(port.handle()),
                })
                .collect::<Vec<_>>()
        };

        NodeSnapshot {
            id: node.id().to_string(),
            label: node.label().to_string(),
            layer: node.layer(),
            order: node.order(),
            x: node.x(),
            y: node.y(),
            width: node.width(),
            height: node.height(),
            visible: node.is_visible(),
            inputs: ports(node.inputs()),
            outputs: ports(node.outputs()),
            metadata: node.metadata().clone(),
        }
    }
}
