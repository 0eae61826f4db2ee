use crate::{GraphStyle, Point};
use derive_more::{Display, From};
use portlay_definition::{Metadata, TEMPORARY_KEY};
use serde::{Deserialize, Serialize};

/// Position of a node in the graph's node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct NodeIndex(pub usize);

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Resolved address of a port: owning node, direction and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortHandle {
    pub node: NodeIndex,
    pub direction: PortDirection,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub(crate) name: String,
    pub(crate) label: String,
    pub(crate) direction: PortDirection,
    pub(crate) index: usize,
    pub(crate) node: NodeIndex,
}

impl Port {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The node owning this port
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    pub fn handle(&self) -> PortHandle {
        PortHandle {
            node: self.node,
            direction: self.direction,
            index: self.index,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) label: String,
    pub(crate) inputs: Vec<Port>,
    pub(crate) outputs: Vec<Port>,
    pub(crate) layer: usize,
    pub(crate) order: usize,
    pub(crate) position: Point,
    pub(crate) width: f32,
    /// Overrides the width derived from label and ports
    pub(crate) fixed_width: Option<f32>,
    pub(crate) height: f32,
    pub(crate) visible: bool,
    /// Created by the layout engine, removed again by it
    pub(crate) synthetic: bool,
    pub(crate) metadata: Metadata,
}

impl Node {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    pub fn ports(&self, direction: PortDirection) -> &[Port] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    /// Find a port by name, inputs first
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .find(|port| port.name == name)
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Left-to-right rank inside the layer
    pub fn order(&self) -> usize {
        self.order
    }

    /// Top-left corner
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether the node carries the `temporary` tag
    pub fn is_temporary(&self) -> bool {
        self.metadata
            .get(TEMPORARY_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub(crate) fn compute_width(&self, style: &GraphStyle) -> f32 {
        if let Some(width) = self.fixed_width {
            return width;
        }
        let label_width = self.label.chars().count() as f32 * style.char_width;
        let inputs_width = style.ports_width(self.inputs.len());
        let outputs_width = style.ports_width(self.outputs.len());
        label_width.max(inputs_width).max(outputs_width) + 2.0 * style.node_padding
    }
}
