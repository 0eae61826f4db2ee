use super::{Edge, EdgeIndex, GraphStyle, Node, NodeIndex, Port, PortDirection, PortHandle};
use crate::{LayoutError, PathData, Point, Rect, Vec2};
use portlay_definition::{
    EdgeDefinition, GraphDefinition, NodeDefinition, PortDefinition, PortRef, TEMPORARY_KEY,
};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Port names of the synthetic nodes inserted on long edges
pub(crate) const DUMMY_INPUT: &str = "in";
pub(crate) const DUMMY_OUTPUT: &str = "out";

/// A graph of nodes connected through ports
///
/// Nodes live in an insertion-ordered arena and are addressed by
/// [`NodeIndex`]; ports refer back to their node by index only. Derived
/// geometry (node widths, bounds) is cached and recomputed explicitly when
/// the underlying data changes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    style: GraphStyle,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_ids: HashMap<String, NodeIndex>,
    bounds: Cell<Option<Rect>>,
}

impl Graph {
    pub fn new(style: GraphStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Build a graph from its definition
    ///
    /// # Errors
    /// Fails on duplicate node ids or port names, and on edges referencing
    /// missing nodes or ports or not running from an output to an input.
    pub fn from_definition(
        definition: &GraphDefinition,
        style: GraphStyle,
    ) -> Result<Self, LayoutError> {
        let mut graph = Self::new(style);
        for node in &definition.nodes {
            graph.add_node(node.clone())?;
        }
        for edge in &definition.edges {
            graph.add_edge(edge.clone())?;
        }
        debug!(
            "Built graph with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    /// Replace the style, recomputing every node's width and height
    pub fn set_style(&mut self, style: GraphStyle) {
        self.style = style;
        for index in 0..self.nodes.len() {
            let node = &mut self.nodes[index];
            node.height = self.style.node_height;
            if node.synthetic {
                node.fixed_width = Some(self.style.port_width);
            }
            self.refresh_width(NodeIndex(index));
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index.0]
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn find_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.find_node(id).map(|index| self.node(index))
    }

    /// First edge with the given id
    pub fn find_edge(&self, id: &str) -> Option<EdgeIndex> {
        self.edges.iter().position(|e| e.id == id).map(EdgeIndex)
    }

    pub fn add_node(&mut self, definition: NodeDefinition) -> Result<NodeIndex, LayoutError> {
        let NodeDefinition {
            id,
            label,
            inputs,
            outputs,
            metadata,
        } = definition;

        if self.node_ids.contains_key(&id) {
            return Err(LayoutError::DuplicateNode(id));
        }

        let mut names = HashSet::new();
        for port in inputs.iter().chain(outputs.iter()) {
            if !names.insert(port.name.as_str()) {
                return Err(LayoutError::DuplicatePort {
                    node_id: id,
                    port_name: port.name.clone(),
                });
            }
        }

        let index = NodeIndex(self.nodes.len());
        let node = Node {
            label: label.unwrap_or_else(|| id.clone()),
            inputs: make_ports(index, PortDirection::Input, inputs),
            outputs: make_ports(index, PortDirection::Output, outputs),
            id: id.clone(),
            layer: 0,
            order: 0,
            position: Point::default(),
            width: 0.0,
            fixed_width: None,
            height: self.style.node_height,
            visible: true,
            synthetic: false,
            metadata,
        };

        trace!("Adding node {id} at {index}");
        self.nodes.push(node);
        self.node_ids.insert(id, index);
        self.refresh_width(index);
        Ok(index)
    }

    /// Append a port to a node and recompute the node's width
    pub fn add_port(
        &mut self,
        node: NodeIndex,
        direction: PortDirection,
        definition: PortDefinition,
    ) -> Result<PortHandle, LayoutError> {
        let owner = &mut self.nodes[node.0];
        if owner.port(&definition.name).is_some() {
            return Err(LayoutError::DuplicatePort {
                node_id: owner.id.clone(),
                port_name: definition.name,
            });
        }

        let ports = match direction {
            PortDirection::Input => &mut owner.inputs,
            PortDirection::Output => &mut owner.outputs,
        };
        let index = ports.len();
        ports.push(Port {
            label: definition.label.unwrap_or_else(|| definition.name.clone()),
            name: definition.name,
            direction,
            index,
            node,
        });

        self.refresh_width(node);
        Ok(PortHandle {
            node,
            direction,
            index,
        })
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, index: NodeIndex) -> Node {
        let node = self.nodes.remove(index.0);
        self.edges
            .retain(|edge| edge.from.node_id != node.id && edge.to.node_id != node.id);
        self.reindex();
        node
    }

    /// Add an edge after checking that both ends exist and that it runs
    /// from an output port to an input port
    pub fn add_edge(&mut self, definition: EdgeDefinition) -> Result<EdgeIndex, LayoutError> {
        let id = definition
            .id
            .clone()
            .unwrap_or_else(|| definition.derived_id());
        let from = self.resolve(&definition.from)?;
        let to = self.resolve(&definition.to)?;

        if from.direction != PortDirection::Output || to.direction != PortDirection::Input {
            return Err(LayoutError::InvalidEdgeDirection {
                edge_id: id,
                from: definition.from,
                to: definition.to,
            });
        }

        let index = EdgeIndex(self.edges.len());
        self.edges.push(Edge {
            id,
            from: definition.from,
            to: definition.to,
            label: definition.label.unwrap_or_default(),
            metadata: definition.metadata,
            path: PathData::new(),
            endpoints: Cell::new(Some((from, to))),
            split: false,
            synthetic: false,
        });
        Ok(index)
    }

    pub fn remove_edge(&mut self, index: EdgeIndex) -> Edge {
        self.edges.remove(index.0)
    }

    /// Resolve a port reference to a live port
    pub fn resolve(&self, port: &PortRef) -> Result<PortHandle, LayoutError> {
        let node = self
            .find_node(&port.node_id)
            .ok_or_else(|| LayoutError::UnknownNode(port.node_id.clone()))?;
        self.node(node)
            .port(&port.port_name)
            .map(Port::handle)
            .ok_or_else(|| LayoutError::UnknownPort(port.clone()))
    }

    /// Current `(from, to)` ports of an edge, resolved once and cached
    pub fn endpoints(&self, index: EdgeIndex) -> Result<(PortHandle, PortHandle), LayoutError> {
        let edge = &self.edges[index.0];
        if let Some(resolved) = edge.endpoints.get() {
            return Ok(resolved);
        }
        let resolved = (self.resolve(&edge.from)?, self.resolve(&edge.to)?);
        edge.endpoints.set(Some(resolved));
        Ok(resolved)
    }

    pub fn port(&self, handle: PortHandle) -> &Port {
        &self.node(handle.node).ports(handle.direction)[handle.index]
    }

    /// Top-left corner of a port
    ///
    /// The ports of one direction are centered on the node; inputs sit on
    /// top of it and outputs below it.
    pub fn port_position(&self, handle: PortHandle) -> Point {
        let node = self.node(handle.node);
        let count = node.ports(handle.direction).len();
        let start = node.x() + (node.width() - self.style.ports_width(count)) / 2.0;
        let x = start + handle.index as f32 * (self.style.port_width + self.style.port_gap);
        let y = match handle.direction {
            PortDirection::Input => node.y() - self.style.port_height,
            PortDirection::Output => node.y() + node.height(),
        };
        Point::new(x, y)
    }

    pub fn port_rect(&self, handle: PortHandle) -> Rect {
        Rect::new(
            self.port_position(handle),
            Vec2::new(self.style.port_width, self.style.port_height),
        )
    }

    /// Where edges attach: bottom-center of outputs, top-center of inputs
    pub fn port_anchor(&self, handle: PortHandle) -> Point {
        let origin = self.port_position(handle);
        let dy = match handle.direction {
            PortDirection::Input => 0.0,
            PortDirection::Output => self.style.port_height,
        };
        origin.offset(Vec2::new(self.style.port_width / 2.0, dy))
    }

    pub fn set_position(&mut self, index: NodeIndex, position: Point) {
        self.node_mut(index).position = position;
    }

    /// Box around every node, cached until node geometry changes
    pub fn bounds(&self) -> Rect {
        if let Some(bounds) = self.bounds.get() {
            return bounds;
        }
        let bounds = self
            .nodes
            .iter()
            .map(|node| Rect::new(node.position, Vec2::new(node.width, node.height)))
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        self.bounds.set(Some(bounds));
        bounds
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        self.bounds.set(None);
        &mut self.nodes[index.0]
    }

    pub(crate) fn edge_mut(&mut self, index: EdgeIndex) -> &mut Edge {
        &mut self.edges[index.0]
    }

    pub(crate) fn refresh_width(&mut self, index: NodeIndex) {
        let node = &mut self.nodes[index.0];
        node.width = node.compute_width(&self.style);
        self.bounds.set(None);
    }

    /// Append an invisible single-port node on the given layer
    pub(crate) fn add_synthetic_node(
        &mut self,
        id_hint: &str,
        layer: usize,
    ) -> Result<NodeIndex, LayoutError> {
        let mut id = id_hint.to_string();
        let mut suffix = 1;
        while self.node_ids.contains_key(&id) {
            id = format!("{id_hint}~{suffix}");
            suffix += 1;
        }

        let index = self.add_node(
            NodeDefinition::new(id)
                .with_label("")
                .with_inputs([DUMMY_INPUT])
                .with_outputs([DUMMY_OUTPUT])
                .with_metadata(TEMPORARY_KEY, true),
        )?;

        let port_width = self.style.port_width;
        let node = self.node_mut(index);
        node.synthetic = true;
        node.visible = false;
        node.fixed_width = Some(port_width);
        node.layer = layer;
        self.refresh_width(index);
        Ok(index)
    }

    pub(crate) fn add_synthetic_edge(
        &mut self,
        from: PortRef,
        to: PortRef,
    ) -> Result<EdgeIndex, LayoutError> {
        let index =
            self.add_edge(EdgeDefinition::new(from, to).with_metadata(TEMPORARY_KEY, true))?;
        self.edges[index.0].synthetic = true;
        Ok(index)
    }

    /// Drop every node and edge added by the layout engine and bring split
    /// edges back. Returns the number of removed nodes.
    pub(crate) fn remove_synthetic(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node| !node.synthetic);
        self.edges.retain(|edge| !edge.synthetic);
        for edge in &mut self.edges {
            edge.split = false;
        }

        let removed = before - self.nodes.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    /// Rebuild id lookups and port back-references after nodes moved in the
    /// arena. Cached edge resolutions are dropped.
    fn reindex(&mut self) {
        self.node_ids.clear();
        for (i, node) in self.nodes.iter_mut().enumerate() {
            self.node_ids.insert(node.id.clone(), NodeIndex(i));
            for port in node.inputs.iter_mut().chain(node.outputs.iter_mut()) {
                port.node = NodeIndex(i);
            }
        }
        for edge in &self.edges {
            edge.endpoints.set(None);
        }
        self.bounds.set(None);
    }
}

fn make_ports(
    node: NodeIndex,
    direction: PortDirection,
    definitions: Vec<PortDefinition>,
) -> Vec<Port> {
    definitions
        .into_iter()
        .enumerate()
        .map(|(index, definition)| Port {
            label: definition.label.unwrap_or_else(|| definition.name.clone()),
            name: definition.name,
            direction,
            index,
            node,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portlay_definition::MetaValue;
    use test_log::test;

    fn adder() -> NodeDefinition {
        NodeDefinition::new("add")
            .with_inputs(["lhs", "rhs"])
            .with_outputs(["sum"])
    }

    #[test]
    fn width_is_derived_from_label_and_ports() {
        let mut graph = Graph::default();
        let index = graph.add_node(adder()).unwrap();
        // label "add" = 30, inputs = 2*15 + 5 = 35, outputs = 15
        assert_eq!(graph.node(index).width(), 35.0 + 20.0);

        graph
            .add_port(index, PortDirection::Input, "carry".into())
            .unwrap();
        // inputs = 3*15 + 2*5 = 55
        assert_eq!(graph.node(index).width(), 55.0 + 20.0);
    }

    #[test]
    fn label_defaults_to_id() {
        let mut graph = Graph::default();
        let index = graph.add_node(NodeDefinition::new("source")).unwrap();
        assert_eq!(graph.node(index).label(), "source");
        assert_eq!(graph.node(index).width(), 60.0 + 20.0);
    }

    #[test]
    fn rejects_duplicates() {
        let mut graph = Graph::default();
        graph.add_node(adder()).unwrap();
        assert_eq!(
            graph.add_node(adder()),
            Err(LayoutError::DuplicateNode("add".into()))
        );

        let twice = NodeDefinition::new("x").with_inputs(["a"]).with_outputs(["a"]);
        assert!(matches!(
            graph.add_node(twice),
            Err(LayoutError::DuplicatePort { .. })
        ));
    }

    #[test]
    fn edges_must_resolve() {
        let mut graph = Graph::default();
        graph.add_node(adder()).unwrap();
        graph
            .add_node(NodeDefinition::new("out").with_inputs(["value"]))
            .unwrap();

        let missing_port =
            EdgeDefinition::new(PortRef::new("add", "nope"), PortRef::new("out", "value"));
        assert_eq!(
            graph.add_edge(missing_port),
            Err(LayoutError::UnknownPort(PortRef::new("add", "nope")))
        );

        let missing_node =
            EdgeDefinition::new(PortRef::new("add", "sum"), PortRef::new("ghost", "value"));
        assert_eq!(
            graph.add_edge(missing_node),
            Err(LayoutError::UnknownNode("ghost".into()))
        );

        let backwards =
            EdgeDefinition::new(PortRef::new("out", "value"), PortRef::new("add", "lhs"));
        assert!(matches!(
            graph.add_edge(backwards),
            Err(LayoutError::InvalidEdgeDirection { .. })
        ));
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn removing_a_node_removes_its_edges_and_reindexes() {
        let definition = GraphDefinition::new()
            .node(NodeDefinition::new("a").with_outputs(["out"]))
            .node(adder())
            .node(NodeDefinition::new("b").with_inputs(["in"]))
            .edge(("a", "out"), ("add", "lhs"))
            .edge(("add", "sum"), ("b", "in"));
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();

        let removed = graph.remove_node(graph.find_node("a").unwrap());
        assert_eq!(removed.id(), "a");
        assert_eq!(graph.edges().len(), 1);

        let b = graph.find_node("b").unwrap();
        assert_eq!(b, NodeIndex(1));
        assert_eq!(graph.node(b).inputs()[0].node(), b);

        let (from, to) = graph.endpoints(EdgeIndex(0)).unwrap();
        assert_eq!(from.node, NodeIndex(0));
        assert_eq!(to.node, b);
    }

    #[test]
    fn edge_keeps_id_and_metadata() {
        let definition = GraphDefinition::new()
            .node(NodeDefinition::new("a").with_outputs(["out"]))
            .node(NodeDefinition::new("b").with_inputs(["in"]));
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();
        let index = graph
            .add_edge(
                EdgeDefinition::new(PortRef::new("a", "out"), PortRef::new("b", "in"))
                    .with_label("data")
                    .with_metadata("weight", 2.0),
            )
            .unwrap();

        let edge = graph.edge(index);
        assert_eq!(edge.id(), "a.out->b.in");
        assert_eq!(edge.label(), "data");
        assert_eq!(edge.metadata()["weight"], MetaValue::Number(2.0));
        assert!(!edge.is_temporary());

        graph.edge_mut(index).reverse();
        let edge = graph.edge(index);
        assert_eq!(edge.id(), "a.out->b.in");
        assert_eq!(edge.from(), &PortRef::new("b", "in"));
        let (from, _) = graph.endpoints(index).unwrap();
        assert_eq!(from.direction, PortDirection::Input);
    }

    #[test]
    fn bounds_follow_node_moves() {
        let mut graph = Graph::default();
        let a = graph.add_node(NodeDefinition::new("a")).unwrap();
        let b = graph.add_node(NodeDefinition::new("b")).unwrap();
        graph.set_position(b, Point::new(100.0, 50.0));

        let bounds = graph.bounds();
        assert_eq!(bounds.min(), Point::new(0.0, 0.0));
        assert_eq!(bounds.max(), Point::new(130.0, 90.0));

        graph.set_position(a, Point::new(-10.0, 0.0));
        assert_eq!(graph.bounds().x, -10.0);
    }

    #[test]
    fn port_geometry_is_centered_on_the_node() {
        let mut graph = Graph::default();
        let index = graph.add_node(adder()).unwrap();
        graph.set_position(index, Point::new(100.0, 200.0));
        let node = graph.node(index);

        let lhs = node.inputs()[0].handle();
        let rhs = node.inputs()[1].handle();
        let sum = node.outputs()[0].handle();

        // width 55, inputs 35 wide -> start at 110
        assert_eq!(graph.port_position(lhs), Point::new(110.0, 185.0));
        assert_eq!(graph.port_position(rhs), Point::new(130.0, 185.0));
        assert_eq!(graph.port_anchor(rhs), Point::new(137.5, 185.0));
        // single output centered: start at 100 + (55 - 15) / 2
        assert_eq!(graph.port_anchor(sum), Point::new(127.5, 255.0));
    }

    #[test]
    fn bounds_follow_structural_changes() {
        let mut graph = Graph::default();
        let a = graph.add_node(NodeDefinition::new("a")).unwrap();
        let b = graph.add_node(NodeDefinition::new("b")).unwrap();
        graph.set_position(b, Point::new(100.0, 0.0));
        // "b" is 30 wide
        assert_eq!(graph.bounds().width, 130.0);

        // three inputs: 3*15 + 2*5 = 55, plus padding
        for name in ["x", "y", "z"] {
            graph.add_port(b, PortDirection::Input, name.into()).unwrap();
        }
        assert_eq!(graph.node(b).width(), 75.0);
        assert_eq!(graph.bounds().width, 175.0);

        let c = graph.add_node(NodeDefinition::new("c")).unwrap();
        graph.set_position(c, Point::new(300.0, 0.0));
        assert_eq!(graph.bounds().width, 330.0);

        graph.remove_node(c);
        assert_eq!(graph.bounds().width, 175.0);
        graph.remove_node(b);
        assert_eq!(graph.bounds(), Rect::new(Point::new(0.0, 0.0), Vec2::new(30.0, 40.0)));
        assert_eq!(graph.node(a).id(), "a");
    }

    #[test]
    fn style_changes_resize_nodes() {
        let mut graph = Graph::default();
        let index = graph.add_node(adder()).unwrap();
        assert_eq!(graph.bounds(), Rect::new(Point::new(0.0, 0.0), Vec2::new(55.0, 40.0)));

        graph.set_style(GraphStyle {
            port_width: 30.0,
            node_height: 60.0,
            ..Default::default()
        });
        // inputs = 2*30 + 5 = 65
        let node = graph.node(index);
        assert_eq!(node.width(), 85.0);
        assert_eq!(node.height(), 60.0);
        assert_eq!(graph.bounds(), Rect::new(Point::new(0.0, 0.0), Vec2::new(85.0, 60.0)));
    }

    #[test]
    fn synthetic_nodes_follow_the_port_width() {
        let mut graph = Graph::default();
        let dummy = graph.add_synthetic_node("long#1", 1).unwrap();
        assert_eq!(graph.node(dummy).width(), 15.0);

        graph.set_style(GraphStyle {
            port_width: 30.0,
            ..Default::default()
        });
        assert!(graph.node(dummy).is_temporary());
        assert_eq!(graph.node(dummy).width(), 30.0);
    }

    #[test]
    fn removing_an_edge_shifts_the_next_ones() {
        let definition = GraphDefinition::new()
            .node(NodeDefinition::new("a").with_outputs(["o1", "o2"]))
            .node(NodeDefinition::new("b").with_inputs(["i1", "i2"]))
            .edge(("a", "o1"), ("b", "i1"))
            .edge(("a", "o2"), ("b", "i2"));
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();

        let removed = graph.remove_edge(EdgeIndex(0));
        assert_eq!(removed.id(), "a.o1->b.i1");
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edge(EdgeIndex(0)).id(), "a.o2->b.i2");
        assert_eq!(graph.find_edge("a.o2->b.i2"), Some(EdgeIndex(0)));
        assert_eq!(graph.find_edge("a.o1->b.i1"), None);

        let (from, to) = graph.endpoints(EdgeIndex(0)).unwrap();
        assert_eq!(graph.port(from).name(), "o2");
        assert_eq!(graph.port(to).name(), "i2");
    }
}
