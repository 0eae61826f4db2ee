mod crossings;
mod cycles;
mod dummies;
mod layers;
mod positions;
mod routing;

use crate::{EdgeIndex, Graph, LayoutEngine, LayoutError, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crossings::{count_layer_crossings, minimize_crossings, order_by_barycenter};
use cycles::{break_cycles, restore_cycles};
use dummies::{insert_dummy_nodes, join_chain_paths, DummyChain};
use layers::{assign_layers, group_by_layer};
use positions::assign_coordinates;
use routing::route_edges;

/// Configuration for the layered (Sugiyama-style) layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SugiyamaLayout {
    /// Horizontal gap between nodes of a layer, also the left margin
    pub node_spacing: f32,

    /// Vertical gap between two layers
    pub layer_spacing: f32,

    /// Width each layer is centered in
    pub viewport_width: f32,

    /// Refine the barycenter ordering by swapping inverted node pairs
    pub enable_crossing_minimization: bool,

    /// Keep the dummy nodes and temporary edges in the laid-out graph
    pub retain_dummy_nodes: bool,

    /// Maximum passes resolving edges whose ends share a layer
    pub max_conflict_passes: usize,

    /// Maximum passes of crossing minimization
    pub max_crossing_iterations: usize,

    /// How far loops reach left of their node, as a fraction of its width
    pub loop_width_ratio: f32,
}

impl Default for SugiyamaLayout {
    fn default() -> Self {
        Self {
            node_spacing: 20.0,
            layer_spacing: 100.0,
            viewport_width: 1024.0,
            enable_crossing_minimization: true,
            retain_dummy_nodes: false,
            max_conflict_passes: 10,
            max_crossing_iterations: 20,
            loop_width_ratio: 1.0 / 6.0,
        }
    }
}

impl SugiyamaLayout {
    /// Create a new layered layout with the given spacings
    pub fn new(node_spacing: f32, layer_spacing: f32) -> Self {
        Self {
            node_spacing,
            layer_spacing,
            ..Default::default()
        }
    }
}

/// Summary of a finished layout pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub reversed_edges: usize,
    pub layers: usize,
    pub dummy_nodes: usize,
    /// Edge crossings between adjacent layers (quality metric)
    pub crossings: usize,
    pub crossing_passes: usize,
}

/// Layer structure computed by the first phases
#[derive(Debug, Clone, Default)]
pub struct Layers {
    /// Nodes of each layer, left to right
    pub nodes: Vec<Vec<NodeIndex>>,

    /// Edges reversed to make the graph acyclic
    pub reversed: Vec<EdgeIndex>,

    /// Number of edge crossings (quality metric)
    pub crossings: usize,

    pub crossing_passes: usize,

    pub(crate) chains: Vec<DummyChain>,
}

/// An edge reduced to its nodes, in its current direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub edge: EdgeIndex,
    pub source: NodeIndex,
    pub target: NodeIndex,
}

impl Link {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Links of every edge taking part in the layout (split edges excluded)
pub(crate) fn active_links(graph: &Graph) -> Result<Vec<Link>, LayoutError> {
    graph
        .edge_indices()
        .filter(|&edge| !graph.edge(edge).is_split())
        .map(|edge| -> Result<Link, LayoutError> {
            let (from, to) = graph.endpoints(edge)?;
            Ok(Link {
                edge,
                source: from.node,
                target: to.node,
            })
        })
        .collect()
}

impl SugiyamaLayout {
    /// Break cycles, assign layers, insert dummy nodes and order layers
    ///
    /// Leftovers of a previous pass (dummy nodes, split edges) are dropped
    /// first, so a graph can be laid out again from scratch.
    ///
    /// # Errors
    /// Returns an error if an edge references a port that does not exist
    pub fn compute_layers(&self, graph: &mut Graph) -> Result<Layers, LayoutError> {
        graph.remove_synthetic();

        let reversed = break_cycles(graph)?;
        assign_layers(graph, self.max_conflict_passes)?;
        let chains = insert_dummy_nodes(graph, &reversed)?;

        let links = active_links(graph)?;
        let mut nodes = group_by_layer(graph);
        order_by_barycenter(graph, &mut nodes, &links, self.node_spacing);

        let (crossings, crossing_passes) = if self.enable_crossing_minimization {
            let stats = minimize_crossings(&mut nodes, &links, self.max_crossing_iterations);
            (stats.crossings, stats.passes)
        } else {
            (count_layer_crossings(&nodes, &links), 0)
        };

        debug!(
            "{} layers, {} reversed edges, {} split edges",
            nodes.len(),
            reversed.len(),
            chains.len()
        );

        Ok(Layers {
            nodes,
            reversed,
            crossings,
            crossing_passes,
            chains,
        })
    }

    /// Place nodes: x from the layer order, y from the layer index
    pub fn compute_positions(&self, graph: &mut Graph, layers: &Layers) {
        assign_coordinates(
            graph,
            &layers.nodes,
            self.node_spacing,
            self.layer_spacing,
            self.viewport_width,
        );
    }

    /// Compute every edge path; split edges get their chain's path
    ///
    /// # Errors
    /// Returns an error if an edge references a port that does not exist
    pub fn compute_edge_paths(
        &self,
        graph: &mut Graph,
        layers: &Layers,
    ) -> Result<(), LayoutError> {
        route_edges(graph, self.loop_width_ratio)?;
        join_chain_paths(graph, &layers.chains);
        Ok(())
    }

    /// Restore reversed edges and drop dummy nodes unless they are retained
    pub fn finish(&self, graph: &mut Graph, layers: Layers) -> LayoutReport {
        restore_cycles(graph, &layers.reversed);

        let dummy_nodes = graph.nodes().iter().filter(|node| node.synthetic).count();
        if !self.retain_dummy_nodes {
            graph.remove_synthetic();
        }

        LayoutReport {
            reversed_edges: layers.reversed.len(),
            layers: layers.nodes.len(),
            dummy_nodes,
            crossings: layers.crossings,
            crossing_passes: layers.crossing_passes,
        }
    }
}

impl LayoutEngine for SugiyamaLayout {
    fn layout(&self, graph: &mut Graph) -> Result<LayoutReport, LayoutError> {
        let layers = self.compute_layers(graph)?;
        self.compute_positions(graph, &layers);
        self.compute_edge_paths(graph, &layers)?;
        Ok(self.finish(graph, layers))
    }
}
