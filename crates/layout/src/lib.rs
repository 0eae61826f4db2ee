//! Layered layout for directed graphs whose edges connect node ports
//!
//! Nodes carry named input ports (drawn on top) and output ports (drawn
//! below). A [`Graph`] is built from a [`GraphDefinition`], laid out by a
//! [`LayoutEngine`], then read back through its accessors or as a
//! serializable [`GraphSnapshot`].
//!
//! # Layout Engines
//!
//! - [`SugiyamaLayout`]: layered layout, handles cycles and long edges
//! - [`DiagonalLayout`]: one node per layer on a staircase
//!
//! # Example
//!
//! ```
//! use portlay_definition::{GraphDefinition, NodeDefinition};
//! use portlay_layout::{Graph, GraphStyle, LayoutEngine, SugiyamaLayout};
//!
//! let definition = GraphDefinition::new()
//!     .node(NodeDefinition::new("source").with_outputs(["out"]))
//!     .node(NodeDefinition::new("sink").with_inputs(["in"]))
//!     .edge(("source", "out"), ("sink", "in"));
//! let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();
//!
//! // Use the LayoutEngine trait (simple, single call):
//! let engine = SugiyamaLayout::default();
//! let report = engine.layout(&mut graph).unwrap();
//! assert_eq!(report.layers, 2);
//!
//! // Or call each phase for better control
//! let layers = engine.compute_layers(&mut graph).unwrap();
//! engine.compute_positions(&mut graph, &layers);
//! engine.compute_edge_paths(&mut graph, &layers).unwrap();
//! let report = engine.finish(&mut graph, layers);
//! assert_eq!(report.reversed_edges, 0);
//!
//! let sink = graph.node_by_id("sink").unwrap();
//! assert_eq!(sink.layer(), 1);
//! println!("{}", graph.edges()[0].path_definition());
//! ```
//!
//! [`GraphDefinition`]: portlay_definition::GraphDefinition

mod diagonal;
mod engine;
mod error;
mod geometry;
mod model;
mod path;

pub mod layered;

pub use diagonal::DiagonalLayout;
pub use engine::LayoutEngine;
pub use error::LayoutError;
pub use geometry::{Point, Rect, Vec2};
pub use model::{
    Edge, EdgeIndex, EdgeSnapshot, Graph, GraphSnapshot, GraphStyle, Node, NodeIndex,
    NodeSnapshot, Port, PortDirection, PortHandle, PortSnapshot,
};
pub use path::{PathCommand, PathData};

// Re-export layered layout types
pub use layered::{LayoutReport, Layers, SugiyamaLayout};
