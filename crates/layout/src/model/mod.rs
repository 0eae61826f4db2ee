mod edge;
mod graph;
mod node;
mod snapshot;
mod style;

pub use edge::{Edge, EdgeIndex};
pub use graph::Graph;
pub(crate) use graph::{DUMMY_INPUT, DUMMY_OUTPUT};
pub use node::{Node, NodeIndex, Port, PortDirection, PortHandle};
pub use snapshot::{EdgeSnapshot, GraphSnapshot, NodeSnapshot, PortSnapshot};
pub use style::GraphStyle;
