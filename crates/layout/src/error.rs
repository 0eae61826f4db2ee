use portlay_definition::PortRef;
use thiserror::Error;

/// Errors that reject a graph as malformed
///
/// Every variant is fatal: a layout pass that hits one aborts instead of
/// laying out a partial graph.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),

    #[error("node {node_id:?} declares port {port_name:?} twice")]
    DuplicatePort { node_id: String, port_name: String },

    #[error("unable to find node {0:?}")]
    UnknownNode(String),

    #[error("unable to find port {0}")]
    UnknownPort(PortRef),

    #[error("edge {edge_id:?} must run from an output port to an input port ({from} -> {to})")]
    InvalidEdgeDirection {
        edge_id: String,
        from: PortRef,
        to: PortRef,
    },
}
