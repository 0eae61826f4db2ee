use crate::{Graph, LayoutError, LayoutReport};

/// A layout engine that places the nodes of a [`Graph`] and routes its edges
///
/// Engines mutate the graph in place: node layers, orders and positions, and
/// edge paths. Whatever the engine adds temporarily must be gone by the time
/// `layout` returns, unless the engine is configured to keep it.
pub trait LayoutEngine {
    /// Lay out the given graph
    ///
    /// # Errors
    /// Returns an error if an edge cannot be resolved to live ports, or if
    /// the graph violates an engine-specific constraint
    fn layout(&self, graph: &mut Graph) -> Result<LayoutReport, LayoutError>;
}
