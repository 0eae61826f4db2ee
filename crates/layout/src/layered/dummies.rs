use crate::model::{DUMMY_INPUT, DUMMY_OUTPUT};
use crate::{EdgeIndex, Graph, LayoutError, PathData};
use portlay_definition::PortRef;
use tracing::debug;

/// An edge replaced by temporary edges through dummy nodes
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DummyChain {
    pub edge: EdgeIndex,
    pub links: Vec<EdgeIndex>,
}

/// Split every edge spanning more than one layer into single-layer hops
///
/// Reversed edges are skipped, they are drawn as loops. The original edge
/// stays in the graph marked as split.
pub(crate) fn insert_dummy_nodes(
    graph: &mut Graph,
    reversed: &[EdgeIndex],
) -> Result<Vec<DummyChain>, LayoutError> {
    let mut chains = Vec::new();

    for edge in graph.edge_indices().collect::<Vec<_>>() {
        if reversed.contains(&edge) || graph.edge(edge).is_split() {
            continue;
        }

        let (from, to) = graph.endpoints(edge)?;
        let source_layer = graph.node(from.node).layer();
        let target_layer = graph.node(to.node).layer();
        if target_layer <= source_layer + 1 {
            continue;
        }

        let original = graph.edge(edge).clone();
        let mut previous = original.from().clone();
        let mut links = Vec::new();

        for layer in source_layer + 1..target_layer {
            let dummy = graph.add_synthetic_node(&format!("{}#{layer}", original.id()), layer)?;
            let dummy_id = graph.node(dummy).id().to_string();
            links.push(graph.add_synthetic_edge(previous, PortRef::new(&dummy_id, DUMMY_INPUT))?);
            previous = PortRef::new(dummy_id, DUMMY_OUTPUT);
        }
        links.push(graph.add_synthetic_edge(previous, original.to().clone())?);

        debug!(
            "Split edge {} over layers {source_layer}..{target_layer}",
            original.id()
        );
        graph.edge_mut(edge).split = true;
        chains.push(DummyChain { edge, links });
    }

    Ok(chains)
}

/// Give each split edge the concatenated path of its chain
pub(crate) fn join_chain_paths(graph: &mut Graph, chains: &[DummyChain]) {
    for chain in chains {
        let mut path = PathData::new();
        for &link in &chain.links {
            path.append_joined(graph.edge(link).path());
        }
        graph.edge_mut(chain.edge).path = path;
    }
}
