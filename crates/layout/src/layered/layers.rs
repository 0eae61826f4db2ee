use super::{active_links, Link};
use crate::{Graph, LayoutError, NodeIndex};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

/// Assign every node the length of the longest path reaching it
///
/// Layers are computed in topological order so predecessors are final
/// before their successors are visited, then same-layer edges are pushed
/// apart by [`resolve_conflicts`].
pub(crate) fn assign_layers(
    graph: &mut Graph,
    max_conflict_passes: usize,
) -> Result<(), LayoutError> {
    let links = active_links(graph)?;
    let node_count = graph.nodes().len();

    let mut predecessors = vec![Vec::new(); node_count];
    for link in links.iter().filter(|link| !link.is_self_loop()) {
        predecessors[link.target.0].push(link.source.0);
    }

    let mut layers = vec![0; node_count];
    for node in topological_order(node_count, &links) {
        layers[node] = predecessors[node]
            .iter()
            .map(|&pred| layers[pred] + 1)
            .max()
            .unwrap_or(0);
    }

    resolve_conflicts(&mut layers, &links, max_conflict_passes);

    for (index, layer) in layers.into_iter().enumerate() {
        graph.node_mut(NodeIndex(index)).layer = layer;
    }
    Ok(())
}

/// Topological order of the nodes, falling back to insertion order if the
/// graph is still cyclic
fn topological_order(node_count: usize, links: &[Link]) -> Vec<usize> {
    let mut graph = DiGraphMap::<usize, ()>::new();
    for node in 0..node_count {
        graph.add_node(node);
    }
    for link in links.iter().filter(|link| !link.is_self_loop()) {
        graph.add_edge(link.source.0, link.target.0, ());
    }

    match toposort(&graph, None) {
        Ok(order) => order,
        Err(cycle) => {
            warn!(
                "Graph has a cycle at node {}, layering in insertion order",
                cycle.node_id()
            );
            (0..node_count).collect()
        }
    }
}

/// Bump the target of every edge whose ends share a layer
///
/// Bounded best-effort pass: stops after a pass without change or after
/// `max_passes`. Self-loops are left alone.
pub(crate) fn resolve_conflicts(layers: &mut [usize], links: &[Link], max_passes: usize) -> usize {
    for pass in 0..max_passes {
        let mut changed = false;
        for link in links.iter().filter(|link| !link.is_self_loop()) {
            if layers[link.source.0] == layers[link.target.0] {
                layers[link.target.0] += 1;
                changed = true;
            }
        }

        if !changed {
            return pass;
        }
    }

    debug!("Layer conflicts remain after {max_passes} passes");
    max_passes
}

/// Nodes grouped by layer, in insertion order
pub(crate) fn group_by_layer(graph: &Graph) -> Vec<Vec<NodeIndex>> {
    let layer_count = graph
        .nodes()
        .iter()
        .map(|node| node.layer() + 1)
        .max()
        .unwrap_or(0);

    let mut layers = vec![Vec::new(); layer_count];
    for index in graph.node_indices() {
        layers[graph.node(index).layer()].push(index);
    }
    layers
}
