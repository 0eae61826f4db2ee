use super::{active_links, Link};
use crate::{EdgeIndex, Graph, LayoutError, NodeIndex};
use tracing::{debug, warn};

/// Reverse edges until no strongly connected component spans more than
/// one node
///
/// Each pass runs Tarjan's algorithm and reverses one edge per cyclic
/// component. Returns the edges whose direction is flipped, to be handed to
/// [`restore_cycles`] once the layout is done.
pub(crate) fn break_cycles(graph: &mut Graph) -> Result<Vec<EdgeIndex>, LayoutError> {
    let mut reversed: Vec<EdgeIndex> = Vec::new();
    let max_passes = graph.edges().len() + 1;

    for pass in 0..max_passes {
        let links = active_links(graph)?;
        let components = strongly_connected(graph.nodes().len(), &links);

        let mut changed = false;
        for component in components.iter().filter(|c| c.len() > 1) {
            let Some(edge) = select_edge(component, &links) else {
                continue;
            };
            debug!(
                "Pass {pass}: reversing edge {} to break a cycle of {} nodes",
                graph.edge(edge).id(),
                component.len()
            );
            graph.edge_mut(edge).reverse();

            // An edge flipped twice is back to its original direction
            match reversed.iter().position(|&e| e == edge) {
                Some(i) => {
                    reversed.remove(i);
                }
                None => reversed.push(edge),
            }
            changed = true;
        }

        if !changed {
            return Ok(reversed);
        }
    }

    warn!("Graph still has cycles after {max_passes} passes");
    Ok(reversed)
}

/// Flip the given edges back to their original direction
pub(crate) fn restore_cycles(graph: &mut Graph, reversed: &[EdgeIndex]) {
    for &edge in reversed {
        graph.edge_mut(edge).reverse();
    }
}

/// Prefer the edge from the first popped node to the component root, then
/// any edge from a member into the root
fn select_edge(component: &[NodeIndex], links: &[Link]) -> Option<EdgeIndex> {
    let first = *component.first()?;
    let root = *component.last()?;

    links
        .iter()
        .find(|link| link.source == first && link.target == root)
        .or_else(|| {
            links.iter().find(|link| {
                link.target == root && link.source != root && component.contains(&link.source)
            })
        })
        .map(|link| link.edge)
}

/// Tarjan's strongly connected components, without recursion
///
/// Components are returned in the order they complete, each listing its
/// nodes in pop order (the root last). Self-loops are ignored.
pub(crate) fn strongly_connected(node_count: usize, links: &[Link]) -> Vec<Vec<NodeIndex>> {
    let mut successors = vec![Vec::new(); node_count];
    for link in links.iter().filter(|link| !link.is_self_loop()) {
        successors[link.source.0].push(link.target.0);
    }

    let mut index: Vec<Option<usize>> = vec![None; node_count];
    let mut lowlink = vec![0; node_count];
    let mut on_stack = vec![false; node_count];
    let mut stack = Vec::new();
    let mut next_index = 0;
    let mut components = Vec::new();

    for root in 0..node_count {
        if index[root].is_some() {
            continue;
        }

        // (node, position of the next successor to visit)
        let mut call_stack = vec![(root, 0)];
        index[root] = Some(next_index);
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.0;
            if let Some(&succ) = successors[node].get(frame.1) {
                frame.1 += 1;
                match index[succ] {
                    None => {
                        index[succ] = Some(next_index);
                        lowlink[succ] = next_index;
                        next_index += 1;
                        stack.push(succ);
                        on_stack[succ] = true;
                        call_stack.push((succ, 0));
                    }
                    Some(succ_index) if on_stack[succ] => {
                        lowlink[node] = lowlink[node].min(succ_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }

            if index[node] == Some(lowlink[node]) {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(NodeIndex(member));
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    components
}
