use super::Link;
use crate::{Graph, NodeIndex};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Sort the layers top-down by the barycenter of each node's predecessors
///
/// Already sorted layers get provisional x positions (cumulative widths)
/// so the next layer can be sorted against them. Nodes without predecessors
/// count as 0 and lead their layer. The sort is stable.
pub(crate) fn order_by_barycenter(
    graph: &Graph,
    layers: &mut [Vec<NodeIndex>],
    links: &[Link],
    node_spacing: f32,
) {
    let node_count = graph.nodes().len();
    let mut predecessors = vec![Vec::new(); node_count];
    for link in links.iter().filter(|link| !link.is_self_loop()) {
        predecessors[link.target.0].push(link.source);
    }

    let mut centers = vec![0.0_f32; node_count];
    for layer in layers.iter_mut() {
        let mut keyed: Vec<(f32, NodeIndex)> = layer
            .iter()
            .map(|&node| (barycenter(&predecessors[node.0], &centers), node))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        *layer = keyed.into_iter().map(|(_, node)| node).collect();

        let mut x = node_spacing;
        for &node in layer.iter() {
            let width = graph.node(node).width();
            centers[node.0] = x + width / 2.0;
            x += width + node_spacing;
        }
    }
}

fn barycenter(predecessors: &[NodeIndex], centers: &[f32]) -> f32 {
    if predecessors.is_empty() {
        return 0.0;
    }
    let sum: f32 = predecessors.iter().map(|pred| centers[pred.0]).sum();
    sum / predecessors.len() as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CrossingStats {
    /// Crossings left after the last pass
    pub crossings: usize,
    pub passes: usize,
    pub swaps: usize,
}

/// Reduce crossings by swapping inverted node pairs within layers
///
/// Greedy local search: every pass visits each layer, collects the node
/// pairs whose edges towards a neighbouring layer are inverted, and swaps
/// them all at once. Swaps that do not lower the total number of crossings
/// are undone. Stops after a pass without swaps or after `max_iterations`.
pub(crate) fn minimize_crossings(
    layers: &mut [Vec<NodeIndex>],
    links: &[Link],
    max_iterations: usize,
) -> CrossingStats {
    let mut ranks = Ranks::new(layers);
    let spans = spans(links, &ranks);
    let mut stats = CrossingStats {
        crossings: count_crossings(&spans, &ranks),
        ..Default::default()
    };

    for pass in 0..max_iterations {
        let mut swaps = 0;

        for layer_index in 0..layers.len() {
            let candidates = swap_candidates(layer_index, &spans, &ranks);
            if candidates.is_empty() {
                continue;
            }

            apply_swaps(&mut layers[layer_index], &candidates, &mut ranks);
            let crossings = count_crossings(&spans, &ranks);
            if crossings >= stats.crossings {
                // Swaps are disjoint, applying them again undoes them
                apply_swaps(&mut layers[layer_index], &candidates, &mut ranks);
                trace!("Pass {pass}: no gain from swaps in layer {layer_index}");
                continue;
            }

            stats.crossings = crossings;
            swaps += candidates.len();
        }

        stats.passes = pass + 1;
        stats.swaps += swaps;
        if swaps == 0 {
            break;
        }
    }

    debug!(
        "Crossing reduction: {} crossings left after {} passes ({} swaps)",
        stats.crossings, stats.passes, stats.swaps
    );
    stats
}

/// Crossings between edges of adjacent layers for the given ordering
pub(crate) fn count_layer_crossings(layers: &[Vec<NodeIndex>], links: &[Link]) -> usize {
    let ranks = Ranks::new(layers);
    count_crossings(&spans(links, &ranks), &ranks)
}

/// Layer and in-layer position of each node
struct Ranks {
    layer: Vec<usize>,
    position: Vec<usize>,
}

impl Ranks {
    fn new(layers: &[Vec<NodeIndex>]) -> Self {
        let node_count = layers
            .iter()
            .flatten()
            .map(|node| node.0 + 1)
            .max()
            .unwrap_or(0);
        let mut ranks = Self {
            layer: vec![0; node_count],
            position: vec![0; node_count],
        };
        for (layer_index, layer) in layers.iter().enumerate() {
            for (position, node) in layer.iter().enumerate() {
                ranks.layer[node.0] = layer_index;
                ranks.position[node.0] = position;
            }
        }
        ranks
    }

    fn before(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.position[a.0] < self.position[b.0]
    }
}

/// Links between adjacent layers, as `(upper, lower)` node pairs
fn spans(links: &[Link], ranks: &Ranks) -> Vec<(NodeIndex, NodeIndex)> {
    links
        .iter()
        .filter_map(|link| {
            let source_layer = ranks.layer[link.source.0];
            let target_layer = ranks.layer[link.target.0];
            if source_layer + 1 == target_layer {
                Some((link.source, link.target))
            } else if target_layer + 1 == source_layer {
                Some((link.target, link.source))
            } else {
                None
            }
        })
        .collect()
}

fn count_crossings(spans: &[(NodeIndex, NodeIndex)], ranks: &Ranks) -> usize {
    let mut crossings = 0;
    for (i, &(upper1, lower1)) in spans.iter().enumerate() {
        for &(upper2, lower2) in &spans[i + 1..] {
            if ranks.layer[upper1.0] != ranks.layer[upper2.0]
                || upper1 == upper2
                || lower1 == lower2
            {
                continue;
            }
            if ranks.before(upper1, upper2) != ranks.before(lower1, lower2) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Disjoint node pairs of `layer` whose order is inverted relative to the
/// other end of their edges
fn swap_candidates(
    layer: usize,
    spans: &[(NodeIndex, NodeIndex)],
    ranks: &Ranks,
) -> Vec<(NodeIndex, NodeIndex)> {
    let mut pairs = Vec::new();
    for (i, &(upper1, lower1)) in spans.iter().enumerate() {
        for &(upper2, lower2) in &spans[i + 1..] {
            if ranks.layer[upper1.0] != ranks.layer[upper2.0] {
                continue;
            }

            // (end in the tested layer, other end)
            let ((a1, b1), (a2, b2)) = if ranks.layer[upper1.0] == layer {
                ((upper1, lower1), (upper2, lower2))
            } else if ranks.layer[lower1.0] == layer {
                ((lower1, upper1), (lower2, upper2))
            } else {
                continue;
            };

            if a1 == a2 || b1 == b2 {
                continue;
            }
            if ranks.before(a1, a2) != ranks.before(b1, b2) {
                pairs.push((a1.min(a2), a1.max(a2)));
            }
        }
    }

    pairs.sort();
    pairs.dedup();

    let mut used = HashSet::new();
    pairs.retain(|&(a, b)| {
        if used.contains(&a) || used.contains(&b) {
            return false;
        }
        used.insert(a);
        used.insert(b);
        true
    });
    pairs
}

fn apply_swaps(layer: &mut [NodeIndex], swaps: &[(NodeIndex, NodeIndex)], ranks: &mut Ranks) {
    for &(a, b) in swaps {
        let (pa, pb) = (ranks.position[a.0], ranks.position[b.0]);
        layer.swap(pa, pb);
        ranks.position[a.0] = pb;
        ranks.position[b.0] = pa;
    }
}
