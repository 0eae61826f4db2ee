use crate::{EdgeIndex, Graph, LayoutError, PathData, Point, PortDirection, PortHandle};
use tracing::trace;

/// Compute the path of every edge that is not split
///
/// Paths always leave the output side and enter the input side, whatever
/// the current `from`/`to` of the edge, so reversed edges need no special
/// care.
pub(crate) fn route_edges(graph: &mut Graph, loop_width_ratio: f32) -> Result<(), LayoutError> {
    for edge in graph.edge_indices().collect::<Vec<_>>() {
        if graph.edge(edge).is_split() {
            continue;
        }
        let path = edge_path(graph, edge, loop_width_ratio)?;
        trace!("Edge {}: {path}", graph.edge(edge).id());
        graph.edge_mut(edge).path = path;
    }
    Ok(())
}

fn edge_path(
    graph: &Graph,
    edge: EdgeIndex,
    loop_width_ratio: f32,
) -> Result<PathData, LayoutError> {
    let (output, input) = output_and_input(graph.endpoints(edge)?);
    let start = graph.port_anchor(output);
    let end = graph.port_anchor(input);

    let source = graph.node(output.node);
    let target = graph.node(input.node);
    if source.layer() < target.layer() {
        return Ok(forward_path(start, end));
    }

    let loop_width = loop_width_ratio * source.width();
    let loop_height = graph.style().node_height / 4.0;
    Ok(loop_path(start, end, loop_width, loop_height))
}

fn output_and_input((from, to): (PortHandle, PortHandle)) -> (PortHandle, PortHandle) {
    if from.direction == PortDirection::Input && to.direction == PortDirection::Output {
        (to, from)
    } else {
        (from, to)
    }
}

/// S-curve with vertical tangents at both ends
pub(crate) fn forward_path(start: Point, end: Point) -> PathData {
    let dy = end.y - start.y;
    PathData::new().move_to(start).curve_to(
        Point::new(start.x, start.y + dy / 2.0),
        Point::new(end.x, end.y - dy / 2.0),
        end,
    )
}

/// Loop leaving downwards, passing left of both ends and coming back down
/// into the input
///
/// Two cubic segments meeting at the vertical middle of the loop.
pub(crate) fn loop_path(start: Point, end: Point, loop_width: f32, loop_height: f32) -> PathData {
    let left = start.x.min(end.x) - loop_width;
    let middle = Point::new(left, (start.y + end.y) / 2.0);

    PathData::new()
        .move_to(start)
        .curve_to(
            Point::new(start.x, start.y + loop_height),
            Point::new(left, start.y + loop_height),
            middle,
        )
        .curve_to(
            Point::new(left, end.y - loop_height),
            Point::new(end.x, end.y - loop_height),
            end,
        )
}
