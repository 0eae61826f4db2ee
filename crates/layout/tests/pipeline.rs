use portlay_definition::{GraphDefinition, NodeDefinition, PortRef};
use portlay_layout::{
    EdgeIndex, Graph, GraphStyle, LayoutEngine, LayoutError, PathCommand, PortDirection,
    SugiyamaLayout,
};
use test_log::test;

fn relay(id: &str) -> NodeDefinition {
    NodeDefinition::new(id).with_inputs(["in"]).with_outputs(["out"])
}

fn laid_out(definition: &GraphDefinition) -> Graph {
    let mut graph =
        Graph::from_definition(definition, GraphStyle::default()).expect("invalid graph");
    SugiyamaLayout::default()
        .layout(&mut graph)
        .expect("layout failed");
    graph
}

/// Diamond with a long edge and a back edge
fn mixed() -> GraphDefinition {
    GraphDefinition::new()
        .node(NodeDefinition::new("src").with_outputs(["a", "b", "c"]))
        .node(relay("left"))
        .node(NodeDefinition::new("right").with_inputs(["in", "back"]).with_outputs(["out"]))
        .node(NodeDefinition::new("join").with_inputs(["l", "r", "skip"]).with_outputs(["out"]))
        .edge(("src", "a"), ("left", "in"))
        .edge(("src", "b"), ("right", "in"))
        .edge(("left", "out"), ("join", "l"))
        .edge(("right", "out"), ("join", "r"))
        .edge(("src", "c"), ("join", "skip"))
        .edge(("join", "out"), ("right", "back"))
}

#[test]
fn isolated_nodes_share_the_first_layer() {
    let graph = laid_out(
        &GraphDefinition::new()
            .node(NodeDefinition::new("a"))
            .node(NodeDefinition::new("b")),
    );

    let a = graph.node_by_id("a").unwrap();
    let b = graph.node_by_id("b").unwrap();
    assert_eq!((a.layer(), b.layer()), (0, 0));
    assert_eq!(a.y(), b.y());
    assert!(a.x() + a.width() < b.x());
}

#[test]
fn chain_goes_down_one_layer_per_edge() {
    let graph = laid_out(
        &GraphDefinition::new()
            .node(relay("a"))
            .node(relay("b"))
            .node(relay("c"))
            .edge(("a", "out"), ("b", "in"))
            .edge(("b", "out"), ("c", "in")),
    );

    let layers: Vec<_> = graph.nodes().iter().map(|node| node.layer()).collect();
    assert_eq!(layers, vec![0, 1, 2]);
    let ys: Vec<_> = graph.nodes().iter().map(|node| node.y()).collect();
    assert!(ys[0] < ys[1] && ys[1] < ys[2]);

    for (index, edge) in graph.edges().iter().enumerate() {
        let (from, to) = graph.endpoints(EdgeIndex(index)).unwrap();
        let commands = edge.path().commands();
        assert_eq!(commands.first(), Some(&PathCommand::MoveTo(graph.port_anchor(from))));
        match commands.last() {
            Some(PathCommand::CurveTo(_, _, end)) => assert_eq!(*end, graph.port_anchor(to)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}

#[test]
fn cycles_are_restored_after_layout() {
    let mut graph = Graph::from_definition(
        &GraphDefinition::new()
            .node(relay("a"))
            .node(relay("b"))
            .edge(("a", "out"), ("b", "in"))
            .edge(("b", "out"), ("a", "in")),
        GraphStyle::default(),
    )
    .unwrap();

    let report = SugiyamaLayout::default().layout(&mut graph).unwrap();
    assert_eq!(report.reversed_edges, 1);

    let back = &graph.edges()[1];
    assert_eq!(back.from(), &PortRef::new("b", "out"));
    assert_eq!(back.to(), &PortRef::new("a", "in"));
    let a = graph.node_by_id("a").unwrap();
    let b = graph.node_by_id("b").unwrap();
    assert_ne!(a.layer(), b.layer());
}

#[test]
fn missing_port_is_rejected() {
    let definition = GraphDefinition::new()
        .node(relay("a"))
        .node(relay("b"))
        .edge(("a", "out"), ("b", "nope"));

    let error = Graph::from_definition(&definition, GraphStyle::default()).unwrap_err();
    assert_eq!(error, LayoutError::UnknownPort(PortRef::new("b", "nope")));
}

#[test]
fn edges_must_leave_outputs_and_enter_inputs() {
    let definition = GraphDefinition::new()
        .node(relay("a"))
        .node(relay("b"))
        .edge(("a", "in"), ("b", "out"));

    let error = Graph::from_definition(&definition, GraphStyle::default()).unwrap_err();
    assert!(matches!(error, LayoutError::InvalidEdgeDirection { .. }));
}

#[test]
fn layout_is_deterministic() {
    let first = laid_out(&mixed());
    let second = laid_out(&mixed());
    assert_eq!(first.snapshot(), second.snapshot());

    let paths: Vec<_> = first.edges().iter().map(|e| e.path_definition()).collect();
    assert!(paths.iter().all(|path| path.starts_with("M ")));
}

#[test]
fn edges_never_stay_within_a_layer() {
    let graph = laid_out(&mixed());

    for edge in graph.edges() {
        let from = graph.node_by_id(&edge.from().node_id).unwrap();
        let to = graph.node_by_id(&edge.to().node_id).unwrap();
        assert_ne!(from.layer(), to.layer(), "edge {}", edge.id());
    }
    assert!(graph.nodes().iter().all(|node| !node.is_temporary()));
    assert!(graph.edges().iter().all(|edge| !edge.is_split()));
}

#[test]
fn barycenter_untangles_swapped_targets() {
    let definition = GraphDefinition::new()
        .node(NodeDefinition::new("a1").with_outputs(["out"]))
        .node(NodeDefinition::new("a2").with_outputs(["out"]))
        .node(NodeDefinition::new("b1").with_inputs(["in"]))
        .node(NodeDefinition::new("b2").with_inputs(["in"]))
        .edge(("a1", "out"), ("b2", "in"))
        .edge(("a2", "out"), ("b1", "in"));

    for enable_crossing_minimization in [true, false] {
        let mut graph = Graph::from_definition(&definition, GraphStyle::default()).unwrap();
        let engine = SugiyamaLayout {
            enable_crossing_minimization,
            ..Default::default()
        };
        let report = engine.layout(&mut graph).unwrap();

        assert_eq!(report.crossings, 0);
        let b1 = graph.node_by_id("b1").unwrap();
        let b2 = graph.node_by_id("b2").unwrap();
        assert!(b2.x() < b1.x());
        assert_eq!((b2.order(), b1.order()), (0, 1));
    }
}

#[test]
fn dummy_nodes_are_optional_in_the_result() {
    let mut kept = Graph::from_definition(&mixed(), GraphStyle::default()).unwrap();
    let engine = SugiyamaLayout {
        retain_dummy_nodes: true,
        ..Default::default()
    };
    let report = engine.layout(&mut kept).unwrap();
    assert!(report.dummy_nodes > 0);
    assert_eq!(kept.nodes().len(), 4 + report.dummy_nodes);
    assert!(kept.nodes()[4..].iter().all(|node| node.is_temporary() && !node.is_visible()));

    let dropped = laid_out(&mixed());
    assert_eq!(dropped.nodes().len(), 4);
    assert_eq!(dropped.edges().len(), 6);
}

#[test]
fn self_loop_goes_around_its_node() {
    let graph = laid_out(
        &GraphDefinition::new()
            .node(relay("a"))
            .edge(("a", "out"), ("a", "in")),
    );

    let node = graph.node_by_id("a").unwrap();
    assert_eq!(node.layer(), 0);

    let edge = &graph.edges()[0];
    let commands = edge.path().commands();
    assert_eq!(commands.len(), 3);
    let (from, to) = graph.endpoints(EdgeIndex(0)).unwrap();
    assert_eq!(from.direction, PortDirection::Output);
    assert_eq!(commands[0], PathCommand::MoveTo(graph.port_anchor(from)));
    match commands[1] {
        PathCommand::CurveTo(_, _, middle) => {
            assert!(middle.x < graph.port_anchor(from).x);
            assert!(middle.y < graph.port_anchor(from).y);
            assert!(middle.y > graph.port_anchor(to).y);
        }
        other => panic!("unexpected command {other:?}"),
    }
}
