use zx_core::{NodeLabel, Phase, Spider, ZxDiagram};

fn two_node_chain() -> ZxDiagram {
    let mut diagram = ZxDiagram::seed();
    let root = diagram.nodes()[0];
    let leaf = diagram.add_node(NodeLabel::new(Spider::X, Phase::new(1, 4).unwrap()));
    diagram.add_edge(root, leaf).unwrap();
    diagram
}

#[test]
fn seed_is_deterministic() {
    assert_eq!(ZxDiagram::seed(), ZxDiagram::seed());
}

#[test]
fn seed_is_single_zero_z_spider() {
    let seed = ZxDiagram::seed();
    seed.validate().unwrap();
    assert_eq!(seed.node_count(), 1);
    assert_eq!(seed.edge_count(), 0);
    let label = seed.label(seed.nodes()[0]).unwrap();
    assert_eq!(label.spider, Spider::Z);
    assert_eq!(label.phase, Phase::zero());
}

#[test]
fn empty_diagram_is_valid() {
    ZxDiagram::new().validate().unwrap();
}

#[test]
fn self_loops_are_rejected() {
    let mut diagram = ZxDiagram::seed();
    let node = diagram.nodes()[0];
    let err = diagram.add_edge(node, node).unwrap_err();
    assert_eq!(err.info().code, "self-loop");
}

#[test]
fn edges_to_unknown_nodes_are_rejected() {
    let mut diagram = ZxDiagram::seed();
    let node = diagram.nodes()[0];
    let err = diagram
        .add_edge(node, zx_core::NodeId::from_raw(99))
        .unwrap_err();
    assert_eq!(err.info().code, "unknown-node");
}

#[test]
fn removing_a_node_drops_incident_edges() {
    let mut diagram = two_node_chain();
    let leaf = diagram.nodes()[1];
    diagram.remove_node(leaf).unwrap();
    diagram.validate().unwrap();
    assert_eq!(diagram.node_count(), 1);
    assert_eq!(diagram.edge_count(), 0);
}

#[test]
fn equality_ignores_edge_orientation_and_order() {
    let mut left = ZxDiagram::new();
    let mut right = ZxDiagram::new();
    let label = NodeLabel::new(Spider::Z, Phase::zero());
    for diagram in [&mut left, &mut right] {
        diagram.add_node(label);
        diagram.add_node(label);
        diagram.add_node(label);
    }
    let (a, b, c) = (left.nodes()[0], left.nodes()[1], left.nodes()[2]);
    left.add_edge(a, b).unwrap();
    left.add_edge(b, c).unwrap();
    right.add_edge(c, b).unwrap();
    right.add_edge(b, a).unwrap();
    assert_eq!(left, right);
}

#[test]
fn differing_labels_break_equality() {
    let mut flipped = ZxDiagram::seed();
    let node = flipped.nodes()[0];
    flipped
        .set_label(node, NodeLabel::new(Spider::X, Phase::zero()))
        .unwrap();
    assert_ne!(ZxDiagram::seed(), flipped);
}

#[test]
fn degree_and_density_track_edges() {
    let diagram = two_node_chain();
    assert_eq!(diagram.degree(diagram.nodes()[0]), 1);
    assert_eq!(diagram.max_edges(), 1);
    assert!((diagram.density() - 1.0).abs() < 1e-12);
}
