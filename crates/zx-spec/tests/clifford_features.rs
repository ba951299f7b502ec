use proptest::prelude::*;
use zx_core::{NodeLabel, Phase, RngHandle, Spider, ZxDiagram};
use zx_ensemble::random_diagram;
use zx_spec::{grade_decomposition, zx_to_clifford, CLIFFORD_DIM};

proptest! {
    #[test]
    fn random_diagrams_map_to_unit_vectors(seed in any::<u64>(), nodes in 1usize..12) {
        let mut rng = RngHandle::from_seed(seed);
        let diagram = random_diagram(nodes, 0.4, &mut rng).unwrap();
        let components = zx_to_clifford(&diagram);
        let norm: f64 = components.iter().map(|c| c * c).sum::<f64>().sqrt();
        prop_assert!((norm - 1.0).abs() < 1e-9);
    }
}

#[test]
fn empty_diagram_is_the_zero_vector() {
    assert_eq!(zx_to_clifford(&ZxDiagram::new()), [0.0; CLIFFORD_DIM]);
    let decomposition = grade_decomposition(&zx_to_clifford(&ZxDiagram::new()));
    assert_eq!(decomposition.total_magnitude, 0.0);
}

#[test]
fn spider_kind_moves_content_between_planes() {
    let mut z_only = ZxDiagram::new();
    z_only.add_node(NodeLabel::new(Spider::Z, Phase::new(1, 4).unwrap()));
    let mut x_only = ZxDiagram::new();
    x_only.add_node(NodeLabel::new(Spider::X, Phase::new(1, 4).unwrap()));

    let z_components = zx_to_clifford(&z_only);
    let x_components = zx_to_clifford(&x_only);
    assert!(z_components[0].abs() > 0.0);
    assert_eq!(z_components[8], 0.0);
    assert!(x_components[8].abs() > 0.0);
    assert_eq!(x_components[0], 0.0);
}

#[test]
fn grade_magnitudes_compose_to_the_total() {
    let mut rng = RngHandle::from_seed(99);
    let diagram = random_diagram(8, 0.5, &mut rng).unwrap();
    let components = zx_to_clifford(&diagram);
    let decomposition = grade_decomposition(&components);
    let reassembled = (decomposition.scalar * decomposition.scalar
        + decomposition.vector_magnitude * decomposition.vector_magnitude
        + decomposition.bivector_magnitude * decomposition.bivector_magnitude
        + decomposition.trivector_magnitude * decomposition.trivector_magnitude
        + decomposition.pseudoscalar * decomposition.pseudoscalar)
        .sqrt();
    assert!((reassembled - decomposition.total_magnitude).abs() < 1e-9);
    assert!((decomposition.total_magnitude - 1.0).abs() < 1e-9);
}

#[test]
fn mapping_ignores_edge_insertion_order() {
    let mut forward = ZxDiagram::new();
    let a = forward.add_node(NodeLabel::new(Spider::Z, Phase::zero()));
    let b = forward.add_node(NodeLabel::new(Spider::X, Phase::new(1, 2).unwrap()));
    let c = forward.add_node(NodeLabel::new(Spider::Z, Phase::new(1, 4).unwrap()));
    forward.add_edge(a, b).unwrap();
    forward.add_edge(b, c).unwrap();

    let mut reversed = ZxDiagram::new();
    let a2 = reversed.add_node(NodeLabel::new(Spider::Z, Phase::zero()));
    let b2 = reversed.add_node(NodeLabel::new(Spider::X, Phase::new(1, 2).unwrap()));
    let c2 = reversed.add_node(NodeLabel::new(Spider::Z, Phase::new(1, 4).unwrap()));
    reversed.add_edge(b2, c2).unwrap();
    reversed.add_edge(a2, b2).unwrap();

    let lhs = zx_to_clifford(&forward);
    let rhs = zx_to_clifford(&reversed);
    for (l, r) in lhs.iter().zip(rhs.iter()) {
        assert!((l - r).abs() < 1e-12);
    }
}
