use zx_core::{RngHandle, ZxDiagram};
use zx_ensemble::{generate_variations, random_diagram, VariationConfig};

#[test]
fn cap_is_respected_and_original_included() {
    let mut rng = RngHandle::from_seed(11);
    let seed = ZxDiagram::seed();
    for cap in [1usize, 2, 5, 20] {
        let config = VariationConfig {
            max_variations: cap,
            ..VariationConfig::default()
        };
        let variations = generate_variations(&seed, &config, &mut rng).unwrap();
        assert!(variations.len() <= cap);
        assert!(!variations.is_empty());
        assert_eq!(variations[0], seed);
    }
}

#[test]
fn all_variations_validate() {
    let mut rng = RngHandle::from_seed(3);
    let source = random_diagram(8, 0.4, &mut rng).unwrap();
    let config = VariationConfig {
        max_variations: 30,
        exploration_factor: 1.5,
        ..VariationConfig::default()
    };
    for round in 0..10 {
        let variations = generate_variations(&source, &config, &mut rng).unwrap();
        for (idx, variation) in variations.iter().enumerate() {
            variation
                .validate()
                .unwrap_or_else(|err| panic!("round {round} variation {idx}: {err}"));
        }
    }
}

#[test]
fn size_ceiling_skips_growth() {
    let mut rng = RngHandle::from_seed(17);
    let big = random_diagram(20, 0.2, &mut rng).unwrap();
    let config = VariationConfig {
        max_variations: 40,
        max_nodes: 20,
        exploration_factor: 1.0,
        ..VariationConfig::default()
    };
    let variations = generate_variations(&big, &config, &mut rng).unwrap();
    for variation in &variations {
        assert!(variation.node_count() <= 20);
    }
}

#[test]
fn seed_neighborhood_contains_growth() {
    let mut rng = RngHandle::from_seed(29);
    let variations =
        generate_variations(&ZxDiagram::seed(), &VariationConfig::default(), &mut rng).unwrap();
    assert!(variations.iter().any(|v| v.node_count() > 1));
}

#[test]
fn non_dyadic_phase_grid_is_rejected() {
    let mut rng = RngHandle::from_seed(7);
    for grid in [0u64, 3, 6, 12] {
        let config = VariationConfig {
            phase_grid: grid,
            ..VariationConfig::default()
        };
        let err = generate_variations(&ZxDiagram::seed(), &config, &mut rng).unwrap_err();
        assert_eq!(err.info().code, "bad-phase-grid", "grid={grid}");
    }
}

#[test]
fn drawn_phases_land_on_the_configured_grid() {
    let mut rng = RngHandle::from_seed(23);
    let config = VariationConfig {
        max_variations: 40,
        ..VariationConfig::default()
    };
    let variations = generate_variations(&ZxDiagram::seed(), &config, &mut rng).unwrap();
    let mut nonzero = 0;
    for variation in &variations {
        for node in variation.nodes().iter().copied() {
            let phase = variation.label(node).unwrap().phase;
            assert_eq!(8 % phase.denom(), 0);
            if phase.numer() != 0 {
                nonzero += 1;
            }
        }
    }
    // Phase nudges never apply a zero delta, so variation must be visible.
    assert!(nonzero > 0);
}
