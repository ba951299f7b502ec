use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use zx_core::{canonical_hash, ZxDiagram};
use zx_evolve::{EngineConfig, EvolutionEngine, MassTransfer, SeedPolicy};

fn total(rho: &[f64]) -> f64 {
    rho.iter().sum()
}

#[test]
fn rho_stays_on_simplex_under_large_dt() {
    let mut engine = EvolutionEngine::default();
    for dt in [0.01, 1.0, 50.0, 1000.0] {
        let result = engine.step(dt).unwrap();
        assert!((total(engine.rho()) - 1.0).abs() < 1e-6, "dt={dt}");
        assert!(engine.rho().iter().all(|r| *r >= 0.0), "dt={dt}");
        assert!((0.0..=1.0).contains(&result.mode_probability));
        assert!(result.free_energy.is_finite());
    }
}

#[test]
fn uniform_transfer_also_keeps_simplex() {
    let config = EngineConfig {
        mass_transfer: MassTransfer::Uniform,
        ..EngineConfig::default()
    };
    let mut engine = EvolutionEngine::new(config);
    for _ in 0..20 {
        engine.step(0.05).unwrap();
        assert!((total(engine.rho()) - 1.0).abs() < 1e-6);
        assert!(engine.rho().iter().all(|r| *r >= 0.0));
    }
}

// A zero-dt step skips the gradient update, so the resulting rho is exactly
// the mass the transfer policy produced for the regenerated ensemble.
#[test]
fn carried_mass_stays_with_the_surviving_seed() {
    let seed_hash = canonical_hash(&ZxDiagram::seed());
    let mut engine = EvolutionEngine::default();
    let result = engine.step(0.0).unwrap();
    assert!(result.ensemble_size > 1);

    let mut surviving = 0.0;
    let mut fresh = Vec::new();
    for (diagram, mass) in engine.ensemble().iter().zip(engine.rho()) {
        if canonical_hash(diagram) == seed_hash {
            surviving += mass;
        } else {
            fresh.push(*mass);
        }
    }
    // The seed had all the mass before the step and keeps it; the fresh
    // variations receive only the floor.
    assert!(!fresh.is_empty());
    assert!(surviving > 0.999, "surviving mass was {surviving}");
    for mass in fresh {
        assert!(mass < 1e-6, "fresh mass was {mass}");
    }
}

#[test]
fn carry_over_preserves_per_hash_mass_and_splits_leftover() {
    let config = EngineConfig {
        ensemble_size: 12,
        seed_policy: SeedPolicy {
            master_seed: 424242,
            label: None,
        },
        ..EngineConfig::default()
    };
    let mut engine = EvolutionEngine::new(config);
    for _ in 0..3 {
        engine.step(0.2).unwrap();
    }
    let previous: BTreeMap<String, f64> = engine.ensemble().iter().zip(engine.rho()).fold(
        BTreeMap::new(),
        |mut map, (diagram, mass)| {
            *map.entry(canonical_hash(diagram)).or_insert(0.0) += mass;
            map
        },
    );

    engine.step(0.0).unwrap();
    let hashes: Vec<String> = engine.ensemble().iter().map(canonical_hash).collect();
    let survived: BTreeSet<&String> = hashes.iter().filter(|h| previous.contains_key(*h)).collect();
    // The unchanged mode always survives regeneration.
    assert!(!survived.is_empty());

    // Each surviving hash keeps exactly its prior mass, however many
    // duplicates now carry it.
    for hash in &survived {
        let carried: f64 = hashes
            .iter()
            .zip(engine.rho())
            .filter(|(h, _)| *h == *hash)
            .map(|(_, mass)| mass)
            .sum();
        assert!(
            (carried - previous[hash.as_str()]).abs() < 1e-8,
            "hash kept {carried}, had {}",
            previous[hash.as_str()]
        );
    }

    // Fresh diagrams share the leftover uniformly.
    let survived_mass: f64 = survived.iter().map(|h| previous[h.as_str()]).sum();
    let fresh: Vec<f64> = hashes
        .iter()
        .zip(engine.rho())
        .filter(|(h, _)| !previous.contains_key(*h))
        .map(|(_, mass)| *mass)
        .collect();
    if !fresh.is_empty() {
        let share = (1.0 - survived_mass).max(0.0) / fresh.len() as f64;
        for mass in fresh {
            assert!((mass - share).abs() < 1e-8, "fresh got {mass}, expected {share}");
        }
    }
}

#[test]
fn stepping_is_deterministic_per_seed() {
    let config = EngineConfig {
        seed_policy: SeedPolicy {
            master_seed: 7777,
            label: None,
        },
        ..EngineConfig::default()
    };
    let mut a = EvolutionEngine::new(config.clone());
    let mut b = EvolutionEngine::new(config);
    for _ in 0..10 {
        let ra = a.step(0.01).unwrap();
        let rb = b.step(0.01).unwrap();
        assert_eq!(ra, rb);
    }
    assert_eq!(a.free_energy_history(), b.free_energy_history());
}

#[test]
fn histories_grow_one_entry_per_step() {
    let mut engine = EvolutionEngine::default();
    for expected in 1..=5 {
        engine.step(0.01).unwrap();
        assert_eq!(engine.free_energy_history().len(), expected);
        assert_eq!(engine.mode_probability_history().len(), expected);
        assert_eq!(engine.mode_coherence_history().len(), expected);
        assert_eq!(engine.steps_taken() as usize, expected);
    }
}

#[test]
fn diffusion_term_preserves_simplex() {
    let config = EngineConfig {
        diffusion_nu: 0.5,
        ..EngineConfig::default()
    };
    let mut engine = EvolutionEngine::new(config);
    for _ in 0..15 {
        engine.step(0.05).unwrap();
        assert!((total(engine.rho()) - 1.0).abs() < 1e-6);
        assert!(engine.rho().iter().all(|r| *r >= 0.0));
    }
}

proptest! {
    #[test]
    fn arbitrary_seeds_and_dts_never_break_rho(seed in any::<u64>(), dt in 1e-4f64..10.0) {
        let config = EngineConfig {
            ensemble_size: 8,
            seed_policy: SeedPolicy { master_seed: seed, label: None },
            ..EngineConfig::default()
        };
        let mut engine = EvolutionEngine::new(config);
        for _ in 0..5 {
            let result = engine.step(dt).unwrap();
            prop_assert!((total(engine.rho()) - 1.0).abs() < 1e-6);
            prop_assert!(engine.rho().iter().all(|r| *r >= 0.0));
            prop_assert!((0.0..=1.0).contains(&result.mode_probability));
            result.mode.validate().unwrap();
        }
    }
}
