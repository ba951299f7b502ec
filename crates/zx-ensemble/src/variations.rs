//! Local variation generation.
//!
//! Variations approximate the neighborhood of a diagram with single local
//! edits: grow a leaf, contract a low-degree node, toggle an edge, flip a
//! spider, nudge a phase. The configuration is validated once up front;
//! individual operations whose preconditions fail (size ceiling, full
//! density) are then skipped, never reported as errors, and every emitted
//! diagram satisfies the validation contract.

use serde::{Deserialize, Serialize};
use zx_core::{ErrorInfo, NodeLabel, Phase, RngHandle, Spider, ZxDiagram, ZxError};

/// Knobs for the local variation generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationConfig {
    /// Hard cap on the number of emitted diagrams (the source included).
    #[serde(default = "default_max_variations")]
    pub max_variations: usize,
    /// Node-count ceiling; size-increasing edits are skipped beyond it.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Exploration factor: above 1.0 enables multi-node chains and raises
    /// the size ceiling, above 0.8 enables compound multi-edit moves.
    #[serde(default = "default_exploration")]
    pub exploration_factor: f64,
    /// Dyadic denominator of randomly drawn phases.
    #[serde(default = "default_phase_grid")]
    pub phase_grid: u64,
}

fn default_max_variations() -> usize {
    20
}

fn default_max_nodes() -> usize {
    15
}

fn default_exploration() -> f64 {
    1.0
}

fn default_phase_grid() -> u64 {
    8
}

impl Default for VariationConfig {
    fn default() -> Self {
        Self {
            max_variations: default_max_variations(),
            max_nodes: default_max_nodes(),
            exploration_factor: default_exploration(),
            phase_grid: default_phase_grid(),
        }
    }
}

/// Generates local variations of `source`, always including an unchanged
/// copy first. Duplicates by value are permitted; callers that care about
/// distinctness deduplicate themselves.
///
/// Fails with `bad-phase-grid` when `config.phase_grid` is not a power of
/// two, since drawn phases must land on the dyadic grid.
pub fn generate_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    rng: &mut RngHandle,
) -> Result<Vec<ZxDiagram>, ZxError> {
    if !config.phase_grid.is_power_of_two() {
        return Err(ZxError::Ensemble(
            ErrorInfo::new("bad-phase-grid", "phase grid must be a power of two")
                .with_context("phase_grid", config.phase_grid),
        ));
    }
    let mut variations = vec![source.clone()];
    let max_nodes = (config.max_nodes as f64 * config.exploration_factor) as usize;

    add_leaf_variations(source, config, max_nodes, rng, &mut variations);
    if config.exploration_factor > 1.0 {
        add_chain_variations(source, config, max_nodes, rng, &mut variations);
    }
    contract_variations(source, config, &mut variations);
    add_edge_variations(source, config, &mut variations);
    remove_edge_variations(source, config, &mut variations);
    flip_variations(source, config, &mut variations);
    phase_variations(source, config, rng, &mut variations);
    if config.exploration_factor > 0.8 {
        compound_variations(source, config, max_nodes, rng, &mut variations);
    }

    variations.truncate(config.max_variations.max(1));
    Ok(variations)
}

fn random_label(rng: &mut RngHandle, z_bias: f64, grid: u64) -> NodeLabel {
    let spider = if rng.uniform() < z_bias {
        Spider::Z
    } else {
        Spider::X
    };
    // The grid is validated in generate_variations before any label is drawn.
    let numer = rng.below(grid as usize) as i64;
    let phase = Phase::new(numer, grid).unwrap_or(Phase::zero());
    NodeLabel::new(spider, phase)
}

fn add_leaf_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    max_nodes: usize,
    rng: &mut RngHandle,
    variations: &mut Vec<ZxDiagram>,
) {
    if source.node_count() >= max_nodes {
        return;
    }
    for anchor in source.nodes().iter().take(5).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        let mut var = source.clone();
        let leaf = var.add_node(random_label(rng, 0.7, config.phase_grid));
        if var.add_edge(anchor, leaf).is_ok() {
            variations.push(var);
        }
    }
}

fn add_chain_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    max_nodes: usize,
    rng: &mut RngHandle,
    variations: &mut Vec<ZxDiagram>,
) {
    if source.node_count() + 2 >= max_nodes {
        return;
    }
    for anchor in source.nodes().iter().take(3).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        let mut var = source.clone();
        let mut prev = anchor;
        let budget = 3.min(max_nodes.saturating_sub(var.node_count()));
        for _ in 0..budget {
            let next = var.add_node(random_label(rng, 0.5, config.phase_grid));
            if var.add_edge(prev, next).is_err() {
                break;
            }
            prev = next;
        }
        variations.push(var);
    }
}

fn contract_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    variations: &mut Vec<ZxDiagram>,
) {
    if source.node_count() <= 1 {
        return;
    }
    for node in source.nodes().iter().take(3).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        if source.degree(node) > 1 {
            continue;
        }
        let mut var = source.clone();
        if var.remove_node(node).is_ok() {
            variations.push(var);
        }
    }
}

fn add_edge_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    variations: &mut Vec<ZxDiagram>,
) {
    // Only densify sparse diagrams.
    if source.density() >= 0.5 {
        return;
    }
    let nodes = source.nodes();
    for (i, u) in nodes.iter().take(4).copied().enumerate() {
        if variations.len() >= config.max_variations {
            return;
        }
        for v in nodes.iter().skip(i + 1).take(3).copied() {
            if source.has_edge(u, v) {
                continue;
            }
            let mut var = source.clone();
            if var.add_edge(u, v).is_ok() {
                variations.push(var);
            }
            break;
        }
    }
}

fn remove_edge_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    variations: &mut Vec<ZxDiagram>,
) {
    for (u, v) in source.edges().iter().take(3).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        let mut var = source.clone();
        if var.remove_edge(u, v).is_ok() {
            variations.push(var);
        }
    }
}

fn flip_variations(source: &ZxDiagram, config: &VariationConfig, variations: &mut Vec<ZxDiagram>) {
    for node in source.nodes().iter().take(5).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        let Some(label) = source.label(node).copied() else {
            continue;
        };
        let mut var = source.clone();
        let flipped = NodeLabel::new(label.spider.flipped(), label.phase);
        if var.set_label(node, flipped).is_ok() {
            variations.push(var);
        }
    }
}

fn phase_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    rng: &mut RngHandle,
    variations: &mut Vec<ZxDiagram>,
) {
    for node in source.nodes().iter().take(5).copied() {
        if variations.len() >= config.max_variations {
            return;
        }
        let Some(label) = source.label(node).copied() else {
            continue;
        };
        // Bounded increment: ±1 or ±2 grid steps, never zero.
        let delta = match rng.below(4) {
            0 => -2,
            1 => -1,
            2 => 1,
            _ => 2,
        };
        let Ok(step) = Phase::new(delta, config.phase_grid) else {
            continue;
        };
        let mut var = source.clone();
        let nudged = NodeLabel::new(label.spider, label.phase.add(&step));
        if var.set_label(node, nudged).is_ok() {
            variations.push(var);
        }
    }
}

fn compound_variations(
    source: &ZxDiagram,
    config: &VariationConfig,
    max_nodes: usize,
    rng: &mut RngHandle,
    variations: &mut Vec<ZxDiagram>,
) {
    let simultaneous = (2.0 * config.exploration_factor).max(1.0) as usize;
    let count = 5.min(config.max_variations / 10).max(1);
    for _ in 0..count {
        if variations.len() >= config.max_variations {
            return;
        }
        let mut var = source.clone();
        for _ in 0..simultaneous {
            match rng.below(3) {
                0 if var.node_count() < max_nodes && !var.is_empty() => {
                    let anchor = var.nodes()[rng.below(var.node_count())];
                    let leaf = var.add_node(random_label(rng, 0.5, config.phase_grid));
                    let _ = var.add_edge(anchor, leaf);
                }
                1 if !var.is_empty() => {
                    let node = var.nodes()[rng.below(var.node_count())];
                    if let Some(label) = var.label(node).copied() {
                        let _ = var.set_label(node, NodeLabel::new(label.spider.flipped(), label.phase));
                    }
                }
                2 if !var.is_empty() => {
                    let node = var.nodes()[rng.below(var.node_count())];
                    if let Some(label) = var.label(node).copied() {
                        let delta = rng.below(7) as i64 - 3;
                        if let Ok(step) = Phase::new(delta, config.phase_grid) {
                            let _ = var.set_label(
                                node,
                                NodeLabel::new(label.spider, label.phase.add(&step)),
                            );
                        }
                    }
                }
                _ => {}
            }
        }
        variations.push(var);
    }
}
