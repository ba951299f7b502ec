//! Global random ensemble generation.
//!
//! Random diagrams seed the ensemble with structure the local variation
//! walk would take many steps to reach. Edges follow an Erdős–Rényi
//! process; labels are biased 60/40 toward Z-spiders with phases on the
//! k/8 dyadic grid.

use zx_core::{ErrorInfo, NodeLabel, Phase, RngHandle, Spider, ZxDiagram, ZxError};

const PHASE_GRID: u64 = 8;
const Z_BIAS: f64 = 0.6;

/// Generates a random diagram with `num_nodes` nodes and independent edge
/// probability `edge_probability`.
pub fn random_diagram(
    num_nodes: usize,
    edge_probability: f64,
    rng: &mut RngHandle,
) -> Result<ZxDiagram, ZxError> {
    if !(0.0..=1.0).contains(&edge_probability) {
        return Err(ZxError::Ensemble(
            ErrorInfo::new("bad-edge-probability", "edge probability must lie in [0, 1]")
                .with_context("edge_probability", edge_probability),
        ));
    }
    let mut diagram = ZxDiagram::new();
    for _ in 0..num_nodes {
        let spider = if rng.uniform() < Z_BIAS {
            Spider::Z
        } else {
            Spider::X
        };
        let phase = Phase::new(rng.below(PHASE_GRID as usize) as i64, PHASE_GRID)?;
        diagram.add_node(NodeLabel::new(spider, phase));
    }
    let nodes: Vec<_> = diagram.nodes().to_vec();
    for (i, u) in nodes.iter().copied().enumerate() {
        for v in nodes.iter().skip(i + 1).copied() {
            if rng.uniform() < edge_probability {
                diagram.add_edge(u, v)?;
            }
        }
    }
    Ok(diagram)
}

/// Generates a diverse ensemble mixing small (20%), medium (60%), and large
/// (20%) diagrams between `min_nodes` and `max_nodes`.
pub fn diverse_ensemble(
    size: usize,
    min_nodes: usize,
    max_nodes: usize,
    rng: &mut RngHandle,
) -> Result<Vec<ZxDiagram>, ZxError> {
    let min_nodes = min_nodes.max(1);
    let max_nodes = max_nodes.max(min_nodes);
    let bands = [
        (min_nodes, 3.max(min_nodes), size / 5),
        (4.min(max_nodes), 7.min(max_nodes), size * 3 / 5),
        (8.min(max_nodes), max_nodes, size / 5),
    ];
    let mut ensemble = Vec::with_capacity(size);
    for (low, high, count) in bands {
        let (low, high) = (low.min(high), high.max(low));
        for _ in 0..count {
            if ensemble.len() >= size {
                break;
            }
            let num_nodes = low + rng.below(high - low + 1);
            let edge_probability = 0.3 + 0.2 * rng.uniform();
            ensemble.push(random_diagram(num_nodes, edge_probability, rng)?);
        }
    }
    // Fill the rounding remainder with medium diagrams.
    while ensemble.len() < size {
        let num_nodes = (4 + rng.below(4)).clamp(min_nodes, max_nodes);
        ensemble.push(random_diagram(num_nodes, 0.4, rng)?);
    }
    Ok(ensemble)
}

/// Generates an ensemble with node counts drawn from a normal distribution
/// centered on `target_nodes` with standard deviation `spread`, clamped to
/// `[1, 15]`.
pub fn biased_ensemble(
    size: usize,
    target_nodes: usize,
    spread: f64,
    rng: &mut RngHandle,
) -> Result<Vec<ZxDiagram>, ZxError> {
    let mut ensemble = Vec::with_capacity(size);
    for _ in 0..size {
        let draw = target_nodes as f64 + spread * standard_normal(rng);
        let num_nodes = draw.round().clamp(1.0, 15.0) as usize;
        let edge_probability = 0.3 + 0.1 * rng.uniform();
        ensemble.push(random_diagram(num_nodes, edge_probability, rng)?);
    }
    Ok(ensemble)
}

/// Box-Muller standard normal sample.
fn standard_normal(rng: &mut RngHandle) -> f64 {
    let u1 = rng.uniform().max(1e-12);
    let u2 = rng.uniform();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
