//! Ensemble diversity summary.

use serde::{Deserialize, Serialize};
use zx_core::ZxDiagram;

/// Summary statistics describing the spread of an ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleDiversity {
    /// Mean node count.
    pub size_mean: f64,
    /// Standard deviation of node counts.
    pub size_std: f64,
    /// Smallest node count.
    pub size_min: usize,
    /// Largest node count.
    pub size_max: usize,
    /// Mean edge count.
    pub edge_mean: f64,
    /// Standard deviation of edge counts.
    pub edge_std: f64,
    /// Fraction of Z-spiders among all labels.
    pub z_fraction: f64,
    /// Mean phase in radians across all labels.
    pub phase_mean: f64,
    /// Standard deviation of phases.
    pub phase_std: f64,
    /// Mean edge density.
    pub density_mean: f64,
    /// Standard deviation of edge densities.
    pub density_std: f64,
}

/// Computes the diversity summary for an ensemble.
///
/// Returns all-zero statistics for an empty ensemble.
pub fn estimate_diversity(ensemble: &[ZxDiagram]) -> EnsembleDiversity {
    let sizes: Vec<f64> = ensemble.iter().map(|d| d.node_count() as f64).collect();
    let edges: Vec<f64> = ensemble.iter().map(|d| d.edge_count() as f64).collect();
    let densities: Vec<f64> = ensemble.iter().map(|d| d.density()).collect();
    let phases: Vec<f64> = ensemble
        .iter()
        .flat_map(|d| d.labels().values().map(|label| label.phase.radians()))
        .collect();

    let z_total: usize = ensemble.iter().map(|d| d.z_count()).sum();
    let label_total: usize = ensemble.iter().map(|d| d.node_count()).sum();
    let z_fraction = if label_total == 0 {
        0.0
    } else {
        z_total as f64 / label_total as f64
    };

    let (size_mean, size_std) = mean_std(&sizes);
    let (edge_mean, edge_std) = mean_std(&edges);
    let (phase_mean, phase_std) = mean_std(&phases);
    let (density_mean, density_std) = mean_std(&densities);

    EnsembleDiversity {
        size_mean,
        size_std,
        size_min: ensemble.iter().map(|d| d.node_count()).min().unwrap_or(0),
        size_max: ensemble.iter().map(|d| d.node_count()).max().unwrap_or(0),
        edge_mean,
        edge_std,
        z_fraction,
        phase_mean,
        phase_std,
        density_mean,
        density_std,
    }
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}
