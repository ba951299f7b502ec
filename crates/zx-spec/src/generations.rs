//! φ-eigenvalue identification and three-generation analysis.
//!
//! The coherence operator is conjectured to satisfy `C³ = 2C + I`, whose
//! eigenvalue equation `λ³ = 2λ + 1` has roots `φ, φω, φω²` with
//! `ω = exp(2πi/3)`. Matching is against real parts only; this is a
//! heuristic diagnostic, never an engine input.

use serde::{Deserialize, Serialize};
use zx_core::PHI;

/// Default relative tolerance when matching eigenvalues against φ targets.
pub const PHI_MATCH_TOLERANCE: f64 = 0.1;

const EPS: f64 = 1e-10;

/// Indices of eigenvalues within `tolerance` (relative) of a power of φ
/// (`φ^k`, `k ∈ [-2, 3]`) or a small multiple (`n·φ`, `n ∈ [1, 5]`;
/// `n/φ`, `n ∈ [1, 3]`).
pub fn identify_phi_eigenvalues(eigenvalues: &[f64], tolerance: f64) -> Vec<usize> {
    let mut targets: Vec<f64> = (-2..=3).map(|k| PHI.powi(k)).collect();
    targets.extend((1..=5).map(|n| n as f64 * PHI));
    targets.extend((1..=3).map(|n| n as f64 / PHI));

    eigenvalues
        .iter()
        .enumerate()
        .filter(|(_, &lambda)| {
            targets
                .iter()
                .any(|target| (lambda - target).abs() / (target + EPS) < tolerance)
        })
        .map(|(i, _)| i)
        .collect()
}

/// One matched generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMatch {
    /// Generation number, 1 through 3.
    pub generation: usize,
    /// Real part of the corresponding cubic root.
    pub expected_eigenvalue: f64,
    /// Closest observed eigenvalue.
    pub actual_eigenvalue: f64,
    /// Index of that eigenvalue in the spectrum.
    pub eigenvalue_index: usize,
    /// Absolute matching error.
    pub error: f64,
    /// Error relative to the expected magnitude.
    pub relative_error: f64,
}

/// Cubic-equation residual for one eigenvalue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubicCheck {
    /// The eigenvalue under test.
    pub eigenvalue: f64,
    /// `|λ³ - 2λ - 1|`.
    pub cubic_residual: f64,
    /// Whether the residual is below `0.1`.
    pub satisfies_cubic: bool,
}

/// Three-generation matching summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStructure {
    /// Best match per generation.
    pub generations: Vec<GenerationMatch>,
    /// Whether the three matches landed on three distinct eigenvalues.
    pub has_three_generations: bool,
    /// Count of φ-related eigenvalues in the spectrum.
    pub num_phi_eigenvalues: usize,
    /// Cubic residuals for the top five eigenvalues.
    pub cubic_checks: Vec<CubicCheck>,
}

/// Matches the spectrum against the real parts of the three roots of
/// `λ³ = 2λ + 1`, which are `φ` and (twice) `-φ/2`.
pub fn identify_generations(eigenvalues: &[f64], phi_indices: &[usize]) -> GenerationStructure {
    let expected_real: Vec<f64> = (0..3)
        .map(|g| PHI * (2.0 * std::f64::consts::PI * g as f64 / 3.0).cos())
        .collect();

    let mut generations = Vec::new();
    for (g, &expected) in expected_real.iter().enumerate() {
        if eigenvalues.is_empty() {
            continue;
        }
        let (best_idx, best_error) = eigenvalues
            .iter()
            .map(|lambda| (lambda - expected).abs())
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .unwrap_or((0, f64::INFINITY));
        generations.push(GenerationMatch {
            generation: g + 1,
            expected_eigenvalue: expected,
            actual_eigenvalue: eigenvalues[best_idx],
            eigenvalue_index: best_idx,
            error: best_error,
            relative_error: best_error / (expected.abs() + EPS),
        });
    }

    let distinct: std::collections::BTreeSet<usize> =
        generations.iter().map(|g| g.eigenvalue_index).collect();
    let cubic_checks = eigenvalues
        .iter()
        .take(5)
        .map(|&lambda| {
            let residual = (lambda * lambda * lambda - 2.0 * lambda - 1.0).abs();
            CubicCheck {
                eigenvalue: lambda,
                cubic_residual: residual,
                satisfies_cubic: residual < 0.1,
            }
        })
        .collect();

    GenerationStructure {
        has_three_generations: distinct.len() >= 3,
        num_phi_eigenvalues: phi_indices.len(),
        generations,
        cubic_checks,
    }
}

/// Spectral-gap summary of a descending spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralGapReport {
    /// Largest eigenvalue.
    pub lambda_max: f64,
    /// Second-largest eigenvalue.
    pub lambda_2: f64,
    /// `λ_max - λ_2`.
    pub spectral_gap: f64,
    /// Exponential convergence rate, equal to the gap.
    pub convergence_rate: f64,
    /// Convergence timescale `1/γ`, infinite when the gap closes.
    pub timescale: f64,
    /// Gap relative to `λ_max`.
    pub relative_gap: f64,
}

/// Computes the spectral gap `γ = λ_max - λ_2` and the implied `e^{-γt}`
/// convergence timescale.
pub fn spectral_gap(eigenvalues: &[f64]) -> SpectralGapReport {
    if eigenvalues.len() < 2 {
        return SpectralGapReport {
            lambda_max: eigenvalues.first().copied().unwrap_or(0.0),
            lambda_2: 0.0,
            spectral_gap: 0.0,
            convergence_rate: 0.0,
            timescale: f64::INFINITY,
            relative_gap: 0.0,
        };
    }
    let lambda_max = eigenvalues[0];
    let lambda_2 = eigenvalues[1];
    let gap = lambda_max - lambda_2;
    SpectralGapReport {
        lambda_max,
        lambda_2,
        spectral_gap: gap,
        convergence_rate: gap,
        timescale: if gap > 0.0 { 1.0 / gap } else { f64::INFINITY },
        relative_gap: if lambda_max > 0.0 { gap / lambda_max } else { 0.0 },
    }
}

/// Projects `ρ` onto the subspace spanned by the selected eigenvectors and
/// renormalizes the result to unit total mass when possible.
pub fn project_onto_eigenspace(
    rho: &[f64],
    eigenvectors: &[Vec<f64>],
    indices: &[usize],
) -> Vec<f64> {
    let mut projected = vec![0.0; rho.len()];
    for &idx in indices {
        let Some(vector) = eigenvectors.get(idx) else {
            continue;
        };
        let coefficient: f64 = vector.iter().zip(rho.iter()).map(|(v, r)| v * r).sum();
        for (out, v) in projected.iter_mut().zip(vector.iter()) {
            *out += coefficient * v;
        }
    }
    let total: f64 = projected.iter().sum();
    if total > 0.0 {
        for value in projected.iter_mut() {
            *value /= total;
        }
    }
    projected
}

/// Weight of `ρ` on one generation's eigenspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationWeight {
    /// Generation number.
    pub generation: usize,
    /// Absolute expansion coefficient of `ρ` on the matched eigenvector.
    pub weight: f64,
    /// The matched eigenvalue.
    pub eigenvalue: f64,
    /// Weight as a percentage of the total coefficient mass.
    pub percentage: f64,
}

/// Generation-content decomposition of `ρ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContent {
    /// Per-generation weights.
    pub generation_weights: Vec<GenerationWeight>,
    /// Sum of the per-generation weights.
    pub total_weight: f64,
    /// Generation carrying the most weight, if any matched.
    pub dominant_generation: Option<usize>,
}

/// Expands `ρ` in the eigenbasis and reports how much sits in each matched
/// generation's eigenspace.
pub fn analyze_generation_content(
    rho: &[f64],
    decomposition: &crate::Eigendecomposition,
) -> GenerationContent {
    let coefficients: Vec<f64> = decomposition
        .eigenvectors
        .iter()
        .map(|vector| vector.iter().zip(rho.iter()).map(|(v, r)| v * r).sum())
        .collect();
    let coefficient_mass: f64 = coefficients.iter().map(|c: &f64| c.abs()).sum();

    let mut generation_weights = Vec::new();
    for info in &decomposition.generation_structure.generations {
        let Some(coefficient) = coefficients.get(info.eigenvalue_index) else {
            continue;
        };
        let weight = coefficient.abs();
        generation_weights.push(GenerationWeight {
            generation: info.generation,
            weight,
            eigenvalue: info.actual_eigenvalue,
            percentage: if coefficient_mass > 0.0 {
                weight / coefficient_mass * 100.0
            } else {
                0.0
            },
        });
    }

    let total_weight = generation_weights.iter().map(|g| g.weight).sum();
    let dominant_generation = generation_weights
        .iter()
        .max_by(|a, b| a.weight.total_cmp(&b.weight))
        .map(|g| g.generation);
    GenerationContent {
        generation_weights,
        total_weight,
        dominant_generation,
    }
}
