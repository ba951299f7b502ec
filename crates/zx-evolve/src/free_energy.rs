//! Free-energy functional and its diagnostics.
//!
//! All functions here are pure in `(C, ρ, β)`. The engine owns the only
//! mutable state; these helpers never touch it.

use serde::{Deserialize, Serialize};
use zx_coherence::CoherenceMatrix;
use zx_core::{ErrorInfo, ZxError, PHI};

/// Numerical floor applied to `ρ` entries before taking logarithms.
///
/// Near-zero probabilities are an expected, frequent condition; flooring is
/// a silent recovery rather than an error.
pub const RHO_FLOOR: f64 = 1e-10;

fn check_lengths(matrix: &CoherenceMatrix, rho: &[f64]) -> Result<(), ZxError> {
    if matrix.len() != rho.len() {
        return Err(ZxError::Evolution(
            ErrorInfo::new("length-mismatch", "coherence matrix and rho disagree on dimension")
                .with_context("matrix", matrix.len())
                .with_context("rho", rho.len()),
        ));
    }
    Ok(())
}

/// Bilinear coherence functional `L[ρ] = Σ_i Σ_j C[i][j] ρ[i] ρ[j]`.
///
/// Lies in `[0, 1]` whenever `ρ` is a probability vector, since every matrix
/// entry does. Not asserted here; adversarial `ρ` is the caller's problem.
pub fn coherence_functional(matrix: &CoherenceMatrix, rho: &[f64]) -> Result<f64, ZxError> {
    check_lengths(matrix, rho)?;
    let applied = matrix.apply(rho);
    Ok(applied.iter().zip(rho.iter()).map(|(a, r)| a * r).sum())
}

/// Shannon entropy `S[ρ] = -Σ_i ρ[i] ln ρ[i]` with the `0 ln 0 = 0`
/// convention via [`RHO_FLOOR`].
pub fn entropy(rho: &[f64]) -> f64 {
    -rho.iter()
        .map(|&r| r * r.max(RHO_FLOOR).ln())
        .sum::<f64>()
}

/// Free energy `F[ρ] = L[ρ] - S[ρ]/β`.
///
/// The system evolves by gradient *ascent* on `F`: concentration (larger `L`)
/// and lower spread (smaller `S`) both increase it.
pub fn free_energy(matrix: &CoherenceMatrix, rho: &[f64], beta: f64) -> Result<f64, ZxError> {
    let l = coherence_functional(matrix, rho)?;
    let s = entropy(rho);
    Ok(l - s / beta)
}

/// Functional derivative `δF/δρ[i] = -2 (C·ρ)[i] + (1/β)(ln ρ[i] + 1)`.
pub fn functional_derivative(
    matrix: &CoherenceMatrix,
    rho: &[f64],
    beta: f64,
) -> Result<Vec<f64>, ZxError> {
    check_lengths(matrix, rho)?;
    let applied = matrix.apply(rho);
    Ok(applied
        .iter()
        .zip(rho.iter())
        .map(|(a, &r)| -2.0 * a + (r.max(RHO_FLOOR).ln() + 1.0) / beta)
        .collect())
}

/// Stationarity diagnostic for [`verify_equilibrium`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumReport {
    /// Whether the derivative is numerically constant across components.
    pub is_equilibrium: bool,
    /// Mean of the functional derivative.
    pub delta_f_mean: f64,
    /// Standard deviation of the functional derivative.
    pub delta_f_std: f64,
    /// Standard deviation normalized by the mean magnitude.
    pub relative_std: f64,
    /// Largest absolute deviation from the mean.
    pub max_deviation: f64,
}

/// Checks the Lagrange-multiplier stationarity signature: at equilibrium
/// `δF/δρ` is constant across components.
///
/// Test-facing diagnostic; the engine never branches on it.
pub fn verify_equilibrium(
    matrix: &CoherenceMatrix,
    rho: &[f64],
    beta: f64,
) -> Result<EquilibriumReport, ZxError> {
    let delta_f = functional_derivative(matrix, rho, beta)?;
    let n = delta_f.len().max(1) as f64;
    let mean = delta_f.iter().sum::<f64>() / n;
    let variance = delta_f.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / n;
    let std = variance.sqrt();
    let relative_std = std / (mean.abs() + RHO_FLOOR);
    let max_deviation = delta_f
        .iter()
        .map(|d| (d - mean).abs())
        .fold(0.0_f64, f64::max);
    Ok(EquilibriumReport {
        is_equilibrium: relative_std < 0.01,
        delta_f_mean: mean,
        delta_f_std: std,
        relative_std,
        max_deviation,
    })
}

/// Fixed-point diagnostic for [`verify_fixed_point`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPointReport {
    /// Whether `C·ρ ≈ λ_max ρ` holds numerically.
    pub is_fixed_point: bool,
    /// Mean of the per-component ratios `(C·ρ)[i] / ρ[i]`.
    pub lambda_max: f64,
    /// Standard deviation of the per-component ratios.
    pub lambda_std: f64,
    /// Absolute residual `‖C·ρ - λ_max ρ‖`.
    pub residual: f64,
    /// Residual normalized by `‖C·ρ‖`.
    pub normalized_residual: f64,
    /// Power of φ closest to `lambda_max` (exponent in `[-5, 5]`).
    pub closest_phi_power: f64,
    /// Relative error of `lambda_max` against that power.
    pub phi_power_error: f64,
    /// Whether `lambda_max` sits within 5% of a power of φ.
    pub is_phi_eigenvalue: bool,
}

/// Checks the fixed-point condition `C·ρ_∞ = λ_max ρ_∞` and whether the
/// apparent eigenvalue is close to an integer power of φ.
pub fn verify_fixed_point(
    matrix: &CoherenceMatrix,
    rho: &[f64],
) -> Result<FixedPointReport, ZxError> {
    check_lengths(matrix, rho)?;
    let applied = matrix.apply(rho);
    let n = rho.len().max(1) as f64;

    let ratios: Vec<f64> = applied
        .iter()
        .zip(rho.iter())
        .map(|(a, &r)| a / r.max(RHO_FLOOR))
        .collect();
    let lambda_max = ratios.iter().sum::<f64>() / n;
    let lambda_var = ratios
        .iter()
        .map(|l| (l - lambda_max) * (l - lambda_max))
        .sum::<f64>()
        / n;
    let lambda_std = lambda_var.sqrt();

    let residual = applied
        .iter()
        .zip(rho.iter())
        .map(|(a, &r)| {
            let diff = a - lambda_max * r;
            diff * diff
        })
        .sum::<f64>()
        .sqrt();
    let applied_norm = applied.iter().map(|a| a * a).sum::<f64>().sqrt();
    let normalized_residual = residual / (applied_norm + RHO_FLOOR);

    let closest_phi_power = (-5..=5)
        .map(|k| PHI.powi(k))
        .min_by(|a, b| {
            (a - lambda_max)
                .abs()
                .total_cmp(&(b - lambda_max).abs())
        })
        .unwrap_or(1.0);
    let phi_power_error = (lambda_max - closest_phi_power).abs() / (closest_phi_power + RHO_FLOOR);

    Ok(FixedPointReport {
        is_fixed_point: lambda_std < 0.01 && normalized_residual < 1e-4,
        lambda_max,
        lambda_std,
        residual,
        normalized_residual,
        closest_phi_power,
        phi_power_error,
        is_phi_eigenvalue: phi_power_error < 0.05,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: usize) -> CoherenceMatrix {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        CoherenceMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn entropy_of_point_mass_is_zero() {
        let s = entropy(&[1.0, 0.0, 0.0]);
        assert!(s.abs() < 1e-8, "got {s}");
    }

    #[test]
    fn entropy_of_uniform_is_log_n() {
        let n = 8usize;
        let rho = vec![1.0 / n as f64; n];
        assert!((entropy(&rho) - (n as f64).ln()).abs() < 1e-12);
    }

    #[test]
    fn uniform_rho_on_identity_matrix_is_equilibrium() {
        let matrix = identity(4);
        let rho = vec![0.25; 4];
        let report = verify_equilibrium(&matrix, &rho, zx_core::BETA).unwrap();
        assert!(report.is_equilibrium, "{report:?}");
    }

    #[test]
    fn uniform_rho_on_identity_matrix_is_fixed_point() {
        let matrix = identity(4);
        let rho = vec![0.25; 4];
        let report = verify_fixed_point(&matrix, &rho).unwrap();
        assert!(report.is_fixed_point, "{report:?}");
        assert!((report.lambda_max - 1.0).abs() < 1e-9);
        assert!(report.is_phi_eigenvalue, "phi^0 = 1 should match");
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let matrix = identity(3);
        let err = coherence_functional(&matrix, &[0.5, 0.5]).unwrap_err();
        assert_eq!(err.info().code, "length-mismatch");
    }
}
