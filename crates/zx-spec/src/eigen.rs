//! Symmetric eigendecomposition via cyclic Jacobi rotations.

use serde::{Deserialize, Serialize};
use zx_coherence::CoherenceMatrix;
use zx_core::{ErrorInfo, ZxError};

use crate::generations::{identify_generations, identify_phi_eigenvalues, GenerationStructure};

const MAX_SWEEPS: usize = 128;
const OFF_DIAGONAL_TOLERANCE: f64 = 1e-12;

/// Full eigendecomposition of a coherence matrix, eigenvalues descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eigendecomposition {
    /// Eigenvalues in descending order.
    pub eigenvalues: Vec<f64>,
    /// Unit eigenvectors; `eigenvectors[k]` pairs with `eigenvalues[k]`.
    pub eigenvectors: Vec<Vec<f64>>,
    /// Indices of eigenvalues close to powers or small multiples of φ.
    pub phi_indices: Vec<usize>,
    /// Three-generation matching against the roots of `λ³ = 2λ + 1`.
    pub generation_structure: GenerationStructure,
    /// Gap `λ_1 - λ_2`, zero for matrices smaller than 2×2.
    pub spectral_gap: f64,
    /// `λ_max / λ_min`, infinite when the smallest eigenvalue is not positive.
    pub condition_number: f64,
}

/// Eigendecomposes the symmetric matrix with cyclic Jacobi rotations.
///
/// The coherence matrix is symmetric by construction, so all eigenvalues are
/// real and the eigenvectors orthogonal. Fails only if the off-diagonal norm
/// refuses to converge, which does not happen for symmetric input.
pub fn eigendecompose(matrix: &CoherenceMatrix) -> Result<Eigendecomposition, ZxError> {
    let n = matrix.len();
    let mut a: Vec<f64> = (0..n).flat_map(|i| matrix.row(i).to_vec()).collect();
    let mut v = vec![0.0; n * n];
    for i in 0..n {
        v[i * n + i] = 1.0;
    }

    if n > 1 {
        let mut converged = false;
        for _ in 0..MAX_SWEEPS {
            if off_diagonal_norm(&a, n) < OFF_DIAGONAL_TOLERANCE {
                converged = true;
                break;
            }
            for p in 0..n {
                for q in (p + 1)..n {
                    rotate(&mut a, &mut v, n, p, q);
                }
            }
        }
        if !converged && off_diagonal_norm(&a, n) >= OFF_DIAGONAL_TOLERANCE {
            return Err(ZxError::Spectral(
                ErrorInfo::new("jacobi-no-convergence", "jacobi sweeps did not converge")
                    .with_context("dimension", n)
                    .with_context("sweeps", MAX_SWEEPS),
            ));
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[j * n + j].total_cmp(&a[i * n + i]));

    let eigenvalues: Vec<f64> = order.iter().map(|&k| a[k * n + k]).collect();
    let eigenvectors: Vec<Vec<f64>> = order
        .iter()
        .map(|&k| (0..n).map(|i| v[i * n + k]).collect())
        .collect();

    let phi_indices = identify_phi_eigenvalues(&eigenvalues, crate::PHI_MATCH_TOLERANCE);
    let generation_structure = identify_generations(&eigenvalues, &phi_indices);
    let spectral_gap = if n > 1 {
        eigenvalues[0] - eigenvalues[1]
    } else {
        0.0
    };
    let condition_number = match eigenvalues.last() {
        Some(&smallest) if smallest > 0.0 => eigenvalues[0] / smallest,
        _ => f64::INFINITY,
    };

    Ok(Eigendecomposition {
        eigenvalues,
        eigenvectors,
        phi_indices,
        generation_structure,
        spectral_gap,
        condition_number,
    })
}

fn off_diagonal_norm(a: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += a[i * n + j] * a[i * n + j];
        }
    }
    (2.0 * sum).sqrt()
}

/// One Jacobi rotation zeroing `a[p][q]`, accumulating into `v`.
fn rotate(a: &mut [f64], v: &mut [f64], n: usize, p: usize, q: usize) {
    let apq = a[p * n + q];
    if apq.abs() < f64::EPSILON {
        return;
    }
    let app = a[p * n + p];
    let aqq = a[q * n + q];
    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    // A <- A·G, then A <- Gᵀ·A; columns of V rotate like A's.
    for i in 0..n {
        let aip = a[i * n + p];
        let aiq = a[i * n + q];
        a[i * n + p] = c * aip - s * aiq;
        a[i * n + q] = s * aip + c * aiq;
    }
    for i in 0..n {
        let api = a[p * n + i];
        let aqi = a[q * n + i];
        a[p * n + i] = c * api - s * aqi;
        a[q * n + i] = s * api + c * aqi;
    }
    for i in 0..n {
        let vip = v[i * n + p];
        let viq = v[i * n + q];
        v[i * n + p] = c * vip - s * viq;
        v[i * n + q] = s * vip + c * viq;
    }
}
