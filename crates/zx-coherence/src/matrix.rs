//! Dense symmetric coherence matrix.

use serde::{Deserialize, Serialize};
use zx_core::{ErrorInfo, ZxDiagram, ZxError};

use crate::kernel::coherence_with_decay;

/// Square symmetric matrix of pairwise coherences for one ensemble.
///
/// Recomputed fresh for every ensemble; never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CoherenceMatrix {
    /// Dimension of the matrix.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix is empty.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// One full row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    /// Applies the matrix to a vector: `(C·ρ)[i] = Σ_j C[i][j] ρ[j]`.
    pub fn apply(&self, rho: &[f64]) -> Vec<f64> {
        (0..self.n)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(rho.iter())
                    .map(|(c, r)| c * r)
                    .sum()
            })
            .collect()
    }

    /// Builds a matrix directly from row-major entries (diagnostic use).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ZxError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(ZxError::Spectral(
                    ErrorInfo::new("ragged-matrix", "coherence matrix must be square")
                        .with_context("rows", n)
                        .with_context("cols", row.len()),
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n, data })
    }
}

/// Builds the full pairwise coherence matrix for an ensemble.
///
/// Each diagram is validated once up front; the kernel itself assumes valid
/// inputs. Only the upper triangle is computed, then mirrored.
pub fn coherence_matrix(diagrams: &[ZxDiagram]) -> Result<CoherenceMatrix, ZxError> {
    coherence_matrix_with_decay(diagrams, zx_core::PHI)
}

/// [`coherence_matrix`] with an explicit decay base.
pub fn coherence_matrix_with_decay(
    diagrams: &[ZxDiagram],
    decay: f64,
) -> Result<CoherenceMatrix, ZxError> {
    for diagram in diagrams {
        diagram.validate()?;
    }
    let n = diagrams.len();
    let mut data = vec![0.0; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let value = coherence_with_decay(&diagrams[i], &diagrams[j], decay);
            data[i * n + j] = value;
            data[j * n + i] = value;
        }
    }
    Ok(CoherenceMatrix { n, data })
}

/// Diagnostic summary of the coherence matrix contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixProperties {
    /// Whether `C[i][j] == C[j][i]` within tolerance.
    pub symmetric: bool,
    /// Largest observed `|C[i][j] - C[j][i]|`.
    pub symmetry_error: f64,
    /// Whether the diagonal is 1 within tolerance.
    pub self_coherent: bool,
    /// Largest observed `|C[i][i] - 1|`.
    pub self_coherence_error: f64,
    /// Whether all entries lie in `[0, 1]` within tolerance.
    pub bounded: bool,
    /// Smallest entry.
    pub min_value: f64,
    /// Largest entry.
    pub max_value: f64,
    /// Conjunction of the three contract checks.
    pub all_valid: bool,
}

/// Verifies the symmetry, unit-diagonal, and boundedness contract.
///
/// Test-facing diagnostic; the engine never branches on it.
pub fn verify_coherence_properties(matrix: &CoherenceMatrix, tolerance: f64) -> MatrixProperties {
    let n = matrix.len();
    let mut symmetry_error: f64 = 0.0;
    let mut self_coherence_error: f64 = 0.0;
    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;
    for i in 0..n {
        self_coherence_error = self_coherence_error.max((matrix.get(i, i) - 1.0).abs());
        for j in 0..n {
            let value = matrix.get(i, j);
            symmetry_error = symmetry_error.max((value - matrix.get(j, i)).abs());
            min_value = min_value.min(value);
            max_value = max_value.max(value);
        }
    }
    if n == 0 {
        min_value = 0.0;
        max_value = 0.0;
    }
    let symmetric = symmetry_error < tolerance;
    let self_coherent = self_coherence_error < tolerance;
    let bounded = min_value >= -tolerance && max_value <= 1.0 + tolerance;
    MatrixProperties {
        symmetric,
        symmetry_error,
        self_coherent,
        self_coherence_error,
        bounded,
        min_value,
        max_value,
        all_valid: symmetric && self_coherent && bounded,
    }
}
