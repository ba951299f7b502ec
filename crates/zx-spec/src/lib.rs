#![deny(missing_docs)]
//! Offline spectral diagnostics for coherence matrices.
//!
//! Everything here is read-only analysis: eigendecomposition of the
//! symmetric coherence operator, identification of φ-related eigenvalues
//! and the three-generation structure of `λ³ = 2λ + 1`, spectral-gap
//! reporting, eigenspace projection of `ρ`, and the 16-component Clifford
//! feature mapping of a diagram. Nothing in this crate influences engine
//! control flow.

mod clifford;
mod eigen;
mod generations;

pub use clifford::{grade_decomposition, zx_to_clifford, GradeDecomposition, CLIFFORD_DIM};
pub use eigen::{eigendecompose, Eigendecomposition};
pub use generations::{
    analyze_generation_content, identify_generations, identify_phi_eigenvalues,
    project_onto_eigenspace, spectral_gap, CubicCheck, GenerationContent, GenerationMatch,
    GenerationStructure, GenerationWeight, SpectralGapReport, PHI_MATCH_TOLERANCE,
};
