#![deny(missing_docs)]
//! Bounded pairwise similarity kernel over ZX-diagrams.
//!
//! The kernel combines a structural overlap in `[0, 1]` with an
//! edit-distance exponential decay whose base defaults to φ. On top of it
//! sits the dense symmetric [`CoherenceMatrix`] the evolution engine
//! rebuilds every step.

mod kernel;
mod matrix;

pub use kernel::{
    coherence, coherence_with_decay, edit_distance, structural_overlap, PHASE_BINS,
    PHASE_TOLERANCE,
};
pub use matrix::{
    coherence_matrix, coherence_matrix_with_decay, verify_coherence_properties, CoherenceMatrix,
    MatrixProperties,
};
