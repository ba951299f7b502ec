#![deny(missing_docs)]
//! Ensemble and variation generation for ZX-diagrams.
//!
//! The evolution engine approximates an infinite configuration space with a
//! finite working set: local variations of the current mode diagram, plus
//! globally random diagrams for seeding and diagnostics. Both generators
//! are best-effort and bounded, and every emitted diagram satisfies the
//! `zx-core` validation contract.

mod diversity;
mod random;
mod variations;

pub use diversity::{estimate_diversity, EnsembleDiversity};
pub use random::{biased_ensemble, diverse_ensemble, random_diagram};
pub use variations::{generate_variations, VariationConfig};
