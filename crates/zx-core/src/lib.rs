#![deny(missing_docs)]
//! Core diagram model and shared types for the ZX evolution engine.
//!
//! A ZX-diagram here is a purely combinatorial configuration: a labeled
//! undirected graph whose nodes carry a `(spider, phase)` label with phases
//! on a dyadic grid. No quantum-circuit semantics are attached. Downstream
//! crates build a similarity kernel, a free-energy functional, and an
//! evolution loop on top of this state space.

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod rng;

mod diagram;
mod hash;
mod phase;
mod serialization;

pub use diagram::{NodeLabel, Spider, ZxDiagram};
pub use errors::{ErrorInfo, ZxError};
pub use hash::canonical_hash;
pub use phase::{add_phases, normalize_phase, Phase};
pub use rng::{derive_substream_seed, RngHandle};
pub use serialization::{diagram_from_bytes, diagram_from_json, diagram_to_bytes, diagram_to_json};

/// The golden ratio `(1 + √5) / 2`, the positive root of `Λ² = Λ + 1`.
///
/// Used as the default decay base of the coherence kernel and the default
/// temperature scale. It is configuration, not a derived quantity: every
/// consumer takes it as a parameter defaulting to this constant.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Equilibrium inverse temperature `β = 2π·φ`.
pub const BETA: f64 = 2.0 * std::f64::consts::PI * PHI;

/// Identifier for a node within a [`ZxDiagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}
