//! Engine configuration.

use serde::{Deserialize, Serialize};
use zx_core::{BETA, PHI};
use zx_ensemble::VariationConfig;

use crate::annealing::AnnealingSchedule;

/// How probability mass moves when the ensemble is regenerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MassTransfer {
    /// Reinitialize `ρ` to uniform whenever the ensemble cardinality changes.
    ///
    /// Positional identity of `ρ` components is not stable across steps
    /// under this policy; optimization history is discarded most steps.
    Uniform,
    /// Key mass by canonical diagram hash: diagrams surviving between
    /// consecutive ensembles keep their mass, new diagrams share the
    /// leftover uniformly, then `ρ` is renormalized.
    #[default]
    CarryOver,
}

/// Where the engine gets β for each step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BetaPolicy {
    /// Constant inverse temperature.
    Fixed {
        /// The β value, defaulting to the equilibrium `2π·φ`.
        #[serde(default = "default_beta")]
        beta: f64,
    },
    /// β follows an annealing schedule indexed by the step counter.
    Annealed {
        /// The schedule to evaluate.
        schedule: AnnealingSchedule,
    },
}

fn default_beta() -> f64 {
    BETA
}

impl Default for BetaPolicy {
    fn default() -> Self {
        Self::Fixed { beta: BETA }
    }
}

impl BetaPolicy {
    /// β for the given step index.
    pub fn beta_at(&self, step: u64) -> f64 {
        match self {
            Self::Fixed { beta } => *beta,
            Self::Annealed { schedule } => schedule.beta_at(step),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed for the run; per-step generators use derived substreams.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside exported runs.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Full evolution-engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cap on the regenerated ensemble size per step.
    #[serde(default = "default_ensemble_size")]
    pub ensemble_size: usize,
    /// β source, fixed or annealed.
    #[serde(default)]
    pub beta: BetaPolicy,
    /// Mass-transfer policy across ensemble regenerations.
    #[serde(default)]
    pub mass_transfer: MassTransfer,
    /// Diffusion coefficient for Laplacian smoothing of `ρ` over the
    /// coherence graph. Zero disables the term.
    #[serde(default)]
    pub diffusion_nu: f64,
    /// Exponential decay base of the coherence kernel.
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Variation-generation knobs; `max_variations` is overridden by
    /// `ensemble_size` each step.
    #[serde(default)]
    pub variation: VariationConfig,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_ensemble_size() -> usize {
    20
}

fn default_decay() -> f64 {
    PHI
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ensemble_size: default_ensemble_size(),
            beta: BetaPolicy::default(),
            mass_transfer: MassTransfer::default(),
            diffusion_nu: 0.0,
            decay: default_decay(),
            variation: VariationConfig::default(),
            seed_policy: SeedPolicy::default(),
        }
    }
}
