#![deny(missing_docs)]
//! Free-energy driven evolution over ZX-diagram ensembles.
//!
//! The engine maintains a probability distribution `ρ` over a finite ensemble
//! of diagrams and ascends the free energy `F[ρ] = L[ρ] - S[ρ]/β`, where `L`
//! is the bilinear coherence functional and `S` the Shannon entropy. Each
//! `step(dt)` regenerates the ensemble as local variations of the current
//! mode, transfers probability mass to the new ensemble, and performs one
//! explicit gradient-ascent update on `ρ`.

mod annealing;
mod config;
mod engine;
mod free_energy;

pub use annealing::{analyze_schedule, AnnealingSchedule, ScheduleAnalysis, ScheduleKind};
pub use config::{BetaPolicy, EngineConfig, MassTransfer, SeedPolicy};
pub use engine::{ConvergenceReport, EngineState, EvolutionEngine, StepResult};
pub use free_energy::{
    coherence_functional, entropy, free_energy, functional_derivative, verify_equilibrium,
    verify_fixed_point, EquilibriumReport, FixedPointReport, RHO_FLOOR,
};
