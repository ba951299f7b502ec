//! The master-equation evolution engine.
//!
//! `EvolutionEngine` is the single owner of its ensemble and distribution;
//! the only mutating operation is [`EvolutionEngine::step`]. Everything it
//! returns is a snapshot, safe to hold across steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zx_coherence::{coherence_matrix_with_decay, CoherenceMatrix};
use zx_core::{canonical_hash, derive_substream_seed, RngHandle, ZxDiagram, ZxError};
use zx_ensemble::{generate_variations, VariationConfig};

use crate::config::{EngineConfig, MassTransfer};
use crate::free_energy::{free_energy, functional_derivative, verify_fixed_point, RHO_FLOOR};

/// Advisory convergence diagnostic returned with every step.
///
/// Convergence is never a terminal state: further steps remain legal and may
/// perturb the system away from the fixed point again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Free energy stable and fixed-point condition both hold.
    pub converged: bool,
    /// Spread of the last ten free-energy values is below `1e-4`.
    pub free_energy_stable: bool,
    /// `C·ρ ≈ λ_max ρ` holds numerically.
    pub is_fixed_point: bool,
    /// Apparent dominant eigenvalue.
    pub lambda_max: f64,
    /// Normalized fixed-point residual.
    pub residual: f64,
    /// Whether `lambda_max` sits near an integer power of φ.
    pub is_phi_eigenvalue: bool,
}

impl Default for ConvergenceReport {
    fn default() -> Self {
        Self {
            converged: false,
            free_energy_stable: false,
            is_fixed_point: false,
            lambda_max: 0.0,
            residual: 0.0,
            is_phi_eigenvalue: false,
        }
    }
}

/// Outcome of one evolution step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The most probable ensemble member after the step.
    pub mode: ZxDiagram,
    /// Probability mass on the mode, in `[0, 1]`.
    pub mode_probability: f64,
    /// Free energy of the new `(ensemble, ρ)`.
    pub free_energy: f64,
    /// Mean coherence between the mode and the rest of the ensemble.
    pub mode_coherence: f64,
    /// Size of the regenerated ensemble.
    pub ensemble_size: usize,
    /// Accumulated evolution time.
    pub time: f64,
    /// Convergence diagnostic for this step.
    pub convergence: ConvergenceReport,
}

/// Snapshot of the engine for external renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    /// Current mode diagram.
    pub mode: ZxDiagram,
    /// Node count of the mode.
    pub num_nodes: usize,
    /// Edge count of the mode.
    pub num_edges: usize,
    /// Probability mass on the mode.
    pub mode_probability: f64,
    /// Most recent free energy, zero before the first step.
    pub free_energy: f64,
    /// Accumulated evolution time.
    pub time: f64,
    /// Convergence diagnostic.
    pub convergence: ConvergenceReport,
}

/// Evolves a probability distribution over a regenerating diagram ensemble
/// by gradient ascent on the free energy.
#[derive(Debug, Clone)]
pub struct EvolutionEngine {
    config: EngineConfig,
    mode: ZxDiagram,
    ensemble: Vec<ZxDiagram>,
    rho: Vec<f64>,
    matrix: Option<CoherenceMatrix>,
    time: f64,
    step_index: u64,
    free_energy_history: Vec<f64>,
    mode_coherence_history: Vec<f64>,
    mode_probability_history: Vec<f64>,
}

impl EvolutionEngine {
    /// Creates an engine at the seed diagram with a singleton ensemble.
    pub fn new(config: EngineConfig) -> Self {
        let mode = ZxDiagram::seed();
        Self {
            config,
            ensemble: vec![mode.clone()],
            rho: vec![1.0],
            mode,
            matrix: None,
            time: 0.0,
            step_index: 0,
            free_energy_history: Vec::new(),
            mode_coherence_history: Vec::new(),
            mode_probability_history: Vec::new(),
        }
    }

    /// One master-equation step of size `dt`.
    ///
    /// Regenerates the ensemble around the current mode, transfers mass per
    /// the configured policy, then performs a mean-subtracted gradient-ascent
    /// update on `ρ` followed by an unconditional clip-and-renormalize, so
    /// `ρ` stays a probability vector even under adversarial `dt`.
    pub fn step(&mut self, dt: f64) -> Result<StepResult, ZxError> {
        let mut rng = RngHandle::from_seed(derive_substream_seed(
            self.config.seed_policy.master_seed,
            self.step_index,
        ));

        let previous = self.mass_by_hash();
        let variation = VariationConfig {
            max_variations: self.config.ensemble_size,
            ..self.config.variation.clone()
        };
        self.ensemble = generate_variations(&self.mode, &variation, &mut rng)?;
        self.rho = self.transferred_mass(&previous);
        debug_assert_eq!(self.ensemble.len(), self.rho.len());

        let matrix = coherence_matrix_with_decay(&self.ensemble, self.config.decay)?;
        let beta = self.config.beta.beta_at(self.step_index);

        let delta_f = functional_derivative(&matrix, &self.rho, beta)?;
        // Subtracting the mean keeps the update orthogonal to the all-ones
        // direction, preserving normalization to first order.
        let mean = delta_f.iter().sum::<f64>() / delta_f.len().max(1) as f64;
        for (rho, df) in self.rho.iter_mut().zip(delta_f.iter()) {
            *rho += dt * (mean - df);
        }
        if self.config.diffusion_nu > 0.0 {
            diffuse(&mut self.rho, &matrix, self.config.diffusion_nu * dt);
        }
        project_to_simplex(&mut self.rho);

        let mode_idx = argmax(&self.rho);
        self.mode = self.ensemble[mode_idx].clone();
        let mode_probability = self.rho[mode_idx];
        let mode_coherence = mean_row_coherence(&matrix, mode_idx);

        let free_energy_value = free_energy(&matrix, &self.rho, beta)?;
        self.free_energy_history.push(free_energy_value);
        self.mode_coherence_history.push(mode_coherence);
        self.mode_probability_history.push(mode_probability);
        self.matrix = Some(matrix);
        self.time += dt;
        self.step_index += 1;

        let convergence = self.convergence()?;
        Ok(StepResult {
            mode: self.mode.clone(),
            mode_probability,
            free_energy: free_energy_value,
            mode_coherence,
            ensemble_size: self.ensemble.len(),
            time: self.time,
            convergence,
        })
    }

    /// Current convergence diagnostic.
    ///
    /// Reports convergence only when the free energy has been stable over
    /// the last ten steps and the fixed-point condition holds.
    pub fn convergence(&self) -> Result<ConvergenceReport, ZxError> {
        let Some(matrix) = &self.matrix else {
            return Ok(ConvergenceReport::default());
        };
        let free_energy_stable = self.free_energy_history.len() > 10 && {
            let recent = &self.free_energy_history[self.free_energy_history.len() - 10..];
            let max = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = recent.iter().copied().fold(f64::INFINITY, f64::min);
            max - min < 1e-4
        };
        let fixed_point = verify_fixed_point(matrix, &self.rho)?;
        Ok(ConvergenceReport {
            converged: free_energy_stable && fixed_point.is_fixed_point,
            free_energy_stable,
            is_fixed_point: fixed_point.is_fixed_point,
            lambda_max: fixed_point.lambda_max,
            residual: fixed_point.normalized_residual,
            is_phi_eigenvalue: fixed_point.is_phi_eigenvalue,
        })
    }

    /// Snapshot for external renderers.
    pub fn state(&self) -> Result<EngineState, ZxError> {
        Ok(EngineState {
            mode: self.mode.clone(),
            num_nodes: self.mode.node_count(),
            num_edges: self.mode.edge_count(),
            mode_probability: self.rho.iter().copied().fold(0.0_f64, f64::max),
            free_energy: self.free_energy_history.last().copied().unwrap_or(0.0),
            time: self.time,
            convergence: self.convergence()?,
        })
    }

    /// Current mode diagram.
    pub fn mode(&self) -> &ZxDiagram {
        &self.mode
    }

    /// Current ensemble.
    pub fn ensemble(&self) -> &[ZxDiagram] {
        &self.ensemble
    }

    /// Current probability distribution, aligned with [`Self::ensemble`].
    pub fn rho(&self) -> &[f64] {
        &self.rho
    }

    /// Accumulated evolution time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of completed steps.
    pub fn steps_taken(&self) -> u64 {
        self.step_index
    }

    /// Free-energy series, one value per completed step.
    pub fn free_energy_history(&self) -> &[f64] {
        &self.free_energy_history
    }

    /// Mode-coherence series, one value per completed step.
    pub fn mode_coherence_history(&self) -> &[f64] {
        &self.mode_coherence_history
    }

    /// Mode-probability series, one value per completed step.
    pub fn mode_probability_history(&self) -> &[f64] {
        &self.mode_probability_history
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn mass_by_hash(&self) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        if self.config.mass_transfer == MassTransfer::CarryOver {
            for (diagram, mass) in self.ensemble.iter().zip(self.rho.iter()) {
                *map.entry(canonical_hash(diagram)).or_insert(0.0) += mass;
            }
        }
        map
    }

    fn transferred_mass(&self, previous: &BTreeMap<String, f64>) -> Vec<f64> {
        let n = self.ensemble.len();
        if n == 0 {
            return Vec::new();
        }
        let uniform = 1.0 / n as f64;
        match self.config.mass_transfer {
            MassTransfer::Uniform => {
                if self.rho.len() == n {
                    self.rho.clone()
                } else {
                    vec![uniform; n]
                }
            }
            MassTransfer::CarryOver => {
                let hashes: Vec<String> =
                    self.ensemble.iter().map(canonical_hash).collect();
                let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
                for hash in &hashes {
                    *occurrences.entry(hash).or_insert(0) += 1;
                }
                let mut rho = vec![0.0; n];
                let mut carried = 0.0;
                let mut fresh = 0usize;
                for (slot, hash) in rho.iter_mut().zip(hashes.iter()) {
                    if let Some(mass) = previous.get(hash) {
                        // Duplicates of a surviving diagram split its mass.
                        let share = mass / occurrences[hash.as_str()] as f64;
                        *slot = share;
                        carried += share;
                    } else {
                        fresh += 1;
                    }
                }
                if fresh == n {
                    return vec![uniform; n];
                }
                if fresh > 0 {
                    let leftover = (1.0 - carried).max(0.0);
                    let share = if leftover > 0.0 {
                        leftover / fresh as f64
                    } else {
                        RHO_FLOOR
                    };
                    for (slot, hash) in rho.iter_mut().zip(hashes.iter()) {
                        if !previous.contains_key(hash) {
                            *slot = share;
                        }
                    }
                }
                project_to_simplex(&mut rho);
                rho
            }
        }
    }
}

impl Default for EvolutionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Clips negatives and renormalizes; falls back to uniform when everything
/// was clipped away.
fn project_to_simplex(rho: &mut [f64]) {
    if rho.is_empty() {
        return;
    }
    for value in rho.iter_mut() {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
    let total: f64 = rho.iter().sum();
    if total > 0.0 {
        for value in rho.iter_mut() {
            *value /= total;
        }
    } else {
        let uniform = 1.0 / rho.len() as f64;
        rho.fill(uniform);
    }
}

/// Laplacian smoothing of `ρ` over the coherence graph with a row-normalized
/// weight matrix: `ρ ← ρ + s·(Wρ - ρ)`.
fn diffuse(rho: &mut [f64], matrix: &CoherenceMatrix, strength: f64) {
    let n = rho.len();
    let mut smoothed = vec![0.0; n];
    for (i, value) in smoothed.iter_mut().enumerate() {
        let row = matrix.row(i);
        let row_sum: f64 = row.iter().sum();
        if row_sum > 0.0 {
            *value = row.iter().zip(rho.iter()).map(|(w, r)| w * r).sum::<f64>() / row_sum;
        }
    }
    for (value, target) in rho.iter_mut().zip(smoothed.iter()) {
        *value += strength * (target - *value);
    }
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

fn mean_row_coherence(matrix: &CoherenceMatrix, row: usize) -> f64 {
    let entries = matrix.row(row);
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().sum::<f64>() / entries.len() as f64
}
