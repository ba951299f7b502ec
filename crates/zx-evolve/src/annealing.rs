//! Inverse-temperature annealing schedules.
//!
//! β interpolates from a hot exploratory value toward the equilibrium value
//! `2π·φ`. A schedule is a pure function of the step index; the engine
//! evaluates it once per step when configured with an annealed β policy.

use serde::{Deserialize, Serialize};
use zx_core::BETA;

/// Interpolation shape between `beta_initial` and `beta_final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleKind {
    /// Straight-line interpolation.
    Linear,
    /// `β(t) = β_i · exp(t · ln(β_f/β_i))`, slow start then fast cooling.
    Exponential,
    /// Smooth S-curve centered at the midpoint, steepness 10.
    Sigmoid,
    /// Quadratic power law, extended exploration then quick convergence.
    Power,
}

/// Annealing schedule over a fixed number of steps.
///
/// Once `step >= total_steps` the schedule returns exactly `beta_final`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingSchedule {
    /// Interpolation shape.
    #[serde(default = "default_kind")]
    pub kind: ScheduleKind,
    /// Number of steps over which to interpolate.
    #[serde(default = "default_total_steps")]
    pub total_steps: u64,
    /// Starting β (small β means high temperature, wide exploration).
    #[serde(default = "default_beta_initial")]
    pub beta_initial: f64,
    /// Final β, defaulting to the equilibrium value `2π·φ`.
    #[serde(default = "default_beta_final")]
    pub beta_final: f64,
}

fn default_kind() -> ScheduleKind {
    ScheduleKind::Exponential
}

fn default_total_steps() -> u64 {
    200
}

fn default_beta_initial() -> f64 {
    0.1
}

fn default_beta_final() -> f64 {
    BETA
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            total_steps: default_total_steps(),
            beta_initial: default_beta_initial(),
            beta_final: default_beta_final(),
        }
    }
}

impl AnnealingSchedule {
    /// Fast exponential schedule for short runs.
    pub fn fast(total_steps: u64) -> Self {
        Self {
            kind: ScheduleKind::Exponential,
            total_steps,
            beta_initial: 0.1,
            beta_final: BETA,
        }
    }

    /// Slow sigmoid schedule starting even hotter.
    pub fn slow(total_steps: u64) -> Self {
        Self {
            kind: ScheduleKind::Sigmoid,
            total_steps,
            beta_initial: 0.05,
            beta_final: BETA,
        }
    }

    /// Power-law schedule with an extended exploration phase.
    pub fn exploration(total_steps: u64) -> Self {
        Self {
            kind: ScheduleKind::Power,
            total_steps,
            beta_initial: 0.1,
            beta_final: BETA,
        }
    }

    /// Degenerate single-step schedule holding β constant.
    pub fn fixed(beta: f64) -> Self {
        Self {
            kind: ScheduleKind::Linear,
            total_steps: 1,
            beta_initial: beta,
            beta_final: beta,
        }
    }

    /// β at the given step.
    pub fn beta_at(&self, step: u64) -> f64 {
        if self.total_steps == 0 || step >= self.total_steps {
            return self.beta_final;
        }
        let progress = step as f64 / self.total_steps as f64;
        match self.kind {
            ScheduleKind::Linear => {
                self.beta_initial + progress * (self.beta_final - self.beta_initial)
            }
            ScheduleKind::Exponential => {
                // Guard against a nonpositive start before taking the log.
                let start = self.beta_initial.max(RHO_EPS);
                let k = (self.beta_final.max(RHO_EPS) / start).ln();
                start * (k * progress).exp()
            }
            ScheduleKind::Sigmoid => {
                let x = (progress - 0.5) * 10.0;
                let sigmoid = 1.0 / (1.0 + (-x).exp());
                self.beta_initial + sigmoid * (self.beta_final - self.beta_initial)
            }
            ScheduleKind::Power => {
                self.beta_initial + progress * progress * (self.beta_final - self.beta_initial)
            }
        }
    }

    /// Temperature `T = 1/β` at the given step.
    pub fn temperature(&self, step: u64) -> f64 {
        let beta = self.beta_at(step);
        if beta > 0.0 {
            1.0 / beta
        } else {
            f64::INFINITY
        }
    }

    /// The full schedule as `total_steps + 1` β values.
    pub fn materialize(&self) -> Vec<f64> {
        (0..=self.total_steps).map(|step| self.beta_at(step)).collect()
    }
}

const RHO_EPS: f64 = 1e-12;

/// Summary statistics of a materialized schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAnalysis {
    /// β at step 0.
    pub beta_initial: f64,
    /// β at the final step.
    pub beta_final: f64,
    /// Temperature at step 0.
    pub temp_initial: f64,
    /// Temperature at the final step.
    pub temp_final: f64,
    /// Ratio of initial to final temperature.
    pub temp_ratio: f64,
    /// Largest single-step temperature drop.
    pub max_cooling_rate: f64,
    /// Mean single-step temperature drop.
    pub mean_cooling_rate: f64,
}

/// Computes temperature-range and cooling-rate statistics for a schedule.
pub fn analyze_schedule(schedule: &AnnealingSchedule) -> ScheduleAnalysis {
    let betas = schedule.materialize();
    let temps: Vec<f64> = betas.iter().map(|b| 1.0 / b.max(RHO_EPS)).collect();
    let cooling: Vec<f64> = temps.windows(2).map(|w| w[0] - w[1]).collect();
    let max_cooling_rate = cooling.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_cooling_rate = if cooling.is_empty() {
        0.0
    } else {
        cooling.iter().sum::<f64>() / cooling.len() as f64
    };
    ScheduleAnalysis {
        beta_initial: betas[0],
        beta_final: betas[betas.len() - 1],
        temp_initial: temps[0],
        temp_final: temps[temps.len() - 1],
        temp_ratio: temps[0] / temps[temps.len() - 1],
        max_cooling_rate: if max_cooling_rate.is_finite() {
            max_cooling_rate
        } else {
            0.0
        },
        mean_cooling_rate,
    }
}
