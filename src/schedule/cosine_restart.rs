//! Cosine annealing with warm restarts

use super::LrScheduler;
use std::f64::consts::PI;

/// Cosine Annealing Restart Learning Rate Scheduler
///
/// Runs one cosine cycle per period. Cycle `i` starts at
/// `base_lr * weights[i]` and ends at `eta_min`.
///
/// Formula: lr_t = eta_min + w_i * 0.5 * (base - eta_min) * (1 + cos(pi * (t - r_i) / p_i))
///
/// Past the last cycle the rate stays at `eta_min`.
#[derive(Debug, Clone, PartialEq)]
pub struct CosineAnnealingRestartLR {
    base_lr: f64,
    periods: Vec<u64>,
    weights: Vec<f64>,
    cumulative: Vec<u64>,
    eta_min: f64,
}

impl CosineAnnealingRestartLR {
    /// Create a new cosine restart scheduler
    ///
    /// `periods` and `weights` must have the same length; periods must be
    /// positive. The validator guarantees both before construction.
    pub fn new(base_lr: f64, periods: Vec<u64>, weights: Vec<f64>, eta_min: f64) -> Self {
        let cumulative = periods
            .iter()
            .scan(0u64, |sum, &p| {
                *sum = sum.saturating_add(p);
                Some(*sum)
            })
            .collect();
        Self {
            base_lr,
            periods,
            weights,
            cumulative,
            eta_min,
        }
    }

    /// Last iteration covered by a cycle.
    pub fn horizon(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }
}

impl LrScheduler for CosineAnnealingRestartLR {
    fn lr_at(&self, iter: u64) -> f64 {
        let Some(idx) = self.cumulative.iter().position(|&end| iter <= end) else {
            return self.eta_min;
        };
        let restart = if idx == 0 { 0 } else { self.cumulative[idx - 1] };
        let progress = (iter - restart) as f64 / self.periods[idx] as f64;
        let weight = self.weights.get(idx).copied().unwrap_or(1.0);
        self.eta_min + weight * 0.5 * (self.base_lr - self.eta_min) * (1.0 + (PI * progress).cos())
    }

    fn base_lr(&self) -> f64 {
        self.base_lr
    }

    fn milestones(&self) -> Vec<u64> {
        let n = self.cumulative.len().saturating_sub(1);
        self.cumulative[..n].iter().map(|&end| end.saturating_add(1)).collect()
    }
}
