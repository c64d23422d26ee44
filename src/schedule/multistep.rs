//! Multi-step decay with optional restarts

use super::LrScheduler;

/// Multi-step Learning Rate Scheduler
///
/// Multiplies the rate by `gamma` at every milestone. At a restart the rate
/// jumps back to `base_lr * weight` and only later milestones decay it.
///
/// Formula: lr_t = base * w_r * gamma^|{m : r < m <= t}|
///
/// Where r is the latest restart at or before t (w_r = 1 when none).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStepLR {
    base_lr: f64,
    milestones: Vec<u64>,
    gamma: f64,
    restarts: Vec<(u64, f64)>,
}

impl MultiStepLR {
    /// Create a new multi-step scheduler
    ///
    /// # Arguments
    /// * `base_lr` - Initial learning rate
    /// * `milestones` - Iterations at which to decay (repeats decay twice)
    /// * `gamma` - Multiplicative factor per milestone
    pub fn new(base_lr: f64, milestones: Vec<u64>, gamma: f64) -> Self {
        Self {
            base_lr,
            milestones,
            gamma,
            restarts: Vec::new(),
        }
    }

    /// Add restarts as `(iteration, weight)` pairs.
    pub fn with_restarts(mut self, mut restarts: Vec<(u64, f64)>) -> Self {
        restarts.sort_by_key(|&(iter, _)| iter);
        self.restarts = restarts;
        self
    }
}

impl LrScheduler for MultiStepLR {
    fn lr_at(&self, iter: u64) -> f64 {
        let restart = self.restarts.iter().rev().find(|&&(at, _)| at <= iter).copied();
        let (start, weight) = match restart {
            Some((at, weight)) => (Some(at), weight),
            None => (None, 1.0),
        };
        let decays = self
            .milestones
            .iter()
            .filter(|&&m| m <= iter && start.map_or(true, |at| m > at))
            .count();
        self.base_lr * weight * self.gamma.powi(decays as i32)
    }

    fn base_lr(&self) -> f64 {
        self.base_lr
    }

    fn milestones(&self) -> Vec<u64> {
        let mut all: Vec<u64> = self
            .milestones
            .iter()
            .copied()
            .chain(self.restarts.iter().map(|&(at, _)| at))
            .filter(|&at| at > 0)
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }
}
