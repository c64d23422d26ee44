//! Learning rate schedules
//!
//! Closed-form versions of the schedules the external trainer steps through:
//! - `MultiStepLR` - Decay by `gamma` at each milestone, optional restarts
//! - `CosineAnnealingRestartLR` - Cosine cycles with per-cycle weights
//! - `WarmupLR` - Linear warm-up in front of either
//!
//! Iterations count completed scheduler steps.

mod cosine_restart;
mod multistep;
mod warmup;

#[cfg(test)]
mod tests;

pub use cosine_restart::CosineAnnealingRestartLR;
pub use multistep::MultiStepLR;
pub use warmup::WarmupLR;

use std::fmt::Debug;

/// Learning rate schedule
pub trait LrScheduler: Debug + Send + Sync {
    /// Learning rate in effect after `iter` scheduler steps
    fn lr_at(&self, iter: u64) -> f64;

    /// Learning rate at iteration 0 before any warm-up
    fn base_lr(&self) -> f64;

    /// Iterations where the rate changes discontinuously
    fn milestones(&self) -> Vec<u64>;
}

/// Sample `lr_at` at `points` evenly spaced iterations in `0..=total`, plus
/// every milestone and the iteration just before it.
///
/// `points` is capped at `total + 1`, one sample per iteration.
pub fn curve(schedule: &dyn LrScheduler, total: u64, points: u64) -> Vec<(u64, f64)> {
    let points = points.min(total.saturating_add(1));
    let mut iters: Vec<u64> = if points < 2 {
        vec![0, total]
    } else {
        let last = u128::from(points - 1);
        (0..points)
            .map(|i| (u128::from(total) * u128::from(i) / last) as u64)
            .collect()
    };
    for milestone in schedule.milestones() {
        if milestone <= total {
            iters.push(milestone);
            iters.push(milestone.saturating_sub(1));
        }
    }
    iters.sort_unstable();
    iters.dedup();
    iters.into_iter().map(|iter| (iter, schedule.lr_at(iter))).collect()
}
