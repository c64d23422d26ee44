//! Linear warm-up in front of another schedule

use super::LrScheduler;

/// Linear Warmup Learning Rate Scheduler
///
/// For `0 < t < warmup` the rate ramps linearly from 0 to the base rate;
/// afterwards the wrapped schedule is used unchanged.
///
/// Formula: lr_t = base * t / warmup  (t < warmup), inner(t) otherwise
///
/// A disabled warm-up (`None`) delegates every iteration to the inner
/// schedule, so milestones and post-warm-up rates are identical.
#[derive(Debug)]
pub struct WarmupLR {
    inner: Box<dyn LrScheduler>,
    warmup: Option<u64>,
}

impl WarmupLR {
    pub fn new(inner: Box<dyn LrScheduler>, warmup: Option<u64>) -> Self {
        Self {
            inner,
            warmup: warmup.filter(|&w| w > 0),
        }
    }

    pub fn warmup(&self) -> Option<u64> {
        self.warmup
    }
}

impl LrScheduler for WarmupLR {
    fn lr_at(&self, iter: u64) -> f64 {
        match self.warmup {
            Some(warmup) if iter < warmup => self.inner.base_lr() * iter as f64 / warmup as f64,
            _ => self.inner.lr_at(iter),
        }
    }

    fn base_lr(&self) -> f64 {
        self.inner.base_lr()
    }

    fn milestones(&self) -> Vec<u64> {
        self.inner.milestones()
    }
}
