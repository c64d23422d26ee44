//! Tests for learning rate schedules

use super::*;
use approx::assert_abs_diff_eq;
use proptest::prelude::*;

fn lamnet_multistep() -> MultiStepLR {
    MultiStepLR::new(5e-4, vec![250_000, 400_000, 450_000, 475_000], 0.5)
}

#[test]
fn test_multistep_initial_lr() {
    let scheduler = lamnet_multistep();
    assert_abs_diff_eq!(scheduler.lr_at(0), 5e-4, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(249_999), 5e-4, epsilon = 1e-12);
}

#[test]
fn test_multistep_decays_at_milestones() {
    let scheduler = lamnet_multistep();
    assert_abs_diff_eq!(scheduler.lr_at(250_000), 2.5e-4, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(400_000), 1.25e-4, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(500_000), 5e-4 / 16.0, epsilon = 1e-12);
}

#[test]
fn test_multistep_repeated_milestone_decays_twice() {
    let scheduler = MultiStepLR::new(1.0, vec![10, 10], 0.1);
    assert_abs_diff_eq!(scheduler.lr_at(10), 0.01, epsilon = 1e-12);
    assert_eq!(scheduler.milestones(), vec![10]);
}

#[test]
fn test_multistep_restart_resets_rate() {
    let scheduler = MultiStepLR::new(1.0, vec![10, 30], 0.5).with_restarts(vec![(20, 0.8)]);
    assert_abs_diff_eq!(scheduler.lr_at(15), 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(20), 0.8, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(30), 0.4, epsilon = 1e-12);
    assert_eq!(scheduler.milestones(), vec![10, 20, 30]);
}

#[test]
fn test_cosine_restart_cycle_shape() {
    let scheduler = CosineAnnealingRestartLR::new(1.0, vec![100, 100], vec![1.0, 0.5], 0.0);
    assert_abs_diff_eq!(scheduler.lr_at(0), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scheduler.lr_at(50), 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(scheduler.lr_at(100), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scheduler.lr_at(150), 0.25, epsilon = 1e-9);
    assert_eq!(scheduler.milestones(), vec![101]);
    assert_eq!(scheduler.horizon(), 200);
}

#[test]
fn test_cosine_restart_holds_eta_min_past_horizon() {
    let scheduler = CosineAnnealingRestartLR::new(1.0, vec![10], vec![1.0], 1e-7);
    assert_abs_diff_eq!(scheduler.lr_at(1_000), 1e-7, epsilon = 1e-15);
}

#[test]
fn test_cosine_restart_decreases_within_cycle() {
    let scheduler = CosineAnnealingRestartLR::new(2e-4, vec![1_000], vec![1.0], 1e-7);
    let mut prev = scheduler.lr_at(0);
    for iter in 1..=1_000 {
        let lr = scheduler.lr_at(iter);
        assert!(lr <= prev);
        prev = lr;
    }
}

#[test]
fn test_warmup_ramps_linearly() {
    let scheduler = WarmupLR::new(Box::new(lamnet_multistep()), Some(1_000));
    assert_abs_diff_eq!(scheduler.lr_at(0), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(500), 2.5e-4, epsilon = 1e-12);
    assert_abs_diff_eq!(scheduler.lr_at(1_000), 5e-4, epsilon = 1e-12);
}

#[test]
fn test_zero_warmup_is_disabled() {
    let scheduler = WarmupLR::new(Box::new(lamnet_multistep()), Some(0));
    assert_eq!(scheduler.warmup(), None);
    assert_abs_diff_eq!(scheduler.lr_at(0), 5e-4, epsilon = 1e-12);
}

#[test]
fn test_curve_includes_milestone_edges() {
    let scheduler = lamnet_multistep();
    let points = curve(&scheduler, 500_000, 3);
    let iters: Vec<u64> = points.iter().map(|&(iter, _)| iter).collect();
    assert!(iters.contains(&0));
    assert!(iters.contains(&249_999));
    assert!(iters.contains(&250_000));
    assert!(iters.contains(&500_000));
    assert!(iters.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_curve_with_huge_total_iter() {
    let scheduler = MultiStepLR::new(1e-3, vec![10], 0.5);
    let total = u64::MAX / 2;
    let points = curve(&scheduler, total, 11);
    let iters: Vec<u64> = points.iter().map(|&(iter, _)| iter).collect();
    assert_eq!(iters.first(), Some(&0));
    assert_eq!(iters.last(), Some(&total));
    assert!(iters.contains(&(total / 2)));
    assert!(iters.contains(&9));
    assert!(iters.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_curve_points_capped_at_total() {
    let scheduler = MultiStepLR::new(1.0, vec![], 0.5);
    let points = curve(&scheduler, 4, u64::MAX);
    let iters: Vec<u64> = points.iter().map(|&(iter, _)| iter).collect();
    assert_eq!(iters, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_curve_with_zero_total() {
    let scheduler = MultiStepLR::new(1.0, vec![], 0.5);
    assert_eq!(curve(&scheduler, 0, 11), vec![(0, 1.0)]);
}

#[test]
fn test_cosine_restart_huge_periods_saturate() {
    let scheduler = CosineAnnealingRestartLR::new(1.0, vec![u64::MAX, u64::MAX], vec![1.0, 1.0], 0.0);
    assert_eq!(scheduler.horizon(), u64::MAX);
    assert_eq!(scheduler.milestones(), vec![u64::MAX]);
    assert_abs_diff_eq!(scheduler.lr_at(0), 1.0, epsilon = 1e-12);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_disabled_warmup_matches_inner(
        iter in 0u64..600_000,
        gamma in 0.05f64..1.0,
    ) {
        let inner = MultiStepLR::new(5e-4, vec![250_000, 400_000, 450_000, 475_000], gamma);
        let wrapped = WarmupLR::new(Box::new(inner.clone()), None);
        prop_assert_eq!(wrapped.lr_at(iter), inner.lr_at(iter));
        prop_assert_eq!(wrapped.milestones(), inner.milestones());
    }

    #[test]
    fn prop_warmup_never_moves_milestones(warmup in 1u64..200_000) {
        let inner = lamnet_multistep();
        let wrapped = WarmupLR::new(Box::new(inner.clone()), Some(warmup));
        prop_assert_eq!(wrapped.milestones(), inner.milestones());
        prop_assert_eq!(wrapped.lr_at(warmup), inner.lr_at(warmup));
    }

    #[test]
    fn prop_multistep_is_non_increasing(a in 0u64..600_000, b in 0u64..600_000) {
        let scheduler = lamnet_multistep();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(scheduler.lr_at(hi) <= scheduler.lr_at(lo));
    }
}
