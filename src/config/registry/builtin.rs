//! Handlers for the tags the BasicSR drivers used by LAMNet understand

use super::Registry;
use crate::config::plan::{
    Better, DatasetHandler, IoHandler, LossPlan, MetricPlan, ModelDriver, OptimizerPlan,
    Requirement, RunMode,
};
use crate::config::schema::{
    DatasetSpec, ExperimentConfig, IoBackend, LossSpec, MetricSpec, NetworkSpec, OptimizerSpec,
    Phase, TrainSection,
};
use crate::config::{ConfigError, ConfigResult};
use crate::network::LamNetPlan;
use crate::schedule::{CosineAnnealingRestartLR, LrScheduler, MultiStepLR, WarmupLR};

/// Every registry the validator consults
#[derive(Debug)]
pub struct Registries {
    pub models: Registry<ExperimentConfig, ModelDriver>,
    pub networks: Registry<NetworkSpec, LamNetPlan>,
    pub datasets: Registry<DatasetSpec, DatasetHandler>,
    pub io_backends: Registry<IoBackend, IoHandler>,
    pub optimizers: Registry<OptimizerSpec, OptimizerPlan>,
    pub schedulers: Registry<TrainSection, Box<dyn LrScheduler>>,
    pub losses: Registry<LossSpec, LossPlan>,
    pub metrics: Registry<MetricSpec, MetricPlan>,
}

impl Registries {
    /// Registries with every built-in handler.
    pub fn builtin() -> Self {
        Self {
            models: Registry::new("model").with("SRModel", sr_model),
            networks: Registry::new("network").with("LAMNet", LamNetPlan::from_spec),
            datasets: Registry::new("dataset")
                .with("PairedImageDataset", paired_dataset)
                .with("SingleImageDataset", single_dataset),
            io_backends: Registry::new("io backend")
                .with("disk", disk_backend)
                .with("lmdb", lmdb_backend),
            optimizers: Registry::new("optimizer")
                .with("Adam", adam)
                .with("AdamW", adamw)
                .with("Adamax", adamax)
                .with("SGD", sgd)
                .with("RMSprop", rmsprop),
            schedulers: Registry::new("scheduler")
                .with("MultiStepLR", multistep)
                .with("MultiStepRestartLR", multistep)
                .with("CosineAnnealingRestartLR", cosine_restart),
            losses: Registry::new("loss")
                .with("L1Loss", l1_loss)
                .with("MSELoss", mse_loss)
                .with("CharbonnierLoss", charbonnier_loss),
            metrics: Registry::new("metric")
                .with("calculate_psnr", psnr)
                .with("calculate_ssim", ssim)
                .with("calculate_niqe", niqe),
        }
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Model drivers
// ---------------------------------------------------------------------------

fn sr_model(_: &ExperimentConfig) -> ConfigResult<ModelDriver> {
    Ok(ModelDriver {
        name: "SRModel",
        requirements: sr_model_requirements,
    })
}

fn has_eval_split(config: &ExperimentConfig) -> bool {
    config
        .datasets
        .keys()
        .any(|split| matches!(Phase::of_split(split), Some(Phase::Val | Phase::Test)))
}

fn sr_model_requirements(mode: RunMode) -> Vec<Requirement> {
    let mut requirements = vec![Requirement::new("network_g", |c| c.network_g.is_some())];
    match mode {
        RunMode::Train => requirements.extend([
            Requirement::new("datasets.train", |c| c.datasets.contains_key("train")),
            Requirement::new("train", |c| c.train.is_some()),
            Requirement::new("train.optim_g", |c| {
                c.train.as_ref().is_some_and(|t| t.optim_g.is_some())
            }),
            Requirement::new("train.scheduler", |c| {
                c.train.as_ref().is_some_and(|t| t.scheduler.is_some())
            }),
            Requirement::new("train.total_iter", |c| {
                c.train.as_ref().is_some_and(|t| t.total_iter.is_some())
            }),
            Requirement::new("train.pixel_opt", |c| {
                c.train.as_ref().is_some_and(|t| t.pixel_opt.is_some())
            }),
            Requirement::new("val.val_freq", |c| {
                c.val.as_ref().map_or(true, |v| v.val_freq.is_some())
            }),
        ]),
        RunMode::Test => requirements.extend([
            Requirement::new("datasets.test_*", has_eval_split),
            Requirement::new("path.pretrain_network_g", |c| {
                c.path.pretrain_network_g.is_some()
            }),
        ]),
    }
    requirements
}

// ---------------------------------------------------------------------------
// Datasets and storage
// ---------------------------------------------------------------------------

fn paired_dataset(_: &DatasetSpec) -> ConfigResult<DatasetHandler> {
    Ok(DatasetHandler {
        class: "PairedImageDataset",
        needs_gt: true,
        needs_lq: true,
        trainable: true,
    })
}

fn single_dataset(_: &DatasetSpec) -> ConfigResult<DatasetHandler> {
    Ok(DatasetHandler {
        class: "SingleImageDataset",
        needs_gt: false,
        needs_lq: true,
        trainable: false,
    })
}

fn disk_backend(_: &IoBackend) -> ConfigResult<IoHandler> {
    Ok(IoHandler {
        backend: "disk",
        root_extension: None,
    })
}

fn lmdb_backend(_: &IoBackend) -> ConfigResult<IoHandler> {
    Ok(IoHandler {
        backend: "lmdb",
        root_extension: Some("lmdb"),
    })
}

// ---------------------------------------------------------------------------
// Optimizers
// ---------------------------------------------------------------------------

const ADAM_BETAS: [f64; 2] = [0.9, 0.999];

fn checked_lr(spec: &OptimizerSpec) -> ConfigResult<f64> {
    let lr = spec.lr.ok_or_else(|| ConfigError::missing("train.optim_g.lr"))?;
    if !(lr > 0.0) || !lr.is_finite() {
        return Err(ConfigError::invalid(
            "train.optim_g.lr",
            format!("{lr} (must be > 0)"),
        ));
    }
    if !(spec.weight_decay >= 0.0) {
        return Err(ConfigError::invalid(
            "train.optim_g.weight_decay",
            format!("{} (must be >= 0)", spec.weight_decay),
        ));
    }
    Ok(lr)
}

fn checked_betas(spec: &OptimizerSpec) -> ConfigResult<[f64; 2]> {
    let betas = spec.betas.unwrap_or(ADAM_BETAS);
    if betas.iter().any(|b| !(0.0..1.0).contains(b)) {
        return Err(ConfigError::invalid(
            "train.optim_g.betas",
            format!("{betas:?} (each must be in [0, 1))"),
        ));
    }
    Ok(betas)
}

fn adam_family(kind: &'static str, spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    Ok(OptimizerPlan {
        kind,
        lr: checked_lr(spec)?,
        weight_decay: spec.weight_decay,
        betas: Some(checked_betas(spec)?),
        momentum: None,
    })
}

fn adam(spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    adam_family("Adam", spec)
}

fn adamw(spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    adam_family("AdamW", spec)
}

fn adamax(spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    adam_family("Adamax", spec)
}

fn momentum_family(kind: &'static str, spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    let lr = checked_lr(spec)?;
    let momentum = spec.momentum.unwrap_or(0.0);
    if !(0.0..1.0).contains(&momentum) {
        return Err(ConfigError::invalid(
            "train.optim_g.momentum",
            format!("{momentum} (must be in [0, 1))"),
        ));
    }
    Ok(OptimizerPlan {
        kind,
        lr,
        weight_decay: spec.weight_decay,
        betas: None,
        momentum: Some(momentum),
    })
}

fn sgd(spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    momentum_family("SGD", spec)
}

fn rmsprop(spec: &OptimizerSpec) -> ConfigResult<OptimizerPlan> {
    momentum_family("RMSprop", spec)
}

// ---------------------------------------------------------------------------
// Schedulers
// ---------------------------------------------------------------------------

fn base_lr(train: &TrainSection) -> ConfigResult<f64> {
    train
        .optim_g
        .as_ref()
        .and_then(|optim| optim.lr)
        .ok_or_else(|| ConfigError::missing("train.optim_g.lr"))
}

fn multistep(train: &TrainSection) -> ConfigResult<Box<dyn LrScheduler>> {
    let spec = train.scheduler.clone().unwrap_or_default();
    let gamma = spec.gamma.unwrap_or(0.1);
    if !(gamma > 0.0 && gamma <= 1.0) {
        return Err(ConfigError::invalid(
            "train.scheduler.gamma",
            format!("{gamma} (must be in (0, 1])"),
        ));
    }
    if spec.milestones.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ConfigError::invalid(
            "train.scheduler.milestones",
            format!("{:?} must be strictly increasing", spec.milestones),
        ));
    }
    if spec.milestones.first() == Some(&0) {
        return Err(ConfigError::invalid(
            "train.scheduler.milestones",
            "milestones must be positive",
        ));
    }

    let weights = if spec.restart_weights.is_empty() {
        vec![1.0; spec.restarts.len()]
    } else {
        spec.restart_weights.clone()
    };
    if weights.len() != spec.restarts.len() {
        return Err(ConfigError::invalid(
            "train.scheduler.restart_weights",
            format!(
                "has {} entries but restarts has {}",
                weights.len(),
                spec.restarts.len()
            ),
        ));
    }

    let schedule = MultiStepLR::new(base_lr(train)?, spec.milestones, gamma)
        .with_restarts(spec.restarts.into_iter().zip(weights).collect());
    Ok(Box::new(WarmupLR::new(Box::new(schedule), train.warmup())))
}

fn cosine_restart(train: &TrainSection) -> ConfigResult<Box<dyn LrScheduler>> {
    let spec = train.scheduler.clone().unwrap_or_default();
    if spec.periods.is_empty() {
        return Err(ConfigError::missing("train.scheduler.periods"));
    }
    if spec.periods.contains(&0) {
        return Err(ConfigError::invalid(
            "train.scheduler.periods",
            "every period must be positive",
        ));
    }
    let weights = if spec.restart_weights.is_empty() {
        vec![1.0; spec.periods.len()]
    } else {
        spec.restart_weights.clone()
    };
    if weights.len() != spec.periods.len() {
        return Err(ConfigError::invalid(
            "train.scheduler.restart_weights",
            format!(
                "has {} entries but periods has {}",
                weights.len(),
                spec.periods.len()
            ),
        ));
    }
    if !(spec.eta_min >= 0.0) {
        return Err(ConfigError::invalid(
            "train.scheduler.eta_min",
            format!("{} (must be >= 0)", spec.eta_min),
        ));
    }

    let schedule = CosineAnnealingRestartLR::new(base_lr(train)?, spec.periods, weights, spec.eta_min);
    Ok(Box::new(WarmupLR::new(Box::new(schedule), train.warmup())))
}

// ---------------------------------------------------------------------------
// Losses and metrics
// ---------------------------------------------------------------------------

fn loss(kind: &'static str, spec: &LossSpec) -> ConfigResult<LossPlan> {
    if !(spec.loss_weight >= 0.0) {
        return Err(ConfigError::invalid(
            "train.pixel_opt.loss_weight",
            format!("{} (must be >= 0)", spec.loss_weight),
        ));
    }
    Ok(LossPlan {
        kind,
        weight: spec.loss_weight,
        reduction: spec.reduction,
    })
}

fn l1_loss(spec: &LossSpec) -> ConfigResult<LossPlan> {
    loss("L1Loss", spec)
}

fn mse_loss(spec: &LossSpec) -> ConfigResult<LossPlan> {
    loss("MSELoss", spec)
}

fn charbonnier_loss(spec: &LossSpec) -> ConfigResult<LossPlan> {
    loss("CharbonnierLoss", spec)
}

fn metric(
    function: &'static str,
    default_better: Better,
    reference: bool,
    spec: &MetricSpec,
) -> ConfigResult<MetricPlan> {
    let better = match spec.better.as_deref() {
        None => default_better,
        Some("higher") => Better::Higher,
        Some("lower") => Better::Lower,
        Some(other) => {
            return Err(ConfigError::invalid(
                format!("val.metrics.{function}.better"),
                format!("'{other}' (expected 'higher' or 'lower')"),
            ))
        }
    };
    Ok(MetricPlan {
        function,
        crop_border: spec.crop_border,
        y_channel: spec.test_y_channel,
        better,
        reference,
    })
}

fn psnr(spec: &MetricSpec) -> ConfigResult<MetricPlan> {
    metric("calculate_psnr", Better::Higher, true, spec)
}

fn ssim(spec: &MetricSpec) -> ConfigResult<MetricPlan> {
    metric("calculate_ssim", Better::Higher, true, spec)
}

fn niqe(spec: &MetricSpec) -> ConfigResult<MetricPlan> {
    metric("calculate_niqe", Better::Lower, false, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SchedulerSpec;
    use approx::assert_abs_diff_eq;

    fn train_with(scheduler: SchedulerSpec) -> TrainSection {
        TrainSection {
            optim_g: Some(OptimizerSpec {
                kind: "Adam".into(),
                lr: Some(2e-4),
                ..Default::default()
            }),
            scheduler: Some(scheduler),
            total_iter: Some(1_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_builtin_tags() {
        let registries = Registries::builtin();
        assert_eq!(registries.models.tags(), vec!["SRModel"]);
        assert!(registries.networks.contains("LAMNet"));
        assert!(registries.schedulers.contains("MultiStepRestartLR"));
        assert!(!registries.optimizers.contains("Lion"));
    }

    #[test]
    fn test_adam_fills_default_betas() {
        let spec = OptimizerSpec {
            kind: "Adam".into(),
            lr: Some(5e-4),
            ..Default::default()
        };
        let plan = Registries::builtin().optimizers.build("train.optim_g.type", "Adam", &spec).unwrap();
        assert_eq!(plan.betas, Some(ADAM_BETAS));
        assert_eq!(plan.momentum, None);
    }

    #[test]
    fn test_optimizer_without_lr_is_missing_field() {
        let spec = OptimizerSpec {
            kind: "Adam".into(),
            ..Default::default()
        };
        let err = Registries::builtin().optimizers.build("t", "Adam", &spec).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "train.optim_g.lr"));
    }

    #[test]
    fn test_beta_out_of_range_rejected() {
        let spec = OptimizerSpec {
            kind: "Adam".into(),
            lr: Some(1e-3),
            betas: Some([0.9, 1.0]),
            ..Default::default()
        };
        let err = Registries::builtin().optimizers.build("t", "Adam", &spec).unwrap_err();
        assert_eq!(err.field(), Some("train.optim_g.betas"));
    }

    #[test]
    fn test_sgd_momentum_default() {
        let spec = OptimizerSpec {
            kind: "SGD".into(),
            lr: Some(0.1),
            ..Default::default()
        };
        let plan = Registries::builtin().optimizers.build("t", "SGD", &spec).unwrap();
        assert_eq!(plan.momentum, Some(0.0));
        assert!(plan.betas.is_none());
    }

    #[test]
    fn test_multistep_schedule_built_with_base_lr() {
        let train = train_with(SchedulerSpec {
            kind: "MultiStepLR".into(),
            milestones: vec![500],
            gamma: Some(0.5),
            ..Default::default()
        });
        let schedule = Registries::builtin().schedulers.build("t", "MultiStepLR", &train).unwrap();
        assert_abs_diff_eq!(schedule.lr_at(0), 2e-4, epsilon = 1e-15);
        assert_abs_diff_eq!(schedule.lr_at(500), 1e-4, epsilon = 1e-15);
        assert_eq!(schedule.milestones(), vec![500]);
    }

    #[test]
    fn test_unsorted_milestones_rejected() {
        let train = train_with(SchedulerSpec {
            kind: "MultiStepLR".into(),
            milestones: vec![500, 200],
            gamma: Some(0.5),
            ..Default::default()
        });
        let err = Registries::builtin().schedulers.build("t", "MultiStepLR", &train).unwrap_err();
        assert_eq!(err.field(), Some("train.scheduler.milestones"));
    }

    #[test]
    fn test_gamma_above_one_rejected() {
        let train = train_with(SchedulerSpec {
            kind: "MultiStepLR".into(),
            milestones: vec![500],
            gamma: Some(2.0),
            ..Default::default()
        });
        assert!(Registries::builtin().schedulers.build("t", "MultiStepLR", &train).is_err());
    }

    #[test]
    fn test_cosine_requires_periods() {
        let train = train_with(SchedulerSpec {
            kind: "CosineAnnealingRestartLR".into(),
            ..Default::default()
        });
        let err = Registries::builtin()
            .schedulers
            .build("t", "CosineAnnealingRestartLR", &train)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_cosine_weight_count_must_match() {
        let train = train_with(SchedulerSpec {
            kind: "CosineAnnealingRestartLR".into(),
            periods: vec![500, 500],
            restart_weights: vec![1.0],
            ..Default::default()
        });
        let err = Registries::builtin()
            .schedulers
            .build("t", "CosineAnnealingRestartLR", &train)
            .unwrap_err();
        assert_eq!(err.field(), Some("train.scheduler.restart_weights"));
    }

    #[test]
    fn test_warmup_wraps_schedule() {
        let mut train = train_with(SchedulerSpec {
            kind: "MultiStepLR".into(),
            milestones: vec![500],
            gamma: Some(0.5),
            ..Default::default()
        });
        train.warmup_iter = 100;
        let schedule = Registries::builtin().schedulers.build("t", "MultiStepLR", &train).unwrap();
        assert_abs_diff_eq!(schedule.lr_at(50), 1e-4, epsilon = 1e-15);
        assert_eq!(schedule.milestones(), vec![500]);
    }

    #[test]
    fn test_niqe_is_no_reference_lower_better() {
        let plan = Registries::builtin()
            .metrics
            .build("t", "calculate_niqe", &MetricSpec::default())
            .unwrap();
        assert!(!plan.reference);
        assert_eq!(plan.better, Better::Lower);
    }

    #[test]
    fn test_metric_better_override() {
        let spec = MetricSpec {
            kind: "calculate_psnr".into(),
            better: Some("sideways".into()),
            ..Default::default()
        };
        assert!(Registries::builtin().metrics.build("t", "calculate_psnr", &spec).is_err());
    }

    #[test]
    fn test_negative_loss_weight_rejected() {
        let spec = LossSpec {
            kind: "L1Loss".into(),
            loss_weight: -1.0,
            reduction: Default::default(),
        };
        assert!(Registries::builtin().losses.build("t", "L1Loss", &spec).is_err());
    }
}
