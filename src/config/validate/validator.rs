//! Configuration validation logic
//!
//! Checks run in a fixed order and the first failure wins:
//! identity, model driver, driver requirements, network, datasets, training,
//! validation, logging, scale consistency, then path existence. Scale comes
//! before paths so a wrong `x4` directory is reported as a scale error even
//! when it is also missing.

use super::context::ValidationContext;
use super::error::{ConfigError, ConfigResult};
use super::scale;
use crate::config::plan::{ExperimentPlan, MetricPlan, ModelDriver, RunMode, SplitPlan};
use crate::config::registry::Registries;
use crate::config::schema::{DatasetSpec, ExperimentConfig, Phase, TrainSection};
use crate::network::LamNetPlan;
use crate::schedule::LrScheduler;
use std::collections::BTreeMap;
use std::path::Path;

/// Validate an experiment configuration and build its plan
///
/// Checks:
/// - Keys the selected driver needs for the run mode are present
/// - Every `type` tag is registered
/// - Numeric values are in valid ranges
/// - Scale markers agree with the top-level `scale`
/// - Dataset roots and checkpoints exist (when `ctx.check_paths`)
pub fn validate_config(
    config: &ExperimentConfig,
    ctx: &ValidationContext,
    registries: &Registries,
) -> ConfigResult<ExperimentPlan> {
    let mode = ctx.mode.unwrap_or_else(|| RunMode::infer(config));
    tracing::debug!(name = %config.name, %mode, "validating experiment");

    let validator = Validator {
        config,
        ctx,
        registries,
        mode,
    };
    validator.run()
}

struct Validator<'a> {
    config: &'a ExperimentConfig,
    ctx: &'a ValidationContext,
    registries: &'a Registries,
    mode: RunMode,
}

impl Validator<'_> {
    fn run(&self) -> ConfigResult<ExperimentPlan> {
        let scale = self.check_identity()?;
        let driver = self.check_driver()?;
        self.check_requirements(&driver)?;
        let network = self.check_network()?;
        let splits = self.check_datasets(scale)?;

        let (optimizer, schedule, loss) = match (&self.config.train, self.mode) {
            (Some(train), RunMode::Train) => {
                let optim = train
                    .optim_g
                    .as_ref()
                    .ok_or_else(|| ConfigError::missing("train.optim_g"))?;
                let optimizer = self.registries.optimizers.build(
                    "train.optim_g.type",
                    required_type(&optim.kind, "train.optim_g.type")?,
                    optim,
                )?;
                let schedule = self.check_schedule(train)?;
                let pixel = train
                    .pixel_opt
                    .as_ref()
                    .ok_or_else(|| ConfigError::missing("train.pixel_opt"))?;
                let loss = self.registries.losses.build(
                    "train.pixel_opt.type",
                    required_type(&pixel.kind, "train.pixel_opt.type")?,
                    pixel,
                )?;
                (Some(optimizer), Some(schedule), Some(loss))
            }
            (Some(_), RunMode::Test) => {
                tracing::debug!("test run: ignoring train section");
                (None, None, None)
            }
            (None, _) => (None, None, None),
        };

        let metrics = self.check_val()?;
        self.check_logger()?;
        self.check_scale(scale)?;
        if self.ctx.check_paths {
            self.check_paths()?;
        }

        Ok(ExperimentPlan {
            mode: self.mode,
            driver,
            network,
            splits,
            optimizer,
            schedule,
            loss,
            metrics,
        })
    }

    fn check_identity(&self) -> ConfigResult<u32> {
        if self.config.name.trim().is_empty() {
            return Err(ConfigError::missing("name"));
        }
        if self.config.model_type.is_empty() {
            return Err(ConfigError::missing("model_type"));
        }
        let scale = self.config.scale.ok_or_else(|| ConfigError::missing("scale"))?;
        if scale == 0 {
            return Err(ConfigError::invalid("scale", "must be positive"));
        }
        Ok(scale)
    }

    fn check_driver(&self) -> ConfigResult<ModelDriver> {
        self.registries
            .models
            .build("model_type", &self.config.model_type, self.config)
    }

    fn check_requirements(&self, driver: &ModelDriver) -> ConfigResult<()> {
        match driver.missing(self.config, self.mode).first() {
            Some(key) => Err(ConfigError::missing(*key)),
            None => Ok(()),
        }
    }

    fn check_network(&self) -> ConfigResult<LamNetPlan> {
        let spec = self
            .config
            .network_g
            .as_ref()
            .ok_or_else(|| ConfigError::missing("network_g"))?;
        let plan = self.registries.networks.build(
            "network_g.type",
            required_type(&spec.kind, "network_g.type")?,
            spec,
        )?;

        if self.config.path.param_key_g.trim().is_empty() {
            return Err(ConfigError::invalid(
                "path.param_key_g",
                "must name a key in the checkpoint (e.g. params or params_ema)",
            ));
        }
        Ok(plan)
    }

    fn check_datasets(&self, scale: u32) -> ConfigResult<BTreeMap<String, SplitPlan>> {
        let mut splits = BTreeMap::new();
        for (split, spec) in &self.config.datasets {
            let plan = self.check_dataset(split, spec, scale)?;
            splits.insert(split.clone(), plan);
        }
        Ok(splits)
    }

    fn check_dataset(&self, split: &str, spec: &DatasetSpec, scale: u32) -> ConfigResult<SplitPlan> {
        let key = format!("datasets.{split}");
        let phase = Phase::of_split(split).ok_or_else(|| {
            ConfigError::invalid(
                key.clone(),
                "split names must start with train, val or test",
            )
        })?;
        if phase == Phase::Train && split != "train" {
            return Err(ConfigError::invalid(
                key,
                "the training split must be named exactly 'train'",
            ));
        }

        let type_key = format!("{key}.type");
        let handler = self.registries.datasets.build(
            &type_key,
            required_type(&spec.kind, &type_key)?,
            spec,
        )?;
        if phase == Phase::Train && !handler.trainable {
            return Err(ConfigError::invalid(
                type_key,
                format!("{} cannot serve a training split", handler.class),
            ));
        }
        if handler.needs_gt && spec.dataroot_gt.is_none() {
            return Err(ConfigError::missing(format!("{key}.dataroot_gt")));
        }
        if handler.needs_lq && spec.dataroot_lq.is_none() {
            return Err(ConfigError::missing(format!("{key}.dataroot_lq")));
        }

        let backend = spec
            .io_backend
            .as_ref()
            .ok_or_else(|| ConfigError::missing(format!("{key}.io_backend")))?;
        let backend_key = format!("{key}.io_backend.type");
        let io = self.registries.io_backends.build(
            &backend_key,
            required_type(&backend.kind, &backend_key)?,
            backend,
        )?;
        if let Some(ext) = io.root_extension {
            for (field, root) in roots(spec) {
                if root.extension().and_then(|e| e.to_str()) != Some(ext) {
                    return Err(ConfigError::invalid(
                        format!("{key}.{field}"),
                        format!("{} backend roots must end in .{ext}", io.backend),
                    ));
                }
            }
        }

        if phase == Phase::Train {
            check_training_split(&key, spec, scale)?;
        }

        Ok(SplitPlan { phase, handler, io })
    }

    fn check_schedule(&self, train: &TrainSection) -> ConfigResult<Box<dyn LrScheduler>> {
        let total = train
            .total_iter
            .ok_or_else(|| ConfigError::missing("train.total_iter"))?;
        if total == 0 {
            return Err(ConfigError::invalid("train.total_iter", "must be positive"));
        }
        if train.warmup_iter < -1 {
            return Err(ConfigError::invalid(
                "train.warmup_iter",
                format!("{} (use -1 to disable warm-up)", train.warmup_iter),
            ));
        }
        if train.warmup().is_some_and(|warmup| warmup >= total) {
            return Err(ConfigError::invalid(
                "train.warmup_iter",
                format!("{} must be below total_iter ({total})", train.warmup_iter),
            ));
        }
        if let Some(decay) = train.ema_decay {
            if !(0.0..1.0).contains(&decay) {
                return Err(ConfigError::invalid(
                    "train.ema_decay",
                    format!("{decay} (must be in [0, 1))"),
                ));
            }
        }

        let scheduler = train
            .scheduler
            .as_ref()
            .ok_or_else(|| ConfigError::missing("train.scheduler"))?;
        let schedule = self.registries.schedulers.build(
            "train.scheduler.type",
            required_type(&scheduler.kind, "train.scheduler.type")?,
            train,
        )?;

        for milestone in schedule.milestones() {
            if milestone > total {
                tracing::warn!(
                    milestone,
                    total_iter = total,
                    "scheduler milestone lies beyond total_iter and never fires"
                );
            }
        }
        Ok(schedule)
    }

    fn check_val(&self) -> ConfigResult<BTreeMap<String, MetricPlan>> {
        let mut metrics = BTreeMap::new();
        let Some(val) = &self.config.val else {
            return Ok(metrics);
        };
        if val.val_freq == Some(0) {
            return Err(ConfigError::invalid("val.val_freq", "must be positive"));
        }
        for (name, spec) in &val.metrics {
            let type_key = format!("val.metrics.{name}.type");
            let plan = self
                .registries
                .metrics
                .build(&type_key, required_type(&spec.kind, &type_key)?, spec)
                .map_err(|err| match err {
                    // constructors only know the metric function, not the key
                    ConfigError::InvalidValue { field, message }
                        if field.ends_with(".better") =>
                    {
                        ConfigError::invalid(format!("val.metrics.{name}.better"), message)
                    }
                    other => other,
                })?;
            metrics.insert(name.clone(), plan);
        }
        Ok(metrics)
    }

    fn check_logger(&self) -> ConfigResult<()> {
        let Some(logger) = &self.config.logger else {
            return Ok(());
        };
        if logger.print_freq == 0 {
            return Err(ConfigError::invalid("logger.print_freq", "must be positive"));
        }
        if logger.save_checkpoint_freq == 0 {
            return Err(ConfigError::invalid(
                "logger.save_checkpoint_freq",
                "must be positive",
            ));
        }
        let wandb_project = logger.wandb.as_ref().and_then(|w| w.project.as_deref());
        if wandb_project.is_some() && !logger.use_tb_logger {
            return Err(ConfigError::invalid(
                "logger.wandb.project",
                "wandb syncs the tensorboard logs; set logger.use_tb_logger: true",
            ));
        }
        Ok(())
    }

    fn check_scale(&self, scale: u32) -> ConfigResult<()> {
        if let Some(network) = &self.config.network_g {
            if network.upscale != scale {
                return Err(ConfigError::InconsistentScale {
                    field: "network_g.upscale".into(),
                    expected: scale,
                    found: network.upscale,
                });
            }
        }

        for (split, spec) in &self.config.datasets {
            for (field, root) in roots(spec) {
                if let Some(found) = scale::conflicting_marker(root, scale) {
                    return Err(ConfigError::InconsistentScale {
                        field: format!("datasets.{split}.{field}"),
                        expected: scale,
                        found,
                    });
                }
            }
            if let Some(found) = spec
                .filename_tmpl
                .as_deref()
                .and_then(scale::marker_in_name)
                .filter(|&found| found != scale)
            {
                return Err(ConfigError::InconsistentScale {
                    field: format!("datasets.{split}.filename_tmpl"),
                    expected: scale,
                    found,
                });
            }
        }
        Ok(())
    }

    fn check_paths(&self) -> ConfigResult<()> {
        for (split, spec) in &self.config.datasets {
            for (field, root) in roots(spec) {
                self.require_exists(&format!("datasets.{split}.{field}"), root)?;
            }
            if let Some(meta) = &spec.meta_info_file {
                self.require_exists(&format!("datasets.{split}.meta_info_file"), meta)?;
            }
        }
        if let Some(pretrain) = &self.config.path.pretrain_network_g {
            self.require_exists("path.pretrain_network_g", pretrain)?;
        }
        if let Some(state) = &self.config.path.resume_state {
            self.require_exists("path.resume_state", state)?;
        }
        Ok(())
    }

    fn require_exists(&self, field: &str, path: &Path) -> ConfigResult<()> {
        let resolved = self.ctx.resolve(path);
        if resolved.exists() {
            Ok(())
        } else {
            Err(ConfigError::UnresolvedPath {
                field: field.to_string(),
                path: resolved,
            })
        }
    }
}

/// `kind` unless empty, in which case the `type` key is missing.
fn required_type<'s>(kind: &'s str, field: &str) -> ConfigResult<&'s str> {
    if kind.is_empty() {
        Err(ConfigError::missing(field))
    } else {
        Ok(kind)
    }
}

/// Declared data roots of a split, GT first.
fn roots(spec: &DatasetSpec) -> impl Iterator<Item = (&'static str, &Path)> {
    [
        ("dataroot_gt", spec.dataroot_gt.as_deref()),
        ("dataroot_lq", spec.dataroot_lq.as_deref()),
    ]
    .into_iter()
    .filter_map(|(field, root)| root.map(|root| (field, root)))
}

fn check_training_split(key: &str, spec: &DatasetSpec, scale: u32) -> ConfigResult<()> {
    let gt_size = spec
        .gt_size
        .ok_or_else(|| ConfigError::missing(format!("{key}.gt_size")))?;
    if gt_size == 0 || gt_size % scale != 0 {
        return Err(ConfigError::invalid(
            format!("{key}.gt_size"),
            format!("{gt_size} must be a positive multiple of scale ({scale})"),
        ));
    }

    let batch = spec
        .batch_size_per_gpu
        .ok_or_else(|| ConfigError::missing(format!("{key}.batch_size_per_gpu")))?;
    if batch == 0 {
        return Err(ConfigError::invalid(
            format!("{key}.batch_size_per_gpu"),
            "must be positive",
        ));
    }
    if spec.num_worker_per_gpu.is_none() {
        return Err(ConfigError::missing(format!("{key}.num_worker_per_gpu")));
    }
    if spec.dataset_enlarge_ratio == Some(0) {
        return Err(ConfigError::invalid(
            format!("{key}.dataset_enlarge_ratio"),
            "must be positive",
        ));
    }
    Ok(())
}
