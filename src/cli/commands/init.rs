//! Init command implementation
//!
//! Writes a starter experiment built from the published LAMNet settings:
//! DF2K training with Set5 validation, or evaluation on the five standard
//! benchmarks. The generated document is validated (without path checks)
//! before it is written.

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    to_yaml, validate_config, ConfigError, DatasetSpec, DistParams, ExperimentConfig, GpuCount,
    InitArgs, InitTemplate, IoBackend, LoggerSpec, LossSpec, MetricSpec, NetworkSpec,
    OptimizerSpec, PathSpec, Registries, SchedulerSpec, TrainSection, ValSection,
    ValidationContext,
};
use crate::Error;
use std::collections::BTreeMap;
use std::path::PathBuf;

const BENCHMARKS: [&str; 5] = ["Set5", "Set14", "B100", "Urban100", "Manga109"];

/// LQ training patch side; the GT crop is this times the scale.
const LQ_PATCH: u32 = 64;

/// Default experiment name for a template
pub fn default_name(template: InitTemplate, scale: u32) -> String {
    match template {
        InitTemplate::Train => format!("train_LAMNet_SRx{scale}"),
        InitTemplate::Test => format!("test_LAMNet_x{scale}"),
    }
}

fn lamnet(scale: u32) -> NetworkSpec {
    NetworkSpec {
        dim: 64,
        num_blocks: 6,
        num_groups: 4,
        kernel_size: 13,
        kernel_loc: vec![4, 6, 7],
        kernel_stride: vec![1, 2, 4],
        num_head: 4,
        upscale: scale,
        ..NetworkSpec::default()
    }
}

fn benchmark(name: &str, scale: u32) -> DatasetSpec {
    let root = PathBuf::from("datasets/Benchmarks").join(name);
    DatasetSpec {
        name: name.to_string(),
        kind: "PairedImageDataset".to_string(),
        dataroot_gt: Some(root.join("HR")),
        dataroot_lq: Some(root.join("LR_bicubic").join(format!("X{scale}"))),
        filename_tmpl: Some(format!("{{}}x{scale}")),
        io_backend: Some(IoBackend {
            kind: "disk".to_string(),
        }),
        ..DatasetSpec::default()
    }
}

fn metrics(scale: u32) -> BTreeMap<String, MetricSpec> {
    ["psnr", "ssim"]
        .into_iter()
        .map(|name| {
            let spec = MetricSpec {
                kind: format!("calculate_{name}"),
                crop_border: scale,
                test_y_channel: true,
                better: None,
            };
            (name.to_string(), spec)
        })
        .collect()
}

fn train_template(name: String, scale: u32, gt_size: u32) -> ExperimentConfig {
    let train_split = DatasetSpec {
        name: "DF2K".to_string(),
        kind: "PairedImageDataset".to_string(),
        dataroot_gt: Some(PathBuf::from("datasets/DF2K/HR")),
        dataroot_lq: Some(PathBuf::from(format!("datasets/DF2K/LR_bicubic/X{scale}"))),
        filename_tmpl: Some(format!("{{}}x{scale}")),
        io_backend: Some(IoBackend {
            kind: "disk".to_string(),
        }),
        gt_size: Some(gt_size),
        use_hflip: true,
        use_rot: true,
        use_shuffle: true,
        num_worker_per_gpu: Some(8),
        batch_size_per_gpu: Some(16),
        dataset_enlarge_ratio: Some(1),
        prefetch_mode: None,
        ..DatasetSpec::default()
    };

    let mut datasets = BTreeMap::new();
    datasets.insert("train".to_string(), train_split);
    datasets.insert("val_Set5".to_string(), benchmark("Set5", scale));

    ExperimentConfig {
        name,
        model_type: "SRModel".to_string(),
        scale: Some(scale),
        num_gpu: GpuCount::Auto,
        manual_seed: Some(10),
        datasets,
        network_g: Some(lamnet(scale)),
        path: PathSpec::default(),
        train: Some(TrainSection {
            ema_decay: Some(0.999),
            optim_g: Some(OptimizerSpec {
                kind: "Adam".to_string(),
                lr: Some(5e-4),
                weight_decay: 0.0,
                betas: Some([0.9, 0.99]),
                momentum: None,
            }),
            scheduler: Some(SchedulerSpec {
                kind: "MultiStepLR".to_string(),
                milestones: vec![250_000, 400_000, 450_000, 475_000],
                gamma: Some(0.5),
                ..SchedulerSpec::default()
            }),
            total_iter: Some(500_000),
            warmup_iter: -1,
            pixel_opt: Some(LossSpec {
                kind: "L1Loss".to_string(),
                loss_weight: 1.0,
                reduction: Default::default(),
            }),
        }),
        val: Some(ValSection {
            val_freq: Some(5_000),
            save_img: false,
            suffix: None,
            pbar: false,
            metrics: metrics(scale),
        }),
        logger: Some(LoggerSpec {
            use_tb_logger: true,
            ..LoggerSpec::default()
        }),
        dist_params: Some(DistParams::default()),
    }
}

fn test_template(name: String, scale: u32) -> ExperimentConfig {
    let datasets = BENCHMARKS
        .iter()
        .enumerate()
        .map(|(i, bench)| (format!("test_{}", i + 1), benchmark(bench, scale)))
        .collect();

    ExperimentConfig {
        name,
        model_type: "SRModel".to_string(),
        scale: Some(scale),
        num_gpu: GpuCount::Count(1),
        manual_seed: Some(10),
        datasets,
        network_g: Some(lamnet(scale)),
        path: PathSpec {
            pretrain_network_g: Some(PathBuf::from(format!(
                "experiments/pretrained_models/LAMNet_x{scale}.pth"
            ))),
            ..PathSpec::default()
        },
        train: None,
        val: Some(ValSection {
            val_freq: None,
            save_img: true,
            suffix: None,
            pbar: false,
            metrics: metrics(scale),
        }),
        logger: None,
        dist_params: None,
    }
}

/// Build and validate the document for `template`.
pub fn render_template(
    template: InitTemplate,
    scale: u32,
    name: Option<String>,
) -> crate::Result<ExperimentConfig> {
    if scale == 0 {
        return Err(ConfigError::invalid("scale", "must be positive").into());
    }
    let gt_size = scale.checked_mul(LQ_PATCH).ok_or_else(|| {
        ConfigError::invalid("scale", format!("x{scale} overflows the {LQ_PATCH}px training patch"))
    })?;
    let name = name.unwrap_or_else(|| default_name(template, scale));
    let config = match template {
        InitTemplate::Train => train_template(name, scale, gt_size),
        InitTemplate::Test => test_template(name, scale),
    };

    let ctx = ValidationContext::default().with_path_checks(false);
    validate_config(&config, &ctx, &Registries::builtin())?;
    Ok(config)
}

pub fn run_init(args: InitArgs, level: LogLevel) -> crate::Result<()> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Generating {} template for x{}", args.template, args.scale),
    );

    let config = render_template(args.template, args.scale, args.name)?;
    let yaml = to_yaml(&config)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &yaml)
                .map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
            log(
                level,
                LogLevel::Normal,
                &format!("Wrote {}", path.display()),
            );
        }
        None => print!("{yaml}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, RunMode};

    #[test]
    fn test_default_names() {
        assert_eq!(default_name(InitTemplate::Train, 4), "train_LAMNet_SRx4");
        assert_eq!(default_name(InitTemplate::Test, 3), "test_LAMNet_x3");
    }

    #[test]
    fn test_train_template_for_every_scale() {
        for scale in [2, 3, 4] {
            let config = render_template(InitTemplate::Train, scale, None).unwrap();
            let train = &config.datasets["train"];
            assert_eq!(train.gt_size, Some(LQ_PATCH * scale));
            assert_eq!(train.filename_template(), format!("{{}}x{scale}"));
            assert_eq!(config.network_g.as_ref().unwrap().upscale, scale);
        }
    }

    #[test]
    fn test_test_template_has_five_benchmarks() {
        let config = render_template(InitTemplate::Test, 3, Some("bench".into())).unwrap();
        assert_eq!(config.name, "bench");
        assert_eq!(config.datasets.len(), 5);
        assert!(config.train.is_none());
        assert_eq!(RunMode::infer(&config), RunMode::Test);
    }

    #[test]
    fn test_zero_scale_rejected() {
        let err = render_template(InitTemplate::Train, 0, None).unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[test]
    fn test_oversized_scale_rejected() {
        for template in [InitTemplate::Train, InitTemplate::Test] {
            let err = render_template(template, 100_000_000, None).unwrap_err();
            assert_eq!(err.code(), "E007");
        }
    }

    #[test]
    fn test_rendered_yaml_parses_back() {
        let config = render_template(InitTemplate::Train, 2, None).unwrap();
        let yaml = to_yaml(&config).unwrap();
        assert_eq!(parse_config(&yaml).unwrap(), config);
    }
}
