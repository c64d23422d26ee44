//! Property-based tests for configuration validation

use super::context::ValidationContext;
use super::error::ConfigError;
use super::validator::validate_config;
use crate::config::registry::Registries;
use crate::config::schema::*;
use proptest::prelude::*;

fn train_yaml(scale: u32, patch: u32, batch: u32, lr: f64, warmup: i64) -> String {
    format!(
        r"
name: prop_x{scale}
model_type: SRModel
scale: {scale}
datasets:
  train:
    name: DF2K
    type: PairedImageDataset
    dataroot_gt: datasets/DF2K/HR
    dataroot_lq: datasets/DF2K/LR_bicubic/X{scale}
    filename_tmpl: '{{}}x{scale}'
    io_backend:
      type: disk
    gt_size: {gt_size}
    num_worker_per_gpu: 4
    batch_size_per_gpu: {batch}
network_g:
  type: LAMNet
  dim: 64
  kernel_size: 13
  kernel_loc: [4, 6, 7]
  kernel_stride: [1, 2, 4]
  upscale: {scale}
train:
  optim_g:
    type: Adam
    lr: {lr}
  scheduler:
    type: MultiStepLR
    milestones: [1000, 2000]
    gamma: 0.5
  total_iter: 3000
  warmup_iter: {warmup}
  pixel_opt:
    type: L1Loss
",
        gt_size = patch * scale,
    )
}

fn validate(config: &ExperimentConfig) -> Result<(), ConfigError> {
    let ctx = ValidationContext::default().with_path_checks(false);
    validate_config(config, &ctx, &Registries::builtin()).map(|_| ())
}

fn parse(yaml: &str) -> ExperimentConfig {
    serde_yaml::from_str(yaml).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_consistent_config_validates(
        scale in 1u32..=4,
        patch in 16u32..=96,
        batch in 1u32..=64,
        lr in 1e-6f64..1e-2,
        warmup in -1i64..3000,
    ) {
        let config = parse(&train_yaml(scale, patch, batch, lr, warmup));
        prop_assert!(validate(&config).is_ok());
    }

    #[test]
    fn prop_mismatched_upscale_is_inconsistent(
        scale in 1u32..=4,
        other in 1u32..=4,
    ) {
        prop_assume!(scale != other);
        let mut config = parse(&train_yaml(scale, 48, 16, 5e-4, -1));
        config.network_g.as_mut().unwrap().upscale = other;
        match validate(&config) {
            Err(ConfigError::InconsistentScale { expected, found, .. }) => {
                prop_assert_eq!(expected, scale);
                prop_assert_eq!(found, other);
            }
            other => prop_assert!(false, "expected InconsistentScale, got {:?}", other),
        }
    }

    #[test]
    fn prop_gt_size_off_the_scale_grid_is_rejected(
        scale in 2u32..=4,
        patch in 16u32..=96,
        offset in 1u32..4,
    ) {
        prop_assume!(offset % scale != 0);
        let mut config = parse(&train_yaml(scale, patch, 16, 5e-4, -1));
        config.datasets.get_mut("train").unwrap().gt_size = Some(patch * scale + offset);
        let err = validate(&config).unwrap_err();
        prop_assert_eq!(err.field(), Some("datasets.train.gt_size"));
    }

    #[test]
    fn prop_warmup_never_moves_milestones(warmup in -1i64..1000) {
        let config = parse(&train_yaml(4, 48, 16, 5e-4, warmup));
        let ctx = ValidationContext::default().with_path_checks(false);
        let plan = validate_config(&config, &ctx, &Registries::builtin()).unwrap();
        prop_assert_eq!(plan.schedule.unwrap().milestones(), vec![1000, 2000]);
    }

    #[test]
    fn prop_serialized_config_validates_again(
        scale in 1u32..=4,
        patch in 16u32..=96,
        batch in 1u32..=64,
    ) {
        let config = parse(&train_yaml(scale, patch, batch, 2e-4, -1));
        let yaml = serde_yaml::to_string(&config).unwrap();
        let reparsed = parse(&yaml);
        prop_assert_eq!(&reparsed, &config);
        prop_assert!(validate(&reparsed).is_ok());
    }
}
