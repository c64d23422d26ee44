//! YAML schema definitions for LAMNet experiment configurations
//!
//! Mirrors the option files consumed by the BasicSR train/test drivers.
//! Keys whose presence depends on the run mode are optional here and
//! enforced by the validator, so a missing key surfaces as a
//! [`ConfigError::MissingField`](crate::config::ConfigError) with its dotted
//! path rather than as a bare parse error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Deserialize an iteration count that may be written as `5000`, `5000.0`
/// or `!!float 5e3`. Non-integral and negative values are rejected.
fn deserialize_count_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrFloat {
        Int(u64),
        Float(f64),
    }

    match IntOrFloat::deserialize(deserializer)? {
        IntOrFloat::Int(n) => Ok(n),
        IntOrFloat::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(f as u64)
        }
        IntOrFloat::Float(f) => Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {f}"
        ))),
    }
}

fn deserialize_opt_count_lenient<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_count_lenient")] u64);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(n)| n))
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn default_true() -> bool {
    true
}

/// GPU count: an explicit number or `auto` (use every visible device)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuCount {
    #[default]
    Auto,
    Count(u32),
}

impl Serialize for GpuCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GpuCount::Auto => serializer.serialize_str("auto"),
            GpuCount::Count(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for GpuCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CountOrString {
            Count(u32),
            Str(String),
        }

        match CountOrString::deserialize(deserializer)? {
            CountOrString::Count(n) => Ok(GpuCount::Count(n)),
            CountOrString::Str(s) if s.eq_ignore_ascii_case("auto") => Ok(GpuCount::Auto),
            CountOrString::Str(other) => Err(serde::de::Error::custom(format!(
                "expected a GPU count or 'auto', got '{other}'"
            ))),
        }
    }
}

/// Complete experiment configuration (one train or test run)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Unique run identifier; names the experiment/result directories
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Driver tag, e.g. `SRModel`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_type: String,

    /// Upscaling factor shared by datasets and network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    #[serde(default)]
    pub num_gpu: GpuCount,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_seed: Option<u64>,

    /// Split name (`train`, `val_Set5`, `test_1`, ...) to dataset descriptor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub datasets: BTreeMap<String, DatasetSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_g: Option<NetworkSpec>,

    #[serde(default)]
    pub path: PathSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<TrainSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub val: Option<ValSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<LoggerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist_params: Option<DistParams>,
}

/// Dataset phase, taken from the split-name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Train,
    Val,
    Test,
}

impl Phase {
    /// Phase of a split key: the text before the first `_`.
    pub fn of_split(split: &str) -> Option<Self> {
        match split.split('_').next().unwrap_or_default() {
            "train" => Some(Phase::Train),
            "val" => Some(Phase::Val),
            "test" => Some(Phase::Test),
            _ => None,
        }
    }
}

/// Dataset descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatasetSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Dataset class tag, e.g. `PairedImageDataset`
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataroot_gt: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataroot_lq: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info_file: Option<PathBuf>,

    /// Pattern mapping a GT stem to its LQ stem, e.g. `{}x4`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_tmpl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub io_backend: Option<IoBackend>,

    // === Training splits ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt_size: Option<u32>,

    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient",
        skip_serializing_if = "is_false"
    )]
    pub use_hflip: bool,

    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient",
        skip_serializing_if = "is_false"
    )]
    pub use_rot: bool,

    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient",
        skip_serializing_if = "is_false"
    )]
    pub use_shuffle: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_worker_per_gpu: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size_per_gpu: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_enlarge_ratio: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_mode: Option<String>,
}

impl DatasetSpec {
    /// Filename template, `{}` when unset.
    pub fn filename_template(&self) -> &str {
        self.filename_tmpl.as_deref().unwrap_or("{}")
    }
}

/// Storage backend the dataset reads from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IoBackend {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Generator network descriptor with LAMNet hyperparameters.
///
/// Defaults match the model constructor, so an omitted key behaves exactly
/// as it would in the external framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default = "default_in_chans")]
    pub in_chans: u32,

    /// Mixer blocks per group
    #[serde(default = "default_num_blocks")]
    pub num_blocks: u32,

    #[serde(default = "default_num_groups")]
    pub num_groups: u32,

    /// Feature channels
    #[serde(default = "default_dim")]
    pub dim: u32,

    #[serde(default = "default_kernel_size")]
    pub kernel_size: u32,

    /// One-sided tap index where each stride segment ends
    #[serde(default = "default_kernel_loc")]
    pub kernel_loc: Vec<u32>,

    #[serde(default = "default_kernel_stride")]
    pub kernel_stride: Vec<u32>,

    #[serde(default = "default_num_head")]
    pub num_head: u32,

    #[serde(default = "default_expansion_factor")]
    pub expansion_factor: f64,

    #[serde(default = "default_upscale")]
    pub upscale: u32,

    #[serde(default = "default_img_range")]
    pub img_range: f64,

    #[serde(default = "default_rgb_mean")]
    pub rgb_mean: [f64; 3],
}

impl Default for NetworkSpec {
    fn default() -> Self {
        Self {
            kind: "LAMNet".to_string(),
            in_chans: default_in_chans(),
            num_blocks: default_num_blocks(),
            num_groups: default_num_groups(),
            dim: default_dim(),
            kernel_size: default_kernel_size(),
            kernel_loc: default_kernel_loc(),
            kernel_stride: default_kernel_stride(),
            num_head: default_num_head(),
            expansion_factor: default_expansion_factor(),
            upscale: default_upscale(),
            img_range: default_img_range(),
            rgb_mean: default_rgb_mean(),
        }
    }
}

fn default_in_chans() -> u32 {
    3
}

fn default_num_blocks() -> u32 {
    4
}

fn default_num_groups() -> u32 {
    4
}

fn default_dim() -> u32 {
    48
}

fn default_kernel_size() -> u32 {
    11
}

fn default_kernel_loc() -> Vec<u32> {
    vec![3, 4, 5]
}

fn default_kernel_stride() -> Vec<u32> {
    vec![1, 2, 4]
}

fn default_num_head() -> u32 {
    4
}

fn default_expansion_factor() -> f64 {
    1.0
}

fn default_upscale() -> u32 {
    4
}

fn default_img_range() -> f64 {
    1.0
}

fn default_rgb_mean() -> [f64; 3] {
    [0.4488, 0.4371, 0.4040]
}

/// Checkpoint paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretrain_network_g: Option<PathBuf>,

    /// Key holding the weights inside the checkpoint (`params` or `params_ema`)
    #[serde(default = "default_param_key")]
    pub param_key_g: String,

    #[serde(default = "default_true", deserialize_with = "deserialize_bool_lenient")]
    pub strict_load_g: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_state: Option<PathBuf>,
}

impl Default for PathSpec {
    fn default() -> Self {
        Self {
            pretrain_network_g: None,
            param_key_g: default_param_key(),
            strict_load_g: true,
            resume_state: None,
        }
    }
}

fn default_param_key() -> String {
    "params".to_string()
}

/// Optimization settings, present only in training configs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ema_decay: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optim_g: Option<OptimizerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerSpec>,

    #[serde(
        default,
        deserialize_with = "deserialize_opt_count_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_iter: Option<u64>,

    /// Linear warm-up length in iterations; `-1` disables warm-up
    #[serde(default = "default_warmup_iter")]
    pub warmup_iter: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_opt: Option<LossSpec>,
}

impl Default for TrainSection {
    fn default() -> Self {
        Self {
            ema_decay: None,
            optim_g: None,
            scheduler: None,
            total_iter: None,
            warmup_iter: default_warmup_iter(),
            pixel_opt: None,
        }
    }
}

impl TrainSection {
    /// Warm-up length when enabled; `-1` and `0` both mean disabled.
    pub fn warmup(&self) -> Option<u64> {
        u64::try_from(self.warmup_iter).ok().filter(|&n| n > 0)
    }
}

fn default_warmup_iter() -> i64 {
    -1
}

/// Optimizer specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimizerSpec {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lr: Option<f64>,

    #[serde(default)]
    pub weight_decay: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub betas: Option<[f64; 2]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
}

/// Learning-rate scheduler specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchedulerSpec {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<u64>,

    /// Decay factor applied at each milestone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restarts: Vec<u64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restart_weights: Vec<f64>,

    /// Cosine cycle lengths
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<u64>,

    #[serde(default)]
    pub eta_min: f64,
}

/// Reduction applied to a per-pixel loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    None,
    #[default]
    Mean,
    Sum,
}

/// Loss specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossSpec {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(default = "default_loss_weight")]
    pub loss_weight: f64,

    #[serde(default)]
    pub reduction: Reduction,
}

fn default_loss_weight() -> f64 {
    1.0
}

/// Validation settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValSection {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_count_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub val_freq: Option<u64>,

    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub save_img: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_bool_lenient",
        skip_serializing_if = "is_false"
    )]
    pub pbar: bool,

    /// Metric name (`psnr`, `ssim`, ...) to descriptor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, MetricSpec>,
}

/// Image-quality metric descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSpec {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Pixels cropped from each border before scoring
    #[serde(default)]
    pub crop_border: u32,

    /// Score on the Y channel of YCbCr instead of RGB
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub test_y_channel: bool,

    /// `higher` or `lower`; inferred from the metric when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub better: Option<String>,
}

/// Logging cadence and experiment tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerSpec {
    #[serde(
        default = "default_print_freq",
        deserialize_with = "deserialize_count_lenient"
    )]
    pub print_freq: u64,

    #[serde(
        default = "default_checkpoint_freq",
        deserialize_with = "deserialize_count_lenient"
    )]
    pub save_checkpoint_freq: u64,

    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub use_tb_logger: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wandb: Option<WandbSpec>,
}

impl Default for LoggerSpec {
    fn default() -> Self {
        Self {
            print_freq: default_print_freq(),
            save_checkpoint_freq: default_checkpoint_freq(),
            use_tb_logger: false,
            wandb: None,
        }
    }
}

fn default_print_freq() -> u64 {
    100
}

fn default_checkpoint_freq() -> u64 {
    5000
}

/// Weights & Biases integration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WandbSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_id: Option<String>,
}

/// Process-group settings handed to the external launcher unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistParams {
    #[serde(default = "default_backend")]
    pub backend: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DistParams {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            port: default_port(),
        }
    }
}

fn default_backend() -> String {
    "nccl".to_string()
}

fn default_port() -> u16 {
    29500
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRAIN_X4: &str = r"
name: LAMNet_SRx4_DF2K
model_type: SRModel
scale: 4
num_gpu: auto
manual_seed: 10

datasets:
  train:
    name: DF2K
    type: PairedImageDataset
    dataroot_gt: datasets/DF2K/HR
    dataroot_lq: datasets/DF2K/LR_bicubic/X4
    filename_tmpl: '{}x4'
    io_backend:
      type: disk
    gt_size: 256
    use_hflip: true
    use_rot: true
    use_shuffle: true
    num_worker_per_gpu: 8
    batch_size_per_gpu: 16
    dataset_enlarge_ratio: 1
    prefetch_mode: ~
  val_Set5:
    name: Set5
    type: PairedImageDataset
    dataroot_gt: datasets/Benchmarks/Set5/HR
    dataroot_lq: datasets/Benchmarks/Set5/LR_bicubic/X4
    filename_tmpl: '{}x4'
    io_backend:
      type: disk

network_g:
  type: LAMNet
  dim: 64
  num_blocks: 6
  num_groups: 4
  kernel_size: 13
  kernel_loc: [4, 6, 7]
  kernel_stride: [1, 2, 4]
  num_head: 4
  expansion_factor: 1.0
  upscale: 4

path:
  pretrain_network_g: ~
  param_key_g: params_ema
  strict_load_g: true
  resume_state: ~

train:
  ema_decay: 0.999
  optim_g:
    type: Adam
    lr: !!float 5e-4
    weight_decay: 0
    betas: [0.9, 0.99]
  scheduler:
    type: MultiStepLR
    milestones: [250000, 400000, 450000, 475000]
    gamma: 0.5
  total_iter: 500000
  warmup_iter: -1
  pixel_opt:
    type: L1Loss
    loss_weight: 1.0
    reduction: mean

val:
  val_freq: !!float 5e3
  save_img: false
  metrics:
    psnr:
      type: calculate_psnr
      crop_border: 4
      test_y_channel: true

logger:
  print_freq: 100
  save_checkpoint_freq: !!float 5e3
  use_tb_logger: true
  wandb:
    project: ~
    resume_id: ~

dist_params:
  backend: nccl
  port: 29500
";

    #[test]
    fn test_deserialize_training_config() {
        let config: ExperimentConfig = serde_yaml::from_str(TRAIN_X4).unwrap();
        assert_eq!(config.name, "LAMNet_SRx4_DF2K");
        assert_eq!(config.scale, Some(4));
        assert_eq!(config.num_gpu, GpuCount::Auto);
        assert_eq!(config.datasets.len(), 2);

        let train = &config.datasets["train"];
        assert_eq!(train.kind, "PairedImageDataset");
        assert_eq!(train.gt_size, Some(256));
        assert!(train.use_hflip);
        assert_eq!(train.filename_template(), "{}x4");

        let network = config.network_g.as_ref().unwrap();
        assert_eq!(network.kernel_loc, vec![4, 6, 7]);
        assert_eq!(network.in_chans, 3);

        let section = config.train.as_ref().unwrap();
        assert_eq!(section.optim_g.as_ref().unwrap().lr, Some(5e-4));
        assert_eq!(section.total_iter, Some(500_000));
        assert_eq!(section.warmup(), None);
    }

    #[test]
    fn test_float_tagged_counts_are_accepted() {
        let config: ExperimentConfig = serde_yaml::from_str(TRAIN_X4).unwrap();
        assert_eq!(config.val.as_ref().unwrap().val_freq, Some(5000));
        assert_eq!(config.logger.as_ref().unwrap().save_checkpoint_freq, 5000);
    }

    #[test]
    fn test_fractional_count_is_rejected() {
        let yaml = "print_freq: 12.5\n";
        let result: Result<LoggerSpec, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_network_defaults_match_constructor() {
        let network: NetworkSpec = serde_yaml::from_str("type: LAMNet\n").unwrap();
        assert_eq!(network, NetworkSpec::default());
        assert_eq!(network.dim, 48);
        assert_eq!(network.upscale, 4);
        assert_eq!(network.kernel_stride, vec![1, 2, 4]);
    }

    #[test]
    fn test_path_defaults() {
        let path = PathSpec::default();
        assert_eq!(path.param_key_g, "params");
        assert!(path.strict_load_g);
        assert!(path.pretrain_network_g.is_none());
    }

    #[test]
    fn test_gpu_count_forms() {
        let n: GpuCount = serde_yaml::from_str("2").unwrap();
        assert_eq!(n, GpuCount::Count(2));
        let auto: GpuCount = serde_yaml::from_str("auto").unwrap();
        assert_eq!(auto, GpuCount::Auto);
        assert!(serde_yaml::from_str::<GpuCount>("many").is_err());
    }

    #[test]
    fn test_quoted_booleans_deserialize() {
        let yaml = r#"
type: PairedImageDataset
use_hflip: "true"
use_rot: "false"
"#;
        let dataset: DatasetSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(dataset.use_hflip);
        assert!(!dataset.use_rot);
    }

    #[test]
    fn test_phase_from_split_name() {
        assert_eq!(Phase::of_split("train"), Some(Phase::Train));
        assert_eq!(Phase::of_split("val_Set5"), Some(Phase::Val));
        assert_eq!(Phase::of_split("test_1"), Some(Phase::Test));
        assert_eq!(Phase::of_split("bench_Set5"), None);
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Train).unwrap(), "\"train\"");
        assert_eq!(serde_yaml::to_string(&Phase::Val).unwrap(), "val\n");
    }

    #[test]
    fn test_warmup_disabled_forms() {
        let mut section = TrainSection::default();
        assert_eq!(section.warmup_iter, -1);
        assert_eq!(section.warmup(), None);
        section.warmup_iter = 0;
        assert_eq!(section.warmup(), None);
        section.warmup_iter = 2000;
        assert_eq!(section.warmup(), Some(2000));
    }

    #[test]
    fn test_unknown_reduction_is_rejected() {
        let yaml = "type: L1Loss\nreduction: median\n";
        assert!(serde_yaml::from_str::<LossSpec>(yaml).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_preserves_structure() {
        let config: ExperimentConfig = serde_yaml::from_str(TRAIN_X4).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let reparsed: ExperimentConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, reparsed);
    }
}
