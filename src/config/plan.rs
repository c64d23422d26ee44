//! Handlers built from a validated configuration
//!
//! Each registered tag constructs one of these. Together they form the
//! [`ExperimentPlan`]: what the external driver would instantiate.

use crate::config::schema::{ExperimentConfig, Phase, Reduction};
use crate::network::LamNetPlan;
use crate::schedule::LrScheduler;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Whether the document drives a training or a testing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Train,
    Test,
}

impl RunMode {
    /// Training when a `train` section is present, testing otherwise.
    pub fn infer(config: &ExperimentConfig) -> Self {
        if config.train.is_some() {
            RunMode::Train
        } else {
            RunMode::Test
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(RunMode::Train),
            "test" => Ok(RunMode::Test),
            _ => Err(format!("Unknown run mode: {s}. Valid modes: train, test")),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Train => write!(f, "train"),
            RunMode::Test => write!(f, "test"),
        }
    }
}

/// A key the driver needs, with a presence check
#[derive(Clone, Copy)]
pub struct Requirement {
    pub key: &'static str,
    pub present: fn(&ExperimentConfig) -> bool,
}

impl Requirement {
    pub fn new(key: &'static str, present: fn(&ExperimentConfig) -> bool) -> Self {
        Self { key, present }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Requirement").field(&self.key).finish()
    }
}

/// Train/test driver selected by `model_type`
#[derive(Debug, Clone)]
pub struct ModelDriver {
    pub name: &'static str,
    pub requirements: fn(RunMode) -> Vec<Requirement>,
}

impl ModelDriver {
    /// Required keys absent from `config`, in declaration order.
    pub fn missing(&self, config: &ExperimentConfig, mode: RunMode) -> Vec<&'static str> {
        (self.requirements)(mode)
            .into_iter()
            .filter(|req| !(req.present)(config))
            .map(|req| req.key)
            .collect()
    }
}

/// Which image roots a dataset class reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetHandler {
    pub class: &'static str,
    pub needs_gt: bool,
    pub needs_lq: bool,
    /// Whether the class can serve a training split
    pub trainable: bool,
}

/// Storage backend handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IoHandler {
    pub backend: &'static str,
    /// Required extension of every data root, if any
    pub root_extension: Option<&'static str>,
}

/// Optimizer with defaults filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizerPlan {
    pub kind: &'static str,
    pub lr: f64,
    pub weight_decay: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betas: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
}

/// Pixel loss
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossPlan {
    pub kind: &'static str,
    pub weight: f64,
    pub reduction: Reduction,
}

/// Whether a larger metric value is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Better {
    Higher,
    Lower,
}

/// Image-quality metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricPlan {
    pub function: &'static str,
    pub crop_border: u32,
    pub y_channel: bool,
    pub better: Better,
    /// Whether the metric compares against ground truth
    pub reference: bool,
}

/// Validated dataset split
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitPlan {
    pub phase: Phase,
    pub handler: DatasetHandler,
    pub io: IoHandler,
}

/// Everything the validator built from one document
#[derive(Debug)]
pub struct ExperimentPlan {
    pub mode: RunMode,
    pub driver: ModelDriver,
    pub network: LamNetPlan,
    pub splits: BTreeMap<String, SplitPlan>,
    pub optimizer: Option<OptimizerPlan>,
    pub schedule: Option<Box<dyn LrScheduler>>,
    pub loss: Option<LossPlan>,
    pub metrics: BTreeMap<String, MetricPlan>,
}

impl ExperimentPlan {
    /// Names of the splits used for training.
    pub fn training_splits(&self) -> impl Iterator<Item = &str> {
        self.splits
            .iter()
            .filter(|(_, split)| split.phase == Phase::Train)
            .map(|(name, _)| name.as_str())
    }
}
