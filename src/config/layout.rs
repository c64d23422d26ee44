//! Derived run directories and debug-mode adjustments
//!
//! Training runs write under `experiments/<name>/`, test runs under
//! `results/<name>/`. Nothing here touches the filesystem; the external
//! driver creates the directories.

use super::plan::RunMode;
use super::schema::{ExperimentConfig, LoggerSpec};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validation interval forced by debug runs
pub const DEBUG_VAL_FREQ: u64 = 8;
/// Logging interval forced by debug runs
pub const DEBUG_PRINT_FREQ: u64 = 1;
/// Checkpoint interval forced by debug runs
pub const DEBUG_CHECKPOINT_FREQ: u64 = 8;

/// Directories a run writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentLayout {
    /// `experiments/<name>` or `results/<name>`
    pub root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_states: Option<PathBuf>,
    pub log: PathBuf,
    pub visualization: PathBuf,
    /// Tensorboard directory when `logger.use_tb_logger` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tb_logger: Option<PathBuf>,
}

impl ExperimentLayout {
    pub fn resolve(config: &ExperimentConfig, root: &Path, mode: RunMode) -> Self {
        match mode {
            RunMode::Train => {
                let base = root.join("experiments").join(&config.name);
                let use_tb = config.logger.as_ref().is_some_and(|l| l.use_tb_logger);
                Self {
                    models: Some(base.join("models")),
                    training_states: Some(base.join("training_states")),
                    log: base.clone(),
                    visualization: base.join("visualization"),
                    tb_logger: use_tb.then(|| root.join("tb_logger").join(&config.name)),
                    root: base,
                }
            }
            RunMode::Test => {
                let base = root.join("results").join(&config.name);
                Self {
                    models: None,
                    training_states: None,
                    log: base.clone(),
                    visualization: base.join("visualization"),
                    tb_logger: None,
                    root: base,
                }
            }
        }
    }
}

/// Whether `name` marks a debug run.
pub fn is_debug(name: &str) -> bool {
    name.contains("debug")
}

/// Shorten every interval of a debug training run.
///
/// Returns whether the configuration was changed.
pub fn apply_debug_overrides(config: &mut ExperimentConfig, mode: RunMode) -> bool {
    if mode != RunMode::Train || !is_debug(&config.name) {
        return false;
    }
    if let Some(val) = config.val.as_mut() {
        val.val_freq = Some(DEBUG_VAL_FREQ);
    }
    let logger = config.logger.get_or_insert_with(LoggerSpec::default);
    logger.print_freq = DEBUG_PRINT_FREQ;
    logger.save_checkpoint_freq = DEBUG_CHECKPOINT_FREQ;
    tracing::info!(name = %config.name, "debug run: shortened validation and logging intervals");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(text: &str) -> ExperimentConfig {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_train_layout() {
        let cfg = config("name: LAMNet_SRx4\nlogger:\n  use_tb_logger: true\n");
        let layout = ExperimentLayout::resolve(&cfg, Path::new("/work"), RunMode::Train);
        assert_eq!(layout.root, PathBuf::from("/work/experiments/LAMNet_SRx4"));
        assert_eq!(
            layout.models,
            Some(PathBuf::from("/work/experiments/LAMNet_SRx4/models"))
        );
        assert_eq!(
            layout.training_states,
            Some(PathBuf::from("/work/experiments/LAMNet_SRx4/training_states"))
        );
        assert_eq!(layout.tb_logger, Some(PathBuf::from("/work/tb_logger/LAMNet_SRx4")));
    }

    #[test]
    fn test_test_layout() {
        let cfg = config("name: test_LAMNet_x3\n");
        let layout = ExperimentLayout::resolve(&cfg, Path::new("/work"), RunMode::Test);
        assert_eq!(layout.root, PathBuf::from("/work/results/test_LAMNet_x3"));
        assert_eq!(
            layout.visualization,
            PathBuf::from("/work/results/test_LAMNet_x3/visualization")
        );
        assert!(layout.models.is_none());
        assert!(layout.tb_logger.is_none());
    }

    #[test]
    fn test_debug_overrides() {
        let mut cfg = config("name: debug_LAMNet\nval:\n  val_freq: 5000\n");
        assert!(apply_debug_overrides(&mut cfg, RunMode::Train));
        assert_eq!(cfg.val.as_ref().unwrap().val_freq, Some(DEBUG_VAL_FREQ));
        let logger = cfg.logger.as_ref().unwrap();
        assert_eq!(logger.print_freq, 1);
        assert_eq!(logger.save_checkpoint_freq, 8);
    }

    #[test]
    fn test_debug_overrides_skip_tests_and_regular_runs() {
        let mut cfg = config("name: debug_LAMNet\n");
        assert!(!apply_debug_overrides(&mut cfg, RunMode::Test));
        assert!(cfg.logger.is_none());

        let mut cfg = config("name: LAMNet_SRx4\n");
        assert!(!apply_debug_overrides(&mut cfg, RunMode::Train));
    }
}
