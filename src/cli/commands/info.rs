//! Info command implementation

use super::validate::{display_name, format_count};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::plan::{MetricPlan, OptimizerPlan, RunMode};
use crate::config::{load_experiment, ExperimentConfig, ExperimentLayout, InfoArgs, OutputFormat};
use crate::network::LamNetPlan;
use serde::Serialize;
use std::collections::BTreeMap;

/// Structured view of a loaded experiment for json/yaml output
#[derive(Debug, Serialize)]
pub struct InfoReport<'a> {
    pub mode: RunMode,
    pub network: &'a LamNetPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizer: Option<&'a OptimizerPlan>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<u64>,
    pub metrics: &'a BTreeMap<String, MetricPlan>,
    pub layout: &'a ExperimentLayout,
    pub config: &'a ExperimentConfig,
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> crate::Result<()> {
    let loaded = load_experiment(&args.load.config, &args.load.context(), &args.load.overrides)?;
    let (config, plan) = (&loaded.config, &loaded.plan);

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!("Name: {}", config.name);
            println!("Mode: {}", plan.mode);
            if let Some(scale) = config.scale {
                println!("Scale: x{scale}");
            }
            println!(
                "Network: LAMNet ({} parameters, patch {})",
                format_count(plan.network.parameters),
                plan.network.kernel_map.patch_size()
            );
            for (split, spec) in &config.datasets {
                println!("Dataset {split}: {}", display_name(&spec.name));
            }
            if let Some(optimizer) = &plan.optimizer {
                println!("Optimizer: {} (lr={})", optimizer.kind, optimizer.lr);
            }
            if let Some(total) = config.train.as_ref().and_then(|t| t.total_iter) {
                println!("Total iterations: {total}");
            }
            if !plan.metrics.is_empty() {
                let names: Vec<&str> = plan.metrics.keys().map(String::as_str).collect();
                println!("Metrics: {}", names.join(", "));
            }
            println!("Output: {}", loaded.layout.root.display());
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let report = InfoReport {
                mode: plan.mode,
                network: &plan.network,
                optimizer: plan.optimizer.as_ref(),
                milestones: plan
                    .schedule
                    .as_ref()
                    .map(|s| s.milestones())
                    .unwrap_or_default(),
                metrics: &plan.metrics,
                layout: &loaded.layout,
                config,
            };
            if let Some(rendered) = args.format.render(&report)? {
                println!("{rendered}");
            }
        }
    }

    Ok(())
}
