//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{
    load_experiment, ExperimentConfig, ExperimentLayout, ExperimentPlan, LoadedExperiment,
    ValidateArgs,
};

/// Format identity and run mode as a string
pub fn format_identity_info(config: &ExperimentConfig, plan: &ExperimentPlan) -> String {
    let mut lines = vec![
        format!("  Name: {}", config.name),
        format!("  Model: {} ({} run)", plan.driver.name, plan.mode),
    ];
    if let Some(scale) = config.scale {
        lines.push(format!("  Scale: x{scale}"));
    }
    if let Some(seed) = config.manual_seed {
        lines.push(format!("  Seed: {seed}"));
    }
    lines.join("\n")
}

/// Format the network plan as a string
pub fn format_network_info(config: &ExperimentConfig, plan: &ExperimentPlan) -> String {
    let network = &plan.network;
    let mut lines = vec!["  Network: LAMNet".to_string()];
    if let Some(spec) = &config.network_g {
        lines.push(format!(
            "    dim={} groups={} blocks={} heads={}",
            spec.dim, spec.num_groups, spec.num_blocks, spec.num_head
        ));
        lines.push(format!(
            "    kernel_size={} kernel_loc={:?} kernel_stride={:?}",
            spec.kernel_size, spec.kernel_loc, spec.kernel_stride
        ));
    }
    lines.push(format!("    Kernel offsets: {:?}", network.kernel_map.offsets()));
    lines.push(format!("    Patch size: {}", network.kernel_map.patch_size()));
    lines.push(format!("    Parameters: {}", format_count(network.parameters)));
    lines.join("\n")
}

/// Format the dataset splits as a string
pub fn format_dataset_info(config: &ExperimentConfig, plan: &ExperimentPlan) -> String {
    let mut lines = vec!["  Datasets:".to_string()];
    for (split, spec) in &config.datasets {
        let Some(split_plan) = plan.splits.get(split) else {
            continue;
        };
        lines.push(format!(
            "    {split}: {} [{}, {}]",
            display_name(&spec.name),
            split_plan.handler.class,
            split_plan.io.backend
        ));
        if let Some(gt) = &spec.dataroot_gt {
            lines.push(format!("      GT: {}", gt.display()));
        }
        if let Some(lq) = &spec.dataroot_lq {
            lines.push(format!("      LQ: {}", lq.display()));
        }
        if let (Some(gt_size), Some(batch)) = (spec.gt_size, spec.batch_size_per_gpu) {
            lines.push(format!("      gt_size={gt_size} batch_size_per_gpu={batch}"));
        }
    }
    lines.join("\n")
}

/// Format optimizer, schedule and loss as a string
pub fn format_training_info(config: &ExperimentConfig, plan: &ExperimentPlan) -> Option<String> {
    let optimizer = plan.optimizer.as_ref()?;
    let mut lines = vec![format!(
        "  Optimizer: {} (lr={}, weight_decay={})",
        optimizer.kind, optimizer.lr, optimizer.weight_decay
    )];
    if let Some(train) = &config.train {
        if let Some(scheduler) = &train.scheduler {
            lines.push(format!("  Scheduler: {}", scheduler.kind));
        }
        if let Some(total) = train.total_iter {
            lines.push(format!("  Total iterations: {total}"));
        }
        match train.warmup() {
            Some(warmup) => lines.push(format!("  Warm-up: {warmup} iterations")),
            None => lines.push("  Warm-up: disabled".to_string()),
        }
    }
    if let Some(schedule) = &plan.schedule {
        lines.push(format!("  Milestones: {:?}", schedule.milestones()));
    }
    if let Some(loss) = &plan.loss {
        lines.push(format!("  Loss: {} (weight={})", loss.kind, loss.weight));
    }
    Some(lines.join("\n"))
}

/// Format the run directories as a string
pub fn format_layout_info(layout: &ExperimentLayout) -> String {
    let mut lines = vec![format!("  Output: {}", layout.root.display())];
    if let Some(models) = &layout.models {
        lines.push(format!("    Models: {}", models.display()));
    }
    lines.push(format!("    Visualization: {}", layout.visualization.display()));
    lines.join("\n")
}

/// Print detailed configuration summary
pub fn print_detailed_summary(loaded: &LoadedExperiment) {
    let LoadedExperiment {
        config,
        plan,
        layout,
    } = loaded;

    println!();
    println!("Configuration Summary:");
    println!("{}", format_identity_info(config, plan));
    println!();
    println!("{}", format_network_info(config, plan));
    println!();
    println!("{}", format_dataset_info(config, plan));

    if let Some(training) = format_training_info(config, plan) {
        println!();
        println!("{training}");
    }

    println!();
    println!("{}", format_layout_info(layout));
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> crate::Result<()> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.load.config.display()),
    );

    let loaded = load_experiment(&args.load.config, &args.load.context(), &args.load.overrides)?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed && level != LogLevel::Quiet {
        print_detailed_summary(&loaded);
    }

    Ok(())
}

pub(crate) fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

/// `1234567` as `1.23M`.
pub(crate) fn format_count(n: u64) -> String {
    match n {
        0..=9_999 => n.to_string(),
        10_000..=999_999 => format!("{:.1}K", n as f64 / 1e3),
        _ => format!("{:.2}M", n as f64 / 1e6),
    }
}
