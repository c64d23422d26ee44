//! Schedule command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_experiment, ConfigError, RunMode, ScheduleArgs};
use crate::schedule::curve;

/// Render sampled `(iter, lr)` points as an aligned table
pub fn format_curve(points: &[(u64, f64)]) -> String {
    let width = points
        .iter()
        .map(|(iter, _)| iter.to_string().len())
        .max()
        .unwrap_or(4)
        .max(4);
    let mut lines = vec![format!("{:>width$}  lr", "iter")];
    lines.extend(
        points
            .iter()
            .map(|(iter, lr)| format!("{iter:>width$}  {lr:.6e}")),
    );
    lines.join("\n")
}

pub fn run_schedule(args: ScheduleArgs, level: LogLevel) -> crate::Result<()> {
    let ctx = args.load.context().with_mode(RunMode::Train);
    let loaded = load_experiment(&args.load.config, &ctx, &args.load.overrides)?;

    let schedule = loaded
        .plan
        .schedule
        .as_ref()
        .ok_or_else(|| ConfigError::missing("train.scheduler"))?;
    let total = loaded
        .config
        .train
        .as_ref()
        .and_then(|t| t.total_iter)
        .ok_or_else(|| ConfigError::missing("train.total_iter"))?;

    log(
        level,
        LogLevel::Verbose,
        &format!("Milestones: {:?}", schedule.milestones()),
    );
    println!("{}", format_curve(&curve(schedule.as_ref(), total, args.points)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_curve_alignment() {
        let table = format_curve(&[(0, 5e-4), (250_000, 2.5e-4)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  iter  lr");
        assert_eq!(lines[1], "     0  5.000000e-4");
        assert_eq!(lines[2], "250000  2.500000e-4");
    }

    #[test]
    fn test_format_empty_curve() {
        assert_eq!(format_curve(&[]), "iter  lr");
    }
}
