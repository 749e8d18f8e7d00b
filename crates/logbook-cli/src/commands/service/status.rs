//! Service status command
//!
//! Per-type status table and alert list for the selected vehicle.

use anyhow::Result;
use colored::Colorize;
use logbook_core::{load_vehicle_inputs, AlertSeverity, ReminderReport, ServiceStatus};

use crate::commands::helpers::format_miles;
use crate::commands::Context;
use crate::output::{print_info, print_json, print_output, OutputFormat};
use super::types::StatusRow;

pub async fn show_status(ctx: &Context, all: bool) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let inputs = load_vehicle_inputs(ctx.api()?, vehicle_id).await?;
    let report = ctx
        .engine(inputs.current_mileage())
        .evaluate(&inputs.intervals, &inputs.history)?;

    if ctx.format == OutputFormat::Json {
        return print_json(&report);
    }

    print_info(
        &format!(
            "{} - {} miles - {}",
            inputs.vehicle.name.bold(),
            format_miles(report.current_mileage),
            report.today
        ),
        ctx.quiet,
    );
    println!();

    let rows: Vec<StatusRow> = report
        .services
        .iter()
        .filter(|s| all || s.status != ServiceStatus::Unconfigured)
        .map(StatusRow::from)
        .collect();
    print_output(&rows, ctx.format)?;

    print_alerts(&report, ctx.quiet);
    Ok(())
}

fn print_alerts(report: &ReminderReport, quiet: bool) {
    println!();
    if report.alerts.is_empty() {
        print_info(&"All services on track.".green().to_string(), quiet);
        return;
    }

    println!(
        "{} overdue, {} due soon",
        report.count(ServiceStatus::Overdue),
        report.count(ServiceStatus::Upcoming)
    );
    for alert in &report.alerts {
        let line = match alert.severity {
            AlertSeverity::Danger => format!("  ✖ {}", alert.message).red().bold(),
            AlertSeverity::Warning => format!("  ! {}", alert.message).yellow(),
            AlertSeverity::Info => format!("  · {}", alert.message).dimmed(),
        };
        println!("{}", line);
    }
}
