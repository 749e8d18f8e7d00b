//! Vehicle summary command
//!
//! Spending totals, cost breakdown by category, recent maintenance and
//! active fault count.

use anyhow::Result;
use colored::Colorize;
use logbook_core::{summarize_vehicle, VehicleSummary};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_miles, format_money, or_dash, truncate};
use super::Context;
use crate::output::{print_info, print_json, print_output, OutputFormat};

#[derive(Debug, Serialize, Tabled)]
pub struct StatsRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct CategoryRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Share")]
    pub share: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct RecentRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let api = ctx.api()?;
    let (vehicle, maintenance, mods, costs, faults) = tokio::try_join!(
        api.get_vehicle(vehicle_id),
        api.list_maintenance(vehicle_id),
        api.list_mods(vehicle_id),
        api.list_costs(vehicle_id),
        api.list_faults(vehicle_id),
    )?;
    let summary = summarize_vehicle(&maintenance, &mods, &costs, &faults);

    if ctx.format == OutputFormat::Json {
        return print_json(&summary);
    }

    print_info(
        &format!(
            "{} - {} miles",
            vehicle.name.bold(),
            format_miles(vehicle.current_mileage())
        ),
        ctx.quiet,
    );
    println!();
    print_output(&stats_rows(&summary), ctx.format)?;

    if !summary.cost_by_category.is_empty() {
        println!();
        println!("{}", "Other costs by category".bold());
        print_output(&category_rows(&summary), ctx.format)?;
    }

    if !summary.recent_maintenance.is_empty() {
        println!();
        println!("{}", "Recent maintenance".bold());
        let rows: Vec<RecentRow> = summary
            .recent_maintenance
            .iter()
            .map(|m| RecentRow {
                date: or_dash(m.date),
                category: or_dash(m.category.as_deref()),
                description: truncate(m.description.as_deref().unwrap_or("-"), 40),
            })
            .collect();
        print_output(&rows, ctx.format)?;
    }

    Ok(())
}

fn stats_rows(summary: &VehicleSummary) -> Vec<StatsRow> {
    vec![
        StatsRow {
            metric: "Total spent".to_string(),
            value: format_money(summary.total_spent),
        },
        StatsRow {
            metric: "Maintenance".to_string(),
            value: format_money(summary.maintenance_cost),
        },
        StatsRow {
            metric: "Mods".to_string(),
            value: format_money(summary.mods_cost),
        },
        StatsRow {
            metric: "Other costs".to_string(),
            value: format_money(summary.other_costs),
        },
        StatsRow {
            metric: "Active faults".to_string(),
            value: summary.active_faults.to_string(),
        },
    ]
}

fn category_rows(summary: &VehicleSummary) -> Vec<CategoryRow> {
    let total: f64 = summary.cost_by_category.values().sum();
    summary
        .cost_by_category
        .iter()
        .map(|(category, amount)| CategoryRow {
            category: category.clone(),
            amount: format_money(*amount),
            share: if total > 0.0 {
                format!("{:.0}%", amount / total * 100.0)
            } else {
                "-".to_string()
            },
        })
        .collect()
}
