//! Service interval commands
//!
//! The table is stored on the backend as the `service_intervals` setting.

use anyhow::Result;
use logbook_core::{IntervalTable, ServiceIntervalRule, ServiceType};

use crate::commands::Context;
use crate::output::{print_output, print_success};
use super::types::IntervalRow;

pub async fn show_intervals(ctx: &Context) -> Result<()> {
    let intervals = ctx.api()?.get_service_intervals().await?;
    print_output(&interval_rows(&intervals), ctx.format)
}

pub async fn set_interval(
    ctx: &Context,
    service_type: String,
    miles: Option<i64>,
    months: Option<i64>,
) -> Result<()> {
    if miles.is_none() && months.is_none() {
        anyhow::bail!("Nothing to change. Pass --miles and/or --months");
    }

    let service_type = ServiceType::from(service_type.as_str());
    let mut intervals = ctx.api()?.get_service_intervals().await?;
    let rule = apply_change(intervals.get(&service_type).copied(), miles, months);
    rule.validate(&service_type)?;

    intervals.insert(service_type.clone(), rule);
    ctx.api()?.put_service_intervals(&intervals).await?;

    print_success(
        &format!(
            "Set {} interval: {} miles / {} months",
            service_type.key(),
            rule.miles,
            rule.months
        ),
        ctx.quiet,
    );
    Ok(())
}

pub async fn remove_interval(ctx: &Context, service_type: String) -> Result<()> {
    let service_type = ServiceType::from(service_type.as_str());
    let mut intervals = ctx.api()?.get_service_intervals().await?;
    if intervals.remove(&service_type).is_none() {
        anyhow::bail!("No interval configured for {}", service_type.key());
    }
    ctx.api()?.put_service_intervals(&intervals).await?;
    print_success(&format!("Removed {} interval", service_type.key()), ctx.quiet);
    Ok(())
}

pub async fn reset_intervals(ctx: &Context) -> Result<()> {
    ctx.api()?.put_service_intervals(&IntervalTable::defaults()).await?;
    print_success("Restored default service intervals", ctx.quiet);
    Ok(())
}

/// Merge a partial change into the existing rule; unset fields keep their value
fn apply_change(
    existing: Option<ServiceIntervalRule>,
    miles: Option<i64>,
    months: Option<i64>,
) -> ServiceIntervalRule {
    let base = existing.unwrap_or_default();
    ServiceIntervalRule::new(miles.unwrap_or(base.miles), months.unwrap_or(base.months))
}

fn interval_rows(intervals: &IntervalTable) -> Vec<IntervalRow> {
    intervals
        .iter()
        .map(|(service_type, rule)| IntervalRow::new(service_type, rule))
        .collect()
}
