//! Reminder commands
//!
//! Persisted per-vehicle reminders, evaluated with any user overrides.

use anyhow::Result;
use clap::Subcommand;
use logbook_core::{Reminder, ReminderEngine, ServiceIntervalRule, ServiceType};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_miles, or_dash, parse_date, truncate};
use super::service::status_label;
use super::Context;
use crate::output::{print_output, print_success};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// List reminders for the selected vehicle with their due status
    List,

    /// Create a reminder
    Add {
        /// Service type key (e.g. oil_change, or a custom key)
        service_type: String,

        /// Interval in miles
        #[arg(long, default_value = "0")]
        miles: i64,

        /// Interval in months
        #[arg(long, default_value = "0")]
        months: i64,

        /// Date of the last service (YYYY-MM-DD)
        #[arg(long)]
        last_date: Option<String>,

        /// Odometer at the last service
        #[arg(long)]
        last_mileage: Option<i64>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Record that a reminder's service was done
    Done {
        /// Reminder ID
        id: i64,

        /// Service date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Odometer at the service, defaults to the vehicle's current mileage
        #[arg(short, long)]
        mileage: Option<i64>,
    },
}

#[derive(Debug, Serialize, Tabled)]
pub struct ReminderRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Every")]
    pub interval: String,
    #[tabled(rename = "Last Service")]
    pub last_service: String,
    #[tabled(rename = "Next Due")]
    pub next_due_date: String,
    #[tabled(rename = "Due At")]
    pub next_due_mileage: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Notes")]
    pub notes: String,
}

pub async fn execute(ctx: &Context, action: RemindersAction) -> Result<()> {
    match action {
        RemindersAction::List => list_reminders(ctx).await,
        RemindersAction::Add {
            service_type,
            miles,
            months,
            last_date,
            last_mileage,
            notes,
        } => add_reminder(ctx, service_type, miles, months, last_date, last_mileage, notes).await,
        RemindersAction::Done { id, date, mileage } => complete_reminder(ctx, id, date, mileage).await,
    }
}

async fn list_reminders(ctx: &Context) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let vehicle = ctx.api()?.get_vehicle(vehicle_id).await?;
    let reminders = ctx.api()?.list_reminders(vehicle_id).await?;
    let engine = ctx.engine(vehicle.current_mileage());

    let rows = reminders
        .iter()
        .map(|reminder| reminder_row(&engine, reminder))
        .collect::<Result<Vec<_>>>()?;
    print_output(&rows, ctx.format)
}

async fn add_reminder(
    ctx: &Context,
    service_type: String,
    miles: i64,
    months: i64,
    last_date: Option<String>,
    last_mileage: Option<i64>,
    notes: Option<String>,
) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let mut reminder = Reminder::new(
        ServiceType::from(service_type.as_str()),
        ServiceIntervalRule::new(miles, months),
    );
    reminder.vehicle_id = Some(vehicle_id);
    reminder.last_service_date = last_date.as_deref().map(parse_date).transpose()?;
    reminder.last_service_mileage = last_mileage;
    reminder.notes = notes;

    let id = ctx.api()?.create_reminder(&reminder).await?;
    print_success(
        &format!("Created reminder #{} for {}", id, reminder.service_type.key()),
        ctx.quiet,
    );
    Ok(())
}

async fn complete_reminder(
    ctx: &Context,
    id: i64,
    date: Option<String>,
    mileage: Option<i64>,
) -> Result<()> {
    let vehicle_id = ctx.require_vehicle()?;
    let mut reminder = ctx
        .api()?
        .list_reminders(vehicle_id)
        .await?
        .into_iter()
        .find(|r| r.id == Some(id))
        .ok_or_else(|| anyhow::anyhow!("Reminder #{} not found for vehicle {}", id, vehicle_id))?;

    let date = match date {
        Some(d) => parse_date(&d)?,
        None => ctx.today,
    };
    let mileage = match mileage {
        Some(m) => m,
        None => ctx.api()?.get_vehicle(vehicle_id).await?.current_mileage(),
    };

    reminder.record_service(date, Some(mileage));
    ctx.api()?.update_reminder(id, &reminder).await?;

    let next = [
        reminder.effective_next_due_date().map(|d| d.to_string()),
        reminder
            .effective_next_due_mileage()
            .map(|m| format!("{} miles", format_miles(m))),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    print_success(
        &format!(
            "Recorded {} on {}; next due {}",
            reminder.service_type.key(),
            date,
            if next.is_empty() { "-".to_string() } else { next.join(" or ") }
        ),
        ctx.quiet,
    );
    Ok(())
}

fn reminder_row(engine: &ReminderEngine, reminder: &Reminder) -> Result<ReminderRow> {
    let report = engine.evaluate_reminder(reminder)?;
    let rule = reminder.rule();
    let interval = match (rule.miles, rule.months) {
        (0, 0) => "-".to_string(),
        (miles, 0) => format!("{} mi", format_miles(miles)),
        (0, months) => format!("{} mo", months),
        (miles, months) => format!("{} mi / {} mo", format_miles(miles), months),
    };
    let last_service = match (reminder.last_service_date, reminder.last_service_mileage) {
        (Some(d), Some(m)) => format!("{} @ {}", d, format_miles(m)),
        (Some(d), None) => d.to_string(),
        (None, Some(m)) => format_miles(m),
        (None, None) => "-".to_string(),
    };

    Ok(ReminderRow {
        id: or_dash(reminder.id),
        service: reminder.service_type.label(),
        interval,
        last_service,
        next_due_date: or_dash(report.next_due_date),
        next_due_mileage: or_dash(report.next_due_mileage.map(format_miles)),
        status: status_label(report.status).to_string(),
        notes: truncate(reminder.notes.as_deref().unwrap_or(""), 30),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reminder_row_uses_override() {
        let mut reminder = Reminder::new(ServiceType::OilChange, ServiceIntervalRule::new(5000, 6));
        reminder.id = Some(3);
        reminder.last_service_date = Some(date(2024, 1, 15));
        reminder.last_service_mileage = Some(50000);
        reminder.next_due_mileage = Some(53000);

        let engine = ReminderEngine::new(date(2024, 2, 1), 53500);
        let row = reminder_row(&engine, &reminder).unwrap();
        assert_eq!(row.id, "3");
        assert_eq!(row.interval, "5,000 mi / 6 mo");
        assert_eq!(row.last_service, "2024-01-15 @ 50,000");
        assert_eq!(row.next_due_mileage, "53,000");
        assert_eq!(row.status, "OVERDUE");
    }

    #[test]
    fn test_reminder_row_without_history() {
        let reminder = Reminder::new(ServiceType::Custom("wiper_blades".into()), ServiceIntervalRule::new(0, 12));
        let engine = ReminderEngine::new(date(2024, 2, 1), 1000);
        let row = reminder_row(&engine, &reminder).unwrap();
        assert_eq!(row.interval, "12 mo");
        assert_eq!(row.last_service, "-");
        assert_eq!(row.status, "no record");
    }

    #[test]
    fn test_reminder_row_rejects_negative_interval() {
        let reminder = Reminder::new(ServiceType::Brakes, ServiceIntervalRule::new(-1, 0));
        let engine = ReminderEngine::new(date(2024, 2, 1), 1000);
        assert!(reminder_row(&engine, &reminder).is_err());
    }
}
