//! Service command types
//!
//! Subcommands and table rows for service status and intervals.

use clap::Subcommand;
use logbook_core::{ServiceIntervalRule, ServiceReport, ServiceStatus, ServiceType};
use serde::Serialize;
use tabled::Tabled;

use crate::commands::helpers::{format_miles, or_dash};

#[derive(Subcommand)]
pub enum ServiceAction {
    /// Show status of every service type for the selected vehicle
    Status {
        /// Include service types with no interval configured
        #[arg(long)]
        all: bool,
    },

    /// Show a 12-month timeline of completed and upcoming services
    Timeline {
        /// Bar width in characters (default: 48)
        #[arg(short, long, default_value = "48")]
        width: usize,
    },

    /// View or change service intervals
    Intervals {
        #[command(subcommand)]
        action: IntervalsAction,
    },
}

#[derive(Subcommand)]
pub enum IntervalsAction {
    /// Show the configured interval table
    Show,

    /// Set the interval for a service type
    Set {
        /// Service type key (e.g. oil_change, brakes, or a custom key)
        service_type: String,

        /// Interval in miles, 0 to disable the mileage check
        #[arg(long)]
        miles: Option<i64>,

        /// Interval in months, 0 to disable the date check
        #[arg(long)]
        months: Option<i64>,
    },

    /// Remove a service type from the interval table
    Remove {
        /// Service type key
        service_type: String,
    },

    /// Restore the default interval table
    Reset,
}

#[derive(Debug, Serialize, Tabled)]
pub struct StatusRow {
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Last Service")]
    pub last_service: String,
    #[tabled(rename = "Since")]
    pub miles_since: String,
    #[tabled(rename = "Next Due")]
    pub next_due_date: String,
    #[tabled(rename = "Due At")]
    pub next_due_mileage: String,
    #[tabled(rename = "Used")]
    pub percent_due: String,
}

impl From<&ServiceReport> for StatusRow {
    fn from(report: &ServiceReport) -> Self {
        let last_service = report.last_service.as_ref().map(|event| match event.mileage {
            Some(miles) => format!("{} @ {}", event.date, format_miles(miles)),
            None => event.date.to_string(),
        });
        let percent_due = if report.status.has_projection() {
            format!("{:.0}%", report.percent_due)
        } else {
            "-".to_string()
        };

        Self {
            service: report.service_type.label(),
            status: status_label(report.status).to_string(),
            last_service: or_dash(last_service),
            miles_since: or_dash(report.miles_since.map(format_miles)),
            next_due_date: or_dash(report.next_due_date),
            next_due_mileage: or_dash(report.next_due_mileage.map(format_miles)),
            percent_due,
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
pub struct IntervalRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Service")]
    pub service: String,
    #[tabled(rename = "Miles")]
    pub miles: String,
    #[tabled(rename = "Months")]
    pub months: String,
}

impl IntervalRow {
    pub fn new(service_type: &ServiceType, rule: &ServiceIntervalRule) -> Self {
        let disabled = |value: i64, text: String| if value == 0 { "off".to_string() } else { text };
        Self {
            key: service_type.key().to_string(),
            service: service_type.label(),
            miles: disabled(rule.miles, format_miles(rule.miles)),
            months: disabled(rule.months, rule.months.to_string()),
        }
    }
}

/// Human label for a status
pub fn status_label(status: ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Unconfigured => "not tracked",
        ServiceStatus::NeverRecorded => "no record",
        ServiceStatus::Completed => "ok",
        ServiceStatus::Upcoming => "due soon",
        ServiceStatus::Overdue => "OVERDUE",
    }
}
