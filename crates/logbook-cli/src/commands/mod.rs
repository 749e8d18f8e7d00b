//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod config;
pub mod faults;
pub mod helpers;
pub mod reminders;
pub mod service;
pub mod summary;

use anyhow::Result;
use chrono::NaiveDate;
use logbook_core::{AppConfig, LogbookApi, ReminderEngine};

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    /// Backend client, or why it could not be built from the config
    pub api: std::result::Result<Box<dyn LogbookApi>, logbook_core::Error>,
    pub config: AppConfig,
    pub format: OutputFormat,
    pub quiet: bool,
    pub vehicle_id: Option<i64>,
    /// Evaluation date, `--today` or the local date
    pub today: NaiveDate,
}

impl Context {
    /// Backend client, or the config error that kept it from being built
    pub fn api(&self) -> Result<&dyn LogbookApi> {
        self.api.as_deref().map_err(|e| {
            anyhow::anyhow!("{}. Fix it with `logbook config set <key> <value>`", e)
        })
    }

    /// Selected vehicle, or an error telling the user how to pick one
    pub fn require_vehicle(&self) -> Result<i64> {
        self.vehicle_id.ok_or_else(|| {
            anyhow::anyhow!(
                "No vehicle selected. Pass --vehicle <id>, set LOGBOOK_VEHICLE_ID, or run `logbook config set vehicle_id <id>`"
            )
        })
    }

    /// Reminder engine for today at the given odometer reading
    pub fn engine(&self, current_mileage: i64) -> ReminderEngine {
        ReminderEngine::new(self.today, current_mileage).with_thresholds(self.config.thresholds())
    }
}
