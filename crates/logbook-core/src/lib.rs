//! # logbook-core
//!
//! Core logic for Logbook - shared by the CLI and any other front-end.
//!
//! This crate provides:
//! - Data models (`models` module)
//! - Service reminder engine, timeline layout and fault log parser (`services` module)
//! - REST backend client (`api` module)
//! - Configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use api::{load_vehicle_inputs, LogbookApi, LogbookClient, VehicleInputs};
pub use config::AppConfig;
pub use error::{Error, Result};

// Re-export commonly used types from models
pub use models::{
    history_from_records, CostEntry, FaultRecord, FaultStatus, IntervalTable, MaintenanceRecord,
    ModRecord, Reminder, ServiceEvent, ServiceHistory, ServiceIntervalRule, ServiceType, Vehicle,
};

// Re-export commonly used types from services
pub use services::{
    add_months, build_timeline, parse_fault_log, summarize_vehicle, Alert, AlertSeverity,
    DueSoonThresholds, ReminderEngine, ReminderReport, SegmentKind, ServiceReport, ServiceStatus,
    Timeline, TimelineRow, TimelineSegment, VehicleSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
