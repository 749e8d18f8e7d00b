//! Data models for the Logbook application
//!
//! Backend resources are plain serde structs mirroring the REST payloads.
//! Optional columns stay `Option` so partial records round-trip unchanged.

mod fault;
mod service;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use fault::{
    ClearFaultRequest, FaultRecord, FaultStatus, ImportFaultsRequest, ImportFaultsResponse,
};
pub use service::{
    history_from_records, IntervalTable, Reminder, ServiceEvent, ServiceHistory,
    ServiceIntervalRule, ServiceType,
};

/// Vehicle model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub mileage: Option<i64>,
}

impl Vehicle {
    /// Odometer reading, 0 when unknown
    pub fn current_mileage(&self) -> i64 {
        self.mileage.unwrap_or(0).max(0)
    }
}

/// Maintenance record model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub category: Option<String>, // service type key, e.g. "oil_change"
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parts_used: Option<String>, // JSON array
    #[serde(default)]
    pub labor_hours: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Modification model (only cost matters to the core)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default = "default_mod_status")]
    pub status: String, // "planned" | "in_progress" | "completed"
}

fn default_mod_status() -> String {
    "planned".to_string()
}

/// Expense model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub vehicle_id: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Key/value setting write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingUpdate {
    pub key: String,
    pub value: String,
    pub value_type: String, // "string" | "boolean" | "json"
}
